use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered mapping of relation name to type tags
///
/// Keeps declaration order for both keys and tag lists; lookups are linear,
/// which is fine for the handful of relations a type declares.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelationMap {
    entries: Vec<(String, Vec<String>)>,
}

impl RelationMap {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Tags declared for a relation
    pub fn get(&self, relation_name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == relation_name)
            .map(|(_, tags)| tags.as_slice())
    }

    pub fn contains(&self, relation_name: &str) -> bool {
        self.get(relation_name).is_some()
    }

    /// Relation names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, tags)| (name.as_str(), tags.as_slice()))
    }

    /// Insert or replace a relation, keeping its original position if present
    pub fn insert(&mut self, relation_name: impl Into<String>, tags: Vec<String>) {
        let relation_name = relation_name.into();
        match self.entries.iter_mut().find(|(name, _)| *name == relation_name) {
            Some((_, existing)) => *existing = tags,
            None => self.entries.push((relation_name, tags)),
        }
    }

    /// Non-destructive union with another map
    ///
    /// Relation names already present keep their position and their own tags
    /// first; tags only `other` lists are appended. Names absent here are
    /// appended in `other`'s order.
    pub fn merge_from(&mut self, other: &RelationMap) {
        for (name, tags) in &other.entries {
            match self.entries.iter_mut().find(|(own, _)| own == name) {
                Some((_, existing)) => {
                    for tag in tags {
                        if !existing.contains(tag) {
                            existing.push(tag.clone());
                        }
                    }
                }
                None => self.entries.push((name.clone(), tags.clone())),
            }
        }
    }

    /// Same map with every tag list rewritten by `f`
    pub fn map_tags<F>(&self, mut f: F) -> RelationMap
    where
        F: FnMut(&str, &[String]) -> Vec<String>,
    {
        RelationMap {
            entries: self
                .entries
                .iter()
                .map(|(name, tags)| (name.clone(), f(name, tags)))
                .collect(),
        }
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<String>)> for RelationMap {
    fn from_iter<I: IntoIterator<Item = (N, Vec<String>)>>(iter: I) -> Self {
        let mut map = RelationMap::new();
        for (name, tags) in iter {
            map.insert(name, tags);
        }
        map
    }
}

impl Serialize for RelationMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, tags) in &self.entries {
            map.serialize_entry(name, tags)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RelationMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RelationMapVisitor;

        impl<'de> Visitor<'de> for RelationMapVisitor {
            type Value = RelationMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of relation name to a list of type tags")
            }

            fn visit_unit<E: de::Error>(self) -> Result<RelationMap, E> {
                Ok(RelationMap::new())
            }

            fn visit_map<M>(self, mut access: M) -> Result<RelationMap, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut map = RelationMap::new();
                while let Some((name, tags)) = access.next_entry::<String, Vec<String>>()? {
                    if map.contains(&name) {
                        return Err(de::Error::custom(format!(
                            "duplicate relation name '{}'",
                            name
                        )));
                    }
                    map.insert(name, tags);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(RelationMapVisitor)
    }
}

/// Whether a configured type is an element or a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Element,
    Container,
}

/// One configured type, exactly as declared (nothing inherited yet)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: Option<TypeKind>,
    /// Ancestor type; `kind` and `label` are inherited through it
    pub extends: Option<String>,
    pub label: Option<String>,
    pub element_relations: RelationMap,
    pub element_defaults: RelationMap,
    /// Types whose own relation declarations are merged into this one's
    pub inherit_from: Vec<String>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn kind(mut self, kind: TypeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn relation(mut self, name: impl Into<String>, tags: &[&str]) -> Self {
        self.element_relations
            .insert(name, tags.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn default_elements(mut self, name: impl Into<String>, tags: &[&str]) -> Self {
        self.element_defaults
            .insert(name, tags.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn inherit_from(mut self, other: impl Into<String>) -> Self {
        self.inherit_from.push(other.into());
        self
    }
}

/// Complete relation configuration, loaded once at startup
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeConfig {
    /// Invalid tags and pointers fail the registry build instead of warning
    pub strict: bool,
    types: Vec<TypeDefinition>,
}

impl TypeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Add a type definition, replacing any earlier one of the same name
    pub fn with_type(mut self, definition: TypeDefinition) -> Self {
        self.add_type(definition);
        self
    }

    pub fn add_type(&mut self, definition: TypeDefinition) {
        match self.types.iter_mut().find(|t| t.name == definition.name) {
            Some(existing) => *existing = definition,
            None => self.types.push(definition),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Types in declaration order
    pub fn types(&self) -> &[TypeDefinition] {
        &self.types
    }
}
