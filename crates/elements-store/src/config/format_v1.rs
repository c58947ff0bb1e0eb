//! Relation configuration format v1
//!
//! Defines the YAML structure of `elements.yaml`

use std::fmt;

use elements_core::registry::{RelationMap, TypeDefinition, TypeKind};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

/// Top-level configuration file structure
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigV1 {
    /// Schema version (must be 1 for this format)
    pub schema_version: u32,

    /// Invalid type tags fail the load instead of being dropped with a warning
    #[serde(default)]
    pub strict: bool,

    /// Configured types, in declaration order
    #[serde(default)]
    pub types: TypeEntries,
}

/// Types keyed by name, keeping the order they were declared in
#[derive(Debug, Clone, Default)]
pub struct TypeEntries(pub Vec<(String, TypeEntryV1)>);

/// One type as declared in the file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeEntryV1 {
    #[serde(default)]
    pub kind: Option<TypeKind>,

    #[serde(default)]
    pub extends: Option<String>,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub element_relations: RelationMap,

    #[serde(default)]
    pub element_defaults: RelationMap,

    #[serde(default)]
    pub element_relations_inherit_from: Option<InheritFrom>,
}

/// `element_relations_inherit_from` accepts one type name or a list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InheritFrom {
    One(String),
    Many(Vec<String>),
}

impl InheritFrom {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            InheritFrom::One(name) => vec![name],
            InheritFrom::Many(names) => names,
        }
    }
}

impl TypeEntryV1 {
    /// Convert into the registry's definition type
    pub fn into_definition(self, name: String) -> TypeDefinition {
        TypeDefinition {
            name,
            kind: self.kind,
            extends: self.extends,
            label: self.label,
            element_relations: self.element_relations,
            element_defaults: self.element_defaults,
            inherit_from: self
                .element_relations_inherit_from
                .map(InheritFrom::into_vec)
                .unwrap_or_default(),
        }
    }
}

impl<'de> Deserialize<'de> for TypeEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TypeEntriesVisitor;

        impl<'de> Visitor<'de> for TypeEntriesVisitor {
            type Value = TypeEntries;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of type name to type declaration")
            }

            fn visit_unit<E: de::Error>(self) -> Result<TypeEntries, E> {
                Ok(TypeEntries::default())
            }

            fn visit_map<M>(self, mut access: M) -> Result<TypeEntries, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut entries: Vec<(String, TypeEntryV1)> = Vec::new();
                while let Some(name) = access.next_key::<String>()? {
                    if entries.iter().any(|(existing, _)| *existing == name) {
                        return Err(de::Error::custom(format!(
                            "duplicate type name '{}'",
                            name
                        )));
                    }
                    // `Foo:` with no body declares a bare type
                    let entry = access
                        .next_value::<Option<TypeEntryV1>>()?
                        .unwrap_or_default();
                    entries.push((name, entry));
                }
                Ok(TypeEntries(entries))
            }
        }

        deserializer.deserialize_map(TypeEntriesVisitor)
    }
}
