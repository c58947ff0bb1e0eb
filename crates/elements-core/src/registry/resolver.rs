use std::collections::{HashMap, HashSet};

use super::config::{RelationMap, TypeConfig, TypeDefinition, TypeKind};
use crate::errors::{ElementsError, Result};
use crate::model::Element;

static EMPTY: RelationMap = RelationMap::new();

/// Upper bound on `extends` chains; the config parser rejects cycles, this
/// only protects hand-built configurations.
const MAX_EXTENDS_DEPTH: usize = 64;

#[derive(Debug, Clone, Default)]
struct ResolvedRelations {
    relations: RelationMap,
    defaults: RelationMap,
}

/// Resolved, validated relation configuration
///
/// Built once from a [`TypeConfig`] and immutable afterwards. Every lookup
/// is answered from the precomputed tables, so the registry can be shared
/// freely between requests.
#[derive(Debug, Clone)]
pub struct RelationRegistry {
    config: TypeConfig,
    kinds: HashMap<String, TypeKind>,
    labels: HashMap<String, String>,
    resolved: HashMap<String, ResolvedRelations>,
    diagnostics: Vec<ElementsError>,
}

impl RelationRegistry {
    /// Resolve and validate a configuration
    ///
    /// Unknown or non-element tags in relation and default lists are dropped
    /// with a warning, as are inherit-from pointers naming unknown types.
    /// Each drop is kept as a diagnostic.
    ///
    /// # Errors
    ///
    /// Returns the first `InvalidConfiguration` diagnostic when the
    /// configuration is strict.
    pub fn build(config: TypeConfig) -> Result<Self> {
        let mut registry = Self {
            kinds: HashMap::new(),
            labels: HashMap::new(),
            resolved: HashMap::new(),
            diagnostics: Vec::new(),
            config,
        };

        let mut kinds = HashMap::new();
        let mut labels = HashMap::new();
        for definition in registry.config.types() {
            let name = definition.name.as_str();
            if let Some(kind) = registry.inherited(name, |d| d.kind) {
                kinds.insert(name.to_string(), kind);
            }
            if let Some(label) = registry.inherited(name, |d| d.label.clone()) {
                labels.insert(name.to_string(), label);
            }
        }
        registry.kinds = kinds;
        registry.labels = labels;

        let mut resolved = HashMap::new();
        let mut diagnostics = Vec::new();
        for definition in registry.config.types() {
            let sources = registry.inherit_sources(definition, &mut diagnostics);
            if definition.element_relations.is_empty()
                && definition.element_defaults.is_empty()
                && sources.is_empty()
            {
                continue;
            }

            let mut relations = definition.element_relations.clone();
            let mut defaults = definition.element_defaults.clone();
            for source in &sources {
                relations.merge_from(&source.element_relations);
                defaults.merge_from(&source.element_defaults);
            }

            let relations = registry.validated(&definition.name, &relations, &mut diagnostics);
            let defaults = registry.validated(&definition.name, &defaults, &mut diagnostics);
            resolved.insert(
                definition.name.clone(),
                ResolvedRelations {
                    relations,
                    defaults,
                },
            );
        }
        registry.resolved = resolved;
        registry.diagnostics = diagnostics;

        if registry.config.strict {
            if let Some(first) = registry.diagnostics.first() {
                return Err(first.clone());
            }
        }

        tracing::debug!(
            types = registry.config.types().len(),
            owners = registry.resolved.len(),
            diagnostics = registry.diagnostics.len(),
            "relation registry built"
        );
        Ok(registry)
    }

    /// Follow `extends` from `name` until `pick` yields a value
    fn inherited<T, F>(&self, name: &str, pick: F) -> Option<T>
    where
        F: Fn(&TypeDefinition) -> Option<T>,
    {
        let mut current = self.config.get(name);
        let mut steps = 0usize;
        while let Some(definition) = current {
            if let Some(value) = pick(definition) {
                return Some(value);
            }
            steps += 1;
            if steps > MAX_EXTENDS_DEPTH {
                return None;
            }
            current = definition
                .extends
                .as_deref()
                .and_then(|parent| self.config.get(parent));
        }
        None
    }

    /// Types whose own declarations merge into `definition`, transitively
    fn inherit_sources<'a>(
        &'a self,
        definition: &TypeDefinition,
        diagnostics: &mut Vec<ElementsError>,
    ) -> Vec<&'a TypeDefinition> {
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(definition.name.as_str());
        let mut pending: Vec<String> = definition.inherit_from.clone();
        let mut sources = Vec::new();

        let mut index = 0;
        while index < pending.len() {
            let target = pending[index].clone();
            index += 1;
            match self.config.get(&target) {
                Some(source) => {
                    if seen.insert(source.name.as_str()) {
                        pending.extend(source.inherit_from.iter().cloned());
                        sources.push(source);
                    }
                }
                None => {
                    tracing::warn!(
                        type_name = %definition.name,
                        inherit_from = %target,
                        "inherit-from names an unknown type, ignored"
                    );
                    diagnostics.push(ElementsError::InvalidConfiguration {
                        type_name: definition.name.clone(),
                        reason: format!("inherit-from names unknown type '{}'", target),
                    });
                }
            }
        }
        sources
    }

    fn validated(
        &self,
        owner: &str,
        map: &RelationMap,
        diagnostics: &mut Vec<ElementsError>,
    ) -> RelationMap {
        map.map_tags(|relation, tags| {
            let (valid, dropped) = self.partition_tags(tags);
            for tag in dropped {
                diagnostics.push(ElementsError::InvalidConfiguration {
                    type_name: owner.to_string(),
                    reason: format!(
                        "relation '{}' lists '{}', which is not an element type",
                        relation, tag
                    ),
                });
            }
            valid
        })
    }

    fn partition_tags(&self, tags: &[String]) -> (Vec<String>, Vec<String>) {
        let mut valid: Vec<String> = Vec::new();
        let mut dropped = Vec::new();
        for tag in tags {
            if !self.is_element_type(tag) {
                tracing::warn!(type_tag = %tag, "not an element type, dropped");
                dropped.push(tag.clone());
            } else if !valid.contains(tag) {
                valid.push(tag.clone());
            }
        }
        (valid, dropped)
    }

    /// Relations available on an owner type, own declarations first
    ///
    /// Unknown owners and owners without relations get an empty map.
    pub fn relations_for(&self, owner_type: &str) -> &RelationMap {
        self.resolved
            .get(owner_type)
            .map(|r| &r.relations)
            .unwrap_or(&EMPTY)
    }

    /// Default element tags per relation for an owner type
    pub fn defaults_for(&self, owner_type: &str) -> &RelationMap {
        self.resolved
            .get(owner_type)
            .map(|r| &r.defaults)
            .unwrap_or(&EMPTY)
    }

    /// Keep only tags naming element types, in order, without duplicates
    pub fn validate_classes(&self, candidates: &[String]) -> Vec<String> {
        self.partition_tags(candidates).0
    }

    /// Tags permitted under one relation of an owner type
    pub fn permitted_types(&self, owner_type: &str, relation_name: &str) -> &[String] {
        self.relations_for(owner_type)
            .get(relation_name)
            .unwrap_or_default()
    }

    pub fn is_permitted(&self, owner_type: &str, relation_name: &str, type_tag: &str) -> bool {
        self.permitted_types(owner_type, relation_name)
            .iter()
            .any(|t| t == type_tag)
    }

    /// Whether `type_tag` resolves to kind `element` through its ancestors
    pub fn is_element_type(&self, type_tag: &str) -> bool {
        self.kinds.get(type_tag) == Some(&TypeKind::Element)
    }

    pub fn kind_of(&self, type_name: &str) -> Option<TypeKind> {
        self.kinds.get(type_name).copied()
    }

    /// Display label for a type; the tag itself when none is configured
    pub fn label_for<'a>(&'a self, type_tag: &'a str) -> &'a str {
        self.labels
            .get(type_tag)
            .map(String::as_str)
            .unwrap_or(type_tag)
    }

    /// Construct a transient element of a registered type
    ///
    /// # Errors
    ///
    /// Returns `UnknownElementType` if the tag is not an element type.
    pub fn instantiate(&self, type_tag: &str) -> Result<Element> {
        if !self.is_element_type(type_tag) {
            return Err(ElementsError::UnknownElementType {
                type_tag: type_tag.to_string(),
            });
        }
        Ok(Element::new(type_tag))
    }

    /// Problems found while building, in discovery order
    pub fn diagnostics(&self) -> &[ElementsError] {
        &self.diagnostics
    }

    pub fn config(&self) -> &TypeConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    fn base_config() -> TypeConfig {
        TypeConfig::new()
            .with_type(
                TypeDefinition::new("ElementBase")
                    .kind(TypeKind::Element)
                    .label("Element"),
            )
            .with_type(
                TypeDefinition::new("TextElement")
                    .extends("ElementBase")
                    .label("Text"),
            )
            .with_type(TypeDefinition::new("DownloadElement").extends("ElementBase"))
            .with_type(TypeDefinition::new("Page").kind(TypeKind::Container))
    }

    #[test]
    fn test_kind_and_label_inherited_through_extends() {
        let registry = RelationRegistry::build(base_config()).unwrap();

        assert!(registry.is_element_type("TextElement"));
        assert!(registry.is_element_type("DownloadElement"));
        assert!(!registry.is_element_type("Page"));
        assert_eq!(registry.label_for("TextElement"), "Text");
        assert_eq!(registry.label_for("DownloadElement"), "Element");
        assert_eq!(registry.label_for("Nope"), "Nope");
    }

    #[test]
    fn test_label_for_unknown_tag_borrows_from_tag() {
        let registry = RelationRegistry::build(base_config()).unwrap();
        let labels: Vec<String> = ["TextElement", "CustomElement"]
            .iter()
            .map(|tag| {
                let owned = tag.to_string();
                registry.label_for(&owned).to_string()
            })
            .collect();

        assert_eq!(labels, vec!["Text".to_string(), "CustomElement".to_string()]);
    }

    #[test]
    fn test_inherit_from_merges_relations() {
        let config = base_config()
            .with_type(
                TypeDefinition::new("A")
                    .kind(TypeKind::Container)
                    .relation("Elements", &["TextElement"]),
            )
            .with_type(
                TypeDefinition::new("B")
                    .kind(TypeKind::Container)
                    .inherit_from("A")
                    .relation("Downloads", &["DownloadElement"]),
            );
        let registry = RelationRegistry::build(config).unwrap();

        let relations = registry.relations_for("B");
        let names: Vec<&str> = relations.names().collect();
        assert_eq!(names, vec!["Downloads", "Elements"]);
        assert_eq!(relations.get("Elements"), Some(tags(&["TextElement"]).as_slice()));
        assert_eq!(
            relations.get("Downloads"),
            Some(tags(&["DownloadElement"]).as_slice())
        );
    }

    #[test]
    fn test_inherit_from_is_transitive_and_loop_safe() {
        let config = base_config()
            .with_type(
                TypeDefinition::new("A")
                    .inherit_from("C")
                    .relation("Elements", &["TextElement"]),
            )
            .with_type(TypeDefinition::new("B").inherit_from("A"))
            .with_type(
                TypeDefinition::new("C")
                    .inherit_from("B")
                    .relation("Downloads", &["DownloadElement"]),
            );
        let registry = RelationRegistry::build(config).unwrap();

        let names: Vec<&str> = registry.relations_for("B").names().collect();
        assert_eq!(names, vec!["Elements", "Downloads"]);
    }

    #[test]
    fn test_invalid_tags_dropped_with_diagnostic() {
        let config = base_config().with_type(
            TypeDefinition::new("Page")
                .kind(TypeKind::Container)
                .relation("Elements", &["TextElement", "Ghost", "Page"]),
        );
        let registry = RelationRegistry::build(config).unwrap();

        assert_eq!(registry.permitted_types("Page", "Elements"), tags(&["TextElement"]).as_slice());
        assert_eq!(registry.diagnostics().len(), 2);
    }

    #[test]
    fn test_strict_config_fails_on_invalid_tag() {
        let config = base_config().strict(true).with_type(
            TypeDefinition::new("Page")
                .kind(TypeKind::Container)
                .relation("Elements", &["Ghost"]),
        );

        let result = RelationRegistry::build(config);
        assert!(matches!(
            result,
            Err(ElementsError::InvalidConfiguration { ref type_name, .. }) if type_name == "Page"
        ));
    }

    #[test]
    fn test_unknown_inherit_target_is_diagnostic() {
        let config = base_config().with_type(
            TypeDefinition::new("Page")
                .kind(TypeKind::Container)
                .inherit_from("Missing"),
        );
        let registry = RelationRegistry::build(config).unwrap();

        assert!(registry.relations_for("Page").is_empty());
        assert_eq!(registry.diagnostics().len(), 1);
    }

    #[test]
    fn test_validate_classes_preserves_order_and_dedupes() {
        let registry = RelationRegistry::build(base_config()).unwrap();
        let valid = registry.validate_classes(&tags(&[
            "DownloadElement",
            "Ghost",
            "TextElement",
            "DownloadElement",
        ]));
        assert_eq!(valid, tags(&["DownloadElement", "TextElement"]));
    }

    #[test]
    fn test_instantiate_unknown_tag_fails() {
        let registry = RelationRegistry::build(base_config()).unwrap();

        assert_eq!(registry.instantiate("TextElement").unwrap().type_tag, "TextElement");
        assert!(matches!(
            registry.instantiate("Ghost"),
            Err(ElementsError::UnknownElementType { .. })
        ));
    }
}
