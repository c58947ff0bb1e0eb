//! Relation configuration parser with validation
//!
//! Parses YAML and validates schema version and `extends` ancestry. Tag
//! validity is left to the registry, which warns or fails depending on
//! `strict`.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use elements_core::registry::{RelationRegistry, TypeConfig};

use crate::config::format_v1::ConfigV1;
use crate::errors::{config_validation, Result};

/// Entity name used for errors that are not about a single type
const CONFIG_ENTITY: &str = "config";

const SUPPORTED_SCHEMA_VERSION: u32 = 1;

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<TypeConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        config_validation(
            CONFIG_ENTITY,
            format!("Failed to read {}: {}", path.display(), e),
        )
    })?;

    parse_config_str(&content)
}

/// Parse a configuration from a string
pub fn parse_config_str(content: &str) -> Result<TypeConfig> {
    let parsed: ConfigV1 = serde_yaml::from_str(content)
        .map_err(|e| config_validation(CONFIG_ENTITY, format!("YAML parse error: {}", e)))?;

    validate_config(&parsed)?;

    let mut config = TypeConfig::new().strict(parsed.strict);
    for (name, entry) in parsed.types.0 {
        config.add_type(entry.into_definition(name));
    }

    tracing::debug!(
        component = "config",
        types = config.types().len(),
        strict = config.strict,
        "relation configuration parsed"
    );

    Ok(config)
}

/// Parse a configuration file and build the registry from it
pub fn load_registry(path: &Path) -> Result<RelationRegistry> {
    let config = parse_config_file(path)?;
    let registry = RelationRegistry::build(config)?;

    tracing::info!(
        component = "config",
        path = %path.display(),
        diagnostics = registry.diagnostics().len(),
        "relation registry loaded"
    );

    Ok(registry)
}

fn validate_config(config: &ConfigV1) -> Result<()> {
    if config.schema_version != SUPPORTED_SCHEMA_VERSION {
        return Err(config_validation(
            CONFIG_ENTITY,
            format!(
                "Unsupported schema_version: {}. Expected {}",
                config.schema_version, SUPPORTED_SCHEMA_VERSION
            ),
        ));
    }

    let names: HashSet<&str> = config.types.0.iter().map(|(n, _)| n.as_str()).collect();

    for (name, entry) in &config.types.0 {
        if let Some(parent) = &entry.extends {
            if !names.contains(parent.as_str()) {
                return Err(config_validation(
                    name,
                    format!("extends unknown type '{}'", parent),
                ));
            }
        }
    }

    // Every extends target exists, so each chain either ends or loops
    for (name, _) in &config.types.0 {
        let mut seen = HashSet::new();
        let mut current = Some(name.as_str());
        while let Some(type_name) = current {
            if !seen.insert(type_name) {
                return Err(config_validation(name, "extends chain contains a cycle"));
            }
            current = config
                .types
                .0
                .iter()
                .find(|(n, _)| n == type_name)
                .and_then(|(_, entry)| entry.extends.as_deref());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use elements_core::registry::TypeKind;

    const MINIMAL: &str = r#"
schema_version: 1
types:
  ElementBase: { kind: element, label: Element }
  TextElement: { extends: ElementBase, label: Text }
  Page:
    kind: container
    element_relations:
      Elements: [TextElement]
"#;

    #[test]
    fn test_parse_minimal() {
        let config = parse_config_str(MINIMAL).unwrap();

        assert!(!config.strict);
        assert_eq!(config.types().len(), 3);
        let page = config.get("Page").unwrap();
        assert_eq!(page.kind, Some(TypeKind::Container));
        assert_eq!(page.element_relations.get("Elements").unwrap(), ["TextElement"]);
    }

    #[test]
    fn test_wrong_schema_version_rejected() {
        let err = parse_config_str("schema_version: 2\ntypes: {}\n").unwrap_err();
        assert!(err.to_string().contains("Unsupported schema_version"));
    }

    #[test]
    fn test_unknown_extends_rejected() {
        let err = parse_config_str("schema_version: 1\ntypes:\n  A: { extends: Ghost }\n")
            .unwrap_err();
        assert!(err.to_string().contains("Ghost"));
    }

    #[test]
    fn test_extends_cycle_rejected() {
        let err = parse_config_str(
            "schema_version: 1\ntypes:\n  A: { extends: B }\n  B: { extends: A }\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let err = parse_config_str("schema_version: [").unwrap_err();
        assert!(err.to_string().contains("YAML parse error"));
    }
}
