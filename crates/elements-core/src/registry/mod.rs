//! Relation configuration and its resolved registry
//!
//! A [`TypeConfig`] holds type declarations as written. The
//! [`RelationRegistry`] resolves `extends` ancestry for kinds and labels,
//! merges `inherit_from` relation declarations, drops tags that are not
//! element types and doubles as the factory for new elements.

pub mod config;
pub mod resolver;

pub use config::{RelationMap, TypeConfig, TypeDefinition, TypeKind};
pub use resolver::RelationRegistry;
