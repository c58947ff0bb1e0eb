//! Elements Core - element relation and publishing-cascade engine
//!
//! This crate provides the domain model and operations behind typed content
//! elements attached to pages, including:
//! - Container and element models with draft/live snapshots
//! - The `ElementStore` storage seam and an in-memory implementation
//! - URL segment generation and sort sequencing
//! - Relation configuration resolution with inherit-from merging
//! - Publish, delete and modified-status cascades over element trees
//! - Idempotent default element seeding
//! - The editing-surface interface used by CMS tooling
//!
//! Everything is synchronous and single-threaded per operation.

pub use elements_core_types;

pub mod cascade;
pub mod editor;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod registry;
pub mod traversal;

// Re-export commonly used types
pub use cascade::{CascadeOptions, DeleteMode, PublishOutcome};
pub use editor::{StatusReport, ViewerContext};
pub use errors::{ElementsError, ExError, ExErrorKind, Result};
pub use model::{Container, Element, HasElementRelations, Holder, HolderRef, Stage};
pub use ops::{ElementStore, MemoryStore, SegmentLookupCache};
pub use registry::{RelationMap, RelationRegistry, TypeConfig, TypeDefinition, TypeKind};
