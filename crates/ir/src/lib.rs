//! # Keel IR (Intermediate Representation)
//!
//! This crate holds everything the schema generator reads: the metadata
//! graph of a data source and the validation annotations attached to it.
//!
//! ## Core Concepts
//!
//! - **Entity**: a persisted record type (e.g., Product, Category)
//! - **Field**: a column of an entity with its type tag, nullability,
//!   generation and size facets
//! - **Relation**: a reference to another entity with a cardinality bucket
//! - **Catalog**: the read-only graph owning every entity of a data source
//! - **Annotation**: an opt-in validation directive on one field or relation
//! - **AnnotationRegistry**: the immutable set of annotations, built once
//!   through a `RegistryBuilder`
//!

// Module declarations
pub mod annotation;
pub mod catalog;
pub mod entity;
pub mod field;
pub mod registry;
pub mod relation;
pub mod serialization;
pub mod validation;

// Re-export commonly used types at crate root
pub use annotation::{ColumnAnnotation, Count, RelationAnnotation};
pub use catalog::Catalog;
pub use entity::EntityMetadata;
pub use field::FieldMetadata;
pub use registry::{AnnotationRegistry, ColumnEntry, RegistryBuilder, RelationEntry};
pub use relation::RelationMetadata;
pub use serialization::{
    Model, ModelFile, load_model, load_model_from_bytes, load_model_from_str, save_model,
    save_model_to_string,
};
pub use validation::{ConsistencyReport, ConsistencyRule, Finding, FindingCode, Severity, Validator};

// Re-export core types that are commonly used with IR
pub use keel_core::{
    Cardinality, DatabaseType, GenerationStrategy, KeelError, KeelResult, RelationType,
};

/// Current schema version for model snapshots
pub const SCHEMA_VERSION: u32 = 1;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        AnnotationRegistry,
        Catalog,
        ColumnAnnotation,
        Count,
        // Re-exported from core
        DatabaseType,
        // Metadata graph
        EntityMetadata,
        FieldMetadata,
        GenerationStrategy,
        KeelError,
        KeelResult,
        RegistryBuilder,
        RelationAnnotation,
        RelationMetadata,
        RelationType,
    };
}

// ============================================================================
// Tests
// ============================================================================
