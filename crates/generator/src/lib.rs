//! # Keel Generator
//!
//! Schema generation engine for Keel.
//!
//! This crate derives a validation [`Schema`](keel_schema::Schema) for an
//! entity from its persistence metadata and the annotations registered
//! against it.
//!
//! ## Features
//!
//! - **Field Type Mapping**: storage type tags to number, string, date,
//!   binary, boolean or unconstrained schemas
//! - **Column Schemas**: presence from nullability and generation, plus
//!   annotation defaults and allow-lists
//! - **Relation Schemas**: to-one and to-many shaping with count constraints
//! - **Entity Composition**: include-driven nesting with id projection,
//!   mixed ids and a depth guard
//!

// ============================================================================
// Modules
// ============================================================================

pub mod columns;
pub mod field_type;
pub mod generator;
pub mod options;
pub mod relations;

// ============================================================================
// Re-exports
// ============================================================================

pub use columns::{build_column_schema, select_columns};
pub use field_type::{TypeBucket, classify, map_type};
pub use generator::{SchemaGenerator, build_relation_schema, compose_entity_schema};
pub use options::{DEFAULT_MAX_DEPTH, Options};
pub use relations::select_relations;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
