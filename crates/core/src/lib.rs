//! # Keel Core
//!
//! Core types, traits, and error handling for Keel.
//!
//! This crate provides the foundational building blocks shared by the
//! schema, metadata and generator crates:
//!
//! - **Types**: Database flavours, relation kinds and their cardinality
//!   buckets, column generation strategies
//! - **Drivers**: Storage-driver facts (type normalization, default lengths,
//!   precision-capable types) behind the `StorageDriver` trait
//! - **Traits**: Common behaviors like `Validatable`
//! - **Errors**: Unified error handling with `KeelError` and `KeelResult`
//!

pub mod driver;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use driver::StorageDriver;
pub use error::{KeelError, KeelResult, SnapshotAction};
pub use traits::Validatable;
pub use types::{Cardinality, DatabaseType, GenerationStrategy, RelationType};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
