//! # Keel Schema
//!
//! Composable validation schemas for JSON values.
//!
//! A [`Schema`] is a plain value: it can be cloned, compared, serialized,
//! and combined into larger schemas. Every schema carries a kind
//! (boolean, number, string, date, binary, array, object, alternatives, or
//! the unconstrained `any`), a presence flag, an optional default and an
//! allow-list. Kind specific rules are configured through typed builders:
//!
//! ```rust,ignore
//! use keel_schema::{LengthBounded, NumberSchema, ObjectSchema, Schema, StringSchema};
//!
//! let tag = ObjectSchema::new()
//!     .key("id", Schema::from(NumberSchema::new().integer().positive()).optional())
//!     .key("name", Schema::from(StringSchema::new().trim().max_length(50)).required());
//!
//! let tag = Schema::from(tag);
//! assert!(tag.validate(&serde_json::json!({ "name": " rust " })).is_ok());
//! println!("{}", tag.describe());
//! ```

pub mod describe;
pub mod rules;
pub mod schema;
pub mod validate;

pub use rules::{
    ArraySchema, BinarySchema, DateSchema, LengthBounded, LengthRules, NumberSchema, ObjectSchema,
    RangeBounded, StringSchema,
};
pub use schema::{Presence, Schema, SchemaKind, deserialize_present};
pub use validate::{ValidationErrors, Violation, ViolationCode};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
