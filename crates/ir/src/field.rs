//! Field (column) metadata
//!
//! A `FieldMetadata` records the structural facts the persistence layer knows
//! about one column of an entity: its declared type, nullability, generation
//! and size facets.

use keel_core::GenerationStrategy;
use serde::{Deserialize, Serialize};

// ============================================================================
// FieldMetadata
// ============================================================================

/// Structural facts about one persisted column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Property name on the entity (e.g., "name", "price")
    pub name: String,

    /// Declared storage type tag (e.g., "varchar", "float", "uuid")
    pub type_tag: String,

    /// Whether the column accepts null
    #[serde(default)]
    pub nullable: bool,

    /// Whether the column is part of the primary key
    #[serde(default)]
    pub primary: bool,

    /// Whether the persistence layer fills the column
    #[serde(default)]
    pub generated: bool,

    /// How a generated column is filled, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_strategy: Option<GenerationStrategy>,

    /// Declared length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    /// Declared numeric precision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,

    /// Whether a numeric column is unsigned
    #[serde(default)]
    pub unsigned: bool,

    /// Name of the relation this column backs (foreign key shadow column)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key_of: Option<String>,

    /// Type that declared this column when it is embedded into the entity
    ///
    /// Annotations of embedded columns are registered against the embedded
    /// type, not against the entity that stores them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedded_from: Option<String>,
}

impl FieldMetadata {
    /// Create a required, non-generated field
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
            nullable: false,
            primary: false,
            generated: false,
            generation_strategy: None,
            length: None,
            precision: None,
            unsigned: false,
            foreign_key_of: None,
            embedded_from: None,
        }
    }

    /// Auto-incrementing integer primary key named `id`
    pub fn increment_id() -> Self {
        Self::new("id", "integer")
            .primary()
            .generated(GenerationStrategy::Increment)
    }

    /// UUID primary key named `id`
    pub fn uuid_id() -> Self {
        Self::new("id", "uuid")
            .primary()
            .generated(GenerationStrategy::Uuid)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Mark as part of the primary key
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Mark as generated with the given strategy
    pub fn generated(mut self, strategy: impl Into<GenerationStrategy>) -> Self {
        self.generated = true;
        self.generation_strategy = Some(strategy.into());
        self
    }

    /// Mark as generated by the database without a known strategy
    pub fn auto_generated(mut self) -> Self {
        self.generated = true;
        self.generation_strategy = None;
        self
    }

    /// Accept null
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Mark as the foreign key column backing `relation`
    pub fn foreign_key_of(mut self, relation: impl Into<String>) -> Self {
        self.foreign_key_of = Some(relation.into());
        self
    }

    /// Mark as embedded from another type
    pub fn embedded_from(mut self, owner: impl Into<String>) -> Self {
        self.embedded_from = Some(owner.into());
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether this column only shadows a relation
    pub fn is_relation_shadow(&self) -> bool {
        self.foreign_key_of.is_some()
    }

    /// Name under which annotations of this field are registered
    pub fn annotation_owner<'a>(&'a self, entity: &'a str) -> &'a str {
        self.embedded_from.as_deref().unwrap_or(entity)
    }
}

// ============================================================================
// Tests
// ============================================================================
