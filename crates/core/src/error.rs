//! Error types for Keel
//!
//! Three families share one enum: configuration errors raised while deriving
//! schemas from malformed metadata, consistency errors in the metadata
//! itself, and failures reading or writing model snapshots.
//!
//! Failures of a *value* against a derived schema are not `KeelError`s;
//! those are reported by `keel_schema::ValidationErrors`.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Keel
#[derive(Debug, Error)]
pub enum KeelError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A generated column declares a strategy no schema can be derived for
    #[error("Invalid generation strategy '{strategy}' for column '{entity}.{field}'")]
    InvalidGenerationStrategy {
        entity: String,
        field: String,
        strategy: String,
    },

    /// A relation kind that resolves to neither to-one nor to-many
    #[error("Invalid relation type '{kind}' for relation '{entity}.{relation}'")]
    InvalidRelationType {
        entity: String,
        relation: String,
        kind: String,
    },

    /// Entity not present in the catalog
    #[error("Unknown entity '{0}'")]
    EntityNotFound(String),

    /// Two annotations of the same kind registered for one property
    #[error("Duplicate {kind} annotation for '{entity}.{property}'")]
    DuplicateAnnotation {
        entity: String,
        property: String,
        kind: &'static str,
    },

    /// Relation nesting went deeper than the configured limit; the root
    /// entity is depth 0, so `limit` counts nested relation levels
    #[error("Composing '{entity}' would nest more than {limit} relation level(s) below the root entity")]
    DepthExceeded { entity: String, limit: usize },

    // ========================================================================
    // Metadata Errors
    // ========================================================================
    /// Metadata that is malformed without belonging to one entity
    #[error("Inconsistent metadata: {0}")]
    Metadata(String),

    /// One entity's metadata failed a consistency check
    #[error("Entity '{entity}' is inconsistent: {message}")]
    InconsistentEntity { entity: String, message: String },

    // ========================================================================
    // Snapshot Errors
    // ========================================================================
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// No snapshot at the given path
    #[error("No model snapshot at {}", .0.display())]
    ModelNotFound(PathBuf),

    /// Reading or writing a snapshot file failed
    #[error("Cannot {action} model snapshot {}: {message}", .path.display())]
    Snapshot {
        action: SnapshotAction,
        path: PathBuf,
        message: String,
    },

    #[error("Malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot content that parses but cannot be turned into a model
    #[error("Malformed model snapshot: {0}")]
    InvalidModelFormat(String),

    /// Snapshot written by a newer format version
    #[error("Unsupported snapshot version {found} (this build reads up to {expected})")]
    SchemaVersionMismatch { expected: u32, found: u32 },
}

/// Which side of snapshot I/O failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotAction {
    Read,
    Write,
    CreateDirectory,
}

impl std::fmt::Display for SnapshotAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SnapshotAction::Read => "read",
            SnapshotAction::Write => "write",
            SnapshotAction::CreateDirectory => "create the directory of",
        })
    }
}

impl KeelError {
    pub fn metadata(msg: impl Into<String>) -> Self {
        KeelError::Metadata(msg.into())
    }

    pub fn inconsistent_entity(entity: impl Into<String>, msg: impl Into<String>) -> Self {
        KeelError::InconsistentEntity {
            entity: entity.into(),
            message: msg.into(),
        }
    }

    pub fn invalid_strategy(
        entity: impl Into<String>,
        field: impl Into<String>,
        strategy: impl Into<String>,
    ) -> Self {
        KeelError::InvalidGenerationStrategy {
            entity: entity.into(),
            field: field.into(),
            strategy: strategy.into(),
        }
    }

    pub fn invalid_relation(
        entity: impl Into<String>,
        relation: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        KeelError::InvalidRelationType {
            entity: entity.into(),
            relation: relation.into(),
            kind: kind.into(),
        }
    }

    /// Snapshot I/O failure at `path`
    pub fn snapshot(action: SnapshotAction, path: impl Into<PathBuf>, err: impl ToString) -> Self {
        KeelError::Snapshot {
            action,
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Check if this error reports malformed metadata or annotations
    ///
    /// Configuration errors are deterministic: retrying the same call fails
    /// the same way until the metadata source is fixed.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            KeelError::InvalidGenerationStrategy { .. }
                | KeelError::InvalidRelationType { .. }
                | KeelError::DuplicateAnnotation { .. }
                | KeelError::DepthExceeded { .. }
        )
    }

    /// Whether the metadata itself failed a consistency check
    pub fn is_inconsistent(&self) -> bool {
        matches!(
            self,
            KeelError::Metadata(_) | KeelError::InconsistentEntity { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            KeelError::EntityNotFound(_) | KeelError::ModelNotFound(_)
        )
    }
}

/// Result type alias using KeelError
pub type KeelResult<T> = Result<T, KeelError>;

// ============================================================================
// Tests
// ============================================================================
