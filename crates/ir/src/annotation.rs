//! Validation annotations
//!
//! Annotations are opt-in validation directives attached to a single field
//! or relation of an entity. Only annotated properties take part in schema
//! generation.

use keel_schema::{Schema, deserialize_present};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// ColumnAnnotation
// ============================================================================

/// Validation directives for one column
///
/// `min`/`max` bound the value of numeric and date columns (dates as epoch
/// milliseconds) and the length of string and binary columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnAnnotation {
    /// Custom schema used instead of the mapped one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,

    /// Default value (`Some(Value::Null)` is a null default)
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    /// Values accepted in addition to the mapped type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,

    /// Inclusive lower bound (value or length)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Inclusive upper bound (value or length)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Exclusive lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greater: Option<f64>,

    /// Exclusive upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub less: Option<f64>,

    /// Exact length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
}

impl ColumnAnnotation {
    /// Annotation with no directives: the column is validated by its mapped type
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// Replace the mapped schema
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Add one value to the allow-list
    pub fn allow(mut self, value: impl Into<Value>) -> Self {
        self.allowed.get_or_insert_with(Vec::new).push(value.into());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn greater(mut self, greater: f64) -> Self {
        self.greater = Some(greater);
        self
    }

    pub fn less(mut self, less: f64) -> Self {
        self.less = Some(less);
        self
    }

    pub fn length(mut self, length: i64) -> Self {
        self.length = Some(length);
        self
    }
}

// ============================================================================
// RelationAnnotation
// ============================================================================

/// Count constraint on a to-many relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Count {
    /// Exactly this many related records
    Exact(usize),
    /// Independent lower and upper bounds; either may be absent
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
    },
}

impl Count {
    pub fn exact(count: usize) -> Self {
        Count::Exact(count)
    }

    pub fn between(min: usize, max: usize) -> Self {
        Count::Range {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: usize) -> Self {
        Count::Range {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: usize) -> Self {
        Count::Range {
            min: None,
            max: Some(max),
        }
    }
}

/// Validation directives for one relation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationAnnotation {
    /// Default related record(s)
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    /// Count constraint (to-many only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<Count>,

    /// Embed the related entity in full instead of its identity only
    #[serde(default)]
    pub include: bool,
}

impl RelationAnnotation {
    /// Reference the related entity by identity only
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// Embed the related entity in full
    pub fn include(mut self) -> Self {
        self.include = true;
        self
    }

    pub fn count(mut self, count: Count) -> Self {
        self.count = Some(count);
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
