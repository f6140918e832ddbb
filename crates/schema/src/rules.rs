//! Kind specific schema builders
//!
//! Each builder holds the rules of one schema kind and converts into a
//! [`Schema`] with `Schema::from`. Length rules are shared by strings,
//! binaries and arrays through [`LengthBounded`]; value bounds are shared by
//! numbers and dates through [`RangeBounded`].

use crate::schema::Schema;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Length rules
// ============================================================================

/// Length constraints of a string, binary or array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthRules {
    /// Minimum length (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,

    /// Maximum length (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,

    /// Exact length; supersedes `min` and `max`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<usize>,
}

impl LengthRules {
    /// Effective `(min, max)` pair
    pub fn bounds(&self) -> (Option<usize>, Option<usize>) {
        match self.exact {
            Some(n) => (Some(n), Some(n)),
            None => (self.min, self.max),
        }
    }

    /// Whether no length rule is set
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.exact.is_none()
    }
}

/// Builders that carry [`LengthRules`]
pub trait LengthBounded: Sized {
    fn length_rules(&self) -> &LengthRules;

    fn length_rules_mut(&mut self) -> &mut LengthRules;

    /// Require at least `limit` units
    fn min_length(mut self, limit: usize) -> Self {
        self.length_rules_mut().min = Some(limit);
        self
    }

    /// Allow at most `limit` units
    fn max_length(mut self, limit: usize) -> Self {
        self.length_rules_mut().max = Some(limit);
        self
    }

    /// Require exactly `limit` units
    fn length(mut self, limit: usize) -> Self {
        self.length_rules_mut().exact = Some(limit);
        self
    }
}

// ============================================================================
// Value bounds
// ============================================================================

/// Builders that accept inclusive and exclusive value bounds expressed as numbers
///
/// Dates interpret the number as milliseconds since the Unix epoch.
pub trait RangeBounded: Sized {
    /// Value must be `>= limit`
    fn min_value(self, limit: f64) -> Self;

    /// Value must be `<= limit`
    fn max_value(self, limit: f64) -> Self;

    /// Value must be `> limit`
    fn greater_than(self, limit: f64) -> Self;

    /// Value must be `< limit`
    fn less_than(self, limit: f64) -> Self;
}

// ============================================================================
// Number
// ============================================================================

/// Rules of a number schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberSchema {
    /// Only integral values
    #[serde(default)]
    pub integer: bool,

    /// Only values `> 0`
    #[serde(default)]
    pub positive: bool,

    /// Round to this many decimal places
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greater: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub less: Option<f64>,
}

impl NumberSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    pub fn positive(mut self) -> Self {
        self.positive = true;
        self
    }

    pub fn precision(mut self, digits: u32) -> Self {
        self.precision = Some(digits);
        self
    }

    pub fn min(mut self, limit: f64) -> Self {
        self.min = Some(limit);
        self
    }

    pub fn max(mut self, limit: f64) -> Self {
        self.max = Some(limit);
        self
    }

    pub fn greater(mut self, limit: f64) -> Self {
        self.greater = Some(limit);
        self
    }

    pub fn less(mut self, limit: f64) -> Self {
        self.less = Some(limit);
        self
    }
}

impl RangeBounded for NumberSchema {
    fn min_value(self, limit: f64) -> Self {
        self.min(limit)
    }

    fn max_value(self, limit: f64) -> Self {
        self.max(limit)
    }

    fn greater_than(self, limit: f64) -> Self {
        self.greater(limit)
    }

    fn less_than(self, limit: f64) -> Self {
        self.less(limit)
    }
}

// ============================================================================
// String
// ============================================================================

/// Rules of a string schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringSchema {
    /// Strip surrounding whitespace before any other rule
    #[serde(default)]
    pub trim: bool,

    /// Value must be a UUID
    #[serde(default)]
    pub uuid: bool,

    #[serde(default, skip_serializing_if = "LengthRules::is_empty")]
    pub length: LengthRules,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    pub fn uuid(mut self) -> Self {
        self.uuid = true;
        self
    }
}

impl LengthBounded for StringSchema {
    fn length_rules(&self) -> &LengthRules {
        &self.length
    }

    fn length_rules_mut(&mut self) -> &mut LengthRules {
        &mut self.length
    }
}

// ============================================================================
// Date
// ============================================================================

/// Rules of a date schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greater: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub less: Option<DateTime<Utc>>,
}

impl DateSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, limit: DateTime<Utc>) -> Self {
        self.min = Some(limit);
        self
    }

    pub fn max(mut self, limit: DateTime<Utc>) -> Self {
        self.max = Some(limit);
        self
    }

    pub fn greater(mut self, limit: DateTime<Utc>) -> Self {
        self.greater = Some(limit);
        self
    }

    pub fn less(mut self, limit: DateTime<Utc>) -> Self {
        self.less = Some(limit);
        self
    }
}

/// Instant `millis` milliseconds after the Unix epoch
///
/// Values past the representable range clamp to its ends, so an out-of-range
/// bound still rejects every real date (or none). NaN carries no ordering
/// and yields `None`.
fn instant(millis: f64) -> Option<DateTime<Utc>> {
    if millis.is_nan() {
        return None;
    }
    let (earliest, latest) = (DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC);
    if millis <= earliest.timestamp_millis() as f64 {
        Some(earliest)
    } else if millis >= latest.timestamp_millis() as f64 {
        Some(latest)
    } else {
        DateTime::from_timestamp_millis(millis as i64)
    }
}

impl RangeBounded for DateSchema {
    fn min_value(self, limit: f64) -> Self {
        match instant(limit) {
            Some(at) => self.min(at),
            None => self,
        }
    }

    fn max_value(self, limit: f64) -> Self {
        match instant(limit) {
            Some(at) => self.max(at),
            None => self,
        }
    }

    fn greater_than(self, limit: f64) -> Self {
        match instant(limit) {
            Some(at) => self.greater(at),
            None => self,
        }
    }

    fn less_than(self, limit: f64) -> Self {
        match instant(limit) {
            Some(at) => self.less(at),
            None => self,
        }
    }
}

// ============================================================================
// Binary
// ============================================================================

/// Rules of a binary schema; lengths count bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySchema {
    #[serde(default, skip_serializing_if = "LengthRules::is_empty")]
    pub length: LengthRules,
}

impl BinarySchema {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LengthBounded for BinarySchema {
    fn length_rules(&self) -> &LengthRules {
        &self.length
    }

    fn length_rules_mut(&mut self) -> &mut LengthRules {
        &mut self.length
    }
}

// ============================================================================
// Array
// ============================================================================

/// Rules of an array schema; lengths count elements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArraySchema {
    /// Schema every element must match; any element is accepted when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    #[serde(default, skip_serializing_if = "LengthRules::is_empty")]
    pub length: LengthRules,
}

impl ArraySchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Array whose elements match `items`
    pub fn of(items: Schema) -> Self {
        Self::new().items(items)
    }

    pub fn items(mut self, items: Schema) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    /// Element schema, if one is set
    pub fn item_schema(&self) -> Option<&Schema> {
        self.items.as_deref()
    }
}

impl LengthBounded for ArraySchema {
    fn length_rules(&self) -> &LengthRules {
        &self.length
    }

    fn length_rules_mut(&mut self) -> &mut LengthRules {
        &mut self.length
    }
}

// ============================================================================
// Object
// ============================================================================

/// Rules of an object schema: an ordered set of keyed child schemas
///
/// Keys not listed here are rejected during validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectSchema {
    #[serde(default)]
    pub keys: Vec<(String, Schema)>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key, replacing an existing key of the same name in place
    pub fn key(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.insert(name, schema);
        self
    }

    /// Add a key, replacing an existing key of the same name in place
    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) {
        let name = name.into();
        match self.keys.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = schema,
            None => self.keys.push((name, schema)),
        }
    }

    /// Child schema registered under `name`
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.keys
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, schema)| schema)
    }

    /// Key names in insertion order
    pub fn key_names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.keys.iter().map(|(key, schema)| (key.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_rules_bounds() {
        let rules = LengthRules {
            min: Some(1),
            max: Some(5),
            exact: None,
        };
        assert_eq!(rules.bounds(), (Some(1), Some(5)));

        let rules = LengthRules {
            min: Some(1),
            max: Some(5),
            exact: Some(3),
        };
        assert_eq!(rules.bounds(), (Some(3), Some(3)));
        assert!(LengthRules::default().is_empty());
    }

    #[test]
    fn test_number_builder() {
        let number = NumberSchema::new().integer().positive().max(10.0);
        assert!(number.integer);
        assert!(number.positive);
        assert_eq!(number.max, Some(10.0));
        assert_eq!(number.min, None);
    }

    #[test]
    fn test_range_bounded_number() {
        let number = NumberSchema::new().min_value(1.0).less_than(9.0);
        assert_eq!(number.min, Some(1.0));
        assert_eq!(number.less, Some(9.0));
    }

    #[test]
    fn test_range_bounded_date_uses_epoch_millis() {
        let date = DateSchema::new().max_value(86_400_000.0);
        let expected = DateTime::from_timestamp_millis(86_400_000).unwrap();
        assert_eq!(date.max, Some(expected));
        assert_eq!(date.min, None);
    }

    #[test]
    fn test_range_bounded_date_clamps_out_of_range() {
        let date = DateSchema::new().min_value(1e20).max_value(f64::NEG_INFINITY);
        assert_eq!(date.min, Some(DateTime::<Utc>::MAX_UTC));
        assert_eq!(date.max, Some(DateTime::<Utc>::MIN_UTC));

        let date = DateSchema::new().greater_than(1_000.0).less_than(f64::NAN);
        assert_eq!(date.greater, DateTime::from_timestamp_millis(1_000));
        assert_eq!(date.less, None);
    }

    #[test]
    fn test_string_length_builder() {
        let string = StringSchema::new().trim().min_length(0).max_length(50);
        assert!(string.trim);
        assert_eq!(string.length.bounds(), (Some(0), Some(50)));
    }

    #[test]
    fn test_object_insert_replaces_in_place() {
        let object = ObjectSchema::new()
            .key("id", Schema::any())
            .key("name", Schema::any())
            .key("id", Schema::boolean());

        assert_eq!(object.len(), 2);
        assert_eq!(object.key_names().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(object.get("id"), Some(&Schema::boolean()));
        assert!(object.get("missing").is_none());
    }

    #[test]
    fn test_array_items() {
        let array = ArraySchema::of(Schema::boolean()).min_length(1);
        assert_eq!(array.item_schema(), Some(&Schema::boolean()));
        assert_eq!(array.length.bounds(), (Some(1), None));
    }
}
