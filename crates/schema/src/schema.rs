//! The `Schema` value type
//!
//! A schema is a kind plus three flags shared by every kind: presence,
//! default value and allow-list. Kind specific rules live in the typed
//! builders of [`crate::rules`] and are erased into [`SchemaKind`] through
//! `From` conversions.

use crate::rules::{
    ArraySchema, BinarySchema, DateSchema, LengthBounded, NumberSchema, ObjectSchema, StringSchema,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Presence
// ============================================================================

/// Whether a value may be omitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// Omission is accepted; the default (if any) is substituted
    #[default]
    Optional,
    /// Omission is a violation
    Required,
}

impl Presence {
    /// Name used in descriptions
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Optional => "optional",
            Presence::Required => "required",
        }
    }
}

// ============================================================================
// SchemaKind
// ============================================================================

/// The closed set of schema kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaKind {
    /// Accepts every value; used where no mapping is known
    Any,
    Boolean,
    Number(NumberSchema),
    String(StringSchema),
    Date(DateSchema),
    Binary(BinarySchema),
    Array(ArraySchema),
    Object(ObjectSchema),
    /// The first matching alternative wins
    Alternatives { matches: Vec<Schema> },
}

impl SchemaKind {
    /// Kind name used in descriptions and type mismatch messages
    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaKind::Any => "any",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Number(_) => "number",
            SchemaKind::String(_) => "string",
            SchemaKind::Date(_) => "date",
            SchemaKind::Binary(_) => "binary",
            SchemaKind::Array(_) => "array",
            SchemaKind::Object(_) => "object",
            SchemaKind::Alternatives { .. } => "alternatives",
        }
    }
}

// ============================================================================
// Schema
// ============================================================================

/// A composable validation schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    kind: SchemaKind,

    #[serde(default)]
    presence: Presence,

    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    default: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    allow: Vec<Value>,
}

impl Schema {
    /// Create an optional schema of the given kind with no flags set
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            presence: Presence::Optional,
            default: None,
            allow: Vec::new(),
        }
    }

    /// Unconstrained schema
    pub fn any() -> Self {
        Self::new(SchemaKind::Any)
    }

    /// Boolean schema
    pub fn boolean() -> Self {
        Self::new(SchemaKind::Boolean)
    }

    /// Schema accepting a value matching any of `matches`, tried in order
    pub fn alternatives(matches: impl IntoIterator<Item = Schema>) -> Self {
        Self::new(SchemaKind::Alternatives {
            matches: matches.into_iter().collect(),
        })
    }

    // ========================================================================
    // Flag operators
    // ========================================================================

    /// Reject omission
    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    /// Accept omission
    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    /// Value substituted when the input omits this schema's value
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Add a value to the allow-list
    pub fn allow(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        if !self.allow.contains(&value) {
            self.allow.push(value);
        }
        self
    }

    /// Add several values to the allow-list
    pub fn allow_many(self, values: impl IntoIterator<Item = Value>) -> Self {
        values
            .into_iter()
            .fold(self, |schema, value| schema.allow(value))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The schema kind
    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    /// Kind name
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Presence flag
    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// Whether omission is rejected
    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }

    /// Default value, if one is set (`Some(Value::Null)` is a null default)
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Allow-list in insertion order
    pub fn allowed(&self) -> &[Value] {
        &self.allow
    }

    /// Whether `value` is on the allow-list
    pub fn allows(&self, value: &Value) -> bool {
        self.allow.contains(value)
    }

    /// Whether this is the unconstrained `any` kind
    pub fn is_unconstrained(&self) -> bool {
        matches!(self.kind, SchemaKind::Any)
    }

    pub fn as_number(&self) -> Option<&NumberSchema> {
        match &self.kind {
            SchemaKind::Number(number) => Some(number),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringSchema> {
        match &self.kind {
            SchemaKind::String(string) => Some(string),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateSchema> {
        match &self.kind {
            SchemaKind::Date(date) => Some(date),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&BinarySchema> {
        match &self.kind {
            SchemaKind::Binary(binary) => Some(binary),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArraySchema> {
        match &self.kind {
            SchemaKind::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match &self.kind {
            SchemaKind::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Alternatives in match order
    pub fn alternatives_list(&self) -> Option<&[Schema]> {
        match &self.kind {
            SchemaKind::Alternatives { matches } => Some(matches),
            _ => None,
        }
    }

    /// Effective `(min, max)` length bounds of string, binary and array kinds
    ///
    /// An exact length `n` reports `(Some(n), Some(n))`.
    pub fn length_bounds(&self) -> Option<(Option<usize>, Option<usize>)> {
        match &self.kind {
            SchemaKind::String(string) => Some(string.length_rules().bounds()),
            SchemaKind::Binary(binary) => Some(binary.length_rules().bounds()),
            SchemaKind::Array(array) => Some(array.length_rules().bounds()),
            _ => None,
        }
    }
}

impl From<SchemaKind> for Schema {
    fn from(kind: SchemaKind) -> Self {
        Schema::new(kind)
    }
}

impl From<NumberSchema> for Schema {
    fn from(number: NumberSchema) -> Self {
        Schema::new(SchemaKind::Number(number))
    }
}

impl From<StringSchema> for Schema {
    fn from(string: StringSchema) -> Self {
        Schema::new(SchemaKind::String(string))
    }
}

impl From<DateSchema> for Schema {
    fn from(date: DateSchema) -> Self {
        Schema::new(SchemaKind::Date(date))
    }
}

impl From<BinarySchema> for Schema {
    fn from(binary: BinarySchema) -> Self {
        Schema::new(SchemaKind::Binary(binary))
    }
}

impl From<ArraySchema> for Schema {
    fn from(array: ArraySchema) -> Self {
        Schema::new(SchemaKind::Array(array))
    }
}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Self {
        Schema::new(SchemaKind::Object(object))
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Deserialize a field that was present in the input as `Some`, even when it is `null`
///
/// Combine with `#[serde(default)]` so that a missing field stays `None` while
/// an explicit `null` becomes `Some(Value::Null)`.
pub fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_schema_is_optional() {
        let schema = Schema::boolean();
        assert_eq!(schema.presence(), Presence::Optional);
        assert!(schema.default_value().is_none());
        assert!(schema.allowed().is_empty());
    }

    #[test]
    fn test_flag_operators() {
        let schema = Schema::boolean().required().default(true).allow(Value::Null);
        assert!(schema.is_required());
        assert_eq!(schema.default_value(), Some(&json!(true)));
        assert!(schema.allows(&Value::Null));
    }

    #[test]
    fn test_allow_is_a_set_union() {
        let schema = Schema::any()
            .allow(1)
            .allow_many(vec![json!(1), json!(2)])
            .allow(Value::Null);
        assert_eq!(schema.allowed(), &[json!(1), json!(2), Value::Null]);
    }

    #[test]
    fn test_null_default_survives_serde() {
        let schema = Schema::boolean().optional().default(Value::Null);
        let json = serde_json::to_string(&schema).unwrap();
        let back: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(back.default_value(), Some(&Value::Null));
        assert_eq!(back, schema);
    }

    #[test]
    fn test_missing_default_stays_none() {
        let back: Schema = serde_json::from_value(json!({ "kind": { "type": "boolean" } })).unwrap();
        assert!(back.default_value().is_none());
        assert_eq!(back.kind(), &SchemaKind::Boolean);
    }

    #[test]
    fn test_unconstrained() {
        assert!(Schema::any().is_unconstrained());
        assert!(!Schema::boolean().is_unconstrained());
        assert_eq!(Schema::any().type_name(), "any");
    }

    #[test]
    fn test_length_bounds() {
        let schema = Schema::from(StringSchema::new().min_length(2).max_length(8));
        assert_eq!(schema.length_bounds(), Some((Some(2), Some(8))));

        let schema = Schema::from(BinarySchema::new().length(4));
        assert_eq!(schema.length_bounds(), Some((Some(4), Some(4))));

        assert_eq!(Schema::boolean().length_bounds(), None);
    }
}
