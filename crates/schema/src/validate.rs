//! Validation of JSON values against a schema
//!
//! Validation collects every violation instead of stopping at the first
//! one. On success it returns the normalized value: strings trimmed,
//! numbers rounded to their precision, dates rendered as RFC 3339 and
//! omitted keys replaced by their defaults.

use crate::rules::{
    ArraySchema, BinarySchema, DateSchema, LengthBounded, LengthRules, NumberSchema, ObjectSchema,
    StringSchema,
};
use crate::schema::{Presence, Schema, SchemaKind};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;

// ============================================================================
// Violations
// ============================================================================

/// Machine readable reason of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    Required,
    InvalidType,
    Empty,
    InvalidUuid,
    InvalidDate,
    NotInteger,
    NotPositive,
    TooSmall,
    TooLarge,
    NotGreater,
    NotLess,
    TooShort,
    TooLong,
    WrongLength,
    UnknownKey,
    NoMatchingAlternative,
}

/// One rule a value failed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Reason code for programmatic handling
    pub code: ViolationCode,

    /// Dotted path to the offending value (`""` for the root)
    pub path: String,

    /// Human-readable message
    pub message: String,
}

impl Violation {
    fn new(code: ViolationCode, path: &str, detail: impl std::fmt::Display) -> Self {
        Self {
            code,
            path: path.to_string(),
            message: format!("\"{}\" {}", label(path), detail),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// All violations found in one validation call
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", join_messages(.violations))]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Whether any violation has the given code
    pub fn has(&self, code: ViolationCode) -> bool {
        self.violations.iter().any(|v| v.code == code)
    }

    /// Violations reported at `path`
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations.iter().filter(move |v| v.path == path)
    }
}

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn label(path: &str) -> &str {
    if path.is_empty() { "value" } else { path }
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

// ============================================================================
// Entry points
// ============================================================================

impl Schema {
    /// Validate a present value, returning its normalized form
    pub fn validate(&self, value: &Value) -> Result<Value, ValidationErrors> {
        let mut violations = Vec::new();
        let out = self.check(Some(value), "", &mut violations);
        if violations.is_empty() {
            Ok(out.unwrap_or(Value::Null))
        } else {
            Err(ValidationErrors::new(violations))
        }
    }

    /// Validate an omitted value: `Ok(None)` when omission is accepted
    /// without a default, `Ok(Some(default))` when a default applies
    pub fn validate_missing(&self) -> Result<Option<Value>, ValidationErrors> {
        let mut violations = Vec::new();
        let out = self.check(None, "", &mut violations);
        if violations.is_empty() {
            Ok(out)
        } else {
            Err(ValidationErrors::new(violations))
        }
    }

    /// Whether a present value passes validation
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_ok()
    }

    fn check(&self, value: Option<&Value>, path: &str, out: &mut Vec<Violation>) -> Option<Value> {
        let Some(value) = value else {
            if self.presence() == Presence::Required {
                out.push(Violation::new(ViolationCode::Required, path, "is required"));
                return None;
            }
            return self.default_value().cloned();
        };

        if self.allows(value) {
            return Some(value.clone());
        }

        let checked = match self.kind() {
            SchemaKind::Any => Some(value.clone()),
            SchemaKind::Boolean => check_boolean(value, path, out),
            SchemaKind::Number(number) => check_number(number, value, path, out),
            SchemaKind::String(string) => check_string(self, string, value, path, out),
            SchemaKind::Date(date) => check_date(date, value, path, out),
            SchemaKind::Binary(binary) => check_binary(binary, value, path, out),
            SchemaKind::Array(array) => check_array(array, value, path, out),
            SchemaKind::Object(object) => check_object(object, value, path, out),
            SchemaKind::Alternatives { matches } => check_alternatives(matches, value, path, out),
        };
        checked.or_else(|| Some(value.clone()))
    }
}

// ============================================================================
// Kind checks
// ============================================================================

fn check_boolean(value: &Value, path: &str, out: &mut Vec<Violation>) -> Option<Value> {
    if value.is_boolean() {
        Some(value.clone())
    } else {
        out.push(Violation::new(ViolationCode::InvalidType, path, "must be a boolean"));
        None
    }
}

fn check_number(
    rules: &NumberSchema,
    value: &Value,
    path: &str,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let Some(raw) = value.as_f64().filter(|n| n.is_finite()) else {
        out.push(Violation::new(ViolationCode::InvalidType, path, "must be a number"));
        return None;
    };

    let number = match rules.precision {
        Some(digits) => {
            let factor = 10f64.powi(digits as i32);
            (raw * factor).round() / factor
        }
        None => raw,
    };

    if rules.integer && number.fract() != 0.0 {
        out.push(Violation::new(ViolationCode::NotInteger, path, "must be an integer"));
    }
    if rules.positive && number <= 0.0 {
        out.push(Violation::new(ViolationCode::NotPositive, path, "must be a positive number"));
    }
    if let Some(limit) = rules.min.filter(|limit| number < *limit) {
        out.push(Violation::new(
            ViolationCode::TooSmall,
            path,
            format!("must be greater than or equal to {}", limit),
        ));
    }
    if let Some(limit) = rules.max.filter(|limit| number > *limit) {
        out.push(Violation::new(
            ViolationCode::TooLarge,
            path,
            format!("must be less than or equal to {}", limit),
        ));
    }
    if let Some(limit) = rules.greater.filter(|limit| number <= *limit) {
        out.push(Violation::new(
            ViolationCode::NotGreater,
            path,
            format!("must be greater than {}", limit),
        ));
    }
    if let Some(limit) = rules.less.filter(|limit| number >= *limit) {
        out.push(Violation::new(
            ViolationCode::NotLess,
            path,
            format!("must be less than {}", limit),
        ));
    }

    if number == raw {
        Some(value.clone())
    } else {
        Some(Number::from_f64(number).map_or_else(|| value.clone(), Value::Number))
    }
}

fn check_length(rules: &LengthRules, len: usize, unit: &str, path: &str, out: &mut Vec<Violation>) {
    if let Some(exact) = rules.exact {
        if len != exact {
            out.push(Violation::new(
                ViolationCode::WrongLength,
                path,
                format!("length must be {} {}", exact, unit),
            ));
        }
        return;
    }
    if let Some(min) = rules.min.filter(|min| len < *min) {
        out.push(Violation::new(
            ViolationCode::TooShort,
            path,
            format!("length must be at least {} {}", min, unit),
        ));
    }
    if let Some(max) = rules.max.filter(|max| len > *max) {
        out.push(Violation::new(
            ViolationCode::TooLong,
            path,
            format!("length must be less than or equal to {} {}", max, unit),
        ));
    }
}

fn check_string(
    schema: &Schema,
    rules: &StringSchema,
    value: &Value,
    path: &str,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let Some(raw) = value.as_str() else {
        out.push(Violation::new(ViolationCode::InvalidType, path, "must be a string"));
        return None;
    };

    let text = if rules.trim { raw.trim() } else { raw };
    let normalized = Value::String(text.to_string());

    // Trimming can turn an input into an allow-listed value.
    if schema.allows(&normalized) {
        return Some(normalized);
    }
    if text.is_empty() {
        out.push(Violation::new(ViolationCode::Empty, path, "is not allowed to be empty"));
        return Some(normalized);
    }
    if rules.uuid && uuid::Uuid::parse_str(text).is_err() {
        out.push(Violation::new(ViolationCode::InvalidUuid, path, "must be a valid GUID"));
    }
    check_length(rules.length_rules(), text.chars().count(), "characters", path, out);

    Some(normalized)
}

/// Parse a JSON value as an instant
///
/// Strings may be RFC 3339 timestamps or bare `YYYY-MM-DD` dates; numbers are
/// milliseconds since the Unix epoch.
fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .map(|at| at.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|naive| naive.and_utc())
            }),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|n| n.is_finite()).map(|n| n as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn check_date(
    rules: &DateSchema,
    value: &Value,
    path: &str,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let Some(at) = parse_instant(value) else {
        out.push(Violation::new(ViolationCode::InvalidDate, path, "must be a valid date"));
        return None;
    };

    if let Some(limit) = rules.min.filter(|limit| at < *limit) {
        out.push(Violation::new(
            ViolationCode::TooSmall,
            path,
            format!("must be greater than or equal to \"{}\"", limit.to_rfc3339()),
        ));
    }
    if let Some(limit) = rules.max.filter(|limit| at > *limit) {
        out.push(Violation::new(
            ViolationCode::TooLarge,
            path,
            format!("must be less than or equal to \"{}\"", limit.to_rfc3339()),
        ));
    }
    if let Some(limit) = rules.greater.filter(|limit| at <= *limit) {
        out.push(Violation::new(
            ViolationCode::NotGreater,
            path,
            format!("must be greater than \"{}\"", limit.to_rfc3339()),
        ));
    }
    if let Some(limit) = rules.less.filter(|limit| at >= *limit) {
        out.push(Violation::new(
            ViolationCode::NotLess,
            path,
            format!("must be less than \"{}\"", limit.to_rfc3339()),
        ));
    }

    Some(Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true)))
}

fn byte_length(value: &Value) -> Option<usize> {
    match value {
        Value::String(text) => Some(text.len()),
        Value::Array(items) => items
            .iter()
            .all(|item| item.as_u64().is_some_and(|byte| byte <= u8::MAX as u64))
            .then_some(items.len()),
        _ => None,
    }
}

fn check_binary(
    rules: &BinarySchema,
    value: &Value,
    path: &str,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let Some(len) = byte_length(value) else {
        out.push(Violation::new(
            ViolationCode::InvalidType,
            path,
            "must be a buffer or a string",
        ));
        return None;
    };
    check_length(rules.length_rules(), len, "bytes", path, out);
    Some(value.clone())
}

fn check_array(
    rules: &ArraySchema,
    value: &Value,
    path: &str,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let Some(items) = value.as_array() else {
        out.push(Violation::new(ViolationCode::InvalidType, path, "must be an array"));
        return None;
    };

    let normalized = match rules.item_schema() {
        Some(item_schema) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let item_path = format!("{}[{}]", path, index);
                item_schema
                    .check(Some(item), &item_path, out)
                    .unwrap_or(Value::Null)
            })
            .collect(),
        None => items.clone(),
    };
    check_length(rules.length_rules(), items.len(), "items", path, out);

    Some(Value::Array(normalized))
}

fn check_object(
    rules: &ObjectSchema,
    value: &Value,
    path: &str,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let Some(fields) = value.as_object() else {
        out.push(Violation::new(ViolationCode::InvalidType, path, "must be of type object"));
        return None;
    };

    let mut normalized = Map::new();
    for (key, schema) in rules.iter() {
        let key_path = child_path(path, key);
        if let Some(checked) = schema.check(fields.get(key), &key_path, out) {
            normalized.insert(key.to_string(), checked);
        }
    }
    for key in fields.keys() {
        if rules.get(key).is_none() {
            out.push(Violation::new(
                ViolationCode::UnknownKey,
                &child_path(path, key),
                "is not allowed",
            ));
        }
    }

    Some(Value::Object(normalized))
}

fn check_alternatives(
    matches: &[Schema],
    value: &Value,
    path: &str,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    for candidate in matches {
        let mut attempt = Vec::new();
        let checked = candidate.check(Some(value), path, &mut attempt);
        if attempt.is_empty() {
            return checked;
        }
    }
    out.push(Violation::new(
        ViolationCode::NoMatchingAlternative,
        path,
        "does not match any of the allowed types",
    ));
    None
}

// ============================================================================
// Tests
// ============================================================================
