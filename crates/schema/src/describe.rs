//! Structural descriptions of schemas
//!
//! `describe()` renders a schema as a plain JSON tree, stable enough to be
//! compared in tests and printed by tools.

use crate::rules::{DateSchema, LengthRules, NumberSchema, StringSchema};
use crate::schema::{Schema, SchemaKind};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value, json};

impl Schema {
    /// Describe this schema as a JSON tree
    ///
    /// ```json
    /// {
    ///   "type": "number",
    ///   "flags": { "presence": "optional", "default": null },
    ///   "allow": [null],
    ///   "rules": [{ "name": "integer" }, { "name": "positive" }]
    /// }
    /// ```
    ///
    /// Empty sections are omitted. A null default is kept as `"default": null`.
    pub fn describe(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), json!(self.type_name()));

        let mut flags = Map::new();
        flags.insert("presence".into(), json!(self.presence().as_str()));
        if let Some(default) = self.default_value() {
            flags.insert("default".into(), default.clone());
        }
        out.insert("flags".into(), Value::Object(flags));

        if !self.allowed().is_empty() {
            out.insert("allow".into(), Value::Array(self.allowed().to_vec()));
        }

        let rules = match self.kind() {
            SchemaKind::Number(number) => number_rules(number),
            SchemaKind::String(string) => string_rules(string),
            SchemaKind::Date(date) => date_rules(date),
            SchemaKind::Binary(binary) => length_rules(&binary.length),
            SchemaKind::Array(array) => length_rules(&array.length),
            _ => Vec::new(),
        };
        if !rules.is_empty() {
            out.insert("rules".into(), Value::Array(rules));
        }

        match self.kind() {
            SchemaKind::Object(object) => {
                let keys = object
                    .iter()
                    .map(|(name, schema)| (name.to_string(), schema.describe()))
                    .collect::<Map<_, _>>();
                out.insert("keys".into(), Value::Object(keys));
            }
            SchemaKind::Array(array) => {
                if let Some(items) = array.item_schema() {
                    out.insert("items".into(), items.describe());
                }
            }
            SchemaKind::Alternatives { matches } => {
                let matches = matches.iter().map(Schema::describe).collect();
                out.insert("matches".into(), Value::Array(matches));
            }
            _ => {}
        }

        Value::Object(out)
    }
}

fn rule(name: &str) -> Value {
    json!({ "name": name })
}

fn rule_with(name: &str, limit: impl Into<Value>) -> Value {
    json!({ "name": name, "args": { "limit": limit.into() } })
}

fn number_rules(number: &NumberSchema) -> Vec<Value> {
    let mut rules = Vec::new();
    if number.integer {
        rules.push(rule("integer"));
    }
    if number.positive {
        rules.push(rule("positive"));
    }
    if let Some(digits) = number.precision {
        rules.push(rule_with("precision", digits));
    }
    let bounds = [
        ("min", number.min),
        ("max", number.max),
        ("greater", number.greater),
        ("less", number.less),
    ];
    for (name, limit) in bounds {
        if let Some(limit) = limit {
            rules.push(rule_with(name, limit));
        }
    }
    rules
}

fn string_rules(string: &StringSchema) -> Vec<Value> {
    let mut rules = Vec::new();
    if string.trim {
        rules.push(rule("trim"));
    }
    if string.uuid {
        rules.push(rule("guid"));
    }
    rules.extend(length_rules(&string.length));
    rules
}

fn date_rules(date: &DateSchema) -> Vec<Value> {
    let iso = |at: DateTime<Utc>| at.to_rfc3339_opts(SecondsFormat::Millis, true);
    [
        ("min", date.min),
        ("max", date.max),
        ("greater", date.greater),
        ("less", date.less),
    ]
    .into_iter()
    .filter_map(|(name, limit)| limit.map(|at| rule_with(name, iso(at))))
    .collect()
}

fn length_rules(length: &LengthRules) -> Vec<Value> {
    if let Some(exact) = length.exact {
        return vec![rule_with("length", exact)];
    }
    let mut rules = Vec::new();
    if let Some(min) = length.min {
        rules.push(rule_with("min", min));
    }
    if let Some(max) = length.max {
        rules.push(rule_with("max", max));
    }
    rules
}
