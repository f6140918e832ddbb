//! Storage driver facts
//!
//! The schema generator never talks to a database. It only needs three
//! facts that a persistence driver knows about its column types:
//!
//! - how a declared type tag is normalized into the driver's canonical name
//!   (`"int4"` -> `"integer"`, `"string"` -> `"character varying"`, ...)
//! - the default length the driver assigns a type when none is declared
//! - which types accept a precision facet
//!
//! `DatabaseType` implements [`StorageDriver`] with static tables for the
//! three supported databases.

use crate::types::DatabaseType;

/// Driver-level facts consumed by the field type mapper
pub trait StorageDriver {
    /// Canonical, lowercase name of a declared column type
    fn normalize_type(&self, type_tag: &str) -> String;

    /// Length the driver assigns a normalized type when the column declares none
    fn default_length(&self, normalized: &str) -> Option<u32>;

    /// Whether a normalized type accepts a precision facet
    fn supports_precision(&self, normalized: &str) -> bool;
}

// ============================================================================
// Driver tables
// ============================================================================

const POSTGRES_PRECISION_TYPES: &[&str] = &[
    "numeric",
    "decimal",
    "interval",
    "time without time zone",
    "time with time zone",
    "timestamp without time zone",
    "timestamp with time zone",
];

const MYSQL_PRECISION_TYPES: &[&str] = &[
    "decimal",
    "dec",
    "numeric",
    "fixed",
    "float",
    "double",
    "double precision",
    "real",
    "time",
    "datetime",
    "timestamp",
];

const SQLITE_PRECISION_TYPES: &[&str] = &[
    "real",
    "double",
    "double precision",
    "float",
    "numeric",
    "decimal",
];

fn normalize_postgres(tag: &str) -> &str {
    match tag {
        "number" | "int" | "int4" => "integer",
        "int2" => "smallint",
        "int8" => "bigint",
        "string" | "varchar" => "character varying",
        "char" => "character",
        "float4" => "real",
        "float" | "float8" => "double precision",
        "decimal" => "numeric",
        "bool" => "boolean",
        "timestamptz" => "timestamp with time zone",
        "timestamp" => "timestamp without time zone",
        "timetz" => "time with time zone",
        "time" => "time without time zone",
        other => other,
    }
}

fn normalize_mysql(tag: &str) -> &str {
    match tag {
        "number" | "integer" => "int",
        "string" | "character varying" => "varchar",
        "character" => "char",
        "bool" => "boolean",
        "uuid" => "varchar",
        "dec" => "decimal",
        other => other,
    }
}

fn normalize_sqlite(tag: &str) -> &str {
    match tag {
        "number" | "int" => "integer",
        "string" | "character varying" => "varchar",
        "bool" => "boolean",
        "uuid" => "varchar",
        other => other,
    }
}

impl StorageDriver for DatabaseType {
    fn normalize_type(&self, type_tag: &str) -> String {
        let lower = type_tag.trim().to_ascii_lowercase();
        let normalized = match self {
            DatabaseType::PostgreSQL => normalize_postgres(&lower),
            DatabaseType::MySQL => normalize_mysql(&lower),
            DatabaseType::SQLite => normalize_sqlite(&lower),
        };
        normalized.to_string()
    }

    fn default_length(&self, normalized: &str) -> Option<u32> {
        match (self, normalized) {
            (DatabaseType::PostgreSQL, "character" | "bit") => Some(1),
            (DatabaseType::MySQL, "varchar" | "nvarchar" | "national varchar") => Some(255),
            (DatabaseType::MySQL, "varbinary") => Some(255),
            (DatabaseType::MySQL, "char" | "nchar" | "national char" | "binary") => Some(1),
            _ => None,
        }
    }

    fn supports_precision(&self, normalized: &str) -> bool {
        let table = match self {
            DatabaseType::PostgreSQL => POSTGRES_PRECISION_TYPES,
            DatabaseType::MySQL => MYSQL_PRECISION_TYPES,
            DatabaseType::SQLite => SQLITE_PRECISION_TYPES,
        };
        table.contains(&normalized)
    }
}

// ============================================================================
// Tests
// ============================================================================
