//! # Field Type Mapper
//!
//! Maps a column to the schema of its values.
//!
//! Resolution order:
//!
//! 1. a custom schema on the annotation is returned as is
//! 2. a generated column with a strategy gets the strategy's schema
//! 3. otherwise the driver-normalized type tag is classified into a
//!    [`TypeBucket`] and handed to the bucket's builder
//!
//! Unknown tags map to the unconstrained `any` schema.

mod binary;
mod date;
mod length;
mod number;
mod string;

pub use length::{apply_length_limits, effective_length};

use keel_core::{GenerationStrategy, KeelError, KeelResult, StorageDriver};
use keel_ir::{ColumnAnnotation, FieldMetadata};
use keel_schema::{NumberSchema, RangeBounded, Schema, StringSchema};

// ============================================================================
// TypeBucket
// ============================================================================

/// The builder a storage type tag is handled by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeBucket {
    Boolean,
    Number,
    Uuid,
    Date,
    String,
    Binary,
    /// No mapping known; the column accepts any value
    Unknown,
}

/// Classify a normalized storage type tag
pub fn classify(normalized: &str) -> TypeBucket {
    match normalized {
        "bool" | "boolean" => TypeBucket::Boolean,

        "bit" | "bit varying" | "int" | "int2" | "int4" | "int8" | "int64" | "long" | "integer"
        | "mediumint" | "rowid" | "urowid" | "rowversion" | "smallint" | "tinyint"
        | "unsigned big int" | "bigint" | "number" | "numeric" | "smallmoney" | "money"
        | "real" | "fixed" | "float" | "float4" | "float8" | "float64" | "dec" | "decimal"
        | "smalldecimal" | "double" | "double precision" => TypeBucket::Number,

        "uuid" => TypeBucket::Uuid,

        "date" | "datetime" | "datetime2" | "time" | "time with time zone"
        | "time without time zone" | "timestamp" | "timestamp with local time zone"
        | "timestamp with time zone" | "timestamp without time zone" | "timestamptz" => {
            TypeBucket::Date
        }

        "alphanum" | "char" | "char varying" | "character" | "character varying" | "citext"
        | "line" | "linestring" | "longtext" | "mediumtext" | "multilinestring"
        | "national char" | "national varchar" | "native character" | "nchar" | "ntext"
        | "nclob" | "nvarchar" | "nvarchar2" | "shorttext" | "string" | "text" | "clob"
        | "tinytext" | "varchar" | "varchar2" | "varying character" => TypeBucket::String,

        "bfile" | "binary" | "varbinary" | "bytea" | "bytes" | "blob" | "image" | "raw"
        | "long raw" => TypeBucket::Binary,

        _ => TypeBucket::Unknown,
    }
}

// ============================================================================
// Mapping
// ============================================================================

/// Schema of a column's values, before presence and annotation flags
///
/// `entity` names the owner of the column in error messages.
pub fn map_type(
    driver: &dyn StorageDriver,
    entity: &str,
    field: &FieldMetadata,
    annotation: &ColumnAnnotation,
) -> KeelResult<Schema> {
    if let Some(custom) = &annotation.schema {
        tracing::trace!(entity, field = %field.name, "Using custom column schema");
        return Ok(custom.clone());
    }

    if field.generated {
        if let Some(strategy) = &field.generation_strategy {
            return generated_type(entity, field, strategy);
        }
    }

    let normalized = driver.normalize_type(&field.type_tag);
    let bucket = classify(&normalized);
    tracing::trace!(entity, field = %field.name, tag = %normalized, ?bucket, "Mapping column type");

    let schema = match bucket {
        TypeBucket::Boolean => Schema::boolean(),
        TypeBucket::Number => number::number_schema(driver, &normalized, field, annotation),
        TypeBucket::Uuid => Schema::from(StringSchema::new().trim().uuid()),
        TypeBucket::Date => date::date_schema(annotation),
        TypeBucket::String => string::string_schema(driver, &normalized, field, annotation),
        TypeBucket::Binary => binary::binary_schema(driver, &normalized, field, annotation),
        TypeBucket::Unknown => {
            tracing::warn!(
                entity,
                field = %field.name,
                tag = %normalized,
                "Unrecognized column type, accepting any value"
            );
            Schema::any()
        }
    };

    Ok(schema)
}

/// Schema of a column filled by a generation strategy
fn generated_type(
    entity: &str,
    field: &FieldMetadata,
    strategy: &GenerationStrategy,
) -> KeelResult<Schema> {
    match strategy {
        GenerationStrategy::Increment | GenerationStrategy::Rowid => {
            Ok(Schema::from(NumberSchema::new().integer().positive()))
        }
        GenerationStrategy::Uuid => Ok(Schema::from(StringSchema::new().trim().uuid())),
        GenerationStrategy::Other(name) => {
            Err(KeelError::invalid_strategy(entity, &field.name, name.as_str()))
        }
    }
}

/// Apply value bounds shared by numbers and dates
///
/// `max` wins over `greater`, `min` wins over `less`; only one bound of each
/// pair is applied.
pub(crate) fn apply_value_bounds<T: RangeBounded>(target: T, annotation: &ColumnAnnotation) -> T {
    let target = match (annotation.max, annotation.greater) {
        (Some(max), _) => target.max_value(max),
        (None, Some(greater)) => target.greater_than(greater),
        (None, None) => target,
    };
    match (annotation.min, annotation.less) {
        (Some(min), _) => target.min_value(min),
        (None, Some(less)) => target.less_than(less),
        (None, None) => target,
    }
}

// ============================================================================
// Tests
// ============================================================================
