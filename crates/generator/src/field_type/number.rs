//! Numeric columns

use super::apply_value_bounds;
use keel_core::StorageDriver;
use keel_ir::{ColumnAnnotation, FieldMetadata};
use keel_schema::{NumberSchema, Schema};

/// Number schema of a numeric column
///
/// Unsigned columns only accept positive values. A column keeps fractional
/// digits when the driver supports a precision for its type and the column
/// declares one; otherwise only integers are accepted.
pub(super) fn number_schema(
    driver: &dyn StorageDriver,
    normalized: &str,
    field: &FieldMetadata,
    annotation: &ColumnAnnotation,
) -> Schema {
    let mut number = NumberSchema::new();

    if field.unsigned {
        number = number.positive();
    }

    number = match field.precision.filter(|p| *p > 0) {
        Some(precision) if driver.supports_precision(normalized) => number.precision(precision),
        _ => number.integer(),
    };

    Schema::from(apply_value_bounds(number, annotation))
}
