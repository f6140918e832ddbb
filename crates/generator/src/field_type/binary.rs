//! Binary columns

use super::length::{apply_length_limits, effective_length};
use keel_core::StorageDriver;
use keel_ir::{ColumnAnnotation, FieldMetadata};
use keel_schema::{BinarySchema, Schema};

pub(super) fn binary_schema(
    driver: &dyn StorageDriver,
    normalized: &str,
    field: &FieldMetadata,
    annotation: &ColumnAnnotation,
) -> Schema {
    let effective = effective_length(driver, normalized, field);
    Schema::from(apply_length_limits(BinarySchema::new(), annotation, effective))
}
