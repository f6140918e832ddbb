//! Text columns

use super::length::{apply_length_limits, effective_length};
use keel_core::StorageDriver;
use keel_ir::{ColumnAnnotation, FieldMetadata};
use keel_schema::{Schema, StringSchema};

/// Trimmed string schema limited to the column's length
pub(super) fn string_schema(
    driver: &dyn StorageDriver,
    normalized: &str,
    field: &FieldMetadata,
    annotation: &ColumnAnnotation,
) -> Schema {
    let effective = effective_length(driver, normalized, field);
    Schema::from(apply_length_limits(StringSchema::new().trim(), annotation, effective))
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::DatabaseType;
    use serde_json::json;

    #[test]
    fn test_trimmed_and_limited() {
        let field = FieldMetadata::new("name", "varchar").length(5);
        let schema = string_schema(&DatabaseType::SQLite, "varchar", &field, &ColumnAnnotation::new());

        assert!(schema.as_string().unwrap().trim);
        assert_eq!(schema.validate(&json!("  abc  ")).unwrap(), json!("abc"));
        assert!(!schema.is_valid(&json!("abcdef")));
    }

    #[test]
    fn test_annotation_limits() {
        let field = FieldMetadata::new("code", "varchar").length(10);
        let annotation = ColumnAnnotation::new().min(2.0);
        let schema = string_schema(&DatabaseType::SQLite, "varchar", &field, &annotation);

        assert!(!schema.is_valid(&json!("a")));
        assert!(schema.is_valid(&json!("ab")));
        assert!(!schema.is_valid(&json!("abcdefghijk")));
    }

    #[test]
    fn test_driver_default_length() {
        let field = FieldMetadata::new("title", "varchar");
        let schema = string_schema(&DatabaseType::MySQL, "varchar", &field, &ColumnAnnotation::new());
        assert_eq!(schema.length_bounds(), Some((Some(0), Some(255))));
    }
}
