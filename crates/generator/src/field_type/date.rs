//! Date and time columns

use super::apply_value_bounds;
use keel_ir::ColumnAnnotation;
use keel_schema::{DateSchema, Schema};

/// Date schema; annotation bounds are milliseconds since the Unix epoch
pub(super) fn date_schema(annotation: &ColumnAnnotation) -> Schema {
    Schema::from(apply_value_bounds(DateSchema::new(), annotation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unbounded_date() {
        let schema = date_schema(&ColumnAnnotation::new());
        assert!(schema.is_valid(&json!("2024-03-01T10:00:00Z")));
        assert!(!schema.is_valid(&json!("not a date")));
    }

    #[test]
    fn test_epoch_bounds() {
        // 2020-01-01T00:00:00Z
        let start = 1_577_836_800_000.0;
        let schema = date_schema(&ColumnAnnotation::new().min(start));
        let date = schema.as_date().unwrap();
        assert!(date.min.is_some());
        assert!(date.max.is_none());

        assert!(schema.is_valid(&json!("2020-01-01T00:00:00Z")));
        assert!(!schema.is_valid(&json!("2019-12-31T23:59:59Z")));
    }

    #[test]
    fn test_exclusive_bound() {
        let schema = date_schema(&ColumnAnnotation::new().less(0.0));
        assert!(schema.as_date().unwrap().less.is_some());
        assert!(!schema.is_valid(&json!("1970-01-01T00:00:00Z")));
        assert!(schema.is_valid(&json!("1969-12-31T00:00:00Z")));
    }

    #[test]
    fn test_out_of_range_bounds_keep_their_meaning() {
        let schema = date_schema(&ColumnAnnotation::new().min(1e20));
        assert!(!schema.is_valid(&json!("2024-01-01T00:00:00Z")));

        let schema = date_schema(&ColumnAnnotation::new().max(-1e20).greater(0.0));
        assert!(schema.as_date().unwrap().greater.is_none());
        assert!(!schema.is_valid(&json!("2024-01-01T00:00:00Z")));
    }
}
