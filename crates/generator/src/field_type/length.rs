//! Length shaping shared by string and binary columns

use keel_core::StorageDriver;
use keel_ir::{ColumnAnnotation, FieldMetadata};
use keel_schema::LengthBounded;

/// Declared length of a column, falling back to the driver's default for
/// the type, then to zero
pub fn effective_length(driver: &dyn StorageDriver, normalized: &str, field: &FieldMetadata) -> u32 {
    field
        .length
        .or_else(|| driver.default_length(normalized))
        .unwrap_or(0)
}

/// Clamp an annotated length into `0..=max`
fn clamp(value: f64, max: u32) -> usize {
    if value > f64::from(max) {
        max as usize
    } else if value < 0.0 || value.is_nan() {
        0
    } else {
        value.trunc() as usize
    }
}

/// Apply length rules derived from the annotation and the effective length
///
/// - an exact `length` annotation wins, clamped to the effective length
/// - annotated `min`/`max` are clamped, missing ones fall back to
///   `0`/effective length, and `min` never exceeds `max`
/// - otherwise the value may be anywhere between empty and the effective
///   length
pub fn apply_length_limits<T: LengthBounded>(
    target: T,
    annotation: &ColumnAnnotation,
    effective: u32,
) -> T {
    if let Some(length) = annotation.length {
        return target.length(clamp(length as f64, effective));
    }

    if annotation.min.is_some() || annotation.max.is_some() {
        let max = clamp(annotation.max.unwrap_or(f64::from(effective)), effective);
        let min = clamp(annotation.min.unwrap_or(0.0), effective).min(max);
        return target.min_length(min).max_length(max);
    }

    target.min_length(0).max_length(effective as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::DatabaseType;
    use keel_schema::StringSchema;
    use pretty_assertions::assert_eq;

    fn bounds(annotation: &ColumnAnnotation, effective: u32) -> (Option<usize>, Option<usize>, Option<usize>) {
        let rules = apply_length_limits(StringSchema::new(), annotation, effective).length;
        (rules.min, rules.max, rules.exact)
    }

    #[test]
    fn test_effective_length() {
        let declared = FieldMetadata::new("name", "varchar").length(40);
        let undeclared = FieldMetadata::new("name", "varchar");

        assert_eq!(effective_length(&DatabaseType::MySQL, "varchar", &declared), 40);
        assert_eq!(effective_length(&DatabaseType::MySQL, "varchar", &undeclared), 255);
        assert_eq!(effective_length(&DatabaseType::SQLite, "varchar", &undeclared), 0);
    }

    #[test]
    fn test_default_window() {
        assert_eq!(bounds(&ColumnAnnotation::new(), 50), (Some(0), Some(50), None));
    }

    #[test]
    fn test_clamping() {
        let annotation = ColumnAnnotation::new().min(-5.0).max(500.0);
        assert_eq!(bounds(&annotation, 50), (Some(0), Some(50), None));

        let annotation = ColumnAnnotation::new().min(3.7);
        assert_eq!(bounds(&annotation, 50), (Some(3), Some(50), None));

        let annotation = ColumnAnnotation::new().max(10.0);
        assert_eq!(bounds(&annotation, 50), (Some(0), Some(10), None));
    }

    #[test]
    fn test_min_never_exceeds_max() {
        let annotation = ColumnAnnotation::new().min(30.0).max(10.0);
        assert_eq!(bounds(&annotation, 50), (Some(10), Some(10), None));
    }

    #[test]
    fn test_exact_length_clamped() {
        assert_eq!(bounds(&ColumnAnnotation::new().length(8), 50), (None, None, Some(8)));
        assert_eq!(bounds(&ColumnAnnotation::new().length(80), 50), (None, None, Some(50)));
        assert_eq!(bounds(&ColumnAnnotation::new().length(-1), 50), (None, None, Some(0)));
    }

    #[test]
    fn test_exact_length_ignores_min_max() {
        let annotation = ColumnAnnotation::new().length(4).min(1.0).max(9.0);
        assert_eq!(bounds(&annotation, 50), (None, None, Some(4)));
    }
}
