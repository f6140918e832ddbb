//! # Column Schema Builder
//!
//! Turns one annotated column into the schema fragment stored under its
//! property name: the mapped type, then presence, then the annotation's
//! default and allow-list.

use crate::field_type::map_type;
use crate::options::Options;
use keel_core::{KeelResult, StorageDriver};
use keel_ir::{AnnotationRegistry, ColumnAnnotation, EntityMetadata, FieldMetadata};
use keel_schema::Schema;
use serde_json::Value;

/// Columns of `entity` that take part in generation, in declaration order
///
/// Relation shadow columns are skipped, only annotated columns are kept, and
/// in id mode only primary key columns remain.
pub fn select_columns<'a>(
    entity: &'a EntityMetadata,
    registry: &'a AnnotationRegistry,
    options: &Options,
) -> Vec<(&'a FieldMetadata, &'a ColumnAnnotation)> {
    let id_mode = options.id_mode;
    entity
        .fields
        .iter()
        .filter(|field| !field.is_relation_shadow())
        .filter(|field| !id_mode || field.primary)
        .filter_map(|field| {
            registry
                .find_column(field.annotation_owner(&entity.name), &field.name)
                .map(|annotation| (field, annotation))
        })
        .collect()
}

/// Schema fragment of one column of `owner`
///
/// A nullable column, or a generated one that is not the key being
/// addressed in id mode, may be omitted and defaults to null. Every other
/// column is required.
pub fn build_column_schema(
    driver: &dyn StorageDriver,
    owner: &str,
    field: &FieldMetadata,
    annotation: &ColumnAnnotation,
    options: Options,
) -> KeelResult<Schema> {
    let base = map_type(driver, owner, field, annotation)?;

    let generated_optional = field.generated && !(options.id_mode && field.primary);
    let mut schema = if field.nullable || generated_optional {
        base.optional().default(Value::Null).allow(Value::Null)
    } else {
        base.required()
    };

    if let Some(default) = &annotation.default {
        schema = schema.default(default.clone());
    }
    if let Some(allowed) = &annotation.allowed {
        schema = schema.allow_many(allowed.iter().cloned());
    }

    tracing::trace!(
        entity = owner,
        field = %field.name,
        presence = schema.presence().as_str(),
        "Built column schema"
    );

    Ok(schema)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::DatabaseType;
    use keel_ir::RegistryBuilder;
    use keel_schema::Presence;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const DB: DatabaseType = DatabaseType::SQLite;

    fn build(field: &FieldMetadata, annotation: &ColumnAnnotation, options: Options) -> Schema {
        build_column_schema(&DB, "Tag", field, annotation, options).unwrap()
    }

    #[test]
    fn test_required_column() {
        let field = FieldMetadata::new("name", "varchar").length(50);
        let schema = build(&field, &ColumnAnnotation::new(), Options::new());

        assert!(schema.is_required());
        assert!(schema.validate_missing().is_err());
        assert!(!schema.is_valid(&json!(null)));
    }

    #[test]
    fn test_nullable_column() {
        let field = FieldMetadata::new("note", "text").length(200).nullable();
        let schema = build(&field, &ColumnAnnotation::new(), Options::new());

        assert_eq!(schema.presence(), Presence::Optional);
        assert_eq!(schema.validate_missing().unwrap(), Some(json!(null)));
        assert!(schema.is_valid(&json!(null)));
        assert!(schema.is_valid(&json!("hello")));
    }

    #[test]
    fn test_generated_key_presence_depends_on_mode() {
        let field = FieldMetadata::increment_id();
        let annotation = ColumnAnnotation::new();

        let full = build(&field, &annotation, Options::new());
        assert!(!full.is_required());
        assert!(full.is_valid(&json!(null)));

        let ids = build(&field, &annotation, Options::ids());
        assert!(ids.is_required());
        assert!(!ids.is_valid(&json!(null)));
        assert!(ids.is_valid(&json!(7)));
    }

    #[test]
    fn test_generated_non_key_stays_optional_in_id_mode() {
        let field = FieldMetadata::new("version", "integer").generated("increment");
        let schema = build(&field, &ColumnAnnotation::new(), Options::ids());
        assert!(!schema.is_required());
    }

    #[test]
    fn test_annotation_default_overrides_null_default() {
        let field = FieldMetadata::new("stock", "int").nullable();
        let schema = build(&field, &ColumnAnnotation::new().default(0), Options::new());
        assert_eq!(schema.default_value(), Some(&json!(0)));
        assert_eq!(schema.validate_missing().unwrap(), Some(json!(0)));
    }

    #[test]
    fn test_allow_list_is_additive() {
        let field = FieldMetadata::new("code", "varchar").length(3);
        let annotation = ColumnAnnotation::new().allow("").allow("NONE");
        let schema = build(&field, &annotation, Options::new());

        assert!(schema.is_required());
        assert!(schema.is_valid(&json!("")));
        assert!(schema.is_valid(&json!("NONE")));
        assert!(schema.is_valid(&json!("ABC")));
        assert!(!schema.is_valid(&json!("ABCD")));
    }

    #[test]
    fn test_select_columns() {
        let entity = EntityMetadata::new("Product")
            .with_field(FieldMetadata::increment_id())
            .with_field(FieldMetadata::new("name", "varchar").length(50))
            .with_field(FieldMetadata::new("secret", "varchar"))
            .with_field(FieldMetadata::new("category_id", "integer").foreign_key_of("category"))
            .with_field(FieldMetadata::new("title", "varchar").embedded_from("Page"));

        let registry = RegistryBuilder::new()
            .column("Product", "id", ColumnAnnotation::new())
            .column("Product", "name", ColumnAnnotation::new())
            .column("Product", "category_id", ColumnAnnotation::new())
            .column("Page", "title", ColumnAnnotation::new())
            .build()
            .unwrap();

        let names = |options: Options| -> Vec<String> {
            select_columns(&entity, &registry, &options)
                .into_iter()
                .map(|(field, _)| field.name.clone())
                .collect()
        };

        assert_eq!(names(Options::new()), vec!["id", "name", "title"]);
        assert_eq!(names(Options::ids()), vec!["id"]);
    }

    #[test]
    fn test_join_column_sharing_relation_name() {
        use crate::SchemaGenerator;
        use keel_ir::{Catalog, EntityMetadata, RelationMetadata};

        let catalog = Catalog::new(DB)
            .with_entity(
                EntityMetadata::new("Product")
                    .with_field(FieldMetadata::increment_id())
                    .with_field(FieldMetadata::new("category", "integer").foreign_key_of("category"))
                    .with_relation(RelationMetadata::many_to_one("category", "Category")),
            )
            .and_then(|c| {
                c.with_entity(EntityMetadata::new("Category").with_field(FieldMetadata::increment_id()))
            })
            .unwrap();
        let registry = RegistryBuilder::new()
            .column("Product", "id", ColumnAnnotation::new())
            .column("Product", "category", ColumnAnnotation::new())
            .column("Category", "id", ColumnAnnotation::new())
            .to_one("Product", "category", false)
            .build()
            .unwrap();

        let product = catalog.entity("Product").unwrap();
        assert!(select_columns(product, &registry, &Options::new())
            .iter()
            .all(|(field, _)| field.name == "id"));

        let schema = SchemaGenerator::new(&catalog, &registry)
            .compose_by_name("Product", Options::new())
            .unwrap();
        let keys: Vec<_> = schema.as_object().unwrap().key_names().collect();
        assert_eq!(keys, vec!["id", "category"]);
        assert!(schema.is_valid(&json!({ "category": { "id": 3 } })));
        assert!(!schema.is_valid(&json!({ "category": 3 })));
    }
}
