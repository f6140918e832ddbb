//! Built-in demonstration model
//!
//! A small SQLite shop: products with an embedded page, grouped into
//! categories and labelled with tags.

use keel_ir::prelude::*;

/// Catalog of the demo shop
pub fn catalog() -> KeelResult<Catalog> {
    let category = EntityMetadata::new("Category")
        .with_field(FieldMetadata::increment_id())
        .with_field(FieldMetadata::new("name", "varchar").length(50))
        .with_field(FieldMetadata::new("description", "varchar").length(200))
        .with_relation(RelationMetadata::one_to_many("products", "Product"));

    let product = EntityMetadata::new("Product")
        .with_field(FieldMetadata::increment_id())
        .with_field(
            FieldMetadata::new("title", "varchar")
                .length(100)
                .embedded_from("Page"),
        )
        .with_field(
            FieldMetadata::new("description", "varchar")
                .length(200)
                .embedded_from("Page"),
        )
        .with_field(FieldMetadata::new("name", "varchar").length(50))
        .with_field(
            FieldMetadata::new("price", "float")
                .precision(2)
                .unsigned(),
        )
        .with_field(FieldMetadata::new("categoryId", "integer").foreign_key_of("category"))
        .with_relation(RelationMetadata::many_to_one("category", "Category"))
        .with_relation(RelationMetadata::many_to_many("tags", "Tag"));

    let tag = EntityMetadata::new("Tag")
        .with_field(FieldMetadata::increment_id())
        .with_field(FieldMetadata::new("name", "varchar").length(50));

    Catalog::new(DatabaseType::SQLite)
        .with_entity(category)?
        .with_entity(product)?
        .with_entity(tag)
}

/// Annotations of the demo shop
pub fn registry() -> KeelResult<AnnotationRegistry> {
    RegistryBuilder::new()
        .column("Category", "id", ColumnAnnotation::new())
        .column("Category", "name", ColumnAnnotation::new())
        .column("Category", "description", ColumnAnnotation::new())
        .to_many("Category", "products", false, None)
        .column("Page", "title", ColumnAnnotation::new().min(10.0))
        .column("Page", "description", ColumnAnnotation::new().min(50.0))
        .column("Product", "id", ColumnAnnotation::new())
        .column("Product", "name", ColumnAnnotation::new())
        .column("Product", "price", ColumnAnnotation::new())
        .to_one("Product", "category", false)
        .to_many("Product", "tags", true, None)
        .column("Tag", "id", ColumnAnnotation::new())
        .column("Tag", "name", ColumnAnnotation::new())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_generator::{Options, SchemaGenerator};
    use keel_ir::{Validator, load_model, save_model};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_demo_model_is_consistent() {
        let catalog = catalog().unwrap();
        let registry = registry().unwrap();
        let report = Validator::with_default_rules().validate(&catalog, &registry);
        assert!(report.findings().is_empty(), "{:?}", report.findings());
    }

    #[test]
    fn test_tag_description() {
        let catalog = catalog().unwrap();
        let registry = registry().unwrap();
        let generator = SchemaGenerator::new(&catalog, &registry);

        let schema = generator.compose_by_name("Tag", Options::new()).unwrap();
        assert_eq!(
            schema.describe(),
            json!({
                "type": "object",
                "flags": { "presence": "optional" },
                "keys": {
                    "id": {
                        "type": "number",
                        "flags": { "presence": "optional", "default": null },
                        "allow": [null],
                        "rules": [{ "name": "integer" }, { "name": "positive" }]
                    },
                    "name": {
                        "type": "string",
                        "flags": { "presence": "required" },
                        "rules": [
                            { "name": "trim" },
                            { "name": "min", "args": { "limit": 0 } },
                            { "name": "max", "args": { "limit": 50 } }
                        ]
                    }
                }
            })
        );
    }

    #[test]
    fn test_product_validation() {
        let catalog = catalog().unwrap();
        let registry = registry().unwrap();
        let schema = SchemaGenerator::new(&catalog, &registry)
            .compose_by_name("Product", Options::new())
            .unwrap();

        let product = json!({
            "title": "A sturdy oak desk",
            "description": "Solid oak, two drawers, fits any study or home office setup.",
            "name": " Desk ",
            "price": 199.999,
            "category": { "id": 2 },
            "tags": [{ "name": "furniture" }]
        });
        let normalized = schema.validate(&product).unwrap();

        assert_eq!(normalized["id"], json!(null));
        assert_eq!(normalized["name"], json!("Desk"));
        assert_eq!(normalized["price"], json!(200.0));
        assert_eq!(normalized["tags"], json!([{ "id": null, "name": "furniture" }]));

        let err = schema.validate(&json!({ "title": "short" })).unwrap_err();
        assert_eq!(err.at("title").count(), 1);
        assert_eq!(err.at("category").count(), 1);
    }

    #[test]
    fn test_snapshot_round_trip_composes_identically() {
        let catalog = catalog().unwrap();
        let registry = registry().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.keel.json");
        save_model(&catalog, &registry, &path).unwrap();
        let model = load_model(&path).unwrap();

        let before = SchemaGenerator::new(&catalog, &registry)
            .compose_by_name("Product", Options::new())
            .unwrap();
        let after = SchemaGenerator::new(&model.catalog, &model.registry)
            .compose_by_name("Product", Options::new())
            .unwrap();
        assert_eq!(before, after);
    }
}
