//! Model snapshots
//!
//! A model snapshot stores a catalog together with its annotations as one
//! JSON document, so that schemas can be generated for a model without the
//! code that declared it.

use crate::catalog::Catalog;
use crate::entity::EntityMetadata;
use crate::registry::{AnnotationRegistry, ColumnEntry, RegistryBuilder, RelationEntry};
use crate::SCHEMA_VERSION;
use keel_core::{DatabaseType, KeelError, KeelResult, SnapshotAction};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Model
// ============================================================================

/// A catalog and the annotations registered against it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub catalog: Catalog,
    pub registry: AnnotationRegistry,
}

impl Model {
    pub fn new(catalog: Catalog, registry: AnnotationRegistry) -> Self {
        Self { catalog, registry }
    }
}

// ============================================================================
// Model File Wrapper
// ============================================================================

/// On-disk layout of a model snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    /// Schema version for migration purposes
    pub schema_version: u32,

    /// Database whose driver facts apply
    #[serde(default)]
    pub database: DatabaseType,

    #[serde(default)]
    pub entities: Vec<EntityMetadata>,

    /// Column annotations in registration order
    #[serde(default)]
    pub columns: Vec<ColumnEntry>,

    /// Relation annotations in registration order
    #[serde(default)]
    pub relations: Vec<RelationEntry>,
}

impl ModelFile {
    /// Snapshot a catalog and its registry
    pub fn new(catalog: &Catalog, registry: &AnnotationRegistry) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            database: catalog.database,
            entities: catalog.entities().cloned().collect(),
            columns: registry.columns().to_vec(),
            relations: registry.relations().to_vec(),
        }
    }

    /// Check if migration is needed
    pub fn needs_migration(&self) -> bool {
        self.schema_version < SCHEMA_VERSION
    }

    /// Migrate to the latest schema version
    pub fn migrate(&mut self) -> KeelResult<()> {
        if self.schema_version > SCHEMA_VERSION {
            return Err(KeelError::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                found: self.schema_version,
            });
        }
        while self.schema_version < SCHEMA_VERSION {
            self.migrate_one_version()?;
        }
        Ok(())
    }

    fn migrate_one_version(&mut self) -> KeelResult<()> {
        match self.schema_version {
            // Version 0 snapshots carry the same layout
            0 => self.schema_version = 1,
            found => {
                return Err(KeelError::SchemaVersionMismatch {
                    expected: SCHEMA_VERSION,
                    found,
                });
            }
        }
        Ok(())
    }

    /// Rebuild the catalog and the registry
    ///
    /// Duplicate annotations fail here just as they do in code.
    pub fn into_model(mut self) -> KeelResult<Model> {
        self.migrate()?;
        let registry = RegistryBuilder::new()
            .extend(self.columns, self.relations)
            .build()?;
        let catalog = Catalog::from_parts(self.database, self.entities);
        Ok(Model::new(catalog, registry))
    }
}

// ============================================================================
// Save Functions
// ============================================================================

/// Save a model to a file
///
/// # Example
///
/// ```rust,ignore
/// use keel_ir::{save_model, Catalog, AnnotationRegistry};
///
/// save_model(&catalog, &registry, "shop.json")?;
/// ```
pub fn save_model(
    catalog: &Catalog,
    registry: &AnnotationRegistry,
    path: impl AsRef<Path>,
) -> KeelResult<()> {
    let path = path.as_ref();
    let json = save_model_to_string(catalog, registry)?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| KeelError::snapshot(SnapshotAction::CreateDirectory, parent, e))?;
        }
    }

    std::fs::write(path, json).map_err(|e| KeelError::snapshot(SnapshotAction::Write, path, e))?;

    tracing::debug!(path = %path.display(), entities = catalog.len(), "Saved model snapshot");
    Ok(())
}

/// Save a model to a pretty printed JSON string
pub fn save_model_to_string(catalog: &Catalog, registry: &AnnotationRegistry) -> KeelResult<String> {
    let file = ModelFile::new(catalog, registry);
    Ok(serde_json::to_string_pretty(&file)?)
}

// ============================================================================
// Load Functions
// ============================================================================

/// Load a model from a file
pub fn load_model(path: impl AsRef<Path>) -> KeelResult<Model> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(KeelError::ModelNotFound(path.to_path_buf()));
    }

    let json = std::fs::read_to_string(path)
        .map_err(|e| KeelError::snapshot(SnapshotAction::Read, path, e))?;

    let model = load_model_from_str(&json).map_err(|e| match e {
        KeelError::Json(je) => KeelError::snapshot(SnapshotAction::Read, path, je),
        other => other,
    })?;

    tracing::debug!(path = %path.display(), entities = model.catalog.len(), "Loaded model snapshot");
    Ok(model)
}

/// Load a model from a JSON string
pub fn load_model_from_str(json: &str) -> KeelResult<Model> {
    let file: ModelFile = serde_json::from_str(json)?;
    file.into_model()
}

/// Load a model from bytes
pub fn load_model_from_bytes(bytes: &[u8]) -> KeelResult<Model> {
    let json = std::str::from_utf8(bytes)
        .map_err(|e| KeelError::InvalidModelFormat(format!("Invalid UTF-8: {}", e)))?;
    load_model_from_str(json)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{ColumnAnnotation, Count};
    use crate::field::FieldMetadata;
    use crate::relation::RelationMetadata;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    fn model() -> Model {
        let catalog = Catalog::new(DatabaseType::SQLite)
            .with_entity(
                EntityMetadata::new("Tag")
                    .with_field(FieldMetadata::increment_id())
                    .with_field(FieldMetadata::new("name", "varchar").length(50)),
            )
            .and_then(|c| {
                c.with_entity(
                    EntityMetadata::new("Product")
                        .with_field(FieldMetadata::increment_id())
                        .with_relation(RelationMetadata::many_to_many("tags", "Tag")),
                )
            })
            .unwrap();

        let registry = RegistryBuilder::new()
            .column("Tag", "id", ColumnAnnotation::new())
            .column("Tag", "name", ColumnAnnotation::new().default(Value::Null))
            .column("Product", "id", ColumnAnnotation::new())
            .to_many("Product", "tags", true, Some(Count::between(1, 5)))
            .build()
            .unwrap();

        Model::new(catalog, registry)
    }

    #[test]
    fn test_save_and_load_model() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("shop.json");

        let model = model();
        save_model(&model.catalog, &model.registry, &path).unwrap();
        assert!(path.exists());

        let loaded = load_model(&path).unwrap();
        assert_eq!(loaded, model);
    }

    #[test]
    fn test_null_default_survives_snapshot() {
        let model = model();
        let json = save_model_to_string(&model.catalog, &model.registry).unwrap();
        let loaded = load_model_from_str(&json).unwrap();

        let name = loaded.registry.find_column("Tag", "name").unwrap();
        assert_eq!(name.default, Some(Value::Null));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_model("/nonexistent/path/model.json");

        if let Err(KeelError::ModelNotFound(path)) = result {
            assert!(path.to_string_lossy().contains("nonexistent"));
        } else {
            panic!("Expected ModelNotFound error");
        }
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            load_model(&path),
            Err(KeelError::Snapshot {
                action: SnapshotAction::Read,
                ..
            })
        ));
    }

    #[test]
    fn test_minimal_document() {
        let model = load_model_from_str(
            &json!({
                "schema_version": 1,
                "database": "mysql",
                "entities": [
                    { "name": "Tag", "fields": [{ "name": "id", "type_tag": "int", "primary": true }] }
                ],
                "columns": [{ "entity": "Tag", "property": "id" }]
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(model.catalog.database, DatabaseType::MySQL);
        assert!(model.catalog.entity("Tag").is_some());
        assert!(model.registry.find_column("Tag", "id").is_some());
        assert!(model.registry.relations().is_empty());
    }

    #[test]
    fn test_duplicate_annotations_rejected() {
        let json = json!({
            "schema_version": 1,
            "columns": [
                { "entity": "Tag", "property": "id" },
                { "entity": "Tag", "property": "id" }
            ]
        });
        let result = load_model_from_str(&json.to_string());
        assert!(matches!(result, Err(KeelError::DuplicateAnnotation { .. })));
    }

    #[test]
    fn test_version_handling() {
        let mut file = ModelFile::new(&Catalog::default(), &AnnotationRegistry::empty());
        assert!(!file.needs_migration());

        file.schema_version = 0;
        assert!(file.needs_migration());
        file.migrate().unwrap();
        assert_eq!(file.schema_version, SCHEMA_VERSION);

        file.schema_version = SCHEMA_VERSION + 1;
        assert!(matches!(
            file.into_model(),
            Err(KeelError::SchemaVersionMismatch { .. })
        ));
    }

    #[test]
    fn test_load_from_bytes() {
        let model = model();
        let json = save_model_to_string(&model.catalog, &model.registry).unwrap();
        assert_eq!(load_model_from_bytes(json.as_bytes()).unwrap(), model);
        assert!(matches!(
            load_model_from_bytes(&[0xff, 0xfe]),
            Err(KeelError::InvalidModelFormat(_))
        ));
    }
}
