//! The entity catalog
//!
//! The catalog is the read-only metadata graph handed to the schema
//! generator. It owns every entity and resolves relation targets by name.

use crate::entity::EntityMetadata;
use crate::relation::RelationMetadata;
use keel_core::{DatabaseType, KeelError, KeelResult, Validatable};
use serde::{Deserialize, Serialize};

/// All entities of one data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Database whose driver facts apply to the entities
    #[serde(default)]
    pub database: DatabaseType,

    /// Entities in registration order
    #[serde(default)]
    entities: Vec<EntityMetadata>,
}

impl Catalog {
    /// Create an empty catalog for a database
    pub fn new(database: DatabaseType) -> Self {
        Self {
            database,
            entities: Vec::new(),
        }
    }

    /// Add an entity (builder form)
    pub fn with_entity(mut self, entity: EntityMetadata) -> KeelResult<Self> {
        self.add_entity(entity)?;
        Ok(self)
    }

    /// Add an entity
    ///
    /// The entity must pass its own consistency checks and its name must not
    /// be taken yet.
    pub fn add_entity(&mut self, entity: EntityMetadata) -> KeelResult<()> {
        entity.validate()?;
        if self.contains(&entity.name) {
            return Err(KeelError::inconsistent_entity(
                &entity.name,
                "An entity with this name already exists",
            ));
        }
        self.entities.push(entity);
        Ok(())
    }

    /// Get an entity by name
    pub fn entity(&self, name: &str) -> Option<&EntityMetadata> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Get an entity by name, failing with `EntityNotFound`
    pub fn require(&self, name: &str) -> KeelResult<&EntityMetadata> {
        self.entity(name)
            .ok_or_else(|| KeelError::EntityNotFound(name.to_string()))
    }

    /// Resolve the target entity of a relation
    pub fn target_of(&self, relation: &RelationMetadata) -> KeelResult<&EntityMetadata> {
        self.require(&relation.target)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entity(name).is_some()
    }

    /// Entities in registration order
    pub fn entities(&self) -> impl Iterator<Item = &EntityMetadata> {
        self.entities.iter()
    }

    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Relations, with their owner, whose target is `name`
    pub fn relations_to<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (&'a EntityMetadata, &'a RelationMetadata)> {
        self.entities.iter().flat_map(move |entity| {
            entity
                .relations
                .iter()
                .filter(move |r| r.target == name)
                .map(move |r| (entity, r))
        })
    }

    /// Build a catalog from entities without per-entity checks
    ///
    /// Used when loading snapshots; run the [`crate::Validator`] afterwards.
    pub(crate) fn from_parts(database: DatabaseType, entities: Vec<EntityMetadata>) -> Self {
        Self { database, entities }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldMetadata;

    fn catalog() -> Catalog {
        Catalog::new(DatabaseType::SQLite)
            .with_entity(
                EntityMetadata::new("Category")
                    .with_field(FieldMetadata::increment_id())
                    .with_relation(RelationMetadata::one_to_many("products", "Product")),
            )
            .and_then(|c| {
                c.with_entity(
                    EntityMetadata::new("Product")
                        .with_field(FieldMetadata::increment_id())
                        .with_relation(RelationMetadata::many_to_one("category", "Category"))
                        .with_relation(RelationMetadata::many_to_one("vendor", "Vendor")),
                )
            })
            .unwrap()
    }

    #[test]
    fn test_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("Product"));
        assert!(catalog.entity("Tag").is_none());
        assert_eq!(catalog.entity_names().collect::<Vec<_>>(), vec!["Category", "Product"]);
    }

    #[test]
    fn test_target_of() {
        let catalog = catalog();
        let product = catalog.require("Product").unwrap();

        let category = product.relation("category").unwrap();
        assert_eq!(catalog.target_of(category).unwrap().name, "Category");

        let vendor = product.relation("vendor").unwrap();
        match catalog.target_of(vendor) {
            Err(KeelError::EntityNotFound(name)) => assert_eq!(name, "Vendor"),
            other => panic!("Expected EntityNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_entity_rejected() {
        let mut catalog = catalog();
        let result = catalog.add_entity(EntityMetadata::new("Product"));
        assert!(result.is_err());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_invalid_entity_rejected() {
        let mut catalog = Catalog::default();
        assert!(catalog.add_entity(EntityMetadata::new("")).is_err());
        assert!(catalog.is_empty());
        assert_eq!(catalog.database, DatabaseType::PostgreSQL);
    }

    #[test]
    fn test_relations_to() {
        let catalog = catalog();
        let incoming: Vec<_> = catalog
            .relations_to("Category")
            .map(|(owner, r)| format!("{}.{}", owner.name, r.name))
            .collect();
        assert_eq!(incoming, vec!["Product.category"]);
    }
}
