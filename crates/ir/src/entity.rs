//! Entity metadata
//!
//! An `EntityMetadata` is the read-only description of one persisted record
//! type: its name, its columns and its relations, both in declaration order.

use crate::field::FieldMetadata;
use crate::relation::RelationMetadata;
use keel_core::{KeelError, KeelResult, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// EntityMetadata
// ============================================================================

/// Represents a persisted record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// Entity name (PascalCase, e.g., "Product", "Category")
    pub name: String,

    /// Columns in declaration order
    #[serde(default)]
    pub fields: Vec<FieldMetadata>,

    /// Relations in declaration order
    #[serde(default)]
    pub relations: Vec<RelationMetadata>,
}

impl EntityMetadata {
    /// Create an entity with no fields or relations
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            relations: Vec::new(),
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Append a field
    pub fn with_field(mut self, field: FieldMetadata) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a relation
    pub fn with_relation(mut self, relation: RelationMetadata) -> Self {
        self.relations.push(relation);
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get a field by property name
    pub fn field(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get a relation by property name
    pub fn relation(&self, name: &str) -> Option<&RelationMetadata> {
        self.relations.iter().find(|r| r.name == name)
    }

    /// Whether a field or relation has this property name
    pub fn has_property(&self, name: &str) -> bool {
        self.field(name).is_some() || self.relation(name).is_some()
    }

    /// Primary key fields
    pub fn primary_fields(&self) -> impl Iterator<Item = &FieldMetadata> {
        self.fields.iter().filter(|f| f.primary)
    }

    /// Relations that are part of the primary key
    pub fn primary_relations(&self) -> impl Iterator<Item = &RelationMetadata> {
        self.relations.iter().filter(|r| r.primary)
    }

    /// Whether any field or relation is part of the primary key
    pub fn has_primary_key(&self) -> bool {
        self.primary_fields().next().is_some() || self.primary_relations().next().is_some()
    }

    /// Property names of fields and relations, fields first
    ///
    /// A join column named after the relation it backs shares that
    /// relation's property and is listed once, as the relation.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| !self.is_join_column_of_same_name(f))
            .map(|f| f.name.as_str())
            .chain(self.relations.iter().map(|r| r.name.as_str()))
    }

    fn is_join_column_of_same_name(&self, field: &FieldMetadata) -> bool {
        field.foreign_key_of.as_deref() == Some(field.name.as_str())
            && self.relation(&field.name).is_some()
    }

    /// Relations pointing back at this entity
    pub fn self_references(&self) -> impl Iterator<Item = &RelationMetadata> {
        self.relations
            .iter()
            .filter(|r| r.is_self_referential(&self.name))
    }
}

impl Validatable for EntityMetadata {
    fn validate(&self) -> KeelResult<()> {
        if self.name.trim().is_empty() {
            return Err(KeelError::metadata("Entity name cannot be empty"));
        }

        let mut seen = HashSet::new();
        for property in self.property_names() {
            if property.is_empty() {
                return Err(KeelError::inconsistent_entity(
                    &self.name,
                    "Property name cannot be empty",
                ));
            }
            if !seen.insert(property) {
                return Err(KeelError::inconsistent_entity(
                    &self.name,
                    format!("Duplicate property name: '{}'", property),
                ));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn category() -> EntityMetadata {
        EntityMetadata::new("Category")
            .with_field(FieldMetadata::increment_id())
            .with_field(FieldMetadata::new("name", "varchar").length(50))
            .with_relation(RelationMetadata::one_to_many("products", "Product"))
            .with_relation(RelationMetadata::many_to_one("parent", "Category").nullable())
    }

    #[test]
    fn test_lookup() {
        let entity = category();
        assert!(entity.field("name").is_some());
        assert!(entity.relation("products").is_some());
        assert!(entity.field("products").is_none());
        assert!(entity.has_property("parent"));
        assert!(!entity.has_property("missing"));
    }

    #[test]
    fn test_primary_key() {
        let entity = category();
        assert!(entity.has_primary_key());
        assert_eq!(entity.primary_fields().count(), 1);
        assert!(!EntityMetadata::new("Page").has_primary_key());
    }

    #[test]
    fn test_property_names_order() {
        let entity = category();
        let names: Vec<_> = entity.property_names().collect();
        assert_eq!(names, vec!["id", "name", "products", "parent"]);
    }

    #[test]
    fn test_self_references() {
        let entity = category();
        let refs: Vec<_> = entity.self_references().map(|r| r.name.as_str()).collect();
        assert_eq!(refs, vec!["parent"]);
    }

    #[test]
    fn test_validate() {
        assert!(category().is_valid());
        assert!(!EntityMetadata::new("  ").is_valid());

        let duplicate = category().with_field(FieldMetadata::new("parent", "integer"));
        let errors = duplicate.validation_errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Duplicate property name: 'parent'"));
    }

    #[test]
    fn test_join_column_named_after_relation() {
        let entity = EntityMetadata::new("Product")
            .with_field(FieldMetadata::increment_id())
            .with_field(FieldMetadata::new("category", "integer").foreign_key_of("category"))
            .with_relation(RelationMetadata::many_to_one("category", "Category"));

        assert!(entity.is_valid());
        let names: Vec<_> = entity.property_names().collect();
        assert_eq!(names, vec!["id", "category"]);

        // Without a relation to back, the same field is an ordinary duplicate
        let clash = EntityMetadata::new("Product")
            .with_field(FieldMetadata::new("vendor", "integer").foreign_key_of("vendor"))
            .with_field(FieldMetadata::new("vendor", "integer"));
        assert!(!clash.is_valid());
    }
}
