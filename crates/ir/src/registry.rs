//! Annotation registry
//!
//! Annotations are collected through a [`RegistryBuilder`] during setup and
//! frozen into an immutable [`AnnotationRegistry`] before any schema is
//! generated. The registry is passed explicitly to every generation call.
//!
//! ```rust,ignore
//! use keel_ir::{ColumnAnnotation, Count, RegistryBuilder};
//!
//! let registry = RegistryBuilder::new()
//!     .column("Tag", "id", ColumnAnnotation::new())
//!     .column("Tag", "name", ColumnAnnotation::new())
//!     .to_many("Product", "tags", true, Some(Count::between(1, 5)))
//!     .build()?;
//!
//! assert!(registry.find_column("Tag", "name").is_some());
//! ```

use crate::annotation::{ColumnAnnotation, Count, RelationAnnotation};
use keel_core::{KeelError, KeelResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// Entries
// ============================================================================

/// A column annotation together with the property it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnEntry {
    /// Name of the owning type
    pub entity: String,

    /// Property name
    pub property: String,

    #[serde(default)]
    pub annotation: ColumnAnnotation,
}

/// A relation annotation together with the property it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationEntry {
    /// Name of the owning type
    pub entity: String,

    /// Property name
    pub property: String,

    #[serde(default)]
    pub annotation: RelationAnnotation,
}

// ============================================================================
// AnnotationRegistry
// ============================================================================

/// Immutable store of column and relation annotations
///
/// Entries keep their registration order. Lookup is an exact match on the
/// owning type name and the property name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationRegistry {
    columns: Vec<ColumnEntry>,
    relations: Vec<RelationEntry>,
}

impl AnnotationRegistry {
    /// Registry with no annotations
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start collecting annotations
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Column annotation of `entity.property`
    pub fn find_column(&self, entity: &str, property: &str) -> Option<&ColumnAnnotation> {
        self.columns
            .iter()
            .find(|e| e.entity == entity && e.property == property)
            .map(|e| &e.annotation)
    }

    /// Relation annotation of `entity.property`
    pub fn find_relation(&self, entity: &str, property: &str) -> Option<&RelationAnnotation> {
        self.relations
            .iter()
            .find(|e| e.entity == entity && e.property == property)
            .map(|e| &e.annotation)
    }

    /// Column entries in registration order
    pub fn columns(&self) -> &[ColumnEntry] {
        &self.columns
    }

    /// Relation entries in registration order
    pub fn relations(&self) -> &[RelationEntry] {
        &self.relations
    }

    /// Total number of annotations
    pub fn len(&self) -> usize {
        self.columns.len() + self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.relations.is_empty()
    }

    /// Reopen the registry for further registrations
    pub fn into_builder(self) -> RegistryBuilder {
        RegistryBuilder {
            columns: self.columns,
            relations: self.relations,
        }
    }
}

// ============================================================================
// RegistryBuilder
// ============================================================================

/// Collects annotations and checks them for duplicates
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    columns: Vec<ColumnEntry>,
    relations: Vec<RelationEntry>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a column annotation
    pub fn column(
        mut self,
        entity: impl Into<String>,
        property: impl Into<String>,
        annotation: ColumnAnnotation,
    ) -> Self {
        self.columns.push(ColumnEntry {
            entity: entity.into(),
            property: property.into(),
            annotation,
        });
        self
    }

    /// Register a relation annotation
    pub fn relation(
        mut self,
        entity: impl Into<String>,
        property: impl Into<String>,
        annotation: RelationAnnotation,
    ) -> Self {
        self.relations.push(RelationEntry {
            entity: entity.into(),
            property: property.into(),
            annotation,
        });
        self
    }

    /// Register a to-one relation annotation
    pub fn to_one(
        self,
        entity: impl Into<String>,
        property: impl Into<String>,
        include: bool,
    ) -> Self {
        let annotation = RelationAnnotation {
            include,
            ..RelationAnnotation::new()
        };
        self.relation(entity, property, annotation)
    }

    /// Register a to-many relation annotation
    pub fn to_many(
        self,
        entity: impl Into<String>,
        property: impl Into<String>,
        include: bool,
        count: Option<Count>,
    ) -> Self {
        let annotation = RelationAnnotation {
            include,
            count,
            ..RelationAnnotation::new()
        };
        self.relation(entity, property, annotation)
    }

    /// Append previously collected entries
    pub fn extend(mut self, columns: Vec<ColumnEntry>, relations: Vec<RelationEntry>) -> Self {
        self.columns.extend(columns);
        self.relations.extend(relations);
        self
    }

    /// Freeze the collected annotations
    ///
    /// Fails with [`KeelError::DuplicateAnnotation`] when one property carries
    /// two annotations of the same kind.
    pub fn build(self) -> KeelResult<AnnotationRegistry> {
        let mut seen = HashSet::new();
        for entry in &self.columns {
            if !seen.insert((entry.entity.as_str(), entry.property.as_str())) {
                return Err(KeelError::DuplicateAnnotation {
                    entity: entry.entity.clone(),
                    property: entry.property.clone(),
                    kind: "column",
                });
            }
        }

        let mut seen = HashSet::new();
        for entry in &self.relations {
            if !seen.insert((entry.entity.as_str(), entry.property.as_str())) {
                return Err(KeelError::DuplicateAnnotation {
                    entity: entry.entity.clone(),
                    property: entry.property.clone(),
                    kind: "relation",
                });
            }
        }

        Ok(AnnotationRegistry {
            columns: self.columns,
            relations: self.relations,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AnnotationRegistry {
        RegistryBuilder::new()
            .column("Tag", "id", ColumnAnnotation::new())
            .column("Tag", "name", ColumnAnnotation::new().max(50.0))
            .to_one("Product", "category", false)
            .to_many("Product", "tags", true, Some(Count::between(1, 5)))
            .build()
            .unwrap()
    }

    #[test]
    fn test_find_column() {
        let registry = registry();
        let name = registry.find_column("Tag", "name").unwrap();
        assert_eq!(name.max, Some(50.0));
        assert!(registry.find_column("Tag", "missing").is_none());
        assert!(registry.find_column("Product", "name").is_none());
    }

    #[test]
    fn test_find_relation() {
        let registry = registry();
        let tags = registry.find_relation("Product", "tags").unwrap();
        assert!(tags.include);
        assert_eq!(tags.count, Some(Count::between(1, 5)));

        let category = registry.find_relation("Product", "category").unwrap();
        assert!(!category.include);
        assert!(category.count.is_none());
    }

    #[test]
    fn test_kinds_are_separate() {
        let registry = registry();
        assert!(registry.find_column("Product", "tags").is_none());
        assert!(registry.find_relation("Tag", "name").is_none());
    }

    #[test]
    fn test_duplicate_column_fails() {
        let result = RegistryBuilder::new()
            .column("Tag", "name", ColumnAnnotation::new())
            .column("Tag", "name", ColumnAnnotation::new().max(10.0))
            .build();

        match result {
            Err(KeelError::DuplicateAnnotation { entity, property, kind }) => {
                assert_eq!(entity, "Tag");
                assert_eq!(property, "name");
                assert_eq!(kind, "column");
            }
            other => panic!("Expected DuplicateAnnotation, got {:?}", other),
        }
    }

    #[test]
    fn test_same_property_different_kinds_is_allowed() {
        let result = RegistryBuilder::new()
            .column("Product", "category", ColumnAnnotation::new())
            .to_one("Product", "category", true)
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_duplicate_relation_fails() {
        let err = RegistryBuilder::new()
            .to_one("Product", "category", false)
            .to_one("Product", "category", true)
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Duplicate relation annotation for 'Product.category'"
        );
    }

    #[test]
    fn test_into_builder_round_trip() {
        let registry = registry();
        let extended = registry
            .clone()
            .into_builder()
            .column("Category", "id", ColumnAnnotation::new())
            .build()
            .unwrap();
        assert_eq!(extended.len(), registry.len() + 1);
        assert!(AnnotationRegistry::empty().is_empty());
    }
}
