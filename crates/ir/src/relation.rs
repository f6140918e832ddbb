//! Relation metadata
//!
//! Relations reference their target entity by name; the [`crate::Catalog`]
//! resolves the name. This keeps self-referential and mutually referential
//! entity graphs representable without shared ownership.

use keel_core::{Cardinality, RelationType};
use serde::{Deserialize, Serialize};

// ============================================================================
// RelationMetadata
// ============================================================================

/// Structural facts about a reference from one entity to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationMetadata {
    /// Property name on the owning entity (e.g., "category", "tags")
    pub name: String,

    /// Relation kind reported by the persistence layer
    pub relation_type: RelationType,

    /// Name of the related entity
    pub target: String,

    /// Whether a to-one relation may be null
    #[serde(default)]
    pub nullable: bool,

    /// Whether the relation is part of the owner's primary key
    #[serde(default)]
    pub primary: bool,
}

impl RelationMetadata {
    /// Create a non-nullable relation of the given kind
    pub fn new(
        name: impl Into<String>,
        relation_type: RelationType,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            relation_type,
            target: target.into(),
            nullable: false,
            primary: false,
        }
    }

    /// One-to-one relation
    pub fn to_one(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationType::OneToOne, target)
    }

    pub fn many_to_one(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationType::ManyToOne, target)
    }

    pub fn one_to_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationType::OneToMany, target)
    }

    pub fn many_to_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationType::ManyToMany, target)
    }

    /// Allow null (to-one relations only)
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark as part of the primary key
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Cardinality bucket, `None` when the kind is not recognized
    pub fn cardinality(&self) -> Option<Cardinality> {
        self.relation_type.cardinality()
    }

    pub fn is_to_one(&self) -> bool {
        self.cardinality() == Some(Cardinality::ToOne)
    }

    pub fn is_to_many(&self) -> bool {
        self.cardinality() == Some(Cardinality::ToMany)
    }

    /// Whether the relation points back at its owner
    pub fn is_self_referential(&self, owner: &str) -> bool {
        self.target == owner
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_kind() {
        assert_eq!(
            RelationMetadata::to_one("profile", "Profile").relation_type,
            RelationType::OneToOne
        );
        assert_eq!(
            RelationMetadata::many_to_one("category", "Category").relation_type,
            RelationType::ManyToOne
        );
        assert_eq!(
            RelationMetadata::one_to_many("products", "Product").relation_type,
            RelationType::OneToMany
        );
        assert_eq!(
            RelationMetadata::many_to_many("tags", "Tag").relation_type,
            RelationType::ManyToMany
        );
    }

    #[test]
    fn test_cardinality() {
        assert!(RelationMetadata::many_to_one("category", "Category").is_to_one());
        assert!(RelationMetadata::many_to_many("tags", "Tag").is_to_many());

        let odd = RelationMetadata::new("links", RelationType::Other("graph".into()), "Node");
        assert_eq!(odd.cardinality(), None);
        assert!(!odd.is_to_one());
        assert!(!odd.is_to_many());
    }

    #[test]
    fn test_self_reference() {
        let parent = RelationMetadata::many_to_one("parent", "Category").nullable();
        assert!(parent.is_self_referential("Category"));
        assert!(!parent.is_self_referential("Product"));
        assert!(parent.nullable);
    }

    #[test]
    fn test_serde_kind_names() {
        let json = serde_json::to_value(RelationMetadata::many_to_one("category", "Category")).unwrap();
        assert_eq!(json["relation_type"], "many_to_one");

        let back: RelationMetadata = serde_json::from_value(serde_json::json!({
            "name": "links",
            "relation_type": "graph",
            "target": "Node"
        }))
        .unwrap();
        assert_eq!(back.relation_type, RelationType::Other("graph".into()));
    }
}
