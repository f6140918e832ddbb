//! # Relation Schema Builder
//!
//! Shapes the composed schema of a related entity by the relation's
//! cardinality: to-one relations keep the entity schema, to-many relations
//! wrap it in an array with an optional count constraint.
//!
//! Recursion into the related entity is driven by the composer in
//! [`crate::generator`]; this module only selects and shapes.

use crate::options::Options;
use keel_core::{Cardinality, KeelError, KeelResult};
use keel_ir::{AnnotationRegistry, Count, EntityMetadata, RelationAnnotation, RelationMetadata};
use keel_schema::{ArraySchema, LengthBounded, Schema};
use serde_json::{Value, json};

/// Relations of `entity` that take part in generation, in declaration order
///
/// Only annotated relations are kept; in id mode only primary relations
/// remain.
pub fn select_relations<'a>(
    entity: &'a EntityMetadata,
    registry: &'a AnnotationRegistry,
    options: &Options,
) -> Vec<(&'a RelationMetadata, &'a RelationAnnotation)> {
    let id_mode = options.id_mode;
    entity
        .relations
        .iter()
        .filter(|relation| !id_mode || relation.primary)
        .filter_map(|relation| {
            registry
                .find_relation(&entity.name, &relation.name)
                .map(|annotation| (relation, annotation))
        })
        .collect()
}

/// Cardinality of a relation, or a configuration error for unknown kinds
pub(crate) fn cardinality_of(owner: &str, relation: &RelationMetadata) -> KeelResult<Cardinality> {
    relation.cardinality().ok_or_else(|| {
        KeelError::invalid_relation(
            owner,
            relation.name.as_str(),
            relation.relation_type.as_str(),
        )
    })
}

/// Wrap the composed schema of the related entity according to cardinality
pub(crate) fn shape_relation(
    relation: &RelationMetadata,
    cardinality: Cardinality,
    annotation: &RelationAnnotation,
    composed: Schema,
) -> Schema {
    let schema = match cardinality {
        Cardinality::ToOne if relation.nullable => {
            composed.optional().default(Value::Null).allow(Value::Null)
        }
        Cardinality::ToOne => composed.required(),
        Cardinality::ToMany => {
            let items = apply_count(ArraySchema::of(composed.required()), annotation.count.as_ref());
            Schema::from(items).default(json!([]))
        }
    };

    match &annotation.default {
        Some(default) => schema.default(default.clone()),
        None => schema,
    }
}

fn apply_count(array: ArraySchema, count: Option<&Count>) -> ArraySchema {
    match count {
        None => array,
        Some(Count::Exact(n)) => array.length(*n),
        Some(Count::Range { min, max }) => {
            let array = match min {
                Some(min) => array.min_length(*min),
                None => array,
            };
            match max {
                Some(max) => array.max_length(*max),
                None => array,
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
