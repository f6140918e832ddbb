//! # Entity Schema Composer
//!
//! The `SchemaGenerator` is the top-level entry point for schema derivation.
//! It reads an entity from a [`Catalog`], picks the annotated columns and
//! relations, and assembles one object schema keyed by property name.
//!
//! ## Pipeline
//!
//! ```text
//! EntityMetadata + Options
//!         │
//!         ├──► select_columns()   → build_column_schema()  per column
//!         ├──► select_relations() → compose target (depth + 1)
//!         │                         → shape_relation()     per relation
//!         ▼
//!   ObjectSchema { property → fragment }
//!         │
//!         └──► mixed ids: alternatives(object, single fragment)
//! ```
//!
//! Nested entities are generated in id mode unless their relation is
//! included and the current level is neither in id mode nor ignoring
//! includes. A graph where every edge of a cycle is included still
//! terminates: composition deeper than `Options::max_depth` fails with
//! `DepthExceeded`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use keel_generator::{Options, SchemaGenerator};
//!
//! let generator = SchemaGenerator::new(&catalog, &registry);
//! let schema = generator.compose_by_name("Product", Options::new())?;
//!
//! println!("{}", schema.describe());
//! ```

use keel_core::{KeelError, KeelResult, StorageDriver};
use keel_ir::{
    AnnotationRegistry, Catalog, ColumnAnnotation, EntityMetadata, FieldMetadata,
    RelationAnnotation, RelationMetadata,
};
use keel_schema::{ObjectSchema, Schema};

use crate::columns::{build_column_schema, select_columns};
use crate::options::Options;
use crate::relations::{cardinality_of, select_relations, shape_relation};

// ============================================================================
// SchemaGenerator
// ============================================================================

/// Derives validation schemas for the entities of one catalog
///
/// The generator only borrows its inputs; it holds no state between calls
/// and may be shared freely.
#[derive(Clone, Copy)]
pub struct SchemaGenerator<'a> {
    catalog: &'a Catalog,
    registry: &'a AnnotationRegistry,
    driver: &'a dyn StorageDriver,
}

impl std::fmt::Debug for SchemaGenerator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaGenerator")
            .field("entities", &self.catalog.len())
            .field("annotations", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl<'a> SchemaGenerator<'a> {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Create a generator using the catalog's database as storage driver
    pub fn new(catalog: &'a Catalog, registry: &'a AnnotationRegistry) -> Self {
        Self {
            catalog,
            registry,
            driver: &catalog.database,
        }
    }

    /// Use a different storage driver for type normalization and defaults
    pub fn with_driver(mut self, driver: &'a dyn StorageDriver) -> Self {
        self.driver = driver;
        self
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn registry(&self) -> &'a AnnotationRegistry {
        self.registry
    }

    // ====================================================================
    // Composition
    // ====================================================================

    /// Compose the schema of an entity
    ///
    /// # Errors
    ///
    /// Fails on an unknown generation strategy or relation kind anywhere in
    /// the composed subtree, on a relation whose target is missing from the
    /// catalog, and when nesting exceeds `options.max_depth`. No partial
    /// schema is returned.
    pub fn compose(&self, entity: &EntityMetadata, options: Options) -> KeelResult<Schema> {
        self.compose_at(entity, options, 0)
    }

    /// Compose the schema of the entity registered under `name`
    pub fn compose_by_name(&self, name: &str, options: Options) -> KeelResult<Schema> {
        let entity = self.catalog.require(name)?;
        self.compose(entity, options)
    }

    /// Schema fragment of one column of `owner`
    pub fn build_column(
        &self,
        owner: &str,
        field: &FieldMetadata,
        annotation: &ColumnAnnotation,
        options: Options,
    ) -> KeelResult<Schema> {
        build_column_schema(self.driver, owner, field, annotation, options)
    }

    /// Schema fragment of one relation of `owner`
    pub fn build_relation(
        &self,
        owner: &str,
        relation: &RelationMetadata,
        annotation: &RelationAnnotation,
        options: Options,
    ) -> KeelResult<Schema> {
        self.relation_at(owner, relation, annotation, options, 0)
    }

    fn compose_at(
        &self,
        entity: &EntityMetadata,
        options: Options,
        depth: usize,
    ) -> KeelResult<Schema> {
        if depth > options.max_depth {
            return Err(KeelError::DepthExceeded {
                entity: entity.name.clone(),
                limit: options.max_depth,
            });
        }

        let mut object = ObjectSchema::new();

        for (field, annotation) in select_columns(entity, self.registry, &options) {
            let fragment = self.build_column(&entity.name, field, annotation, options)?;
            object.insert(field.name.as_str(), fragment);
        }

        for (relation, annotation) in select_relations(entity, self.registry, &options) {
            let fragment = self.relation_at(&entity.name, relation, annotation, options, depth)?;
            object.insert(relation.name.as_str(), fragment);
        }

        tracing::debug!(
            entity = %entity.name,
            id_mode = options.id_mode,
            depth,
            keys = object.len(),
            "Composed entity schema"
        );

        if options.use_mixed_ids && options.id_mode && object.len() == 1 {
            let single = object.iter().next().map(|(_, fragment)| fragment.clone());
            if let Some(fragment) = single {
                return Ok(Schema::alternatives([Schema::from(object), fragment]));
            }
        }

        Ok(Schema::from(object))
    }

    fn relation_at(
        &self,
        owner: &str,
        relation: &RelationMetadata,
        annotation: &RelationAnnotation,
        options: Options,
        depth: usize,
    ) -> KeelResult<Schema> {
        let cardinality = cardinality_of(owner, relation)?;
        let target = self.catalog.target_of(relation)?;
        let nested = options.nested(annotation.include);

        tracing::trace!(
            entity = owner,
            relation = %relation.name,
            target = %target.name,
            nested_id_mode = nested.id_mode,
            "Composing related entity"
        );

        let composed = self.compose_at(target, nested, depth + 1)?;
        Ok(shape_relation(relation, cardinality, annotation, composed))
    }
}

// ============================================================================
// Free entry points
// ============================================================================

/// Compose the schema of `entity` with the catalog's storage driver
pub fn compose_entity_schema(
    catalog: &Catalog,
    registry: &AnnotationRegistry,
    entity: &EntityMetadata,
    options: Options,
) -> KeelResult<Schema> {
    SchemaGenerator::new(catalog, registry).compose(entity, options)
}

/// Schema fragment of one relation of `owner`, composing its target from `catalog`
pub fn build_relation_schema(
    catalog: &Catalog,
    registry: &AnnotationRegistry,
    owner: &str,
    relation: &RelationMetadata,
    annotation: &RelationAnnotation,
    options: Options,
) -> KeelResult<Schema> {
    SchemaGenerator::new(catalog, registry).build_relation(owner, relation, annotation, options)
}

// ============================================================================
// Tests
// ============================================================================
