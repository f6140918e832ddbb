//! Consistency rules for catalogs and annotations
//!
//! The schema generator trusts the metadata it is given. These rules let a
//! caller check a catalog and its registry once, before generating schemas.

use crate::catalog::Catalog;
use crate::registry::AnnotationRegistry;
use keel_core::{KeelError, KeelResult};
use std::collections::HashSet;

// ============================================================================
// Findings
// ============================================================================

/// How a finding affects schema generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Generation still works but may not produce what the author meant
    Warning,
    /// Generation fails or silently relies on broken metadata
    Error,
}

/// What a finding is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingCode {
    EmptyEntityName,
    DuplicateEntityName,
    EmptyPropertyName,
    DuplicatePropertyName,
    OrphanForeignKey,
    MissingRelationTarget,
    UnknownRelationType,
    NoPrimaryKey,
    UnknownAnnotationOwner,
    UnknownAnnotatedProperty,
    AnnotationKindMismatch,
    CountOnToOne,
}

impl FindingCode {
    pub fn severity(self) -> Severity {
        use FindingCode::*;
        match self {
            EmptyEntityName | DuplicateEntityName | EmptyPropertyName | DuplicatePropertyName
            | OrphanForeignKey | MissingRelationTarget | UnknownRelationType => Severity::Error,
            NoPrimaryKey | UnknownAnnotationOwner | UnknownAnnotatedProperty
            | AnnotationKindMismatch | CountOnToOne => Severity::Warning,
        }
    }
}

/// One problem in a catalog or registry, located by a dotted path such as
/// `entities.Product.relations.tags`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub code: FindingCode,
    pub path: String,
    pub message: String,
}

impl Finding {
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.severity() {
            Severity::Error => write!(f, "{}: {}", self.path, self.message),
            Severity::Warning => write!(f, "{}: warning: {}", self.path, self.message),
        }
    }
}

/// Findings collected by a [`Validator`] run, in rule order
#[derive(Debug, Clone, Default)]
pub struct ConsistencyReport {
    findings: Vec<Finding>,
}

impl ConsistencyReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finding; its severity follows from the code
    pub fn report(&mut self, code: FindingCode, path: impl Into<String>, message: impl Into<String>) {
        self.findings.push(Finding {
            code,
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_error())
    }

    /// True when no rule reported an error; warnings do not count
    pub fn is_consistent(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn has_errors(&self) -> bool {
        !self.is_consistent()
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    pub fn contains(&self, code: FindingCode) -> bool {
        self.findings.iter().any(|f| f.code == code)
    }

    /// Fold the errors into a single [`KeelError`]
    pub fn into_result(self) -> KeelResult<()> {
        if self.is_consistent() {
            return Ok(());
        }
        let msg = self
            .errors()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(KeelError::metadata(msg))
    }
}

// ============================================================================
// Rules
// ============================================================================

/// A check over a whole model
pub trait ConsistencyRule {
    /// Short identifier used in trace output
    fn name(&self) -> &'static str;

    fn check(&self, catalog: &Catalog, registry: &AnnotationRegistry, report: &mut ConsistencyReport);
}

/// Runs consistency rules over a catalog and its registry
#[derive(Default)]
pub struct Validator {
    rules: Vec<Box<dyn ConsistencyRule>>,
}

impl Validator {
    /// A validator without rules
    pub fn new() -> Self {
        Self::default()
    }

    /// A validator running every built-in rule
    pub fn with_default_rules() -> Self {
        Self::new()
            .with_rule(EntityNamesRule)
            .with_rule(PropertiesRule)
            .with_rule(RelationTargetsRule)
            .with_rule(AnnotationTargetsRule)
            .with_rule(PrimaryKeyRule)
    }

    pub fn with_rule(mut self, rule: impl ConsistencyRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Run every rule and log the warnings
    pub fn validate(&self, catalog: &Catalog, registry: &AnnotationRegistry) -> ConsistencyReport {
        let mut report = ConsistencyReport::new();

        for rule in &self.rules {
            let before = report.findings.len();
            rule.check(catalog, registry, &mut report);
            tracing::trace!(
                rule = rule.name(),
                findings = report.findings.len() - before,
                "Checked model"
            );
        }

        for warning in report.warnings() {
            tracing::warn!("{}", warning);
        }

        report
    }

    /// Run every rule and fail on the first report with errors
    pub fn check(&self, catalog: &Catalog, registry: &AnnotationRegistry) -> KeelResult<()> {
        self.validate(catalog, registry).into_result()
    }
}

// ============================================================================
// Built-in Rules
// ============================================================================

/// Entity names are non-empty and unique
pub struct EntityNamesRule;

impl ConsistencyRule for EntityNamesRule {
    fn name(&self) -> &'static str {
        "entity_names"
    }

    fn check(&self, catalog: &Catalog, _: &AnnotationRegistry, report: &mut ConsistencyReport) {
        let mut seen = HashSet::new();

        for (index, entity) in catalog.entities().enumerate() {
            if entity.name.trim().is_empty() {
                report.report(
                    FindingCode::EmptyEntityName,
                    format!("entities[{}]", index),
                    "Entity name cannot be empty",
                );
            } else if !seen.insert(entity.name.as_str()) {
                report.report(
                    FindingCode::DuplicateEntityName,
                    format!("entities.{}", entity.name),
                    format!("Duplicate entity name: '{}'", entity.name),
                );
            }
        }
    }
}

/// Property names are non-empty and unique, and shadow columns back a relation
pub struct PropertiesRule;

impl ConsistencyRule for PropertiesRule {
    fn name(&self) -> &'static str {
        "properties"
    }

    fn check(&self, catalog: &Catalog, _: &AnnotationRegistry, report: &mut ConsistencyReport) {
        for entity in catalog.entities() {
            let base = format!("entities.{}", entity.name);
            let mut seen = HashSet::new();

            for property in entity.property_names() {
                if property.is_empty() {
                    report.report(
                        FindingCode::EmptyPropertyName,
                        base.as_str(),
                        "Property name cannot be empty",
                    );
                } else if !seen.insert(property) {
                    report.report(
                        FindingCode::DuplicatePropertyName,
                        format!("{}.{}", base, property),
                        format!("Duplicate property name: '{}'", property),
                    );
                }
            }

            let orphans = entity.fields.iter().filter_map(|field| {
                let relation = field.foreign_key_of.as_deref()?;
                entity.relation(relation).is_none().then_some((field, relation))
            });
            for (field, relation) in orphans {
                report.report(
                    FindingCode::OrphanForeignKey,
                    format!("{}.fields.{}", base, field.name),
                    format!("Field '{}' backs unknown relation '{}'", field.name, relation),
                );
            }
        }
    }
}

/// Relations resolve to an entity and a cardinality
pub struct RelationTargetsRule;

impl ConsistencyRule for RelationTargetsRule {
    fn name(&self) -> &'static str {
        "relation_targets"
    }

    fn check(&self, catalog: &Catalog, _: &AnnotationRegistry, report: &mut ConsistencyReport) {
        for entity in catalog.entities() {
            for relation in &entity.relations {
                let path = format!("entities.{}.relations.{}", entity.name, relation.name);

                if !catalog.contains(&relation.target) {
                    report.report(
                        FindingCode::MissingRelationTarget,
                        path.as_str(),
                        format!(
                            "Relation '{}' references non-existent entity '{}'",
                            relation.name, relation.target
                        ),
                    );
                }
                if relation.cardinality().is_none() {
                    report.report(
                        FindingCode::UnknownRelationType,
                        path,
                        format!(
                            "Relation '{}' has an unknown kind '{}'",
                            relation.name, relation.relation_type
                        ),
                    );
                }
            }
        }
    }
}

/// Every annotation belongs to an existing property of the right kind
pub struct AnnotationTargetsRule;

impl AnnotationTargetsRule {
    /// Whether `owner` names an entity or a type embedded into one
    fn owner_exists(catalog: &Catalog, owner: &str) -> bool {
        catalog.contains(owner)
            || catalog.entities().any(|e| {
                e.fields
                    .iter()
                    .any(|f| f.embedded_from.as_deref() == Some(owner))
            })
    }

    /// Whether `owner.property` is a column, directly or through embedding
    fn column_exists(catalog: &Catalog, owner: &str, property: &str) -> bool {
        catalog.entities().any(|e| {
            e.fields
                .iter()
                .any(|f| f.name == property && f.annotation_owner(&e.name) == owner)
        })
    }

    fn check_columns(catalog: &Catalog, registry: &AnnotationRegistry, report: &mut ConsistencyReport) {
        for entry in registry.columns() {
            let path = format!("columns.{}.{}", entry.entity, entry.property);

            if !Self::owner_exists(catalog, &entry.entity) {
                report.report(
                    FindingCode::UnknownAnnotationOwner,
                    path,
                    format!("Column annotation for unknown type '{}'", entry.entity),
                );
                continue;
            }
            if Self::column_exists(catalog, &entry.entity, &entry.property) {
                continue;
            }

            let is_relation = catalog
                .entity(&entry.entity)
                .is_some_and(|e| e.relation(&entry.property).is_some());
            if is_relation {
                report.report(
                    FindingCode::AnnotationKindMismatch,
                    path,
                    format!("'{}' is a relation, not a column", entry.property),
                );
            } else {
                report.report(
                    FindingCode::UnknownAnnotatedProperty,
                    path,
                    format!("Column annotation for unknown property '{}'", entry.property),
                );
            }
        }
    }

    fn check_relations(catalog: &Catalog, registry: &AnnotationRegistry, report: &mut ConsistencyReport) {
        for entry in registry.relations() {
            let path = format!("relations.{}.{}", entry.entity, entry.property);

            let Some(entity) = catalog.entity(&entry.entity) else {
                report.report(
                    FindingCode::UnknownAnnotationOwner,
                    path,
                    format!("Relation annotation for unknown entity '{}'", entry.entity),
                );
                continue;
            };

            match entity.relation(&entry.property) {
                Some(relation) if entry.annotation.count.is_some() && relation.is_to_one() => {
                    report.report(
                        FindingCode::CountOnToOne,
                        path,
                        format!("Count on to-one relation '{}' has no effect", relation.name),
                    );
                }
                Some(_) => {}
                None if entity.field(&entry.property).is_some() => {
                    report.report(
                        FindingCode::AnnotationKindMismatch,
                        path,
                        format!("'{}' is a column, not a relation", entry.property),
                    );
                }
                None => {
                    report.report(
                        FindingCode::UnknownAnnotatedProperty,
                        path,
                        format!("Relation annotation for unknown property '{}'", entry.property),
                    );
                }
            }
        }
    }
}

impl ConsistencyRule for AnnotationTargetsRule {
    fn name(&self) -> &'static str {
        "annotation_targets"
    }

    fn check(&self, catalog: &Catalog, registry: &AnnotationRegistry, report: &mut ConsistencyReport) {
        Self::check_columns(catalog, registry, report);
        Self::check_relations(catalog, registry, report);
    }
}

/// Entities without a primary key get an empty id-only schema
pub struct PrimaryKeyRule;

impl ConsistencyRule for PrimaryKeyRule {
    fn name(&self) -> &'static str {
        "primary_key"
    }

    fn check(&self, catalog: &Catalog, _: &AnnotationRegistry, report: &mut ConsistencyReport) {
        for entity in catalog.entities().filter(|e| !e.has_primary_key()) {
            report.report(
                FindingCode::NoPrimaryKey,
                format!("entities.{}", entity.name),
                format!("Entity '{}' has no primary key", entity.name),
            );
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
