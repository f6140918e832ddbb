//! Core types used throughout Keel
//!
//! This module contains the small closed vocabularies shared by the
//! metadata graph and the schema generator: database flavours, relation
//! kinds with their cardinality buckets, and column generation strategies.

use serde::{Deserialize, Serialize};

// ============================================================================
// Database Types
// ============================================================================

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[default]
    PostgreSQL,
    MySQL,
    SQLite,
}

impl DatabaseType {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            DatabaseType::PostgreSQL => "PostgreSQL",
            DatabaseType::MySQL => "MySQL",
            DatabaseType::SQLite => "SQLite",
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for DatabaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Ok(DatabaseType::PostgreSQL),
            "mysql" | "mariadb" => Ok(DatabaseType::MySQL),
            "sqlite" => Ok(DatabaseType::SQLite),
            other => Err(format!("unknown database type '{}'", other)),
        }
    }
}

// ============================================================================
// Relationship Types
// ============================================================================

/// Cardinality bucket a relation kind resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// At most one related record
    ToOne,
    /// Any number of related records
    ToMany,
}

/// Relation kind as reported by the persistence layer
///
/// Serialized with the snake_case names the metadata sources use; any other
/// string round-trips through [`RelationType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
    /// A kind reported by the persistence layer that has no cardinality bucket
    #[serde(untagged)]
    Other(String),
}

impl RelationType {
    /// The kind's wire name, e.g. `many_to_one`
    pub fn as_str(&self) -> &str {
        match self {
            RelationType::OneToOne => "one_to_one",
            RelationType::OneToMany => "one_to_many",
            RelationType::ManyToOne => "many_to_one",
            RelationType::ManyToMany => "many_to_many",
            RelationType::Other(kind) => kind,
        }
    }

    /// Resolve the cardinality bucket, `None` for unrecognized kinds
    pub fn cardinality(&self) -> Option<Cardinality> {
        match self {
            RelationType::OneToOne | RelationType::ManyToOne => Some(Cardinality::ToOne),
            RelationType::OneToMany | RelationType::ManyToMany => Some(Cardinality::ToMany),
            RelationType::Other(_) => None,
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Generation Strategies
// ============================================================================

/// How the persistence layer fills a generated column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GenerationStrategy {
    /// Auto-incrementing integer
    Increment,
    /// Driver row id (integer)
    Rowid,
    /// UUID assigned on insert
    Uuid,
    /// Anything else (`identity`, vendor specific strategies, ...)
    Other(String),
}

impl GenerationStrategy {
    /// Strategy name as stored in metadata
    pub fn as_str(&self) -> &str {
        match self {
            GenerationStrategy::Increment => "increment",
            GenerationStrategy::Rowid => "rowid",
            GenerationStrategy::Uuid => "uuid",
            GenerationStrategy::Other(name) => name,
        }
    }
}

impl From<String> for GenerationStrategy {
    fn from(value: String) -> Self {
        match value.as_str() {
            "increment" => GenerationStrategy::Increment,
            "rowid" => GenerationStrategy::Rowid,
            "uuid" => GenerationStrategy::Uuid,
            _ => GenerationStrategy::Other(value),
        }
    }
}

impl From<&str> for GenerationStrategy {
    fn from(value: &str) -> Self {
        GenerationStrategy::from(value.to_string())
    }
}

impl From<GenerationStrategy> for String {
    fn from(value: GenerationStrategy) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for GenerationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_type() {
        assert_eq!(DatabaseType::PostgreSQL.display_name(), "PostgreSQL");
        assert_eq!(DatabaseType::default(), DatabaseType::PostgreSQL);
    }

    #[test]
    fn test_database_type_from_str() {
        assert_eq!("postgres".parse::<DatabaseType>(), Ok(DatabaseType::PostgreSQL));
        assert_eq!("SQLite".parse::<DatabaseType>(), Ok(DatabaseType::SQLite));
        assert!("oracle".parse::<DatabaseType>().is_err());
    }

    #[test]
    fn test_database_type_serde() {
        let json = serde_json::to_string(&DatabaseType::MySQL).unwrap();
        assert_eq!(json, "\"mysql\"");
    }

    #[test]
    fn test_relation_cardinality() {
        assert_eq!(RelationType::OneToOne.cardinality(), Some(Cardinality::ToOne));
        assert_eq!(RelationType::ManyToOne.cardinality(), Some(Cardinality::ToOne));
        assert_eq!(RelationType::OneToMany.cardinality(), Some(Cardinality::ToMany));
        assert_eq!(RelationType::ManyToMany.cardinality(), Some(Cardinality::ToMany));
        assert_eq!(RelationType::Other("tree".to_string()).cardinality(), None);
    }

    #[test]
    fn test_relation_type_serde() {
        let kind: RelationType = serde_json::from_str("\"many_to_one\"").unwrap();
        assert_eq!(kind, RelationType::ManyToOne);

        let kind: RelationType = serde_json::from_str("\"tree\"").unwrap();
        assert_eq!(kind, RelationType::Other("tree".to_string()));
        assert_eq!(kind.as_str(), "tree");

        let json = serde_json::to_string(&RelationType::ManyToMany).unwrap();
        assert_eq!(json, format!("\"{}\"", RelationType::ManyToMany));
    }

    #[test]
    fn test_generation_strategy_roundtrip() {
        let strategy: GenerationStrategy = serde_json::from_str("\"increment\"").unwrap();
        assert_eq!(strategy, GenerationStrategy::Increment);

        let strategy: GenerationStrategy = serde_json::from_str("\"identity\"").unwrap();
        assert_eq!(strategy, GenerationStrategy::Other("identity".to_string()));
        assert_eq!(serde_json::to_string(&strategy).unwrap(), "\"identity\"");
    }
}
