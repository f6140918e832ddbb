//! Core traits for Keel
//!
//! This module defines the fundamental traits that metadata types
//! implement to provide consistent behavior for structural checks.

use crate::error::KeelResult;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can check their internal consistency
///
/// Metadata handed over by the persistence layer is trusted by the schema
/// generator. Implementors of this trait let callers verify that trust
/// before any schema is derived.
///
/// # Example
///
/// ```rust,ignore
/// use keel_core::{KeelError, KeelResult, Validatable};
///
/// struct Column {
///     name: String,
/// }
///
/// impl Validatable for Column {
///     fn validate(&self) -> KeelResult<()> {
///         if self.name.is_empty() {
///             return Err(KeelError::metadata("Column name cannot be empty"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// First inconsistency found, if any
    fn validate(&self) -> KeelResult<()>;

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Rendered inconsistencies; empty when the value checks out
    ///
    /// The default reports at most the first problem. Types that can collect
    /// several override it.
    fn validation_errors(&self) -> Vec<String> {
        self.validate()
            .err()
            .map(|e| e.to_string())
            .into_iter()
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
