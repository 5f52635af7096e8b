//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Only deterministic business failures live here. Every variant is raised
/// synchronously at construction time and is never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The order quantity exceeds the 100-melon limit.
    #[error("No more than 100 melons!")]
    TooManyMelons,

    /// A value failed validation (e.g. a non-positive quantity).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn too_many_melons() -> Self {
        Self::TooManyMelons
    }
}
