//! # Engine Error Type
//!
//! The error type returned by every engine operation. Two arms: domain
//! failures from varejo-core and storage failures from varejo-db. Callers
//! match on the arm to decide what to render.
//!
//! ## Error Kinds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  EngineError::Core                                                  │
//! │  ├── ProductNotFound / CustomerNotFound / SaleNotFound              │
//! │  ├── InsufficientStock                                              │
//! │  ├── *DiscountTooLarge / UnknownPromotion                           │
//! │  └── Validation (zero/negative quantities, bad codes)               │
//! │                                                                     │
//! │  EngineError::Storage                                               │
//! │  ├── Conflict  ← lost optimistic race, nothing applied              │
//! │  └── everything else the database can do wrong                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried inside the engine; retry policy belongs to the
//! caller.

use thiserror::Error;

use varejo_core::{CoreError, ValidationError};
use varejo_db::DbError;

/// Errors returned by the transactional services.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A business rule was violated or an entity is missing.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The underlying store failed. When this comes out of a multi-step
    /// unit the whole transaction was rolled back; state is unchanged but
    /// the caller should surface it rather than swallow it.
    #[error("Storage failure: {0}")]
    Storage(#[from] DbError),
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Core(CoreError::Validation(err))
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================
