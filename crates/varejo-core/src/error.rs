//! # Error Types
//!
//! Domain-specific error types for varejo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  varejo-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  varejo-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  varejo-engine errors (separate crate)                              │
//! │  └── EngineError      - Core | Storage, what callers match on       │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → EngineError → caller           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product code, sale id, amounts)
//! 3. Errors are enum variants, never String
//! 4. Not-found, invalid-argument, and insufficient-stock conditions each
//!    have their own variants so callers can branch without string matching

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or missing entities.
/// The dashboard layer translates them to user-facing messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product code is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Customer tax id is not registered.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Sale id does not exist.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Requested quantity exceeds current stock.
    ///
    /// ## When This Occurs
    /// - Removing more stock than a product has
    /// - Registering a sale larger than the available quantity
    ///
    /// The operation that raises this leaves stock and the movement log
    /// untouched.
    #[error("Insufficient stock for {code}: available {available}, requested {requested}")]
    InsufficientStock {
        code: String,
        available: i64,
        requested: i64,
    },

    /// Percentage discount above the allowed ceiling.
    #[error("Percentage discount {bps} bps exceeds the maximum of {max_bps} bps")]
    PercentageDiscountTooLarge { bps: u32, max_bps: u32 },

    /// Fixed discount above the per-sale ceiling (30% of the sale total).
    #[error("Fixed discount of {cents} cents exceeds the maximum of {max_cents} cents")]
    FixedDiscountTooLarge { cents: i64, max_cents: i64 },

    /// Promotion code is not in the promotion table.
    #[error("Unknown promotion code: {0}")]
    UnknownPromotion(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements, before any
/// business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (bad characters in a product code, etc.).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            code: "P001".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for P001: available 3, requested 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "code".to_string(),
        };
        assert_eq!(err.to_string(), "code is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
