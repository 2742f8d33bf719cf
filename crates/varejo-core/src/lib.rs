//! # varejo-core: Pure Business Logic for Varejo
//!
//! This crate is the **heart** of the Varejo retail system. It contains all
//! business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Varejo Architecture                           │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                 Dashboard / reporting layer                 │   │
//! │  │        (renders results, out of scope for this repo)        │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │                varejo-engine (services)                     │   │
//! │  │    inventory ledger, sales engine, reporting aggregator     │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │              ★ varejo-core (THIS CRATE) ★                   │   │
//! │  │                                                             │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌──────────┐  ┌────────────┐   │   │
//! │  │   │  types  │  │  money  │  │ discount │  │ validation │   │   │
//! │  │   │ Product │  │  Money  │  │  rules   │  │   checks   │   │   │
//! │  │   │  Sale   │  │ (cents) │  │  promos  │  │            │   │   │
//! │  │   └─────────┘  └─────────┘  └──────────┘  └────────────┘   │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │                 varejo-db (Database Layer)                  │   │
//! │  │          SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Sale, StockMovement)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`discount`] - Discount bounds and the fixed promotion table
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use varejo_core::Money` instead of
// `use varejo_core::money::Money`

pub use discount::{
    AppliedPromotion, Discount, DiscountBreakdown, DiscountKind, DiscountResult, Promotion,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
