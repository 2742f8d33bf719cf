//! # varejo-engine: Transactional Services for Varejo
//!
//! The operations the dashboard calls: inventory ledger, sales engine,
//! and reporting aggregator.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Varejo Service Layer                           │
//! │                                                                     │
//! │  Dashboard session                                                  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │               varejo-engine (THIS CRATE)                    │   │
//! │  │                                                             │   │
//! │  │  ┌────────────────┐ ┌───────────────┐ ┌─────────────────┐  │   │
//! │  │  │ InventoryLedger│ │  SalesEngine  │ │     Reports     │  │   │
//! │  │  │ add/remove/set │ │ register_sale │ │ summaries,      │  │   │
//! │  │  │ stock,         │ │ discounts,    │ │ rankings,       │  │   │
//! │  │  │ movement log   │ │ promotions,   │ │ stock valuation │  │   │
//! │  │  │                │ │ invoices      │ │                 │  │   │
//! │  │  └────────────────┘ └───────────────┘ └─────────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                          │                                  │
//! │       ▼                          ▼                                  │
//! │  varejo-core (rules)        varejo-db (storage)                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dependency Injection
//! Every service takes the [`varejo_db::Database`] handle in its
//! constructor. There are no module-level singletons and no implicit
//! connections; wire the handle at startup and pass it down.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use varejo_db::{Database, DbConfig};
//! use varejo_engine::{InventoryLedger, SalesEngine};
//!
//! let db = Database::new(DbConfig::new(db_path)).await?;
//! let ledger = InventoryLedger::new(db.clone());
//! let sales = SalesEngine::new(db.clone());
//!
//! ledger.add_stock("P001", 10, "first delivery").await?;
//! let sale = sales.register_sale("P001", "12345678901", 4).await?;
//! let result = sales.apply_promotion(&sale.id, "PRIMEIRA_COMPRA").await?;
//! println!("{}", sales.render_invoice(&sale.id, Some(&result)).await?);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod reports;
pub mod sales;

#[cfg(test)]
mod testutil;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{EngineError, EngineResult};
pub use ledger::InventoryLedger;
pub use reports::Reports;
pub use sales::SalesEngine;

// Filter type callers need to list movements
pub use varejo_db::MovementFilter;
