//! # varejo-db: Database Layer for Varejo
//!
//! This crate provides database access for the Varejo retail system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Varejo Data Flow                             │
//! │                                                                     │
//! │  varejo-engine service call (register_sale, add_stock, ...)        │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                   varejo-db (THIS CRATE)                    │   │
//! │  │                                                             │   │
//! │  │   ┌───────────────┐   ┌──────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │   │ Repositories │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │   │ product.rs   │   │  (embedded)  │  │   │
//! │  │   │               │   │ customer.rs  │   │              │  │   │
//! │  │   │ SqlitePool    │◄──│ movement.rs  │   │ 001_init.sql │  │   │
//! │  │   │ begin() txs   │   │ sale.rs      │   │              │  │   │
//! │  │   │               │   │ report.rs    │   │              │  │   │
//! │  │   └───────────────┘   └──────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (path supplied by deployment config)          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use varejo_db::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/varejo.db");
//! let db = Database::new(config).await?;
//!
//! let product = db.products().get_by_code("P001").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::movement::{MovementFilter, MovementRepository};
pub use repository::product::ProductRepository;
pub use repository::report::{
    CustomerRank, ProductSalesRank, ReportRepository, SalesSummary, StockReport, StockValuation,
};
pub use repository::sale::SaleRepository;
