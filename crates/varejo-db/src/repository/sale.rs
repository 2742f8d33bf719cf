//! # Sale Repository
//!
//! Database operations for sale records.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  register_sale (varejo-engine)                                      │
//! │       │                                                             │
//! │       ▼   one transaction                                           │
//! │  ┌──────────────────────────────────────────────┐                   │
//! │  │ guarded stock write   (products)             │                   │
//! │  │ movement append       (stock_movements)      │                   │
//! │  │ insert_in_tx          (sales)  ← this repo   │                   │
//! │  └──────────────────────────────────────────────┘                   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Sale row is immutable from here on. Discounts and invoices only   │
//! │  read it.                                                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use varejo_core::Sale;

const SELECT_COLUMNS: &str = "id, product_code, customer_tax_id, quantity, total_cents, sold_at";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SELECT_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Lists all sales, most recent first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SELECT_COLUMNS} FROM sales ORDER BY sold_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists all sales for one customer, most recent first.
    pub async fn list_by_customer(&self, tax_id: &str) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SELECT_COLUMNS} FROM sales WHERE customer_tax_id = ?1 ORDER BY sold_at DESC"
        ))
        .bind(tax_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Counts recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transaction-scoped operations
    // =========================================================================

    /// Inserts a sale inside an open transaction, together with its stock
    /// deduction and movement record.
    pub async fn insert_in_tx(&self, conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, total_cents = sale.total_cents, "Inserting sale");

        sqlx::query(
            "INSERT INTO sales (
                id, product_code, customer_tax_id, quantity, total_cents, sold_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&sale.id)
        .bind(&sale.product_code)
        .bind(&sale.customer_tax_id)
        .bind(sale.quantity)
        .bind(sale.total_cents)
        .bind(sale.sold_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
