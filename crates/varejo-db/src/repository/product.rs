//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Stock Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Guarded Stock Update                              │
//! │                                                                     │
//! │  ❌ WRONG: blind absolute update (races silently)                   │
//! │     UPDATE products SET stock_quantity = 7 WHERE code = ?           │
//! │                                                                     │
//! │  ✅ CORRECT: optimistic guard against the value we read             │
//! │     UPDATE products SET stock_quantity = 7                          │
//! │     WHERE code = ? AND stock_quantity = 10   -- what we read        │
//! │                                                                     │
//! │  Two sessions selling the last units both read stock=10; only the  │
//! │  first guarded UPDATE matches. The loser's transaction rolls back  │
//! │  and surfaces a Conflict instead of overdrawing stock.             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use varejo_core::Product;

const SELECT_COLUMNS: &str = "code, name, category, price_cents, stock_quantity, \
     description, supplier, created_at, updated_at";

/// Repository for product database operations: the catalog store.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Registers a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - product code already registered
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(code = %product.code, "Inserting product");

        sqlx::query(
            "INSERT INTO products (
                code, name, category, price_cents, stock_quantity,
                description, supplier, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&product.code)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(&product.description)
        .bind(&product.supplier)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by its business code.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {SELECT_COLUMNS} FROM products WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Checks whether a product code is registered.
    pub async fn exists(&self, code: &str) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE code = ?1")
                .bind(code)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Lists all products, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {SELECT_COLUMNS} FROM products ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Counts registered products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transaction-scoped operations
    // =========================================================================

    /// Gets a product inside an open transaction.
    ///
    /// The ledger reads the row here and later writes it with
    /// [`update_stock_in_tx`](Self::update_stock_in_tx); both run on the
    /// same connection so the guard value is the one actually read.
    pub async fn get_by_code_in_tx(
        &self,
        conn: &mut SqliteConnection,
        code: &str,
    ) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {SELECT_COLUMNS} FROM products WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(product)
    }

    /// Writes an absolute stock level, guarded by the previously read one.
    ///
    /// ## Returns
    /// * `Ok(())` - the row still carried `expected_stock` and was updated
    /// * `Err(DbError::Conflict)` - another writer got there first; the
    ///   caller must roll back
    pub async fn update_stock_in_tx(
        &self,
        conn: &mut SqliteConnection,
        code: &str,
        new_stock: i64,
        expected_stock: i64,
        updated_at: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(code = %code, new_stock, expected_stock, "Updating stock (guarded)");

        let result = sqlx::query(
            "UPDATE products
             SET stock_quantity = ?2, updated_at = ?3
             WHERE code = ?1 AND stock_quantity = ?4",
        )
        .bind(code)
        .bind(new_stock)
        .bind(updated_at)
        .bind(expected_stock)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::conflict("Product", code));
        }

        Ok(())
    }
}
