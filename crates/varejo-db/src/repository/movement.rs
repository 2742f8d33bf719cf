//! # Stock Movement Repository
//!
//! Append-only log of stock changes. Rows are inserted inside the same
//! transaction as the stock update they describe, and never modified
//! afterwards.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use varejo_core::{MovementKind, StockMovement};

/// Filters for movement listing. All fields optional; an empty filter
/// returns the full log.
///
/// ## Example
/// ```rust,ignore
/// let filter = MovementFilter::default()
///     .for_product("P001")
///     .of_kind(MovementKind::Sale);
/// let movements = db.movements().list(&filter).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub product_code: Option<String>,
    pub kind: Option<MovementKind>,
}

impl MovementFilter {
    /// Restricts to movements within `[from, to]` inclusive.
    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    /// Restricts to one product.
    pub fn for_product(mut self, code: impl Into<String>) -> Self {
        self.product_code = Some(code.into());
        self
    }

    /// Restricts to one movement kind.
    pub fn of_kind(mut self, kind: MovementKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Repository for the stock movement log.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    /// Creates a new MovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Lists movements matching the filter, most recent first.
    pub async fn list(&self, filter: &MovementFilter) -> DbResult<Vec<StockMovement>> {
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT id, product_code, product_name, quantity_delta, kind, \
             resulting_stock, reason, occurred_at \
             FROM stock_movements WHERE 1 = 1",
        );

        if let Some(from) = filter.from {
            query.push(" AND occurred_at >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            query.push(" AND occurred_at <= ").push_bind(to);
        }
        if let Some(code) = &filter.product_code {
            query.push(" AND product_code = ").push_bind(code.clone());
        }
        if let Some(kind) = filter.kind {
            query.push(" AND kind = ").push_bind(kind);
        }

        // rowid breaks ties between movements sharing a timestamp
        query.push(" ORDER BY occurred_at DESC, rowid DESC");

        let movements = query
            .build_query_as::<StockMovement>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = movements.len(), "Listed stock movements");
        Ok(movements)
    }

    /// Counts movements for a product (for diagnostics and tests).
    pub async fn count_for_product(&self, code: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM stock_movements WHERE product_code = ?1",
        )
        .bind(code)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    // =========================================================================
    // Transaction-scoped operations
    // =========================================================================

    /// Appends a movement record inside an open transaction.
    ///
    /// Always paired with a guarded stock write on the same connection; a
    /// commit makes both visible, a rollback makes neither.
    pub async fn insert_in_tx(
        &self,
        conn: &mut SqliteConnection,
        movement: &StockMovement,
    ) -> DbResult<()> {
        debug!(
            product_code = %movement.product_code,
            delta = movement.quantity_delta,
            resulting = movement.resulting_stock,
            "Appending stock movement"
        );

        sqlx::query(
            "INSERT INTO stock_movements (
                id, product_code, product_name, quantity_delta, kind,
                resulting_stock, reason, occurred_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&movement.id)
        .bind(&movement.product_code)
        .bind(&movement.product_name)
        .bind(movement.quantity_delta)
        .bind(movement.kind)
        .bind(movement.resulting_stock)
        .bind(&movement.reason)
        .bind(movement.occurred_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
