//! # Report Repository
//!
//! Read-side aggregates for the dashboard. Pure queries, no invariants:
//! nothing here writes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::DbResult;

// =============================================================================
// Row Types
// =============================================================================

/// Aggregate numbers for sales within a period.
#[derive(Debug, Clone, Serialize)]
pub struct SalesSummary {
    pub sale_count: i64,
    pub revenue_cents: i64,
    /// Revenue divided by count, zero when there were no sales.
    pub average_ticket_cents: i64,
}

/// One row of the best-sellers ranking.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductSalesRank {
    pub product_code: String,
    pub product_name: String,
    pub units_sold: i64,
    pub revenue_cents: i64,
}

/// One row of the top-customers ranking.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CustomerRank {
    pub tax_id: String,
    pub customer_name: String,
    pub purchase_count: i64,
    pub total_spent_cents: i64,
}

/// One product's stock valuation line.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StockValuation {
    pub product_code: String,
    pub product_name: String,
    pub stock_quantity: i64,
    pub price_cents: i64,
    /// stock_quantity × price_cents.
    pub value_cents: i64,
}

/// The full stock report: per-product lines plus the grand total.
#[derive(Debug, Clone, Serialize)]
pub struct StockReport {
    pub lines: Vec<StockValuation>,
    pub total_value_cents: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Sales count, revenue, and average ticket for a period (inclusive).
    pub async fn sales_summary(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<SalesSummary> {
        let (sale_count, revenue_cents): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(total_cents), 0)
             FROM sales WHERE sold_at >= ?1 AND sold_at <= ?2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        let average_ticket_cents = if sale_count > 0 {
            revenue_cents / sale_count
        } else {
            0
        };

        Ok(SalesSummary {
            sale_count,
            revenue_cents,
            average_ticket_cents,
        })
    }

    /// Best-selling products by units sold, descending.
    pub async fn top_products(&self, limit: u32) -> DbResult<Vec<ProductSalesRank>> {
        let rows = sqlx::query_as::<_, ProductSalesRank>(
            "SELECT s.product_code,
                    p.name AS product_name,
                    SUM(s.quantity) AS units_sold,
                    SUM(s.total_cents) AS revenue_cents
             FROM sales s
             JOIN products p ON p.code = s.product_code
             GROUP BY s.product_code, p.name
             ORDER BY units_sold DESC
             LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Customers ranked by total spend, descending.
    pub async fn top_customers(&self, limit: u32) -> DbResult<Vec<CustomerRank>> {
        let rows = sqlx::query_as::<_, CustomerRank>(
            "SELECT s.customer_tax_id AS tax_id,
                    c.name AS customer_name,
                    COUNT(*) AS purchase_count,
                    SUM(s.total_cents) AS total_spent_cents
             FROM sales s
             JOIN customers c ON c.tax_id = s.customer_tax_id
             GROUP BY s.customer_tax_id, c.name
             ORDER BY total_spent_cents DESC
             LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Current stock valuation, one line per product plus the grand total.
    pub async fn stock_report(&self) -> DbResult<StockReport> {
        let lines = sqlx::query_as::<_, StockValuation>(
            "SELECT code AS product_code,
                    name AS product_name,
                    stock_quantity,
                    price_cents,
                    stock_quantity * price_cents AS value_cents
             FROM products
             ORDER BY stock_quantity",
        )
        .fetch_all(&self.pool)
        .await?;

        let total_value_cents = lines.iter().map(|l| l.value_cents).sum();

        Ok(StockReport {
            lines,
            total_value_cents,
        })
    }
}
