//! # Reporting Aggregator
//!
//! Read-side summaries for the dashboard. No invariants live here: every
//! method is a plain query over state the ledger and sales engine already
//! made consistent.

use chrono::{DateTime, Utc};

use varejo_db::{CustomerRank, Database, ProductSalesRank, SalesSummary, StockReport};

use crate::error::EngineResult;

/// The reporting service.
#[derive(Debug, Clone)]
pub struct Reports {
    db: Database,
}

impl Reports {
    /// Creates a reporting service over the given database.
    pub fn new(db: Database) -> Self {
        Reports { db }
    }

    /// Sales count, revenue, and average ticket for a period (inclusive).
    pub async fn sales_summary(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> EngineResult<SalesSummary> {
        Ok(self.db.reports().sales_summary(from, to).await?)
    }

    /// Best-selling products by units sold.
    pub async fn top_products(&self, limit: u32) -> EngineResult<Vec<ProductSalesRank>> {
        Ok(self.db.reports().top_products(limit).await?)
    }

    /// Customers ranked by total spend.
    pub async fn top_customers(&self, limit: u32) -> EngineResult<Vec<CustomerRank>> {
        Ok(self.db.reports().top_customers(limit).await?)
    }

    /// Current stock valuation per product plus the grand total.
    pub async fn stock_report(&self) -> EngineResult<StockReport> {
        Ok(self.db.reports().stock_report().await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
