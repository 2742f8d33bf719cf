//! # Customer Repository
//!
//! Database operations for the customer registry. Customers are write-once:
//! registered, then read-only.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use varejo_core::Customer;

const SELECT_COLUMNS: &str = "tax_id, name, email, phone, created_at";

/// Repository for customer database operations: the customer store.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Registers a new customer.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - tax id already registered
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(tax_id = %customer.tax_id, "Inserting customer");

        sqlx::query(
            "INSERT INTO customers (tax_id, name, email, phone, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&customer.tax_id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a customer by tax id.
    pub async fn get_by_tax_id(&self, tax_id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {SELECT_COLUMNS} FROM customers WHERE tax_id = ?1"
        ))
        .bind(tax_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Checks whether a tax id is registered.
    pub async fn exists(&self, tax_id: &str) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE tax_id = ?1")
                .bind(tax_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Lists all customers, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {SELECT_COLUMNS} FROM customers ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Counts registered customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transaction-scoped operations
    // =========================================================================

    /// Existence check inside an open transaction (sale registration
    /// verifies the customer on the same connection it writes with).
    pub async fn exists_in_tx(
        &self,
        conn: &mut SqliteConnection,
        tax_id: &str,
    ) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE tax_id = ?1")
                .bind(tax_id)
                .fetch_one(&mut *conn)
                .await?;

        Ok(count > 0)
    }
}
