//! Shared helpers for the service unit tests.

use chrono::Utc;
use varejo_core::{Customer, Product};
use varejo_db::{Database, DbConfig};

/// Fresh isolated in-memory database with migrations applied.
pub async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

/// Registers a product named `Product {code}` with the given price and
/// starting stock.
pub async fn register_product(db: &Database, code: &str, price_cents: i64, stock: i64) {
    let now = Utc::now();
    db.products()
        .insert(&Product {
            code: code.to_string(),
            name: format!("Product {code}"),
            category: "Test".to_string(),
            price_cents,
            stock_quantity: stock,
            description: String::new(),
            supplier: "Acme".to_string(),
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();
}

/// Registers a customer named `Customer {tax_id}`.
pub async fn register_customer(db: &Database, tax_id: &str) {
    db.customers()
        .insert(&Customer {
            tax_id: tax_id.to_string(),
            name: format!("Customer {tax_id}"),
            email: format!("{tax_id}@example.com"),
            phone: String::new(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();
}
