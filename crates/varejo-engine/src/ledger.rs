//! # Inventory Ledger
//!
//! Owns every change to product stock. Each mutating operation performs
//! exactly one guarded stock write and appends exactly one movement
//! record, committed together as a single transaction.
//!
//! ## Operation Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  add_stock / remove_stock / set_stock                               │
//! │                                                                     │
//! │  validate input                                                     │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  BEGIN ──► read product ──► compute new level ──► business checks   │
//! │       │                                          (sufficiency)      │
//! │       ▼                                                             │
//! │  guarded UPDATE products (optimistic, against the stock we read)    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  INSERT stock_movements (resulting_stock = the level just written)  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  COMMIT ──► new level returned to the caller                        │
//! │                                                                     │
//! │  Any failure before COMMIT rolls the whole unit back: a caller can  │
//! │  never observe updated stock without its movement, or vice versa.   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `resulting_stock` is always the level actually written, never the one
//! read before the update: replaying the movement log from a product's
//! starting stock must reconstruct its current stock exactly.

use chrono::Utc;
use sqlx::{Sqlite, Transaction};
use tracing::info;
use uuid::Uuid;

use varejo_core::{validation, CoreError, MovementKind, Product, StockMovement};
use varejo_db::{Database, DbError, MovementFilter};

use crate::error::EngineResult;

/// The inventory ledger service.
///
/// Holds a cheap clone of the database handle; construct one per
/// application and share it.
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    db: Database,
}

impl InventoryLedger {
    /// Creates a ledger over the given database.
    pub fn new(db: Database) -> Self {
        InventoryLedger { db }
    }

    /// Adds stock to a product.
    ///
    /// ## Errors
    /// - `Validation` when `quantity <= 0`
    /// - `ProductNotFound` when the code is unknown
    ///
    /// ## Returns
    /// The new stock level, also recorded on the `entry` movement.
    pub async fn add_stock(&self, code: &str, quantity: i64, reason: &str) -> EngineResult<i64> {
        validation::validate_quantity(quantity)?;

        let mut tx = self.db.begin().await?;
        let product = self
            .db
            .products()
            .get_by_code_in_tx(&mut tx, code)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(code.to_string()))?;

        let new_stock = product.stock_quantity + quantity;
        let new_stock = self
            .commit_change(tx, &product, new_stock, quantity, MovementKind::Entry, reason)
            .await?;

        info!(code = %code, quantity, new_stock, "Stock added");
        Ok(new_stock)
    }

    /// Removes stock from a product.
    ///
    /// ## Errors
    /// - `Validation` when `quantity <= 0`
    /// - `ProductNotFound` when the code is unknown
    /// - `InsufficientStock` when `quantity` exceeds the current level;
    ///   stock and the movement log are left untouched
    pub async fn remove_stock(&self, code: &str, quantity: i64, reason: &str) -> EngineResult<i64> {
        validation::validate_quantity(quantity)?;

        let mut tx = self.db.begin().await?;
        let product = self
            .db
            .products()
            .get_by_code_in_tx(&mut tx, code)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(code.to_string()))?;

        if quantity > product.stock_quantity {
            // tx dropped here: rolls back, nothing recorded
            return Err(CoreError::InsufficientStock {
                code: code.to_string(),
                available: product.stock_quantity,
                requested: quantity,
            }
            .into());
        }

        let new_stock = product.stock_quantity - quantity;
        let new_stock = self
            .commit_change(
                tx,
                &product,
                new_stock,
                -quantity,
                MovementKind::Withdrawal,
                reason,
            )
            .await?;

        info!(code = %code, quantity, new_stock, "Stock removed");
        Ok(new_stock)
    }

    /// Sets a product's stock to an absolute level (inventory count
    /// correction). The movement delta is `new - old`: positive, negative,
    /// or zero.
    ///
    /// ## Errors
    /// - `Validation` when `new_quantity < 0`
    /// - `ProductNotFound` when the code is unknown
    pub async fn set_stock(
        &self,
        code: &str,
        new_quantity: i64,
        reason: &str,
    ) -> EngineResult<i64> {
        validation::validate_stock_level(new_quantity)?;

        let mut tx = self.db.begin().await?;
        let product = self
            .db
            .products()
            .get_by_code_in_tx(&mut tx, code)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(code.to_string()))?;

        let delta = new_quantity - product.stock_quantity;
        let new_stock = self
            .commit_change(
                tx,
                &product,
                new_quantity,
                delta,
                MovementKind::Adjustment,
                reason,
            )
            .await?;

        info!(code = %code, new_stock, delta, "Stock adjusted");
        Ok(new_stock)
    }

    /// Lists stock movements matching the filter, most recent first.
    pub async fn movements(&self, filter: &MovementFilter) -> EngineResult<Vec<StockMovement>> {
        Ok(self.db.movements().list(filter).await?)
    }

    /// Writes the new stock level and its movement record, then commits.
    ///
    /// The guard value is the stock read earlier in this transaction; a
    /// concurrent writer makes the guarded update miss, the transaction
    /// rolls back, and the caller sees a `Conflict`.
    async fn commit_change(
        &self,
        mut tx: Transaction<'static, Sqlite>,
        product: &Product,
        new_stock: i64,
        delta: i64,
        kind: MovementKind,
        reason: &str,
    ) -> EngineResult<i64> {
        let now = Utc::now();

        self.db
            .products()
            .update_stock_in_tx(&mut tx, &product.code, new_stock, product.stock_quantity, now)
            .await?;

        let movement = StockMovement {
            id: Uuid::new_v4().to_string(),
            product_code: product.code.clone(),
            product_name: product.name.clone(),
            quantity_delta: delta,
            kind,
            // The level just written, never the one read before the update
            resulting_stock: new_stock,
            reason: reason.to_string(),
            occurred_at: now,
        };
        self.db.movements().insert_in_tx(&mut tx, &movement).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(new_stock)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::testutil::{register_product, test_db};

    #[tokio::test]
    async fn test_add_stock_records_entry_movement() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 10).await;
        let ledger = InventoryLedger::new(db.clone());

        let new_stock = ledger.add_stock("P001", 5, "delivery").await.unwrap();
        assert_eq!(new_stock, 15);

        let product = db.products().get_by_code("P001").await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 15);

        let movements = ledger.movements(&MovementFilter::default()).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].kind, MovementKind::Entry);
        assert_eq!(movements[0].quantity_delta, 5);
        assert_eq!(movements[0].resulting_stock, 15);
        assert_eq!(movements[0].reason, "delivery");
        assert_eq!(movements[0].product_name, "Product P001");
    }

    #[tokio::test]
    async fn test_add_stock_unknown_product() {
        let db = test_db().await;
        let ledger = InventoryLedger::new(db);

        let err = ledger.add_stock("UNKNOWN", 5, "x").await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::ProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_add_stock_rejects_non_positive_quantity() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 10).await;
        let ledger = InventoryLedger::new(db);

        for qty in [0, -3] {
            let err = ledger.add_stock("P001", qty, "x").await.unwrap_err();
            assert!(matches!(
                err,
                EngineError::Core(CoreError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_remove_stock_records_negative_delta() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 10).await;
        let ledger = InventoryLedger::new(db.clone());

        let new_stock = ledger.remove_stock("P001", 4, "breakage").await.unwrap();
        assert_eq!(new_stock, 6);

        let movements = ledger.movements(&MovementFilter::default()).await.unwrap();
        assert_eq!(movements[0].kind, MovementKind::Withdrawal);
        assert_eq!(movements[0].quantity_delta, -4);
        assert_eq!(movements[0].resulting_stock, 6);
    }

    #[tokio::test]
    async fn test_remove_stock_insufficient_leaves_no_trace() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 3).await;
        let ledger = InventoryLedger::new(db.clone());

        let err = ledger.remove_stock("P001", 5, "x").await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::InsufficientStock {
                available: 3,
                requested: 5,
                ..
            })
        ));

        // No partial effect: stock and movement log untouched
        let product = db.products().get_by_code("P001").await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 3);
        assert_eq!(db.movements().count_for_product("P001").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_stock_delta_can_be_zero_or_negative() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 10).await;
        let ledger = InventoryLedger::new(db.clone());

        ledger.set_stock("P001", 7, "recount").await.unwrap();
        ledger.set_stock("P001", 7, "recount again").await.unwrap();
        ledger.set_stock("P001", 12, "found a box").await.unwrap();

        let movements = ledger.movements(&MovementFilter::default()).await.unwrap();
        // Most recent first
        assert_eq!(movements[0].quantity_delta, 5);
        assert_eq!(movements[1].quantity_delta, 0);
        assert_eq!(movements[2].quantity_delta, -3);
        assert!(movements.iter().all(|m| m.kind == MovementKind::Adjustment));
    }

    #[tokio::test]
    async fn test_set_stock_rejects_negative_level() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 10).await;
        let ledger = InventoryLedger::new(db);

        let err = ledger.set_stock("P001", -1, "x").await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_replay_invariant() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 20).await;
        let ledger = InventoryLedger::new(db.clone());

        ledger.add_stock("P001", 15, "delivery").await.unwrap();
        ledger.remove_stock("P001", 8, "breakage").await.unwrap();
        ledger.set_stock("P001", 30, "recount").await.unwrap();
        ledger.remove_stock("P001", 1, "sample").await.unwrap();
        let final_stock = ledger.add_stock("P001", 2, "return").await.unwrap();

        let movements = ledger.movements(&MovementFilter::default()).await.unwrap();
        let delta_sum: i64 = movements.iter().map(|m| m.quantity_delta).sum();

        // Replaying the log from the starting level reconstructs the stock
        assert_eq!(20 + delta_sum, final_stock);

        // And every movement's resulting_stock matches a replay in order
        let mut replayed = 20;
        for movement in movements.iter().rev() {
            replayed += movement.quantity_delta;
            assert_eq!(replayed, movement.resulting_stock);
        }
    }

    #[tokio::test]
    async fn test_movements_filter_by_product_and_kind() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 10).await;
        register_product(&db, "P002", 1000, 10).await;
        let ledger = InventoryLedger::new(db);

        ledger.add_stock("P001", 1, "a").await.unwrap();
        ledger.remove_stock("P001", 1, "b").await.unwrap();
        ledger.add_stock("P002", 3, "c").await.unwrap();

        let p1 = ledger
            .movements(&MovementFilter::default().for_product("P001"))
            .await
            .unwrap();
        assert_eq!(p1.len(), 2);

        let entries = ledger
            .movements(&MovementFilter::default().of_kind(MovementKind::Entry))
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);

        let p1_entries = ledger
            .movements(
                &MovementFilter::default()
                    .for_product("P001")
                    .of_kind(MovementKind::Entry),
            )
            .await
            .unwrap();
        assert_eq!(p1_entries.len(), 1);
    }

    #[tokio::test]
    async fn test_movements_filter_by_date_range() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 10).await;
        let ledger = InventoryLedger::new(db);

        ledger.add_stock("P001", 1, "a").await.unwrap();

        let now = Utc::now();
        let hour = chrono::Duration::hours(1);

        let recent = ledger
            .movements(&MovementFilter::default().between(now - hour, now + hour))
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);

        let past = ledger
            .movements(&MovementFilter::default().between(now - hour * 3, now - hour * 2))
            .await
            .unwrap();
        assert!(past.is_empty());
    }
}
