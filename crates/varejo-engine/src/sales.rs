//! # Sales Engine
//!
//! Registers sales against the catalog, customer registry, and inventory
//! ledger; computes discounts and promotions over recorded sales; renders
//! invoice text.
//!
//! ## Sale Registration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  register_sale(code, customer, qty)                                 │
//! │                                                                     │
//! │  validate qty                                                       │
//! │       │                                                             │
//! │       ▼   one transaction                                           │
//! │  read product ──► check customer exists ──► sufficiency check       │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  guarded stock write (stock - qty)                                  │
//! │  movement append     (kind = sale, delta = -qty)                    │
//! │  sale insert         (total = price × qty, frozen)                  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  COMMIT — all three visible, or none                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales carry their own movement kind and commit atomically with the
//! stock change, so the movement log cleanly separates sales from manual
//! adjustments and a crash can never leave a sale without its deduction.
//!
//! Discount calculation itself is pure and lives in
//! [`varejo_core::discount`]; this service only fetches the sale and
//! assembles the result. The stored sale total is never rewritten.

use std::fmt::Write as _;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use varejo_core::discount::{self, find_promotion};
use varejo_core::{
    validation, AppliedPromotion, CoreError, Discount, DiscountKind, DiscountResult, MovementKind,
    Sale, StockMovement,
};
use varejo_db::{Database, DbError};

use crate::error::EngineResult;

/// The sales engine service.
#[derive(Debug, Clone)]
pub struct SalesEngine {
    db: Database,
}

impl SalesEngine {
    /// Creates a sales engine over the given database.
    pub fn new(db: Database) -> Self {
        SalesEngine { db }
    }

    /// Registers a sale: deducts stock, logs the movement, records the
    /// sale — atomically.
    ///
    /// ## Errors
    /// - `Validation` when `quantity <= 0`
    /// - `ProductNotFound` / `CustomerNotFound` for missing references
    /// - `InsufficientStock` when `quantity` exceeds the current level;
    ///   nothing is written
    pub async fn register_sale(
        &self,
        product_code: &str,
        customer_tax_id: &str,
        quantity: i64,
    ) -> EngineResult<Sale> {
        validation::validate_quantity(quantity)?;
        validation::validate_customer_tax_id(customer_tax_id)?;

        let mut tx = self.db.begin().await?;

        let product = self
            .db
            .products()
            .get_by_code_in_tx(&mut tx, product_code)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_code.to_string()))?;

        if !self
            .db
            .customers()
            .exists_in_tx(&mut tx, customer_tax_id)
            .await?
        {
            return Err(CoreError::CustomerNotFound(customer_tax_id.to_string()).into());
        }

        if quantity > product.stock_quantity {
            return Err(CoreError::InsufficientStock {
                code: product_code.to_string(),
                available: product.stock_quantity,
                requested: quantity,
            }
            .into());
        }

        let now = Utc::now();
        let sale_id = Uuid::new_v4().to_string();
        let new_stock = product.stock_quantity - quantity;

        self.db
            .products()
            .update_stock_in_tx(&mut tx, product_code, new_stock, product.stock_quantity, now)
            .await?;

        let movement = StockMovement {
            id: Uuid::new_v4().to_string(),
            product_code: product.code.clone(),
            product_name: product.name.clone(),
            quantity_delta: -quantity,
            kind: MovementKind::Sale,
            resulting_stock: new_stock,
            reason: format!("sale {}", sale_id),
            occurred_at: now,
        };
        self.db.movements().insert_in_tx(&mut tx, &movement).await?;

        let sale = Sale {
            id: sale_id,
            product_code: product.code.clone(),
            customer_tax_id: customer_tax_id.to_string(),
            quantity,
            // Unit price at sale time, frozen into the record
            total_cents: product.price().multiply_quantity(quantity).cents(),
            sold_at: now,
        };
        self.db.sales().insert_in_tx(&mut tx, &sale).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id = %sale.id,
            product_code = %product.code,
            quantity,
            total_cents = sale.total_cents,
            new_stock,
            "Sale registered"
        );
        Ok(sale)
    }

    /// Gets a sale by id.
    pub async fn sale(&self, sale_id: &str) -> EngineResult<Sale> {
        self.db
            .sales()
            .get_by_id(sale_id)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()).into())
    }

    /// Lists all sales, most recent first.
    pub async fn sales(&self) -> EngineResult<Vec<Sale>> {
        Ok(self.db.sales().list().await?)
    }

    /// Lists one customer's sales, most recent first.
    pub async fn sales_by_customer(&self, tax_id: &str) -> EngineResult<Vec<Sale>> {
        Ok(self.db.sales().list_by_customer(tax_id).await?)
    }

    /// Computes a manual discount over a recorded sale.
    ///
    /// Derived data only; the sale row is not touched. Bounds: percentage
    /// discounts up to 30%, fixed discounts up to 30% of the sale total.
    pub async fn compute_discount(
        &self,
        sale_id: &str,
        requested: Discount,
    ) -> EngineResult<DiscountResult> {
        let sale = self.sale(sale_id).await?;
        let original = sale.total();
        let breakdown = discount::compute_discount(original, requested)?;

        Ok(DiscountResult {
            sale_id: sale.id,
            original,
            discount: breakdown.amount,
            payable: breakdown.payable,
            kind: breakdown.kind,
            promotion: None,
        })
    }

    /// Applies a promotion code to a recorded sale.
    ///
    /// Unknown codes fail before anything is read. Fixed-amount
    /// promotions are capped at the sale total, so the payable value can
    /// reach exactly zero but never go negative.
    pub async fn apply_promotion(
        &self,
        sale_id: &str,
        promo_code: &str,
    ) -> EngineResult<DiscountResult> {
        let promotion = find_promotion(promo_code)
            .ok_or_else(|| CoreError::UnknownPromotion(promo_code.to_string()))?;

        let sale = self.sale(sale_id).await?;
        let original = sale.total();
        let breakdown = discount::apply_promotion(original, promotion)?;

        info!(sale_id = %sale.id, promo_code, "Promotion applied");

        Ok(DiscountResult {
            sale_id: sale.id,
            original,
            discount: breakdown.amount,
            payable: breakdown.payable,
            kind: breakdown.kind,
            promotion: Some(AppliedPromotion {
                code: promotion.code.to_string(),
                description: promotion.description.to_string(),
            }),
        })
    }

    /// Renders invoice text for a sale, optionally with a previously
    /// computed discount.
    ///
    /// The original total is always shown; the discount breakdown and
    /// promotion description appear only when a result is supplied, and
    /// its payable value becomes the amount due.
    pub async fn render_invoice(
        &self,
        sale_id: &str,
        applied: Option<&DiscountResult>,
    ) -> EngineResult<String> {
        let sale = self.sale(sale_id).await?;
        let product = self
            .db
            .products()
            .get_by_code(&sale.product_code)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(sale.product_code.clone()))?;
        let customer = self
            .db
            .customers()
            .get_by_tax_id(&sale.customer_tax_id)
            .await?
            .ok_or_else(|| CoreError::CustomerNotFound(sale.customer_tax_id.clone()))?;

        let mut out = String::new();
        let _ = writeln!(out, "=================== INVOICE ===================");
        let _ = writeln!(out, "Varejo");
        let _ = writeln!(out, "Date: {}", sale.sold_at.format("%d/%m/%Y %H:%M:%S"));
        let _ = writeln!(out, "Customer: {} (tax id: {})", customer.name, customer.tax_id);
        let _ = writeln!(out, "Product: {} (code: {})", product.name, product.code);
        let _ = writeln!(out, "Quantity: {} units", sale.quantity);
        let _ = writeln!(out, "Original total: {}", sale.total());

        let payable = match applied {
            Some(result) => {
                let kind = match result.kind {
                    DiscountKind::Fixed => "fixed",
                    DiscountKind::Percentage => "percentage",
                };
                let _ = writeln!(out, "Discount applied: {} ({})", result.discount, kind);
                if let Some(promotion) = &result.promotion {
                    let _ = writeln!(out, "Promotion: {}", promotion.description);
                }
                result.payable
            }
            None => sale.total(),
        };

        let _ = writeln!(out, "Amount payable: {}", payable);
        let _ = writeln!(out, "===============================================");

        Ok(out)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::testutil::{register_customer, register_product, test_db};
    use varejo_core::Money;
    use varejo_db::MovementFilter;

    #[tokio::test]
    async fn test_register_sale_deducts_stock_and_logs_movement() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 10).await;
        register_customer(&db, "C001").await;
        let engine = SalesEngine::new(db.clone());

        let sale = engine.register_sale("P001", "C001", 4).await.unwrap();
        assert_eq!(sale.total_cents, 10000);
        assert_eq!(sale.quantity, 4);

        let product = db.products().get_by_code("P001").await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 6);

        let movements = db
            .movements()
            .list(&MovementFilter::default().for_product("P001"))
            .await
            .unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].kind, MovementKind::Sale);
        assert_eq!(movements[0].quantity_delta, -4);
        assert_eq!(movements[0].resulting_stock, 6);
        assert_eq!(movements[0].reason, format!("sale {}", sale.id));
    }

    #[tokio::test]
    async fn test_register_sale_missing_references() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 10).await;
        register_customer(&db, "C001").await;
        let engine = SalesEngine::new(db);

        let err = engine.register_sale("NOPE", "C001", 1).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::ProductNotFound(_))
        ));

        let err = engine.register_sale("P001", "NOPE", 1).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::CustomerNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_register_sale_insufficient_stock_writes_nothing() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 3).await;
        register_customer(&db, "C001").await;
        let engine = SalesEngine::new(db.clone());

        let err = engine.register_sale("P001", "C001", 5).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::InsufficientStock {
                available: 3,
                requested: 5,
                ..
            })
        ));

        let product = db.products().get_by_code("P001").await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 3);
        assert_eq!(db.sales().count().await.unwrap(), 0);
        assert_eq!(db.movements().count_for_product("P001").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_compute_discount_does_not_mutate_sale() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 10).await;
        register_customer(&db, "C001").await;
        let engine = SalesEngine::new(db.clone());

        let sale = engine.register_sale("P001", "C001", 4).await.unwrap();

        let result = engine
            .compute_discount(&sale.id, Discount::Percentage(1000))
            .await
            .unwrap();
        assert_eq!(result.original, Money::from_cents(10000));
        assert_eq!(result.discount, Money::from_cents(1000));
        assert_eq!(result.payable, Money::from_cents(9000));
        assert!(result.promotion.is_none());

        // The stored total is untouched
        let stored = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(stored.total_cents, 10000);
    }

    #[tokio::test]
    async fn test_compute_discount_bounds() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 10).await;
        register_customer(&db, "C001").await;
        let engine = SalesEngine::new(db);

        let sale = engine.register_sale("P001", "C001", 4).await.unwrap();

        // 30% passes, 31% is rejected
        assert!(engine
            .compute_discount(&sale.id, Discount::Percentage(3000))
            .await
            .is_ok());
        let err = engine
            .compute_discount(&sale.id, Discount::Percentage(3100))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::PercentageDiscountTooLarge { .. })
        ));

        // Fixed: exactly 30% of R$ 100.00 passes, a cent more does not
        assert!(engine
            .compute_discount(&sale.id, Discount::Fixed(Money::from_cents(3000)))
            .await
            .is_ok());
        let err = engine
            .compute_discount(&sale.id, Discount::Fixed(Money::from_cents(3001)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::FixedDiscountTooLarge { .. })
        ));
    }

    #[tokio::test]
    async fn test_compute_discount_unknown_sale() {
        let db = test_db().await;
        let engine = SalesEngine::new(db);

        let err = engine
            .compute_discount("missing", Discount::Percentage(1000))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Core(CoreError::SaleNotFound(_))));
    }

    #[tokio::test]
    async fn test_apply_promotion_caps_fixed_at_total() {
        let db = test_db().await;
        // 2 × R$ 15.00 = R$ 30.00 total
        register_product(&db, "P001", 1500, 10).await;
        register_customer(&db, "C001").await;
        let engine = SalesEngine::new(db);

        let sale = engine.register_sale("P001", "C001", 2).await.unwrap();
        assert_eq!(sale.total_cents, 3000);

        // The R$ 50.00 VIP voucher discounts R$ 30.00 and the bill is zero
        let result = engine.apply_promotion(&sale.id, "CLIENTE_VIP").await.unwrap();
        assert_eq!(result.discount, Money::from_cents(3000));
        assert_eq!(result.payable, Money::zero());
        assert_eq!(result.promotion.as_ref().unwrap().code, "CLIENTE_VIP");
    }

    #[tokio::test]
    async fn test_apply_promotion_percentage() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 10).await;
        register_customer(&db, "C001").await;
        let engine = SalesEngine::new(db);

        let sale = engine.register_sale("P001", "C001", 4).await.unwrap();

        let result = engine
            .apply_promotion(&sale.id, "PRIMEIRA_COMPRA")
            .await
            .unwrap();
        assert_eq!(result.discount, Money::from_cents(1500));
        assert_eq!(result.payable, Money::from_cents(8500));
        assert_eq!(
            result.promotion.as_ref().unwrap().description,
            "first-purchase discount"
        );
    }

    #[tokio::test]
    async fn test_apply_promotion_unknown_code() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 10).await;
        register_customer(&db, "C001").await;
        let engine = SalesEngine::new(db.clone());

        let sale = engine.register_sale("P001", "C001", 1).await.unwrap();
        let stock_before = db
            .products()
            .get_by_code("P001")
            .await
            .unwrap()
            .unwrap()
            .stock_quantity;

        let err = engine
            .apply_promotion(&sale.id, "NATAL_2026")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::UnknownPromotion(_))
        ));

        // Neither the sale nor stock was touched
        let stored = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(stored.total_cents, sale.total_cents);
        let stock_after = db
            .products()
            .get_by_code("P001")
            .await
            .unwrap()
            .unwrap()
            .stock_quantity;
        assert_eq!(stock_before, stock_after);
    }

    #[tokio::test]
    async fn test_render_invoice_without_discount() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 10).await;
        register_customer(&db, "C001").await;
        let engine = SalesEngine::new(db);

        let sale = engine.register_sale("P001", "C001", 4).await.unwrap();
        let invoice = engine.render_invoice(&sale.id, None).await.unwrap();

        assert!(invoice.contains("Original total: R$ 100.00"));
        assert!(invoice.contains("Amount payable: R$ 100.00"));
        assert!(!invoice.contains("Discount applied"));
        assert!(!invoice.contains("Promotion"));
    }

    #[tokio::test]
    async fn test_render_invoice_with_promotion() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 10).await;
        register_customer(&db, "C001").await;
        let engine = SalesEngine::new(db);

        let sale = engine.register_sale("P001", "C001", 4).await.unwrap();
        let result = engine
            .apply_promotion(&sale.id, "BLACK_FRIDAY")
            .await
            .unwrap();
        let invoice = engine.render_invoice(&sale.id, Some(&result)).await.unwrap();

        assert!(invoice.contains("Original total: R$ 100.00"));
        assert!(invoice.contains("Discount applied: R$ 25.00 (percentage)"));
        assert!(invoice.contains("Promotion: seasonal discount"));
        assert!(invoice.contains("Amount payable: R$ 75.00"));
    }

    #[tokio::test]
    async fn test_render_invoice_unknown_sale() {
        let db = test_db().await;
        let engine = SalesEngine::new(db);

        let err = engine.render_invoice("missing", None).await.unwrap_err();
        assert!(matches!(err, EngineError::Core(CoreError::SaleNotFound(_))));
    }

    #[tokio::test]
    async fn test_sales_by_customer() {
        let db = test_db().await;
        register_product(&db, "P001", 2500, 10).await;
        register_customer(&db, "C001").await;
        register_customer(&db, "C002").await;
        let engine = SalesEngine::new(db);

        engine.register_sale("P001", "C001", 1).await.unwrap();
        engine.register_sale("P001", "C002", 1).await.unwrap();
        engine.register_sale("P001", "C001", 2).await.unwrap();

        let sales = engine.sales_by_customer("C001").await.unwrap();
        assert_eq!(sales.len(), 2);
        assert!(sales.iter().all(|s| s.customer_tax_id == "C001"));

        assert_eq!(engine.sales().await.unwrap().len(), 3);
    }
}
