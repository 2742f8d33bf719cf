//! End-to-end flow over the public service APIs: register a product and a
//! customer, sell, discount, invoice — the whole lifecycle against one
//! in-memory database.

use chrono::Utc;
use varejo_core::{CoreError, Customer, Discount, Money, MovementKind, Product};
use varejo_db::{Database, DbConfig, MovementFilter};
use varejo_engine::{EngineError, InventoryLedger, Reports, SalesEngine};

async fn setup() -> Database {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let now = Utc::now();

    db.products()
        .insert(&Product {
            code: "P001".to_string(),
            name: "Coffee Beans 1kg".to_string(),
            category: "Grocery".to_string(),
            price_cents: 2500,
            stock_quantity: 10,
            description: "Whole roasted beans".to_string(),
            supplier: "Distribuidora Central".to_string(),
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

    db.customers()
        .insert(&Customer {
            tax_id: "C001".to_string(),
            name: "Ana Souza".to_string(),
            email: "ana.souza@example.com".to_string(),
            phone: "+55 11 91111-1111".to_string(),
            created_at: now,
        })
        .await
        .unwrap();

    db
}

#[tokio::test]
async fn sale_discount_invoice_flow() {
    let db = setup().await;
    let sales = SalesEngine::new(db.clone());

    // Sell 4 units at R$ 25.00
    let sale = sales.register_sale("P001", "C001", 4).await.unwrap();
    assert_eq!(sale.total_cents, 10000);

    // Stock dropped to 6, with exactly one sale movement behind it
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

    // 10% discount: R$ 10.00 off, R$ 90.00 payable
    let result = sales
        .compute_discount(&sale.id, Discount::Percentage(1000))
        .await
        .unwrap();
    assert_eq!(result.discount, Money::from_cents(1000));
    assert_eq!(result.payable, Money::from_cents(9000));

    // The stored sale still carries the original total
    let stored = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
    assert_eq!(stored.total_cents, 10000);

    // Invoice shows both numbers
    let invoice = sales.render_invoice(&sale.id, Some(&result)).await.unwrap();
    assert!(invoice.contains("Ana Souza"));
    assert!(invoice.contains("Coffee Beans 1kg"));
    assert!(invoice.contains("Original total: R$ 100.00"));
    assert!(invoice.contains("Amount payable: R$ 90.00"));
}

#[tokio::test]
async fn ledger_and_sales_share_one_movement_log() {
    let db = setup().await;
    let ledger = InventoryLedger::new(db.clone());
    let sales = SalesEngine::new(db.clone());

    ledger.add_stock("P001", 20, "delivery").await.unwrap(); // 30
    sales.register_sale("P001", "C001", 8).await.unwrap(); // 22
    ledger.remove_stock("P001", 2, "breakage").await.unwrap(); // 20
    let final_stock = ledger.set_stock("P001", 25, "recount").await.unwrap();
    assert_eq!(final_stock, 25);

    // The log replays to the final level from the initial 10
    let movements = ledger.movements(&MovementFilter::default()).await.unwrap();
    let delta_sum: i64 = movements.iter().map(|m| m.quantity_delta).sum();
    assert_eq!(10 + delta_sum, final_stock);

    // Kind filter separates sales from manual changes
    let sale_movements = ledger
        .movements(&MovementFilter::default().of_kind(MovementKind::Sale))
        .await
        .unwrap();
    assert_eq!(sale_movements.len(), 1);
    assert_eq!(sale_movements[0].quantity_delta, -8);
}

#[tokio::test]
async fn failed_operations_leave_state_unchanged() {
    let db = setup().await;
    let ledger = InventoryLedger::new(db.clone());
    let sales = SalesEngine::new(db.clone());

    assert!(matches!(
        ledger.add_stock("UNKNOWN", 5, "x").await.unwrap_err(),
        EngineError::Core(CoreError::ProductNotFound(_))
    ));
    assert!(matches!(
        sales.register_sale("P001", "C001", 11).await.unwrap_err(),
        EngineError::Core(CoreError::InsufficientStock { .. })
    ));
    assert!(matches!(
        sales.apply_promotion("no-such-sale", "CLIENTE_VIP").await.unwrap_err(),
        EngineError::Core(CoreError::SaleNotFound(_))
    ));

    let product = db.products().get_by_code("P001").await.unwrap().unwrap();
    assert_eq!(product.stock_quantity, 10);
    assert!(ledger
        .movements(&MovementFilter::default())
        .await
        .unwrap()
        .is_empty());
    assert_eq!(db.sales().count().await.unwrap(), 0);
}

#[tokio::test]
async fn reports_reflect_registered_sales() {
    let db = setup().await;
    let sales = SalesEngine::new(db.clone());
    let reports = Reports::new(db);

    sales.register_sale("P001", "C001", 2).await.unwrap();
    sales.register_sale("P001", "C001", 3).await.unwrap();

    let top = reports.top_products(5).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].units_sold, 5);
    assert_eq!(top[0].revenue_cents, 12500);

    let customers = reports.top_customers(5).await.unwrap();
    assert_eq!(customers[0].purchase_count, 2);
    assert_eq!(customers[0].customer_name, "Ana Souza");

    // 5 of 10 units left at R$ 25.00
    let stock = reports.stock_report().await.unwrap();
    assert_eq!(stock.total_value_cents, 12500);
}
