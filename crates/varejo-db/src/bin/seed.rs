//! # Seed Data Generator
//!
//! Populates a database with development products and customers.
//!
//! ## Usage
//! ```bash
//! # Default database path and product count
//! cargo run -p varejo-db --bin seed
//!
//! # Custom amount and path
//! cargo run -p varejo-db --bin seed -- --count 500 --db ./data/varejo.db
//! ```
//!
//! Each product gets a unique code `{CATEGORY}-{NNN}`, a deterministic
//! price between R$ 1.99 and R$ 19.99, and a stock level between 0 and
//! 100. A fixed set of customers is registered alongside.

use chrono::Utc;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use varejo_core::{Customer, Product};
use varejo_db::{Database, DbConfig};

/// Product categories for realistic test data.
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "BEB",
        "Beverages",
        &[
            "Guarana 2L",
            "Cola 2L",
            "Orange Juice 1L",
            "Grape Juice 1L",
            "Mineral Water 500ml",
            "Sparkling Water 500ml",
            "Coffee Ground 500g",
            "Black Tea 20ct",
            "Coconut Water 330ml",
            "Energy Drink 250ml",
        ],
    ),
    (
        "MERC",
        "Grocery",
        &[
            "Rice 5kg",
            "Black Beans 1kg",
            "Spaghetti 500g",
            "Penne 500g",
            "Wheat Flour 1kg",
            "Corn Flour 500g",
            "Sugar 1kg",
            "Salt 1kg",
            "Olive Oil 500ml",
            "Soybean Oil 900ml",
        ],
    ),
    (
        "LIMP",
        "Cleaning",
        &[
            "Laundry Soap 1kg",
            "Dish Detergent 500ml",
            "Bleach 1L",
            "Disinfectant 1L",
            "Floor Cleaner 1L",
            "Sponge 3-Pack",
            "Trash Bags 50ct",
            "Glass Cleaner 500ml",
            "Multi-Surface Spray",
            "Steel Wool 8-Pack",
        ],
    ),
    (
        "PAD",
        "Bakery",
        &[
            "French Rolls 6ct",
            "Sliced Bread 500g",
            "Whole Grain Bread",
            "Cheese Bread 300g",
            "Butter Croissant",
            "Corn Cake Slice",
            "Carrot Cake Slice",
            "Milk Bread 400g",
            "Toast 200g",
            "Breadcrumbs 500g",
        ],
    ),
];

/// Development customers. Tax ids are digit strings with the right length,
/// not valid check digits.
const CUSTOMERS: &[(&str, &str, &str, &str)] = &[
    ("11111111111", "Ana Souza", "ana.souza@example.com", "+55 11 91111-1111"),
    ("22222222222", "Bruno Lima", "bruno.lima@example.com", "+55 11 92222-2222"),
    ("33333333333", "Carla Mendes", "carla.mendes@example.com", "+55 21 93333-3333"),
    ("44444444444", "Diego Alves", "diego.alves@example.com", "+55 31 94444-4444"),
    ("55555555555", "Elisa Rocha", "elisa.rocha@example.com", "+55 41 95555-5555"),
    ("66666666666", "Fabio Costa", "fabio.costa@example.com", "+55 51 96666-6666"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./varejo_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Varejo Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./varejo_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(db = %db_path, products = count, "Seeding development data");

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    // Refuse to reseed a non-empty database
    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(
            existing,
            "Database already has products; skipping seed. Delete the file to regenerate."
        );
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut generated = 0;

    'outer: for (category_code, category_name, names) in CATEGORIES {
        for (product_idx, product_name) in names.iter().enumerate() {
            if generated >= count {
                break 'outer;
            }

            let product = generate_product(
                category_code,
                category_name,
                product_name,
                generated * 10 + product_idx,
            );

            if let Err(e) = db.products().insert(&product).await {
                warn!(code = %product.code, error = %e, "Failed to insert product");
                continue;
            }

            generated += 1;
        }
    }

    let mut customers = 0;
    for (tax_id, name, email, phone) in CUSTOMERS {
        let customer = Customer {
            tax_id: tax_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            created_at: Utc::now(),
        };
        if let Err(e) = db.customers().insert(&customer).await {
            warn!(tax_id = %tax_id, error = %e, "Failed to insert customer");
            continue;
        }
        customers += 1;
    }

    info!(
        products = generated,
        customers,
        elapsed = ?start.elapsed(),
        "Seed complete"
    );

    Ok(())
}

/// Generates a single product with deterministic pseudo-random data.
fn generate_product(category: &str, category_name: &str, name: &str, seed: usize) -> Product {
    let now = Utc::now();

    let code = format!("{}-{:03}", category, seed);

    // R$ 1.99 - R$ 19.99
    let price_cents = 199 + ((seed * 37) % 1800) as i64;

    // 0 - 100 units
    let stock_quantity = (seed % 101) as i64;

    Product {
        code,
        name: name.to_string(),
        category: category_name.to_string(),
        price_cents,
        stock_quantity,
        description: format!("{} ({})", name, category_name),
        supplier: "Distribuidora Central".to_string(),
        created_at: now,
        updated_at: now,
    }
}
