//! # Domain Types
//!
//! Core domain types used throughout Varejo.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐      │
//! │  │    Product     │   │    Customer    │   │      Sale      │      │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │      │
//! │  │  code (key)    │   │  tax_id (key)  │   │  id (UUID)     │      │
//! │  │  name          │   │  name          │   │  product_code  │      │
//! │  │  price_cents   │   │  email         │   │  customer ref  │      │
//! │  │  stock_qty     │   │  phone         │   │  total_cents   │      │
//! │  └────────────────┘   └────────────────┘   └────────────────┘      │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐                           │
//! │  │ StockMovement  │   │  MovementKind  │                           │
//! │  │  ────────────  │   │  ────────────  │                           │
//! │  │  signed delta  │   │  Entry         │                           │
//! │  │  resulting qty │   │  Withdrawal    │                           │
//! │  │  kind, reason  │   │  Adjustment    │                           │
//! │  │  (append-only) │   │  Sale          │                           │
//! │  └────────────────┘   └────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Products and customers carry business keys (`code`, `tax_id`) supplied
//! at registration. Movements and sales carry store-generated UUIDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// `stock_quantity` is owned by the inventory ledger: every change goes
/// through a ledger operation and leaves a movement record behind. Nothing
/// else writes this field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Business identifier, unique across the catalog (e.g. "P001").
    pub code: String,

    /// Display name shown on invoices and reports.
    pub name: String,

    /// Free-form category label.
    pub category: String,

    /// Unit price in cents. Never negative.
    pub price_cents: i64,

    /// Current stock level. Never negative.
    pub stock_quantity: i64,

    /// Optional longer description.
    pub description: String,

    /// Supplier name.
    pub supplier: String,

    /// When the product was registered.
    pub created_at: DateTime<Utc>,

    /// When the product was last touched (stock changes included).
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money value.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer.
///
/// The tax id is an opaque unique string; format validation (CPF digits,
/// email shape, phone masks) belongs to the registration front end, not
/// to this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// National tax id, unique business key.
    pub tax_id: String,

    pub name: String,

    pub email: String,

    pub phone: String,

    /// When the customer was registered.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Movement Kind
// =============================================================================

/// What kind of stock change a movement records.
///
/// Sale deductions carry their own kind so the movement log can always
/// tell a sale apart from a manual correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Stock received (restock, delivery).
    Entry,
    /// Stock removed manually (breakage, loss, manual withdrawal).
    Withdrawal,
    /// Stock counted and corrected to an absolute level.
    Adjustment,
    /// Stock deducted by a registered sale.
    Sale,
}

// =============================================================================
// Stock Movement
// =============================================================================

/// One append-only record of a change to a product's stock quantity.
///
/// ## Replay Invariant
/// For any product, starting stock plus the sum of all `quantity_delta`
/// values reconstructs the current stock. `resulting_stock` is captured
/// strictly AFTER the stock update is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    /// Store-generated identifier (UUID v4).
    pub id: String,

    /// Product this movement belongs to.
    pub product_code: String,

    /// Product name at movement time (frozen snapshot, survives renames).
    pub product_name: String,

    /// Signed change: positive for entries, negative for withdrawals and
    /// sales, any sign for adjustments.
    pub quantity_delta: i64,

    pub kind: MovementKind,

    /// Stock level after this movement was applied.
    pub resulting_stock: i64,

    /// Free-text reason supplied by the caller.
    pub reason: String,

    pub occurred_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// A completed sale transaction.
///
/// Immutable once created: discount and promotion calculations derive new
/// values from `total_cents` but never write them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    /// Store-generated identifier (UUID v4).
    pub id: String,

    /// Product sold (reference, not ownership).
    pub product_code: String,

    /// Buying customer (reference).
    pub customer_tax_id: String,

    /// Units sold. Positive, and no greater than stock at sale time.
    pub quantity: i64,

    /// Unit price × quantity, frozen at sale time.
    pub total_cents: i64,

    pub sold_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as a Money value.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
