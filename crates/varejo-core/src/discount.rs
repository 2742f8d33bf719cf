//! # Discounts & Promotions
//!
//! Pure discount calculation over a sale total. Nothing here touches
//! storage: the sales engine fetches the sale, hands its total to these
//! functions, and returns the result to the caller. The stored sale total
//! is never rewritten.
//!
//! ## Discount Bounds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  MANUAL DISCOUNTS (compute_discount)                                │
//! │                                                                     │
//! │  Percentage: at most 30% (3000 bps). 30% passes, 31% is rejected.  │
//! │  Fixed:      at most 30% of the sale total, checked in cents.      │
//! │                                                                     │
//! │  PROMOTIONS (apply_promotion)                                       │
//! │                                                                     │
//! │  Percentage promos go through the same calculation.                │
//! │  Fixed promos are instead capped at the sale total, so a R$ 50.00  │
//! │  voucher on a R$ 30.00 sale discounts exactly R$ 30.00 and the     │
//! │  payable amount bottoms out at zero, never below.                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rates are basis points (1 bps = 0.01%), matching the integer-money
//! convention in [`crate::money`].

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Constants
// =============================================================================

/// Maximum manual percentage discount: 30%.
pub const MAX_DISCOUNT_BPS: u32 = 3000;

/// Fixed discounts may not exceed this fraction of the sale total: 30%.
pub const MAX_FIXED_DISCOUNT_RATIO_BPS: u32 = 3000;

// =============================================================================
// Discount
// =============================================================================

/// A discount request, before validation against a sale total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "amount")]
pub enum Discount {
    /// A flat amount off the total.
    Fixed(Money),
    /// A percentage of the total, in basis points (1500 = 15%).
    Percentage(u32),
}

impl Discount {
    /// The kind tag carried on results.
    pub fn kind(&self) -> DiscountKind {
        match self {
            Discount::Fixed(_) => DiscountKind::Fixed,
            Discount::Percentage(_) => DiscountKind::Percentage,
        }
    }
}

/// Discriminates fixed-amount from percentage discounts on results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    Fixed,
    Percentage,
}

// =============================================================================
// Breakdown & Result
// =============================================================================

/// The arithmetic outcome of applying a discount to a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountBreakdown {
    /// The amount taken off.
    pub amount: Money,
    /// What remains to pay.
    pub payable: Money,
    pub kind: DiscountKind,
}

/// Promotion metadata attached to a promotion-driven result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPromotion {
    pub code: String,
    pub description: String,
}

/// A discount computed for a specific sale. Derived data, never persisted;
/// the invoice renderer and the dashboard consume it as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountResult {
    pub sale_id: String,
    /// The sale total before the discount.
    pub original: Money,
    /// The amount taken off.
    pub discount: Money,
    /// The final payable value.
    pub payable: Money,
    pub kind: DiscountKind,
    /// Present only when the discount came from a promotion code.
    pub promotion: Option<AppliedPromotion>,
}

// =============================================================================
// Promotion Table
// =============================================================================

/// A promotion: a fixed lookup key mapping to a predefined discount.
#[derive(Debug, Clone, Copy)]
pub struct Promotion {
    pub code: &'static str,
    pub discount: Discount,
    pub description: &'static str,
}

/// The fixed promotion table. Business data, not user-editable.
pub const PROMOTIONS: [Promotion; 4] = [
    Promotion {
        code: "PRIMEIRA_COMPRA",
        discount: Discount::Percentage(1500),
        description: "first-purchase discount",
    },
    Promotion {
        code: "CLIENTE_VIP",
        discount: Discount::Fixed(Money::from_cents(5000)),
        description: "VIP discount",
    },
    Promotion {
        code: "BLACK_FRIDAY",
        discount: Discount::Percentage(2500),
        description: "seasonal discount",
    },
    Promotion {
        code: "FRETE_GRATIS",
        discount: Discount::Fixed(Money::from_cents(2000)),
        description: "shipping discount",
    },
];

/// Looks up a promotion by its code. Codes are exact-match.
pub fn find_promotion(code: &str) -> Option<&'static Promotion> {
    PROMOTIONS.iter().find(|p| p.code == code)
}

// =============================================================================
// Calculation
// =============================================================================

/// Computes a manual discount against a sale total.
///
/// ## Bounds
/// - `Percentage`: rejected above [`MAX_DISCOUNT_BPS`]; exactly at the
///   bound passes.
/// - `Fixed`: rejected above 30% of the total (truncated to cents, so the
///   ceiling never rounds past the exact bound); exactly at the bound
///   passes.
///
/// ## Flooring
/// The payable value is floored at zero only for the fixed case. The
/// percentage case cannot go negative by construction, so no floor is
/// applied there.
///
/// ## Example
/// ```rust
/// use varejo_core::discount::{compute_discount, Discount};
/// use varejo_core::money::Money;
///
/// let total = Money::from_cents(10000); // R$ 100.00
/// let breakdown = compute_discount(total, Discount::Percentage(1000)).unwrap();
/// assert_eq!(breakdown.amount.cents(), 1000);
/// assert_eq!(breakdown.payable.cents(), 9000);
/// ```
pub fn compute_discount(total: Money, discount: Discount) -> CoreResult<DiscountBreakdown> {
    match discount {
        Discount::Percentage(bps) => {
            if bps > MAX_DISCOUNT_BPS {
                return Err(CoreError::PercentageDiscountTooLarge {
                    bps,
                    max_bps: MAX_DISCOUNT_BPS,
                });
            }
            let amount = total.fraction_bps(bps);
            Ok(DiscountBreakdown {
                amount,
                payable: total - amount,
                kind: DiscountKind::Percentage,
            })
        }
        Discount::Fixed(amount) => {
            let max = total.fraction_bps_floor(MAX_FIXED_DISCOUNT_RATIO_BPS);
            if amount > max {
                return Err(CoreError::FixedDiscountTooLarge {
                    cents: amount.cents(),
                    max_cents: max.cents(),
                });
            }
            let payable = total - amount;
            Ok(DiscountBreakdown {
                amount,
                payable: if payable.is_negative() { Money::zero() } else { payable },
                kind: DiscountKind::Fixed,
            })
        }
    }
}

/// Computes a promotion discount against a sale total.
///
/// Percentage promotions delegate to [`compute_discount`]. Fixed
/// promotions bypass the 30% ceiling and are instead capped at the sale
/// total, so the payable value can reach exactly zero but never less.
pub fn apply_promotion(total: Money, promotion: &Promotion) -> CoreResult<DiscountBreakdown> {
    match promotion.discount {
        Discount::Percentage(_) => compute_discount(total, promotion.discount),
        Discount::Fixed(amount) => {
            let capped = amount.min(total);
            Ok(DiscountBreakdown {
                amount: capped,
                payable: total - capped,
                kind: DiscountKind::Fixed,
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
