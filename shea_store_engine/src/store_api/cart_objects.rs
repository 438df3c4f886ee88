use serde::{Deserialize, Serialize};
use shea_common::Cents;

use crate::db_types::CartLine;

/// Orders at or above this subtotal ship for free.
pub const FREE_SHIPPING_THRESHOLD: Cents = Cents::from_major(50);
/// Flat shipping fee for orders below [`FREE_SHIPPING_THRESHOLD`].
pub const SHIPPING_FEE: Cents = Cents::from_major(5);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    /// Total number of units across all lines.
    pub item_count: i64,
    pub subtotal: Cents,
    pub shipping: Cents,
    pub total: Cents,
}

impl CartSummary {
    pub fn from_lines(lines: &[CartLine]) -> Self {
        let subtotal = lines.iter().map(CartLine::line_total).sum::<Cents>();
        let item_count = lines.iter().map(|l| l.quantity).sum();
        let shipping = shipping_for(subtotal);
        Self { item_count, subtotal, shipping, total: subtotal + shipping }
    }
}

/// Shipping is free from [`FREE_SHIPPING_THRESHOLD`] upwards. Empty carts ship nothing and cost nothing.
pub fn shipping_for(subtotal: Cents) -> Cents {
    if subtotal == Cents::default() || subtotal >= FREE_SHIPPING_THRESHOLD {
        Cents::default()
    } else {
        SHIPPING_FEE
    }
}
