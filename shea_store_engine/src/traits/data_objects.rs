use serde::{Deserialize, Serialize};

use crate::db_types::Order;

/// The outcome of applying a gateway verdict to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettlementResult {
    /// The order left `Pending` in this call.
    Settled(Order),
    /// The order had already settled. Nothing changed.
    AlreadySettled(Order),
    /// No order carries this transaction id.
    Unmatched,
}

impl SettlementResult {
    pub fn order(&self) -> Option<&Order> {
        match self {
            Self::Settled(o) | Self::AlreadySettled(o) => Some(o),
            Self::Unmatched => None,
        }
    }

    pub fn changed(&self) -> bool {
        matches!(self, Self::Settled(_))
    }
}
