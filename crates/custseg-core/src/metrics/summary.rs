use std::collections::HashSet;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::filter::FilteredView;
use crate::types::{Count, Money};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Scalar sales summary over one filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_sales: Money,
    /// Distinct (customer, purchase timestamp) pairs.
    pub order_count: Count,
    /// total_sales / order_count, or zero for an empty view.
    pub avg_order_value: Money,
    pub units_sold: Count,
}

impl Metrics {
    pub fn zero() -> Self {
        Metrics {
            total_sales: Decimal::ZERO,
            order_count: 0,
            avg_order_value: Decimal::ZERO,
            units_sold: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Main function
// ---------------------------------------------------------------------------

/// All four figures come from a single pass over the same view.
///
/// An order is one (customer, purchase timestamp) pair: several line items a
/// customer bought at the exact same instant collapse into one order. This is
/// how the source log models baskets, not a duplicate-row artefact.
///
/// The sums stay in range because the store rejects datasets whose totals
/// overflow at load.
pub fn summarize(view: &FilteredView<'_>) -> Metrics {
    let mut total_sales = Decimal::ZERO;
    let mut units_sold: Count = 0;
    let mut orders: HashSet<(&str, NaiveDateTime)> = HashSet::new();

    for tx in view {
        total_sales += tx.total_purchase_amount();
        units_sold += tx.quantity();
        orders.insert((tx.customer_id(), tx.purchase_timestamp()));
    }

    let order_count = orders.len() as Count;
    let avg_order_value = if order_count > 0 {
        total_sales / Decimal::from(order_count)
    } else {
        Decimal::ZERO
    };

    Metrics {
        total_sales,
        order_count,
        avg_order_value,
        units_sold,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
