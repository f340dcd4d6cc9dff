use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::filter::FilteredView;
use crate::types::Money;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub period_key: String,
    pub total_sales: Money,
}

// ---------------------------------------------------------------------------
// Main function
// ---------------------------------------------------------------------------

/// Sales per month, ascending by period key. Months with no transaction in
/// the view are absent rather than zero-filled.
pub fn monthly_sales(view: &FilteredView<'_>) -> Vec<MonthlySales> {
    let mut by_month: BTreeMap<&str, Money> = BTreeMap::new();
    for tx in view {
        *by_month.entry(tx.period_key()).or_insert(Decimal::ZERO) += tx.total_purchase_amount();
    }

    by_month
        .into_iter()
        .map(|(period_key, total_sales)| MonthlySales {
            period_key: period_key.to_string(),
            total_sales,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
