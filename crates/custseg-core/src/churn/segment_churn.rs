use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::filter::FilteredView;
use crate::types::Count;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentChurn {
    pub age_group: String,
    pub churned_customers: Count,
}

// ---------------------------------------------------------------------------
// Main function
// ---------------------------------------------------------------------------

/// Distinct churned customers per age group, ordered by label.
///
/// Only churned rows are grouped, so a segment without any churned customer
/// is absent from the result instead of reported as zero.
pub fn churn_by_segment(view: &FilteredView<'_>) -> Vec<SegmentChurn> {
    let mut groups: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    for tx in view.iter().filter(|t| t.churned()) {
        groups
            .entry(tx.age_group())
            .or_default()
            .insert(tx.customer_id());
    }

    groups
        .into_iter()
        .map(|(age_group, customers)| SegmentChurn {
            age_group: age_group.to_string(),
            churned_customers: customers.len() as Count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Transaction, TransactionRecord};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tx(customer: &str, day: u32, age: &str, churned: bool) -> Transaction {
        Transaction::from(TransactionRecord {
            customer_id: customer.into(),
            purchase_timestamp: NaiveDate::from_ymd_opt(2023, 6, day)
                .unwrap()
                .and_hms_opt(15, 0, 0)
                .unwrap(),
            age_group: age.into(),
            product_category: "Electronics".into(),
            total_purchase_amount: dec!(120),
            quantity: 1,
            churned,
            period: "2023-06".into(),
        })
    }

    // 1. Churned customer with many rows counts once
    #[test]
    fn test_churned_customers_deduplicated() {
        let rows = vec![
            tx("C1", 1, "Senior", true),
            tx("C1", 2, "Senior", true),
            tx("C1", 3, "Senior", true),
            tx("C2", 4, "Senior", true),
        ];
        let churn = churn_by_segment(&FilteredView::all(&rows));
        assert_eq!(
            churn,
            vec![SegmentChurn {
                age_group: "Senior".into(),
                churned_customers: 2,
            }]
        );
    }

    // 2. Segments without churn are omitted, not zero
    #[test]
    fn test_segments_without_churn_omitted() {
        let rows = vec![
            tx("C1", 1, "Youth", false),
            tx("C2", 2, "Adult", true),
            tx("C3", 3, "Middle Aged", true),
        ];
        let churn = churn_by_segment(&FilteredView::all(&rows));
        let labels: Vec<&str> = churn.iter().map(|c| c.age_group.as_str()).collect();
        assert_eq!(labels, vec!["Adult", "Middle Aged"]);
    }

    // 3. Only churned rows of a customer count
    #[test]
    fn test_only_churned_rows_grouped() {
        let rows = vec![tx("C1", 1, "Youth", false), tx("C1", 2, "Adult", true)];
        let churn = churn_by_segment(&FilteredView::all(&rows));
        assert_eq!(churn.len(), 1);
        assert_eq!(churn[0].age_group, "Adult");
    }

    #[test]
    fn test_empty_view() {
        assert!(churn_by_segment(&FilteredView::empty()).is_empty());
    }
}
