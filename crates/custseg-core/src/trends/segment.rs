use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::filter::FilteredView;
use crate::types::Count;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentTrendPoint {
    pub period_key: String,
    pub age_group: String,
    pub distinct_customers: Count,
}

// ---------------------------------------------------------------------------
// Main function
// ---------------------------------------------------------------------------

/// Distinct customers per (month, age group), ordered by month then label.
pub fn segment_trend(view: &FilteredView<'_>) -> Vec<SegmentTrendPoint> {
    let mut groups: BTreeMap<(&str, &str), HashSet<&str>> = BTreeMap::new();
    for tx in view {
        groups
            .entry((tx.period_key(), tx.age_group()))
            .or_default()
            .insert(tx.customer_id());
    }

    groups
        .into_iter()
        .map(|((period_key, age_group), customers)| SegmentTrendPoint {
            period_key: period_key.to_string(),
            age_group: age_group.to_string(),
            distinct_customers: customers.len() as Count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
