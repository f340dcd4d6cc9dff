use std::panic;
use std::thread;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::churn::{churn_by_segment, SegmentChurn};
use crate::filter::{criteria_warnings, FilterCriteria, FilteredView};
use crate::metrics::{summarize, Metrics};
use crate::store::{FilterOptions, TransactionStore};
use crate::trends::{monthly_sales, segment_trend, MonthlySales, SegmentTrendPoint};
use crate::types::{with_metadata, ComputationOutput, Snapshot};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Views at least this large are analysed on scoped worker threads.
pub const PARALLEL_THRESHOLD: usize = 50_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardOutput {
    pub metrics: Metrics,
    pub monthly_sales: Vec<MonthlySales>,
    pub segment_trend: Vec<SegmentTrendPoint>,
    pub churn_by_segment: Vec<SegmentChurn>,
}

#[derive(Serialize)]
struct ReportAssumptions<'a> {
    criteria: &'a FilterCriteria,
    cutoff_period: &'a str,
}

#[derive(Serialize)]
struct StoreAssumptions<'a> {
    cutoff_period: &'a str,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Filter once, then run `compute` over that view and wrap the result in the
/// standard envelope.
pub fn run_report<T, F>(
    store: &TransactionStore,
    criteria: &FilterCriteria,
    methodology: &str,
    compute: F,
) -> ComputationOutput<T>
where
    T: Serialize,
    F: FnOnce(&FilteredView<'_>) -> T,
{
    let start = Instant::now();
    let mut warnings = criteria_warnings(criteria, store);

    let view = store.filter(criteria);
    if view.is_empty() && !store.is_empty() && !criteria.date_range.is_inverted() {
        warnings.push("No transactions match the selected filters".to_string());
    }
    let result = compute(&view);

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        methodology,
        &ReportAssumptions {
            criteria,
            cutoff_period: store.cutoff_period(),
        },
        warnings,
        elapsed,
        Snapshot {
            rows_in_view: view.len(),
            rows_in_store: store.len(),
        },
        result,
    )
}

/// Filter-control options for a UI, in the same envelope as every report.
pub fn options_report(store: &TransactionStore) -> ComputationOutput<FilterOptions> {
    let start = Instant::now();
    let options = store.filter_options();

    let mut warnings = Vec::new();
    if store.is_empty() {
        warnings.push(format!(
            "No transactions before cutoff {}; filter options are empty",
            store.cutoff_period()
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Filter Options: distinct age groups and product categories, purchase date bounds",
        &StoreAssumptions {
            cutoff_period: store.cutoff_period(),
        },
        warnings,
        elapsed,
        Snapshot {
            rows_in_view: store.len(),
            rows_in_store: store.len(),
        },
        options,
    )
}

/// All dashboard outputs for one set of criteria.
pub fn build_dashboard(
    store: &TransactionStore,
    criteria: &FilterCriteria,
) -> ComputationOutput<DashboardOutput> {
    run_report(
        store,
        criteria,
        "Customer Segmentation Dashboard: sales summary, monthly trends, churn by age group",
        evaluate,
    )
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// The three analyzers share nothing but the read-only view, so large views
/// fan out across threads. Small views stay on the caller's thread.
pub fn evaluate(view: &FilteredView<'_>) -> DashboardOutput {
    if view.len() >= PARALLEL_THRESHOLD {
        evaluate_parallel(view)
    } else {
        evaluate_sequential(view)
    }
}

fn evaluate_sequential(view: &FilteredView<'_>) -> DashboardOutput {
    DashboardOutput {
        metrics: summarize(view),
        monthly_sales: monthly_sales(view),
        segment_trend: segment_trend(view),
        churn_by_segment: churn_by_segment(view),
    }
}

fn evaluate_parallel(view: &FilteredView<'_>) -> DashboardOutput {
    thread::scope(|s| {
        let metrics = s.spawn(|| summarize(view));
        let monthly = s.spawn(|| monthly_sales(view));
        let segments = s.spawn(|| segment_trend(view));
        let churn = churn_by_segment(view);

        DashboardOutput {
            metrics: metrics.join().unwrap_or_else(|e| panic::resume_unwind(e)),
            monthly_sales: monthly.join().unwrap_or_else(|e| panic::resume_unwind(e)),
            segment_trend: segments.join().unwrap_or_else(|e| panic::resume_unwind(e)),
            churn_by_segment: churn,
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
