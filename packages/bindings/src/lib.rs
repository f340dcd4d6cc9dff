use napi::Result as NapiResult;
use napi_derive::napi;

use custseg_core::churn::churn_by_segment;
use custseg_core::dashboard::{build_dashboard, options_report, run_report};
use custseg_core::filter::FilterCriteria;
use custseg_core::metrics::summarize;
use custseg_core::store::{LoadOptions, TransactionStore};
use custseg_core::trends::{monthly_sales, segment_trend};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Criteria arrive as JSON; an empty string means "no filters".
fn parse_criteria(criteria_json: &str) -> NapiResult<FilterCriteria> {
    if criteria_json.trim().is_empty() {
        return Ok(FilterCriteria::default());
    }
    serde_json::from_str(criteria_json).map_err(to_napi_error)
}

/// A transaction log loaded once and queried for every filter change.
#[napi]
pub struct SegmentationDashboard {
    store: TransactionStore,
}

#[napi]
impl SegmentationDashboard {
    #[napi(constructor)]
    pub fn new(csv_path: String, cutoff_period: Option<String>) -> napi::Result<Self> {
        let options = match cutoff_period {
            Some(cutoff_period) => LoadOptions { cutoff_period },
            None => LoadOptions::default(),
        };
        let store = TransactionStore::load(&csv_path, &options).map_err(to_napi_error)?;
        Ok(SegmentationDashboard { store })
    }

    #[napi]
    pub fn filter_options(&self) -> NapiResult<String> {
        serde_json::to_string(&options_report(&self.store)).map_err(to_napi_error)
    }

    #[napi]
    pub fn dashboard(&self, criteria_json: String) -> NapiResult<String> {
        let criteria = parse_criteria(&criteria_json)?;
        serde_json::to_string(&build_dashboard(&self.store, &criteria)).map_err(to_napi_error)
    }

    #[napi]
    pub fn summary(&self, criteria_json: String) -> NapiResult<String> {
        let criteria = parse_criteria(&criteria_json)?;
        let output = run_report(&self.store, &criteria, "Sales Summary", summarize);
        serde_json::to_string(&output).map_err(to_napi_error)
    }

    #[napi]
    pub fn monthly_sales(&self, criteria_json: String) -> NapiResult<String> {
        let criteria = parse_criteria(&criteria_json)?;
        let output = run_report(&self.store, &criteria, "Monthly Sales", monthly_sales);
        serde_json::to_string(&output).map_err(to_napi_error)
    }

    #[napi]
    pub fn segment_trend(&self, criteria_json: String) -> NapiResult<String> {
        let criteria = parse_criteria(&criteria_json)?;
        let output = run_report(&self.store, &criteria, "Segment Trend", segment_trend);
        serde_json::to_string(&output).map_err(to_napi_error)
    }

    #[napi]
    pub fn churn_by_segment(&self, criteria_json: String) -> NapiResult<String> {
        let criteria = parse_criteria(&criteria_json)?;
        let output = run_report(&self.store, &criteria, "Churn by Segment", churn_by_segment);
        serde_json::to_string(&output).map_err(to_napi_error)
    }
}
