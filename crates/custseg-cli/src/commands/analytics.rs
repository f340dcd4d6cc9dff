use serde_json::Value;

use custseg_core::churn::churn_by_segment;
use custseg_core::dashboard::{build_dashboard, run_report};
use custseg_core::metrics::summarize;
use custseg_core::trends::{monthly_sales, segment_trend};

use super::AnalyticsArgs;

type CommandResult = Result<Value, Box<dyn std::error::Error>>;

pub fn run_summary(args: AnalyticsArgs) -> CommandResult {
    let store = args.dataset.load_store()?;
    let criteria = args.filters.resolve()?;
    let result = run_report(
        &store,
        &criteria,
        "Sales Summary: total sales, distinct (customer, timestamp) orders, AOV, units",
        summarize,
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_monthly_sales(args: AnalyticsArgs) -> CommandResult {
    let store = args.dataset.load_store()?;
    let criteria = args.filters.resolve()?;
    let result = run_report(
        &store,
        &criteria,
        "Monthly Sales: total purchase amount per year-month",
        monthly_sales,
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_segment_trend(args: AnalyticsArgs) -> CommandResult {
    let store = args.dataset.load_store()?;
    let criteria = args.filters.resolve()?;
    let result = run_report(
        &store,
        &criteria,
        "Segment Trend: distinct customers per year-month and age group",
        segment_trend,
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_churn(args: AnalyticsArgs) -> CommandResult {
    let store = args.dataset.load_store()?;
    let criteria = args.filters.resolve()?;
    let result = run_report(
        &store,
        &criteria,
        "Churn by Segment: distinct churned customers per age group",
        churn_by_segment,
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_dashboard(args: AnalyticsArgs) -> CommandResult {
    let store = args.dataset.load_store()?;
    let criteria = args.filters.resolve()?;
    Ok(serde_json::to_value(build_dashboard(&store, &criteria))?)
}
