//! Trend Aggregator: monthly series keyed by `period_key`.

pub mod monthly;
pub mod segment;

pub use monthly::{monthly_sales, MonthlySales};
pub use segment::{segment_trend, SegmentTrendPoint};
