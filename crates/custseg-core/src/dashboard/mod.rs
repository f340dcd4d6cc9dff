//! Assembles every UI-facing output over one filtered snapshot.

pub mod report;

pub use report::{build_dashboard, evaluate, options_report, run_report, DashboardOutput, PARALLEL_THRESHOLD};
