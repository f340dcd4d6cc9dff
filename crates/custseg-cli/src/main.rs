mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::{AnalyticsArgs, DatasetArgs};

/// Customer-segmentation analytics over e-commerce transaction logs
#[derive(Parser)]
#[command(
    name = "custseg",
    version,
    about = "Customer-segmentation analytics over e-commerce transaction logs",
    long_about = "Filters a CSV transaction log by date range, age group and product \
                  category, then reports sales metrics, monthly trends and churn per \
                  age group. Set RUST_LOG=info (or debug) for load and filter diagnostics."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Total sales, distinct orders, average order value, units sold
    Summary(AnalyticsArgs),
    /// Sales per month
    MonthlySales(AnalyticsArgs),
    /// Distinct customers per month and age group
    SegmentTrend(AnalyticsArgs),
    /// Distinct churned customers per age group
    Churn(AnalyticsArgs),
    /// Every output above over a single filtered snapshot
    Dashboard(AnalyticsArgs),
    /// Labels and date bounds available for filtering
    Options(DatasetArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Summary(args) => commands::analytics::run_summary(args),
        Commands::MonthlySales(args) => commands::analytics::run_monthly_sales(args),
        Commands::SegmentTrend(args) => commands::analytics::run_segment_trend(args),
        Commands::Churn(args) => commands::analytics::run_churn(args),
        Commands::Dashboard(args) => commands::analytics::run_dashboard(args),
        Commands::Options(args) => commands::options::run_options(args),
        Commands::Version => {
            println!("custseg {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
