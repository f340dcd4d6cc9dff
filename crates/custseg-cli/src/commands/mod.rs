pub mod analytics;
pub mod options;

use chrono::NaiveDate;
use clap::Args;

use custseg_core::filter::{FilterCriteria, LabelSelection};
use custseg_core::store::{LoadOptions, TransactionStore, DEFAULT_CUTOFF_PERIOD};

use crate::input;

/// Where the transaction log lives and how it is cut off at load.
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Path to the CSV transaction log
    #[arg(long, default_value = "data/final_project.csv")]
    pub data: String,

    /// Drop rows whose Period is on or after this value
    #[arg(long, default_value = DEFAULT_CUTOFF_PERIOD)]
    pub cutoff: String,
}

impl DatasetArgs {
    pub fn load_store(&self) -> Result<TransactionStore, Box<dyn std::error::Error>> {
        let options = LoadOptions {
            cutoff_period: self.cutoff.clone(),
        };
        Ok(TransactionStore::load(&self.data, &options)?)
    }
}

/// Filter criteria. Flags override the matching field of a --criteria file.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// First purchase date to include (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last purchase date to include (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Age group to include; repeat or comma-separate. Omit for all
    #[arg(long = "age-group", value_delimiter = ',')]
    pub age_groups: Vec<String>,

    /// Product category to include; repeat or comma-separate. Omit for all
    #[arg(long = "category", value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Path to a JSON FilterCriteria file; `-` reads it from stdin
    #[arg(long)]
    pub criteria: Option<String>,
}

/// Reads `--criteria -` from stdin.
const STDIN_PATH: &str = "-";

impl FilterArgs {
    /// --criteria file (or stdin for `-`), then flags on top, else defaults.
    pub fn resolve(&self) -> Result<FilterCriteria, Box<dyn std::error::Error>> {
        let mut criteria: FilterCriteria = match self.criteria.as_deref() {
            Some(STDIN_PATH) => input::stdin::read_stdin_json::<FilterCriteria>()?.unwrap_or_default(),
            Some(path) => input::file::read_json::<FilterCriteria>(path)?,
            None => FilterCriteria::default(),
        };

        if self.start.is_some() {
            criteria.date_range.start = self.start;
        }
        if self.end.is_some() {
            criteria.date_range.end = self.end;
        }
        if !self.age_groups.is_empty() {
            criteria.age_groups = LabelSelection::from_labels(&self.age_groups)?;
        }
        if !self.categories.is_empty() {
            criteria.product_categories = LabelSelection::from_labels(&self.categories)?;
        }
        Ok(criteria)
    }
}

/// Arguments shared by every analytics subcommand
#[derive(Args, Debug, Clone)]
pub struct AnalyticsArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub filters: FilterArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_flags_build_criteria() {
        let args = FilterArgs {
            start: Some(date(2023, 1, 1)),
            end: Some(date(2023, 3, 31)),
            age_groups: vec!["Youth".into(), "Adult".into()],
            categories: vec![],
            criteria: None,
        };
        let criteria = args.resolve().unwrap();
        assert_eq!(criteria.date_range.start, Some(date(2023, 1, 1)));
        assert_eq!(criteria.date_range.end, Some(date(2023, 3, 31)));
        assert!(criteria.age_groups.admits("Adult"));
        assert!(!criteria.age_groups.admits("Senior"));
        assert!(criteria.product_categories.is_unrestricted());
    }

    #[test]
    fn test_blank_flag_label_rejected() {
        let args = FilterArgs {
            categories: vec!["Books".into(), " ".into()],
            ..FilterArgs::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_no_flags_yield_default_criteria() {
        let criteria = FilterArgs::default().resolve().unwrap();
        assert_eq!(criteria, FilterCriteria::default());
    }
}
