//! Record Store: the parsed, normalized transaction dataset.
//!
//! Built exactly once per process. Every later stage borrows it immutably.

pub mod loader;
pub mod transaction;

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SegmentationError;
use crate::filter::{self, FilterCriteria, FilteredView};
use crate::types::Count;
use crate::SegmentationResult;

pub use loader::{LoadOptions, DEFAULT_CUTOFF_PERIOD};
pub use transaction::{period_key_of, Transaction, TransactionRecord};

/// Earliest and latest purchase timestamps in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,
}

/// What a UI needs to populate its filter controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Distinct labels in first-seen order.
    pub age_groups: Vec<String>,
    pub product_categories: Vec<String>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub transactions: usize,
    pub excluded_by_cutoff: usize,
    pub cutoff_period: String,
}

#[derive(Debug)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    excluded_by_cutoff: usize,
    cutoff_period: String,
}

impl TransactionStore {
    /// Load a CSV transaction log from disk.
    pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> SegmentationResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            SegmentationError::DataLoad(format!("Failed to open '{}': {}", path.display(), e))
        })?;
        let store = Self::from_reader(BufReader::new(file), options)?;
        log::info!(
            "loaded {} transactions from {} ({} excluded by cutoff {})",
            store.len(),
            path.display(),
            store.excluded_by_cutoff,
            store.cutoff_period
        );
        Ok(store)
    }

    pub fn from_reader<R: Read>(reader: R, options: &LoadOptions) -> SegmentationResult<Self> {
        options.validate()?;
        let records = loader::read_records(reader)?;
        Self::from_records(records, options)
    }

    /// Normalize records and apply the dataset-quality cutoff. Rows with a
    /// `period` on or after the cutoff never reach the store.
    ///
    /// Amounts and quantities are non-negative, so the store-wide totals bound
    /// every sum taken over a filtered view. A store whose totals overflow is
    /// rejected here and aggregation downstream cannot overflow.
    pub fn from_records<I>(records: I, options: &LoadOptions) -> SegmentationResult<Self>
    where
        I: IntoIterator<Item = TransactionRecord>,
    {
        options.validate()?;
        let cutoff = options.cutoff_period.trim();
        let mut transactions = Vec::new();
        let mut excluded_by_cutoff = 0usize;
        let mut total_amount = Decimal::ZERO;
        let mut total_quantity: Count = 0;

        for (i, record) in records.into_iter().enumerate() {
            if record.period.as_str() >= cutoff {
                excluded_by_cutoff += 1;
                continue;
            }
            total_amount = total_amount
                .checked_add(record.total_purchase_amount)
                .ok_or_else(|| overflow(loader::TOTAL_PURCHASE_AMOUNT, i))?;
            total_quantity = total_quantity
                .checked_add(record.quantity)
                .ok_or_else(|| overflow(loader::QUANTITY, i))?;
            transactions.push(Transaction::from(record));
        }

        Ok(TransactionStore {
            transactions,
            excluded_by_cutoff,
            cutoff_period: cutoff.to_string(),
        })
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn excluded_by_cutoff(&self) -> usize {
        self.excluded_by_cutoff
    }

    pub fn cutoff_period(&self) -> &str {
        &self.cutoff_period
    }

    /// `None` for an empty store.
    pub fn date_span(&self) -> Option<DateSpan> {
        let first = self.transactions.iter().map(|t| t.purchase_timestamp()).min()?;
        let last = self.transactions.iter().map(|t| t.purchase_timestamp()).max()?;
        Some(DateSpan { first, last })
    }

    pub fn age_groups(&self) -> Vec<&str> {
        distinct_in_order(self.transactions.iter().map(|t| t.age_group()))
    }

    pub fn product_categories(&self) -> Vec<&str> {
        distinct_in_order(self.transactions.iter().map(|t| t.product_category()))
    }

    pub fn filter_options(&self) -> FilterOptions {
        let span = self.date_span();
        FilterOptions {
            age_groups: self.age_groups().into_iter().map(String::from).collect(),
            product_categories: self
                .product_categories()
                .into_iter()
                .map(String::from)
                .collect(),
            min_date: span.map(|s| s.first.date()),
            max_date: span.map(|s| s.last.date()),
            transactions: self.len(),
            excluded_by_cutoff: self.excluded_by_cutoff,
            cutoff_period: self.cutoff_period.clone(),
        }
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> FilteredView<'_> {
        filter::apply(&self.transactions, criteria)
    }
}

fn overflow(column: &str, index: usize) -> SegmentationError {
    SegmentationError::DataLoad(format!(
        "Sum of '{}' overflows at record {}; dataset totals are out of range",
        column,
        index + 1
    ))
}

fn distinct_in_order<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    labels.filter(|l| seen.insert(*l)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(customer: &str, date: (i32, u32, u32), age: &str, category: &str, period: &str) -> TransactionRecord {
        TransactionRecord {
            customer_id: customer.into(),
            purchase_timestamp: NaiveDate::from_ymd_opt(date.0, date.1, date.2)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            age_group: age.into(),
            product_category: category.into(),
            total_purchase_amount: dec!(10),
            quantity: 1,
            churned: false,
            period: period.into(),
        }
    }

    // 1. Cutoff keeps rows strictly before the boundary
    #[test]
    fn test_cutoff_is_strict() {
        let records = vec![
            record("C1", (2023, 8, 31), "Youth", "Books", "2023-08"),
            record("C2", (2023, 9, 1), "Adult", "Books", "2023-09"),
            record("C3", (2023, 10, 2), "Adult", "Toys", "2023-10"),
        ];
        let store = TransactionStore::from_records(records, &LoadOptions::default()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.excluded_by_cutoff(), 2);
        assert_eq!(store.transactions()[0].customer_id(), "C1");
    }

    // 2. Distinct labels follow first appearance
    #[test]
    fn test_labels_in_first_seen_order() {
        let records = vec![
            record("C1", (2023, 1, 1), "Senior", "Toys", "2023-01"),
            record("C2", (2023, 1, 2), "Youth", "Books", "2023-01"),
            record("C3", (2023, 1, 3), "Senior", "Toys", "2023-01"),
        ];
        let store = TransactionStore::from_records(records, &LoadOptions::default()).unwrap();
        assert_eq!(store.age_groups(), vec!["Senior", "Youth"]);
        assert_eq!(store.product_categories(), vec!["Toys", "Books"]);
    }

    // 3. Date span seeds default bounds
    #[test]
    fn test_filter_options_date_bounds() {
        let records = vec![
            record("C1", (2023, 3, 9), "Youth", "Books", "2023-03"),
            record("C2", (2022, 11, 2), "Adult", "Books", "2022-11"),
            record("C3", (2023, 5, 30), "Adult", "Toys", "2023-05"),
        ];
        let store = TransactionStore::from_records(records, &LoadOptions::default()).unwrap();
        let options = store.filter_options();
        assert_eq!(options.min_date, NaiveDate::from_ymd_opt(2022, 11, 2));
        assert_eq!(options.max_date, NaiveDate::from_ymd_opt(2023, 5, 30));
        assert_eq!(options.transactions, 3);
        assert_eq!(options.cutoff_period, "2023-09");
    }

    // 4. Store-wide totals must fit, so view sums never overflow
    #[test]
    fn test_overflowing_totals_rejected() {
        let mut big_qty = record("C1", (2023, 1, 1), "Youth", "Books", "2023-01");
        big_qty.quantity = u64::MAX;
        let one = record("C2", (2023, 1, 2), "Youth", "Books", "2023-01");
        let err = TransactionStore::from_records(vec![big_qty.clone(), one.clone()], &LoadOptions::default())
            .unwrap_err();
        assert!(err.is_data_load_error());
        assert!(err.to_string().contains("Quantity"));

        let mut big_amount = one.clone();
        big_amount.total_purchase_amount = Decimal::MAX;
        let err = TransactionStore::from_records(vec![big_amount, one], &LoadOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("Total Purchase Amount"));

        // Rows past the cutoff do not count toward the totals.
        let mut late = record("C3", (2023, 9, 2), "Youth", "Books", "2023-09");
        late.quantity = 1;
        let store = TransactionStore::from_records(vec![big_qty, late], &LoadOptions::default()).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_empty_store_has_no_span() {
        let store = TransactionStore::from_records(Vec::new(), &LoadOptions::default()).unwrap();
        assert!(store.is_empty());
        assert!(store.date_span().is_none());
    }

    #[test]
    fn test_unreadable_path_is_data_load_error() {
        let err = TransactionStore::load("/nonexistent/custseg/data.csv", &LoadOptions::default())
            .unwrap_err();
        assert!(err.is_data_load_error());
    }
}
