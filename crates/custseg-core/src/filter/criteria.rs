use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SegmentationError;
use crate::store::Transaction;
use crate::SegmentationResult;

/// Inclusive calendar-date interval. A missing side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange {
            start: Some(start),
            end: Some(end),
        }
    }

    /// start > end. Such a range matches nothing.
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s > e)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// A set of allowed categorical labels. The empty selection places no
/// restriction on its dimension; it does NOT exclude everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelSelection {
    labels: BTreeSet<String>,
}

impl LabelSelection {
    /// The unrestricted selection.
    pub fn all() -> Self {
        Self::default()
    }

    /// Labels are trimmed; blank labels are rejected.
    pub fn from_labels<I, S>(labels: I) -> SegmentationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for label in labels {
            let trimmed = label.as_ref().trim();
            if trimmed.is_empty() {
                return Err(SegmentationError::InvalidInput {
                    field: "labels".into(),
                    reason: "Selection labels must not be blank".into(),
                });
            }
            set.insert(trimmed.to_string());
        }
        Ok(LabelSelection { labels: set })
    }

    pub fn is_unrestricted(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn admits(&self, label: &str) -> bool {
        self.labels.is_empty() || self.labels.contains(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl TryFrom<Vec<String>> for LabelSelection {
    type Error = SegmentationError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        LabelSelection::from_labels(labels)
    }
}

impl From<LabelSelection> for Vec<String> {
    fn from(selection: LabelSelection) -> Self {
        selection.labels.into_iter().collect()
    }
}

/// One recomputation's worth of filter settings. Dimensions combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub date_range: DateRange,
    pub age_groups: LabelSelection,
    pub product_categories: LabelSelection,
}

impl FilterCriteria {
    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    pub fn with_age_groups(mut self, age_groups: LabelSelection) -> Self {
        self.age_groups = age_groups;
        self
    }

    pub fn with_product_categories(mut self, product_categories: LabelSelection) -> Self {
        self.product_categories = product_categories;
        self
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.date_range.contains(transaction.purchase_date())
            && self.age_groups.admits(transaction.age_group())
            && self.product_categories.admits(transaction.product_category())
    }
}
