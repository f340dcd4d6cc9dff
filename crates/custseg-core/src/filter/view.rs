use std::iter::Copied;
use std::slice;

use crate::filter::criteria::FilterCriteria;
use crate::store::Transaction;

/// Read-only handle over the transactions that passed a filter, in source
/// order. Borrowed from the store; never patched after construction.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    rows: Vec<&'a Transaction>,
}

impl<'a> FilteredView<'a> {
    pub fn empty() -> Self {
        FilteredView { rows: Vec::new() }
    }

    /// Every transaction, unfiltered.
    pub fn all(transactions: &'a [Transaction]) -> Self {
        FilteredView {
            rows: transactions.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> Copied<slice::Iter<'_, &'a Transaction>> {
        self.rows.iter().copied()
    }

    pub fn transactions(&self) -> &[&'a Transaction] {
        &self.rows
    }
}

impl<'v, 'a> IntoIterator for &'v FilteredView<'a> {
    type Item = &'a Transaction;
    type IntoIter = Copied<slice::Iter<'v, &'a Transaction>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Select the transactions matching every dimension of `criteria`.
/// An inverted date range yields an empty view rather than an error.
pub fn apply<'a>(transactions: &'a [Transaction], criteria: &FilterCriteria) -> FilteredView<'a> {
    if criteria.date_range.is_inverted() {
        log::warn!(
            "date range start {:?} is after end {:?}; view is empty",
            criteria.date_range.start,
            criteria.date_range.end
        );
        return FilteredView::empty();
    }

    let rows: Vec<&Transaction> = transactions.iter().filter(|t| criteria.matches(t)).collect();
    log::debug!("filter matched {} of {} transactions", rows.len(), transactions.len());
    FilteredView { rows }
}
