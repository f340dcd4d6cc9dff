//! Filter Engine: date range, age group and product category predicates.

pub mod criteria;
pub mod view;

use crate::store::TransactionStore;

pub use criteria::{DateRange, FilterCriteria, LabelSelection};
pub use view::{apply, FilteredView};

/// Human-readable notes about criteria that will silently narrow a view:
/// inverted ranges and selected labels the dataset never uses.
pub fn criteria_warnings(criteria: &FilterCriteria, store: &TransactionStore) -> Vec<String> {
    let mut warnings = Vec::new();

    if criteria.date_range.is_inverted() {
        warnings.push(format!(
            "Date range start {} is after end {}; no transactions selected",
            criteria
                .date_range
                .start
                .map(|d| d.to_string())
                .unwrap_or_default(),
            criteria
                .date_range
                .end
                .map(|d| d.to_string())
                .unwrap_or_default(),
        ));
    }

    let known_ages = store.age_groups();
    for label in criteria.age_groups.labels() {
        if !known_ages.contains(&label) {
            warnings.push(format!("Age group '{label}' does not occur in the dataset"));
        }
    }

    let known_categories = store.product_categories();
    for label in criteria.product_categories.labels() {
        if !known_categories.contains(&label) {
            warnings.push(format!(
                "Product category '{label}' does not occur in the dataset"
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LoadOptions, TransactionRecord};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(customer: &str, day: u32, age: &str, category: &str) -> TransactionRecord {
        TransactionRecord {
            customer_id: customer.into(),
            purchase_timestamp: NaiveDate::from_ymd_opt(2023, 1, day)
                .unwrap()
                .and_hms_opt(18, 45, 0)
                .unwrap(),
            age_group: age.into(),
            product_category: category.into(),
            total_purchase_amount: dec!(25),
            quantity: 1,
            churned: false,
            period: "2023-01".into(),
        }
    }

    fn store() -> TransactionStore {
        TransactionStore::from_records(
            vec![
                record("C1", 1, "Youth", "Books"),
                record("C2", 5, "Adult", "Toys"),
                record("C3", 10, "Senior", "Books"),
                record("C4", 20, "Adult", "Books"),
            ],
            &LoadOptions::default(),
        )
        .unwrap()
    }

    fn ids(view: &FilteredView<'_>) -> Vec<String> {
        view.iter().map(|t| t.customer_id().to_string()).collect()
    }

    // 1. No criteria keeps everything in order
    #[test]
    fn test_default_criteria_is_identity() {
        let store = store();
        let view = store.filter(&FilterCriteria::default());
        assert_eq!(ids(&view), vec!["C1", "C2", "C3", "C4"]);
    }

    // 2. AND across dimensions
    #[test]
    fn test_dimensions_combine_with_and() {
        let store = store();
        let criteria = FilterCriteria::default()
            .with_age_groups(LabelSelection::from_labels(["Adult", "Senior"]).unwrap())
            .with_product_categories(LabelSelection::from_labels(["Books"]).unwrap());
        assert_eq!(ids(&store.filter(&criteria)), vec!["C3", "C4"]);
    }

    // 3. End bound covers the whole day, not just midnight
    #[test]
    fn test_end_bound_includes_evening_purchase() {
        let store = store();
        let criteria = FilterCriteria::default().with_date_range(DateRange::between(
            NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
        ));
        assert_eq!(ids(&store.filter(&criteria)), vec!["C2", "C3"]);
    }

    // 4. Inverted range is empty, never an error
    #[test]
    fn test_inverted_range_empty_view() {
        let store = store();
        let criteria = FilterCriteria::default().with_date_range(DateRange::between(
            NaiveDate::from_ymd_opt(2023, 1, 20).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        ));
        assert!(store.filter(&criteria).is_empty());
        assert_eq!(criteria_warnings(&criteria, &store).len(), 1);
    }

    // 5. Full selection equals no selection
    #[test]
    fn test_full_selection_equals_unrestricted() {
        let store = store();
        let full = FilterCriteria::default()
            .with_age_groups(LabelSelection::from_labels(store.age_groups()).unwrap());
        assert_eq!(
            ids(&store.filter(&full)),
            ids(&store.filter(&FilterCriteria::default()))
        );
    }

    #[test]
    fn test_unknown_labels_warned() {
        let store = store();
        let criteria = FilterCriteria::default()
            .with_age_groups(LabelSelection::from_labels(["Toddler"]).unwrap())
            .with_product_categories(LabelSelection::from_labels(["Books", "Garden"]).unwrap());
        let warnings = criteria_warnings(&criteria, &store);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("Toddler"));
        assert!(warnings[1].contains("Garden"));
        assert!(store.filter(&criteria).is_empty());
    }
}
