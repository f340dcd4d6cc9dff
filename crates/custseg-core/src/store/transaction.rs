use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::{Count, Money};

/// Year-month grouping key, e.g. "2023-07". Lexicographic order on these
/// strings is chronological order.
pub fn period_key_of(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y-%m").to_string()
}

/// One parsed source row before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub customer_id: String,
    pub purchase_timestamp: NaiveDateTime,
    pub age_group: String,
    pub product_category: String,
    pub total_purchase_amount: Money,
    pub quantity: Count,
    pub churned: bool,
    /// Coarse period label only used by the load-time cutoff.
    pub period: String,
}

/// A normalized transaction. Fields are read-only; `period_key` is derived
/// from `purchase_timestamp` exactly once, when the record is converted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    customer_id: String,
    purchase_timestamp: NaiveDateTime,
    period_key: String,
    age_group: String,
    product_category: String,
    total_purchase_amount: Money,
    quantity: Count,
    churned: bool,
    period: String,
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        let period_key = period_key_of(&record.purchase_timestamp);
        Transaction {
            customer_id: record.customer_id,
            purchase_timestamp: record.purchase_timestamp,
            period_key,
            age_group: record.age_group,
            product_category: record.product_category,
            total_purchase_amount: record.total_purchase_amount,
            quantity: record.quantity,
            churned: record.churned,
            period: record.period,
        }
    }
}

impl Transaction {
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn purchase_timestamp(&self) -> NaiveDateTime {
        self.purchase_timestamp
    }

    pub fn purchase_date(&self) -> NaiveDate {
        self.purchase_timestamp.date()
    }

    pub fn period_key(&self) -> &str {
        &self.period_key
    }

    pub fn age_group(&self) -> &str {
        &self.age_group
    }

    pub fn product_category(&self) -> &str {
        &self.product_category
    }

    pub fn total_purchase_amount(&self) -> Money {
        self.total_purchase_amount
    }

    pub fn quantity(&self) -> Count {
        self.quantity
    }

    pub fn churned(&self) -> bool {
        self.churned
    }

    pub fn period(&self) -> &str {
        &self.period
    }
}
