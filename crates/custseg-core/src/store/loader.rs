use std::io::Read;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SegmentationError;
use crate::store::transaction::TransactionRecord;
use crate::types::Count;
use crate::SegmentationResult;

/// Rows whose `Period` is on or after this value are dropped at load.
pub const DEFAULT_CUTOFF_PERIOD: &str = "2023-09";

pub const CUSTOMER_ID: &str = "Customer ID";
pub const PURCHASE_DATE: &str = "Purchase Date";
pub const AGE_GROUP: &str = "Age Group";
pub const PRODUCT_CATEGORY: &str = "Product Category";
pub const TOTAL_PURCHASE_AMOUNT: &str = "Total Purchase Amount";
pub const QUANTITY: &str = "Quantity";
pub const CHURN: &str = "Churn";
pub const PERIOD: &str = "Period";

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Dataset-quality boundary compared lexicographically against `Period`.
    pub cutoff_period: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            cutoff_period: DEFAULT_CUTOFF_PERIOD.to_string(),
        }
    }
}

impl LoadOptions {
    pub fn validate(&self) -> SegmentationResult<()> {
        if self.cutoff_period.trim().is_empty() {
            return Err(SegmentationError::InvalidInput {
                field: "cutoff_period".into(),
                reason: "Cutoff period must not be blank".into(),
            });
        }
        Ok(())
    }
}

/// Header positions of the required columns.
struct ColumnIndex {
    customer_id: usize,
    purchase_date: usize,
    age_group: usize,
    product_category: usize,
    total_purchase_amount: usize,
    quantity: usize,
    churn: usize,
    period: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> SegmentationResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| SegmentationError::MissingColumn {
                    column: name.to_string(),
                })
        };
        Ok(ColumnIndex {
            customer_id: find(CUSTOMER_ID)?,
            purchase_date: find(PURCHASE_DATE)?,
            age_group: find(AGE_GROUP)?,
            product_category: find(PRODUCT_CATEGORY)?,
            total_purchase_amount: find(TOTAL_PURCHASE_AMOUNT)?,
            quantity: find(QUANTITY)?,
            churn: find(CHURN)?,
            period: find(PERIOD)?,
        })
    }
}

/// Parse every row of a CSV transaction log. The first malformed row fails
/// the whole read; no partial result is returned.
pub fn read_records<R: Read>(reader: R) -> SegmentationResult<Vec<TransactionRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let index = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        records.push(parse_row(&row, &index, line)?);
    }
    Ok(records)
}

fn parse_row(row: &StringRecord, index: &ColumnIndex, line: u64) -> SegmentationResult<TransactionRecord> {
    let cell = |i: usize| row.get(i).unwrap_or("");
    let invalid = |field: &str, reason: String| SegmentationError::InvalidRecord {
        line,
        field: field.to_string(),
        reason,
    };

    let customer_id = required_label(cell(index.customer_id))
        .ok_or_else(|| invalid(CUSTOMER_ID, "Value is blank".into()))?;
    let age_group = required_label(cell(index.age_group))
        .ok_or_else(|| invalid(AGE_GROUP, "Value is blank".into()))?;
    let product_category = required_label(cell(index.product_category))
        .ok_or_else(|| invalid(PRODUCT_CATEGORY, "Value is blank".into()))?;
    let period = required_label(cell(index.period))
        .ok_or_else(|| invalid(PERIOD, "Value is blank".into()))?;

    let raw_date = cell(index.purchase_date);
    let purchase_timestamp = parse_purchase_timestamp(raw_date)
        .ok_or_else(|| invalid(PURCHASE_DATE, format!("'{raw_date}' is not a calendar date")))?;

    let total_purchase_amount = parse_amount(cell(index.total_purchase_amount))
        .map_err(|reason| invalid(TOTAL_PURCHASE_AMOUNT, reason))?;
    let quantity = parse_quantity(cell(index.quantity)).map_err(|reason| invalid(QUANTITY, reason))?;
    let churned = parse_churn_flag(cell(index.churn)).map_err(|reason| invalid(CHURN, reason))?;

    Ok(TransactionRecord {
        customer_id,
        purchase_timestamp,
        age_group,
        product_category,
        total_purchase_amount,
        quantity,
        churned,
        period,
    })
}

fn required_label(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Accepts plain dates (midnight), space- or `T`-separated date-times with
/// optional fractional seconds, and RFC 3339 timestamps. RFC 3339 values keep
/// the wall-clock time as written.
pub fn parse_purchase_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let value = Decimal::from_str(raw.trim())
        .or_else(|_| Decimal::from_scientific(raw.trim()))
        .map_err(|_| format!("'{raw}' is not a monetary amount"))?;
    if value < Decimal::ZERO {
        return Err(format!("Amount {value} is negative"));
    }
    Ok(value)
}

fn parse_quantity(raw: &str) -> Result<Count, String> {
    let raw = raw.trim();
    if let Ok(q) = raw.parse::<Count>() {
        return Ok(q);
    }
    // Float-typed exports write whole quantities as "3.0".
    let value = Decimal::from_str(raw).map_err(|_| format!("'{raw}' is not a unit count"))?;
    if value < Decimal::ZERO || !value.fract().is_zero() {
        return Err(format!("'{raw}' is not a non-negative whole number"));
    }
    value
        .to_u64()
        .ok_or_else(|| format!("'{raw}' is out of range"))
}

/// `1` / `1.0` / `true` mark a churned customer. A blank cell is an unknown
/// flag and counts as not churned.
fn parse_churn_flag(raw: &str) -> Result<bool, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(false);
    }
    if raw.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Ok(false);
    }
    let value = Decimal::from_str(raw).map_err(|_| format!("'{raw}' is not a churn flag"))?;
    Ok(value == Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str =
        "Customer ID,Purchase Date,Age Group,Product Category,Total Purchase Amount,Quantity,Churn,Period\n";

    fn ts(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    // 1. Date formats seen in exports
    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(
            parse_purchase_timestamp("2023-01-05"),
            Some(ts(2023, 1, 5, 0, 0, 0))
        );
        assert_eq!(
            parse_purchase_timestamp("2023-01-05 09:38:32"),
            Some(ts(2023, 1, 5, 9, 38, 32))
        );
        assert_eq!(
            parse_purchase_timestamp("2023-01-05T09:38:32"),
            Some(ts(2023, 1, 5, 9, 38, 32))
        );
        assert_eq!(
            parse_purchase_timestamp("2023-01-05T09:38:32+07:00"),
            Some(ts(2023, 1, 5, 9, 38, 32))
        );
        assert!(parse_purchase_timestamp("05/01/2023 nonsense").is_none());
        assert!(parse_purchase_timestamp("2023-02-30").is_none());
        assert!(parse_purchase_timestamp("").is_none());
    }

    // 2. Amount parsing
    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100").unwrap(), dec!(100));
        assert_eq!(parse_amount("49.95").unwrap(), dec!(49.95));
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("abc").is_err());
    }

    // 3. Quantity accepts float-typed whole numbers only
    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3").unwrap(), 3);
        assert_eq!(parse_quantity("3.0").unwrap(), 3);
        assert!(parse_quantity("2.5").is_err());
        assert!(parse_quantity("-2").is_err());
        assert!(parse_quantity("").is_err());
    }

    // 4. Churn flag
    #[test]
    fn test_parse_churn_flag() {
        assert!(parse_churn_flag("1").unwrap());
        assert!(parse_churn_flag("1.0").unwrap());
        assert!(parse_churn_flag("TRUE").unwrap());
        assert!(!parse_churn_flag("0.0").unwrap());
        assert!(!parse_churn_flag("false").unwrap());
        assert!(!parse_churn_flag("").unwrap());
        assert!(parse_churn_flag("yes").is_err());
    }

    // 5. Full read with column reordering
    #[test]
    fn test_read_records_reordered_columns() {
        let csv = "Period,Churn,Quantity,Total Purchase Amount,Product Category,Age Group,Purchase Date,Customer ID,Extra\n\
                   2023-01,1.0,2,100.5,Books,Youth,2023-01-05 10:00:00,46251,x\n";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.customer_id, "46251");
        assert_eq!(r.purchase_timestamp, ts(2023, 1, 5, 10, 0, 0));
        assert_eq!(r.age_group, "Youth");
        assert_eq!(r.product_category, "Books");
        assert_eq!(r.total_purchase_amount, dec!(100.5));
        assert_eq!(r.quantity, 2);
        assert!(r.churned);
        assert_eq!(r.period, "2023-01");
    }

    // 6. Missing column
    #[test]
    fn test_missing_column_rejected() {
        let csv = "Customer ID,Purchase Date,Age Group,Product Category,Total Purchase Amount,Quantity,Period\n";
        match read_records(csv.as_bytes()) {
            Err(SegmentationError::MissingColumn { column }) => assert_eq!(column, CHURN),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    // 7. Malformed date names the line
    #[test]
    fn test_malformed_date_fails_load() {
        let csv = format!(
            "{HEADER}C1,2023-01-05,Youth,Books,10,1,0,2023-01\nC2,not-a-date,Adult,Books,10,1,0,2023-01\n"
        );
        match read_records(csv.as_bytes()) {
            Err(SegmentationError::InvalidRecord { line, field, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(field, PURCHASE_DATE);
            }
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    // 8. Blank customer id
    #[test]
    fn test_blank_customer_rejected() {
        let csv = format!("{HEADER} ,2023-01-05,Youth,Books,10,1,0,2023-01\n");
        let err = read_records(csv.as_bytes()).unwrap_err();
        assert!(err.is_data_load_error());
    }

    #[test]
    fn test_blank_cutoff_invalid() {
        let options = LoadOptions {
            cutoff_period: "  ".into(),
        };
        assert!(options.validate().is_err());
        assert!(LoadOptions::default().validate().is_ok());
    }
}
