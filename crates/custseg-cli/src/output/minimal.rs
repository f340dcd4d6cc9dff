use serde_json::Value;

use super::{format_cell, result_of};

/// Headline figures, most important first.
const PRIORITY_KEYS: [&str; 5] = [
    "total_sales",
    "order_count",
    "avg_order_value",
    "units_sold",
    "transactions",
];

/// Print only the headline answer: the first priority metric present, or
/// one line per series point.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    match result {
        Value::Array(arr) => {
            for item in arr {
                println!("{}", format_row(item));
            }
        }
        Value::Object(map) => {
            let metrics = map.get("metrics").and_then(Value::as_object).unwrap_or(map);
            for key in &PRIORITY_KEYS {
                if let Some(val) = metrics.get(*key) {
                    if !val.is_null() {
                        println!("{}", format_cell(val));
                        return;
                    }
                }
            }
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_cell(val));
            }
        }
        other => println!("{}", format_cell(other)),
    }
}

/// Space-joined values of one series point, e.g. `2023-01 150`.
fn format_row(item: &Value) -> String {
    match item {
        Value::Object(map) => map.values().map(format_cell).collect::<Vec<_>>().join(" "),
        other => format_cell(other),
    }
}
