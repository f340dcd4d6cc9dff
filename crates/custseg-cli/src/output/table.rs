use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_cell, is_record_array};

/// Render the result as tables: scalar fields in a Field/Value table, each
/// nested series (monthly sales, segment trend, churn) in its own table.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_notes(map);
            } else {
                print_object(None, map);
            }
        }
        Value::Array(arr) => print_records(None, arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    match result {
        Value::Object(map) => print_object(None, map),
        Value::Array(arr) => print_records(None, arr),
        other => println!("{}", format_cell(other)),
    }
}

fn print_object(title: Option<&str>, map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut scalars = 0;
    let mut nested: Vec<(&str, &Value)> = Vec::new();

    for (key, val) in map {
        if val.is_object() || is_record_array(val) {
            nested.push((key.as_str(), val));
        } else {
            builder.push_record([key.as_str(), &format_cell(val)]);
            scalars += 1;
        }
    }

    if scalars > 0 {
        if let Some(t) = title {
            println!("\n{}", t);
        }
        println!("{}", Table::from(builder));
    }

    for (key, val) in nested {
        match val {
            Value::Object(inner) => print_object(Some(key), inner),
            Value::Array(arr) => print_records(Some(key), arr),
            _ => {}
        }
    }
}

fn print_records(title: Option<&str>, arr: &[Value]) {
    if let Some(t) = title {
        println!("\n{}", t);
    }
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.iter().map(String::as_str));

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_cell).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_cell(item));
        }
    }
}

fn print_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
