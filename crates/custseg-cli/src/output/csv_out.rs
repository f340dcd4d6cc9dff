use serde_json::{Map, Value};
use std::io;

use super::{format_cell, is_record_array, result_of};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write the result as CSV to stdout. A series becomes one row per point;
/// an object becomes `field,value` rows, with nested series appended as
/// further header-plus-rows blocks separated by an empty record.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(stdout.lock());

    match result_of(value) {
        Value::Array(arr) => write_records(&mut wtr, arr),
        Value::Object(map) => write_object(&mut wtr, map),
        other => {
            let _ = wtr.write_record([format_cell(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_object(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    let mut series: Vec<(&str, &[Value])> = Vec::new();
    flatten_into(wtr, "", map, &mut series);

    for (name, arr) in series {
        let _ = wtr.write_record([""]);
        let _ = wtr.write_record([name]);
        write_records(wtr, arr);
    }
}

/// Scalars are written immediately as `prefix.key,value`; record arrays are
/// collected for later blocks.
fn flatten_into<'v>(
    wtr: &mut StdoutWriter<'_>,
    prefix: &str,
    map: &'v Map<String, Value>,
    series: &mut Vec<(&'v str, &'v [Value])>,
) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match val {
            Value::Object(inner) => flatten_into(wtr, &name, inner, series),
            Value::Array(arr) if is_record_array(val) => series.push((key.as_str(), arr.as_slice())),
            _ => {
                let _ = wtr.write_record([name.as_str(), &format_cell(val)]);
            }
        }
    }
}

fn write_records(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([format_cell(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_cell).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
