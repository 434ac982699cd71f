use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, result_of, scalar_text};

/// Format output as tables: scalar fields first, then one table per list of
/// rows (the long-term projection), then warnings and methodology.
pub fn print_table(value: &Value) {
    match result_of(value) {
        Value::Object(res_map) => print_result_table(res_map),
        Value::Array(rows) => print_rows(rows),
        other => println!("{}", scalar_text(other, "null")),
    }

    let Some(envelope) = value.as_object().filter(|m| m.contains_key("result")) else {
        return;
    };

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_result_table(res_map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut row_tables = Vec::new();

    for (key, val) in flatten(res_map) {
        match val {
            Value::Array(rows) if !rows.is_empty() && rows.iter().all(Value::is_object) => {
                row_tables.push((key, rows));
            }
            other => builder.push_record([key, scalar_text(&other, "null")]),
        }
    }
    println!("{}", Table::from(builder));

    for (title, rows) in row_tables {
        println!("\n{}:", title);
        print_rows(&rows);
    }
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            println!("{}", scalar_text(item, "null"));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| {
                    map.get(h.as_str())
                        .map(|v| scalar_text(v, "null"))
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}
