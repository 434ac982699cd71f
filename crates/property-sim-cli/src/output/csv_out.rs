use serde_json::Value;
use std::io;

use super::{flatten, result_of, scalar_text};

/// Write the result as two-column `field,value` CSV, nested fields dotted.
/// Sampled projection rows follow as their own table.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match result_of(value) {
        Value::Object(map) => {
            let _ = wtr.write_record(["field", "value"]);
            let mut tables = Vec::new();
            for (key, val) in flatten(map) {
                match val {
                    Value::Array(rows) if rows.iter().all(Value::is_object) && !rows.is_empty() => {
                        tables.push(rows)
                    }
                    other => {
                        let _ = wtr.write_record([key.as_str(), &scalar_text(&other, "")]);
                    }
                }
            }
            let _ = wtr.flush();
            drop(wtr);

            for rows in tables {
                println!();
                let mut table_wtr = csv::WriterBuilder::new()
                    .flexible(true)
                    .from_writer(io::stdout().lock());
                write_rows(&mut table_wtr, &rows);
                let _ = table_wtr.flush();
            }
            return;
        }
        Value::Array(rows) => write_rows(&mut wtr, rows),
        other => {
            let _ = wtr.write_record([&scalar_text(other, "")]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(|v| scalar_text(v, "")).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
