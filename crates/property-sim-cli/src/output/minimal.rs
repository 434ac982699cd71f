use serde_json::Value;

use super::{result_of, scalar_text};

/// Fields printed by `--output minimal`, first present non-null wins.
const PRIORITY_KEYS: [&str; 5] = [
    "rank",
    "estimated_loan_amount",
    "score",
    "source",
    "market_price",
];

/// Print just the key answer: the rank and A-rank loan for a simulation,
/// the provenance for a lookup.
pub fn print_minimal(value: &Value) {
    let result_obj = result_of(value);

    if let Value::Object(map) = result_obj {
        let picked: Vec<String> = PRIORITY_KEYS
            .iter()
            .filter_map(|key| map.get(*key).filter(|v| !v.is_null()))
            .take(2)
            .map(|v| scalar_text(v, "null"))
            .collect();
        if !picked.is_empty() {
            println!("{}", picked.join(" "));
            return;
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar_text(val, "null"));
            return;
        }
    }

    println!("{}", scalar_text(result_obj, "null"));
}
