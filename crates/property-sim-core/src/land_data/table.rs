use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::matching::BestMatch;
use crate::error::PropertySimError;
use crate::types::Money;
use crate::PropertySimResult;

/// Provenance when no reference table is loaded or the address is blank.
pub const NO_DATA_SOURCE: &str = "地価データなし";
/// Provenance when no reference location clears the similarity cutoff.
pub const NO_MATCH_SOURCE: &str = "該当する基準地なし";

/// Tsubo per square metre.
const SQM_TO_TSUBO: Decimal = dec!(0.3025);
const TEN_THOUSAND: Decimal = dec!(10000);

/// One published reference land price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandPriceRecord {
    #[serde(rename = "所在地", alias = "location")]
    pub location: String,
    /// Yen per square metre
    #[serde(rename = "価格", alias = "price", with = "rust_decimal::serde::str")]
    pub price_per_sqm: Decimal,
}

/// Result of a reference price lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandPriceQuote {
    /// Yen per square metre; zero when nothing matched
    pub price_per_sqm: Money,
    /// Human-readable provenance for display
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_location: Option<String>,
}

impl LandPriceQuote {
    fn sentinel(source: &str) -> Self {
        LandPriceQuote {
            price_per_sqm: Decimal::ZERO,
            source: source.to_string(),
            matched_location: None,
        }
    }
}

/// Read-only table of reference land prices, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct LandPriceTable {
    records: Vec<LandPriceRecord>,
}

impl LandPriceTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<LandPriceRecord>) -> Self {
        LandPriceTable { records }
    }

    /// Parse CSV with `所在地,価格` (or `location,price`) headers.
    pub fn from_csv_reader<R: Read>(reader: R) -> PropertySimResult<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let records = rdr
            .deserialize()
            .collect::<Result<Vec<LandPriceRecord>, _>>()
            .map_err(|e| PropertySimError::DataLoad(e.to_string()))?;
        Ok(Self::from_records(records))
    }

    pub fn from_csv_path(path: &Path) -> PropertySimResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            PropertySimError::DataLoad(format!("Failed to open '{}': {}", path.display(), e))
        })?;
        Self::from_csv_reader(file)
    }

    /// Load the table, degrading to an empty table when the file is missing
    /// or malformed. Lookups against an empty table report no data.
    pub fn load_or_empty(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::empty();
        };
        match Self::from_csv_path(path) {
            Ok(table) => {
                tracing::info!(path = %path.display(), records = table.len(), "land price table loaded");
                table
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "land price table unavailable");
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LandPriceRecord] {
        &self.records
    }

    /// Find the reference price of the location closest to `address`.
    ///
    /// Never fails: an empty table or blank address yields [`NO_DATA_SOURCE`],
    /// no candidate above `cutoff` yields [`NO_MATCH_SOURCE`], both priced at 0.
    pub fn lookup(&self, address: &str, matcher: &dyn BestMatch, cutoff: f64) -> LandPriceQuote {
        if self.records.is_empty() || address.is_empty() {
            return LandPriceQuote::sentinel(NO_DATA_SOURCE);
        }

        let candidates: Vec<&str> = self.records.iter().map(|r| r.location.as_str()).collect();
        let Some(idx) = matcher.best_match(address, &candidates, cutoff) else {
            tracing::debug!(address, cutoff, "no reference location above cutoff");
            return LandPriceQuote::sentinel(NO_MATCH_SOURCE);
        };

        // Duplicate names resolve to the first listed price
        let location = candidates[idx];
        let record = self
            .records
            .iter()
            .find(|r| r.location == location)
            .unwrap_or(&self.records[idx]);

        let man_yen_per_tsubo = (record.price_per_sqm / SQM_TO_TSUBO / TEN_THOUSAND).trunc();
        tracing::debug!(address, location, price = %record.price_per_sqm, "reference location matched");

        LandPriceQuote {
            price_per_sqm: record.price_per_sqm,
            source: format!("近傍基準地: {} ({}万円/坪)", record.location, man_yen_per_tsubo),
            matched_location: Some(record.location.clone()),
        }
    }
}
