use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PropertySimError;
use crate::PropertySimResult;

/// All monetary values, in ten-thousand-yen units. Wraps Decimal to prevent
/// accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Ratios such as DSCR (1.25x)
pub type Multiple = Decimal;

/// Year counts or building ages
pub type Years = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Round to whole currency units (banker's rounding).
pub fn round_money(value: Money) -> Money {
    value.round_dp(0)
}

/// Round a percentage or ratio to two decimal places (banker's rounding).
pub fn round_ratio(value: Decimal) -> Decimal {
    value.round_dp(2)
}

/// Error for an intermediate figure too large to represent.
pub fn overflow(field: &str) -> PropertySimError {
    PropertySimError::InvalidInput {
        field: field.into(),
        reason: "value overflows".into(),
    }
}

/// `numerator / denominator * 100`, failing instead of overflowing.
pub fn checked_percent(
    numerator: Decimal,
    denominator: Decimal,
    field: &str,
) -> PropertySimResult<Decimal> {
    numerator
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or_else(|| overflow(field))
}
