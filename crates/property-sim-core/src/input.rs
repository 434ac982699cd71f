//! Request normalisation.
//!
//! The front-end posts a flat JSON object whose fields may be missing,
//! `null`, `""`, `false` or `0`. [`normalize`] resolves all of those to zero
//! (or the documented fallback) once, so every formula downstream works on a
//! fully populated [`SimulationInput`].

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PropertySimError;
use crate::property::operating::Structure;
use crate::property::region::Region;
use crate::types::{Money, Years};
use crate::PropertySimResult;

/// Largest absolute value accepted for any numeric field.
const MAX_MAGNITUDE: Decimal = dec!(1_000_000_000_000_000);

/// Fully defaulted simulation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    /// Free-text property address used for the reference price lookup
    pub address: String,
    /// Land area in square metres
    pub land_area: Decimal,
    /// Building purchase price
    pub building_cost: Money,
    /// Land purchase price
    pub land_cost: Money,
    /// Building age in years at acquisition (0 = new build)
    pub building_age: Years,
    /// Gross floor area in square metres
    pub building_area: Decimal,
    pub structure: Structure,
    /// Number of rentable units
    pub rooms: Decimal,
    /// Annual gross rent
    pub rent: Money,
    pub loan_amount: Money,
    /// Loan term in whole years
    pub loan_term: u32,
    /// Annual interest rate as a percentage (2.5 = 2.5%)
    pub interest_rate: Decimal,
    pub has_elevator: bool,
    pub region: Region,
}

/// Normalise a raw request object into a [`SimulationInput`].
///
/// Missing and falsy values become zero. Region falls back to inference from
/// the address, structure falls back to wood. Values that cannot be read as
/// numbers at all are rejected.
pub fn normalize(raw: &Value) -> PropertySimResult<SimulationInput> {
    let map = raw.as_object().ok_or_else(|| PropertySimError::InvalidInput {
        field: "request".into(),
        reason: "expected a JSON object".into(),
    })?;
    let field = |key: &str| map.get(key).filter(|v| !is_falsy(v));

    let address = text(field("address"));
    let structure = Structure::from_name(&text(field("structure")));
    let region_name = text(field("region"));
    let region = if region_name.is_empty() {
        Region::infer_from_address(&address)
    } else {
        Region::from_name(&region_name)
    };
    let has_elevator = match field("hasElevator") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "yes",
        _ => false,
    };

    Ok(SimulationInput {
        land_area: number("landArea", field("landArea"))?,
        building_cost: number("buildingCost", field("buildingCost"))?,
        land_cost: number("landCost", field("landCost"))?,
        building_age: number("buildingAge", field("buildingAge"))?,
        building_area: number("buildingArea", field("buildingArea"))?,
        structure,
        rooms: number("rooms", field("rooms"))?,
        rent: number("rent", field("rent"))?,
        loan_amount: number("loanAmount", field("loanAmount"))?,
        loan_term: whole_years("loanTerm", field("loanTerm"))?,
        interest_rate: number("interestRate", field("interestRate"))?,
        has_elevator,
        region,
        address,
    })
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn number(field: &str, value: Option<&Value>) -> PropertySimResult<Decimal> {
    let parsed = match value {
        None => return Ok(Decimal::ZERO),
        Some(Value::Bool(true)) => Some(Decimal::ONE),
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(s.trim()),
        Some(_) => None,
    };

    let parsed = parsed.ok_or_else(|| PropertySimError::InvalidInput {
        field: field.into(),
        reason: "not a number".into(),
    })?;

    if parsed.abs() > MAX_MAGNITUDE {
        return Err(PropertySimError::InvalidInput {
            field: field.into(),
            reason: format!("magnitude exceeds {MAX_MAGNITUDE}"),
        });
    }
    Ok(parsed)
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Whole years, truncated toward zero; negative terms count as no term.
fn whole_years(field: &str, value: Option<&Value>) -> PropertySimResult<u32> {
    let years = number(field, value)?.trunc().max(Decimal::ZERO);
    years.to_u32().ok_or_else(|| PropertySimError::InvalidInput {
        field: field.into(),
        reason: "term is too long".into(),
    })
}
