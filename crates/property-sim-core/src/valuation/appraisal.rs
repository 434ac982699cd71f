use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::property::region::Region;
use crate::types::{overflow, Money, Rate};
use crate::PropertySimResult;

const DEFAULT_LAND_CAP_RATE: Rate = dec!(0.035);
const BUILDING_CAP_RATE: Rate = dec!(0.055);
const COST_APPROACH_WEIGHT: Rate = dec!(0.7);
const INCOME_APPROACH_WEIGHT: Rate = dec!(0.3);
/// Lender haircut applied to the bank appraisal
const COLLATERAL_RATIO: Rate = dec!(0.8);

/// The three valuation approaches and the resulting collateral value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Land evaluation plus depreciated building value
    pub cost_approach_value: Money,
    /// NOI capitalised at blended land/building cap rates
    pub income_approach_value: Money,
    /// 70% cost approach + 30% income approach
    pub bank_appraisal_value: Money,
    /// 80% of the bank appraisal
    pub collateral_value: Money,
}

/// Land capitalisation rate for a market area.
pub fn land_cap_rate(region: Region) -> Rate {
    match region {
        Region::Naha => dec!(0.032),
        Region::Chunanbu => dec!(0.034),
        Region::Hokubu => dec!(0.035),
        Region::Unclassified => DEFAULT_LAND_CAP_RATE,
    }
}

pub fn building_cap_rate() -> Rate {
    BUILDING_CAP_RATE
}

/// Appraise a property the way a lender does.
///
/// NOI is attributed to land and building in proportion to their values and
/// each share is capitalised at its own rate. With no land or building value
/// the split denominator falls back to 1, leaving the income approach at zero.
/// Fails when an intermediate figure overflows.
pub fn appraise(
    noi: Money,
    land_value: Money,
    building_value: Money,
    region: Region,
) -> PropertySimResult<ValuationResult> {
    let cost_approach_value = land_value
        .checked_add(building_value)
        .ok_or_else(|| overflow("cost_approach_value"))?;
    let split_base = if cost_approach_value > Decimal::ZERO {
        cost_approach_value
    } else {
        Decimal::ONE
    };

    let capitalised = |value: Money, cap_rate: Rate| {
        value
            .checked_div(split_base)
            .and_then(|share| noi.checked_mul(share))
            .and_then(|attributed| attributed.checked_div(cap_rate))
    };
    let income_approach_value = capitalised(land_value, land_cap_rate(region))
        .zip(capitalised(building_value, BUILDING_CAP_RATE))
        .and_then(|(land, building)| land.checked_add(building))
        .ok_or_else(|| overflow("income_approach_value"))?;

    let bank_appraisal_value = cost_approach_value
        .checked_mul(COST_APPROACH_WEIGHT)
        .zip(income_approach_value.checked_mul(INCOME_APPROACH_WEIGHT))
        .and_then(|(cost, income)| cost.checked_add(income))
        .ok_or_else(|| overflow("bank_appraisal_value"))?;

    Ok(ValuationResult {
        cost_approach_value,
        income_approach_value,
        bank_appraisal_value,
        collateral_value: bank_appraisal_value * COLLATERAL_RATIO,
    })
}
