use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::input::SimulationInput;
use crate::types::{overflow, Money, Rate, Years};
use crate::PropertySimResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Building construction type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Structure {
    /// Reinforced concrete
    #[serde(rename = "RC")]
    Rc,
    Steel,
    #[default]
    Wood,
    /// Reinforced concrete block
    #[serde(rename = "RC_Block")]
    RcBlock,
}

/// Replacement cost and statutory useful life of a structure type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureProfile {
    /// Replacement cost per square metre of floor area
    pub replacement_cost: Money,
    /// Useful life in years
    pub useful_life: Years,
}

impl Structure {
    /// Parse a structure code. Anything unrecognised is treated as wood.
    pub fn from_name(name: &str) -> Self {
        match name {
            "RC" => Structure::Rc,
            "Steel" => Structure::Steel,
            "RC_Block" => Structure::RcBlock,
            _ => Structure::Wood,
        }
    }

    pub fn profile(self) -> StructureProfile {
        let (replacement_cost, useful_life) = match self {
            Structure::Rc => (dec!(20), dec!(47)),
            Structure::Steel => (dec!(18.6), dec!(34)),
            Structure::Wood => (dec!(17.8), dec!(22)),
            Structure::RcBlock => (dec!(18), dec!(38)),
        };
        StructureProfile {
            replacement_cost,
            useful_life,
        }
    }
}

/// Year-1 operating expenses. Reused unchanged for every projection year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    /// Expensed share (30%) of the repair allowance
    pub repair_cost: Money,
    pub property_tax: Money,
    pub fire_insurance: Money,
    pub management_fee: Money,
    /// Reserved share (70%) of the repair allowance
    pub capital_expenditure: Money,
    /// Common-area electricity and water
    pub utilities: Money,
    pub elevator_cost: Money,
    pub water_tank_cost: Money,
    pub total: Money,
}

impl ExpenseBreakdown {
    /// Every line item rounded to two decimal places.
    pub fn rounded(&self) -> Self {
        ExpenseBreakdown {
            repair_cost: self.repair_cost.round_dp(2),
            property_tax: self.property_tax.round_dp(2),
            fire_insurance: self.fire_insurance.round_dp(2),
            management_fee: self.management_fee.round_dp(2),
            capital_expenditure: self.capital_expenditure.round_dp(2),
            utilities: self.utilities.round_dp(2),
            elevator_cost: self.elevator_cost.round_dp(2),
            water_tank_cost: self.water_tank_cost.round_dp(2),
            total: self.total.round_dp(2),
        }
    }
}

/// First-year operating picture of the property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingModel {
    pub profile: StructureProfile,
    /// Cost to rebuild the building new
    pub replacement_cost: Money,
    /// Depreciated building value in year 1
    pub building_value: Money,
    pub expenses: ExpenseBreakdown,
    /// Rent less total expenses, before debt service
    pub noi: Money,
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const NEW_BUILDING_AGE_LIMIT: Years = dec!(10);
const REPAIR_RATE_NEWER: Rate = dec!(0.007);
const REPAIR_RATE_OLDER: Rate = dec!(0.010);
const REPAIR_EXPENSED_SHARE: Rate = dec!(0.3);
const REPAIR_RESERVED_SHARE: Rate = dec!(0.7);
const PROPERTY_TAX_RATE: Rate = dec!(0.014);
const FIRE_INSURANCE_RATE: Rate = dec!(0.001);
const MANAGEMENT_FEE_RATE: Rate = dec!(0.05);
const UTILITIES_PER_ROOM: Money = dec!(2.3);
const ELEVATOR_MAINTENANCE_COST: Money = dec!(40);
const WATER_TANK_CLEANING_COST: Money = dec!(5);

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Straight-line depreciated value, zero once `total_age` reaches the useful
/// life. A non-positive useful life yields zero.
pub fn depreciated_value(
    replacement_cost: Money,
    useful_life: Years,
    total_age: Years,
) -> PropertySimResult<Money> {
    if useful_life <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let remaining = ((useful_life - total_age) / useful_life).max(Decimal::ZERO);
    replacement_cost
        .checked_mul(remaining)
        .ok_or_else(|| overflow("building_age"))
}

/// Build the year-1 operating model: building value, expense basket and NOI.
///
/// Depreciation and the repair tier use the building's age during year 1,
/// i.e. its age at acquisition plus one.
pub fn year_one_operations(input: &SimulationInput) -> PropertySimResult<OperatingModel> {
    let profile = input.structure.profile();
    let replacement_cost = profile.replacement_cost * input.building_area;
    let total_age = input.building_age + Decimal::ONE;
    let building_value = depreciated_value(replacement_cost, profile.useful_life, total_age)?;

    let repair_rate = if total_age <= NEW_BUILDING_AGE_LIMIT {
        REPAIR_RATE_NEWER
    } else {
        REPAIR_RATE_OLDER
    };
    let repair_allowance = replacement_cost * repair_rate;

    // Assessed values: land at 1/6, building at 1/2 (residential relief)
    let property_tax = input.land_cost / dec!(6) * PROPERTY_TAX_RATE
        + building_value / dec!(2) * PROPERTY_TAX_RATE;

    let mut expenses = ExpenseBreakdown {
        repair_cost: repair_allowance * REPAIR_EXPENSED_SHARE,
        property_tax,
        fire_insurance: building_value * FIRE_INSURANCE_RATE,
        management_fee: input.rent * MANAGEMENT_FEE_RATE,
        capital_expenditure: repair_allowance * REPAIR_RESERVED_SHARE,
        utilities: UTILITIES_PER_ROOM * input.rooms,
        elevator_cost: if input.has_elevator {
            ELEVATOR_MAINTENANCE_COST
        } else {
            Decimal::ZERO
        },
        water_tank_cost: WATER_TANK_CLEANING_COST,
        total: Decimal::ZERO,
    };
    expenses.total = expenses.repair_cost
        + expenses.property_tax
        + expenses.fire_insurance
        + expenses.management_fee
        + expenses.capital_expenditure
        + expenses.utilities
        + expenses.elevator_cost
        + expenses.water_tank_cost;

    Ok(OperatingModel {
        profile,
        replacement_cost,
        building_value,
        noi: input.rent - expenses.total,
        expenses,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::normalize;
    use serde_json::json;

    fn demo_input() -> SimulationInput {
        normalize(&json!({
            "address": "沖縄市泡瀬4丁目", "rent": 2304, "rooms": 24, "buildingCost": 25650,
            "landCost": 8000, "loanAmount": 30000, "loanTerm": 35, "interestRate": 2.3,
            "structure": "RC", "buildingAge": 0, "buildingArea": 1080, "landArea": 600,
            "hasElevator": "yes", "region": "Chunanbu",
        }))
        .unwrap()
    }

    #[test]
    fn test_unknown_structure_is_wood() {
        assert_eq!(Structure::from_name("Brick"), Structure::Wood);
        assert_eq!(Structure::from_name("Steel").profile().useful_life, dec!(34));
    }

    #[test]
    fn test_depreciation_straight_line() {
        // 47-year life, 6 years old: 1000 * 41/47
        let v = depreciated_value(dec!(1000), dec!(47), dec!(6)).unwrap();
        assert_eq!(v, dec!(1000) * dec!(41) / dec!(47));
    }

    #[test]
    fn test_depreciation_floors_at_zero() {
        assert_eq!(depreciated_value(dec!(1000), dec!(22), dec!(22)).unwrap(), Decimal::ZERO);
        assert_eq!(depreciated_value(dec!(1000), dec!(22), dec!(40)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_depreciation_zero_life_guard() {
        assert_eq!(depreciated_value(dec!(1000), Decimal::ZERO, dec!(1)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_demo_replacement_and_value() {
        let model = year_one_operations(&demo_input()).unwrap();
        // RC: 20 per m2 * 1080 m2
        assert_eq!(model.replacement_cost, dec!(21600));
        // 21600 * 46/47
        assert_eq!(model.building_value.round_dp(2), dec!(21140.43));
    }

    #[test]
    fn test_demo_expense_items() {
        let e = year_one_operations(&demo_input()).unwrap().expenses.rounded();
        // 21600 * 0.007 = 151.2, split 30/70
        assert_eq!(e.repair_cost, dec!(45.36));
        assert_eq!(e.capital_expenditure, dec!(105.84));
        // 8000/6*0.014 + 21140.43/2*0.014
        assert_eq!(e.property_tax, dec!(166.65));
        assert_eq!(e.fire_insurance, dec!(21.14));
        assert_eq!(e.management_fee, dec!(115.2));
        assert_eq!(e.utilities, dec!(55.2));
        assert_eq!(e.elevator_cost, dec!(40));
        assert_eq!(e.water_tank_cost, dec!(5));
        assert_eq!(e.total, dec!(554.39));
    }

    #[test]
    fn test_demo_noi() {
        let model = year_one_operations(&demo_input()).unwrap();
        assert_eq!(model.noi.round_dp(2), dec!(1749.61));
    }

    #[test]
    fn test_older_building_uses_higher_repair_rate() {
        let mut input = demo_input();
        input.building_age = dec!(10);
        let model = year_one_operations(&input).unwrap();
        // total age 11 > 10 → 1.0%
        assert_eq!(model.expenses.repair_cost, dec!(21600) * dec!(0.010) * dec!(0.3));
    }

    #[test]
    fn test_expenses_sum_to_total() {
        let e = year_one_operations(&demo_input()).unwrap().expenses;
        let sum = e.repair_cost
            + e.property_tax
            + e.fire_insurance
            + e.management_fee
            + e.capital_expenditure
            + e.utilities
            + e.elevator_cost
            + e.water_tank_cost;
        assert_eq!(sum, e.total);
    }

    #[test]
    fn test_negative_age_overflow_is_error() {
        let mut input = demo_input();
        input.building_age = dec!(-1_000_000_000_000_000);
        assert!(year_one_operations(&input).is_err());
    }
}
