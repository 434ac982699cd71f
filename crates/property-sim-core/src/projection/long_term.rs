use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::property::operating::depreciated_value;
use crate::property::region::Region;
use crate::time_value::amortize_year;
use crate::types::{overflow, round_money, Money, Rate, Years};
use crate::valuation::appraisal::appraise;
use crate::PropertySimResult;

pub const PROJECTION_YEARS: u32 = 35;
const SAMPLE_INTERVAL: u32 = 5;
/// Rent is cut by this much at each sampled checkpoint once the building is old.
const RENT_DECAY: Rate = dec!(0.01);
const RENT_DECAY_AGE: Years = dec!(10);

/// Everything the projection needs from the year-1 model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub rent: Money,
    /// Year-1 expense total, held flat over the projection
    pub expenses_total: Money,
    /// Year-1 NOI, used for every year's collateral appraisal
    pub noi_year1: Money,
    pub loan_amount: Money,
    /// Annual rate as a percentage
    pub interest_rate: Decimal,
    pub loan_term: u32,
    pub yearly_payment: Money,
    pub building_age: Years,
    pub replacement_cost: Money,
    pub useful_life: Years,
    pub land_value: Money,
    pub region: Region,
}

/// Full, unrounded state at the end of one projection year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionYear {
    pub year: u32,
    pub rent: Money,
    pub noi: Money,
    pub loan_payment: Money,
    pub cash_flow: Money,
    pub loan_balance: Money,
    pub building_value: Money,
    pub collateral_value: Money,
    pub cumulative_cash_flow: Money,
}

/// Sampled projection row, rounded to whole units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub year: u32,
    pub cash_flow: Money,
    pub loan_balance: Money,
    pub collateral_value: Money,
    pub cumulative_cash_flow: Money,
}

impl From<&ProjectionYear> for ProjectionPoint {
    fn from(y: &ProjectionYear) -> Self {
        ProjectionPoint {
            year: y.year,
            cash_flow: round_money(y.cash_flow),
            loan_balance: round_money(y.loan_balance),
            collateral_value: round_money(y.collateral_value),
            cumulative_cash_flow: round_money(y.cumulative_cash_flow),
        }
    }
}

/// Simulate every year from 1 to [`PROJECTION_YEARS`].
pub fn project_years(input: &ProjectionInput) -> PropertySimResult<Vec<ProjectionYear>> {
    let mut years = Vec::with_capacity(PROJECTION_YEARS as usize);
    let mut rent = input.rent;
    let mut balance = input.loan_amount;
    let mut cumulative = Decimal::ZERO;

    for year in 1..=PROJECTION_YEARS {
        let total_age = input.building_age + Decimal::from(year);
        let within_term = year <= input.loan_term;

        let noi = rent - input.expenses_total;
        let loan_payment = if within_term {
            input.yearly_payment
        } else {
            Decimal::ZERO
        };
        let cash_flow = noi
            .checked_sub(loan_payment)
            .ok_or_else(|| overflow("cash_flow"))?;
        cumulative = cumulative
            .checked_add(cash_flow)
            .ok_or_else(|| overflow("cumulative_cash_flow"))?;

        balance = if within_term && input.loan_amount > Decimal::ZERO {
            amortize_year(balance, input.interest_rate, input.yearly_payment)?
        } else {
            Decimal::ZERO
        };

        let building_value = depreciated_value(input.replacement_cost, input.useful_life, total_age)?;
        let collateral_value =
            appraise(input.noi_year1, input.land_value, building_value, input.region)?
                .collateral_value;

        years.push(ProjectionYear {
            year,
            rent,
            noi,
            loan_payment,
            cash_flow,
            loan_balance: balance,
            building_value,
            collateral_value,
            cumulative_cash_flow: cumulative,
        });

        if total_age > RENT_DECAY_AGE && year % SAMPLE_INTERVAL == 0 {
            rent *= Decimal::ONE - RENT_DECAY;
        }
    }

    Ok(years)
}

pub fn is_sampled(year: u32) -> bool {
    year == 1 || year % SAMPLE_INTERVAL == 0
}

/// Year 1 and every fifth year, rounded for reporting.
pub fn long_term_projection(input: &ProjectionInput) -> PropertySimResult<Vec<ProjectionPoint>> {
    Ok(project_years(input)?
        .iter()
        .filter(|y| is_sampled(y.year))
        .map(ProjectionPoint::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_projection() -> ProjectionInput {
        ProjectionInput {
            rent: dec!(2304),
            expenses_total: dec!(554.39),
            noi_year1: dec!(1749.61),
            loan_amount: dec!(30000),
            interest_rate: dec!(2.3),
            loan_term: 35,
            yearly_payment: dec!(1248.72),
            building_age: Decimal::ZERO,
            replacement_cost: dec!(21600),
            useful_life: dec!(47),
            land_value: Decimal::ZERO,
            region: Region::Chunanbu,
        }
    }

    #[test]
    fn test_sampled_years() {
        let years: Vec<u32> = long_term_projection(&demo_projection())
            .unwrap()
            .iter()
            .map(|p| p.year)
            .collect();
        assert_eq!(years, vec![1, 5, 10, 15, 20, 25, 30, 35]);
    }

    #[test]
    fn test_cumulative_includes_unsampled_years() {
        let years = project_years(&demo_projection()).unwrap();
        assert_eq!(years.len(), 35);
        let mut running = Decimal::ZERO;
        for y in &years {
            running += y.cash_flow;
            assert_eq!(y.cumulative_cash_flow, running);
        }
    }

    #[test]
    fn test_rent_decay_only_after_age_ten() {
        let years = project_years(&demo_projection()).unwrap();
        // New build: age 10 at year 10, so the first cut lands after year 15
        assert_eq!(years[14].rent, dec!(2304));
        assert_eq!(years[15].rent, dec!(2304) * dec!(0.99));
        assert_eq!(years[20].rent, dec!(2304) * dec!(0.99) * dec!(0.99));
    }

    #[test]
    fn test_old_building_decays_from_year_five() {
        let input = ProjectionInput {
            building_age: dec!(20),
            ..demo_projection()
        };
        let years = project_years(&input).unwrap();
        assert_eq!(years[4].rent, dec!(2304));
        assert_eq!(years[5].rent, dec!(2304) * dec!(0.99));
    }

    #[test]
    fn test_balance_clears_after_term() {
        let input = ProjectionInput {
            loan_term: 10,
            ..demo_projection()
        };
        let years = project_years(&input).unwrap();
        assert!(years[9].loan_balance > Decimal::ZERO);
        assert_eq!(years[10].loan_balance, Decimal::ZERO);
        assert_eq!(years[10].loan_payment, Decimal::ZERO);
    }

    #[test]
    fn test_no_loan_no_balance() {
        let input = ProjectionInput {
            loan_amount: Decimal::ZERO,
            yearly_payment: Decimal::ZERO,
            ..demo_projection()
        };
        assert!(project_years(&input).unwrap().iter().all(|y| y.loan_balance.is_zero()));
    }

    #[test]
    fn test_building_value_reaches_zero() {
        let input = ProjectionInput {
            useful_life: dec!(22),
            ..demo_projection()
        };
        let years = project_years(&input).unwrap();
        assert!(years[20].building_value > Decimal::ZERO);
        assert_eq!(years[21].building_value, Decimal::ZERO);
        assert!(years.iter().all(|y| y.building_value >= Decimal::ZERO));
    }

    #[test]
    fn test_demo_first_row() {
        let first = &long_term_projection(&demo_projection()).unwrap()[0];
        assert_eq!(first.cash_flow, dec!(501));
        // 30000 - (1248.72 - 690)
        assert_eq!(first.loan_balance, dec!(29441));
        assert_eq!(first.cumulative_cash_flow, dec!(501));
    }

    #[test]
    fn test_negative_rate_overflow_is_error() {
        let input = ProjectionInput {
            loan_amount: dec!(1_000_000_000_000_000),
            interest_rate: dec!(-1_000_000_000_000_000),
            yearly_payment: Decimal::ZERO,
            ..demo_projection()
        };
        assert!(project_years(&input).is_err());
    }
}
