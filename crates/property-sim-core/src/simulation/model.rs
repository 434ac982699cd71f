use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;

use crate::credit::loan_sizing::{find_a_rank_loan, LoanSizingInput};
use crate::credit::scoring::{debt_service_coverage, evaluate, loan_to_value, Rank};
use crate::input::SimulationInput;
use crate::land_data::matching::{BestMatch, SequenceRatio};
use crate::land_data::table::LandPriceTable;
use crate::projection::long_term::{long_term_projection, ProjectionInput, ProjectionPoint};
use crate::property::acquisition::acquisition_costs;
use crate::property::operating::{year_one_operations, ExpenseBreakdown};
use crate::time_value::annual_payment;
use crate::types::{
    checked_percent, overflow, round_money, round_ratio, with_metadata, ComputationOutput, Money,
};
use crate::valuation::appraisal::appraise;
use crate::PropertySimResult;

use super::config::DEFAULT_SIMILARITY_CUTOFF;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Shared, read-only state a simulation runs against.
#[derive(Clone, Copy)]
pub struct SimulationContext<'a> {
    pub table: &'a LandPriceTable,
    pub matcher: &'a dyn BestMatch,
    pub similarity_cutoff: f64,
}

impl<'a> SimulationContext<'a> {
    /// Context using sequence-ratio matching at the default cutoff.
    pub fn new(table: &'a LandPriceTable) -> Self {
        SimulationContext {
            table,
            matcher: &SequenceRatio,
            similarity_cutoff: DEFAULT_SIMILARITY_CUTOFF,
        }
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.similarity_cutoff = cutoff;
        self
    }
}

/// Split of the cost approach value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostApproachBreakdown {
    pub land: Money,
    pub building: Money,
}

/// Itemised transaction costs as shown in the funding plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherCostsDetails {
    pub brokerage_fee: Money,
    pub stamp_duty: Money,
    pub registration_tax: Money,
    pub property_acquisition_tax: Money,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingPlan {
    pub building_cost: Money,
    pub land_cost: Money,
    pub other_costs_details: OtherCostsDetails,
}

/// Everything the front-end renders for one property, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    /// All-in acquisition cost
    pub market_price: Money,
    pub cost_approach_value: Money,
    pub income_approach_value: Money,
    pub bank_appraisal_value: Money,
    pub collateral_value: Money,
    /// Rent over all-in cost, percent
    pub surface_yield: Decimal,
    /// NOI over all-in cost, percent
    pub net_yield: Decimal,
    /// Year-1 NOI less debt service
    pub cash_flow: Money,
    /// `None` when there is no debt service
    pub dscr: Option<Decimal>,
    /// Percent; `None` when a loan is secured by no collateral
    pub ltv: Option<Decimal>,
    pub score: u8,
    pub rank: Rank,
    pub long_term_projection: Vec<ProjectionPoint>,
    pub year1_expenses: ExpenseBreakdown,
    pub yearly_revenue: Money,
    pub yearly_loan_payment: Money,
    /// Share of rent consumed by expenses and debt service, percent
    pub break_even_occupancy: Decimal,
    pub cash_on_cash_return: Decimal,
    /// Collateral over loan, percent; `None` without a loan
    pub collateral_coverage_ratio: Option<Decimal>,
    pub unsecured_amount: Money,
    /// Largest loan that still scores A
    pub estimated_loan_amount: Money,
    /// Cash needed when borrowing only the A-rank amount
    pub required_equity: Money,
    pub user_loan_amount: Money,
    pub cost_approach_breakdown: CostApproachBreakdown,
    pub funding_plan: FundingPlan,
    pub land_price_source: String,
    pub rank_comment: String,
    pub dscr_tier: usize,
    pub ltv_tier: usize,
    /// Occupied rooms needed to break even
    pub break_even_rooms: Decimal,
    /// Extra equity over the user's plan needed to reach rank A
    pub additional_equity: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the full acquisition, appraisal, credit and projection pipeline.
pub fn simulate(
    input: &SimulationInput,
    ctx: &SimulationContext<'_>,
) -> PropertySimResult<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // --- Reference land price ---
    let quote = ctx
        .table
        .lookup(&input.address, ctx.matcher, ctx.similarity_cutoff);
    if quote.matched_location.is_none() && !ctx.table.is_empty() && !input.address.is_empty() {
        warnings.push(format!(
            "No reference location matched '{}'; land is valued at 0",
            input.address
        ));
    }
    let land_value = quote
        .price_per_sqm
        .checked_mul(input.land_area)
        .map(|value| value / dec!(10000))
        .ok_or_else(|| overflow("land_area"))?;

    // --- Acquisition ---
    let acquisition = acquisition_costs(
        input.building_cost,
        input.land_cost,
        input.building_age,
        input.loan_amount,
    );
    let total_cost = acquisition.all_in_cost();

    // --- Debt service ---
    let yearly_payment = if input.loan_amount > Decimal::ZERO
        && input.loan_term > 0
        && input.interest_rate > Decimal::ZERO
    {
        annual_payment(input.loan_amount, input.interest_rate, input.loan_term)?
    } else {
        Decimal::ZERO
    };

    // --- Year-1 operations ---
    let ops = year_one_operations(input)?;
    if input.building_area > Decimal::ZERO && ops.building_value.is_zero() {
        warnings.push(format!(
            "Building is at or past its {}-year useful life; building is valued at 0",
            ops.profile.useful_life
        ));
    }
    let cash_flow = ops
        .noi
        .checked_sub(yearly_payment)
        .ok_or_else(|| overflow("cash_flow"))?;
    if cash_flow < Decimal::ZERO {
        warnings.push("Year-1 cash flow after debt service is negative".into());
    }

    // --- Appraisal and credit ---
    let valuation = appraise(ops.noi, land_value, ops.building_value, input.region)?;
    let dscr = debt_service_coverage(ops.noi, yearly_payment);
    let ltv = loan_to_value(input.loan_amount, valuation.collateral_value);
    let scored = evaluate(dscr, ltv);

    let estimated_loan = find_a_rank_loan(&LoanSizingInput {
        requested_amount: input.loan_amount,
        interest_rate: input.interest_rate,
        term_years: input.loan_term,
        noi: ops.noi,
        collateral_value: valuation.collateral_value,
    })?;
    if estimated_loan < input.loan_amount {
        warnings.push(format!(
            "Requested loan {} exceeds the largest A-rank loan {}",
            input.loan_amount,
            round_money(estimated_loan)
        ));
    }
    tracing::debug!(
        score = scored.score,
        rank = ?scored.rank,
        estimated_loan = %estimated_loan,
        "credit evaluated"
    );

    // --- Projection ---
    let projection = long_term_projection(&ProjectionInput {
        rent: input.rent,
        expenses_total: ops.expenses.total,
        noi_year1: ops.noi,
        loan_amount: input.loan_amount,
        interest_rate: input.interest_rate,
        loan_term: input.loan_term,
        yearly_payment,
        building_age: input.building_age,
        replacement_cost: ops.replacement_cost,
        useful_life: ops.profile.useful_life,
        land_value,
        region: input.region,
    })?;

    // --- Derived metrics ---
    let (surface_yield, net_yield) = if total_cost > Decimal::ZERO {
        (
            checked_percent(input.rent, total_cost, "surface_yield")?,
            checked_percent(ops.noi, total_cost, "net_yield")?,
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let equity = total_cost - input.loan_amount;
    let cash_on_cash_return = if equity > Decimal::ZERO {
        checked_percent(cash_flow, equity, "cash_on_cash_return")?
    } else {
        Decimal::ZERO
    };

    let break_even_occupancy = if input.rent > Decimal::ZERO {
        let outgoings = ops
            .expenses
            .total
            .checked_add(yearly_payment)
            .ok_or_else(|| overflow("break_even_occupancy"))?;
        round_ratio(checked_percent(outgoings, input.rent, "break_even_occupancy")?)
    } else {
        Decimal::ZERO
    };

    let collateral_coverage_ratio = if input.loan_amount > Decimal::ZERO {
        Some(round_ratio(checked_percent(
            valuation.collateral_value,
            input.loan_amount,
            "collateral_coverage_ratio",
        )?))
    } else {
        None
    };

    let market_price = round_money(total_cost);
    let required_equity = round_money(total_cost - estimated_loan);
    let break_even_rooms = input
        .rooms
        .checked_mul(break_even_occupancy)
        .map(|occupied| (occupied / dec!(100)).ceil())
        .ok_or_else(|| overflow("break_even_rooms"))?;
    let additional_equity =
        (required_equity - (market_price - input.loan_amount)).max(Decimal::ZERO);

    let output = SimulationOutput {
        market_price,
        cost_approach_value: round_money(valuation.cost_approach_value),
        income_approach_value: round_money(valuation.income_approach_value),
        bank_appraisal_value: round_money(valuation.bank_appraisal_value),
        collateral_value: round_money(valuation.collateral_value),
        surface_yield: round_ratio(surface_yield),
        net_yield: round_ratio(net_yield),
        cash_flow: round_money(cash_flow),
        dscr: dscr.map(round_ratio),
        ltv: ltv.map(round_ratio),
        score: scored.score,
        rank: scored.rank,
        long_term_projection: projection,
        year1_expenses: ops.expenses.rounded(),
        yearly_revenue: round_ratio(input.rent),
        yearly_loan_payment: round_ratio(yearly_payment),
        break_even_occupancy,
        cash_on_cash_return: round_ratio(cash_on_cash_return),
        collateral_coverage_ratio,
        unsecured_amount: round_money(
            (input.loan_amount - valuation.collateral_value).max(Decimal::ZERO),
        ),
        estimated_loan_amount: round_money(estimated_loan),
        required_equity,
        user_loan_amount: input.loan_amount,
        cost_approach_breakdown: CostApproachBreakdown {
            land: round_money(land_value),
            building: round_money(valuation.cost_approach_value - land_value),
        },
        funding_plan: FundingPlan {
            building_cost: round_money(input.building_cost),
            land_cost: round_money(input.land_cost),
            other_costs_details: OtherCostsDetails {
                brokerage_fee: round_ratio(acquisition.brokerage_fee),
                stamp_duty: round_ratio(acquisition.stamp_duty),
                registration_tax: round_ratio(acquisition.registration_tax),
                property_acquisition_tax: round_ratio(acquisition.property_acquisition_tax),
                total: round_money(acquisition.total),
            },
        },
        land_price_source: quote.source,
        rank_comment: scored.rank.verdict().to_string(),
        dscr_tier: scored.dscr_tier,
        ltv_tier: scored.ltv_tier,
        break_even_rooms,
        additional_equity,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Bank appraisal (70% cost / 30% income approach) with DSCR x LTV credit scoring",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Preset request used by the front-end demo button.
pub fn demo_request() -> Value {
    json!({
        "address": "沖縄市泡瀬4丁目",
        "rent": 2304,
        "rooms": 24,
        "buildingCost": 25650,
        "landCost": 8000,
        "loanAmount": 30000,
        "loanTerm": 35,
        "interestRate": 2.3,
        "structure": "RC",
        "buildingAge": 0,
        "buildingArea": 1080,
        "landArea": 600,
        "hasElevator": "yes",
        "region": "Chunanbu"
    })
}
