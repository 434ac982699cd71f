use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use property_sim_core::credit::loan_sizing::{find_a_rank_loan, LoanSizingInput};
use property_sim_core::credit::scoring::{debt_service_coverage, evaluate, loan_to_value};
use property_sim_core::time_value::annual_payment;

/// Arguments for scoring a financing plan
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScoreArgs {
    /// Year-1 net operating income
    #[arg(long)]
    pub noi: Decimal,

    /// Loan amount
    #[arg(long)]
    pub loan: Decimal,

    /// Collateral value
    #[arg(long)]
    pub collateral: Decimal,

    /// Annual interest rate in percent (2.5 = 2.5%)
    #[arg(long)]
    pub rate: Decimal,

    /// Loan term in years
    #[arg(long)]
    pub term: u32,
}

pub fn run_score(args: ScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payment = if args.loan > Decimal::ZERO && args.rate > Decimal::ZERO && args.term > 0 {
        annual_payment(args.loan, args.rate, args.term)?
    } else {
        Decimal::ZERO
    };
    let dscr = debt_service_coverage(args.noi, payment);
    let ltv = loan_to_value(args.loan, args.collateral);
    let scored = evaluate(dscr, ltv);

    let estimated_loan_amount = find_a_rank_loan(&LoanSizingInput {
        requested_amount: args.loan,
        interest_rate: args.rate,
        term_years: args.term,
        noi: args.noi,
        collateral_value: args.collateral,
    })?;

    Ok(json!({
        "result": {
            "score": scored.score,
            "rank": scored.rank,
            "rank_comment": scored.rank.verdict(),
            "dscr": dscr.map(|d| d.round_dp(2)),
            "ltv": ltv.map(|l| l.round_dp(2)),
            "dscr_tier": scored.dscr_tier,
            "ltv_tier": scored.ltv_tier,
            "yearly_loan_payment": payment.round_dp(2),
            "estimated_loan_amount": estimated_loan_amount.round_dp(0),
        },
        "methodology": "DSCR x LTV score matrix",
        "warnings": [],
    }))
}
