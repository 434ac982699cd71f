//! Largest loan a lender would grade A.
//!
//! Candidates are the requested amount itself, then its whole part stepped
//! down by [`LOAN_SEARCH_STEP`] while positive. Score is non-increasing in the
//! loan amount once NOI is positive (DSCR falls, LTV rises), so the step grid
//! is bisected instead of scanned.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::scoring::{debt_service_coverage, loan_to_value, score, A_RANK_SCORE};
use crate::error::PropertySimError;
use crate::time_value::annual_payment;
use crate::types::Money;
use crate::PropertySimResult;

pub const LOAN_SEARCH_STEP: Money = dec!(50);

/// Inputs to the maximum A-rank loan search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSizingInput {
    pub requested_amount: Money,
    /// Annual rate as a percentage (2.5 = 2.5%)
    pub interest_rate: Decimal,
    pub term_years: u32,
    /// Year-1 net operating income
    pub noi: Money,
    pub collateral_value: Money,
}

/// Whether `amount` scores at least A under the input's terms.
pub fn qualifies(amount: Money, input: &LoanSizingInput) -> PropertySimResult<bool> {
    let payment = annual_payment(amount, input.interest_rate, input.term_years)?;
    let dscr = debt_service_coverage(input.noi, payment);
    let ltv = loan_to_value(amount, input.collateral_value);
    Ok(score(dscr, ltv) >= A_RANK_SCORE)
}

/// Largest candidate amount that still scores A, never above the request.
///
/// Returns 0 when the amount, rate, term or collateral is not positive, or
/// when no candidate qualifies.
pub fn find_a_rank_loan(input: &LoanSizingInput) -> PropertySimResult<Money> {
    if input.requested_amount <= Decimal::ZERO
        || input.interest_rate <= Decimal::ZERO
        || input.term_years == 0
        || input.collateral_value <= Decimal::ZERO
    {
        return Ok(Decimal::ZERO);
    }

    if qualifies(input.requested_amount, input)? {
        tracing::debug!(amount = %input.requested_amount, "requested loan already A-rank");
        return Ok(input.requested_amount);
    }

    // With positive debt service, non-positive NOI puts DSCR in the bottom tier
    if input.noi <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let top = input.requested_amount.trunc();
    let steps = (top / LOAN_SEARCH_STEP)
        .ceil()
        .to_u64()
        .ok_or_else(|| PropertySimError::InvalidInput {
            field: "loan_amount".into(),
            reason: "too large for the loan search".into(),
        })?;
    let candidate = |k: u64| top - LOAN_SEARCH_STEP * Decimal::from(k);

    if steps == 0 || !qualifies(candidate(steps - 1), input)? {
        tracing::debug!(requested = %input.requested_amount, "no A-rank loan amount");
        return Ok(Decimal::ZERO);
    }

    // First (largest) qualifying candidate
    let (mut lo, mut hi) = (0u64, steps - 1);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if qualifies(candidate(mid), input)? {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }

    let found = candidate(lo);
    tracing::debug!(requested = %input.requested_amount, found = %found, "A-rank loan sized");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Step-by-step scan over the same grid.
    fn linear_scan(input: &LoanSizingInput) -> Money {
        if qualifies(input.requested_amount, input).unwrap() {
            return input.requested_amount;
        }
        let mut amount = input.requested_amount.trunc();
        while amount > Decimal::ZERO {
            if qualifies(amount, input).unwrap() {
                return amount;
            }
            amount -= LOAN_SEARCH_STEP;
        }
        Decimal::ZERO
    }

    fn demo_sizing() -> LoanSizingInput {
        LoanSizingInput {
            requested_amount: dec!(30000),
            interest_rate: dec!(2.3),
            term_years: 35,
            noi: dec!(1749.61),
            collateral_value: dec!(19473.5),
        }
    }

    #[test]
    fn test_demo_a_rank_amount() {
        // LTV ≤ 120% binds: 120% of 19473.5 = 23368.2 → 23350 on the grid
        let amount = find_a_rank_loan(&demo_sizing()).unwrap();
        assert_eq!(amount, dec!(23350));
        assert!(qualifies(amount, &demo_sizing()).unwrap());
        assert!(!qualifies(amount + LOAN_SEARCH_STEP, &demo_sizing()).unwrap());
    }

    #[test]
    fn test_matches_linear_scan() {
        for requested in [dec!(100), dec!(5000), dec!(12345.6), dec!(30000), dec!(41000)] {
            for noi in [dec!(300), dec!(900), dec!(1749.61)] {
                let input = LoanSizingInput {
                    requested_amount: requested,
                    noi,
                    ..demo_sizing()
                };
                assert_eq!(
                    find_a_rank_loan(&input).unwrap(),
                    linear_scan(&input),
                    "requested={requested} noi={noi}"
                );
            }
        }
    }

    #[test]
    fn test_qualifying_request_returned_unchanged() {
        let input = LoanSizingInput {
            requested_amount: dec!(10000.5),
            ..demo_sizing()
        };
        assert_eq!(find_a_rank_loan(&input).unwrap(), dec!(10000.5));
    }

    #[test]
    fn test_never_exceeds_request() {
        for requested in [dec!(1000), dec!(20000), dec!(50000)] {
            let input = LoanSizingInput {
                requested_amount: requested,
                ..demo_sizing()
            };
            assert!(find_a_rank_loan(&input).unwrap() <= requested);
        }
    }

    #[test]
    fn test_missing_terms_give_zero() {
        let base = demo_sizing();
        for input in [
            LoanSizingInput { requested_amount: Decimal::ZERO, ..base.clone() },
            LoanSizingInput { interest_rate: Decimal::ZERO, ..base.clone() },
            LoanSizingInput { term_years: 0, ..base.clone() },
            LoanSizingInput { collateral_value: Decimal::ZERO, ..base.clone() },
        ] {
            assert_eq!(find_a_rank_loan(&input).unwrap(), Decimal::ZERO);
        }
    }

    #[test]
    fn test_negative_noi_gives_zero() {
        let input = LoanSizingInput {
            noi: dec!(-10),
            ..demo_sizing()
        };
        assert_eq!(find_a_rank_loan(&input).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_monotone_in_request() {
        let mut previous = Decimal::ZERO;
        for requested in [dec!(5000), dec!(15000), dec!(23000), dec!(24000), dec!(40000)] {
            let input = LoanSizingInput {
                requested_amount: requested,
                ..demo_sizing()
            };
            let found = find_a_rank_loan(&input).unwrap();
            assert!(found >= previous, "requested={requested}");
            previous = found;
        }
    }
}
