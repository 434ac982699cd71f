use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::PropertySimError;
use crate::types::{Money, Rate};
use crate::PropertySimResult;

const MONTHS_PER_YEAR: u32 = 12;

/// Standard fixed-rate annuity payment: P * r(1+r)^n / ((1+r)^n - 1)
pub fn monthly_payment(
    principal: Money,
    monthly_rate: Rate,
    total_months: u32,
) -> PropertySimResult<Money> {
    if total_months == 0 {
        return Err(PropertySimError::DivisionByZero {
            context: "annuity payment with zero months".into(),
        });
    }

    if monthly_rate.is_zero() {
        // Interest-free: straight-line amortisation
        return Ok(principal / Decimal::from(total_months));
    }

    let compound = (Decimal::ONE + monthly_rate)
        .checked_powi(i64::from(total_months))
        .ok_or_else(|| PropertySimError::InvalidInput {
            field: "interest_rate".into(),
            reason: "compounding factor overflows".into(),
        })?;

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Err(PropertySimError::DivisionByZero {
            context: "annuity payment denominator".into(),
        });
    }

    compound
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(monthly_rate))
        .and_then(|factor| factor.checked_mul(principal))
        .ok_or_else(|| PropertySimError::InvalidInput {
            field: "loan_amount".into(),
            reason: "payment overflows".into(),
        })
}

/// Yearly debt service of a monthly-compounding loan quoted as an annual
/// percentage (2.5 = 2.5%) over `term_years`.
pub fn annual_payment(
    principal: Money,
    annual_rate_pct: Decimal,
    term_years: u32,
) -> PropertySimResult<Money> {
    let monthly_rate = annual_rate_pct / dec!(100) / Decimal::from(MONTHS_PER_YEAR);
    let months = term_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| PropertySimError::InvalidInput {
            field: "loan_term".into(),
            reason: "term is too long".into(),
        })?;
    monthly_payment(principal, monthly_rate, months)?
        .checked_mul(Decimal::from(MONTHS_PER_YEAR))
        .ok_or_else(|| PropertySimError::InvalidInput {
            field: "loan_amount".into(),
            reason: "payment overflows".into(),
        })
}

/// Balance after one year of level payments, charging a full year of
/// interest on the opening balance. Floored at zero.
pub fn amortize_year(
    balance: Money,
    annual_rate_pct: Decimal,
    yearly_payment: Money,
) -> PropertySimResult<Money> {
    let closing = balance
        .checked_mul(annual_rate_pct)
        .map(|scaled| scaled / dec!(100))
        .and_then(|interest| yearly_payment.checked_sub(interest))
        .and_then(|principal| balance.checked_sub(principal))
        .ok_or_else(|| PropertySimError::InvalidInput {
            field: "interest_rate".into(),
            reason: "loan balance overflows".into(),
        })?;
    Ok(closing.max(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_payment_sanity() {
        // 60M over 30 years at 2.5% → 237,072.54 / month
        let pmt = monthly_payment(dec!(60_000_000), dec!(0.025) / dec!(12), 360).unwrap();
        assert_eq!(pmt.round_dp(2), dec!(237072.54));
    }

    #[test]
    fn test_annual_payment_is_twelve_months() {
        let annual = annual_payment(dec!(60_000_000), dec!(2.5), 30).unwrap();
        assert_eq!(annual.round_dp(2), dec!(2844870.47));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let pmt = monthly_payment(dec!(1200), Decimal::ZERO, 12).unwrap();
        assert_eq!(pmt, dec!(100));
    }

    #[test]
    fn test_zero_months_error() {
        let err = monthly_payment(dec!(1000), dec!(0.01), 0).unwrap_err();
        assert!(matches!(err, PropertySimError::DivisionByZero { .. }));
    }

    #[test]
    fn test_amortize_year() {
        // 1000 at 5%: interest 50, principal 150
        assert_eq!(amortize_year(dec!(1000), dec!(5), dec!(200)).unwrap(), dec!(850));
    }

    #[test]
    fn test_amortize_year_floors_at_zero() {
        assert_eq!(amortize_year(dec!(100), dec!(5), dec!(500)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_amortize_year_overflow_is_error() {
        let err = amortize_year(
            dec!(1_000_000_000_000_000),
            dec!(-1_000_000_000_000_000),
            Decimal::ZERO,
        )
        .unwrap_err();
        assert!(matches!(err, PropertySimError::InvalidInput { .. }));
    }

    #[test]
    fn test_payment_scales_with_principal() {
        let small = annual_payment(dec!(10_000), dec!(2.3), 35).unwrap();
        let large = annual_payment(dec!(20_000), dec!(2.3), 35).unwrap();
        assert!(large > small);
        assert_eq!((small * dec!(2)).round_dp(6), large.round_dp(6));
    }

    #[test]
    fn test_extreme_rate_payment_is_error() {
        assert!(annual_payment(dec!(1_000_000_000_000_000), dec!(1_000_000_000_000_000), 1).is_err());
    }
}
