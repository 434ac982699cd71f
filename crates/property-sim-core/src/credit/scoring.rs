use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Multiple};

/// Lower bounds of DSCR tiers 0..=6; anything below the last is tier 7.
const DSCR_FLOORS: [Multiple; 7] = [
    dec!(1.4),
    dec!(1.3),
    dec!(1.2),
    dec!(1.1),
    dec!(1.0),
    dec!(0.9),
    dec!(0.8),
];

/// Upper bounds (inclusive, percent) of LTV tiers 0..=3; above the last is tier 4.
const LTV_CEILINGS: [Decimal; 4] = [dec!(60), dec!(80), dec!(100), dec!(120)];

/// Rows: DSCR tier, columns: LTV tier.
const SCORE_MATRIX: [[u8; 5]; 8] = [
    [100, 95, 90, 85, 75],
    [95, 90, 85, 80, 70],
    [85, 80, 75, 70, 60],
    [80, 75, 70, 65, 55],
    [75, 70, 65, 60, 50],
    [70, 65, 60, 55, 45],
    [65, 60, 55, 50, 40],
    [60, 55, 50, 45, 35],
];

/// Minimum score a lender treats as an A-rank loan.
pub const A_RANK_SCORE: u8 = 80;

/// Letter grade of a financing score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    A,
    B,
    C,
    D,
}

impl Rank {
    /// Investment verdict shown alongside the rank.
    pub fn verdict(self) -> &'static str {
        match self {
            Rank::A => "投資すべき優良物件です",
            Rank::B => "採算ラインはクリア。十分に投資を検討できる物件です",
            Rank::C => "収益性に懸念あり。条件改善（価格交渉など）を検討すべき物件です",
            Rank::D => "投資すべきではない物件です",
        }
    }
}

/// Score, rank and the matrix cell they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub rank: Rank,
    pub dscr_tier: usize,
    pub ltv_tier: usize,
}

/// NOI over annual debt service. `None` (unbounded) when there is no
/// positive debt service.
pub fn debt_service_coverage(noi: Money, annual_payment: Money) -> Option<Multiple> {
    if annual_payment > Decimal::ZERO {
        // Saturate instead of overflowing on a vanishing payment
        Some(noi.checked_div(annual_payment).unwrap_or(if noi.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }))
    } else {
        None
    }
}

/// Loan over collateral, in percent.
///
/// Without a loan nothing is borrowed and LTV is 0. A loan against zero or
/// negative collateral, or one too large to express, is unbounded (`None`).
pub fn loan_to_value(loan_amount: Money, collateral_value: Money) -> Option<Decimal> {
    if loan_amount <= Decimal::ZERO {
        Some(Decimal::ZERO)
    } else if collateral_value > Decimal::ZERO {
        loan_amount
            .checked_div(collateral_value)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
    } else {
        None
    }
}

/// DSCR tier (0 = best). An unbounded DSCR is tier 0.
pub fn dscr_tier(dscr: Option<Multiple>) -> usize {
    match dscr {
        None => 0,
        Some(d) => DSCR_FLOORS
            .iter()
            .position(|floor| d >= *floor)
            .unwrap_or(DSCR_FLOORS.len()),
    }
}

/// LTV tier (0 = best). An unbounded LTV is the last tier.
pub fn ltv_tier(ltv: Option<Decimal>) -> usize {
    match ltv {
        None => LTV_CEILINGS.len(),
        Some(l) => LTV_CEILINGS
            .iter()
            .position(|ceiling| l <= *ceiling)
            .unwrap_or(LTV_CEILINGS.len()),
    }
}

pub fn score(dscr: Option<Multiple>, ltv: Option<Decimal>) -> u8 {
    SCORE_MATRIX[dscr_tier(dscr)][ltv_tier(ltv)]
}

/// Letter rank of a score. The D check runs before the C fallback.
pub fn rank(score: u8) -> Rank {
    if score >= A_RANK_SCORE {
        Rank::A
    } else if score >= 60 {
        Rank::B
    } else if score < 40 {
        Rank::D
    } else {
        Rank::C
    }
}

pub fn evaluate(dscr: Option<Multiple>, ltv: Option<Decimal>) -> ScoreResult {
    let dscr_tier = dscr_tier(dscr);
    let ltv_tier = ltv_tier(ltv);
    let score = SCORE_MATRIX[dscr_tier][ltv_tier];
    ScoreResult {
        score,
        rank: rank(score),
        dscr_tier,
        ltv_tier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dscr_tier_boundaries() {
        assert_eq!(dscr_tier(None), 0);
        assert_eq!(dscr_tier(Some(dec!(1.4))), 0);
        assert_eq!(dscr_tier(Some(dec!(1.39))), 1);
        assert_eq!(dscr_tier(Some(dec!(1.0))), 4);
        assert_eq!(dscr_tier(Some(dec!(0.8))), 6);
        assert_eq!(dscr_tier(Some(dec!(0.79))), 7);
        assert_eq!(dscr_tier(Some(dec!(-3))), 7);
    }

    #[test]
    fn test_ltv_tier_boundaries() {
        assert_eq!(ltv_tier(Some(dec!(60))), 0);
        assert_eq!(ltv_tier(Some(dec!(60.01))), 1);
        assert_eq!(ltv_tier(Some(dec!(120))), 3);
        assert_eq!(ltv_tier(Some(dec!(120.01))), 4);
        assert_eq!(ltv_tier(None), 4);
    }

    #[test]
    fn test_score_corners() {
        assert_eq!(score(None, Some(Decimal::ZERO)), 100);
        assert_eq!(score(Some(dec!(0.5)), None), 35);
        assert_eq!(score(None, None), 75);
    }

    #[test]
    fn test_score_monotone_in_both_axes() {
        for row in 0..SCORE_MATRIX.len() {
            for col in 0..SCORE_MATRIX[row].len() {
                if row + 1 < SCORE_MATRIX.len() {
                    assert!(SCORE_MATRIX[row + 1][col] <= SCORE_MATRIX[row][col]);
                }
                if col + 1 < SCORE_MATRIX[row].len() {
                    assert!(SCORE_MATRIX[row][col + 1] <= SCORE_MATRIX[row][col]);
                }
            }
        }
    }

    #[test]
    fn test_rank_boundaries() {
        assert_eq!(rank(100), Rank::A);
        assert_eq!(rank(80), Rank::A);
        assert_eq!(rank(79), Rank::B);
        assert_eq!(rank(60), Rank::B);
        assert_eq!(rank(59), Rank::C);
        assert_eq!(rank(40), Rank::C);
        assert_eq!(rank(39), Rank::D);
        assert_eq!(rank(35), Rank::D);
    }

    #[test]
    fn test_dscr_unbounded_without_payment() {
        assert_eq!(debt_service_coverage(dec!(100), Decimal::ZERO), None);
        assert_eq!(debt_service_coverage(dec!(100), dec!(50)), Some(dec!(2)));
    }

    #[test]
    fn test_ltv_edges() {
        assert_eq!(loan_to_value(Decimal::ZERO, Decimal::ZERO), Some(Decimal::ZERO));
        assert_eq!(loan_to_value(dec!(100), Decimal::ZERO), None);
        assert_eq!(loan_to_value(dec!(60), dec!(100)), Some(dec!(60)));
    }

    #[test]
    fn test_evaluate_reports_cell() {
        let r = evaluate(Some(dec!(1.25)), Some(dec!(90)));
        assert_eq!(r.dscr_tier, 2);
        assert_eq!(r.ltv_tier, 2);
        assert_eq!(r.score, 75);
        assert_eq!(r.rank, Rank::B);
    }
}
