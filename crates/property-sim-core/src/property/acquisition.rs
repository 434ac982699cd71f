use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate, Years};

const BROKERAGE_RATE: Rate = dec!(0.03);
const BROKERAGE_FIXED: Money = dec!(6);
const STAMP_DUTY: Money = dec!(6);
const REGISTRATION_PRICE_RATE: Rate = dec!(0.015);
const REGISTRATION_LOAN_RATE: Rate = dec!(0.004);
const REGISTRATION_FIXED: Money = dec!(10);
const ACQUISITION_TAX_RATE: Rate = dec!(0.03);

/// Transaction costs on top of the purchase price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionCosts {
    /// Building + land purchase price
    pub property_price: Money,
    /// Agent fee, charged on existing (age > 0) properties only
    pub brokerage_fee: Money,
    pub stamp_duty: Money,
    /// Title and mortgage registration
    pub registration_tax: Money,
    pub property_acquisition_tax: Money,
    /// Sum of the four cost items above
    pub total: Money,
}

impl AcquisitionCosts {
    /// Purchase price plus every transaction cost.
    pub fn all_in_cost(&self) -> Money {
        self.property_price + self.total
    }
}

/// Derive the transaction costs of an acquisition.
///
/// A building age of zero marks a new build bought from the developer, which
/// carries no brokerage fee.
pub fn acquisition_costs(
    building_cost: Money,
    land_cost: Money,
    building_age: Years,
    loan_amount: Money,
) -> AcquisitionCosts {
    let property_price = building_cost + land_cost;

    let brokerage_fee = if building_age > Decimal::ZERO {
        property_price * BROKERAGE_RATE + BROKERAGE_FIXED
    } else {
        Decimal::ZERO
    };
    let registration_tax = property_price * REGISTRATION_PRICE_RATE
        + loan_amount * REGISTRATION_LOAN_RATE
        + REGISTRATION_FIXED;
    let property_acquisition_tax = property_price * ACQUISITION_TAX_RATE;

    AcquisitionCosts {
        property_price,
        brokerage_fee,
        stamp_duty: STAMP_DUTY,
        registration_tax,
        property_acquisition_tax,
        total: brokerage_fee + STAMP_DUTY + registration_tax + property_acquisition_tax,
    }
}
