use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax charged within one band of the rate table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandTax {
    pub label: String,
    /// Marginal rate as a percentage.
    pub rate: Decimal,
    /// Portion of taxable income that fell inside this band.
    pub taxable_amount: Decimal,
    pub tax: Decimal,
}

/// Outcome of a PAYE calculation. Every field a report needs is here, so
/// nothing downstream has to repeat the tax logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub annual_gross: Decimal,

    // Deductions
    pub pension: Decimal,
    pub nhf: Decimal,
    pub rent_relief: Decimal,
    pub total_deductions: Decimal,

    pub taxable_income: Decimal,

    /// Bands that received income, lowest first.
    pub breakdown: Vec<BandTax>,

    pub net_tax: Decimal,
    pub monthly_tax: Decimal,
    pub net_annual: Decimal,
    pub net_monthly: Decimal,

    /// `net_tax` as a percentage of `annual_gross`.
    pub effective_rate: Decimal,
}
