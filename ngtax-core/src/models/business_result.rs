use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of a company income tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessResult {
    pub is_small_business: bool,
    pub assessable_profit: Decimal,

    /// Percentages; zero for small companies.
    pub cit_rate: Decimal,
    pub development_levy_rate: Decimal,

    pub cit: Decimal,
    pub development_levy: Decimal,
    pub total_tax: Decimal,

    /// Which exemption or rule applied, for display.
    pub note: String,
}
