use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount_or_zero;
use super::input_error::{InputError, ensure_amount};
use crate::calculations::common::clamp_non_negative;

/// Inputs to a single PAYE calculation.
///
/// `monthly_gross`, `pension_base` and `nhf_base` are monthly figures; the
/// engine annualises them. `annual_rent` and `additional_annual_income` are
/// already annual. The two bases are separate from `monthly_gross` because
/// the statutory base for each contribution can be a subset of gross pay
/// (see [`SalaryBreakdown`](super::SalaryBreakdown)).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInput {
    /// Monthly gross salary.
    pub monthly_gross: Decimal,

    /// Monthly income the pension percentage applies to.
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub pension_base: Decimal,

    /// Monthly income the National Housing Fund percentage applies to.
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub nhf_base: Decimal,

    /// Rent paid over the year.
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub annual_rent: Decimal,

    #[serde(default)]
    pub has_pension: bool,

    #[serde(default)]
    pub has_nhf: bool,

    /// Sum of every other income source for the year. Not part of either
    /// contribution base.
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub additional_annual_income: Decimal,
}

impl TaxInput {
    /// Simple-mode input: both contribution bases equal the gross salary,
    /// no contributions opted into, no rent and no other income.
    pub fn basic(monthly_gross: Decimal) -> Self {
        Self {
            monthly_gross,
            pension_base: monthly_gross,
            nhf_base: monthly_gross,
            ..Default::default()
        }
    }

    /// Rejects any negative figure or one above [`MAX_AMOUNT`](super::MAX_AMOUNT).
    pub fn validate(&self) -> Result<(), InputError> {
        ensure_amount("monthly_gross", self.monthly_gross)?;
        ensure_amount("pension_base", self.pension_base)?;
        ensure_amount("nhf_base", self.nhf_base)?;
        ensure_amount("annual_rent", self.annual_rent)?;
        ensure_amount("additional_annual_income", self.additional_annual_income)?;
        Ok(())
    }

    /// Copy of this input with every negative figure replaced by zero.
    pub fn clamped(&self) -> Self {
        Self {
            monthly_gross: clamp_non_negative(self.monthly_gross, "monthly_gross"),
            pension_base: clamp_non_negative(self.pension_base, "pension_base"),
            nhf_base: clamp_non_negative(self.nhf_base, "nhf_base"),
            annual_rent: clamp_non_negative(self.annual_rent, "annual_rent"),
            additional_annual_income: clamp_non_negative(
                self.additional_annual_income,
                "additional_annual_income",
            ),
            ..self.clone()
        }
    }
}
