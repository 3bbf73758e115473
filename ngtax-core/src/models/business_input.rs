use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::input_error::{InputError, ensure_amount};
use crate::calculations::common::clamp_non_negative;

/// Financial figures for one company year.
///
/// Everything except `turnover` may be omitted (or `null`) when the record
/// comes from document extraction; omitted figures are zero. Extracted
/// values get no special treatment once parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessInput {
    /// Annual turnover (gross revenue).
    pub turnover: Decimal,

    /// Total fixed asset value.
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub assets: Decimal,

    #[serde(default, deserialize_with = "amount_or_zero")]
    pub profit_before_tax: Decimal,

    /// Added back: not deductible.
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub depreciation: Decimal,

    /// Added back: not deductible.
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub fines_penalties: Decimal,

    /// Subtracted from profit.
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub capital_allowances: Decimal,
}

impl BusinessInput {
    /// Turnover-only input; every adjustment is zero.
    pub fn with_turnover(turnover: Decimal) -> Self {
        Self {
            turnover,
            ..Default::default()
        }
    }

    /// Parses the JSON payload produced by statement extraction.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use ngtax_core::BusinessInput;
    ///
    /// let input = BusinessInput::from_extracted_json(
    ///     r#"{"turnover": 150000000, "assets": null, "profit_before_tax": "30000000"}"#,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(input.turnover, dec!(150000000));
    /// assert_eq!(input.assets, dec!(0));
    /// assert_eq!(input.profit_before_tax, dec!(30000000));
    /// ```
    pub fn from_extracted_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Rejects negative figures, figures above
    /// [`MAX_AMOUNT`](super::MAX_AMOUNT) and a turnover that is not positive.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.turnover <= Decimal::ZERO {
            return Err(InputError::NonPositiveTurnover(self.turnover));
        }
        ensure_amount("turnover", self.turnover)?;
        ensure_amount("assets", self.assets)?;
        ensure_amount("profit_before_tax", self.profit_before_tax)?;
        ensure_amount("depreciation", self.depreciation)?;
        ensure_amount("fines_penalties", self.fines_penalties)?;
        ensure_amount("capital_allowances", self.capital_allowances)?;
        Ok(())
    }

    /// Copy of this input with every negative figure replaced by zero.
    pub fn clamped(&self) -> Self {
        Self {
            turnover: clamp_non_negative(self.turnover, "turnover"),
            assets: clamp_non_negative(self.assets, "assets"),
            profit_before_tax: clamp_non_negative(self.profit_before_tax, "profit_before_tax"),
            depreciation: clamp_non_negative(self.depreciation, "depreciation"),
            fines_penalties: clamp_non_negative(self.fines_penalties, "fines_penalties"),
            capital_allowances: clamp_non_negative(self.capital_allowances, "capital_allowances"),
        }
    }
}

/// Deserializes a missing or `null` amount as zero.
pub(crate) fn amount_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Decimal> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
