use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxInput;
use super::input_error::{InputError, MAX_AMOUNT, ensure_amount, is_negative};
use crate::calculations::common::clamp_non_negative;

/// Which part of pay the National Housing Fund contribution is charged on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NhfBasis {
    #[default]
    BasicOnly,
    TotalGross,
}

impl NhfBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BasicOnly => "basic",
            Self::TotalGross => "gross",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" | "basic_only" => Some(Self::BasicOnly),
            "gross" | "total_gross" => Some(Self::TotalGross),
            _ => None,
        }
    }
}

/// Monthly pay split into its usual components (detailed mode).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    pub basic: Decimal,
    #[serde(default)]
    pub housing: Decimal,
    #[serde(default)]
    pub transport: Decimal,
    #[serde(default)]
    pub other_allowances: Decimal,
}

impl SalaryBreakdown {
    /// Rejects a negative component or one above [`MAX_AMOUNT`], so a
    /// negative allowance cannot hide inside a positive gross.
    pub fn validate(&self) -> Result<(), InputError> {
        ensure_amount("basic", self.basic)?;
        ensure_amount("housing", self.housing)?;
        ensure_amount("transport", self.transport)?;
        ensure_amount("other_allowances", self.other_allowances)?;
        Ok(())
    }

    /// Copy of this breakdown with every negative component replaced by zero.
    pub fn clamped(&self) -> Self {
        Self {
            basic: clamp_non_negative(self.basic, "basic"),
            housing: clamp_non_negative(self.housing, "housing"),
            transport: clamp_non_negative(self.transport, "transport"),
            other_allowances: clamp_non_negative(self.other_allowances, "other_allowances"),
        }
    }

    pub fn monthly_gross(&self) -> Decimal {
        self.basic + self.housing + self.transport + self.other_allowances
    }

    /// Pensionable emoluments: basic, housing and transport.
    pub fn pension_base(&self) -> Decimal {
        self.basic + self.housing + self.transport
    }

    pub fn nhf_base(
        &self,
        basis: NhfBasis,
    ) -> Decimal {
        match basis {
            NhfBasis::BasicOnly => self.basic,
            NhfBasis::TotalGross => self.monthly_gross(),
        }
    }

    /// Builds the engine input for this salary with no contributions, rent
    /// or other income. Set those with struct update syntax:
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use ngtax_core::{NhfBasis, SalaryBreakdown, TaxInput};
    ///
    /// let salary = SalaryBreakdown {
    ///     basic: dec!(300000),
    ///     housing: dec!(120000),
    ///     transport: dec!(60000),
    ///     other_allowances: dec!(20000),
    /// };
    ///
    /// let input = TaxInput {
    ///     has_pension: true,
    ///     has_nhf: true,
    ///     ..salary.to_tax_input(NhfBasis::BasicOnly)
    /// };
    ///
    /// assert_eq!(input.monthly_gross, dec!(500000));
    /// assert_eq!(input.pension_base, dec!(480000));
    /// assert_eq!(input.nhf_base, dec!(300000));
    /// ```
    pub fn to_tax_input(
        &self,
        nhf_basis: NhfBasis,
    ) -> TaxInput {
        TaxInput {
            monthly_gross: self.monthly_gross(),
            pension_base: self.pension_base(),
            nhf_base: self.nhf_base(nhf_basis),
            ..Default::default()
        }
    }
}

/// One named income stream outside salary (rental income, dividends, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSource {
    pub name: String,
    pub annual_amount: Decimal,
}

impl IncomeSource {
    pub fn new(
        name: impl Into<String>,
        annual_amount: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            annual_amount,
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if is_negative(self.annual_amount) {
            return Err(InputError::NegativeIncomeSource {
                name: self.name.clone(),
                value: self.annual_amount,
            });
        }
        if self.annual_amount > MAX_AMOUNT {
            return Err(InputError::IncomeSourceTooLarge {
                name: self.name.clone(),
                value: self.annual_amount,
            });
        }
        Ok(())
    }

    pub fn clamped(&self) -> Self {
        Self {
            name: self.name.clone(),
            annual_amount: clamp_non_negative(self.annual_amount, &self.name),
        }
    }
}

/// Collapses a list of income sources into the single figure the PAYE
/// engine takes as `additional_annual_income`.
pub fn total_additional_income(sources: &[IncomeSource]) -> Decimal {
    sources.iter().map(|s| s.annual_amount).sum()
}
