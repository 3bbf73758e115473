//! Company Income Tax and Development Levy.
//!
//! # Computation
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Assessable profit = max(0, PBT + depreciation + fines - capital allowances) |
//! | 2    | Small company if turnover ≤ ₦100M and assets ≤ ₦250M |
//! | 3a   | Small: no CIT, no levy |
//! | 3b   | Otherwise: CIT = step 1 × 30%, levy = step 1 × 4% |
//! | 4    | Total tax = CIT + levy |
//!
//! Both charges are levied on assessable profit, never on turnover.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{max, round_half_up};
use crate::formatting::format_naira_whole;
use crate::{BusinessInput, BusinessResult};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CitError {
    /// Classification is meaningless without revenue.
    #[error("turnover must be positive, got {0}")]
    NonPositiveTurnover(Decimal),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CitConfigError {
    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidRate { name: &'static str, value: Decimal },

    #[error("{name} must be non-negative, got {value}")]
    InvalidLimit { name: &'static str, value: Decimal },
}

/// Thresholds and rates used by [`CitCalculator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitConfig {
    /// Highest turnover that still qualifies as small. ₦100,000,000.
    pub small_turnover_limit: Decimal,

    /// Highest fixed asset value that still qualifies as small. ₦250,000,000.
    pub small_assets_limit: Decimal,

    /// 30%.
    pub cit_rate: Decimal,

    /// 4%.
    pub development_levy_rate: Decimal,
}

impl CitConfig {
    pub fn statutory() -> Self {
        Self {
            small_turnover_limit: dec!(100000000),
            small_assets_limit: dec!(250000000),
            cit_rate: dec!(0.30),
            development_levy_rate: dec!(0.04),
        }
    }

    /// # Errors
    ///
    /// Returns [`CitConfigError`] if a limit is negative or a rate is not
    /// in [0, 1].
    pub fn validate(&self) -> Result<(), CitConfigError> {
        for (name, value) in [
            ("small turnover limit", self.small_turnover_limit),
            ("small assets limit", self.small_assets_limit),
        ] {
            if value < Decimal::ZERO {
                return Err(CitConfigError::InvalidLimit { name, value });
            }
        }

        for (name, value) in [
            ("CIT rate", self.cit_rate),
            ("development levy rate", self.development_levy_rate),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(CitConfigError::InvalidRate { name, value });
            }
        }

        Ok(())
    }
}

impl Default for CitConfig {
    fn default() -> Self {
        Self::statutory()
    }
}

#[derive(Debug, Clone)]
pub struct CitCalculator {
    config: CitConfig,
}

impl CitCalculator {
    /// # Errors
    ///
    /// Returns [`CitConfigError`] if the configuration fails
    /// [`CitConfig::validate`].
    pub fn new(config: CitConfig) -> Result<Self, CitConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn statutory() -> Self {
        Self {
            config: CitConfig::statutory(),
        }
    }

    pub fn config(&self) -> &CitConfig {
        &self.config
    }

    /// Classifies the company and computes what it owes.
    ///
    /// # Errors
    ///
    /// Returns [`CitError::NonPositiveTurnover`] when turnover is zero or
    /// negative. Other figures are not checked; see
    /// [`BusinessInput::validate`].
    pub fn calculate(
        &self,
        input: &BusinessInput,
    ) -> Result<BusinessResult, CitError> {
        if input.turnover <= Decimal::ZERO {
            return Err(CitError::NonPositiveTurnover(input.turnover));
        }

        let assessable_profit = self.assessable_profit(input);
        let is_small_business = self.is_small(input);

        debug!(
            turnover = %input.turnover,
            assets = %input.assets,
            %assessable_profit,
            is_small_business,
            "company classified"
        );

        if is_small_business {
            return Ok(BusinessResult {
                is_small_business,
                assessable_profit,
                cit_rate: Decimal::ZERO,
                development_levy_rate: Decimal::ZERO,
                cit: Decimal::ZERO,
                development_levy: Decimal::ZERO,
                total_tax: Decimal::ZERO,
                note: self.small_company_note(),
            });
        }

        // Total is rounded once so it stays the combined rate of the profit;
        // the levy takes whatever kobo the rounded CIT leaves.
        let total_tax = round_half_up(
            assessable_profit * (self.config.cit_rate + self.config.development_levy_rate),
        );
        let cit = round_half_up(assessable_profit * self.config.cit_rate);
        let development_levy = total_tax - cit;

        Ok(BusinessResult {
            is_small_business,
            assessable_profit,
            cit_rate: as_percent(self.config.cit_rate),
            development_levy_rate: as_percent(self.config.development_levy_rate),
            cit,
            development_levy,
            total_tax,
            note: self.large_company_note(),
        })
    }

    fn assessable_profit(
        &self,
        input: &BusinessInput,
    ) -> Decimal {
        let adjusted = input.profit_before_tax + input.depreciation + input.fines_penalties
            - input.capital_allowances;
        round_half_up(max(adjusted, Decimal::ZERO))
    }

    /// Both limits are inclusive and both must hold.
    fn is_small(
        &self,
        input: &BusinessInput,
    ) -> bool {
        input.turnover <= self.config.small_turnover_limit
            && input.assets <= self.config.small_assets_limit
    }

    fn small_company_note(&self) -> String {
        format!(
            "Small company (turnover up to {} and assets up to {}): exempt from \
             Company Income Tax, Development Levy and VAT.",
            format_naira_whole(self.config.small_turnover_limit),
            format_naira_whole(self.config.small_assets_limit),
        )
    }

    fn large_company_note(&self) -> String {
        format!(
            "Standard rates apply: CIT at {}% and Development Levy at {}% of \
             assessable profit, not turnover.",
            as_percent(self.config.cit_rate),
            as_percent(self.config.development_levy_rate),
        )
    }
}

impl Default for CitCalculator {
    fn default() -> Self {
        Self::statutory()
    }
}

fn as_percent(rate: Decimal) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).normalize()
}

/// Computes CIT with the statutory thresholds and rates.
pub fn compute_cit(input: &BusinessInput) -> Result<BusinessResult, CitError> {
    CitCalculator::statutory().calculate(input)
}
