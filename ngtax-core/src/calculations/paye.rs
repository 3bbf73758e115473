//! Pay-As-You-Earn personal income tax.
//!
//! Turns a salary, contribution choices, rent and other income into the
//! annual and monthly PAYE liability.
//!
//! # Computation
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Annual gross = monthly gross × 12 + additional annual income |
//! | 2a   | Pension = pension base × 12 × 8% (only if opted in) |
//! | 2b   | NHF = NHF base × 12 × 2.5% (only if opted in) |
//! | 2c   | Rent relief = annual rent × 20%, capped at ₦500,000 (always) |
//! | 2d   | Total deductions = 2a + 2b + 2c |
//! | 3    | Taxable income = max(0, step 1 - step 2d) |
//! | 4    | Tax per band, consuming taxable income lowest band first |
//! | 5    | Net tax = sum of step 4; monthly, net pay and effective rate |
//!
//! # Rate table
//!
//! | Band | Rate |
//! |------|------|
//! | First ₦800,000 | 0% |
//! | Next ₦2,200,000 | 15% |
//! | Next ₦9,000,000 | 18% |
//! | Next ₦13,000,000 | 21% |
//! | Next ₦25,000,000 | 23% |
//! | Above ₦50,000,000 | 25% |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use ngtax_core::TaxInput;
//! use ngtax_core::calculations::compute_paye;
//!
//! let input = TaxInput {
//!     annual_rent: dec!(1200000),
//!     has_pension: true,
//!     has_nhf: true,
//!     ..TaxInput::basic(dec!(500000))
//! };
//!
//! let result = compute_paye(&input);
//!
//! assert_eq!(result.annual_gross, dec!(6000000));
//! assert_eq!(result.total_deductions, dec!(870000));
//! assert_eq!(result.taxable_income, dec!(5130000));
//! assert_eq!(result.net_tax, dec!(713400));
//! assert_eq!(result.breakdown.len(), 3);
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{max, round_half_up};
use crate::{BandTax, TaxBand, TaxInput, TaxResult};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Errors raised when a [`PayeConfig`] is not usable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayeConfigError {
    /// A contribution or relief rate is outside [0, 1].
    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidRate { name: &'static str, value: Decimal },

    /// The rent relief cap is negative.
    #[error("rent relief cap must be non-negative, got {0}")]
    InvalidRentReliefCap(Decimal),

    /// The rate table is empty.
    #[error("no tax bands provided")]
    NoBands,

    /// A band rate is outside [0, 1].
    #[error("band '{label}' rate must be between 0 and 1, got {rate}")]
    InvalidBandRate { label: String, rate: Decimal },

    /// A bounded band has a width of zero or less.
    #[error("band '{label}' width must be positive, got {width}")]
    InvalidBandWidth { label: String, width: Decimal },

    /// An open-ended band appears before the end of the table.
    #[error("band '{0}' has no upper limit but is not the last band")]
    OpenBandNotLast(String),

    /// The last band has an upper limit, so high incomes would go untaxed.
    #[error("the last band must have no upper limit")]
    MissingOpenBand,
}

/// Statutory rates and the progressive table used by [`PayeCalculator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayeConfig {
    /// Employee pension contribution rate. 8%.
    pub pension_rate: Decimal,

    /// National Housing Fund contribution rate. 2.5%.
    pub nhf_rate: Decimal,

    /// Share of annual rent allowed as relief. 20%.
    pub rent_relief_rate: Decimal,

    /// Ceiling on rent relief. ₦500,000.
    pub rent_relief_cap: Decimal,

    /// Progressive bands, lowest first.
    pub bands: Vec<TaxBand>,
}

impl PayeConfig {
    /// The fixed Nigerian PAYE rules.
    pub fn statutory() -> Self {
        Self {
            pension_rate: dec!(0.08),
            nhf_rate: dec!(0.025),
            rent_relief_rate: dec!(0.20),
            rent_relief_cap: dec!(500000),
            bands: vec![
                TaxBand::new("First ₦800,000", Some(dec!(800000)), dec!(0)),
                TaxBand::new("Next ₦2,200,000", Some(dec!(2200000)), dec!(0.15)),
                TaxBand::new("Next ₦9,000,000", Some(dec!(9000000)), dec!(0.18)),
                TaxBand::new("Next ₦13,000,000", Some(dec!(13000000)), dec!(0.21)),
                TaxBand::new("Next ₦25,000,000", Some(dec!(25000000)), dec!(0.23)),
                TaxBand::new("Above ₦50,000,000", None, dec!(0.25)),
            ],
        }
    }

    /// Checks rates, the relief cap and the shape of the band table.
    ///
    /// # Errors
    ///
    /// Returns [`PayeConfigError`] if:
    /// - any rate is not in [0, 1]
    /// - `rent_relief_cap` is negative
    /// - `bands` is empty, has a non-positive width, or is not closed by
    ///   exactly one open-ended band at the end
    pub fn validate(&self) -> Result<(), PayeConfigError> {
        for (name, value) in [
            ("pension rate", self.pension_rate),
            ("NHF rate", self.nhf_rate),
            ("rent relief rate", self.rent_relief_rate),
        ] {
            if !is_fraction(value) {
                return Err(PayeConfigError::InvalidRate { name, value });
            }
        }

        if self.rent_relief_cap < Decimal::ZERO {
            return Err(PayeConfigError::InvalidRentReliefCap(
                self.rent_relief_cap,
            ));
        }

        let Some((last, rest)) = self.bands.split_last() else {
            return Err(PayeConfigError::NoBands);
        };

        for band in &self.bands {
            if !is_fraction(band.rate) {
                return Err(PayeConfigError::InvalidBandRate {
                    label: band.label.clone(),
                    rate: band.rate,
                });
            }
        }

        for band in rest {
            match band.width {
                None => return Err(PayeConfigError::OpenBandNotLast(band.label.clone())),
                Some(width) if width <= Decimal::ZERO => {
                    return Err(PayeConfigError::InvalidBandWidth {
                        label: band.label.clone(),
                        width,
                    });
                }
                Some(_) => {}
            }
        }

        if last.width.is_some() {
            return Err(PayeConfigError::MissingOpenBand);
        }

        Ok(())
    }
}

impl Default for PayeConfig {
    fn default() -> Self {
        Self::statutory()
    }
}

fn is_fraction(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= Decimal::ONE
}

/// Calculator for PAYE liability.
///
/// Holds a validated [`PayeConfig`]; `calculate` is pure and the calculator
/// can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct PayeCalculator {
    config: PayeConfig,
}

impl PayeCalculator {
    /// Creates a calculator from custom rules.
    ///
    /// # Errors
    ///
    /// Returns [`PayeConfigError`] if the configuration fails
    /// [`PayeConfig::validate`].
    pub fn new(config: PayeConfig) -> Result<Self, PayeConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Creates a calculator with the statutory rules.
    pub fn statutory() -> Self {
        Self {
            config: PayeConfig::statutory(),
        }
    }

    pub fn config(&self) -> &PayeConfig {
        &self.config
    }

    /// Computes the full PAYE result.
    ///
    /// Never fails. Inputs are assumed non-negative; run
    /// [`TaxInput::validate`] or [`TaxInput::clamped`] first when they come
    /// from a user.
    pub fn calculate(
        &self,
        input: &TaxInput,
    ) -> TaxResult {
        let annual_gross = self.annual_gross(input);

        let pension = self.pension(input);
        let nhf = self.nhf(input);
        let rent_relief = self.rent_relief(input.annual_rent);
        let total_deductions = pension + nhf + rent_relief;

        let taxable_income = self.taxable_income(annual_gross, total_deductions);

        let breakdown = self.apply_bands(taxable_income);
        let net_tax: Decimal = breakdown.iter().map(|b| b.tax).sum();

        let net_annual = annual_gross - total_deductions - net_tax;
        let effective_rate = self.effective_rate(net_tax, annual_gross);

        debug!(
            %annual_gross,
            %taxable_income,
            %net_tax,
            bands = breakdown.len(),
            "PAYE computed"
        );

        TaxResult {
            annual_gross,
            pension,
            nhf,
            rent_relief,
            total_deductions,
            taxable_income,
            breakdown,
            net_tax,
            monthly_tax: round_half_up(net_tax / MONTHS_PER_YEAR),
            net_annual,
            net_monthly: round_half_up(net_annual / MONTHS_PER_YEAR),
            effective_rate,
        }
    }

    /// Monthly gross annualised plus other income. Not rounded, so the
    /// identity with the inputs holds exactly.
    fn annual_gross(
        &self,
        input: &TaxInput,
    ) -> Decimal {
        input.monthly_gross * MONTHS_PER_YEAR + input.additional_annual_income
    }

    fn pension(
        &self,
        input: &TaxInput,
    ) -> Decimal {
        if !input.has_pension {
            return Decimal::ZERO;
        }
        round_half_up(input.pension_base * MONTHS_PER_YEAR * self.config.pension_rate)
    }

    fn nhf(
        &self,
        input: &TaxInput,
    ) -> Decimal {
        if !input.has_nhf {
            return Decimal::ZERO;
        }
        round_half_up(input.nhf_base * MONTHS_PER_YEAR * self.config.nhf_rate)
    }

    /// Applies regardless of any other option.
    fn rent_relief(
        &self,
        annual_rent: Decimal,
    ) -> Decimal {
        round_half_up(annual_rent * self.config.rent_relief_rate).min(self.config.rent_relief_cap)
    }

    fn taxable_income(
        &self,
        annual_gross: Decimal,
        total_deductions: Decimal,
    ) -> Decimal {
        max(annual_gross - total_deductions, Decimal::ZERO)
    }

    /// Walks the bands lowest first, taxing only the slice of income inside
    /// each. Bands the income never reaches are left out.
    fn apply_bands(
        &self,
        taxable_income: Decimal,
    ) -> Vec<BandTax> {
        let mut remaining = taxable_income;
        let mut breakdown = Vec::new();

        for band in &self.config.bands {
            if remaining <= Decimal::ZERO {
                break;
            }

            let consumed = match band.width {
                Some(width) => remaining.min(width),
                None => remaining,
            };
            remaining -= consumed;

            breakdown.push(BandTax {
                label: band.label.clone(),
                rate: band.rate_percent(),
                taxable_amount: consumed,
                tax: round_half_up(consumed * band.rate),
            });
        }

        breakdown
    }

    /// Net tax as a percentage of gross; zero when there is no income.
    fn effective_rate(
        &self,
        net_tax: Decimal,
        annual_gross: Decimal,
    ) -> Decimal {
        if annual_gross <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        round_half_up(net_tax / annual_gross * Decimal::ONE_HUNDRED)
    }
}

impl Default for PayeCalculator {
    fn default() -> Self {
        Self::statutory()
    }
}

/// Computes PAYE with the statutory rules.
pub fn compute_paye(input: &TaxInput) -> TaxResult {
    PayeCalculator::statutory().calculate(input)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn full_input() -> TaxInput {
        TaxInput {
            monthly_gross: dec!(500000),
            pension_base: dec!(500000),
            nhf_base: dec!(500000),
            annual_rent: dec!(1200000),
            has_pension: true,
            has_nhf: true,
            additional_annual_income: dec!(0),
        }
    }

    fn band_taxes(result: &TaxResult) -> Vec<Decimal> {
        result.breakdown.iter().map(|b| b.tax).collect()
    }

    // =========================================================================
    // config validation tests
    // =========================================================================

    #[test]
    fn statutory_config_is_valid() {
        assert_eq!(PayeConfig::statutory().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let config = PayeConfig {
            pension_rate: dec!(8),
            ..PayeConfig::statutory()
        };

        assert_eq!(
            config.validate(),
            Err(PayeConfigError::InvalidRate {
                name: "pension rate",
                value: dec!(8)
            })
        );
    }

    #[test]
    fn validate_rejects_negative_rent_cap() {
        let config = PayeConfig {
            rent_relief_cap: dec!(-1),
            ..PayeConfig::statutory()
        };

        assert_eq!(
            config.validate(),
            Err(PayeConfigError::InvalidRentReliefCap(dec!(-1)))
        );
    }

    #[test]
    fn validate_rejects_empty_table() {
        let config = PayeConfig {
            bands: vec![],
            ..PayeConfig::statutory()
        };

        assert_eq!(config.validate(), Err(PayeConfigError::NoBands));
    }

    #[test]
    fn validate_rejects_open_band_in_the_middle() {
        let config = PayeConfig {
            bands: vec![
                TaxBand::new("a", None, dec!(0.1)),
                TaxBand::new("b", None, dec!(0.2)),
            ],
            ..PayeConfig::statutory()
        };

        assert_eq!(
            config.validate(),
            Err(PayeConfigError::OpenBandNotLast("a".to_string()))
        );
    }

    #[test]
    fn validate_rejects_zero_width_band() {
        let config = PayeConfig {
            bands: vec![
                TaxBand::new("a", Some(dec!(0)), dec!(0.1)),
                TaxBand::new("b", None, dec!(0.2)),
            ],
            ..PayeConfig::statutory()
        };

        assert_eq!(
            config.validate(),
            Err(PayeConfigError::InvalidBandWidth {
                label: "a".to_string(),
                width: dec!(0)
            })
        );
    }

    #[test]
    fn validate_rejects_bounded_last_band() {
        let config = PayeConfig {
            bands: vec![TaxBand::new("a", Some(dec!(100)), dec!(0.1))],
            ..PayeConfig::statutory()
        };

        assert_eq!(config.validate(), Err(PayeConfigError::MissingOpenBand));
    }

    #[test]
    fn validate_rejects_band_rate_above_one() {
        let config = PayeConfig {
            bands: vec![TaxBand::new("a", None, dec!(1.5))],
            ..PayeConfig::statutory()
        };

        assert_eq!(
            config.validate(),
            Err(PayeConfigError::InvalidBandRate {
                label: "a".to_string(),
                rate: dec!(1.5)
            })
        );
    }

    #[test]
    fn new_refuses_invalid_config() {
        let config = PayeConfig {
            bands: vec![],
            ..PayeConfig::statutory()
        };

        assert!(PayeCalculator::new(config).is_err());
    }

    // =========================================================================
    // deduction tests
    // =========================================================================

    #[test]
    fn pension_is_eight_percent_of_annualised_base() {
        let calc = PayeCalculator::statutory();

        assert_eq!(calc.pension(&full_input()), dec!(480000));
    }

    #[test]
    fn pension_is_zero_when_not_opted_in() {
        let calc = PayeCalculator::statutory();
        let input = TaxInput {
            has_pension: false,
            ..full_input()
        };

        assert_eq!(calc.pension(&input), Decimal::ZERO);
    }

    #[test]
    fn nhf_is_two_and_a_half_percent_of_annualised_base() {
        let calc = PayeCalculator::statutory();

        assert_eq!(calc.nhf(&full_input()), dec!(150000));
    }

    #[test]
    fn nhf_uses_its_own_base() {
        let calc = PayeCalculator::statutory();
        let input = TaxInput {
            nhf_base: dec!(200000),
            ..full_input()
        };

        // 200,000 × 12 × 2.5%
        assert_eq!(calc.nhf(&input), dec!(60000));
    }

    #[test]
    fn rent_relief_is_twenty_percent_of_rent() {
        let calc = PayeCalculator::statutory();

        assert_eq!(calc.rent_relief(dec!(1200000)), dec!(240000));
    }

    #[test]
    fn rent_relief_is_capped() {
        let calc = PayeCalculator::statutory();

        assert_eq!(calc.rent_relief(dec!(5000000)), dec!(500000));
        assert_eq!(calc.rent_relief(dec!(2500000)), dec!(500000));
    }

    #[test]
    fn rent_relief_applies_without_any_opt_in() {
        let input = TaxInput {
            annual_rent: dec!(1000000),
            ..TaxInput::basic(dec!(50000))
        };

        let result = compute_paye(&input);

        assert_eq!(result.rent_relief, dec!(200000));
        assert_eq!(result.taxable_income, dec!(400000));
        assert_eq!(result.net_tax, Decimal::ZERO);
    }

    // =========================================================================
    // band tests
    // =========================================================================

    #[test]
    fn apply_bands_on_zero_income_is_empty() {
        let calc = PayeCalculator::statutory();

        assert!(calc.apply_bands(Decimal::ZERO).is_empty());
    }

    #[test]
    fn apply_bands_within_exempt_band_yields_single_zero_entry() {
        let calc = PayeCalculator::statutory();

        let breakdown = calc.apply_bands(dec!(800000));

        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].rate, dec!(0));
        assert_eq!(breakdown[0].taxable_amount, dec!(800000));
        assert_eq!(breakdown[0].tax, Decimal::ZERO);
    }

    #[test]
    fn apply_bands_one_naira_into_second_band() {
        let calc = PayeCalculator::statutory();

        let breakdown = calc.apply_bands(dec!(800001));

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[1].label, "Next ₦2,200,000");
        assert_eq!(breakdown[1].taxable_amount, dec!(1));
        assert_eq!(breakdown[1].tax, dec!(0.15));
    }

    #[test]
    fn apply_bands_fills_every_band_for_top_earners() {
        let calc = PayeCalculator::statutory();

        let breakdown = calc.apply_bands(dec!(60000000));

        let taxes: Vec<Decimal> = breakdown.iter().map(|b| b.tax).collect();
        assert_eq!(
            taxes,
            vec![
                dec!(0),
                dec!(330000),
                dec!(1620000),
                dec!(2730000),
                dec!(5750000),
                dec!(2500000),
            ]
        );
        assert_eq!(breakdown[5].rate, dec!(25));
        assert_eq!(breakdown[5].taxable_amount, dec!(10000000));
    }

    #[test]
    fn apply_bands_rounds_each_band_to_kobo() {
        let calc = PayeCalculator::statutory();

        // 2,000.333 × 15% = 300.04995
        let breakdown = calc.apply_bands(dec!(802000.333));

        assert_eq!(breakdown[1].tax, dec!(300.05));
    }

    // =========================================================================
    // effective_rate tests
    // =========================================================================

    #[test]
    fn effective_rate_is_zero_for_zero_gross() {
        let calc = PayeCalculator::statutory();

        assert_eq!(calc.effective_rate(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn effective_rate_is_rounded_percentage() {
        let calc = PayeCalculator::statutory();

        // 713,400 / 6,000,000 = 11.89%
        assert_eq!(calc.effective_rate(dec!(713400), dec!(6000000)), dec!(11.89));
    }

    // =========================================================================
    // calculate (integration) tests
    // =========================================================================

    #[test]
    fn calculate_salaried_employee_with_all_deductions() {
        let result = compute_paye(&full_input());

        assert_eq!(result.annual_gross, dec!(6000000));
        assert_eq!(result.pension, dec!(480000));
        assert_eq!(result.nhf, dec!(150000));
        assert_eq!(result.rent_relief, dec!(240000));
        assert_eq!(result.total_deductions, dec!(870000));
        assert_eq!(result.taxable_income, dec!(5130000));
        // 0 + 2,200,000 × 15% + 2,130,000 × 18%
        assert_eq!(band_taxes(&result), vec![dec!(0), dec!(330000), dec!(383400)]);
        assert_eq!(result.net_tax, dec!(713400));
        assert_eq!(result.monthly_tax, dec!(59450));
        // 6,000,000 - 870,000 - 713,400
        assert_eq!(result.net_annual, dec!(4416600));
        assert_eq!(result.net_monthly, dec!(368050));
        assert_eq!(result.effective_rate, dec!(11.89));
    }

    #[test]
    fn calculate_low_earner_pays_nothing() {
        let result = compute_paye(&TaxInput::basic(dec!(50000)));

        assert_eq!(result.annual_gross, dec!(600000));
        assert_eq!(result.taxable_income, dec!(600000));
        assert_eq!(result.net_tax, Decimal::ZERO);
        assert_eq!(result.effective_rate, Decimal::ZERO);
        assert_eq!(result.breakdown.len(), 1);
        assert_eq!(result.net_annual, dec!(600000));
    }

    #[test]
    fn calculate_zero_income_is_all_zero() {
        let result = compute_paye(&TaxInput::default());

        assert_eq!(result.annual_gross, Decimal::ZERO);
        assert_eq!(result.total_deductions, Decimal::ZERO);
        assert_eq!(result.taxable_income, Decimal::ZERO);
        assert!(result.breakdown.is_empty());
        assert_eq!(result.net_tax, Decimal::ZERO);
        assert_eq!(result.monthly_tax, Decimal::ZERO);
        assert_eq!(result.net_monthly, Decimal::ZERO);
        assert_eq!(result.effective_rate, Decimal::ZERO);
    }

    #[test]
    fn calculate_caps_rent_relief_for_large_rent() {
        let input = TaxInput {
            annual_rent: dec!(5000000),
            ..full_input()
        };

        let result = compute_paye(&input);

        assert_eq!(result.rent_relief, dec!(500000));
        assert_eq!(result.total_deductions, dec!(1130000));
    }

    #[test]
    fn calculate_floors_taxable_income_when_deductions_exceed_gross() {
        let input = TaxInput {
            monthly_gross: dec!(10000),
            pension_base: dec!(10000),
            nhf_base: dec!(10000),
            annual_rent: dec!(3000000),
            has_pension: true,
            has_nhf: true,
            additional_annual_income: dec!(0),
        };

        let result = compute_paye(&input);

        assert_eq!(result.annual_gross, dec!(120000));
        assert_eq!(result.taxable_income, Decimal::ZERO);
        assert!(result.breakdown.is_empty());
        assert_eq!(result.net_tax, Decimal::ZERO);
    }

    #[test]
    fn calculate_adds_other_income_outside_contribution_bases() {
        let input = TaxInput {
            additional_annual_income: dec!(1000000),
            ..full_input()
        };

        let result = compute_paye(&input);

        assert_eq!(result.annual_gross, dec!(7000000));
        assert_eq!(result.pension, dec!(480000));
        assert_eq!(result.nhf, dec!(150000));
        assert_eq!(result.taxable_income, dec!(6130000));
        // 713,400 + 1,000,000 × 18%
        assert_eq!(result.net_tax, dec!(893400));
    }

    #[test]
    fn calculate_breakdown_sums_to_net_tax() {
        for monthly in [dec!(0), dec!(75000.55), dec!(333333.33), dec!(1234567.89), dec!(9999999.99)] {
            let result = compute_paye(&TaxInput {
                has_pension: true,
                annual_rent: dec!(777777.77),
                ..TaxInput::basic(monthly)
            });

            let sum: Decimal = band_taxes(&result).into_iter().sum();
            assert_eq!(sum, result.net_tax, "monthly gross {monthly}");
        }
    }

    #[test]
    fn calculate_net_tax_never_decreases_as_gross_rises() {
        let mut previous = Decimal::ZERO;
        let mut monthly = dec!(0);

        while monthly <= dec!(6000000) {
            let input = TaxInput {
                monthly_gross: monthly,
                pension_base: dec!(200000),
                nhf_base: dec!(200000),
                annual_rent: dec!(600000),
                has_pension: true,
                has_nhf: true,
                additional_annual_income: dec!(0),
            };

            let net_tax = compute_paye(&input).net_tax;
            assert!(net_tax >= previous, "tax fell at monthly gross {monthly}");
            previous = net_tax;
            monthly += dec!(37500.25);
        }
    }

    #[test]
    fn calculate_effective_rate_stays_within_top_rate() {
        for monthly in [dec!(1), dec!(70000), dec!(1000000), dec!(50000000), dec!(900000000)] {
            let result = compute_paye(&TaxInput::basic(monthly));

            assert!(result.effective_rate >= Decimal::ZERO);
            assert!(result.effective_rate <= dec!(25), "monthly gross {monthly}");
        }
    }

    #[test]
    fn calculate_is_idempotent() {
        let calc = PayeCalculator::statutory();

        assert_eq!(calc.calculate(&full_input()), calc.calculate(&full_input()));
    }

    #[test]
    fn calculate_with_custom_table() {
        let config = PayeConfig {
            bands: vec![
                TaxBand::new("First 1,000", Some(dec!(1000)), dec!(0)),
                TaxBand::new("Above 1,000", None, dec!(0.5)),
            ],
            ..PayeConfig::statutory()
        };
        let calc = PayeCalculator::new(config).unwrap();

        let result = calc.calculate(&TaxInput {
            additional_annual_income: dec!(3000),
            ..TaxInput::default()
        });

        assert_eq!(result.net_tax, dec!(1000));
        assert_eq!(result.breakdown[1].rate, dec!(50));
    }
}
