//! Numeric helpers shared by the PAYE and CIT engines.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

/// Rounds to kobo (two decimal places), halves away from zero.
///
/// Every monetary value an engine reports passes through here exactly once.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use ngtax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(383400.004)), dec!(383400.00));
/// assert_eq!(round_half_up(dec!(300.045)), dec!(300.05));
/// assert_eq!(round_half_up(dec!(-0.125)), dec!(-0.13));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Larger of two amounts. Used to floor derived figures at zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use ngtax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-870000), dec!(0)), dec!(0));
/// assert_eq!(max(dec!(5130000), dec!(0)), dec!(5130000));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Replaces a negative amount with zero, logging the field that was clamped.
///
/// Engines assume non-negative input; callers that prefer clamping over
/// rejecting run their figures through this first.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use ngtax_core::calculations::common::clamp_non_negative;
///
/// assert_eq!(clamp_non_negative(dec!(-250.00), "annual_rent"), dec!(0));
/// assert_eq!(clamp_non_negative(dec!(250.00), "annual_rent"), dec!(250.00));
/// ```
pub fn clamp_non_negative(
    value: Decimal,
    field: &str,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(field, %value, "negative amount clamped to zero");
        Decimal::ZERO
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_truncates_below_half_a_kobo() {
        assert_eq!(round_half_up(dec!(59449.994)), dec!(59449.99));
    }

    #[test]
    fn round_half_up_rounds_half_a_kobo_up() {
        assert_eq!(round_half_up(dec!(59449.995)), dec!(59450.00));
    }

    #[test]
    fn round_half_up_rounds_negative_half_away_from_zero() {
        assert_eq!(round_half_up(dec!(-10.005)), dec!(-10.01));
    }

    #[test]
    fn round_half_up_carries_into_whole_naira() {
        assert_eq!(round_half_up(dec!(999999.999)), dec!(1000000.00));
    }

    #[test]
    fn round_half_up_leaves_kobo_values_alone() {
        assert_eq!(round_half_up(dec!(713400.25)), dec!(713400.25));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_floors_negative_difference_at_zero() {
        assert_eq!(max(dec!(120000) - dec!(512600), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn max_is_symmetric() {
        assert_eq!(max(dec!(1), dec!(2)), max(dec!(2), dec!(1)));
    }

    // =========================================================================
    // clamp_non_negative tests
    // =========================================================================

    #[test]
    fn clamp_non_negative_zeroes_negative_values() {
        let result = clamp_non_negative(dec!(-0.01), "pension_base");

        assert_eq!(result, Decimal::ZERO);
    }

    #[test]
    fn clamp_non_negative_keeps_zero() {
        let result = clamp_non_negative(dec!(0.00), "pension_base");

        assert_eq!(result, dec!(0.00));
    }

    #[test]
    fn clamp_non_negative_keeps_positive_values() {
        let result = clamp_non_negative(dec!(1200000), "annual_rent");

        assert_eq!(result, dec!(1200000));
    }
}
