use rust_decimal::Decimal;
use thiserror::Error;

/// Largest figure accepted for any single amount: one quadrillion naira.
///
/// Annualising and summing amounts below this ceiling stays far inside the
/// range `Decimal` arithmetic can represent.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Rejections produced by the caller-side input checks.
///
/// The engines never return these; they assume validated, non-negative
/// figures. Front ends run `validate()` first and surface the message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    #[error("{field} must not exceed {}, got {value}", MAX_AMOUNT)]
    TooLarge { field: &'static str, value: Decimal },

    #[error("income source '{name}' must not be negative, got {value}")]
    NegativeIncomeSource { name: String, value: Decimal },

    #[error("income source '{name}' must not exceed {}, got {value}", MAX_AMOUNT)]
    IncomeSourceTooLarge { name: String, value: Decimal },

    #[error("annual turnover must be greater than zero, got {0}")]
    NonPositiveTurnover(Decimal),
}

pub(crate) fn is_negative(value: Decimal) -> bool {
    value.is_sign_negative() && !value.is_zero()
}

/// Rejects a negative figure or one above [`MAX_AMOUNT`].
pub(crate) fn ensure_amount(
    field: &'static str,
    value: Decimal,
) -> Result<(), InputError> {
    if is_negative(value) {
        return Err(InputError::Negative { field, value });
    }
    if value > MAX_AMOUNT {
        return Err(InputError::TooLarge { field, value });
    }
    Ok(())
}
