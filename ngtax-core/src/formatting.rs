//! Naira display and input parsing.
//!
//! Display helpers round to kobo first, so anything an engine returns can be
//! shown and read back without drift:
//!
//! ```
//! use rust_decimal_macros::dec;
//! use ngtax_core::formatting::{format_naira, parse_amount};
//!
//! let shown = format_naira(dec!(713400));
//! assert_eq!(shown, "₦713,400.00");
//! assert_eq!(parse_amount(&shown).unwrap(), dec!(713400));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::calculations::common::round_half_up;
use crate::models::MAX_AMOUNT;

const NAIRA_SIGN: &str = "₦";

/// Error returned when a string cannot be parsed as an amount.
#[derive(Debug, Error)]
pub enum ParseAmountError {
    #[error("invalid amount '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("amount '{input}' is out of range; at most {} either way", MAX_AMOUNT)]
    OutOfRange { input: String },
}

impl ParseAmountError {
    pub fn input(&self) -> &str {
        match self {
            Self::Invalid { input, .. } | Self::OutOfRange { input } => input,
        }
    }
}

/// `₦1,234,567.89`; negatives as `-₦1,234,567.89`.
pub fn format_naira(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{NAIRA_SIGN}{}", format_amount(rounded.abs()))
}

/// Whole naira, for thresholds and captions: `₦100,000,000`.
pub fn format_naira_whole(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{NAIRA_SIGN}{}", group_integer(&rounded.abs().trunc().to_string()))
}

/// Two decimals with thousands separators and no currency sign.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}{}.{fraction}", group_integer(whole))
}

/// A percentage value (11.89, not 0.1189) with two decimals: `11.89%`.
pub fn format_percent(rate_percent: Decimal) -> String {
    format!("{:.2}%", round_half_up(rate_percent))
}

/// Regroups partially typed input: keeps digits and the first decimal
/// point, drops everything else.
///
/// ```
/// use ngtax_core::formatting::group_thousands;
///
/// assert_eq!(group_thousands("1234567.5"), "1,234,567.5");
/// assert_eq!(group_thousands("₦12,00"), "1,200");
/// assert_eq!(group_thousands("1000."), "1,000.");
/// ```
pub fn group_thousands(raw: &str) -> String {
    let mut whole = String::new();
    let mut fraction: Option<String> = None;

    for c in raw.chars() {
        if c.is_ascii_digit() {
            match fraction.as_mut() {
                Some(f) => f.push(c),
                None => whole.push(c),
            }
        } else if c == '.' && fraction.is_none() {
            fraction = Some(String::new());
        }
    }

    let grouped = group_integer(whole.trim_start_matches('0'));
    let grouped = if grouped.is_empty() && !whole.is_empty() {
        "0".to_string()
    } else {
        grouped
    };

    match fraction {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

fn group_integer(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Strips currency markers, separators and whitespace.
fn normalize_amount_input(s: &str) -> String {
    s.trim()
        .replace(NAIRA_SIGN, "")
        .replace("NGN", "")
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect()
}

/// Parses user input into an amount.
///
/// Accepts `₦`, `NGN`, thousands separators and surrounding whitespace.
/// Empty input is zero.
///
/// # Errors
///
/// Returns [`ParseAmountError`] when what is left is not a number, or is
/// a number whose magnitude exceeds [`MAX_AMOUNT`].
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let value: Decimal = normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid amount: {}", e);
        ParseAmountError::Invalid {
            input: s.to_string(),
            source: e,
        }
    })?;
    if value.abs() > MAX_AMOUNT {
        tracing::debug!(input = %s, "amount out of range");
        return Err(ParseAmountError::OutOfRange {
            input: s.to_string(),
        });
    }
    Ok(value)
}

/// Like [`parse_amount`], but `None` for blank or unparseable input.
pub fn parse_optional_amount(s: &str) -> Option<Decimal> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return None;
    }
    normalized.parse().map_or_else(
        |e| {
            tracing::warn!(input = %s, "invalid optional amount: {}", e);
            None
        },
        Some,
    )
}
