//! Serde helpers for spreadsheet-style cells.

use ngtax_core::formatting::parse_amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, de};

/// An amount cell: blank is zero, `₦` and thousands separators are allowed.
pub(crate) fn amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let cell: Option<String> = Option::deserialize(deserializer)?;
    match cell {
        Some(s) => parse_amount(&s).map_err(de::Error::custom),
        None => Ok(Decimal::ZERO),
    }
}

/// A yes/no cell: blank is `false`.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let cell: Option<String> = Option::deserialize(deserializer)?;
    let Some(s) = cell else {
        return Ok(false);
    };
    match s.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "n" | "0" => Ok(false),
        "true" | "yes" | "y" | "1" => Ok(true),
        other => Err(de::Error::custom(format!("invalid yes/no value '{other}'"))),
    }
}
