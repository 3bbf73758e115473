use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One slice of a progressive rate table.
///
/// Bands are listed in ascending order and stacked: each band covers the
/// next `width` naira after the previous one. The last band has no width
/// and takes everything above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBand {
    pub label: String,
    pub width: Option<Decimal>,
    /// Marginal rate as a fraction (0.15 for 15%).
    pub rate: Decimal,
}

impl TaxBand {
    pub fn new(
        label: impl Into<String>,
        width: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            width,
            rate,
        }
    }

    /// Rate expressed as a percentage (15 for 0.15).
    pub fn rate_percent(&self) -> Decimal {
        (self.rate * Decimal::ONE_HUNDRED).normalize()
    }
}
