use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::{BusinessInput, BusinessResult, TaxInput, TaxResult};

/// Which engine produced a saved calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationKind {
    Paye,
    Cit,
}

impl CalculationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paye => "paye",
            Self::Cit => "cit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paye" => Some(Self::Paye),
            "cit" => Some(Self::Cit),
            _ => None,
        }
    }
}

impl fmt::Display for CalculationKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("expected a {expected} calculation, found {found}")]
    KindMismatch {
        expected: CalculationKind,
        found: CalculationKind,
    },

    #[error("malformed calculation payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// A calculation ready to hand to a repository (no id or timestamp yet).
///
/// Inputs and results travel as opaque JSON so storage backends never
/// depend on the engine types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCalculation {
    pub kind: CalculationKind,
    pub owner_id: String,
    pub label: Option<String>,
    pub input: Value,
    pub result: Value,
}

impl NewCalculation {
    pub fn paye(
        owner_id: impl Into<String>,
        input: &TaxInput,
        result: &TaxResult,
    ) -> Result<Self, RecordError> {
        Ok(Self {
            kind: CalculationKind::Paye,
            owner_id: owner_id.into(),
            label: None,
            input: serde_json::to_value(input)?,
            result: serde_json::to_value(result)?,
        })
    }

    pub fn cit(
        owner_id: impl Into<String>,
        input: &BusinessInput,
        result: &BusinessResult,
    ) -> Result<Self, RecordError> {
        Ok(Self {
            kind: CalculationKind::Cit,
            owner_id: owner_id.into(),
            label: None,
            input: serde_json::to_value(input)?,
            result: serde_json::to_value(result)?,
        })
    }

    pub fn with_label(
        mut self,
        label: impl Into<String>,
    ) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The stored form of this calculation once a store has assigned its
    /// id and timestamp.
    pub fn into_saved(
        self,
        id: i64,
        created_at: DateTime<Utc>,
    ) -> SavedCalculation {
        SavedCalculation {
            id,
            kind: self.kind,
            owner_id: self.owner_id,
            label: self.label,
            input: self.input,
            result: self.result,
            created_at,
        }
    }
}

/// A calculation as returned by a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCalculation {
    pub id: i64,
    pub kind: CalculationKind,
    pub owner_id: String,
    pub label: Option<String>,
    pub input: Value,
    pub result: Value,
    pub created_at: DateTime<Utc>,
}

impl SavedCalculation {
    /// Decodes the payloads of a PAYE record.
    pub fn paye(&self) -> Result<(TaxInput, TaxResult), RecordError> {
        self.expect_kind(CalculationKind::Paye)?;
        Ok((
            serde_json::from_value(self.input.clone())?,
            serde_json::from_value(self.result.clone())?,
        ))
    }

    /// Decodes the payloads of a CIT record.
    pub fn cit(&self) -> Result<(BusinessInput, BusinessResult), RecordError> {
        self.expect_kind(CalculationKind::Cit)?;
        Ok((
            serde_json::from_value(self.input.clone())?,
            serde_json::from_value(self.result.clone())?,
        ))
    }

    /// Annual tax owed according to the stored result, if it decodes.
    pub fn headline_tax(&self) -> Option<Decimal> {
        match self.kind {
            CalculationKind::Paye => self.paye().ok().map(|(_, r)| r.net_tax),
            CalculationKind::Cit => self.cit().ok().map(|(_, r)| r.total_tax),
        }
    }

    fn expect_kind(
        &self,
        expected: CalculationKind,
    ) -> Result<(), RecordError> {
        if self.kind != expected {
            return Err(RecordError::KindMismatch {
                expected,
                found: self.kind,
            });
        }
        Ok(())
    }
}
