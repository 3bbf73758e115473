use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CalculationKind, NewCalculation, SavedCalculation};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A stored payload could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Storage for saved PAYE and CIT calculations.
///
/// The tax engines never touch this; callers compute first and save the
/// result if the user asks for it.
#[async_trait]
pub trait CalculationRepository: Send + Sync {
    /// Stores a calculation and returns it with its assigned id and
    /// timestamp.
    async fn save_calculation(
        &self,
        calc: NewCalculation,
    ) -> Result<SavedCalculation, RepositoryError>;

    async fn get_calculation(&self, id: i64) -> Result<SavedCalculation, RepositoryError>;

    /// Calculations belonging to `owner_id`, newest first, optionally
    /// restricted to one kind.
    async fn list_calculations(
        &self,
        owner_id: &str,
        kind: Option<CalculationKind>,
    ) -> Result<Vec<SavedCalculation>, RepositoryError>;

    /// Returns [`RepositoryError::NotFound`] when no row has this id.
    async fn delete_calculation(&self, id: i64) -> Result<(), RepositoryError>;
}
