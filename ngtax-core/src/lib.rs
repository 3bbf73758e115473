pub mod calculations;
pub mod db;
pub mod formatting;
pub mod models;

pub use calculations::{CitError, compute_cit, compute_paye};
pub use db::repository::{CalculationRepository, RepositoryError};
pub use models::*;
