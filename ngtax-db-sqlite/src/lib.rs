//! SQLite storage for saved PAYE and CIT calculations.

mod factory;
mod repository;

pub use factory::SqliteRepositoryFactory;
pub use repository::SqliteRepository;
