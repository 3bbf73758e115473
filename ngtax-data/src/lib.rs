//! Batch loading of payroll and company records from CSV.
//!
//! Each loader follows the same three steps: `parse` reads and validates the
//! rows, `compute` runs the tax engine over them, and `save` stores every
//! result through a [`CalculationRepository`](ngtax_core::CalculationRepository).

mod business;
mod cells;
mod error;
mod payroll;

pub use business::{BusinessLoader, BusinessRecord, BusinessRun, CompanyCit};
pub use error::LoadError;
pub use payroll::{EmployeePaye, PayrollLoader, PayrollRecord, PayrollRun};
