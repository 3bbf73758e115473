//! Tax engines.
//!
//! [`paye`] computes personal income tax for employees and [`cit`] computes
//! company income tax and the development levy. Both share the rounding
//! rules in [`common`].

pub mod cit;
pub mod common;
pub mod paye;

pub use cit::{CitCalculator, CitConfig, CitConfigError, CitError, compute_cit};
pub use paye::{PayeCalculator, PayeConfig, PayeConfigError, compute_paye};
