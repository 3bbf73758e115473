mod business_input;
mod business_result;
mod calculation;
mod input_error;
mod salary;
mod tax_band;
mod tax_input;
mod tax_result;

pub use business_input::BusinessInput;
pub use business_result::BusinessResult;
pub use calculation::{CalculationKind, NewCalculation, RecordError, SavedCalculation};
pub use input_error::{InputError, MAX_AMOUNT};
pub use salary::{IncomeSource, NhfBasis, SalaryBreakdown, total_additional_income};
pub use tax_band::TaxBand;
pub use tax_input::TaxInput;
pub use tax_result::{BandTax, TaxResult};

pub(crate) use business_input::amount_or_zero;
