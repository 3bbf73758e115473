//! Payroll CSV loader.
//!
//! | Column              | Required | Notes                                  |
//! |---------------------|----------|----------------------------------------|
//! | `employee_id`       | yes      | used as the saved calculation's label  |
//! | `basic`             | yes      | monthly                                |
//! | `housing`           | no       | monthly, blank is zero                 |
//! | `transport`         | no       | monthly, blank is zero                 |
//! | `other_allowances`  | no       | monthly, blank is zero                 |
//! | `annual_rent`       | no       | blank is zero                          |
//! | `has_pension`       | no       | `yes`/`no`, `true`/`false`, `1`/`0`    |
//! | `has_nhf`           | no       | as above                               |
//! | `nhf_basis`         | no       | `basic` (default) or `gross`           |
//! | `additional_income` | no       | annual, blank is zero                  |
//!
//! ```csv
//! employee_id,basic,housing,transport,annual_rent,has_pension,has_nhf
//! E001,"300,000",120000,80000,"1,200,000",yes,yes
//! ```

use std::io::Read;

use ngtax_core::calculations::PayeCalculator;
use ngtax_core::{
    CalculationRepository, NewCalculation, NhfBasis, SalaryBreakdown, SavedCalculation, TaxInput,
    TaxResult,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use crate::cells;
use crate::error::LoadError;

#[derive(Debug, Deserialize)]
struct CsvRow {
    employee_id: String,
    #[serde(deserialize_with = "cells::amount")]
    basic: Decimal,
    #[serde(default, deserialize_with = "cells::amount")]
    housing: Decimal,
    #[serde(default, deserialize_with = "cells::amount")]
    transport: Decimal,
    #[serde(default, deserialize_with = "cells::amount")]
    other_allowances: Decimal,
    #[serde(default, deserialize_with = "cells::amount")]
    annual_rent: Decimal,
    #[serde(default, deserialize_with = "cells::flag")]
    has_pension: bool,
    #[serde(default, deserialize_with = "cells::flag")]
    has_nhf: bool,
    #[serde(default)]
    nhf_basis: Option<String>,
    #[serde(default, deserialize_with = "cells::amount")]
    additional_income: Decimal,
}

/// One employee's pay for the month plus the yearly figures PAYE needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollRecord {
    pub employee_id: String,
    pub salary: SalaryBreakdown,
    pub annual_rent: Decimal,
    pub has_pension: bool,
    pub has_nhf: bool,
    pub nhf_basis: NhfBasis,
    pub additional_income: Decimal,
}

impl PayrollRecord {
    pub fn tax_input(&self) -> TaxInput {
        TaxInput {
            annual_rent: self.annual_rent,
            has_pension: self.has_pension,
            has_nhf: self.has_nhf,
            additional_annual_income: self.additional_income,
            ..self.salary.to_tax_input(self.nhf_basis)
        }
    }
}

/// PAYE computed for one employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeePaye {
    pub employee_id: String,
    pub input: TaxInput,
    pub result: TaxResult,
}

/// PAYE for a whole payroll, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayrollRun {
    pub employees: Vec<EmployeePaye>,
}

impl PayrollRun {
    pub fn total_annual_gross(&self) -> Decimal {
        self.employees.iter().map(|e| e.result.annual_gross).sum()
    }

    pub fn total_net_tax(&self) -> Decimal {
        self.employees.iter().map(|e| e.result.net_tax).sum()
    }

    pub fn total_monthly_tax(&self) -> Decimal {
        self.employees.iter().map(|e| e.result.monthly_tax).sum()
    }

    pub fn total_net_annual(&self) -> Decimal {
        self.employees.iter().map(|e| e.result.net_annual).sum()
    }
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<PayrollRecord, LoadError> {
    let nhf_basis = match row.nhf_basis.as_deref().map(str::trim) {
        None | Some("") => NhfBasis::default(),
        Some(raw) => NhfBasis::parse(raw).ok_or_else(|| LoadError::InvalidValue {
            row: row_number,
            column: "nhf_basis",
            value: raw.to_string(),
        })?,
    };

    let record = PayrollRecord {
        employee_id: row.employee_id,
        salary: SalaryBreakdown {
            basic: row.basic,
            housing: row.housing,
            transport: row.transport,
            other_allowances: row.other_allowances,
        },
        annual_rent: row.annual_rent,
        has_pension: row.has_pension,
        has_nhf: row.has_nhf,
        nhf_basis,
        additional_income: row.additional_income,
    };

    record
        .salary
        .validate()
        .and_then(|()| record.tax_input().validate())
        .map_err(|source| LoadError::Input {
            row: row_number,
            source,
        })?;

    Ok(record)
}

pub struct PayrollLoader;

impl PayrollLoader {
    /// Reads payroll rows, rejecting unknown NHF bases and negative figures.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<PayrollRecord>, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let records = reader
            .deserialize::<CsvRow>()
            .enumerate()
            .map(|(idx, result)| convert_row(result?, idx + 1))
            .collect::<Result<Vec<_>, _>>()?;

        info!(rows = records.len(), "payroll parsed");
        Ok(records)
    }

    pub fn compute(
        calculator: &PayeCalculator,
        records: &[PayrollRecord],
    ) -> PayrollRun {
        let employees = records
            .iter()
            .map(|record| {
                let input = record.tax_input();
                let result = calculator.calculate(&input);
                EmployeePaye {
                    employee_id: record.employee_id.clone(),
                    input,
                    result,
                }
            })
            .collect();

        PayrollRun { employees }
    }

    /// Saves one PAYE calculation per employee, labelled with the employee id.
    pub async fn save<R: CalculationRepository + ?Sized>(
        repo: &R,
        owner_id: &str,
        run: &PayrollRun,
    ) -> Result<Vec<SavedCalculation>, LoadError> {
        let mut saved = Vec::with_capacity(run.employees.len());

        for (idx, employee) in run.employees.iter().enumerate() {
            let calc = NewCalculation::paye(owner_id, &employee.input, &employee.result)
                .map_err(|source| LoadError::Record {
                    row: idx + 1,
                    source,
                })?
                .with_label(employee.employee_id.as_str());

            saved.push(repo.save_calculation(calc).await?);
        }

        debug!(count = saved.len(), owner_id, "payroll saved");
        Ok(saved)
    }
}
