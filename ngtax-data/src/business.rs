//! Company CSV loader.
//!
//! | Column               | Required | Notes            |
//! |----------------------|----------|------------------|
//! | `company`            | yes      | label when saved |
//! | `turnover`           | yes      | must be positive |
//! | `assets`             | no       | blank is zero    |
//! | `profit_before_tax`  | no       | blank is zero    |
//! | `depreciation`       | no       | blank is zero    |
//! | `fines_penalties`    | no       | blank is zero    |
//! | `capital_allowances` | no       | blank is zero    |

use std::io::Read;

use ngtax_core::calculations::CitCalculator;
use ngtax_core::{BusinessInput, BusinessResult, CalculationRepository, NewCalculation, SavedCalculation};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use crate::cells;
use crate::error::LoadError;

#[derive(Debug, Deserialize)]
struct CsvRow {
    company: String,
    #[serde(deserialize_with = "cells::amount")]
    turnover: Decimal,
    #[serde(default, deserialize_with = "cells::amount")]
    assets: Decimal,
    #[serde(default, deserialize_with = "cells::amount")]
    profit_before_tax: Decimal,
    #[serde(default, deserialize_with = "cells::amount")]
    depreciation: Decimal,
    #[serde(default, deserialize_with = "cells::amount")]
    fines_penalties: Decimal,
    #[serde(default, deserialize_with = "cells::amount")]
    capital_allowances: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessRecord {
    pub company: String,
    pub input: BusinessInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyCit {
    pub company: String,
    pub input: BusinessInput,
    pub result: BusinessResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessRun {
    pub companies: Vec<CompanyCit>,
}

impl BusinessRun {
    pub fn total_tax(&self) -> Decimal {
        self.companies.iter().map(|c| c.result.total_tax).sum()
    }

    pub fn small_company_count(&self) -> usize {
        self.companies
            .iter()
            .filter(|c| c.result.is_small_business)
            .count()
    }
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<BusinessRecord, LoadError> {
    let input = BusinessInput {
        turnover: row.turnover,
        assets: row.assets,
        profit_before_tax: row.profit_before_tax,
        depreciation: row.depreciation,
        fines_penalties: row.fines_penalties,
        capital_allowances: row.capital_allowances,
    };

    input.validate().map_err(|source| LoadError::Input {
        row: row_number,
        source,
    })?;

    Ok(BusinessRecord {
        company: row.company,
        input,
    })
}

pub struct BusinessLoader;

impl BusinessLoader {
    /// Reads company rows, rejecting negative figures and zero turnover.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BusinessRecord>, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let records = reader
            .deserialize::<CsvRow>()
            .enumerate()
            .map(|(idx, result)| convert_row(result?, idx + 1))
            .collect::<Result<Vec<_>, _>>()?;

        info!(rows = records.len(), "company records parsed");
        Ok(records)
    }

    /// Runs CIT for every record. Fails on the first record the engine
    /// refuses, which can only happen for records that skipped `parse`.
    pub fn compute(
        calculator: &CitCalculator,
        records: &[BusinessRecord],
    ) -> Result<BusinessRun, LoadError> {
        let companies = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let result = calculator
                    .calculate(&record.input)
                    .map_err(|source| LoadError::Cit {
                        row: idx + 1,
                        source,
                    })?;
                Ok(CompanyCit {
                    company: record.company.clone(),
                    input: record.input.clone(),
                    result,
                })
            })
            .collect::<Result<Vec<_>, LoadError>>()?;

        Ok(BusinessRun { companies })
    }

    /// Saves one CIT calculation per company, labelled with the company name.
    pub async fn save<R: CalculationRepository + ?Sized>(
        repo: &R,
        owner_id: &str,
        run: &BusinessRun,
    ) -> Result<Vec<SavedCalculation>, LoadError> {
        let mut saved = Vec::with_capacity(run.companies.len());

        for (idx, company) in run.companies.iter().enumerate() {
            let calc = NewCalculation::cit(owner_id, &company.input, &company.result)
                .map_err(|source| LoadError::Record {
                    row: idx + 1,
                    source,
                })?
                .with_label(company.company.as_str());

            saved.push(repo.save_calculation(calc).await?);
        }

        debug!(count = saved.len(), owner_id, "company calculations saved");
        Ok(saved)
    }
}
