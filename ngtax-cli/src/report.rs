//! Plain-text renderings of results for the terminal.
//!
//! Each report is a small borrowed view implementing [`Display`]; JSON
//! output bypasses this module and serializes the models directly.

use std::fmt::{self, Display, Formatter};

use ngtax_core::formatting::{format_naira, format_percent};
use ngtax_core::{
    BusinessInput, BusinessResult, CalculationKind, RecordError, SavedCalculation, TaxInput,
    TaxResult,
};
use ngtax_data::{BusinessRun, PayrollRun};
use rust_decimal::Decimal;

const LABEL_WIDTH: usize = 28;
const AMOUNT_WIDTH: usize = 20;

fn line(
    f: &mut Formatter<'_>,
    label: &str,
    value: impl Display,
) -> fmt::Result {
    writeln!(f, "  {label:<LABEL_WIDTH$}{value:>AMOUNT_WIDTH$}")
}

fn rule(f: &mut Formatter<'_>) -> fmt::Result {
    writeln!(f, "  {}", "-".repeat(LABEL_WIDTH + AMOUNT_WIDTH))
}

fn rate(percent: Decimal) -> String {
    format!("{}%", percent.normalize())
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

// ---------------------------------------------------------------------------
// PAYE
// ---------------------------------------------------------------------------

pub struct PayeReport<'a> {
    pub input: &'a TaxInput,
    pub result: &'a TaxResult,
}

impl Display for PayeReport<'_> {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        let (input, r) = (self.input, self.result);

        writeln!(f, "PAYE")?;
        line(f, "Monthly gross", format_naira(input.monthly_gross))?;
        if !input.additional_annual_income.is_zero() {
            line(f, "Other annual income", format_naira(input.additional_annual_income))?;
        }
        line(f, "Annual gross income", format_naira(r.annual_gross))?;
        writeln!(f)?;

        writeln!(f, "Deductions")?;
        line(f, "Pension", format_naira(r.pension))?;
        line(f, "National Housing Fund", format_naira(r.nhf))?;
        line(f, "Rent relief", format_naira(r.rent_relief))?;
        rule(f)?;
        line(f, "Total deductions", format_naira(r.total_deductions))?;
        line(f, "Taxable income", format_naira(r.taxable_income))?;
        writeln!(f)?;

        if !r.breakdown.is_empty() {
            writeln!(f, "Tax by band")?;
            for band in &r.breakdown {
                writeln!(
                    f,
                    "  {:<20}{:>6}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}",
                    band.label,
                    rate(band.rate),
                    format_naira(band.taxable_amount),
                    format_naira(band.tax),
                )?;
            }
            writeln!(f)?;
        }

        line(f, "Annual tax", format_naira(r.net_tax))?;
        line(f, "Monthly tax", format_naira(r.monthly_tax))?;
        line(f, "Net annual income", format_naira(r.net_annual))?;
        line(f, "Net monthly income", format_naira(r.net_monthly))?;
        line(f, "Effective rate", format_percent(r.effective_rate))
    }
}

// ---------------------------------------------------------------------------
// CIT
// ---------------------------------------------------------------------------

pub struct CitReport<'a> {
    pub input: &'a BusinessInput,
    pub result: &'a BusinessResult,
}

impl Display for CitReport<'_> {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        let (input, r) = (self.input, self.result);

        writeln!(f, "Company income tax")?;
        line(f, "Turnover", format_naira(input.turnover))?;
        line(f, "Fixed assets", format_naira(input.assets))?;
        line(
            f,
            "Classification",
            if r.is_small_business { "small" } else { "standard" },
        )?;
        writeln!(f)?;

        if !r.is_small_business {
            line(f, "Profit before tax", format_naira(input.profit_before_tax))?;
            line(f, "Add: depreciation", format_naira(input.depreciation))?;
            line(f, "Add: fines and penalties", format_naira(input.fines_penalties))?;
            line(f, "Less: capital allowances", format_naira(input.capital_allowances))?;
            rule(f)?;
            line(f, "Assessable profit", format_naira(r.assessable_profit))?;
            writeln!(f)?;
            line(f, &format!("CIT ({})", rate(r.cit_rate)), format_naira(r.cit))?;
            line(
                f,
                &format!("Development levy ({})", rate(r.development_levy_rate)),
                format_naira(r.development_levy),
            )?;
        }

        line(f, "Total tax", format_naira(r.total_tax))?;
        writeln!(f)?;
        writeln!(f, "{}", r.note)
    }
}

// ---------------------------------------------------------------------------
// Saved calculations
// ---------------------------------------------------------------------------

pub struct HistoryReport<'a>(pub &'a [SavedCalculation]);

impl Display for HistoryReport<'_> {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No saved calculations.");
        }

        writeln!(
            f,
            "{:>6}  {:<5} {:<17} {:<24}{:>AMOUNT_WIDTH$}",
            "ID", "KIND", "CREATED", "LABEL", "TAX"
        )?;
        for calc in self.0 {
            let tax = calc
                .headline_tax()
                .map(format_naira)
                .unwrap_or_else(|| "?".to_string());
            writeln!(
                f,
                "{:>6}  {:<5} {:<17} {:<24}{:>AMOUNT_WIDTH$}",
                calc.id,
                calc.kind.as_str(),
                calc.created_at.format("%Y-%m-%d %H:%M").to_string(),
                calc.label.as_deref().unwrap_or("-"),
                tax,
            )?;
        }
        Ok(())
    }
}

/// Header plus the full report of one saved calculation.
pub fn saved_calculation(calc: &SavedCalculation) -> Result<String, RecordError> {
    let body = match calc.kind {
        CalculationKind::Paye => {
            let (input, result) = calc.paye()?;
            PayeReport {
                input: &input,
                result: &result,
            }
            .to_string()
        }
        CalculationKind::Cit => {
            let (input, result) = calc.cit()?;
            CitReport {
                input: &input,
                result: &result,
            }
            .to_string()
        }
    };

    let label = calc
        .label
        .as_deref()
        .map(|l| format!(" \"{l}\""))
        .unwrap_or_default();
    Ok(format!(
        "#{}{label}, saved {} by {}\n\n{body}",
        calc.id,
        calc.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        calc.owner_id,
    ))
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

pub struct PayrollReport<'a>(pub &'a PayrollRun);

impl Display for PayrollReport<'_> {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        let run = self.0;

        writeln!(
            f,
            "{:<12}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>9}",
            "EMPLOYEE", "ANNUAL GROSS", "ANNUAL TAX", "MONTHLY TAX", "RATE"
        )?;
        for employee in &run.employees {
            let r = &employee.result;
            writeln!(
                f,
                "{:<12}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>9}",
                employee.employee_id,
                format_naira(r.annual_gross),
                format_naira(r.net_tax),
                format_naira(r.monthly_tax),
                format_percent(r.effective_rate),
            )?;
        }
        writeln!(
            f,
            "{:<12}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}",
            format!("{} total", run.employees.len()),
            format_naira(run.total_annual_gross()),
            format_naira(run.total_net_tax()),
            format_naira(run.total_monthly_tax()),
        )
    }
}

pub struct BusinessReport<'a>(pub &'a BusinessRun);

impl Display for BusinessReport<'_> {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        let run = self.0;

        writeln!(
            f,
            "{:<24}{:>7}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}",
            "COMPANY", "SMALL", "ASSESSABLE PROFIT", "TOTAL TAX"
        )?;
        for company in &run.companies {
            let r = &company.result;
            writeln!(
                f,
                "{:<24}{:>7}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}",
                company.company,
                yes_no(r.is_small_business),
                format_naira(r.assessable_profit),
                format_naira(r.total_tax),
            )?;
        }
        writeln!(
            f,
            "{:<24}{:>7}{:>AMOUNT_WIDTH$}{:>AMOUNT_WIDTH$}",
            format!("{} total", run.companies.len()),
            run.small_company_count(),
            "",
            format_naira(run.total_tax()),
        )
    }
}
