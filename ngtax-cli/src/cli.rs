use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use ngtax_core::formatting::parse_amount;
use ngtax_core::{CalculationKind, IncomeSource, NhfBasis};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Nigerian PAYE and company income tax calculator.
///
/// Amounts may be written the way they appear on a payslip or statement:
/// `1200000`, `1,200,000` and `₦1,200,000` are the same.
#[derive(Debug, Parser)]
#[command(name = "ngtax", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Configuration file. Defaults to $NGTAX_CONFIG, then ./ngtax.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend for saved calculations.
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Connection string for the backend (for SQLite a file path or `:memory:`).
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Whose calculations to save and list.
    #[arg(long, global = true)]
    pub owner: Option<String>,

    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Log filter, e.g. `debug` or `ngtax_core=trace`. RUST_LOG wins when set.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Treat negative amounts as zero instead of rejecting them.
    #[arg(long, global = true)]
    pub clamp: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Personal income tax on a monthly salary.
    Paye(PayeArgs),
    /// Company income tax and development levy.
    Cit(CitArgs),
    /// Compute every row of a payroll or company CSV file.
    Batch(BatchArgs),
    /// List saved calculations, newest first.
    History(HistoryArgs),
    /// Print a saved calculation.
    Show {
        id: i64,
    },
    /// Delete a saved calculation.
    Delete {
        id: i64,
    },
}

#[derive(Debug, Clone, Default, Args)]
#[command(allow_negative_numbers = true)]
#[command(group(ArgGroup::new("salary").required(true).args(["monthly_gross", "basic"])))]
pub struct PayeArgs {
    /// Monthly gross salary. Pension and NHF are charged on all of it.
    #[arg(long, value_parser = amount_arg, conflicts_with_all = ["basic", "housing", "transport", "other"])]
    pub monthly_gross: Option<Decimal>,

    /// Monthly basic salary.
    #[arg(long, value_parser = amount_arg)]
    pub basic: Option<Decimal>,

    /// Monthly housing allowance.
    #[arg(long, value_parser = amount_arg)]
    pub housing: Option<Decimal>,

    /// Monthly transport allowance.
    #[arg(long, value_parser = amount_arg)]
    pub transport: Option<Decimal>,

    /// Other monthly allowances. Not pensionable.
    #[arg(long, value_parser = amount_arg)]
    pub other: Option<Decimal>,

    /// Rent paid for the year.
    #[arg(long, value_parser = amount_arg)]
    pub rent: Option<Decimal>,

    /// Contribute 8% to a pension scheme.
    #[arg(long)]
    pub pension: bool,

    /// Contribute 2.5% to the National Housing Fund.
    #[arg(long)]
    pub nhf: bool,

    /// Pay the NHF contribution is charged on: `basic` or `gross`.
    #[arg(long, value_parser = nhf_basis_arg)]
    pub nhf_basis: Option<NhfBasis>,

    /// Another annual income stream, as NAME=AMOUNT. Repeatable.
    #[arg(long = "other-income", value_parser = income_source_arg)]
    pub other_income: Vec<IncomeSource>,

    #[command(flatten)]
    pub save: SaveArgs,
}

#[derive(Debug, Clone, Default, Args)]
#[command(allow_negative_numbers = true)]
pub struct CitArgs {
    /// Annual turnover.
    #[arg(long, value_parser = amount_arg, required_unless_present = "from_json")]
    pub turnover: Option<Decimal>,

    /// Total fixed assets.
    #[arg(long, value_parser = amount_arg)]
    pub assets: Option<Decimal>,

    /// Profit before tax.
    #[arg(long, value_parser = amount_arg)]
    pub profit: Option<Decimal>,

    #[arg(long, value_parser = amount_arg)]
    pub depreciation: Option<Decimal>,

    /// Fines and penalties charged to profit.
    #[arg(long, value_parser = amount_arg)]
    pub fines: Option<Decimal>,

    #[arg(long, value_parser = amount_arg)]
    pub capital_allowances: Option<Decimal>,

    /// Read the figures from a statement-extraction JSON file instead.
    #[arg(long, conflicts_with_all = ["turnover", "assets", "profit", "depreciation", "fines", "capital_allowances"])]
    pub from_json: Option<PathBuf>,

    #[command(flatten)]
    pub save: SaveArgs,
}

#[derive(Debug, Clone, Default, Args)]
pub struct SaveArgs {
    /// Store the calculation.
    #[arg(long)]
    pub save: bool,

    /// Name to store it under.
    #[arg(long, requires = "save")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BatchKind {
    Payroll,
    Business,
}

#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    #[arg(value_enum)]
    pub kind: BatchKind,

    pub csv: PathBuf,

    /// Store one calculation per row.
    #[arg(long)]
    pub save: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct HistoryArgs {
    #[arg(long, value_parser = kind_arg)]
    pub kind: Option<CalculationKind>,
}

fn amount_arg(s: &str) -> Result<Decimal, String> {
    parse_amount(s).map_err(|e| e.to_string())
}

fn nhf_basis_arg(s: &str) -> Result<NhfBasis, String> {
    NhfBasis::parse(s).ok_or_else(|| format!("expected `basic` or `gross`, got '{s}'"))
}

fn kind_arg(s: &str) -> Result<CalculationKind, String> {
    CalculationKind::parse(&s.to_ascii_lowercase())
        .ok_or_else(|| format!("expected `paye` or `cit`, got '{s}'"))
}

fn income_source_arg(s: &str) -> Result<IncomeSource, String> {
    let (name, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=AMOUNT, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("income source needs a name: '{s}'"));
    }
    Ok(IncomeSource::new(name, amount_arg(amount)?))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ngtax").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn paye_accepts_formatted_amounts() {
        let cli = parse(&["paye", "--monthly-gross", "₦500,000", "--rent", "1,200,000", "--pension"]);

        let Command::Paye(args) = cli.command else {
            panic!("expected paye");
        };
        assert_eq!(args.monthly_gross, Some(dec!(500000)));
        assert_eq!(args.rent, Some(dec!(1200000)));
        assert!(args.pension);
        assert!(!args.nhf);
    }

    #[test]
    fn paye_requires_a_salary() {
        assert!(Cli::try_parse_from(["ngtax", "paye", "--rent", "100"]).is_err());
    }

    #[test]
    fn paye_gross_and_components_conflict() {
        let result = Cli::try_parse_from([
            "ngtax",
            "paye",
            "--monthly-gross",
            "100",
            "--basic",
            "100",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn paye_collects_income_sources() {
        let cli = parse(&[
            "paye",
            "--basic",
            "300000",
            "--other-income",
            "rent=1,000,000",
            "--other-income",
            "dividends = 250000",
        ]);

        let Command::Paye(args) = cli.command else {
            panic!("expected paye");
        };
        assert_eq!(
            args.other_income,
            vec![
                IncomeSource::new("rent", dec!(1000000)),
                IncomeSource::new("dividends", dec!(250000)),
            ]
        );
    }

    #[test]
    fn paye_passes_negative_amounts_through() {
        let cli = parse(&["paye", "--monthly-gross", "-5"]);

        let Command::Paye(args) = cli.command else {
            panic!("expected paye");
        };
        assert_eq!(args.monthly_gross, Some(dec!(-5)));
    }

    #[test]
    fn label_requires_save() {
        assert!(Cli::try_parse_from(["ngtax", "paye", "--basic", "1", "--label", "x"]).is_err());
    }

    #[test]
    fn cit_requires_turnover_or_json() {
        assert!(Cli::try_parse_from(["ngtax", "cit", "--profit", "1"]).is_err());
        assert!(Cli::try_parse_from(["ngtax", "cit", "--from-json", "statement.json"]).is_ok());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["history", "--kind", "CIT", "--format", "json", "--db", ":memory:"]);

        assert_eq!(cli.global.format, Some(OutputFormat::Json));
        assert_eq!(cli.global.db.as_deref(), Some(":memory:"));
        let Command::History(args) = cli.command else {
            panic!("expected history");
        };
        assert_eq!(args.kind, Some(CalculationKind::Cit));
    }

    #[test]
    fn income_source_without_equals_is_rejected() {
        assert!(income_source_arg("salary").is_err());
        assert!(income_source_arg("=5").is_err());
    }

    #[test]
    fn nhf_basis_values() {
        assert_eq!(nhf_basis_arg("gross"), Ok(NhfBasis::TotalGross));
        assert!(nhf_basis_arg("housing").is_err());
    }
}
