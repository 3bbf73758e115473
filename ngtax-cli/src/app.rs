//! Command handlers behind the `ngtax` binary.
//!
//! Every handler returns the text to print, so the binary only writes it
//! to stdout and the handlers can be driven directly in tests. The store is
//! opened on first use; `paye` and `cit` without `--save` never touch it.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use ngtax_core::calculations::{CitCalculator, PayeCalculator};
use ngtax_core::db::RepositoryRegistry;
use ngtax_core::{
    BusinessInput, CalculationRepository, IncomeSource, NewCalculation, RepositoryError,
    SalaryBreakdown, SavedCalculation, TaxInput, total_additional_income,
};
use ngtax_data::{BusinessLoader, BusinessRun, PayrollLoader, PayrollRun};
use ngtax_db_sqlite::SqliteRepositoryFactory;
use serde::Serialize;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::cli::{BatchArgs, BatchKind, CitArgs, Command, HistoryArgs, OutputFormat, PayeArgs};
use crate::config::Settings;
use crate::report::{
    BusinessReport, CitReport, HistoryReport, PayeReport, PayrollReport, saved_calculation,
};

/// Every storage backend compiled into the binary.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

pub struct App {
    settings: Settings,
    registry: RepositoryRegistry,
    repo: OnceCell<Box<dyn CalculationRepository>>,
    paye: PayeCalculator,
    cit: CitCalculator,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            registry: build_registry(),
            repo: OnceCell::new(),
            paye: PayeCalculator::statutory(),
            cit: CitCalculator::statutory(),
        }
    }

    /// An app bound to an already open store; `settings.db` is ignored.
    pub fn with_repository(
        settings: Settings,
        repo: Box<dyn CalculationRepository>,
    ) -> Self {
        Self {
            repo: OnceCell::from(repo),
            ..Self::new(settings)
        }
    }

    async fn repo(&self) -> Result<&dyn CalculationRepository> {
        let repo = self
            .repo
            .get_or_try_init(|| async {
                debug!(backend = %self.settings.db.backend, "opening calculation store");
                self.registry.create(&self.settings.db).await
            })
            .await
            .with_context(|| {
                format!(
                    "cannot open {} store '{}'",
                    self.settings.db.backend, self.settings.db.connection_string
                )
            })?;
        Ok(&**repo)
    }

    pub async fn run(
        &self,
        command: Command,
    ) -> Result<String> {
        match command {
            Command::Paye(args) => self.paye(args).await,
            Command::Cit(args) => self.cit(args).await,
            Command::Batch(args) => self.batch(args).await,
            Command::History(args) => self.history(args).await,
            Command::Show { id } => self.show(id).await,
            Command::Delete { id } => self.delete(id).await,
        }
    }

    fn render<T: Serialize>(
        &self,
        json: &T,
        text: impl FnOnce() -> String,
    ) -> Result<String> {
        match self.settings.format {
            OutputFormat::Text => Ok(text()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(json)?),
        }
    }

    // -----------------------------------------------------------------------
    // Single calculations
    // -----------------------------------------------------------------------

    /// Checks every component and income source on its own before they
    /// are summed, so a negative figure cannot be offset by a larger one.
    /// With `clamp` set, negatives become zero instead; the ceiling still
    /// applies.
    fn paye_input(
        &self,
        args: &PayeArgs,
    ) -> Result<TaxInput> {
        let clamp = self.settings.clamp;

        let base = match args.monthly_gross {
            Some(gross) => TaxInput::basic(gross),
            None => {
                let mut salary = SalaryBreakdown {
                    basic: args.basic.unwrap_or_default(),
                    housing: args.housing.unwrap_or_default(),
                    transport: args.transport.unwrap_or_default(),
                    other_allowances: args.other.unwrap_or_default(),
                };
                if clamp {
                    salary = salary.clamped();
                }
                salary.validate()?;
                salary.to_tax_input(args.nhf_basis.unwrap_or(self.settings.nhf_basis))
            }
        };

        let sources: Vec<IncomeSource> = if clamp {
            args.other_income.iter().map(IncomeSource::clamped).collect()
        } else {
            args.other_income.clone()
        };
        for source in &sources {
            source.validate()?;
        }

        let mut input = TaxInput {
            annual_rent: args.rent.unwrap_or_default(),
            has_pension: args.pension,
            has_nhf: args.nhf,
            additional_annual_income: total_additional_income(&sources),
            ..base
        };

        if clamp {
            input = input.clamped();
        }
        input.validate()?;
        Ok(input)
    }

    async fn paye(
        &self,
        args: PayeArgs,
    ) -> Result<String> {
        let input = self.paye_input(&args)?;
        let result = self.paye.calculate(&input);

        let saved = if args.save.save {
            let mut calc = NewCalculation::paye(&self.settings.owner, &input, &result)?;
            calc.label = args.save.label;
            Some(self.save(calc).await?)
        } else {
            None
        };

        self.render(
            &json!({ "input": input, "result": result, "saved": saved }),
            || {
                let mut text = PayeReport {
                    input: &input,
                    result: &result,
                }
                .to_string();
                append_saved(&mut text, saved.as_ref());
                text
            },
        )
    }

    fn cit_input(
        &self,
        args: &CitArgs,
    ) -> Result<BusinessInput> {
        let input = match &args.from_json {
            Some(path) => read_extracted_statement(path)?,
            None => BusinessInput {
                turnover: args.turnover.unwrap_or_default(),
                assets: args.assets.unwrap_or_default(),
                profit_before_tax: args.profit.unwrap_or_default(),
                depreciation: args.depreciation.unwrap_or_default(),
                fines_penalties: args.fines.unwrap_or_default(),
                capital_allowances: args.capital_allowances.unwrap_or_default(),
            },
        };

        let input = if self.settings.clamp {
            input.clamped()
        } else {
            input
        };
        input.validate()?;
        Ok(input)
    }

    async fn cit(
        &self,
        args: CitArgs,
    ) -> Result<String> {
        let input = self.cit_input(&args)?;
        let result = self.cit.calculate(&input)?;

        let saved = if args.save.save {
            let mut calc = NewCalculation::cit(&self.settings.owner, &input, &result)?;
            calc.label = args.save.label;
            Some(self.save(calc).await?)
        } else {
            None
        };

        self.render(
            &json!({ "input": input, "result": result, "saved": saved }),
            || {
                let mut text = CitReport {
                    input: &input,
                    result: &result,
                }
                .to_string();
                append_saved(&mut text, saved.as_ref());
                text
            },
        )
    }

    async fn save(
        &self,
        calc: NewCalculation,
    ) -> Result<SavedCalculation> {
        let saved = self.repo().await?.save_calculation(calc).await?;
        info!(id = saved.id, kind = %saved.kind, "calculation saved");
        Ok(saved)
    }

    // -----------------------------------------------------------------------
    // Batches
    // -----------------------------------------------------------------------

    async fn batch(
        &self,
        args: BatchArgs,
    ) -> Result<String> {
        let file = File::open(&args.csv)
            .with_context(|| format!("cannot open '{}'", args.csv.display()))?;
        let context = || format!("in '{}'", args.csv.display());

        match args.kind {
            BatchKind::Payroll => {
                let records = PayrollLoader::parse(file).with_context(context)?;
                let run = PayrollLoader::compute(&self.paye, &records);
                let saved = if args.save {
                    PayrollLoader::save(self.repo().await?, &self.settings.owner, &run).await?
                } else {
                    Vec::new()
                };
                self.render_payroll(&run, &saved)
            }
            BatchKind::Business => {
                let records = BusinessLoader::parse(file).with_context(context)?;
                let run = BusinessLoader::compute(&self.cit, &records).with_context(context)?;
                let saved = if args.save {
                    BusinessLoader::save(self.repo().await?, &self.settings.owner, &run).await?
                } else {
                    Vec::new()
                };
                self.render_business(&run, &saved)
            }
        }
    }

    fn render_payroll(
        &self,
        run: &PayrollRun,
        saved: &[SavedCalculation],
    ) -> Result<String> {
        let employees: Vec<_> = run
            .employees
            .iter()
            .map(|e| json!({ "employee_id": e.employee_id, "input": e.input, "result": e.result }))
            .collect();
        let json = json!({
            "employees": employees,
            "total_annual_gross": run.total_annual_gross(),
            "total_net_tax": run.total_net_tax(),
            "total_monthly_tax": run.total_monthly_tax(),
            "total_net_annual": run.total_net_annual(),
            "saved_ids": saved.iter().map(|s| s.id).collect::<Vec<_>>(),
        });

        self.render(&json, || {
            let mut text = PayrollReport(run).to_string();
            append_saved_count(&mut text, saved.len());
            text
        })
    }

    fn render_business(
        &self,
        run: &BusinessRun,
        saved: &[SavedCalculation],
    ) -> Result<String> {
        let companies: Vec<_> = run
            .companies
            .iter()
            .map(|c| json!({ "company": c.company, "input": c.input, "result": c.result }))
            .collect();
        let json = json!({
            "companies": companies,
            "small_companies": run.small_company_count(),
            "total_tax": run.total_tax(),
            "saved_ids": saved.iter().map(|s| s.id).collect::<Vec<_>>(),
        });

        self.render(&json, || {
            let mut text = BusinessReport(run).to_string();
            append_saved_count(&mut text, saved.len());
            text
        })
    }

    // -----------------------------------------------------------------------
    // Saved calculations
    // -----------------------------------------------------------------------

    async fn history(
        &self,
        args: HistoryArgs,
    ) -> Result<String> {
        let calcs = self
            .repo()
            .await?
            .list_calculations(&self.settings.owner, args.kind)
            .await?;

        self.render(&calcs, || HistoryReport(&calcs).to_string())
    }

    async fn show(
        &self,
        id: i64,
    ) -> Result<String> {
        let calc = match self.repo().await?.get_calculation(id).await {
            Ok(calc) => calc,
            Err(RepositoryError::NotFound) => bail!("no saved calculation with id {id}"),
            Err(e) => return Err(e.into()),
        };

        match self.settings.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&calc)?),
            OutputFormat::Text => Ok(saved_calculation(&calc)?),
        }
    }

    async fn delete(
        &self,
        id: i64,
    ) -> Result<String> {
        match self.repo().await?.delete_calculation(id).await {
            Ok(()) => {
                info!(id, "calculation deleted");
                self.render(&json!({ "deleted": id }), || format!("Deleted #{id}.\n"))
            }
            Err(RepositoryError::NotFound) => bail!("no saved calculation with id {id}"),
            Err(e) => Err(e.into()),
        }
    }
}

fn read_extracted_statement(path: &Path) -> Result<BusinessInput> {
    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read '{}'", path.display()))?;
    BusinessInput::from_extracted_json(&payload)
        .with_context(|| format!("'{}' is not a valid statement extraction", path.display()))
}

fn append_saved(
    text: &mut String,
    saved: Option<&SavedCalculation>,
) {
    if let Some(saved) = saved {
        text.push_str(&format!("\nSaved as #{}.\n", saved.id));
    }
}

fn append_saved_count(
    text: &mut String,
    count: usize,
) {
    if count > 0 {
        text.push_str(&format!("\nSaved {count} calculations.\n"));
    }
}
