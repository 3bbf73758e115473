use std::io::Write;

use clap::Parser;
use tracing::debug;

use ngtax_cli::app::App;
use ngtax_cli::cli::Cli;
use ngtax_cli::config::Settings;
use ngtax_cli::logging;

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(&cli.global)?;
    logging::init_logging(&settings.log_level, settings.log_file.as_deref())?;
    debug!(?settings, "settings resolved");

    let app = App::new(settings);
    let output = app.run(cli.command).await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}
