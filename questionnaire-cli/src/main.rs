mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use questionnaire::{RunOutcome, Survey, load_document};
use questionnaire_dialoguer::DialoguerBackend;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "survey failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut document = load_document(&cli.schema)?;
    cli.apply(&mut document);

    let survey = Survey::new(document, &cli.schema)
        .with_context(|| format!("failed to prepare survey '{}'", cli.schema.display()))?;

    match survey.run(&DialoguerBackend::new())? {
        RunOutcome::Completed { answers, target } => {
            info!(answers = answers.len(), %target, "survey completed");
        }
        RunOutcome::Declined => info!("survey declined, nothing written"),
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
