//! Interactive run of a small project survey.
//!
//! Run with: cargo run -p questionnaire-dialoguer --example project

use questionnaire::{RunOutcome, Survey};
use questionnaire_dialoguer::DialoguerBackend;

fn main() -> anyhow::Result<()> {
    let schema = concat!(env!("CARGO_MANIFEST_DIR"), "/examples/project.yaml");
    let survey = Survey::load(schema)?;

    match survey.run(&DialoguerBackend::new())? {
        RunOutcome::Completed { answers, target } => {
            println!("{} answers written to {target}", answers.len());
        }
        RunOutcome::Declined => println!("Nothing written."),
    }
    Ok(())
}
