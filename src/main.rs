//! Patrol CLI entrypoint for Slack pull-request triage.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use patrol::{
    GhCliOracle, HttpSlackGateway, PatrolConfig, TriageEngine, TriageError, TriageOutcome,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

/// Log lines go to stderr so stdout stays parseable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("patrol=info")),
        )
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<(), TriageError> {
    let config = load_config()?;
    let request = config.triage_request()?;
    let token = config.resolve_slack_token()?;

    let gateway = HttpSlackGateway::for_workspace(&request.workspace_subdomain, token)?;
    let oracle = GhCliOracle::new();
    let engine = TriageEngine::new(&gateway, &oracle);
    let outcome = engine.run(&request).await?;

    write_summary(&outcome)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`TriageError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PatrolConfig, TriageError> {
    PatrolConfig::load().map_err(|error| TriageError::Configuration {
        message: error.to_string(),
    })
}

fn write_summary(outcome: &TriageOutcome) -> Result<(), TriageError> {
    let mut stdout = io::stdout().lock();
    let mut message = format!(
        "Scanned {} message(s) across {} channel(s); added {} reaction(s)",
        outcome.messages_scanned, outcome.channels_scanned, outcome.reactions_added
    );
    for skip in &outcome.skipped_references {
        message.push_str(&format!(
            "\nSkipped {} in {}: {}",
            skip.reference, skip.channel, skip.reason
        ));
    }

    writeln!(stdout, "{message}").map_err(|error| TriageError::Io {
        message: error.to_string(),
    })
}
