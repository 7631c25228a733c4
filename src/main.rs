//! mql-eval - execution-accuracy evaluation for generated MongoDB queries.

use mql_eval::cli::Cli;
use mql_eval::config::Config;
use mql_eval::db;
use mql_eval::error::{EvalError, Result};
use mql_eval::eval::{load_records, EvaluationReport, Evaluator, MismatchLog};
use mql_eval::logging;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    logging::init_stderr_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let format = cli.parse_report_format().map_err(EvalError::config)?;
    let config = resolve_config(&cli)?;

    // Setup failures abort before any record is evaluated
    let predictions = config.evaluation.predictions();
    let records = load_records(&predictions)?;

    let store = db::connect(&config.backend).await?;
    info!("Backend: {}", store.describe());
    if !config.backend.has_credentials() {
        warn!("Connection URI has no credentials; use a read-only role to guard against writes");
    }

    let log_path = config.evaluation.log();
    let mut log = MismatchLog::create(&log_path, config.evaluation.preview_chars())?;

    let evaluator = Evaluator::new(store.as_ref(), config.evaluation.jobs());
    let score = evaluator.run(&records, &mut log).await?;
    info!("Wrote {} entries to {}", log.entries(), log_path.display());

    let report = EvaluationReport::from(score);
    print!("{}", report.render(format)?);

    Ok(())
}

/// Resolves the final configuration with precedence:
/// 1. CLI arguments (highest)
/// 2. Config file
/// 3. Environment variables
/// 4. Built-in defaults
fn resolve_config(cli: &Cli) -> Result<Config> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());

    let mut config = Config::load_from_file(&config_path)?;
    config.merge(&cli.to_config());
    config.backend.apply_env_defaults();

    Ok(config)
}
