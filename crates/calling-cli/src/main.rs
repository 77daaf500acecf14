mod builtins;
mod cli;

use std::process::ExitCode;

use calling_ai::{AiError, NamespaceError, Reply, ScriptedBackend, Session, SessionError};
use calling_common::ConfigError;
use calling_config::CallingConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Namespace(#[from] NamespaceError),
    #[error(transparent)]
    Backend(#[from] AiError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("stdin: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize transcript: {0}")]
    Json(#[from] serde_json::Error),
}

fn load_config(args: &cli::Args) -> Result<CallingConfig, ConfigError> {
    match args.config {
        Some(ref path) => calling_config::load_config_from(path),
        None => calling_config::load_config(),
    }
}

fn init_logging(args: &cli::Args, config: Option<&CallingConfig>) {
    let fallback = config
        .map(|c| c.logging.level.as_directive())
        .unwrap_or("info");
    let directive = args.log_level.as_deref().unwrap_or(fallback);

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .init();
}

fn print_reply(reply: Reply) {
    match reply {
        Reply::Message(content) => println!("{content}"),
        Reply::FunctionCall { function, value } => println!("function {function} -> {value}"),
    }
}

/// Apply the `--model` flag and re-validate, so an override gets the
/// same checks as the file it replaces.
fn apply_overrides(config: &mut CallingConfig, model: Option<&str>) -> Result<(), ConfigError> {
    if let Some(model) = model {
        config.session.model = model.to_string();
        calling_config::validation::validate(config)?;
    }
    Ok(())
}

async fn run(args: cli::Args, mut config: CallingConfig) -> Result<(), CliError> {
    apply_overrides(&mut config, args.model.as_deref())?;

    let backend = ScriptedBackend::from_file(&args.script)?;
    tracing::info!(
        script = %args.script.display(),
        responses = backend.remaining(),
        "replaying scripted model"
    );

    let mut session = Session::from_config(builtins::builtin_modules(), &config.session)?;
    tracing::info!(
        session = %session.id().short(),
        model = %config.session.model,
        functions = session.namespace().len(),
        "session ready"
    );

    let chained = !args.no_chain;
    if args.messages.is_empty() {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            print_reply(session.ask(&backend, line, chained).await?);
        }
    } else {
        for message in &args.messages {
            print_reply(session.ask(&backend, message.as_str(), chained).await?);
        }
    }

    if args.dump_transcript {
        println!("{}", serde_json::to_string_pretty(session.transcript())?);
    }

    tracing::debug!(
        turns = session.transcript().len(),
        responses = session.response_log().len(),
        "done"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    let loaded = load_config(&args);
    init_logging(&args, loaded.as_ref().ok());

    let config = match loaded {
        Ok(config) => config,
        Err(e) if args.config.is_some() => {
            tracing::error!("config load failed: {e}");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::warn!("config load failed, using defaults: {e}");
            CallingConfig::default()
        }
    };

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
