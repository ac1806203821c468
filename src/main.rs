use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use lectometro::cli::{Cli, Commands, ConfigAction};
use lectometro::config::Config;
use lectometro::error::LectometroError;
use lectometro::evaluation::{EvaluationRequest, Evaluator};
use lectometro::text::{CanonicalTextRegistry, DirTextSource, Form};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    match cli.command {
        Commands::Serve { bind } => {
            let mut config = load_config(cli.config.as_deref(), cli.texts_dir.as_deref())?;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            config.validate()?;

            let evaluator = build_evaluator(&config);
            for (form, err) in evaluator.registry().preload() {
                tracing::error!(form = %form, error = %err, "Canonical text unavailable; FL requests for this form will fail");
            }
            lectometro::server::serve(&config, evaluator).await?;
        }
        Commands::Evaluate {
            file,
            task,
            form,
            subject,
            pretty,
        } => {
            let config = load_config(cli.config.as_deref(), cli.texts_dir.as_deref())?;
            config.validate()?;
            let evaluator = build_evaluator(&config);

            match evaluate_file(&evaluator, &file, &subject, &task, &form) {
                Ok(json) if pretty => println!("{}", serde_json::to_string_pretty(&json)?),
                Ok(json) => println!("{}", json),
                Err(e) => {
                    println!("{}", error_json(&e));
                    std::process::exit(1);
                }
            }
        }
        Commands::Check => {
            let config = load_config(cli.config.as_deref(), cli.texts_dir.as_deref())?;
            let evaluator = build_evaluator(&config);
            let registry = evaluator.registry();
            let failures = registry.preload();

            println!("Canonical texts in {}:", config.texts.dir.display());
            for form in Form::ALL {
                match registry.word_count(form) {
                    Ok(count) => println!("  [ok]      {} ({} words)", form.resource_name(), count),
                    Err(e) => println!("  [missing] {} ({})", form.resource_name(), e),
                }
            }
            if !failures.is_empty() {
                std::process::exit(1);
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Dump => {
                let config = load_config(cli.config.as_deref(), cli.texts_dir.as_deref())?;
                print!("{}", config.to_toml()?);
            }
            ConfigAction::Path => {
                let path = cli.config.unwrap_or_else(Config::default_path);
                println!("{}", path.display());
            }
        },
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "lectometro",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Log to stderr so `evaluate` output on stdout stays machine-readable.
///
/// `RUST_LOG` wins when set; otherwise `-q` and `-v` pick the level.
fn init_tracing(quiet: bool, verbose: u8) {
    let default_level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config), which must exist
/// 2. Default config path (~/.config/lectometro/config.toml), if present
/// 3. Built-in defaults
///
/// Environment variable overrides apply on top, then `--texts-dir`.
fn load_config(custom_path: Option<&Path>, texts_dir: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        let default_path = Config::default_path();
        Config::load_or_default(&default_path)
            .with_context(|| format!("Failed to load {}", default_path.display()))?
    };

    let mut config = config.with_env_overrides();
    if let Some(dir) = texts_dir {
        config.texts.dir = dir.to_path_buf();
    }
    Ok(config)
}

fn build_evaluator(config: &Config) -> Arc<Evaluator> {
    let registry = CanonicalTextRegistry::new(DirTextSource::new(&config.texts.dir));
    Arc::new(Evaluator::from_config(config, Arc::new(registry)))
}

fn evaluate_file(
    evaluator: &Evaluator,
    file: &Path,
    subject: &str,
    task: &str,
    form: &str,
) -> lectometro::Result<serde_json::Value> {
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    // Validate the cheap fields before touching the filesystem.
    EvaluationRequest::parse(subject, task, form, &filename, Vec::new())?;

    let audio = std::fs::read(file)?;
    let request = EvaluationRequest::parse(subject, task, form, &filename, audio)?;
    let result = evaluator.evaluate(&request)?;
    serde_json::to_value(&result).map_err(|e| LectometroError::Other(e.to_string()))
}

/// Same `{error, detail?}` shape the HTTP service returns.
fn error_json(err: &LectometroError) -> serde_json::Value {
    match err.detail() {
        Some(detail) => serde_json::json!({ "error": "Could not decode audio", "detail": detail }),
        None => serde_json::json!({ "error": err.to_string() }),
    }
}
