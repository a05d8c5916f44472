mod batch;
mod display;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use modgate_core::SignalBundle;
use modgate_engine::{ModerationConfig, ModerationEngine};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "modgate", version, about = "Fuse classifier signals into moderation verdicts")]
struct Cli {
    /// JSON config overriding default thresholds and tables.
    #[arg(long, global = true, env = "MODGATE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a single signal bundle.
    Evaluate {
        /// Bundle JSON file, or `-` for stdin.
        #[arg(long, short, default_value = "-")]
        input: String,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Evaluate a JSON array of signal bundles.
    Batch {
        /// Bundle array JSON file, or `-` for stdin.
        #[arg(long, short, default_value = "-")]
        input: String,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Refuse batches with more bundles than this.
        #[arg(long, default_value_t = batch::DEFAULT_MAX_BATCH)]
        max_batch: usize,
    },
    /// Print the effective configuration.
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Card,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("modgate v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Evaluate { input, format } => {
            let engine = ModerationEngine::new(config)?;
            let bundle: SignalBundle = serde_json::from_str(&read_input(&input)?)
                .context("parsing signal bundle")?;
            let verdict = engine.evaluate(&bundle)?;
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&verdict)?),
                Format::Card => display::print_verdict_card(&verdict),
            }
        }
        Command::Batch {
            input,
            format,
            max_batch,
        } => {
            let engine = Arc::new(ModerationEngine::new(config)?);
            let entries: Vec<serde_json::Value> = serde_json::from_str(&read_input(&input)?)
                .context("parsing signal bundle array")?;
            let report = batch::run_batch(engine, entries, max_batch).await?;
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                Format::Card => {
                    for item in &report.results {
                        println!("# bundle {}", item.index);
                        match (&item.verdict, &item.error) {
                            (Some(v), _) => display::print_verdict_card(v),
                            (None, Some(e)) => println!("error: {e}\n"),
                            (None, None) => {}
                        }
                    }
                    println!(
                        "{} of {} processed ({} approved, {} review, {} rejected) in {} ms",
                        report.processed,
                        report.total,
                        report.approved,
                        report.review_required,
                        report.rejected,
                        report.elapsed_ms
                    );
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ModerationConfig> {
    match path {
        Some(p) => ModerationConfig::from_path(p)
            .with_context(|| format!("loading config from {}", p.display())),
        None => Ok(ModerationConfig::default()),
    }
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {input}"))
    }
}
