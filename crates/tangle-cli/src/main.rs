#![forbid(unsafe_code)]

mod cmd;
mod metrics_log;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use metrics_log::MetricsLog;
use output::{CliError, OutputMode};
use std::env;
use std::path::{Path, PathBuf};
use tangle_core::ErrorCode;
use tangle_core::config::{self, EffectiveConfig};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tangle: SCC condensation and critical-path analysis for dependency graphs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Alias for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Delete the metrics log before writing.
    #[arg(long, global = true)]
    fresh: bool,

    /// Metrics log path (default: `[metrics] path` from config).
    #[arg(long, global = true, value_name = "PATH")]
    metrics: Option<PathBuf>,

    /// Do not append phase records to the metrics log.
    #[arg(long, global = true)]
    no_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Analysis",
        about = "Analyze one graph descriptor",
        long_about = "Condense a graph by SCC, order the components and report shortest and critical paths.",
        after_help = "EXAMPLES:\n    # Analyze one dataset\n    tangle run data/tasks.json\n\n    # Emit machine-readable output\n    tangle run data/tasks.json --format json"
    )]
    Run(cmd::run::RunArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Analyze every dataset in a directory",
        long_about = "Analyze every *.json descriptor in a directory, in file name order. Failed datasets are reported and skipped.",
        after_help = "EXAMPLES:\n    # Analyze ./data with a fresh metrics log\n    tangle all --fresh\n\n    # Analyze another directory without logging\n    tangle all --dir fixtures --no-log"
    )]
    All(cmd::all::AllArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    tangle completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TANGLE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "tangle=debug,info"
        } else {
            "tangle=info,warn"
        })
    });

    let format = env::var("TANGLE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn open_metrics_log(
    cli: &Cli,
    config: &EffectiveConfig,
    project_root: &Path,
) -> anyhow::Result<Option<MetricsLog>> {
    if cli.no_log || (!config.project.metrics.enabled && cli.metrics.is_none()) {
        debug!("metrics log disabled");
        return Ok(None);
    }
    let path = cli
        .metrics
        .clone()
        .unwrap_or_else(|| config.metrics_path(project_root));
    MetricsLog::open(&path, cli.fresh).map(Some)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let project_root = env::current_dir()?;
    let json_requested = cli.json || cli.format.is_some_and(OutputMode::is_json);
    let config = match config::resolve_config(&project_root, cli.json) {
        Ok(config) => config,
        Err(err) => {
            let mode = if json_requested { OutputMode::Json } else { OutputMode::Text };
            output::render_error(
                mode,
                &CliError::with_code(format!("{err:#}"), ErrorCode::ConfigParseError),
            )?;
            return Err(err);
        }
    };
    let output = output::resolve_output_mode(cli.format, &config);
    let log = open_metrics_log(&cli, &config, &project_root)?;

    let result = match &cli.command {
        Commands::Run(args) => cmd::run::run_dataset(args, output, log.as_ref()),
        Commands::All(args) => {
            let default_dir = config.data_dir(&project_root);
            cmd::all::run_all(args, &default_dir, output, log.as_ref())
        }
        Commands::Completions(_) => Ok(()),
    };

    if let Some(log) = &log {
        info!(path = %log.path().display(), "metrics log updated");
    }
    result
}
