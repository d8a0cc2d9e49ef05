use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use padel_bi::config::{AppConfig, ConfigSource};
use padel_bi::pipeline::{rebuild_report, run_enrichment, RunOptions};
use padel_bi::storage::StorageConfig;

#[derive(Parser)]
#[command(name = "padel-bi")]
#[command(about = "Enrich padel tournament and match data with time dimensions for BI analysis")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich tournaments and matches, then write the analysis report
    Enrich {
        /// Input tournaments JSONL (default: <data-dir>/raw/tournaments.jsonl)
        #[arg(long)]
        tournaments: Option<PathBuf>,

        /// Input match results JSONL (default: <data-dir>/raw/match_results.jsonl)
        #[arg(long)]
        matches: Option<PathBuf>,

        /// Output directory root (default: <data-dir>)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Fixed trend baseline date (YYYY-MM-DD) instead of the corpus minimum
        #[arg(long)]
        baseline: Option<String>,
    },

    /// Rebuild the report from already enriched tables
    Report,

    /// Print the configured season phase table
    Phases,

    /// Validate the configuration file
    CheckConfig,
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration errors are fatal before any record is touched
    let (config, source) = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Invalid configuration in {:?}", cli.config))?;
    let phases = config.phase_table()?;

    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    init_tracing(&log_level, cli.json_logs);

    tracing::info!("Starting padel-bi v{}", env!("CARGO_PKG_VERSION"));
    match source {
        ConfigSource::File => tracing::info!("Loaded config from {:?}", cli.config),
        ConfigSource::Defaults => {
            tracing::info!("No config file at {:?}, using defaults", cli.config)
        }
    }

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
    let storage = StorageConfig::new(data_dir);

    match cli.command {
        Commands::Enrich {
            tournaments,
            matches,
            output_dir,
            baseline,
        } => {
            let mut options = RunOptions::for_data_dir(&storage);
            if let Some(path) = tournaments {
                options.tournaments_path = path;
            }
            if let Some(path) = matches {
                options.matches_path = path;
            }
            if let Some(dir) = output_dir {
                options.output = StorageConfig::new(dir);
            }
            if let Some(s) = baseline {
                let date = NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .with_context(|| format!("Invalid --baseline date (expected YYYY-MM-DD): {}", s))?;
                options.baseline = Some(date);
            }

            let result = run_enrichment(&options, &phases).context("Enrichment run failed")?;

            for error in &result.diagnostics.errors {
                eprintln!("  skipped {}", error);
            }

            let coverage = &result.report.coverage;
            println!("\n=== Time Dimension Enrichment ===");
            println!("Tournaments enriched: {}", coverage.tournaments_enriched);
            println!("Matches written:      {}", coverage.matches_total);
            println!("Skipped records:      {}", coverage.diagnostics.skipped);
            println!("Warnings:             {}", coverage.diagnostics.warnings);
            println!(
                "Unresolved matches:   {}",
                coverage.diagnostics.unresolved_references
            );
            println!("\nOutputs in {:?}", options.output.derived_dir());
        }

        Commands::Report => {
            let report = rebuild_report(&storage).context("Failed to rebuild report")?;
            print!("{}", report.render_text());
        }

        Commands::Phases => {
            for line in phases.describe() {
                println!("{}", line);
            }
        }

        Commands::CheckConfig => {
            println!("Configuration OK");
            println!("  data_dir:  {:?}", config.data_dir);
            println!("  log_level: {}", config.log_level);
            for line in phases.describe() {
                println!("  {}", line);
            }
        }
    }

    Ok(())
}
