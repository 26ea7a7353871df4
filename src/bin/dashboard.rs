//! Obesity Dashboard CLI
//!
//! Command-line dashboard for the obesity data API:
//! - Render the table, statistics and charts (terminal + HTML report)
//! - Ask for one column's statistics
//! - Check server status
//! - Generate a default config file

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use obesity_dash::config::Config;
use obesity_dash::dashboard::{self, ApiClient, StatisticsReply};
use obesity_dash::dataset::Column;
use obesity_dash::logging;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "obesity-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Dashboard for the obesity data API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL (default: from config, http://localhost:8000)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Config file (default: searched in the usual locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the dataset and render the dashboard
    Render {
        /// Column to show statistics for (Height, Age, Weight)
        #[arg(short, long)]
        column: Option<Column>,
        /// HTML report path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Rows of the table printed to the terminal
        #[arg(long)]
        max_rows: Option<usize>,
    },

    /// Show statistics for one column
    Stats {
        /// Column name, validated by the server
        column: String,
    },

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A config file that exists but does not parse is an error, not a fallback
    let (mut config, source) = match &cli.config {
        Some(path) => (Config::load_with_env(path)?, Some(path.clone())),
        None => Config::load_default()?,
    };
    if let Some(url) = cli.api_url.clone() {
        config.dashboard.api_url = url;
    }
    if let Some(secs) = cli.timeout_secs {
        config.dashboard.timeout_secs = secs;
    }

    logging::init(&config.logging).context("failed to initialize logging")?;
    match &source {
        Some(path) => tracing::debug!("Loaded config from {:?}", path),
        None => tracing::debug!("Using default config with environment overrides"),
    }

    let settings = &config.dashboard;
    let client = ApiClient::new(&settings.api_url, Duration::from_secs(settings.timeout_secs))?;

    match cli.command {
        Commands::Render {
            column,
            output,
            max_rows,
        } => {
            let dashboard = match dashboard::build(&client, column).await {
                Ok(dashboard) => dashboard,
                Err(e) => {
                    tracing::error!(error = %e, "Dashboard halted");
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            let max_rows = max_rows.unwrap_or(settings.max_rows);
            print!("{}", dashboard::render_text(&dashboard, max_rows));

            let path = output.unwrap_or_else(|| settings.output.clone());
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, dashboard::render_html(&dashboard, Utc::now()))
                .with_context(|| format!("cannot write report to {}", path.display()))?;

            println!();
            println!("Report written to {:?}", path);
        }

        Commands::Stats { column } => match client.statistics(&column).await {
            Ok(StatisticsReply::Summary(summary)) => {
                println!("Statistics for {}:", column);
                println!("  Mean:               {:.2}", summary.mean);
                println!("  Standard Deviation: {:.2}", summary.std);
                println!("  Median:             {:.2}", summary.median);
            }
            Ok(StatisticsReply::Error(message)) => {
                eprintln!("Error: {}", message);
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("Failed to fetch statistics: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Status => match client.ping().await {
            Ok(root) => {
                println!("Obesity Dashboard v{}", env!("CARGO_PKG_VERSION"));
                println!();
                println!("API: {} ({})", client.base_url(), root.message);

                match client.health().await {
                    Ok(health) => {
                        println!("Status: {}", health.status);
                        println!();
                        println!("Dataset:");
                        println!("  Rows:         {}", health.rows);
                        println!("  Dropped rows: {}", health.dropped_rows);
                        println!("  Columns:      {}", health.columns.join(", "));
                        println!();
                        println!("Uptime: {}", format_duration(health.uptime_seconds));
                    }
                    Err(e) => {
                        eprintln!("Health check failed: {}", e);
                        std::process::exit(1);
                    }
                }
            }
            Err(e) => {
                eprintln!("Cannot connect to the obesity data API at {}", client.base_url());
                eprintln!("Error: {}", e);
                eprintln!();
                eprintln!("Make sure the API server is running:");
                eprintln!("  cargo run --bin obesity-api");
                std::process::exit(1);
            }
        },

        Commands::Config { output } => {
            let config = obesity_dash::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
