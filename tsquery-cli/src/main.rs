use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tsquery::config::{default_config_path, Config, ObservabilityConfig};
use tsquery::{Comparator, HttpSearchClient};

mod commands;

use commands::QueryArgs;

#[derive(Parser, Debug)]
#[command(name = "tsquery")]
#[command(about = "tsquery - time-series queries over Elasticsearch indices")]
#[command(version)]
struct Cli {
    /// Configuration file path (default: ~/.tsquery/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Cluster URL, overrides the configured one
    #[arg(long, global = true)]
    url: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a time-series query and print the grouped metrics
    Query {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Print the search request a query would send
    Explain {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Run a query and print the groups whose latest value crosses a threshold
    Check {
        #[command(flatten)]
        query: QueryArgs,

        /// One of <, <=, >, >=, between, notBetween
        #[arg(long)]
        comparator: Comparator,

        /// Threshold value; pass twice for between / notBetween
        #[arg(long, required = true, allow_negative_numbers = true)]
        threshold: Vec<f64>,

        /// Exit with status 1 when no group matches
        #[arg(long)]
        fail_on_empty: bool,
    },

    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let json = std::env::var("LOG_FORMAT")
        .unwrap_or_else(|_| config.log_format.clone())
        .eq_ignore_ascii_case("json");

    let registry = tracing_subscriber::registry().with(filter);

    match (&config.log_file, json) {
        (Some(path), json) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            if json {
                registry
                    .with(tracing_subscriber::fmt::layer().json().with_writer(Mutex::new(file)))
                    .init();
            } else {
                registry
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_ansi(false)
                            .with_writer(Mutex::new(file)),
                    )
                    .init();
            }
        }
        (None, true) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        (None, false) => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    if let Commands::InitConfig { force } = cli.command {
        if config_path.exists() && !force {
            anyhow::bail!(
                "{} already exists, pass --force to overwrite",
                config_path.display()
            );
        }
        Config::default().save(&config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    let mut config = Config::load(&config_path)?;
    if let Some(url) = cli.url {
        config.cluster.url = url;
    }

    init_tracing(&config.observability)?;
    tracing::debug!("Config file: {}", config_path.display());

    match cli.command {
        Commands::Query { query } => {
            let client = HttpSearchClient::from_config(&config.cluster)?;
            commands::run_query(&client, query, cli.pretty).await?;
        }
        Commands::Explain { query } => {
            commands::run_explain(query, cli.pretty)?;
        }
        Commands::Check {
            query,
            comparator,
            threshold,
            fail_on_empty,
        } => {
            let client = HttpSearchClient::from_config(&config.cluster)?;
            let matched =
                commands::run_check(&client, query, comparator, &threshold, cli.pretty).await?;
            if fail_on_empty && matched == 0 {
                std::process::exit(1);
            }
        }
        // Handled before the config is loaded
        Commands::InitConfig { .. } => {}
    }

    Ok(())
}
