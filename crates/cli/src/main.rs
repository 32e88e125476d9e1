//! # nl2sql: Natural Language to SQL on the Command Line
//!
//! This is the main entry point for the `nl2sql` command-line interface.

mod app;
mod config;
mod ui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a config file, overriding config.yml and the provider templates
    #[arg(long, global = true, env = "NL2SQL_CONFIG")]
    config: Option<String>,
    /// Print results as JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a schema file and print the analysis
    Analyze {
        /// Path to a file containing the schema (DDL or a description)
        schema: PathBuf,
    },
    /// Generate SQL for a request, predict its results, and refine it
    Query {
        /// Path to the schema file
        #[arg(long)]
        schema: PathBuf,
        /// The request in plain language
        request: String,
    },
    /// Generate and validate SQL for a request, without predicting results
    Generate {
        /// Path to the schema file
        #[arg(long)]
        schema: PathBuf,
        /// The request in plain language
        request: String,
    },
    /// Analyze a schema once, then answer requests read from stdin
    Interactive {
        /// Path to the schema file
        #[arg(long)]
        schema: PathBuf,
    },
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Setup logging to a file
    let log_file = File::create("nl2sql-cli.log")?;
    let subscriber = fmt::Subscriber::builder()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let app_config = config::get_config(cli.config.as_deref())?;
    let assistant = app::build_assistant(&app_config)?;
    info!("Running command: {:?}", cli.command);

    match &cli.command {
        Commands::Analyze { schema } => app::handle_analyze(&assistant, schema, cli.json).await,
        Commands::Query { schema, request } => {
            let request = app::require_request(request)?;
            app::handle_query(&assistant, schema, request, cli.json).await
        }
        Commands::Generate { schema, request } => {
            let request = app::require_request(request)?;
            app::handle_generate(&assistant, schema, request, cli.json).await
        }
        Commands::Interactive { schema } => {
            app::handle_interactive(&assistant, schema, cli.json).await
        }
    }
}
