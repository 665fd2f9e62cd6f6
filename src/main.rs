//! # Query Lens CLI (`qlens`)
//!
//! The `qlens` binary serves the analysis API and provides one-shot
//! commands for local use and operational checks.
//!
//! ## Usage
//!
//! ```bash
//! qlens --config ./config/qlens.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `qlens serve` | Start the HTTP server |
//! | `qlens analyze "<text>"` | Run one analysis and print the JSON result |
//! | `qlens check` | Load the model and corpus and report readiness |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use query_lens::{config, pipeline::Analyzer, server};

/// Query Lens — classify a natural-language query and retrieve matching
/// corpus records in one request.
#[derive(Parser)]
#[command(
    name = "qlens",
    about = "Query Lens — model-backed query classification with lexical corpus retrieval",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Model, corpus, and server settings are read from this file.
    /// See `config/qlens.example.toml` for a full example.
    #[arg(long, global = true, default_value = "./config/qlens.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Loads the classifier and corpus eagerly (the server refuses to start
    /// if either cannot be loaded), binds to `[server].bind`, and serves
    /// `POST /analyze` and `GET /health`.
    Serve,

    /// Analyze a single query and print the result as JSON.
    Analyze {
        /// The query text, e.g. "what is entropy".
        text: String,
    },

    /// Verify that the model and corpus load, and report their sizes.
    ///
    /// Exits non-zero if either artifact cannot be loaded. Useful before
    /// deploying a new model directory or dataset file.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(cfg).await?;
        }
        Commands::Analyze { text } => {
            let analyzer = Analyzer::new(cfg);
            let result = analyzer.analyze(&text).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Check => {
            let analyzer = Analyzer::new(cfg);
            let engine = analyzer.engine().await?;
            println!("model: {}", engine.classifier.model_name());
            println!("corpus records: {}", engine.corpus.len());
            println!("ok");
        }
    }

    Ok(())
}
