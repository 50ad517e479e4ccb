//! # Surveyor CLI Module
//!
//! This module implements the CLI interface for Surveyor.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `surveys` - List the surveys in the catalog
//! - `check` - Validate the catalog and report its size

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use surveyor_core::SurveyError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Surveyor - multi-question survey server
///
/// Presents surveys one question at a time, records answers per client
/// session and blocks immediate re-submission.
#[derive(Parser, Debug)]
#[command(name = "surveyor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML survey catalog (overrides SURVEYOR_CATALOG)
    #[arg(short = 'C', long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Requests per second, 0 disables (overrides SURVEYOR_RATE_LIMIT)
        #[arg(long)]
        rate_limit: Option<u32>,

        /// Completion marker lifetime in seconds (overrides SURVEYOR_COMPLETION_TTL_SECS)
        #[arg(long)]
        completion_ttl: Option<u64>,
    },

    /// List surveys in the catalog
    Surveys,

    /// Validate the catalog
    Check,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), SurveyError> {
    let mut settings = crate::config::Settings::from_env()?;
    if let Some(path) = cli.catalog {
        settings.catalog_path = Some(path);
    }
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server {
            host,
            port,
            rate_limit,
            completion_ttl,
        }) => {
            if let Some(rps) = rate_limit {
                settings.rate_limit = rps;
            }
            if let Some(secs) = completion_ttl {
                settings.completion_ttl = std::time::Duration::from_secs(secs);
            }
            cmd_server(settings, &host, port).await
        }
        Some(Commands::Check) => cmd_check(&settings, json_mode),
        Some(Commands::Surveys) | None => cmd_surveys(&settings, json_mode, cli.verbose),
    }
}

// =============================================================================
// TESTS
// =============================================================================
