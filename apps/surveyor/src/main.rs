//! # Surveyor - Survey Server
//!
//! The main binary for Surveyor.
//!
//! This application provides:
//! - HTTP server presenting surveys one question at a time (axum-based)
//! - CLI interface for inspecting and validating survey catalogs
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  apps/surveyor (THE BINARY)               │
//! │                                                           │
//! │   ┌─────────────┐     ┌──────────────────────────────┐    │
//! │   │    CLI      │     │  HTTP API (axum)             │    │
//! │   │   (clap)    │     │  sessions + marker cookies   │    │
//! │   └──────┬──────┘     └──────────────┬───────────────┘    │
//! │          └───────────────┬───────────┘                    │
//! │                          ▼                                │
//! │                 ┌─────────────────┐                       │
//! │                 │  surveyor-core  │                       │
//! │                 │   (THE LOGIC)   │                       │
//! │                 └─────────────────┘                       │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server with the built-in surveys
//! surveyor server --host 0.0.0.0 --port 5000
//!
//! # Use a custom catalog
//! surveyor --catalog surveys.toml server
//!
//! # Inspect the catalog
//! surveyor surveys --verbose
//! surveyor check --catalog surveys.toml
//! ```

use clap::Parser;
use surveyor::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // SURVEYOR_LOG_FORMAT=json switches to machine-parseable output.
    let log_format = std::env::var("SURVEYOR_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "surveyor=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Surveyor startup banner.
fn print_banner() {
    println!(
        r#"
  ┌─┐┬ ┬┬─┐┬  ┬┌─┐┬ ┬┌─┐┬─┐
  └─┐│ │├┬┘└┐┌┘├┤ └┬┘│ │├┬┘
  └─┘└─┘┴└─ └┘ └─┘ ┴ └─┘┴└─

  Survey Server v{}

  One question at a time • In order • Once
"#,
        env!("CARGO_PKG_VERSION")
    );
}
