//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `site_status` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Reading site lists and printing results
//!
//! All core functionality is implemented in the library crate.

use std::io::Read;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use site_status::config::{Command, Opt};
use site_status::initialization::{init_crypto_provider, init_logger_with};
use site_status::server::{start_server, AppState};
use site_status::{print_batch_summary, print_error_statistics, run_check, Site};

/// Accepted shapes of a `check` input document.
#[derive(Deserialize)]
#[serde(untagged)]
enum SiteList {
    Bare(Vec<Site>),
    Wrapped { websites: Vec<Site> },
}

fn read_sites(path: &Path) -> Result<Vec<Site>> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read sites from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    let list: SiteList = serde_json::from_str(&raw)
        .context("Expected a JSON array of {id, url} or {\"websites\": [...]}")?;
    Ok(match list {
        SiteList::Bare(sites) | SiteList::Wrapped { websites: sites } => sites,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    match opt.command {
        Command::Serve { bind, inspection } => {
            let config = inspection.to_config(opt.log_level, opt.log_format);
            let state = AppState::from_config(&config, Some(inspection.public_dir.clone()))
                .context("Failed to initialize inspection server")?;
            if let Err(e) = start_server(bind, state).await {
                eprintln!("site_status error: {:#}", e);
                process::exit(1);
            }
            Ok(())
        }
        Command::Check {
            file,
            pretty,
            show_stats,
            inspection,
        } => {
            let config = inspection.to_config(opt.log_level, opt.log_format);
            let sites = read_sites(&file)?;
            match run_check(&config, sites).await {
                Ok(report) => {
                    let results = &report.outcome.results;
                    let json = if pretty {
                        serde_json::to_string_pretty(results)
                    } else {
                        serde_json::to_string(results)
                    }
                    .context("Failed to serialize results")?;
                    println!("{json}");

                    print_batch_summary(&report.outcome.report);
                    if show_stats {
                        print_error_statistics(&report.stats);
                    }
                    Ok(())
                }
                Err(e) => {
                    eprintln!("site_status error: {:#}", e);
                    process::exit(1);
                }
            }
        }
    }
}
