// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sealdrop: seals a fingerprinted message to a caller's RSA public key.
//
// Entry point. Loads configuration, initialises logging and backend
// services, and serves the HTTP API.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use sealdrop_core::AppConfig;
use sealdrop_core::error::Result;
use sealdrop_core::messages::Locale;
use sealdrop_server::AppServices;
use sealdrop_server::services::data_dir;

#[derive(Debug, Parser)]
#[command(name = "sealdrop")]
#[command(about = "Seal a fingerprinted message to a caller-supplied RSA public key")]
#[command(version)]
struct Cli {
    /// JSON config file (default: <data dir>/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// SQLite file for fingerprint records
    #[arg(long)]
    database: Option<PathBuf>,

    /// Keep fingerprint records in memory only
    #[arg(long)]
    in_memory: bool,

    /// Default response language (en, fr)
    #[arg(long)]
    locale: Option<Locale>,
}

impl Cli {
    /// Command-line flags win over the config file.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(addr) = self.listen {
            config.listen_addr = addr;
        }
        if let Some(path) = &self.database {
            config.database_path = Some(path.clone());
        }
        if self.in_memory {
            config.in_memory = true;
        }
        if let Some(locale) = self.locale {
            config.default_locale = locale;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dir = data_dir::data_dir()?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| data_dir::config_path(&dir));
    let first_run = !config_path.exists();
    let mut config = AppConfig::load(&config_path)?;
    // Logging is not up yet; report a failed write once it is.
    let persist_result = if first_run {
        config.persist(&config_path)
    } else {
        Ok(())
    };
    cli.apply(&mut config);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .init();

    tracing::info!(config = %config_path.display(), first_run, "Sealdrop starting");
    if let Err(e) = persist_result {
        tracing::warn!(
            config = %config_path.display(),
            error = %e,
            "could not write default config, continuing with defaults"
        );
    }

    let services = match AppServices::init(config.clone(), &dir) {
        Ok(s) => {
            tracing::info!("backend services initialised");
            s
        }
        Err(e) => {
            tracing::error!(error = %e, "persistent storage failed, using in-memory fallback");
            AppServices::fallback(config)
        }
    };

    sealdrop_server::http::serve(services).await
}
