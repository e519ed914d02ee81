// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::messages::Locale;

/// Persistent server settings, stored as JSON.
///
/// Missing fields take their defaults, so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,
    /// SQLite file for fingerprint records. `None` means `<data dir>/keys.db`.
    pub database_path: Option<PathBuf>,
    /// Keep fingerprint records in memory only.
    pub in_memory: bool,
    /// Language used when a request does not ask for one.
    pub default_locale: Locale,
    /// Largest request body accepted, in bytes.
    pub max_body_bytes: usize,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_path: None,
            in_memory: false,
            default_locale: Locale::En,
            max_body_bytes: 64 * 1024,
            log_filter: "info".into(),
        }
    }
}

impl AppConfig {
    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the config as pretty JSON, creating missing parent directories.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Where fingerprint records live on disk, given the data directory.
    pub fn resolved_database_path(&self, data_dir: &Path) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| data_dir.join("keys.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{ "default_locale": "fr", "max_body_bytes": 1024 }"#).unwrap();
        assert_eq!(cfg.default_locale, Locale::Fr);
        assert_eq!(cfg.max_body_bytes, 1024);
        assert_eq!(cfg.listen_addr, AppConfig::default().listen_addr);
        assert!(!cfg.in_memory);
    }

    #[test]
    fn database_path_defaults_into_data_dir() {
        let cfg = AppConfig::default();
        assert_eq!(
            cfg.resolved_database_path(Path::new("/var/lib/sealdrop")),
            PathBuf::from("/var/lib/sealdrop/keys.db")
        );

        let cfg = AppConfig {
            database_path: Some("/srv/keys.sqlite".into()),
            ..AppConfig::default()
        };
        assert_eq!(
            cfg.resolved_database_path(Path::new("/ignored")),
            PathBuf::from("/srv/keys.sqlite")
        );
    }

    #[test]
    fn missing_file_loads_defaults() {
        let cfg = AppConfig::load(Path::new("/nonexistent/sealdrop/config.json")).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn persist_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cfg = AppConfig {
            in_memory: true,
            default_locale: Locale::Fr,
            ..AppConfig::default()
        };
        cfg.persist(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), cfg);
    }

    #[test]
    fn persist_creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("etc").join("sealdrop").join("config.json");
        AppConfig::default().persist(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn unknown_locale_in_file_is_rejected() {
        let res = serde_json::from_str::<AppConfig>(r#"{ "default_locale": "de" }"#);
        assert!(res.is_err());
    }
}
