// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: opens the key-record store, builds the encryption
// service, and answers per-request questions (which locale?) for the HTTP
// handlers.
//
// `SqliteKeyStore` serializes access to its connection internally, so the
// services themselves are plain `Arc`s and clone cheaply into every request.

use std::path::Path;
use std::sync::Arc;

use sealdrop_core::AppConfig;
use sealdrop_core::error::Result;
use sealdrop_core::messages::Locale;
use sealdrop_security::{EncryptionService, KeyRecordStore, MemoryKeyStore, SqliteKeyStore};
use tracing::{info, warn};

/// Shared services handed to every handler as axum state.
#[derive(Clone)]
pub struct AppServices {
    encryption: Arc<EncryptionService>,
    config: Arc<AppConfig>,
}

impl AppServices {
    /// Initialise all services. Call once at startup.
    ///
    /// Opens the SQLite key-record store under `data_dir` unless the config
    /// asks for an in-memory store.
    pub fn init(config: AppConfig, data_dir: &Path) -> Result<Self> {
        if config.in_memory {
            info!("in-memory key-record store requested");
            return Ok(Self::with_store(config, Arc::new(MemoryKeyStore::new())));
        }

        let db_path = config.resolved_database_path(data_dir);
        info!(path = %db_path.display(), "opening key-record store");
        let store = SqliteKeyStore::open(&db_path)?;

        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Services backed by a volatile in-memory store, used when the
    /// persistent store could not be opened. Records are lost on exit.
    pub fn fallback(config: AppConfig) -> Self {
        warn!("fingerprint records will not survive a restart");
        Self::with_store(config, Arc::new(MemoryKeyStore::new()))
    }

    /// Services backed by a caller-provided store.
    pub fn with_store(config: AppConfig, store: Arc<dyn KeyRecordStore>) -> Self {
        Self {
            encryption: Arc::new(EncryptionService::new(store)),
            config: Arc::new(config),
        }
    }

    pub fn encryption(&self) -> Arc<EncryptionService> {
        Arc::clone(&self.encryption)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Pick the response language: explicit `lang` parameter first, then
    /// `Accept-Language`, then the configured default.
    pub fn resolve_locale(&self, lang: Option<&str>, accept_language: Option<&str>) -> Locale {
        lang.and_then(Locale::from_tag)
            .or_else(|| accept_language.and_then(Locale::negotiate))
            .unwrap_or(self.config.default_locale)
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use super::*;

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        buffer.contents()
    }

    fn services(default_locale: Locale) -> AppServices {
        AppServices::fallback(AppConfig {
            default_locale,
            ..AppConfig::default()
        })
    }

    #[test]
    fn explicit_lang_beats_header() {
        let svc = services(Locale::En);
        assert_eq!(svc.resolve_locale(Some("fr"), Some("en")), Locale::Fr);
    }

    #[test]
    fn header_beats_default() {
        let svc = services(Locale::En);
        assert_eq!(svc.resolve_locale(None, Some("fr-FR,fr;q=0.9")), Locale::Fr);
    }

    #[test]
    fn unsupported_choices_fall_back_to_default() {
        let svc = services(Locale::Fr);
        assert_eq!(svc.resolve_locale(Some("de"), Some("it")), Locale::Fr);
        assert_eq!(svc.resolve_locale(None, None), Locale::Fr);
    }

    #[test]
    fn init_creates_sqlite_store_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        AppServices::init(AppConfig::default(), dir.path()).unwrap();
        assert!(dir.path().join("keys.db").exists());
    }

    #[test]
    fn requested_in_memory_store_is_not_reported_as_a_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            in_memory: true,
            ..AppConfig::default()
        };
        let logs = capture_logs(|| {
            AppServices::init(config, dir.path()).unwrap();
        });
        assert!(logs.contains("in-memory key-record store requested"));
        assert!(!logs.contains("WARN"));
    }

    #[test]
    fn fallback_warns_that_records_are_volatile() {
        let logs = capture_logs(|| {
            AppServices::fallback(AppConfig::default());
        });
        assert!(logs.contains("WARN"));
        assert!(logs.contains("will not survive a restart"));
    }

    #[test]
    fn init_in_memory_touches_no_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            in_memory: true,
            ..AppConfig::default()
        };
        AppServices::init(config, dir.path()).unwrap();
        assert!(!dir.path().join("keys.db").exists());
    }
}
