// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Key-record store: append-only log of every fingerprint handed out.
//
// Schema:
//   public_keys(
//     id          INTEGER PRIMARY KEY AUTOINCREMENT,
//     public_key  TEXT    NOT NULL,   -- PEM text as submitted
//     hash        TEXT    NOT NULL,   -- SHA-512 hex fingerprint
//     created_at  TEXT    NOT NULL    -- RFC 3339, store bookkeeping
//   )

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{Connection, params};
use sealdrop_core::error::SealError;
use sealdrop_core::types::FingerprintRecord;
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// Local error helpers
// ---------------------------------------------------------------------------

/// Convert a `rusqlite::Error` into a `SealError::Persistence`.
fn db_err(e: rusqlite::Error) -> SealError {
    SealError::Persistence(e.to_string())
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS public_keys (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    public_key  TEXT    NOT NULL,
    hash        TEXT    NOT NULL,
    created_at  TEXT    NOT NULL
);
CREATE INDEX IF NOT EXISTS public_keys_hash ON public_keys (hash);";

// ---------------------------------------------------------------------------
// Store interface
// ---------------------------------------------------------------------------

/// Where fingerprint records go.
///
/// The encrypt path only ever appends. Implementations must make a record
/// durable before returning `Ok`.
pub trait KeyRecordStore: Send + Sync {
    fn save(&self, record: &FingerprintRecord) -> Result<(), SealError>;
}

/// A row read back from the SQLite store, for operators and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: i64,
    pub record: FingerprintRecord,
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

/// Append-only key-record store backed by a SQLite database.
///
/// `rusqlite::Connection` is `Send` but not `Sync`, so it sits behind a
/// mutex; every statement is a single short insert or read.
pub struct SqliteKeyStore {
    conn: Mutex<Connection>,
}

impl SqliteKeyStore {
    /// Open (or create) the key-record database at `path`.
    ///
    /// WAL mode is enabled for better concurrent-read performance.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SealError> {
        let conn = Connection::open(path).map_err(db_err)?;

        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(db_err)?;
        conn.execute_batch(SCHEMA).map_err(db_err)?;

        debug!("key-record store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self, SealError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        conn.execute_batch(SCHEMA).map_err(db_err)?;

        debug!("in-memory key-record store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, SealError> {
        self.conn
            .lock()
            .map_err(|_| SealError::Persistence("key-record store lock poisoned".into()))
    }

    /// All records carrying `hash`, oldest first.
    pub fn find_by_hash(&self, hash: &str) -> Result<Vec<StoredRecord>, SealError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, public_key, hash, created_at
                 FROM public_keys
                 WHERE hash = ?1
                 ORDER BY id ASC",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![hash], |row| {
                Ok(StoredRecord {
                    id: row.get(0)?,
                    record: FingerprintRecord {
                        public_key: row.get(1)?,
                        hash: row.get(2)?,
                    },
                    created_at: row.get(3)?,
                })
            })
            .map_err(db_err)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(db_err)?);
        }
        Ok(records)
    }

    /// Return the total number of records.
    pub fn count(&self) -> Result<u64, SealError> {
        self.conn()?
            .query_row("SELECT COUNT(*) FROM public_keys", [], |row| row.get(0))
            .map_err(db_err)
    }
}

impl KeyRecordStore for SqliteKeyStore {
    #[instrument(skip_all, fields(hash = %record.hash))]
    fn save(&self, record: &FingerprintRecord) -> Result<(), SealError> {
        let created_at = Utc::now().to_rfc3339();

        self.conn()?
            .execute(
                "INSERT INTO public_keys (public_key, hash, created_at)
                 VALUES (?1, ?2, ?3)",
                params![record.public_key, record.hash, created_at],
            )
            .map_err(db_err)?;

        debug!("fingerprint record stored");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Volatile store for tests and `--in-memory` runs.
///
/// [`MemoryKeyStore::failing`] builds one that rejects every write, to
/// exercise the persistence-failure path.
#[derive(Default)]
pub struct MemoryKeyStore {
    records: Mutex<Vec<FingerprintRecord>>,
    reject_writes: bool,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            records: Mutex::default(),
            reject_writes: true,
        }
    }

    /// Snapshot of everything saved so far, in insertion order.
    pub fn records(&self) -> Vec<FingerprintRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyRecordStore for MemoryKeyStore {
    fn save(&self, record: &FingerprintRecord) -> Result<(), SealError> {
        if self.reject_writes {
            return Err(SealError::Persistence("store rejected the write".into()));
        }
        self.records
            .lock()
            .map_err(|_| SealError::Persistence("key-record store lock poisoned".into()))?
            .push(record.clone());
        Ok(())
    }
}
