// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sealdrop-security: the encrypt-and-fingerprint core.
//
// Request validation, SHA-512 fingerprints, the append-only key-record
// store, and RSA-OAEP sealing of the secret message.

pub mod integrity;
pub mod sealer;
pub mod store;
pub mod validator;

// PUBLIC API: Re-export the encrypt path
pub use integrity::{fingerprint, hash_bytes};
pub use sealer::EncryptionService;
pub use store::{KeyRecordStore, MemoryKeyStore, SqliteKeyStore};
pub use validator::{validate, validate_body};
