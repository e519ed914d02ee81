// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Sealdrop.

use thiserror::Error;

/// Top-level error type for all Sealdrop operations.
///
/// The first five variants are the request taxonomy surfaced to callers;
/// the rest are ambient failures that only ever reach a caller as an
/// unexpected error.
#[derive(Debug, Error)]
pub enum SealError {
    // -- Request validation --
    #[error("no public key supplied")]
    MissingKey,

    #[error("public key is not PEM armored (missing BEGIN/END PUBLIC KEY markers)")]
    MalformedKey,

    // -- Encrypt path --
    #[error("fingerprint record could not be persisted: {0}")]
    Persistence(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("unexpected failure: {0}")]
    Unexpected(String),

    // -- Ambient --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SealError {
    /// Short stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingKey => "missing_key",
            Self::MalformedKey => "malformed_key",
            Self::Persistence(_) => "persistence",
            Self::Encryption(_) => "encryption",
            Self::Unexpected(_) | Self::Config(_) | Self::Io(_) | Self::Serialization(_) => {
                "unexpected"
            }
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SealError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambient_errors_share_the_unexpected_kind() {
        let io = SealError::Io(std::io::Error::other("disk gone"));
        assert_eq!(io.kind(), "unexpected");
        assert_eq!(SealError::Config("bad".into()).kind(), "unexpected");
        assert_eq!(SealError::Unexpected("x".into()).kind(), "unexpected");
    }

    #[test]
    fn display_keeps_underlying_cause() {
        let err = SealError::Encryption("message too long".into());
        assert_eq!(err.to_string(), "encryption failed: message too long");
    }
}
