// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Sealdrop encrypt-and-fingerprint operation.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::messages::{self, Locale, MessageKey};

/// PEM header marker a public key must carry.
pub const PEM_BEGIN_MARKER: &str = "-----BEGIN PUBLIC KEY-----";

/// PEM footer marker a public key must carry.
pub const PEM_END_MARKER: &str = "-----END PUBLIC KEY-----";

/// A caller-supplied public key that passed the structural PEM check.
///
/// Only the request validator constructs these. The submitted text is kept
/// verbatim because it is what gets persisted in the fingerprint record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyInput(String);

impl PublicKeyInput {
    /// Wrap text already known to contain both PEM markers.
    ///
    /// Returns `None` when either marker is missing.
    pub fn from_checked(raw: String) -> Option<Self> {
        if raw.contains(PEM_BEGIN_MARKER) && raw.contains(PEM_END_MARKER) {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// The key exactly as the caller sent it.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The armored block from the header marker through the footer marker,
    /// without whatever surrounds it.
    ///
    /// Falls back to the trimmed input when the footer precedes the header;
    /// the RSA decoder then rejects it.
    pub fn pem_block(&self) -> &str {
        let raw = self.0.as_str();
        let block = raw.find(PEM_BEGIN_MARKER).and_then(|start| {
            raw[start..]
                .find(PEM_END_MARKER)
                .map(|end| &raw[start..start + end + PEM_END_MARKER.len()])
        });
        block.unwrap_or_else(|| raw.trim())
    }
}

/// Append-only audit record tying one encryption to its fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintRecord {
    /// The PEM text as submitted.
    pub public_key: String,
    /// Lowercase hex SHA-512 digest of the generation timestamp.
    pub hash: String,
}

/// Render `instant` the way fingerprints are generated: RFC 3339 in UTC with
/// a `Z` suffix and microsecond precision.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// The plaintext sealed to the caller's key.
///
/// Built fresh for every request and never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretPayload(String);

impl SecretPayload {
    /// Render the cover text of `locale` with the fingerprint and timestamp
    /// embedded verbatim.
    pub fn compose(locale: Locale, hash: &str, timestamp: &str) -> Self {
        Self(format!(
            "{}\n{}: {hash}\n{}: {timestamp}",
            messages::text(locale, MessageKey::PayloadHeading),
            messages::text(locale, MessageKey::PayloadHashLabel),
            messages::text(locale, MessageKey::PayloadTimestampLabel),
        ))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// The payload is secret; keep it out of logs.
impl fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretPayload({} bytes)", self.0.len())
    }
}

/// How the ciphertext is offered to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disposition {
    pub content_type: &'static str,
    pub filename: &'static str,
}

impl Disposition {
    /// `application/octet-stream` attachment named `message.enc`.
    pub const SEALED_MESSAGE: Disposition = Disposition {
        content_type: "application/octet-stream",
        filename: "message.enc",
    };

    /// Value for the `Content-Disposition` header.
    pub fn header_value(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Result of a successful encryption.
#[derive(Debug, Clone)]
pub struct SealedArtifact {
    /// Raw RSA-OAEP ciphertext.
    pub ciphertext: Vec<u8>,
    /// Fingerprint hash persisted for this request.
    pub hash: String,
    /// Timestamp the hash was computed from.
    pub timestamp: String,
    pub disposition: Disposition,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const KEY: &str = "-----BEGIN PUBLIC KEY-----\nMIIB\n-----END PUBLIC KEY-----";

    #[test]
    fn from_checked_requires_both_markers() {
        assert!(PublicKeyInput::from_checked(KEY.to_owned()).is_some());
        assert!(PublicKeyInput::from_checked(PEM_BEGIN_MARKER.to_owned()).is_none());
        assert!(PublicKeyInput::from_checked(PEM_END_MARKER.to_owned()).is_none());
        assert!(PublicKeyInput::from_checked("not a pem".to_owned()).is_none());
    }

    #[test]
    fn pem_block_strips_surrounding_text() {
        let raw = format!("  here is my key:\n{KEY}\n\nthanks!\n");
        let input = PublicKeyInput::from_checked(raw.clone()).unwrap();
        assert_eq!(input.pem_block(), KEY);
        assert_eq!(input.as_str(), raw);
    }

    #[test]
    fn pem_block_with_reversed_markers_falls_back_to_trimmed_input() {
        let raw = format!(" {PEM_END_MARKER}\n{PEM_BEGIN_MARKER} ");
        let input = PublicKeyInput::from_checked(raw).unwrap();
        assert_eq!(input.pem_block(), format!("{PEM_END_MARKER}\n{PEM_BEGIN_MARKER}"));
    }

    #[test]
    fn timestamp_is_utc_with_microseconds() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 16, 9, 12, 44).unwrap()
            + chrono::Duration::microseconds(118_302);
        assert_eq!(format_timestamp(instant), "2026-10-16T09:12:44.118302Z");
    }

    #[test]
    fn payload_embeds_hash_and_timestamp() {
        let hash = "ab".repeat(64);
        let ts = "2026-10-16T09:12:44.118302Z";
        for locale in Locale::ALL {
            let payload = SecretPayload::compose(locale, &hash, ts);
            let text = std::str::from_utf8(payload.as_bytes()).unwrap();
            assert!(text.contains(&hash));
            assert!(text.contains(ts));
        }
    }

    #[test]
    fn payload_fits_oaep_sha1_capacity_of_a_2048_bit_key() {
        // k - 2*hLen - 2 = 256 - 40 - 2
        let capacity = 214;
        let hash = "f".repeat(128);
        let ts = "2026-10-16T09:12:44.118302Z";
        for locale in Locale::ALL {
            let payload = SecretPayload::compose(locale, &hash, ts);
            assert!(payload.len() <= capacity, "{locale}: {} bytes", payload.len());
        }
    }

    #[test]
    fn payload_debug_hides_contents() {
        let payload = SecretPayload::compose(Locale::En, "deadbeef", "now");
        let dbg = format!("{payload:?}");
        assert!(!dbg.contains("deadbeef"));
    }

    #[test]
    fn disposition_header() {
        assert_eq!(
            Disposition::SEALED_MESSAGE.header_value(),
            "attachment; filename=\"message.enc\""
        );
    }

    #[test]
    fn record_serializes_with_camel_case_fields() {
        let record = FingerprintRecord {
            public_key: KEY.to_owned(),
            hash: "00".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["publicKey"], KEY);
        assert_eq!(json["hash"], "00");
    }
}
