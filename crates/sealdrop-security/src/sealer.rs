// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encryption service: fingerprint, persist, compose, seal.
//
// Order matters. The fingerprint record must be accepted by the store before
// any RSA work happens, and the hash embedded in the sealed message is the
// very string that was stored.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPublicKey};
use sealdrop_core::error::SealError;
use sealdrop_core::messages::Locale;
use sealdrop_core::types::{
    Disposition, FingerprintRecord, PublicKeyInput, SealedArtifact, SecretPayload,
    format_timestamp,
};
use sha1::Sha1;
use tracing::{debug, instrument};

use crate::integrity::fingerprint;
use crate::store::KeyRecordStore;

/// Seals fingerprinted messages to caller-supplied RSA public keys.
///
/// Holds no per-request state; share it behind an `Arc` across requests.
pub struct EncryptionService {
    store: Arc<dyn KeyRecordStore>,
}

impl EncryptionService {
    pub fn new(store: Arc<dyn KeyRecordStore>) -> Self {
        Self { store }
    }

    /// Fingerprint the current instant, record it, and seal the message for
    /// `key`.
    pub fn encrypt(&self, key: &PublicKeyInput, locale: Locale) -> Result<SealedArtifact, SealError> {
        self.encrypt_at(key, locale, Utc::now())
    }

    /// [`encrypt`](Self::encrypt) with the generation instant supplied.
    #[instrument(skip_all, fields(%locale))]
    pub fn encrypt_at(
        &self,
        key: &PublicKeyInput,
        locale: Locale,
        generated_at: DateTime<Utc>,
    ) -> Result<SealedArtifact, SealError> {
        let timestamp = format_timestamp(generated_at);
        let hash = fingerprint(&timestamp);

        let record = FingerprintRecord {
            public_key: key.as_str().to_owned(),
            hash,
        };
        self.store.save(&record).map_err(|e| match e {
            SealError::Persistence(_) => e,
            other => SealError::Persistence(other.to_string()),
        })?;
        let hash = record.hash;
        debug!(%hash, "fingerprint recorded");

        let payload = SecretPayload::compose(locale, &hash, &timestamp);
        let ciphertext = seal(key, &payload)?;

        Ok(SealedArtifact {
            ciphertext,
            hash,
            timestamp,
            disposition: Disposition::SEALED_MESSAGE,
        })
    }
}

/// RSA-OAEP encrypt `payload` under `key`.
///
/// Uses the scheme defaults: SHA-1 for both the label hash and MGF1, empty
/// label. With a k-byte modulus at most k - 42 bytes fit.
#[instrument(skip_all, fields(payload_len = payload.len()))]
pub fn seal(key: &PublicKeyInput, payload: &SecretPayload) -> Result<Vec<u8>, SealError> {
    let public_key = RsaPublicKey::from_public_key_pem(key.pem_block())
        .map_err(|e| SealError::Encryption(format!("unusable RSA public key: {e}")))?;

    let mut rng = rand::thread_rng();
    let ciphertext = public_key
        .encrypt(&mut rng, Oaep::new::<Sha1>(), payload.as_bytes())
        .map_err(|e| {
            SealError::Encryption(format!(
                "OAEP encryption under a {}-bit key failed: {e}",
                public_key.size() * 8
            ))
        })?;

    debug!(ciphertext_len = ciphertext.len(), "payload sealed");
    Ok(ciphertext)
}
