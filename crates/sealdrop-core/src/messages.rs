// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Localized user-facing text.
//
// Every string a caller can see (error bodies and the sealed message cover
// text) comes from one table keyed by `MessageKey` and selected by `Locale`.
// Technical detail never appears here; it goes to the logs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SealError;

/// Languages the message table is available in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Fr];

    /// BCP 47 primary language subtag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    /// Match a language tag such as `fr`, `fr-CA` or `EN_us` by its primary
    /// subtag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self::ALL.into_iter().find(|l| l.tag() == primary)
    }

    /// Pick the first supported language from an `Accept-Language` header
    /// value, honouring q-values. Entries with `q=0` are ignored.
    pub fn negotiate(accept_language: &str) -> Option<Self> {
        let mut candidates: Vec<(f32, usize, Locale)> = accept_language
            .split(',')
            .enumerate()
            .filter_map(|(pos, entry)| {
                let mut parts = entry.split(';');
                let locale = Self::from_tag(parts.next()?)?;
                let q = parts
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .map_or(Some(1.0), |v| v.trim().parse::<f32>().ok())?;
                (q > 0.0).then_some((q, pos, locale))
            })
            .collect();

        // Highest q first; header order breaks ties.
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        candidates.first().map(|c| c.2)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = SealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| SealError::Config(format!("unsupported locale: {s}")))
    }
}

/// Keys into the message table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    MissingKey,
    MalformedKey,
    EncryptionFailed,
    Unexpected,
    NotFound,
    /// Request rejected before it reached a handler (bad query, unreadable body).
    BadRequest,
    PayloadTooLarge,
    MethodNotAllowed,
    /// First line of the sealed message.
    PayloadHeading,
    /// Label preceding the fingerprint hash in the sealed message.
    PayloadHashLabel,
    /// Label preceding the generation timestamp in the sealed message.
    PayloadTimestampLabel,
}

/// Look up the display string for `key` in `locale`.
pub fn text(locale: Locale, key: MessageKey) -> &'static str {
    match locale {
        Locale::En => match key {
            MessageKey::MissingKey => "Public key required",
            MessageKey::MalformedKey => {
                "The public key format is invalid. Please provide an RSA public key in PEM format."
            }
            MessageKey::EncryptionFailed => {
                "An error occurred while encrypting the message. Please check the format of your public key."
            }
            MessageKey::Unexpected => {
                "An error occurred during encryption. Please contact the site maintainer for more information."
            }
            MessageKey::NotFound => "Not found",
            MessageKey::BadRequest => "The request could not be read.",
            MessageKey::PayloadTooLarge => "The request body is too large.",
            MessageKey::MethodNotAllowed => "Method not allowed",
            MessageKey::PayloadHeading => "Sealed message.",
            MessageKey::PayloadHashLabel => "Hash",
            MessageKey::PayloadTimestampLabel => "Generated at",
        },
        Locale::Fr => match key {
            MessageKey::MissingKey => "Clé publique requise",
            MessageKey::MalformedKey => {
                "Le format de la clé publique est invalide. Veuillez fournir une clé publique RSA au format PEM."
            }
            MessageKey::EncryptionFailed => {
                "Une erreur s'est produite lors du chiffrement du message. Veuillez vérifier le format de votre clé publique."
            }
            MessageKey::Unexpected => {
                "Une erreur est survenue lors du chiffrement. Veuillez contacter le mainteneur du site pour plus d'informations"
            }
            MessageKey::NotFound => "Introuvable",
            MessageKey::BadRequest => "La requête n'a pas pu être lue.",
            MessageKey::PayloadTooLarge => "Le corps de la requête est trop volumineux.",
            MessageKey::MethodNotAllowed => "Méthode non autorisée",
            MessageKey::PayloadHeading => "Message scellé.",
            MessageKey::PayloadHashLabel => "Hash",
            MessageKey::PayloadTimestampLabel => "Généré à",
        },
    }
}

/// Who is at fault, from the caller's perspective. Drives the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Bad or unusable input (400).
    ClientInput,
    /// Anything else (500).
    ServerFault,
}

/// A localized, caller-safe rendering of an error.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub key: MessageKey,
    pub message: &'static str,
    pub severity: Severity,
}

/// Convert a `SealError` into the message a caller is allowed to see.
///
/// Persistence and encryption failures deliberately share one message: the
/// caller cannot tell whether the fingerprint write or the RSA step failed.
pub fn humanize_error(err: &SealError, locale: Locale) -> HumanError {
    let (key, severity) = match err {
        SealError::MissingKey => (MessageKey::MissingKey, Severity::ClientInput),
        SealError::MalformedKey => (MessageKey::MalformedKey, Severity::ClientInput),
        SealError::Persistence(_) | SealError::Encryption(_) => {
            (MessageKey::EncryptionFailed, Severity::ClientInput)
        }
        SealError::Unexpected(_)
        | SealError::Config(_)
        | SealError::Io(_)
        | SealError::Serialization(_) => (MessageKey::Unexpected, Severity::ServerFault),
    };

    HumanError {
        key,
        message: text(locale, key),
        severity,
    }
}
