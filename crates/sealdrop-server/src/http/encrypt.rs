// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// POST /api/encrypt
//
// Body: `{ "publicKey": "<PEM>" }`. Success is the raw ciphertext as an
// `application/octet-stream` attachment named `message.enc`. Failure is
// `{ "error": "<localized message>" }` with 400 for anything the caller's
// input caused and 500 otherwise. Error detail goes to the log only.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use sealdrop_core::error::SealError;
use sealdrop_core::messages::{Locale, Severity, humanize_error};
use sealdrop_security::validate_body;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::AppServices;

#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    /// Language override, e.g. `fr`.
    #[serde(default)]
    pub lang: Option<String>,
}

/// JSON error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn json(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            error: message.into(),
        })
    }
}

/// A failed request together with the language to report it in.
#[derive(Debug)]
pub struct EncryptError {
    source: SealError,
    locale: Locale,
}

impl EncryptError {
    pub fn new(source: SealError, locale: Locale) -> Self {
        Self { source, locale }
    }
}

impl IntoResponse for EncryptError {
    fn into_response(self) -> Response {
        let human = humanize_error(&self.source, self.locale);
        let kind = self.source.kind();

        let status = match human.severity {
            Severity::ClientInput => {
                warn!(kind, error = %self.source, "encrypt request rejected");
                StatusCode::BAD_REQUEST
            }
            Severity::ServerFault => {
                error!(kind, error = %self.source, "encrypt request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, ErrorBody::json(human.message)).into_response()
    }
}

/// Response language for a request. An unparseable query string counts as
/// no `lang` at all.
pub(crate) fn request_locale(
    services: &AppServices,
    query: Option<Query<LocaleQuery>>,
    headers: &HeaderMap,
) -> Locale {
    let lang = query.and_then(|Query(q)| q.lang);
    let accept_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    services.resolve_locale(lang.as_deref(), accept_language)
}

pub async fn handler(
    State(services): State<AppServices>,
    query: Option<Query<LocaleQuery>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, EncryptError> {
    let locale = request_locale(&services, query, &headers);

    // Anything that is not a JSON object simply carries no key.
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let key = validate_body(&payload).map_err(|e| EncryptError::new(e, locale))?;

    // Store write and RSA are blocking work; keep them off the async workers.
    let encryption = services.encryption();
    let artifact = tokio::task::spawn_blocking(move || encryption.encrypt(&key, locale))
        .await
        .map_err(|e| EncryptError::new(SealError::Unexpected(e.to_string()), locale))?
        .map_err(|e| EncryptError::new(e, locale))?;

    info!(
        hash = %artifact.hash,
        timestamp = %artifact.timestamp,
        bytes = artifact.ciphertext.len(),
        "message sealed"
    );

    let disposition = artifact.disposition.header_value();
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, artifact.disposition.content_type),
            (header::CONTENT_DISPOSITION, disposition.as_str()),
        ],
        artifact.ciphertext,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_of(err: EncryptError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unexpected_errors_are_500_with_generic_text() {
        let err = EncryptError::new(SealError::Unexpected("task panicked".into()), Locale::En);
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.error.contains("panicked"));
    }

    #[tokio::test]
    async fn persistence_errors_are_400_without_detail() {
        let err = EncryptError::new(SealError::Persistence("database is locked".into()), Locale::Fr);
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.error.contains("locked"));
        assert!(body.error.contains("chiffrement"));
    }

    #[tokio::test]
    async fn ambient_io_errors_are_500() {
        let err = EncryptError::new(SealError::Io(std::io::Error::other("EMFILE")), Locale::En);
        let (status, _) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
