// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error responses produced outside the handlers (body limit, method
// mismatch, extractor rejections) arrive as plain text. Rewrite them into
// the `{ "error": ... }` shape every other failure uses, keeping the status.

use axum::body::to_bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use sealdrop_core::messages::{self, MessageKey};
use tracing::warn;

use super::encrypt::{ErrorBody, LocaleQuery, request_locale};
use crate::AppServices;

/// Upper bound on how much of a rejected body is read back for the log.
const DETAIL_LIMIT: usize = 1024;

pub async fn json_errors(
    State(services): State<AppServices>,
    query: Option<Query<LocaleQuery>>,
    headers: HeaderMap,
    response: Response,
) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let key = match status {
        StatusCode::NOT_FOUND => MessageKey::NotFound,
        StatusCode::METHOD_NOT_ALLOWED => MessageKey::MethodNotAllowed,
        StatusCode::PAYLOAD_TOO_LARGE => MessageKey::PayloadTooLarge,
        s if s.is_server_error() => MessageKey::Unexpected,
        _ => MessageKey::BadRequest,
    };
    let locale = request_locale(&services, query, &headers);
    let allow = response.headers().get(header::ALLOW).cloned();

    let detail = to_bytes(response.into_body(), DETAIL_LIMIT)
        .await
        .map(|b| String::from_utf8_lossy(&b).into_owned())
        .unwrap_or_default();
    warn!(status = status.as_u16(), %detail, "request rejected outside a handler");

    let mut rewritten = (status, ErrorBody::json(messages::text(locale, key))).into_response();
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(header::ALLOW, allow);
    }
    rewritten
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}
