// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use sealdrop_core::messages::{self, MessageKey};

use super::encrypt::{ErrorBody, LocaleQuery, request_locale};
use crate::AppServices;

pub async fn handler(
    State(services): State<AppServices>,
    query: Option<Query<LocaleQuery>>,
    headers: HeaderMap,
) -> Response {
    let locale = request_locale(&services, query, &headers);

    (
        StatusCode::NOT_FOUND,
        ErrorBody::json(messages::text(locale, MessageKey::NotFound)),
    )
        .into_response()
}
