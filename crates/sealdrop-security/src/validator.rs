// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request validation: is there a key, and does it look like a PEM public key?
//
// Only the textual armor is checked here. Whether the block decodes to a
// usable RSA key is found out when sealing.

use sealdrop_core::error::SealError;
use sealdrop_core::types::PublicKeyInput;
use serde_json::Value;

/// Validate the decoded `publicKey` field of a request.
///
/// - absent, `null` or `""` is [`SealError::MissingKey`];
/// - any other non-string, or a string lacking either PEM marker, is
///   [`SealError::MalformedKey`].
pub fn validate(input: Option<&Value>) -> Result<PublicKeyInput, SealError> {
    match input {
        None | Some(Value::Null) => Err(SealError::MissingKey),
        Some(Value::String(raw)) if raw.is_empty() => Err(SealError::MissingKey),
        Some(Value::String(raw)) => {
            PublicKeyInput::from_checked(raw.clone()).ok_or(SealError::MalformedKey)
        }
        Some(_) => Err(SealError::MalformedKey),
    }
}

/// Validate a whole request body: a JSON object whose `publicKey` member
/// holds the key.
///
/// A body that is not an object carries no key.
pub fn validate_body(body: &Value) -> Result<PublicKeyInput, SealError> {
    match body {
        Value::Object(map) => validate(map.get("publicKey")),
        _ => Err(SealError::MissingKey),
    }
}
