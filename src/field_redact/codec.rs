// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// JSON text <-> tree boundary around the walker

use serde::de::IgnoredAny;
use serde_json::Value;
use std::borrow::Cow;

use super::error::RedactError;

/// True when `text` is one well-formed JSON value; blank text is not
pub fn is_valid_json(text: &str) -> bool {
    serde_json::from_str::<IgnoredAny>(text).is_ok()
}

/// Parse document text into a tree
pub fn parse_document(text: &str) -> Result<Value, RedactError> {
    Ok(serde_json::from_str(text)?)
}

/// Serialize a tree compactly
pub fn to_text(value: &Value) -> Result<String, RedactError> {
    serde_json::to_string(value).map_err(RedactError::Serialize)
}

/// Pretty-print valid JSON; anything else is returned as is
pub fn pretty(text: &str) -> Cow<'_, str> {
    parse_document(text)
        .and_then(|value| serde_json::to_string_pretty(&value).map_err(RedactError::Serialize))
        .map_or(Cow::Borrowed(text), Cow::Owned)
}
