// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Error types for rule loading and document redaction

use thiserror::Error;

/// A problem with one rule (or one parameter of a rule) in the rule text.
///
/// These never abort loading: the offending rule is dropped, or the
/// offending parameter falls back to its strategy default, and the error is
/// reported as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("rule `{rule}` is not of the form path:STRATEGY[:params]")]
    MalformedRule { rule: String },

    #[error("invalid field path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("unknown redaction strategy `{name}` in rule `{rule}`")]
    UnknownStrategy { rule: String, name: String },

    #[error("parameter `{key}` on `{path}` is out of range: {value} (expected 0..=1000)")]
    ParamOutOfRange {
        path: String,
        key: String,
        value: String,
    },

    #[error("invalid value `{value}` for parameter `{key}` on `{path}`")]
    InvalidParam {
        path: String,
        key: String,
        value: String,
    },

    #[error("unknown parameter `{key}` on `{path}`")]
    UnknownParam { path: String, key: String },
}

/// Failure at the document codec boundary.
#[derive(Debug, Error)]
pub enum RedactError {
    #[error("input is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to serialize redacted document: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Returned when a strategy name is not one of the known strategies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown redaction strategy `{0}`")]
pub struct ParseStrategyError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::UnknownStrategy {
            rule: "user.phone:PHONY".to_string(),
            name: "PHONY".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unknown redaction strategy `PHONY` in rule `user.phone:PHONY`"
        );

        let err = ConfigError::ParamOutOfRange {
            path: "a.b".to_string(),
            key: "startKeep".to_string(),
            value: "5000".to_string(),
        };
        assert!(err.to_string().contains("0..=1000"));
    }

    #[test]
    fn test_parse_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: RedactError = serde_err.into();
        assert!(matches!(err, RedactError::Parse(_)));
        assert!(err.to_string().starts_with("input is not valid JSON"));
    }
}
