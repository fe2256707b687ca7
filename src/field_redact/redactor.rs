// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Field redactor: text-in/text-out entry point with optional PyO3 bindings

#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use pyo3::types::PyDict;
use serde_json::Value;
use std::borrow::Cow;
use tracing::debug;

use super::codec::{parse_document, to_text};
use super::config::{RedactConfig, DEFAULT_RULE_DELIMITER};
use super::error::{ConfigError, RedactError};
use super::rules::RuleSet;
use super::walker::{redact_owned, redact_value, Redaction};

/// Redact `text` with one-off rule text (rules joined by `;`)
pub fn redact_json<'a>(text: &'a str, field_configs: &str, default_mask: char) -> Cow<'a, str> {
    let config = RedactConfig {
        default_mask,
        rule_delimiter: DEFAULT_RULE_DELIMITER,
        field_configs: field_configs.to_string(),
        ..Default::default()
    };
    FieldRedactor::new(config).redact(text)
}

/// Field redactor
///
/// Holds a parsed rule set and is immutable afterwards, so one instance can
/// serve any number of documents from any number of threads.
///
/// # Example (Python)
/// ```python
/// from field_redactor import FieldRedactor
///
/// redactor = FieldRedactor({"field_configs": "user.phone:PHONE;items[*].card:BANK_CARD"})
/// redactor.redact('{"user": {"phone": "13812345678"}}')
/// # '{"user":{"phone":"138****5678"}}'
/// ```
#[cfg_attr(feature = "python", pyclass(name = "FieldRedactor"))]
#[derive(Debug, Clone)]
pub struct FieldRedactor {
    rules: RuleSet,
    config: RedactConfig,
    diagnostics: Vec<ConfigError>,
}

impl FieldRedactor {
    /// Build from configuration; broken rules are reported in `diagnostics()`
    pub fn new(config: RedactConfig) -> Self {
        let (rules, diagnostics) = RuleSet::from_config(&config);
        Self {
            rules,
            config,
            diagnostics,
        }
    }

    /// Build around an already constructed rule set
    ///
    /// `config.field_configs` is ignored; `config.default_mask` replaces the
    /// rule set's own default mask.
    pub fn with_rules(rules: RuleSet, config: RedactConfig) -> Self {
        Self {
            rules: rules.with_default_mask(config.default_mask),
            config,
            diagnostics: Vec::new(),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn config(&self) -> &RedactConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &[ConfigError] {
        &self.diagnostics
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Redact document text
    ///
    /// The input comes back borrowed, byte for byte, when redaction is
    /// disabled, there are no rules, the text is not valid JSON, the root is
    /// not an object, or no rule matched.
    pub fn redact<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !self.is_enabled() || self.rules.is_empty() {
            return Cow::Borrowed(text);
        }

        match self.redact_text(text) {
            Ok(Some(redacted)) => Cow::Owned(redacted),
            Ok(None) => Cow::Borrowed(text),
            Err(err) => {
                debug!(error = %err, "passing document through unredacted");
                Cow::Borrowed(text)
            }
        }
    }

    /// Redact a parsed document
    pub fn redact_value(&self, value: &Value) -> Value {
        if !self.is_enabled() {
            return value.clone();
        }
        redact_value(value, &self.rules).value
    }

    /// `Ok(None)` when nothing was redacted
    fn redact_text(&self, text: &str) -> Result<Option<String>, RedactError> {
        let document = parse_document(text)?;
        let Redaction { value, redacted } = redact_owned(document, &self.rules);

        debug!(redacted, "redacted document");
        if redacted == 0 {
            return Ok(None);
        }
        to_text(&value).map(Some)
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl FieldRedactor {
    /// Create a new field redactor
    ///
    /// # Configuration Keys
    /// * `enabled` (bool): Global switch (default: True)
    /// * `default_mask` (str): Single mask character (default: "*")
    /// * `rule_delimiter` (str): Separator between rules (default: ";")
    /// * `field_configs` (str): Rules, e.g. "user.phone:PHONE;items[*].pwd:PASSWORD"
    #[new]
    pub fn py_new(config_dict: &Bound<'_, PyDict>) -> PyResult<Self> {
        let config = RedactConfig::from_py_dict(config_dict).map_err(|e| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!("Invalid config: {}", e))
        })?;

        Ok(Self::new(config))
    }

    /// Redact JSON text; invalid JSON is returned unchanged
    #[pyo3(name = "redact")]
    pub fn py_redact(&self, text: &str) -> String {
        self.redact(text).into_owned()
    }

    /// Number of loaded rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Problems found while loading the rules
    #[pyo3(name = "diagnostics")]
    pub fn py_diagnostics(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }

    #[staticmethod]
    pub fn is_valid_json(text: &str) -> bool {
        super::codec::is_valid_json(text)
    }
}
