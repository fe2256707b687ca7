// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Configuration types for field-path redaction

#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use pyo3::types::PyDict;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ParseStrategyError;

/// Default mask character
pub const DEFAULT_MASK: char = '*';

/// Default separator between rules in rule text
pub const DEFAULT_RULE_DELIMITER: char = ';';

/// Redaction strategies a rule can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyKind {
    Username,
    IdCard,
    Phone,
    Email,
    BankCard,
    ChineseName,
    Password,
    Address,
    Custom,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 9] = [
        StrategyKind::Username,
        StrategyKind::IdCard,
        StrategyKind::Phone,
        StrategyKind::Email,
        StrategyKind::BankCard,
        StrategyKind::ChineseName,
        StrategyKind::Password,
        StrategyKind::Address,
        StrategyKind::Custom,
    ];

    /// Name used in rule text
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Username => "USERNAME",
            StrategyKind::IdCard => "ID_CARD",
            StrategyKind::Phone => "PHONE",
            StrategyKind::Email => "EMAIL",
            StrategyKind::BankCard => "BANK_CARD",
            StrategyKind::ChineseName => "CHINESE_NAME",
            StrategyKind::Password => "PASSWORD",
            StrategyKind::Address => "ADDRESS",
            StrategyKind::Custom => "CUSTOM",
        }
    }

    /// Built-in `(start_keep, end_keep)` for strategies driven by keep-counts.
    ///
    /// Email and Password have their own algorithms and return `None`.
    pub fn default_keep(&self) -> Option<(u32, u32)> {
        match self {
            StrategyKind::Username | StrategyKind::ChineseName => Some((0, 1)),
            StrategyKind::IdCard | StrategyKind::Address => Some((6, 4)),
            StrategyKind::Phone => Some((3, 4)),
            StrategyKind::BankCard => Some((0, 4)),
            StrategyKind::Custom => Some((0, 0)),
            StrategyKind::Email | StrategyKind::Password => None,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseStrategyError(wanted.to_string()))
    }
}

/// Fully resolved masking parameters for one value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskParams {
    pub start_keep: u32,
    pub end_keep: u32,
    pub mask_char: char,
}

/// Per-rule parameter overrides; any field left `None` falls back to the
/// strategy default (keep-counts) or the rule set default (mask char).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParamOverrides {
    pub start_keep: Option<u32>,
    pub end_keep: Option<u32>,
    pub mask_char: Option<char>,
}

impl ParamOverrides {
    pub fn is_empty(&self) -> bool {
        self.start_keep.is_none() && self.end_keep.is_none() && self.mask_char.is_none()
    }

    /// Resolve against a strategy's defaults
    pub fn resolve(&self, strategy: StrategyKind, default_mask: char) -> MaskParams {
        let (start, end) = strategy.default_keep().unwrap_or((0, 0));
        MaskParams {
            start_keep: self.start_keep.unwrap_or(start),
            end_keep: self.end_keep.unwrap_or(end),
            mask_char: self.mask_char.unwrap_or(default_mask),
        }
    }
}

impl fmt::Display for ParamOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(start) = self.start_keep {
            parts.push(format!("startKeep:{}", start));
        }
        if let Some(end) = self.end_keep {
            parts.push(format!("endKeep:{}", end));
        }
        if let Some(mask) = self.mask_char {
            parts.push(format!("maskChar:{}", mask));
        }
        f.write_str(&parts.join(","))
    }
}

/// Configuration for the field redactor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedactConfig {
    /// Global switch; when off, documents pass through untouched
    pub enabled: bool,

    /// Mask character for rules without an explicit `maskChar`
    pub default_mask: char,

    /// Separator between rules in `field_configs`
    pub rule_delimiter: char,

    /// Rule text: `path:STRATEGY[:key:value,...]` joined by `rule_delimiter`
    pub field_configs: String,
}

impl Default for RedactConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_mask: DEFAULT_MASK,
            rule_delimiter: DEFAULT_RULE_DELIMITER,
            field_configs: String::new(),
        }
    }
}

impl RedactConfig {
    /// Config with the given rule text and defaults for everything else
    pub fn with_rules(field_configs: impl Into<String>) -> Self {
        Self {
            field_configs: field_configs.into(),
            ..Default::default()
        }
    }

    /// Extract configuration from Python dict
    #[cfg(feature = "python")]
    pub fn from_py_dict(dict: &Bound<'_, PyDict>) -> PyResult<Self> {
        let mut config = Self::default();

        if let Some(value) = dict.get_item("enabled")? {
            config.enabled = value.extract()?;
        }
        if let Some(value) = dict.get_item("default_mask")? {
            config.default_mask = value.extract()?;
        }
        if let Some(value) = dict.get_item("rule_delimiter")? {
            config.rule_delimiter = value.extract()?;
        }
        if let Some(value) = dict.get_item("field_configs")? {
            config.field_configs = value.extract()?;
        }

        Ok(config)
    }
}
