// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Rule set construction from rule text
//
// Grammar: `fieldPath:STRATEGY[:key:value,key:value,...]`, rules joined by a
// configurable delimiter (`;` by default). Recognised keys are `startKeep`,
// `endKeep` (0..=1000) and `maskChar` (exactly one char).
//
// Loading is fail-open per rule: a bad rule is dropped and a bad parameter
// falls back to its default. A rule that fails to load therefore leaves its
// field unredacted rather than over-redacting the document.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use super::config::{
    MaskParams, ParamOverrides, RedactConfig, StrategyKind, DEFAULT_MASK, DEFAULT_RULE_DELIMITER,
};
use super::error::ConfigError;
use super::masking::apply_strategy;
use super::path::{ConcretePath, PatternPath};

/// Largest accepted `startKeep` / `endKeep`
pub const MAX_KEEP: i64 = 1000;

/// One declared rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionRule {
    pub pattern: PatternPath,
    pub strategy: StrategyKind,
    pub params: Option<ParamOverrides>,
}

impl RedactionRule {
    pub fn new(pattern: PatternPath, strategy: StrategyKind) -> Self {
        Self {
            pattern,
            strategy,
            params: None,
        }
    }

    pub fn with_params(mut self, params: ParamOverrides) -> Self {
        self.params = (!params.is_empty()).then_some(params);
        self
    }

    /// Keep-counts and mask char this rule masks with
    pub fn mask_params(&self, default_mask: char) -> MaskParams {
        self.params
            .unwrap_or_default()
            .resolve(self.strategy, default_mask)
    }

    /// Mask one value with this rule
    pub fn apply(&self, value: &str, default_mask: char) -> String {
        apply_strategy(value, self.strategy, self.mask_params(default_mask))
    }

    /// Parse a single rule; parameter problems are pushed to `diagnostics`
    /// and do not reject the rule.
    pub fn parse(text: &str, diagnostics: &mut Vec<ConfigError>) -> Result<Self, ConfigError> {
        let text = text.trim();
        let mut parts = text.splitn(3, ':');

        let (path, strategy) = match (parts.next(), parts.next()) {
            (Some(path), Some(strategy)) if !strategy.trim().is_empty() => (path, strategy),
            _ => {
                return Err(ConfigError::MalformedRule {
                    rule: text.to_string(),
                })
            }
        };

        let strategy: StrategyKind =
            strategy
                .parse()
                .map_err(|_| ConfigError::UnknownStrategy {
                    rule: text.to_string(),
                    name: strategy.trim().to_string(),
                })?;
        let pattern = PatternPath::parse(path)?;

        let mut rule = RedactionRule::new(pattern, strategy);
        if let Some(params) = parts.next() {
            let path = rule.pattern.to_string();
            rule = rule.with_params(parse_params(&path, params, diagnostics));
        }

        Ok(rule)
    }
}

impl fmt::Display for RedactionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pattern, self.strategy)?;
        match &self.params {
            Some(params) if !params.is_empty() => write!(f, ":{}", params),
            _ => Ok(()),
        }
    }
}

/// Parse `key:value,key:value`
fn parse_params(path: &str, text: &str, diagnostics: &mut Vec<ConfigError>) -> ParamOverrides {
    let mut params = ParamOverrides::default();

    for pair in text.split(',') {
        if pair.trim().is_empty() {
            continue;
        }

        let Some((key, value)) = pair.split_once(':') else {
            diagnostics.push(ConfigError::InvalidParam {
                path: path.to_string(),
                key: pair.trim().to_string(),
                value: String::new(),
            });
            continue;
        };
        let key = key.trim();

        match key.to_ascii_lowercase().as_str() {
            "startkeep" => params.start_keep = parse_keep(path, key, value, diagnostics),
            "endkeep" => params.end_keep = parse_keep(path, key, value, diagnostics),
            "maskchar" => params.mask_char = parse_mask_char(path, key, value, diagnostics),
            _ => diagnostics.push(ConfigError::UnknownParam {
                path: path.to_string(),
                key: key.to_string(),
            }),
        }
    }

    params
}

fn parse_keep(
    path: &str,
    key: &str,
    value: &str,
    diagnostics: &mut Vec<ConfigError>,
) -> Option<u32> {
    let value = value.trim();
    let error = |out_of_range: bool| {
        let (path, key, value) = (path.to_string(), key.to_string(), value.to_string());
        if out_of_range {
            ConfigError::ParamOutOfRange { path, key, value }
        } else {
            ConfigError::InvalidParam { path, key, value }
        }
    };

    match value.parse::<i64>() {
        Ok(n) if (0..=MAX_KEEP).contains(&n) => u32::try_from(n).ok(),
        Ok(_) => {
            diagnostics.push(error(true));
            None
        }
        Err(_) => {
            let digits = value.strip_prefix('-').unwrap_or(value);
            let overflowed = !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit());
            diagnostics.push(error(overflowed));
            None
        }
    }
}

fn parse_mask_char(
    path: &str,
    key: &str,
    value: &str,
    diagnostics: &mut Vec<ConfigError>,
) -> Option<char> {
    // A lone space is a legal mask char; otherwise ignore padding.
    let candidate = if value.chars().count() == 1 {
        value
    } else {
        value.trim()
    };

    let mut chars = candidate.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => {
            diagnostics.push(ConfigError::InvalidParam {
                path: path.to_string(),
                key: key.to_string(),
                value: value.to_string(),
            });
            None
        }
    }
}

/// Split rule text on the delimiter.
///
/// With `,` as delimiter a parameter list is itself comma separated, so a
/// chunk that reads as `knownKey:value` is glued back onto the rule before it.
fn split_rules(text: &str, delimiter: char) -> Vec<String> {
    let mut rules: Vec<String> = Vec::new();

    for chunk in text.split(delimiter) {
        if delimiter == ',' && is_param_chunk(chunk) {
            if let Some(last) = rules.last_mut() {
                last.push(',');
                last.push_str(chunk);
                continue;
            }
        }
        rules.push(chunk.to_string());
    }

    rules
}

fn is_param_chunk(chunk: &str) -> bool {
    let Some((key, value)) = chunk.split_once(':') else {
        return false;
    };
    let known = ["startkeep", "endkeep", "maskchar"]
        .contains(&key.trim().to_ascii_lowercase().as_str());
    known && value.parse::<StrategyKind>().is_err()
}

/// Rules keyed by normalized pattern, in registration order
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<RedactionRule>,
    index: HashMap<PatternPath, usize>,
    default_mask: char,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            index: HashMap::new(),
            default_mask: DEFAULT_MASK,
        }
    }

    pub fn with_default_mask(mut self, mask_char: char) -> Self {
        self.default_mask = mask_char;
        self
    }

    /// Build from rule text, logging and discarding diagnostics
    pub fn parse(text: &str, delimiter: char) -> Self {
        Self::parse_with_diagnostics(text, delimiter).0
    }

    /// Build from rule text
    ///
    /// # Returns
    /// The rules that loaded, plus one diagnostic per dropped rule or
    /// defaulted parameter
    pub fn parse_with_diagnostics(text: &str, delimiter: char) -> (Self, Vec<ConfigError>) {
        let mut rules = Self::new();
        let mut diagnostics = Vec::new();

        for chunk in split_rules(text, delimiter) {
            if chunk.trim().is_empty() {
                continue;
            }
            match RedactionRule::parse(&chunk, &mut diagnostics) {
                Ok(rule) => {
                    rules.insert(rule);
                }
                Err(err) => diagnostics.push(err),
            }
        }

        for err in &diagnostics {
            warn!(error = %err, "redaction rule problem");
        }
        debug!(
            rules = rules.len(),
            diagnostics = diagnostics.len(),
            "loaded redaction rules"
        );

        (rules, diagnostics)
    }

    /// Build from a `RedactConfig` (rule text, delimiter and default mask)
    pub fn from_config(config: &RedactConfig) -> (Self, Vec<ConfigError>) {
        let (rules, diagnostics) =
            Self::parse_with_diagnostics(&config.field_configs, config.rule_delimiter);
        (rules.with_default_mask(config.default_mask), diagnostics)
    }

    /// Register a rule. An identical pattern replaces the earlier rule in
    /// place and the replaced rule is returned.
    pub fn insert(&mut self, rule: RedactionRule) -> Option<RedactionRule> {
        match self.index.get(&rule.pattern) {
            Some(&idx) => Some(std::mem::replace(&mut self.rules[idx], rule)),
            None => {
                self.index.insert(rule.pattern.clone(), self.rules.len());
                self.rules.push(rule);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
        self.index.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &RedactionRule> {
        self.rules.iter()
    }

    pub fn default_mask(&self) -> char {
        self.default_mask
    }

    /// Find the rule for a concrete path
    ///
    /// Priority: exact match on the normalized path, then the longest
    /// pattern covering an ancestor object, then registration order.
    pub fn resolve(&self, path: &ConcretePath) -> Option<&RedactionRule> {
        if self.rules.is_empty() {
            return None;
        }
        self.resolve_normalized(&path.normalize())
    }

    pub fn resolve_normalized(&self, normalized: &PatternPath) -> Option<&RedactionRule> {
        if let Some(rule) = self.index.get(normalized).and_then(|&idx| self.rules.get(idx)) {
            return Some(rule);
        }

        self.rules
            .iter()
            .filter(|rule| rule.pattern.is_field_prefix_of(normalized))
            .min_by_key(|rule| Reverse(rule.pattern.len()))
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, rule) in self.rules.iter().enumerate() {
            if idx > 0 {
                write!(f, "{}", DEFAULT_RULE_DELIMITER)?;
            }
            write!(f, "{}", rule)?;
        }
        Ok(())
    }
}

impl FromIterator<RedactionRule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = RedactionRule>>(iter: I) -> Self {
        let mut rules = Self::new();
        for rule in iter {
            rules.insert(rule);
        }
        rules
    }
}
