// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Field-path redaction for JSON documents
//
// - Rules name scalar locations (`user.phone`, `items[*].card`) and a
//   masking strategy
// - The walker rebuilds the document, masking only matched scalars
// - Masking counts chars, so multi-byte text keeps its length

pub mod codec;
pub mod config;
pub mod error;
pub mod masking;
pub mod path;
pub mod redactor;
pub mod rules;
pub mod walker;

pub use codec::is_valid_json;
pub use config::{MaskParams, ParamOverrides, RedactConfig, StrategyKind};
pub use error::{ConfigError, ParseStrategyError, RedactError};
pub use masking::apply_strategy;
pub use path::{ConcretePath, PathSegment, PatternPath, PatternSegment};
pub use redactor::{redact_json, FieldRedactor};
pub use rules::{RedactionRule, RuleSet};
pub use walker::{extract_values, redact_value, Redaction};
