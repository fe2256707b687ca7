// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Field-path redaction of sensitive values in JSON documents
// Optional PyO3 bindings behind the `python` feature

pub mod field_redact;

pub use field_redact::{is_valid_json, redact_json, FieldRedactor, RedactConfig, RuleSet};

/// Python module: field_redactor
///
/// Redacts configured fields of JSON documents before they leave the process.
///
/// # Examples
///
/// ```python
/// from field_redactor import FieldRedactor
///
/// config = {
///     "default_mask": "*",
///     "field_configs": "user.phone:PHONE;user.idCard:ID_CARD;items[*].secret:PASSWORD",
/// }
/// redactor = FieldRedactor(config)
///
/// text = '{"user": {"phone": "13812345678"}}'
/// print(redactor.redact(text))  # {"user":{"phone":"138****5678"}}
/// print(FieldRedactor.is_valid_json("{not json"))  # False
/// ```
#[cfg(feature = "python")]
#[pyo3::pymodule]
fn field_redactor(m: &pyo3::Bound<'_, pyo3::types::PyModule>) -> pyo3::PyResult<()> {
    use pyo3::prelude::*;

    m.add_class::<field_redact::FieldRedactor>()?;

    // Module metadata
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add(
        "__doc__",
        "Field-path redaction of sensitive values in JSON documents",
    )?;

    Ok(())
}
