// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Document traversal: rebuilds a JSON tree with matched scalars masked

use serde_json::{Map, Value};
use std::borrow::Cow;

use super::path::{ConcretePath, PatternPath};
use super::rules::RuleSet;

/// Result of redacting one document
#[derive(Debug, Clone, PartialEq)]
pub struct Redaction {
    pub value: Value,
    /// Number of scalars a rule was applied to
    pub redacted: usize,
}

/// Redact a borrowed document; the input is left untouched
pub fn redact_value(root: &Value, rules: &RuleSet) -> Redaction {
    redact_owned(root.clone(), rules)
}

/// Redact a document, reusing its allocations
///
/// Only object roots are walked; arrays and scalars at the root come back
/// unchanged, as does everything when the rule set is empty.
pub fn redact_owned(root: Value, rules: &RuleSet) -> Redaction {
    match root {
        Value::Object(map) if !rules.is_empty() => {
            let mut walker = Walker {
                rules,
                path: ConcretePath::new(),
                redacted: 0,
            };
            let value = Value::Object(walker.walk_object(map));
            Redaction {
                value,
                redacted: walker.redacted,
            }
        }
        other => Redaction {
            value: other,
            redacted: 0,
        },
    }
}

/// Text of every non-null scalar at or below `pattern`, in document order
///
/// Unlike rule resolution, an array named by the pattern yields its
/// elements. Indices are not compared: `items[0].p` selects `p` in every
/// element, as `items[*].p` does.
pub fn extract_values(root: &Value, pattern: &PatternPath) -> Vec<String> {
    let mut values = Vec::new();
    let mut path = ConcretePath::new();
    collect(root, pattern, &mut path, &mut values);
    values
}

/// String form a scalar is masked from; numbers keep their source digits
pub fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

struct Walker<'r> {
    rules: &'r RuleSet,
    path: ConcretePath,
    redacted: usize,
}

impl Walker<'_> {
    fn walk_object(&mut self, map: Map<String, Value>) -> Map<String, Value> {
        map.into_iter()
            .map(|(name, child)| {
                self.path.push_field(&name);
                let child = self.walk_child(child);
                self.path.pop();
                (name, child)
            })
            .collect()
    }

    fn walk_array(&mut self, items: Vec<Value>) -> Vec<Value> {
        items
            .into_iter()
            .enumerate()
            .map(|(idx, child)| {
                self.path.push_index(idx);
                let child = self.walk_child(child);
                self.path.pop();
                child
            })
            .collect()
    }

    fn walk_child(&mut self, child: Value) -> Value {
        match child {
            Value::Object(map) => Value::Object(self.walk_object(map)),
            Value::Array(items) => Value::Array(self.walk_array(items)),
            // nothing to redact
            Value::Null => Value::Null,
            scalar => self.mask_scalar(scalar),
        }
    }

    fn mask_scalar(&mut self, scalar: Value) -> Value {
        let Some(rule) = self.rules.resolve(&self.path) else {
            return scalar;
        };
        let Some(text) = scalar_text(&scalar) else {
            return scalar;
        };

        let masked = rule.apply(&text, self.rules.default_mask());
        self.redacted += 1;
        Value::String(masked)
    }
}

fn collect(node: &Value, pattern: &PatternPath, path: &mut ConcretePath, out: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            for (name, child) in map {
                path.push_field(name);
                collect(child, pattern, path, out);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                path.push_index(idx);
                collect(child, pattern, path, out);
                path.pop();
            }
        }
        scalar => {
            if pattern.covers_concrete(path) {
                if let Some(text) = scalar_text(scalar) {
                    out.push(text.into_owned());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules(text: &str) -> RuleSet {
        RuleSet::parse(text, ';')
    }

    #[test]
    fn test_wildcard_masks_every_element() {
        let doc = json!({"items": [{"phone": "13812345678"}, {"phone": "13900001111"}]});
        let out = redact_value(&doc, &rules("items[*].phone:PHONE"));
        assert_eq!(
            out.value,
            json!({"items": [{"phone": "138****5678"}, {"phone": "139****1111"}]})
        );
        assert_eq!(out.redacted, 2);
    }

    #[test]
    fn test_unmatched_fields_untouched() {
        let doc = json!({
            "user": {"phone": "13812345678", "password": "hunter2", "age": 30},
            "active": true
        });
        let out = redact_value(&doc, &rules("user.phone:PHONE"));
        assert_eq!(
            out.value,
            json!({
                "user": {"phone": "138****5678", "password": "hunter2", "age": 30},
                "active": true
            })
        );
    }

    #[test]
    fn test_numbers_and_bools_become_strings() {
        let doc = json!({"card": 6222021234567890_u64, "flag": true, "pin": 1234});
        let out = redact_value(&doc, &rules("card:BANK_CARD;flag:PASSWORD;pin:PASSWORD"));
        assert_eq!(
            out.value,
            json!({"card": "************7890", "flag": "****", "pin": "****"})
        );
    }

    #[test]
    fn test_null_is_never_masked() {
        let doc = json!({"phone": null, "items": [null, "secret"]});
        let out = redact_value(&doc, &rules("phone:PHONE;items[*]:PASSWORD"));
        assert_eq!(out.value, json!({"phone": null, "items": [null, "******"]}));
        assert_eq!(out.redacted, 1);
    }

    #[test]
    fn test_non_object_root_unchanged() {
        let rules = rules("[0]:PASSWORD;a:PASSWORD");
        for doc in [json!([{"a": "x"}]), json!("secret"), json!(42), json!(null)] {
            let out = redact_value(&doc, &rules);
            assert_eq!(out.value, doc);
            assert_eq!(out.redacted, 0);
        }
    }

    #[test]
    fn test_prefix_rule_covers_nested_object() {
        let doc = json!({"user": {"contact": {"email": "ab@x.io", "city": "Paris"}, "id": 7}});
        let out = redact_value(&doc, &rules("user.contact:PASSWORD"));
        assert_eq!(
            out.value,
            json!({"user": {"contact": {"email": "*******", "city": "*****"}, "id": 7}})
        );
    }

    #[test]
    fn test_array_of_scalars() {
        let doc = json!({"tags": ["alpha", "beta"], "matrix": [["ab", "cd"], ["ef"]]});
        let out = redact_value(&doc, &rules("tags[*]:USERNAME;matrix[*][*]:PASSWORD"));
        assert_eq!(
            out.value,
            json!({"tags": ["****a", "***a"], "matrix": [["**", "**"], ["**"]]})
        );
    }

    #[test]
    fn test_array_rule_without_wildcard_does_not_cover_elements() {
        let doc = json!({"tags": ["alpha", "beta"]});
        let out = redact_value(&doc, &rules("tags:PASSWORD"));
        assert_eq!(out.value, doc);
    }

    #[test]
    fn test_key_order_preserved() {
        let doc: Value = serde_json::from_str(r#"{"z": "1", "a": "13812345678", "m": "2"}"#).unwrap();
        let out = redact_value(&doc, &rules("a:PHONE"));
        let keys: Vec<&str> = out.value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_input_is_not_modified() {
        let doc = json!({"phone": "13812345678"});
        let before = doc.clone();
        let _ = redact_value(&doc, &rules("phone:PHONE"));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_empty_rules_pass_through() {
        let doc = json!({"phone": "13812345678"});
        let out = redact_value(&doc, &RuleSet::new());
        assert_eq!(out.value, doc);
        assert_eq!(out.redacted, 0);
    }

    #[test]
    fn test_rule_mask_char_and_default_mask() {
        let doc = json!({"a": "secret", "b": "secret"});
        let rules = RuleSet::parse("a:PASSWORD:maskChar:#;b:PASSWORD", ';').with_default_mask('x');
        let out = redact_value(&doc, &rules);
        assert_eq!(out.value, json!({"a": "######", "b": "xxxxxx"}));
    }

    #[test]
    fn test_extract_values() {
        let doc = json!({
            "items": [{"phone": "1", "name": "a"}, {"phone": 2}, {"phone": null}],
            "user": {"contact": {"phone": "3", "tags": ["x", true]}}
        });

        let phones = extract_values(&doc, &PatternPath::parse("items[*].phone").unwrap());
        assert_eq!(phones, ["1", "2"]);

        let contact = extract_values(&doc, &PatternPath::parse("user.contact").unwrap());
        assert_eq!(contact, ["3", "x", "true"]);

        let none = extract_values(&doc, &PatternPath::parse("missing").unwrap());
        assert!(none.is_empty());
    }

    #[test]
    fn test_extract_array_elements() {
        let doc = json!({
            "tags": ["a", "b", null],
            "grid": [["1", "2"], [3]],
            "items": [{"p": "1"}, {"p": "2"}]
        });

        let tags = extract_values(&doc, &PatternPath::parse("tags").unwrap());
        assert_eq!(tags, ["a", "b"]);

        let grid = extract_values(&doc, &PatternPath::parse("grid").unwrap());
        assert_eq!(grid, ["1", "2", "3"]);

        // indices in the pattern are not compared
        let first = extract_values(&doc, &PatternPath::parse("items[0].p").unwrap());
        assert_eq!(first, ["1", "2"]);
    }
}
