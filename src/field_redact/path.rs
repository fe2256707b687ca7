// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Field paths: concrete locations inside a document and the patterns rules
// are declared with. Matching is segment-wise; patterns are never turned
// into regular expressions.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;

// `name` followed by any number of `[N]` / `[*]` suffixes
static SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^\[\]]+)((?:\[(?:\d+|\*)\])*)$").expect("segment pattern is valid")
});

/// One step of a concrete path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// One step of a declared pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternSegment {
    Field(String),
    /// Matches any array index
    Wildcard,
}

impl PatternSegment {
    pub fn matches(&self, segment: &PathSegment) -> bool {
        match (self, segment) {
            (PatternSegment::Wildcard, PathSegment::Index(_)) => true,
            (PatternSegment::Field(want), PathSegment::Field(got)) => want == got,
            _ => false,
        }
    }
}

/// How a pattern matched a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Same length, every segment equal
    Exact,
    /// The pattern covers an ancestor object of the path
    Prefix,
}

/// Location of a value inside a document, built up while walking it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConcretePath {
    segments: Vec<PathSegment>,
}

impl ConcretePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_field(&mut self, name: &str) {
        self.segments.push(PathSegment::Field(name.to_string()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// `items[3].phone` -> `items[*].phone`
    pub fn normalize(&self) -> PatternPath {
        let segments = self
            .segments
            .iter()
            .map(|segment| match segment {
                PathSegment::Field(name) => PatternSegment::Field(name.clone()),
                PathSegment::Index(_) => PatternSegment::Wildcard,
            })
            .collect();
        PatternPath { segments }
    }
}

impl fmt::Display for ConcretePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if idx == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Declared field-path pattern such as `user.contacts[*].phone`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatternPath {
    segments: Vec<PatternSegment>,
}

impl PatternPath {
    pub fn from_segments(segments: Vec<PatternSegment>) -> Self {
        Self { segments }
    }

    /// Parse pattern text
    ///
    /// Segments are split on `.`; each may carry `[N]` or `[*]` suffixes,
    /// which all become `Wildcard` segments (rules are index-agnostic).
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let text = text.trim();
        let invalid = |reason: String| ConfigError::InvalidPath {
            path: text.to_string(),
            reason,
        };

        if text.is_empty() {
            return Err(invalid("path is empty".to_string()));
        }

        let mut segments = Vec::new();
        for piece in text.split('.') {
            let caps = SEGMENT
                .captures(piece)
                .ok_or_else(|| invalid(format!("malformed segment `{}`", piece)))?;

            segments.push(PatternSegment::Field(caps[1].to_string()));
            let wildcards = caps[2].matches('[').count();
            segments.extend(std::iter::repeat(PatternSegment::Wildcard).take(wildcards));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Compare against a normalized path
    pub fn match_kind(&self, normalized: &PatternPath) -> Option<MatchKind> {
        if self.segments == normalized.segments {
            return Some(MatchKind::Exact);
        }
        if self.is_field_prefix_of(normalized) {
            return Some(MatchKind::Prefix);
        }
        None
    }

    /// True when `other` starts with this pattern and continues with a
    /// field segment, i.e. at a `.` boundary.
    pub fn is_field_prefix_of(&self, other: &PatternPath) -> bool {
        let len = self.segments.len();
        len > 0
            && other.segments.len() > len
            && other.segments[..len] == self.segments[..]
            && matches!(other.segments[len], PatternSegment::Field(_))
    }

    /// Segment-wise match against a concrete path without normalizing it
    pub fn matches_concrete(&self, path: &ConcretePath) -> Option<MatchKind> {
        let len = self.segments.len();
        let theirs = path.segments();
        if len == 0 || theirs.len() < len {
            return None;
        }

        let head_matches = self
            .segments
            .iter()
            .zip(theirs)
            .all(|(pattern, segment)| pattern.matches(segment));
        if !head_matches {
            return None;
        }

        match theirs.get(len) {
            None => Some(MatchKind::Exact),
            Some(PathSegment::Field(_)) => Some(MatchKind::Prefix),
            Some(PathSegment::Index(_)) => None,
        }
    }

    /// True when `path` is this pattern or lies anywhere below it, array
    /// elements included
    pub fn covers_concrete(&self, path: &ConcretePath) -> bool {
        let len = self.segments.len();
        let theirs = path.segments();
        len > 0
            && theirs.len() >= len
            && self
                .segments
                .iter()
                .zip(theirs)
                .all(|(pattern, segment)| pattern.matches(segment))
    }
}

impl FromStr for PatternPath {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PatternPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                PatternSegment::Field(name) if idx == 0 => f.write_str(name)?,
                PatternSegment::Field(name) => write!(f, ".{}", name)?,
                PatternSegment::Wildcard => f.write_str("[*]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> PatternSegment {
        PatternSegment::Field(name.to_string())
    }

    fn concrete(build: impl FnOnce(&mut ConcretePath)) -> ConcretePath {
        let mut path = ConcretePath::new();
        build(&mut path);
        path
    }

    #[test]
    fn test_parse_plain_fields() {
        let pattern = PatternPath::parse("user.profile.phone").unwrap();
        assert_eq!(
            pattern.segments(),
            &[field("user"), field("profile"), field("phone")]
        );
    }

    #[test]
    fn test_parse_index_and_wildcard_are_equivalent() {
        let star = PatternPath::parse("items[*].phone").unwrap();
        let index = PatternPath::parse("items[3].phone").unwrap();
        assert_eq!(star, index);
        assert_eq!(
            star.segments(),
            &[field("items"), PatternSegment::Wildcard, field("phone")]
        );
    }

    #[test]
    fn test_parse_nested_arrays() {
        let pattern = PatternPath::parse("matrix[*][0]").unwrap();
        assert_eq!(
            pattern.segments(),
            &[field("matrix"), PatternSegment::Wildcard, PatternSegment::Wildcard]
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "  ", "a..b", ".a", "a.", "a[x]", "a[*", "[*].a", "a]b"] {
            assert!(
                matches!(PatternPath::parse(bad), Err(ConfigError::InvalidPath { .. })),
                "expected `{}` to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_display_round_trips() {
        for text in ["user.phone", "items[*].phone", "matrix[*][*]", "a[*].b[*].c"] {
            assert_eq!(PatternPath::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_normalize() {
        let path = concrete(|p| {
            p.push_field("items");
            p.push_index(3);
            p.push_field("phone");
        });
        assert_eq!(path.to_string(), "items[3].phone");
        assert_eq!(path.normalize(), PatternPath::parse("items[*].phone").unwrap());
    }

    #[test]
    fn test_match_kind_exact_and_prefix() {
        let normalized = PatternPath::parse("user.contact.phone").unwrap();

        let exact = PatternPath::parse("user.contact.phone").unwrap();
        assert_eq!(exact.match_kind(&normalized), Some(MatchKind::Exact));

        let prefix = PatternPath::parse("user.contact").unwrap();
        assert_eq!(prefix.match_kind(&normalized), Some(MatchKind::Prefix));

        let other = PatternPath::parse("user.phone").unwrap();
        assert_eq!(other.match_kind(&normalized), None);
    }

    #[test]
    fn test_prefix_needs_field_boundary() {
        let tags = PatternPath::parse("tags").unwrap();
        let element = PatternPath::parse("tags[*]").unwrap();
        assert!(!tags.is_field_prefix_of(&element));

        let nested = PatternPath::parse("tags[*].name").unwrap();
        assert!(element.is_field_prefix_of(&nested));
    }

    #[test]
    fn test_prefix_is_segment_aware() {
        // "user" must not cover "username"
        let user = PatternPath::parse("user").unwrap();
        let username = PatternPath::parse("username.first").unwrap();
        assert_eq!(user.match_kind(&username), None);
    }

    #[test]
    fn test_matches_concrete_agrees_with_normalize() {
        let path = concrete(|p| {
            p.push_field("orders");
            p.push_index(0);
            p.push_field("card");
            p.push_field("number");
        });
        let normalized = path.normalize();

        for text in ["orders[*].card.number", "orders[*].card", "orders", "orders[*]", "card"] {
            let pattern = PatternPath::parse(text).unwrap();
            assert_eq!(
                pattern.matches_concrete(&path),
                pattern.match_kind(&normalized),
                "disagreement for `{}`",
                text
            );
        }
    }

    #[test]
    fn test_covers_concrete_includes_array_elements() {
        let tags = PatternPath::parse("tags").unwrap();
        let element = concrete(|p| {
            p.push_field("tags");
            p.push_index(1);
        });
        assert!(tags.covers_concrete(&element));
        assert_eq!(tags.matches_concrete(&element), None);

        let item = PatternPath::parse("items[0].p").unwrap();
        let other = concrete(|p| {
            p.push_field("items");
            p.push_index(5);
            p.push_field("p");
        });
        assert!(item.covers_concrete(&other));
        assert!(!PatternPath::parse("items.p").unwrap().covers_concrete(&other));
        assert!(!PatternPath::parse("tagz").unwrap().covers_concrete(&element));
    }
}
