//! Content items - the unit everything else indexes and renders

use chrono::NaiveDateTime;
use serde_yaml::{Mapping, Value};
use std::path::PathBuf;

use crate::helpers::date::parse_date_value;

/// Tag assigned to posts that declare no tags of their own
pub const UNTAGGED: &str = "untagged";

/// Parsed front-matter of a content item, an open key-value mapping
#[derive(Debug, Clone, Default)]
pub struct Metadata(Mapping);

impl Metadata {
    pub fn new() -> Self {
        Self(Mapping::new())
    }

    /// Raw metadata value for a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value for a key, if the value is a string
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    /// Publication date, if a `date` key is present and parses
    pub fn date(&self) -> Option<NaiveDateTime> {
        self.get("date").and_then(parse_date_value)
    }

    /// Tag list under the `tags` key.
    ///
    /// Accepts a sequence of scalars or a single bare scalar; scalar
    /// values are coerced to strings. Returns `None` when the key is
    /// absent, null, or not scalar-shaped at all.
    pub fn tags(&self) -> Option<Vec<String>> {
        match self.get("tags")? {
            Value::Sequence(seq) => Some(seq.iter().filter_map(scalar_to_string).collect()),
            other => scalar_to_string(other).map(|tag| vec![tag]),
        }
    }

    /// Replace the `tags` key with the given list
    pub fn set_tags(&mut self, tags: Vec<String>) {
        let seq = tags.into_iter().map(Value::String).collect();
        self.0
            .insert(Value::String("tags".into()), Value::Sequence(seq));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Mapping> for Metadata {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

/// Coerce a scalar YAML value to a string, skipping everything else
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A loaded page or post
#[derive(Debug, Clone)]
pub struct ContentItem {
    /// Slash-separated path relative to the content root, extension stripped.
    /// This is the item's identity in URLs and lookups.
    pub path: String,
    pub metadata: Metadata,
    /// Rendered body, ready for templates
    pub body: String,
    /// File the item was loaded from, kept for diagnostics
    pub source: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(yaml: &str) -> Metadata {
        let mapping: Mapping = serde_yaml::from_str(yaml).unwrap();
        Metadata::from(mapping)
    }

    #[test]
    fn test_str_accessor() {
        let m = meta("title: Hello\ncount: 3");
        assert_eq!(m.str("title"), Some("Hello"));
        assert_eq!(m.str("count"), None);
        assert_eq!(m.str("missing"), None);
    }

    #[test]
    fn test_tags_from_sequence() {
        let m = meta("tags: [rust, blog]");
        assert_eq!(m.tags(), Some(vec!["rust".to_string(), "blog".to_string()]));
    }

    #[test]
    fn test_tags_from_bare_scalar() {
        let m = meta("tags: notes");
        assert_eq!(m.tags(), Some(vec!["notes".to_string()]));
    }

    #[test]
    fn test_tags_coerce_scalars() {
        let m = meta("tags: [2024, true, x]");
        assert_eq!(
            m.tags(),
            Some(vec!["2024".to_string(), "true".to_string(), "x".to_string()])
        );
    }

    #[test]
    fn test_tags_absent_or_null() {
        assert_eq!(meta("title: x").tags(), None);
        assert_eq!(meta("tags: null\ntitle: x").tags(), None);
    }

    #[test]
    fn test_set_tags_overwrites() {
        let mut m = meta("tags: []");
        m.set_tags(vec![UNTAGGED.to_string()]);
        assert_eq!(m.tags(), Some(vec![UNTAGGED.to_string()]));
    }

    #[test]
    fn test_date_parses() {
        let m = meta("date: 2020-01-25 09:30:00");
        let date = m.date().unwrap();
        assert_eq!(date.format("%Y-%m-%d %H:%M").to_string(), "2020-01-25 09:30");
    }

    #[test]
    fn test_date_absent() {
        assert_eq!(meta("title: x").date(), None);
    }
}
