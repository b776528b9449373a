//! Frontmatter block splitting and parsing
//!
//! A note may open with a YAML metadata block delimited by `---` lines,
//! where the opening marker must be the very first line of the file:
//!
//! ```text
//! ---
//! title: Alpha
//! tags: [campaign, faction]
//! ---
//! body text
//! ```
//!
//! The parsed form is an insertion-ordered key/value map. YAML allows
//! arbitrary value shapes, but callers only ever interpret strings and
//! lists of strings; everything else is carried through as an opaque
//! payload so it survives serialization untouched.

use crate::error::{ParseError, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

const MARKER: &str = "---";

/// A single frontmatter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    /// A scalar string.
    String(String),
    /// A sequence whose elements are all strings.
    List(Vec<String>),
    /// Any other YAML shape, kept as-is.
    Other(serde_yaml::Value),
}

impl FrontmatterValue {
    fn from_yaml(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::String(s) => Self::String(s),
            serde_yaml::Value::Sequence(seq) if seq.iter().all(serde_yaml::Value::is_string) => {
                Self::List(
                    seq.into_iter()
                        .filter_map(|v| match v {
                            serde_yaml::Value::String(s) => Some(s),
                            _ => None,
                        })
                        .collect(),
                )
            }
            other => Self::Other(other),
        }
    }

    /// The value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Parsed frontmatter: an insertion-ordered key/value map.
///
/// Lookup is by first occurrence of a key; duplicate keys cannot be
/// produced by YAML parsing but are tolerated when built manually.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    entries: Vec<(String, FrontmatterValue)>,
}

impl Frontmatter {
    /// Create an empty frontmatter map.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Append a key/value pair, preserving insertion order.
    pub fn insert(&mut self, key: impl Into<String>, value: FrontmatterValue) {
        self.entries.push((key.into(), value));
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&FrontmatterValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Look up a string-typed value by key.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FrontmatterValue::as_str)
    }

    /// The `title` field, if present and a string.
    pub fn title(&self) -> Option<&str> {
        self.string("title")
    }

    /// The `type` field, if present and a string.
    pub fn note_type(&self) -> Option<&str> {
        self.string("type")
    }

    /// The `tags` field, accepting either a single string or a list.
    pub fn tags(&self) -> Vec<String> {
        match self.get("tags") {
            Some(FrontmatterValue::String(tag)) => vec![tag.clone()],
            Some(FrontmatterValue::List(tags)) => tags.clone(),
            _ => Vec::new(),
        }
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrontmatterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for Frontmatter {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Frontmatter {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FrontmatterVisitor;

        impl<'de> Visitor<'de> for FrontmatterVisitor {
            type Value = Frontmatter;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a frontmatter map")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, FrontmatterValue>()? {
                    entries.push((key, value));
                }
                Ok(Frontmatter { entries })
            }
        }

        deserializer.deserialize_map(FrontmatterVisitor)
    }
}

/// Split raw note text into its frontmatter block and body.
///
/// Returns the raw YAML between the markers (or `None` when the file does
/// not open with a marker line) and the body that follows. An opening
/// marker without a closing one is an error; batch callers log and skip
/// the file.
pub fn split_frontmatter(raw: &str) -> Result<(Option<&str>, &str)> {
    let mut lines = raw.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok((None, raw));
    };
    if first.trim_end() != MARKER {
        return Ok((None, raw));
    }

    let mut offset = first.len();
    for line in lines {
        if line.trim_end() == MARKER {
            let yaml = &raw[first.len()..offset];
            let body = &raw[offset + line.len()..];
            return Ok((Some(yaml), body));
        }
        offset += line.len();
    }

    Err(ParseError::UnterminatedFrontmatter)
}

/// Parse the YAML between frontmatter markers into a [`Frontmatter`] map.
///
/// An empty block yields an empty map. Non-string keys are skipped.
pub fn parse_frontmatter(yaml: &str) -> Result<Frontmatter> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }

    let mapping: serde_yaml::Mapping = serde_yaml::from_str(yaml)?;
    let mut frontmatter = Frontmatter::default();
    for (key, value) in mapping {
        let serde_yaml::Value::String(key) = key else {
            debug!(?key, "skipping non-string frontmatter key");
            continue;
        };
        frontmatter.insert(key, FrontmatterValue::from_yaml(value));
    }
    Ok(frontmatter)
}
