//! Core data model for the vault.

use lodestone_parser::Frontmatter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A fully parsed note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Canonical identity: slash-normalized relative path without
    /// extension.
    pub id: String,
    /// Frontmatter `title`, or the filename stem.
    pub title: String,
    /// Relative path including the extension.
    pub path: String,
    /// Display content with wikilinks rewritten to routes.
    pub content: String,
    #[serde(default, skip_serializing_if = "Frontmatter::is_empty")]
    pub frontmatter: Frontmatter,
    /// Sorted, deduplicated tag set.
    pub tags: Vec<String>,
    /// Resolved outbound link identities in order of appearance,
    /// duplicates preserved.
    pub links: Vec<String>,
}

/// Lightweight listing record; produced by the metadata-only parse
/// pass, so it never carries content or raw links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub id: String,
    pub title: String,
    pub path: String,
    pub tags: Vec<String>,
    /// Frontmatter `type` field, when present.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub note_type: Option<String>,
}

/// One graph node per note summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub title: String,
    pub tags: Vec<String>,
    #[serde(rename = "type", default)]
    pub note_type: Option<String>,
}

/// A directed link between two notes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

/// The full vault link graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Basic facts about a vault.
#[derive(Debug, Clone, Serialize)]
pub struct VaultInfo {
    pub root: PathBuf,
    pub note_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes_type_field_under_its_wire_name() {
        let summary = NoteSummary {
            id: "a".into(),
            title: "A".into(),
            path: "a.md".into(),
            tags: vec![],
            note_type: Some("location".into()),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], "location");

        let without = NoteSummary {
            note_type: None,
            ..summary
        };
        let json = serde_json::to_value(&without).unwrap();
        assert!(json.get("type").is_none());
    }

    #[test]
    fn note_round_trips_through_json() {
        let note = Note {
            id: "folder/B".into(),
            title: "Beta".into(),
            path: "folder/B.md".into(),
            content: "hello".into(),
            frontmatter: Frontmatter::new(),
            tags: vec!["x".into()],
            links: vec!["folder/B".into()],
        };
        let json = serde_json::to_string(&note).unwrap();
        let back: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(back, note);
    }
}
