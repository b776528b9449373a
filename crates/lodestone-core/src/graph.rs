//! Full-vault link graph construction.

use crate::types::{GraphEdge, GraphNode, NoteGraph, NoteSummary};
use lodestone_parser::NoteParser;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Builds the node/edge graph over all notes without full parses.
///
/// Pass one turns the summaries into nodes plus the known-identity set
/// and title lookup maps. Pass two scans each file for raw `[[` tokens
/// (no frontmatter parse, no content rewriting) and resolves each token
/// in three tiers: known identity, exact title, case-insensitive title.
/// Unresolved tokens produce no edge; edges are deduplicated by ordered
/// (source, target) pair, first seen wins the position.
pub struct GraphBuilder<'a> {
    root: &'a Path,
    parser: &'a NoteParser,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(root: &'a Path, parser: &'a NoteParser) -> Self {
        Self { root, parser }
    }

    pub fn build(&self, summaries: &[NoteSummary]) -> NoteGraph {
        let mut nodes = Vec::with_capacity(summaries.len());
        let mut ids: HashSet<&str> = HashSet::with_capacity(summaries.len());
        let mut titles: HashMap<String, String> = HashMap::with_capacity(summaries.len());
        let mut titles_lower: HashMap<String, String> = HashMap::with_capacity(summaries.len());

        for summary in summaries {
            ids.insert(summary.id.as_str());
            register_title(&mut titles, summary.title.clone(), &summary.id);
            register_title(&mut titles_lower, summary.title.to_lowercase(), &summary.id);
            nodes.push(GraphNode {
                id: summary.id.clone(),
                title: summary.title.clone(),
                tags: summary.tags.clone(),
                note_type: summary.note_type.clone(),
            });
        }

        let mut edges = Vec::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();
        for summary in summaries {
            let path = self.root.join(&summary.path);
            let raw = match fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "skipping unreadable note during graph build"
                    );
                    continue;
                }
            };

            for token in self.parser.extract_link_targets(&raw) {
                let target = if ids.contains(token.as_str()) {
                    Some(token.as_str())
                } else if let Some(id) = titles.get(&token) {
                    Some(id.as_str())
                } else {
                    titles_lower.get(&token.to_lowercase()).map(String::as_str)
                };
                let Some(target) = target else { continue };

                if seen.insert((summary.id.clone(), target.to_string())) {
                    edges.push(GraphEdge {
                        source: summary.id.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }

        debug!(nodes = nodes.len(), edges = edges.len(), "note graph built");
        NoteGraph { nodes, edges }
    }
}

/// Collision policy mirrors the wikilink index: on a duplicate title the
/// lexicographically smaller identity wins, deterministically.
fn register_title(map: &mut HashMap<String, String>, title: String, id: &str) {
    match map.get_mut(&title) {
        None => {
            map.insert(title, id.to_string());
        }
        Some(existing) if existing.as_str() == id => {}
        Some(existing) if id < existing.as_str() => {
            warn!(title = %title, winner = %id, loser = %existing, "duplicate note title");
            *existing = id.to_string();
        }
        Some(existing) => {
            warn!(title = %title, winner = %existing, loser = %id, "duplicate note title");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_note(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn summary(id: &str, title: &str) -> NoteSummary {
        NoteSummary {
            id: id.to_string(),
            title: title.to_string(),
            path: format!("{id}.md"),
            tags: Vec::new(),
            note_type: None,
        }
    }

    #[test]
    fn repeated_link_yields_one_edge() {
        let dir = TempDir::new().unwrap();
        write_note(dir.path(), "A.md", "[[B]] and again [[B]]\n");
        write_note(dir.path(), "B.md", "no links\n");
        let summaries = vec![summary("A", "A"), summary("B", "B")];

        let parser = NoteParser::new();
        let graph = GraphBuilder::new(dir.path(), &parser).build(&summaries);

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(
            graph.edges,
            vec![GraphEdge {
                source: "A".into(),
                target: "B".into()
            }]
        );
    }

    #[test]
    fn resolves_identity_then_title_then_case_insensitive_title() {
        let dir = TempDir::new().unwrap();
        write_note(
            dir.path(),
            "A.md",
            "[[folder/B]] then [[Beta Title]] then [[gamma title]]\n",
        );
        write_note(dir.path(), "folder/B.md", "");
        write_note(dir.path(), "folder/C.md", "");
        let summaries = vec![
            summary("A", "A"),
            summary("folder/B", "Beta Title"),
            summary("folder/C", "Gamma Title"),
        ];

        let parser = NoteParser::new();
        let graph = GraphBuilder::new(dir.path(), &parser).build(&summaries);

        assert_eq!(
            graph.edges,
            vec![
                GraphEdge {
                    source: "A".into(),
                    target: "folder/B".into()
                },
                GraphEdge {
                    source: "A".into(),
                    target: "folder/C".into()
                },
            ]
        );
    }

    #[test]
    fn unresolved_tokens_produce_no_edges() {
        let dir = TempDir::new().unwrap();
        write_note(dir.path(), "A.md", "[[Ghost]] and [[another ghost|alias]]\n");
        let summaries = vec![summary("A", "A")];

        let parser = NoteParser::new();
        let graph = GraphBuilder::new(dir.path(), &parser).build(&summaries);

        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn vanished_file_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        write_note(dir.path(), "A.md", "[[B]]\n");
        write_note(dir.path(), "B.md", "");
        // C is listed but its file is gone by the time the graph runs.
        let summaries = vec![summary("A", "A"), summary("B", "B"), summary("C", "C")];

        let parser = NoteParser::new();
        let graph = GraphBuilder::new(dir.path(), &parser).build(&summaries);

        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 1);
    }

    #[test]
    fn duplicate_titles_resolve_deterministically() {
        let dir = TempDir::new().unwrap();
        write_note(dir.path(), "A.md", "[[Shared Title]]\n");
        write_note(dir.path(), "m/Doc.md", "");
        write_note(dir.path(), "z/Doc.md", "");
        let forward = vec![
            summary("A", "A"),
            summary("m/Doc", "Shared Title"),
            summary("z/Doc", "Shared Title"),
        ];
        let backward = vec![
            summary("A", "A"),
            summary("z/Doc", "Shared Title"),
            summary("m/Doc", "Shared Title"),
        ];

        let parser = NoteParser::new();
        for summaries in [forward, backward] {
            let graph = GraphBuilder::new(dir.path(), &parser).build(&summaries);
            assert_eq!(graph.edges.len(), 1);
            assert_eq!(graph.edges[0].target, "m/Doc");
        }
    }
}
