//! Vault service orchestration.

use crate::cache::NoteCache;
use crate::config::VaultConfig;
use crate::error::Result;
use crate::graph::GraphBuilder;
use crate::index::WikilinkIndex;
use crate::types::{Note, NoteGraph, NoteSummary, VaultInfo};
use crate::walker::{canonical_id, canonical_path, NoteWalker};
use lodestone_parser::NoteParser;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrates the vault: enumeration, parsing, caching, link
/// resolution, and graph construction.
///
/// One instance is constructed at startup and shared across all request
/// handling; the note cache and the wikilink index live exactly as long
/// as the service and are cleared together when the external sync
/// collaborator reports a completed sync. The service never validates
/// that a caller-supplied identity stays inside the root; that is the
/// transport layer's job.
pub struct VaultService {
    config: VaultConfig,
    parser: NoteParser,
    cache: NoteCache,
    index: RwLock<Option<Arc<WikilinkIndex>>>,
}

impl VaultService {
    /// Create the service, ensuring the vault root directory exists.
    pub fn new(config: VaultConfig) -> Result<Self> {
        fs::create_dir_all(&config.root)?;
        info!(root = %config.root.display(), "vault service initialized");
        Ok(Self {
            cache: NoteCache::new(config.cache_ttl()),
            parser: NoteParser::new(),
            index: RwLock::new(None),
            config,
        })
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// All note summaries, sorted by path ascending, excluding notes
    /// that carry the configured ignore tag. Files that fail to read or
    /// parse are logged and skipped; one bad note never aborts the
    /// listing.
    pub fn list_summaries(&self) -> Vec<NoteSummary> {
        let mut summaries = Vec::new();
        for rel in self.walker().iter() {
            match self.load_summary(&rel) {
                Ok(Some(summary)) => summaries.push(summary),
                Ok(None) => {}
                Err(err) => {
                    warn!(path = %rel.display(), error = %err, "skipping unreadable note");
                }
            }
        }
        summaries.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(count = summaries.len(), "listed note summaries");
        summaries
    }

    /// Fetch one note by canonical identity, through the cache.
    ///
    /// Returns `Ok(None)` when no backing file exists. Concurrent cold
    /// misses on the same id are not coalesced: both callers parse and
    /// both insert, last writer wins.
    pub fn get_note(&self, id: &str) -> Result<Option<Note>> {
        if let Some(note) = self.cache.get(id) {
            return Ok(Some(note));
        }

        let rel = PathBuf::from(format!("{id}.md"));
        let raw = match fs::read_to_string(self.config.root.join(&rel)) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let index = self.wikilink_index();
        let parsed = self.parser.parse(&raw, index.as_ref())?;
        let note = Note {
            id: id.to_string(),
            title: title_of(&parsed.frontmatter, &rel),
            path: canonical_path(&rel),
            content: parsed.content,
            frontmatter: parsed.frontmatter,
            tags: parsed.tags,
            links: parsed.links,
        };
        self.cache.put(id, note.clone());
        Ok(Some(note))
    }

    /// Deduplicated union of tags across all non-ignored notes, ordered
    /// case-insensitively.
    pub fn list_tags(&self) -> Vec<String> {
        let unique: HashSet<String> = self
            .list_summaries()
            .into_iter()
            .flat_map(|summary| summary.tags)
            .collect();
        let mut tags: Vec<String> = unique.into_iter().collect();
        tags.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        tags
    }

    /// Case-insensitive substring search over summary titles.
    pub fn search(&self, query: &str) -> Vec<NoteSummary> {
        let query = query.to_lowercase();
        self.list_summaries()
            .into_iter()
            .filter(|summary| summary.title.to_lowercase().contains(&query))
            .collect()
    }

    /// Summaries carrying at least one of the requested tags,
    /// case-insensitive.
    pub fn summaries_with_tags(&self, tags: &[String]) -> Vec<NoteSummary> {
        let wanted: Vec<String> = tags.iter().map(|tag| tag.to_lowercase()).collect();
        self.list_summaries()
            .into_iter()
            .filter(|summary| {
                summary
                    .tags
                    .iter()
                    .any(|tag| wanted.contains(&tag.to_lowercase()))
            })
            .collect()
    }

    /// Folder names that appear in note paths but have no note whose
    /// identity equals the folder path, sorted. Useful for frontends
    /// deciding which folders are plain containers rather than link
    /// targets.
    pub fn container_folders(&self) -> Vec<String> {
        let ids: HashSet<String> = self
            .list_summaries()
            .into_iter()
            .map(|summary| summary.id)
            .collect();

        let mut folder_paths: HashSet<String> = HashSet::new();
        for id in &ids {
            let segments: Vec<&str> = id.split('/').collect();
            for depth in 1..segments.len() {
                folder_paths.insert(segments[..depth].join("/"));
            }
        }

        let containers: BTreeSet<String> = folder_paths
            .into_iter()
            .filter(|folder| !ids.contains(folder))
            .filter_map(|folder| folder.rsplit('/').next().map(str::to_string))
            .collect();
        containers.into_iter().collect()
    }

    /// Construct the full link graph over all non-ignored notes.
    pub fn build_graph(&self) -> NoteGraph {
        let summaries = self.list_summaries();
        let graph = GraphBuilder::new(&self.config.root, &self.parser).build(&summaries);
        info!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "graph data generated"
        );
        graph
    }

    /// Basic facts about the vault.
    pub fn info(&self) -> VaultInfo {
        VaultInfo {
            root: self.config.root.clone(),
            note_count: self.list_summaries().len(),
        }
    }

    /// Called by the repository-sync collaborator after a successful
    /// sync, and only then: the note cache is dropped wholesale and the
    /// wikilink index is rebuilt on next access. A failed sync must not
    /// invalidate anything; a stale-but-consistent cache beats an empty
    /// one backed by a partially synced tree.
    pub fn on_sync_completed(&self) {
        self.cache.clear();
        *self.index.write() = None;
        info!("sync completed; note cache and wikilink index invalidated");
    }

    fn walker(&self) -> NoteWalker {
        NoteWalker::new(&self.config.root).exclude_dir(self.config.templates_dir.clone())
    }

    /// The wikilink index for the current vault generation, built on
    /// first use after an invalidation. The finished structure is
    /// swapped in whole; readers never observe a partial rebuild.
    fn wikilink_index(&self) -> Arc<WikilinkIndex> {
        {
            let slot = self.index.read();
            if let Some(index) = slot.as_ref() {
                return index.clone();
            }
        }

        let built = Arc::new(WikilinkIndex::build(self.walker().iter()));
        let mut slot = self.index.write();
        match slot.as_ref() {
            // Another cold reader won the race; both builds saw the
            // same generation, keep the one that landed.
            Some(index) => index.clone(),
            None => {
                *slot = Some(built.clone());
                built
            }
        }
    }

    fn load_summary(&self, rel: &Path) -> Result<Option<NoteSummary>> {
        let raw = fs::read_to_string(self.config.root.join(rel))?;
        let metadata = self.parser.parse_metadata(&raw)?;

        if let Some(ignore) = &self.config.ignore_tag {
            if metadata.tags.iter().any(|tag| tag == ignore) {
                return Ok(None);
            }
        }

        Ok(Some(NoteSummary {
            id: canonical_id(rel),
            title: title_of(&metadata.frontmatter, rel),
            path: canonical_path(rel),
            tags: metadata.tags,
            note_type: metadata.frontmatter.note_type().map(str::to_string),
        }))
    }
}

/// Frontmatter `title` if present, else the filename stem.
fn title_of(frontmatter: &lodestone_parser::Frontmatter, rel: &Path) -> String {
    frontmatter
        .title()
        .map(str::to_string)
        .unwrap_or_else(|| {
            rel.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
}
