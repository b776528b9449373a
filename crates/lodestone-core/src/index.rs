//! Wikilink identity index.

use crate::walker::canonical_id;
use lodestone_parser::LinkResolver;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Lookup from note identity keys to canonical identities.
///
/// Every note registers two keys pointing to its canonical identity:
/// the filename stem and the full relative identity, each additionally
/// under a lowercased shadow key. Resolution tries the case-sensitive
/// index first, then the lowercased one; tokens matching neither stay
/// unresolved and the caller keeps the raw token as a dangling
/// reference.
///
/// The index is immutable once built. Invalidation replaces the whole
/// structure (the service swaps an `Arc`), so a reader never observes a
/// partially rebuilt index.
#[derive(Debug, Default)]
pub struct WikilinkIndex {
    exact: HashMap<String, String>,
    lower: HashMap<String, String>,
}

impl WikilinkIndex {
    /// Build the index from relative note paths.
    pub fn build<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut index = Self::default();
        let mut notes = 0usize;
        for path in paths {
            let id = canonical_id(&path);
            let stem = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            index.register(stem, &id);
            index.register(id.clone(), &id);
            notes += 1;
        }
        debug!(notes, keys = index.exact.len(), "wikilink index built");
        index
    }

    fn register(&mut self, key: String, id: &str) {
        let lower_key = key.to_lowercase();
        insert_key(&mut self.exact, key, id);
        insert_key(&mut self.lower, lower_key, id);
    }

    /// Resolve a raw link token: exact match first, then
    /// case-insensitive. `None` means the token is dangling.
    pub fn resolve_token(&self, token: &str) -> Option<&str> {
        if let Some(id) = self.exact.get(token) {
            return Some(id);
        }
        self.lower.get(&token.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

impl LinkResolver for WikilinkIndex {
    fn resolve(&self, target: &str) -> Option<String> {
        self.resolve_token(target).map(str::to_string)
    }
}

/// Collision policy: deterministic regardless of enumeration order, the
/// lexicographically smaller canonical identity wins.
fn insert_key(map: &mut HashMap<String, String>, key: String, id: &str) {
    match map.get_mut(&key) {
        None => {
            map.insert(key, id.to_string());
        }
        Some(existing) if existing.as_str() == id => {}
        Some(existing) if id < existing.as_str() => {
            warn!(
                key = %key,
                winner = %id,
                loser = %existing,
                "identity collision in wikilink index"
            );
            *existing = id.to_string();
        }
        Some(existing) => {
            warn!(
                key = %key,
                winner = %existing,
                loser = %id,
                "identity collision in wikilink index"
            );
        }
    }
}
