//! TTL-bounded note cache.

use crate::types::Note;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// In-memory cache of parsed notes with lazy TTL expiry.
///
/// An entry older than the TTL is treated as absent and evicted on the
/// next access to its key; there is no background sweep and no capacity
/// bound (the vault is bounded, staleness is TTL-driven). Concurrent
/// misses on the same key are not coalesced: both callers parse and
/// both insert, last writer wins. All mutation goes through the one
/// lock, so `clear` is atomic with respect to individual gets and puts
/// and cannot resurrect a stale entry mid-clear.
pub struct NoteCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    note: Note,
    inserted_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() < ttl
    }
}

impl NoteCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// A cached note, if present and not expired.
    pub fn get(&self, id: &str) -> Option<Note> {
        {
            let entries = self.entries.read();
            match entries.get(id) {
                Some(entry) if entry.is_fresh(self.ttl) => return Some(entry.note.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: evict lazily. Re-check under the write lock in case
        // a fresh entry landed in between.
        let mut entries = self.entries.write();
        if let Some(entry) = entries.get(id) {
            if entry.is_fresh(self.ttl) {
                return Some(entry.note.clone());
            }
            entries.remove(id);
            debug!(id, "evicted expired cache entry");
        }
        None
    }

    pub fn put(&self, id: impl Into<String>, note: Note) {
        self.entries.write().insert(
            id.into(),
            CacheEntry {
                note,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Remove a single entry.
    pub fn invalidate(&self, id: &str) {
        self.entries.write().remove(id);
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        let dropped = entries.len();
        entries.clear();
        debug!(dropped, "note cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn note(id: &str, content: &str) -> Note {
        Note {
            id: id.to_string(),
            title: id.to_string(),
            path: format!("{id}.md"),
            content: content.to_string(),
            frontmatter: Default::default(),
            tags: Vec::new(),
            links: Vec::new(),
        }
    }

    #[test]
    fn hit_within_ttl() {
        let cache = NoteCache::new(Duration::from_secs(60));
        cache.put("A", note("A", "one"));
        assert_eq!(cache.get("A").unwrap().content, "one");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expired_entry_is_absent_and_evicted() {
        let cache = NoteCache::new(Duration::from_millis(30));
        cache.put("A", note("A", "one"));
        thread::sleep(Duration::from_millis(60));
        assert!(cache.get("A").is_none());
        // Lazy eviction happened on access.
        assert!(cache.is_empty());
    }

    #[test]
    fn put_refreshes_the_clock() {
        let cache = NoteCache::new(Duration::from_millis(80));
        cache.put("A", note("A", "one"));
        thread::sleep(Duration::from_millis(50));
        cache.put("A", note("A", "two"));
        thread::sleep(Duration::from_millis(50));
        // 100ms after the first put, 50ms after the second: still fresh.
        assert_eq!(cache.get("A").unwrap().content, "two");
    }

    #[test]
    fn invalidate_removes_one_key() {
        let cache = NoteCache::new(Duration::from_secs(60));
        cache.put("A", note("A", "one"));
        cache.put("B", note("B", "two"));
        cache.invalidate("A");
        assert!(cache.get("A").is_none());
        assert!(cache.get("B").is_some());
    }

    #[test]
    fn clear_removes_everything() {
        let cache = NoteCache::new(Duration::from_secs(60));
        cache.put("A", note("A", "one"));
        cache.put("B", note("B", "two"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
