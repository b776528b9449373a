//! Vault directory enumeration.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// File extension recognized as a note.
pub const NOTE_EXTENSION: &str = "md";

/// Walks a vault root for note files.
///
/// Yields paths relative to the root, lazily and in no guaranteed
/// order; consumers sort when they need determinism. Any path component
/// starting with `.` is pruned (VCS metadata, editor droppings), as are
/// explicitly excluded directory names such as the templates folder.
/// Entries that disappear or cannot be read between enumeration and
/// access are skipped, never fatal.
#[derive(Debug, Clone)]
pub struct NoteWalker {
    root: PathBuf,
    excluded_dirs: Vec<String>,
}

impl NoteWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded_dirs: Vec::new(),
        }
    }

    /// Prune a directory name, at any depth, from the walk.
    pub fn exclude_dir(mut self, name: impl Into<String>) -> Self {
        self.excluded_dirs.push(name.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily yield note paths relative to the root.
    pub fn iter(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|entry| self.keep_entry(entry))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && has_note_extension(entry.path()))
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(&self.root)
                    .ok()
                    .map(Path::to_path_buf)
            })
    }

    fn keep_entry(&self, entry: &DirEntry) -> bool {
        // The root itself always passes, whatever it is named.
        if entry.depth() == 0 {
            return true;
        }
        let Some(name) = entry.file_name().to_str() else {
            return false;
        };
        if name.starts_with('.') {
            return false;
        }
        if entry.file_type().is_dir() && self.excluded_dirs.iter().any(|dir| dir == name) {
            return false;
        }
        true
    }
}

fn has_note_extension(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(NOTE_EXTENSION)
}

/// Slash-normalized relative path string, extension kept.
pub fn canonical_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Slash-normalized relative path without its extension: the note's
/// canonical identity.
pub fn canonical_id(path: &Path) -> String {
    canonical_path(&path.with_extension(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    fn walked(walker: &NoteWalker) -> BTreeSet<String> {
        walker.iter().map(|p| canonical_path(&p)).collect()
    }

    #[test]
    fn yields_only_markdown_files_relative_to_root() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "A.md");
        touch(dir.path(), "folder/B.md");
        touch(dir.path(), "folder/image.png");
        touch(dir.path(), "notes.txt");

        let walker = NoteWalker::new(dir.path());
        assert_eq!(
            walked(&walker),
            BTreeSet::from(["A.md".to_string(), "folder/B.md".to_string()])
        );
    }

    #[test]
    fn skips_hidden_components() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "A.md");
        touch(dir.path(), ".git/objects/deadbeef.md");
        touch(dir.path(), ".obsidian/workspace.md");
        touch(dir.path(), "folder/.hidden.md");

        let walker = NoteWalker::new(dir.path());
        assert_eq!(walked(&walker), BTreeSet::from(["A.md".to_string()]));
    }

    #[test]
    fn excluded_directory_is_pruned_at_any_depth() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "A.md");
        touch(dir.path(), "templates/daily.md");
        touch(dir.path(), "nested/templates/weekly.md");

        let walker = NoteWalker::new(dir.path()).exclude_dir("templates");
        assert_eq!(walked(&walker), BTreeSet::from(["A.md".to_string()]));
    }

    #[test]
    fn missing_root_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let walker = NoteWalker::new(dir.path().join("does-not-exist"));
        assert_eq!(walker.iter().count(), 0);
    }

    #[test]
    fn canonical_forms() {
        let path = Path::new("folder/B.md");
        assert_eq!(canonical_path(path), "folder/B.md");
        assert_eq!(canonical_id(path), "folder/B");
    }
}
