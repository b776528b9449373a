//! Lodestone note parser
//!
//! Note-level syntax for markdown knowledge vaults:
//! - YAML frontmatter parsing into an insertion-ordered property map
//! - inline `#tag` extraction
//! - wikilink references `[[note]]` / `[[note|display]]` and embeds
//!   `![[asset]]`
//! - display-content rewriting with resolver-backed link targets
//!
//! The parser never touches the filesystem and never sees the vault
//! index directly; resolution goes through the [`LinkResolver`] seam so
//! the vault crate can inject its index without a dependency cycle.

pub mod error;
pub mod frontmatter;
pub mod note;
pub mod tags;
pub mod wikilinks;

pub use error::{ParseError, Result};
pub use frontmatter::{parse_frontmatter, split_frontmatter, Frontmatter, FrontmatterValue};
pub use note::{NoteParser, ParsedMetadata, ParsedNote};
pub use tags::extract_tags;
pub use wikilinks::{
    extract_wikilinks, resolved_link_targets, rewrite_content, LinkResolver, NoopResolver, Wikilink,
};
