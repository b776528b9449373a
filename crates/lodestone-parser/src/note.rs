//! Whole-note parsing.
//!
//! [`NoteParser`] ties the pieces together: split the frontmatter block,
//! parse it, extract tags, resolve outbound links, and rewrite the body
//! for display. Two cheaper passes exist alongside the full parse: a
//! metadata-only pass for listings (no link work at all) and a raw link
//! token scan for graph construction (no frontmatter parse, no rewrite).

use crate::error::Result;
use crate::frontmatter::{parse_frontmatter, split_frontmatter, Frontmatter};
use crate::tags::extract_tags;
use crate::wikilinks::{resolved_link_targets, rewrite_content, LinkResolver};
use regex::Regex;
use std::sync::LazyLock;

static LINK_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]|]+)").expect("link token regex"));

/// Fully parsed note content.
#[derive(Debug, Clone)]
pub struct ParsedNote {
    pub frontmatter: Frontmatter,
    /// Body rewritten for display, with wikilinks replaced by routes.
    pub content: String,
    /// Sorted, deduplicated tag set.
    pub tags: Vec<String>,
    /// Resolved outbound link identities, in order of appearance,
    /// duplicates preserved.
    pub links: Vec<String>,
}

/// Result of the metadata-only pass.
#[derive(Debug, Clone)]
pub struct ParsedMetadata {
    pub frontmatter: Frontmatter,
    pub tags: Vec<String>,
}

/// Parser for a single note's raw text.
pub struct NoteParser;

impl NoteParser {
    pub fn new() -> Self {
        Self
    }

    /// Full parse: frontmatter, tag set, resolved links, and rewritten
    /// display content.
    pub fn parse(&self, raw: &str, resolver: &dyn LinkResolver) -> Result<ParsedNote> {
        let (yaml, body) = split_frontmatter(raw)?;
        let frontmatter = match yaml {
            Some(yaml) => parse_frontmatter(yaml)?,
            None => Frontmatter::default(),
        };
        let tags = extract_tags(body, &frontmatter);
        let links = resolved_link_targets(body, resolver);
        let content = rewrite_content(body, resolver);

        Ok(ParsedNote {
            frontmatter,
            content,
            tags,
            links,
        })
    }

    /// Metadata-only parse: frontmatter and tags, no link resolution or
    /// content rewriting.
    pub fn parse_metadata(&self, raw: &str) -> Result<ParsedMetadata> {
        let (yaml, body) = split_frontmatter(raw)?;
        let frontmatter = match yaml {
            Some(yaml) => parse_frontmatter(yaml)?,
            None => Frontmatter::default(),
        };
        let tags = extract_tags(body, &frontmatter);

        Ok(ParsedMetadata { frontmatter, tags })
    }

    /// Cheap link-token scan for graph construction: skips the
    /// frontmatter block if present, then collects raw `[[` targets with
    /// surrounding whitespace trimmed. Nothing is resolved or rewritten.
    pub fn extract_link_targets(&self, raw: &str) -> Vec<String> {
        // An unterminated frontmatter block falls back to scanning the
        // whole file; such notes never reach the graph's metadata pass.
        let body = match split_frontmatter(raw) {
            Ok((_, body)) => body,
            Err(_) => raw,
        };
        LINK_TOKEN_REGEX
            .captures_iter(body)
            .map(|caps| caps[1].trim().to_string())
            .filter(|target| !target.is_empty())
            .collect()
    }
}

impl Default for NoteParser {
    fn default() -> Self {
        Self::new()
    }
}
