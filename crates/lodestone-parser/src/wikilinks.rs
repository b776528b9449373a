//! Wikilink extraction and content rewriting
//!
//! This module implements the two wikilink surface forms:
//! - References: `[[note]]` and `[[note|display text]]`
//! - Embeds: `![[asset]]`, serving embedded assets by raw name
//!
//! Reference targets are resolved to canonical note identities through
//! the [`LinkResolver`] seam; targets the resolver does not know stay as
//! dangling raw tokens. Rewriting replaces references with route-style
//! markdown links (`[display](/note/<id>)`) and embeds with asset links
//! (`![name](/assets/<name>)`), percent-encoding as it goes.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static WIKILINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[\[([^\]|]+)(?:\|([^\]]+))?\]\]").expect("wikilink regex"));

static EMBED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[([^\]]+)\]\]").expect("embed regex"));

/// A single wikilink occurrence in note content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wikilink {
    /// Raw link target as written, before resolution.
    pub target: String,
    /// Display text after `|`, if any.
    pub alias: Option<String>,
    /// Whether this is an `![[...]]` embed.
    pub is_embed: bool,
}

/// Resolves a raw wikilink target to a canonical note identity.
///
/// Implemented by the vault-level wikilink index; the parser only sees
/// this seam. `None` means the target is unknown and the raw token is
/// kept as a dangling reference.
pub trait LinkResolver {
    fn resolve(&self, target: &str) -> Option<String>;
}

/// Resolver that knows no notes; every link stays dangling.
pub struct NoopResolver;

impl LinkResolver for NoopResolver {
    fn resolve(&self, _target: &str) -> Option<String> {
        None
    }
}

/// Extract every wikilink occurrence in order of appearance.
pub fn extract_wikilinks(body: &str) -> Vec<Wikilink> {
    WIKILINK_REGEX
        .captures_iter(body)
        .map(|caps| Wikilink {
            is_embed: !caps[1].is_empty(),
            target: caps[2].to_string(),
            alias: caps.get(3).map(|m| m.as_str().to_string()),
        })
        .collect()
}

/// Resolve the targets of all plain (non-embed) references, in order of
/// appearance. Duplicates are kept; unresolved targets pass through raw.
pub fn resolved_link_targets(body: &str, resolver: &dyn LinkResolver) -> Vec<String> {
    extract_wikilinks(body)
        .into_iter()
        .filter(|link| !link.is_embed)
        .map(|link| resolver.resolve(&link.target).unwrap_or(link.target))
        .collect()
}

/// Rewrite note content for display.
///
/// Embeds are rewritten first so the reference pass never sees them.
/// Embed names are not resolved through the index and are encoded as a
/// single path segment; reference targets are resolved and encoded per
/// segment with slashes preserved as separators.
pub fn rewrite_content(body: &str, resolver: &dyn LinkResolver) -> String {
    let content = EMBED_REGEX.replace_all(body, |caps: &Captures<'_>| {
        let name = &caps[1];
        format!("![{}](/assets/{})", name, urlencoding::encode(name))
    });

    WIKILINK_REGEX
        .replace_all(&content, |caps: &Captures<'_>| {
            let target = &caps[2];
            let display = caps.get(3).map_or(target, |m| m.as_str());
            let resolved = resolver
                .resolve(target)
                .unwrap_or_else(|| target.to_string());
            format!("[{}](/note/{})", display, encode_note_id(&resolved))
        })
        .into_owned()
}

/// Percent-encode a note identity per path component, keeping `/` as the
/// segment separator.
fn encode_note_id(id: &str) -> String {
    id.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
