//! Inline tag extraction.

use crate::frontmatter::Frontmatter;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#([\w\-/]+)").expect("tag regex"));

/// Extract the tag set for a note: the frontmatter `tags` field unioned
/// with inline `#tag` tokens scanned over the body, sorted and
/// deduplicated. Tag tokens may contain letters, digits, underscores,
/// hyphens, and slashes (nested tags).
pub fn extract_tags(body: &str, frontmatter: &Frontmatter) -> Vec<String> {
    let mut tags: BTreeSet<String> = frontmatter.tags().into_iter().collect();
    for cap in TAG_REGEX.captures_iter(body) {
        tags.insert(cap[1].to_string());
    }
    tags.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::parse_frontmatter;

    #[test]
    fn inline_tags_only() {
        let tags = extract_tags("a #important note about #campaign/act-1", &Frontmatter::new());
        assert_eq!(tags, vec!["campaign/act-1".to_string(), "important".to_string()]);
    }

    #[test]
    fn frontmatter_tags_union_inline() {
        let frontmatter = parse_frontmatter("tags: [faction, npc]\n").unwrap();
        let tags = extract_tags("body with #npc and #location", &frontmatter);
        assert_eq!(
            tags,
            vec![
                "faction".to_string(),
                "location".to_string(),
                "npc".to_string()
            ]
        );
    }

    #[test]
    fn heading_lines_are_not_tags() {
        // "# Heading" has a space after the hash, so the pattern skips it.
        let tags = extract_tags("# Heading\n\nsome text\n", &Frontmatter::new());
        assert!(tags.is_empty());
    }

    #[test]
    fn no_tags_anywhere() {
        assert!(extract_tags("plain text", &Frontmatter::new()).is_empty());
    }
}
