//! Regex utilities for classifier
//! Extracted to a separate crate for compilation optimization

use once_cell::sync::Lazy;
use regex::Regex;

/// Patterns for `git describe --tags` output
pub mod describe {
    use super::*;

    /// `v<tag>-<commits since tag>-<commit id>`, e.g. `v0.1.2-38-g6a8e5e3`
    pub static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"v(?P<tag>[\d.]*)-?(?P<commit>[\d.]*)-?.*").expect("Invalid regex pattern")
    });

    /// Parsed pieces of a describe string
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Describe {
        pub tag: String,
        /// Empty when HEAD sits exactly on the tag
        pub commits: String,
    }

    /// Search `text` for a describe string.
    ///
    /// Returns `None` when there is no `v`-prefixed tag or the tag is empty.
    pub fn parse(text: &str) -> Option<Describe> {
        let caps = PATTERN.captures(text)?;
        let tag = caps.name("tag").map(|m| m.as_str()).unwrap_or_default();
        if tag.is_empty() {
            return None;
        }
        let commits = caps.name("commit").map(|m| m.as_str()).unwrap_or_default();

        Some(Describe { tag: tag.to_string(), commits: commits.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_with_commits() {
        let parsed = describe::parse("v0.1.2-38-g6a8e5e3\n").unwrap();
        assert_eq!(parsed.tag, "0.1.2");
        assert_eq!(parsed.commits, "38");
    }

    #[test]
    fn test_describe_on_tag() {
        let parsed = describe::parse("v1.4\n").unwrap();
        assert_eq!(parsed.tag, "1.4");
        assert_eq!(parsed.commits, "");
    }

    #[test]
    fn test_describe_rejects_untagged_output() {
        assert_eq!(describe::parse("6a8e5e3\n"), None);
        assert_eq!(describe::parse(""), None);
        assert_eq!(describe::parse("v-12-gabc"), None);
    }
}
