//! Comment pattern matching.
//!
//! A trigger pattern must match the entire comment body. `retest` matches the
//! comment `retest` but not `please retest` or `retest now`.

use commentci_core::{Error, Result};
use regex_automata::meta::Regex;
use regex_syntax::hir::{Hir, Look};

/// A compiled trigger pattern, anchored at both ends of the comment.
#[derive(Debug, Clone)]
pub struct CommentPattern {
    source: String,
    regex: Regex,
}

impl CommentPattern {
    /// Anchors are applied to the parsed pattern rather than its text, so
    /// inline flags and `(?x)` comments keep their meaning.
    pub fn compile(pattern: &str) -> Result<Self> {
        let invalid = |message: String| Error::InvalidTriggerPattern {
            pattern: pattern.to_string(),
            message,
        };

        let hir = regex_syntax::Parser::new()
            .parse(pattern)
            .map_err(|e| invalid(e.to_string()))?;
        let anchored = Hir::concat(vec![Hir::look(Look::Start), hir, Hir::look(Look::End)]);
        let regex = Regex::builder()
            .build_from_hir(&anchored)
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as configured, without anchoring.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, comment: &str) -> bool {
        self.regex.is_match(comment)
    }
}

/// Compile `pattern` and check that it matches all of `comment`.
pub fn matches(pattern: &str, comment: &str) -> Result<bool> {
    Ok(CommentPattern::compile(pattern)?.is_match(comment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(matches("retest this please", "retest this please").unwrap());
    }

    #[test]
    fn test_anchored_pattern_requires_full_comment() {
        assert!(matches("^fix$", "fix").unwrap());
        assert!(!matches("^fix$", "please fix").unwrap());
        assert!(!matches("^fix$", "fix it").unwrap());
    }

    #[test]
    fn test_unanchored_pattern_is_not_a_substring_search() {
        assert!(!matches("retest", "please retest").unwrap());
        assert!(!matches("retest", "retest now").unwrap());
        assert!(matches(".*retest.*", "please retest now").unwrap());
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        assert!(matches("retest|rebuild", "rebuild").unwrap());
        assert!(!matches("retest|rebuild", "retest now").unwrap());
        assert!(!matches("retest|rebuild", "now rebuild").unwrap());
    }

    #[test]
    fn test_multiline_comment_must_match_entirely() {
        assert!(!matches("retest", "retest\nthanks").unwrap());
        assert!(matches("(?s)retest.*", "retest\nthanks").unwrap());
    }

    #[test]
    fn test_case_insensitive_flag() {
        assert!(matches("(?i)retest this please", "ReTest This Please").unwrap());
        assert!(!matches("retest this please", "ReTest This Please").unwrap());
    }

    #[test]
    fn test_verbose_pattern_with_comment() {
        assert!(matches("(?x)retest # rerun ci", "retest").unwrap());
        assert!(matches("(?x) re (test|build) # either", "rebuild").unwrap());
        assert!(!matches("(?x)retest # rerun ci", "retest now").unwrap());
    }

    #[test]
    fn test_group_closing_inside_pattern_is_not_an_escape() {
        assert!(matches!(
            matches("retest)|(.*", "anything"),
            Err(Error::InvalidTriggerPattern { .. })
        ));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let err = matches("retest(", "retest").unwrap_err();
        assert!(matches!(err, Error::InvalidTriggerPattern { ref pattern, .. } if pattern == "retest("));
    }

    #[test]
    fn test_compiled_pattern_keeps_source() {
        let pattern = CommentPattern::compile("^go$").unwrap();
        assert_eq!(pattern.as_str(), "^go$");
        assert!(pattern.is_match("go"));
    }
}
