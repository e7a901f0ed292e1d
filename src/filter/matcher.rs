//! Glob matching for keyword patterns.
//!
//! Patterns use two wildcards:
//! - `*` matches any run of characters, including none
//! - `?` matches exactly one character
//!
//! Everything else is literal. Matching is case-insensitive and anchored at
//! both ends. Each candidate is tried as-is and with a single trailing space
//! appended, so `"stop *"` also catches a bare `"stop"`.

use regex::{Regex, RegexBuilder};

/// A glob pattern compiled for repeated matching.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    /// `None` when the pattern could not be compiled; such a pattern never matches.
    regex: Option<Regex>,
}

impl GlobPattern {
    /// Compile a glob pattern.
    pub fn new(pattern: &str) -> Self {
        let regex = RegexBuilder::new(&glob_to_regex(pattern))
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .ok();

        Self {
            source: pattern.to_string(),
            regex,
        }
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// False if the pattern failed to compile.
    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    /// Test `text`, then `text` plus one trailing space.
    pub fn matches(&self, text: &str) -> bool {
        let Some(regex) = &self.regex else {
            return false;
        };

        if regex.is_match(text) {
            return true;
        }

        let mut padded = String::with_capacity(text.len() + 1);
        padded.push_str(text);
        padded.push(' ');
        regex.is_match(&padded)
    }
}

/// One-shot match of `text` against a glob `pattern`.
pub fn matches(text: &str, pattern: &str) -> bool {
    GlobPattern::new(pattern).matches(text)
}

fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut literal = String::new();

    out.push('^');
    for c in pattern.chars() {
        match c {
            '*' | '?' => {
                if !literal.is_empty() {
                    out.push_str(&regex::escape(&literal));
                    literal.clear();
                }
                out.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    if !literal.is_empty() {
        out.push_str(&regex::escape(&literal));
    }
    out.push('$');

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_translation() {
        assert_eq!(glob_to_regex("*bad*"), "^.*bad.*$");
        assert_eq!(glob_to_regex("a?c"), "^a.c$");
        assert_eq!(glob_to_regex("1+1=2"), r"^1\+1=2$");
    }

    #[test]
    fn test_case_insensitive() {
        assert!(matches("badword here", "BADWORD*"));
        assert!(matches("BADWORD HERE", "badword*"));
    }

    #[test]
    fn test_trailing_space_variant() {
        assert!(matches("stop", "stop *"));
        assert!(matches("stop now", "stop *"));
        assert!(!matches("stopping", "stop *"));
    }

    #[test]
    fn test_whole_string_anchoring() {
        assert!(!matches("this is bad", "bad"));
        assert!(matches("bad", "bad"));
        assert!(matches("this is bad", "*bad"));
    }

    #[test]
    fn test_single_char_wildcard() {
        assert!(matches("abc", "a?c"));
        assert!(!matches("ac", "a?c"));
        assert!(!matches("abbc", "a?c"));
    }

    #[test]
    fn test_star_matches_empty_and_newlines() {
        assert!(matches("", "*"));
        assert!(matches("line one\nline two", "*one*two"));
        assert!(matches("xy", "x*y"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(matches("cost: $5 (cheap)", "*$5 (cheap)"));
        assert!(!matches("cost: 55 cheap", "*$5 (cheap)"));
        assert!(matches("a.b", "a.b"));
        assert!(!matches("axb", "a.b"));
    }

    #[test]
    fn test_compiled_pattern() {
        let pattern = GlobPattern::new("*spam*");
        assert!(pattern.is_valid());
        assert_eq!(pattern.as_str(), "*spam*");
        assert!(pattern.matches("buy SPAM now"));
        assert!(!pattern.matches("ham"));
    }

    #[test]
    fn test_oversized_pattern_never_matches() {
        let source = "?".repeat(50_000);
        let pattern = GlobPattern::new(&source);

        assert!(!pattern.is_valid());
        assert_eq!(pattern.as_str(), source);
        assert!(!pattern.matches(&"x".repeat(50_000)));
        assert!(!pattern.matches(""));
    }
}
