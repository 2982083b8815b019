//! Include pattern matching.
//!
//! Patterns are translated into anchored regular expressions:
//! - leading and trailing `/` are dropped
//! - `**/` collapses to `**`, so `**/x.js` also matches a top-level `x.js`
//! - `**` matches any run of characters, separators included
//! - `*` matches within a single path segment
//! - `.` is literal
//!
//! Every other character is handed to the regex engine untouched, so a
//! pattern can still fail to compile. Such a pattern is skipped.

use regex::Regex;
use tracing::warn;

use crate::types::Include;

/// Translate a glob-style include pattern into regex source
pub fn translate(pattern: &str) -> String {
    let trimmed = pattern.trim_matches('/').replace("**/", "**");

    let mut source = String::with_capacity(trimmed.len() + 8);
    source.push('^');

    let mut chars = trimmed.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                source.push_str(".*");
            },
            '*' => source.push_str("[^/]*"),
            '.' => source.push_str("\\."),
            other => source.push(other),
        }
    }

    source.push('$');
    source
}

/// Compile an include pattern
pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&translate(pattern))
}

/// Find the first include whose pattern matches `candidate`.
///
/// Includes are tried in declaration order, so an earlier, broader pattern
/// wins over a later, more specific one. Raw includes never match a file.
pub fn match_include<'a>(includes: &'a [Include], candidate: &str) -> Option<&'a Include> {
    for include in includes.iter().filter(|i| !i.is_raw()) {
        let re = match compile(&include.file) {
            Ok(re) => re,
            Err(e) => {
                warn!(pattern = %include.file, error = %e, "skipping include pattern that does not compile");
                continue;
            },
        };

        if re.is_match(candidate) {
            return Some(include);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate() {
        assert_eq!(translate("htmx.min.js"), r"^htmx\.min\.js$");
        assert_eq!(translate("/ext/json-enc.js"), r"^ext/json-enc\.js$");
        assert_eq!(translate("**/util.js"), r"^.*util\.js$");
        assert_eq!(translate("*/util.js"), r"^[^/]*/util\.js$");
        assert_eq!(translate("/dist**bootstrap.min.css/"), r"^dist.*bootstrap\.min\.css$");
    }

    #[test]
    fn test_literal_match_is_anchored() {
        let includes = vec![Include::file("htmx.min.js")];
        assert!(match_include(&includes, "htmx.min.js").is_some());
        assert!(match_include(&includes, "dist/htmx.min.js").is_none());
        assert!(match_include(&includes, "htmx.min.js.gz").is_none());
        assert!(match_include(&includes, "htmxxminxjs").is_none());
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        let includes = vec![
            Include::file("*/util.js").with_alias("A"),
            Include::file("**/util.js").with_alias("B"),
        ];
        let hit = match_include(&includes, "lib/util.js").unwrap();
        assert_eq!(hit.name(), "A");

        let reversed: Vec<_> = includes.iter().rev().cloned().collect();
        let hit = match_include(&reversed, "lib/util.js").unwrap();
        assert_eq!(hit.name(), "B");
    }

    #[test]
    fn test_single_star_stays_in_segment() {
        let includes = vec![Include::file("*/util.js").with_alias("A")];
        assert!(match_include(&includes, "lib/util.js").is_some());
        assert!(match_include(&includes, "lib/nested/util.js").is_none());

        let includes = vec![Include::file("**/util.js")];
        assert!(match_include(&includes, "lib/nested/util.js").is_some());
        assert!(match_include(&includes, "util.js").is_some());
    }

    #[test]
    fn test_double_star_spans_directories() {
        let includes = vec![Include::file("/dist**bootstrap.min.css")];
        assert!(match_include(&includes, "dist/css/bootstrap.min.css").is_some());
        assert!(match_include(&includes, "dist/css/bootstrap.min.css.map").is_none());
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let includes = vec![
            Include::file("dist/(broken.js").with_alias("broken"),
            Include::file("dist/*.js").with_alias("fallback"),
        ];
        let hit = match_include(&includes, "dist/app.js").unwrap();
        assert_eq!(hit.name(), "fallback");
    }

    #[test]
    fn test_raw_includes_never_match() {
        let includes = vec![Include::raw("https://example.com/app.js").with_alias("app")];
        assert!(match_include(&includes, "").is_none());
        assert!(match_include(&includes, "app.js").is_none());
    }
}
