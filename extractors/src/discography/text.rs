use regex::Regex;
use std::sync::OnceLock;

fn bracketed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[.*?\]").expect("valid bracket pattern"))
}

fn parenthesized() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(.*?\)").expect("valid parenthesis pattern"))
}

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove `[...]` citation markers such as `[1]` or `[citation needed]`.
pub fn strip_citations(text: &str) -> String {
    bracketed().replace_all(text, "").into_owned()
}

/// Remove both `[...]` citations and `(...)` annotations.
pub fn strip_annotations(text: &str) -> String {
    let without_citations = strip_citations(text);
    parenthesized()
        .replace_all(&without_citations, "")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Album \n\t One  "), "Album One");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_strip_citations_is_non_greedy() {
        assert_eq!(strip_citations("Album One [1] live [a]"), "Album One  live ");
        assert_eq!(strip_citations("No markers"), "No markers");
    }

    #[test]
    fn test_strip_annotations() {
        assert_eq!(
            strip_annotations("Released: 5 May 2020 (US) [2]"),
            "Released: 5 May 2020  "
        );
        assert_eq!(
            strip_annotations("Released: (JP) 1 June 2019 (UK)"),
            "Released:  1 June 2019 "
        );
    }
}
