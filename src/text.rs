//! Text utilities shared by every view.
//!
//! All three helpers operate on Unicode scalar values, not bytes, so that
//! truncation never splits a multi-byte glyph and highlighting never matches
//! across entity boundaries.

use std::borrow::Cow;

use regex::RegexBuilder;

/// Default truncation suffix.
pub const ELLIPSIS: &str = "…";

/// Queries shorter than this are treated as "no query": highlighting and
/// cross-session search are disabled. The plain file-path substring filter
/// intentionally has no such minimum.
pub const MIN_QUERY_LEN: usize = 2;

/// Opening marker wrapped around highlighted matches.
pub const MARK_OPEN: &str = "<mark>";
/// Closing marker wrapped around highlighted matches.
pub const MARK_CLOSE: &str = "</mark>";

/// Truncate `text` to at most `max_len` codepoints, appending `…` when cut.
///
/// A no-op for strings already within the limit, which makes it idempotent:
/// `truncate(truncate(s, n), n) == truncate(s, n)`.
#[must_use]
pub fn truncate(text: &str, max_len: usize) -> Cow<'_, str> {
    truncate_with(text, max_len, ELLIPSIS)
}

/// Truncate `text` to at most `max_len` codepoints with a custom suffix.
///
/// The suffix's own codepoints count against the budget; the result is never
/// longer than `max_len` codepoints (unless the suffix alone exceeds it).
#[must_use]
pub fn truncate_with<'a>(text: &'a str, max_len: usize, suffix: &str) -> Cow<'a, str> {
    let count = text.chars().count();
    if count <= max_len {
        return Cow::Borrowed(text);
    }
    let suffix_len = suffix.chars().count();
    let keep = max_len.saturating_sub(suffix_len);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(suffix);
    Cow::Owned(out)
}

/// Escape the five display-sensitive characters (`& < > " '`).
///
/// Must be applied before any raw text is interpreted as markup; every other
/// codepoint passes through unchanged.
#[must_use]
pub fn escape_for_display(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Escape `text` and wrap every case-insensitive match of `query` in
/// highlight markers.
///
/// Queries shorter than [`MIN_QUERY_LEN`] produce `escape_for_display(text)`
/// exactly, with no markup added. The query is matched literally: regex
/// metacharacters in it are escaped, and both text and query are
/// display-escaped before matching so a query cannot straddle an entity.
#[must_use]
pub fn highlight(text: &str, query: &str) -> String {
    let escaped = escape_for_display(text);
    if query.chars().count() < MIN_QUERY_LEN {
        return escaped.into_owned();
    }

    let escaped_query = escape_for_display(query);
    let pattern = regex::escape(&escaped_query);
    let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(true).build() else {
        return escaped.into_owned();
    };

    re.replace_all(&escaped, |caps: &regex::Captures<'_>| {
        format!("{MARK_OPEN}{}{MARK_CLOSE}", &caps[0])
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_truncate_noop_when_short() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn test_truncate_appends_ellipsis() {
        assert_eq!(truncate("hello world", 6), "hello…");
    }

    #[test]
    fn test_truncate_counts_codepoints_not_bytes() {
        // Five CJK codepoints, fifteen bytes.
        let s = "你好世界啊";
        assert_eq!(truncate(s, 5), s);
        assert_eq!(truncate(s, 3), "你好…");
    }

    #[test]
    fn test_truncate_zero_budget() {
        assert_eq!(truncate("abc", 0), "…");
    }

    #[test]
    fn test_escape_for_display() {
        assert_eq!(
            escape_for_display(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_for_display("plain"), "plain");
    }

    #[test]
    fn test_highlight_short_query_is_escape_only() {
        assert_eq!(highlight("a <b> c", ""), escape_for_display("a <b> c"));
        assert_eq!(highlight("a <b> c", "x"), escape_for_display("a <b> c"));
    }

    #[test]
    fn test_highlight_case_insensitive() {
        assert_eq!(
            highlight("Hello World", "world"),
            "Hello <mark>World</mark>"
        );
    }

    #[test]
    fn test_highlight_query_is_literal_not_pattern() {
        assert_eq!(highlight("xaybz", "a.b"), "xaybz");
        assert_eq!(highlight("xa.bz", "a.b"), "x<mark>a.b</mark>z");
    }

    #[test]
    fn test_highlight_multiple_matches() {
        assert_eq!(
            highlight("foo bar foo", "foo"),
            "<mark>foo</mark> bar <mark>foo</mark>"
        );
    }

    #[test]
    fn test_highlight_matches_escaped_entities_consistently() {
        // Query "<b>" is escaped to "&lt;b&gt;" and matched against the
        // identically escaped text.
        assert_eq!(highlight("a <b> c", "<b>"), "a <mark>&lt;b&gt;</mark> c");
    }

    proptest! {
        #[test]
        fn prop_truncate_idempotent(s in ".{0,64}", n in 0usize..48) {
            let once = truncate(&s, n).into_owned();
            let twice = truncate(&once, n).into_owned();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_truncate_respects_budget(s in ".{0,64}", n in 1usize..48) {
            let out = truncate(&s, n);
            prop_assert!(out.chars().count() <= n.max(ELLIPSIS.chars().count()));
        }

        #[test]
        fn prop_truncate_noop_within_budget(s in ".{0,32}") {
            let n = s.chars().count();
            let out = truncate(&s, n);
            prop_assert_eq!(out.as_ref(), s.as_str());
        }

        #[test]
        fn prop_highlight_short_query_identity(s in ".{0,64}", q in ".{0,1}") {
            prop_assert_eq!(highlight(&s, &q), escape_for_display(&s).into_owned());
        }
    }
}
