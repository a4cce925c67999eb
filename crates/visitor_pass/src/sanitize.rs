//! Markup removal for free-text input.

use std::collections::HashSet;

/// Strips executable markup from a field value.
///
/// Implementations must be idempotent and leave letters, digits, spaces and
/// ordinary punctuation unchanged.
pub trait Sanitizer {
    fn sanitize(&self, input: &str) -> String;
}

impl<F> Sanitizer for F
where
    F: Fn(&str) -> String,
{
    fn sanitize(&self, input: &str) -> String {
        self(input)
    }
}

/// Upper bound on clean/decode rounds. Each round only shrinks the input,
/// so real values settle after two or three.
const MAX_ROUNDS: usize = 8;

/// HTML sanitizer backed by `ammonia` with no allowed tags.
///
/// Tags are dropped while their text survives, except `script` and `style`
/// whose content is removed entirely. The escapes ammonia writes for bare
/// `&`, `<`, `>` and non-breaking spaces are turned back into characters, and
/// the round is repeated until the value stops changing, so entity-encoded
/// markup cannot come back as a tag on a later pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupSanitizer;

impl MarkupSanitizer {
    pub fn new() -> Self {
        Self
    }
}

impl Sanitizer for MarkupSanitizer {
    fn sanitize(&self, input: &str) -> String {
        if !input.contains(['<', '>', '&']) {
            return input.to_owned();
        }
        let mut builder = ammonia::Builder::empty();
        builder.clean_content_tags(HashSet::from(["script", "style"]));

        let mut current = input.to_owned();
        for _ in 0..MAX_ROUNDS {
            let next = unescape(&builder.clean(&current).to_string());
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}

/// Reverse the text escaping done by the HTML serializer. `&amp;` goes last
/// so `&amp;lt;` decodes to `&lt;` and not `<`.
fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_owned();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_untouched() {
        let s = MarkupSanitizer::new();
        for plain in [
            "Juan Dela Cruz",
            "Blk 5 Lot 3, Zone 2, Lapasan (near the chapel)",
            "Meeting with Dr. Santos @ 10:30; bring ID #4",
            "  spaced  out  ",
        ] {
            assert_eq!(s.sanitize(plain), plain);
        }
    }

    #[test]
    fn bare_ampersand_and_angle_brackets_survive() {
        let s = MarkupSanitizer::new();
        for plain in ["Tom & Jerry St", "Gate 1 > Gate 2", "A&B", "1 < 2", "R&D bldg."] {
            assert_eq!(s.sanitize(plain), plain);
        }
    }

    #[test]
    fn encoded_markup_does_not_come_back_as_a_tag() {
        let s = MarkupSanitizer::new();
        let out = s.sanitize("&lt;script&gt;alert(1)&lt;/script&gt;Lobby");
        assert!(!out.contains("<script"), "got {out:?}");
        assert_eq!(s.sanitize(&out), out);
    }

    #[test]
    fn unescape_is_single_level() {
        assert_eq!(unescape("&amp;lt;b&amp;gt;"), "&lt;b&gt;");
        assert_eq!(unescape("a&nbsp;b"), "a\u{a0}b");
    }

    #[test]
    fn script_content_is_removed() {
        let s = MarkupSanitizer::new();
        assert_eq!(s.sanitize("Visit<script>alert(1)</script>"), "Visit");
        assert_eq!(s.sanitize("<b>Library</b> visit"), "Library visit");
    }

    #[test]
    fn event_handler_markup_is_dropped() {
        let s = MarkupSanitizer::new();
        let out = s.sanitize(r#"<img src=x onerror="alert(1)">Gate 2"#);
        assert_eq!(out, "Gate 2");
    }

    #[test]
    fn sanitizing_twice_changes_nothing() {
        let s = MarkupSanitizer::new();
        for input in [
            "Tom & Jerry",
            "a < b > c",
            "&amp;lt;b&amp;gt;",
            "<i>x</i><script>y</script>",
            "&lt;script&gt;",
            "plain",
        ] {
            let once = s.sanitize(input);
            assert_eq!(s.sanitize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn closures_are_sanitizers() {
        let upper = |s: &str| s.to_uppercase();
        assert_eq!(upper.sanitize("abc"), "ABC");
    }
}
