//! Cleanup of text recovered from a page's text layer.
//!
//! PDFium's clipped-text API returns `\r\n` between lines and marks
//! generated hyphens and other layout artefacts with control characters.
//! Left alone these end up in the output file as stray bytes. Each rule is a
//! pure `&str → String` pass; [`clean_region_text`] runs them in order and
//! trims the result.
//!
//! Rules (applied in order):
//! 1. Normalise line endings (CRLF / CR → LF)
//! 2. Strip invisible characters (zero-width space, BOM, soft hyphen, controls)
//! 3. Trim leading/trailing whitespace

use once_cell::sync::Lazy;
use regex::Regex;

/// Clean and trim the text recovered for one highlighted region.
pub fn clean_region_text(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    s.trim().to_string()
}

/// Join per-region texts with a single space, skipping empty ones.
pub fn join_regions<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts
        .into_iter()
        .filter(|p| !p.as_ref().is_empty())
        .fold(String::new(), |mut acc, p| {
            if !acc.is_empty() {
                acc.push(' ');
            }
            acc.push_str(p.as_ref());
            acc
        })
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Strip invisible characters ───────────────────────────────────────

// Zero-width space/joiners, word joiner, BOM, soft hyphen, the U+FFFE
// non-character, and C0/C1 controls except tab and newline.
static RE_INVISIBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\u{200B}-\u{200D}\u{2060}\u{FEFF}\u{00AD}\u{FFFE}\x00-\x08\x0B-\x1F\x7F-\x9F]")
        .unwrap()
});

fn remove_invisible_chars(input: &str) -> String {
    RE_INVISIBLE.replace_all(input, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn test_remove_invisible() {
        let input = "hello\u{200B}world\u{FEFF}foo\u{00AD}bar\u{2}baz";
        assert_eq!(remove_invisible_chars(input), "helloworldfoobarbaz");
    }

    #[test]
    fn test_remove_invisible_keeps_tabs_and_newlines() {
        assert_eq!(remove_invisible_chars("a\tb\nc"), "a\tb\nc");
    }

    #[test]
    fn test_clean_region_text() {
        assert_eq!(clean_region_text("  first line\r\nsecond line \r\n"), "first line\nsecond line");
        assert_eq!(clean_region_text(" \r\n\t "), "");
    }

    #[test]
    fn test_join_regions_single_space() {
        assert_eq!(join_regions(["alpha", "beta", "gamma"]), "alpha beta gamma");
    }

    #[test]
    fn test_join_regions_skips_empty() {
        assert_eq!(join_regions(["", "beta", "", "gamma", ""]), "beta gamma");
        assert_eq!(join_regions(Vec::<String>::new()), "");
    }
}
