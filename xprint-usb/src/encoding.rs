//! Text normalization for ASCII-only receipt printers
//!
//! The printers this crate targets are driven in their default code page,
//! so anything outside 7-bit ASCII would come out as garbage. Text is
//! reduced to its ASCII subset: non-ASCII characters are dropped, never
//! substituted or escaped.

use encoding_rs::Encoding;

/// Drop every character outside the 7-bit range
///
/// ASCII control characters are kept. `"café☕"` becomes `"caf"`.
pub fn strip_non_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while !rest.is_empty() {
        let valid = Encoding::ascii_valid_up_to(rest.as_bytes());
        out.push_str(&rest[..valid]);
        rest = &rest[valid..];

        // The byte at `valid` starts a multi-byte character; skip all of it.
        if let Some(dropped) = rest.chars().next() {
            rest = &rest[dropped.len_utf8()..];
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_untouched() {
        assert_eq!(strip_non_ascii("Hello, World! 123"), "Hello, World! 123");
        assert_eq!(strip_non_ascii(""), "");
    }

    #[test]
    fn test_drops_non_ascii() {
        assert_eq!(strip_non_ascii("café☕"), "caf");
        assert_eq!(strip_non_ascii("Total: 5€"), "Total: 5");
        assert_eq!(strip_non_ascii("你好 world"), " world");
        assert_eq!(strip_non_ascii("naïve façade"), "nave faade");
    }

    #[test]
    fn test_only_non_ascii_yields_empty() {
        assert_eq!(strip_non_ascii("☕🍕日本"), "");
    }

    #[test]
    fn test_long_runs_between_non_ascii() {
        let ascii = "x".repeat(100);
        let text = format!("{ascii}é{ascii}€{ascii}");
        assert_eq!(strip_non_ascii(&text), ascii.repeat(3));
    }

    #[test]
    fn test_control_characters_kept() {
        assert_eq!(strip_non_ascii("a\tb\r\nc"), "a\tb\r\nc");
    }
}
