//! Tests for Text/SimpleText escaping

use proptest::prelude::*;
use rstest::rstest;

use sgftree::domain::text::{escape, unescape};

// ============================================================
// escape
// ============================================================

#[rstest]
#[case::plain("plain text", "plain text")]
#[case::close_bracket("a]b", r"a\]b")]
#[case::colon("x:y", r"x\:y")]
#[case::open_bracket_untouched("a[b", "a[b")]
#[case::backslash(r"a\b", r"a\\b")]
#[case::backslash_before_reserved(r"\]", r"\\\]")]
#[case::two_backslashes(r"\\", r"\\\\")]
#[case::three_backslashes(r"\\\", r"\\\\\\")]
#[case::trailing_backslash(r"end\", r"end\\")]
#[case::line_break_kept("line1\nline2", "line1\nline2")]
#[case::soft_line_break("soft\\\nbreak", "softbreak")]
#[case::tab_is_non_printable("tab\there", "tab here")]
#[case::bell_is_non_printable("a\u{7}b", "a b")]
#[case::unicode("棋譜 ü", "棋譜 ü")]
#[case::format_chars_are_non_printable("a\u{200b}b\u{feff}", "a b ")]
#[case::no_break_space_is_non_printable("a\u{a0}b", "a b")]
fn given_text_when_escaping_then_matches_table(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(escape(input, false), expected);
}

#[rstest]
#[case::line_break_dropped("a\nb", "ab")]
#[case::soft_line_break_dropped("a\\\nb", "ab")]
#[case::reserved_still_escaped("a:\nb]", r"a\:b\]")]
fn given_simple_text_when_escaping_then_has_no_line_breaks(
    #[case] input: &str,
    #[case] expected: &str,
) {
    assert_eq!(escape(input, true), expected);
}

// ============================================================
// unescape
// ============================================================

#[rstest]
#[case::close_bracket(r"a\]b", "a]b")]
#[case::colon(r"x\:y", "x:y")]
#[case::backslash(r"a\\b", r"a\b")]
#[case::non_reserved_keeps_backslash(r"a\b", r"a\b")]
#[case::escaped_backslash_then_bracket(r"\\\]", r"\]")]
#[case::lone_trailing_backslash(r"end\", r"end\")]
#[case::nothing_to_do("plain", "plain")]
fn given_escaped_text_when_unescaping_then_matches_table(
    #[case] input: &str,
    #[case] expected: &str,
) {
    assert_eq!(unescape(input), expected);
}

// ============================================================
// lossy cases
// ============================================================

#[test]
fn given_non_printable_when_round_tripping_then_becomes_space() {
    let text = "a\tb";
    assert_eq!(unescape(&escape(text, false)), "a b");
}

#[test]
fn given_soft_line_break_when_round_tripping_then_is_removed() {
    let text = "long\\\nline";
    assert_eq!(unescape(&escape(text, false)), "longline");
}

proptest! {
    #[test]
    fn prop_unescape_inverts_escape(text in "[a-zA-Z0-9 \\[\\]:;()\\\\\n]{0,40}") {
        prop_assume!(!text.contains("\\\n"));
        prop_assert_eq!(unescape(&escape(&text, false)), text);
    }

    #[test]
    fn prop_simple_text_escape_has_no_line_breaks(text in "[a-z \\]:\\\\\n]{0,40}") {
        prop_assert!(!escape(&text, true).contains('\n'));
    }
}
