//! Escaping of SGF `Text` and `SimpleText` values.
//!
//! Reserved characters inside a value are `]`, `:` and `\`; each is written
//! with a leading backslash. A backslash directly in front of a line break is
//! a soft line break and disappears together with the break.

const BACKSLASH: char = '\\';

/// Characters that must be preceded by a backslash inside a value.
pub fn is_reserved(c: char) -> bool {
    matches!(c, ']' | ':' | BACKSLASH)
}

/// Unicode general category Cf (invisible format characters).
fn is_format(c: char) -> bool {
    matches!(c,
        '\u{00AD}'
        | '\u{0600}'..='\u{0605}'
        | '\u{061C}'
        | '\u{06DD}'
        | '\u{070F}'
        | '\u{0890}'..='\u{0891}'
        | '\u{08E2}'
        | '\u{180E}'
        | '\u{200B}'..='\u{200F}'
        | '\u{202A}'..='\u{202E}'
        | '\u{2060}'..='\u{2064}'
        | '\u{2066}'..='\u{206F}'
        | '\u{FEFF}'
        | '\u{FFF9}'..='\u{FFFB}'
        | '\u{110BD}'
        | '\u{110CD}'
        | '\u{13430}'..='\u{1343F}'
        | '\u{1BCA0}'..='\u{1BCA3}'
        | '\u{1D173}'..='\u{1D17A}'
        | '\u{E0001}'
        | '\u{E0020}'..='\u{E007F}'
    )
}

fn is_printable(c: char) -> bool {
    c == ' ' || !(c.is_control() || c.is_whitespace() || is_format(c))
}

/// Escape user text for storage in an SGF value.
///
/// - non-printables other than `\n` become a single space
/// - `\` followed by `\n` (soft line break) is dropped entirely
/// - `\n` is dropped for SimpleText, kept for Text
/// - `]`, `:` and `\` get a leading backslash
///
/// Non-printables and soft line breaks do not survive [`unescape`]; every
/// other input does: `unescape(&escape(x, false)) == x`.
pub fn escape(text: &str, is_simple_text: bool) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut pending_backslash = false;

    for c in text.chars() {
        if pending_backslash {
            pending_backslash = false;
            if c == '\n' {
                continue;
            }
            out.push(BACKSLASH);
            out.push(BACKSLASH);
        }

        match c {
            BACKSLASH => pending_backslash = true,
            '\n' if is_simple_text => {}
            '\n' => out.push(c),
            c if !is_printable(c) => out.push(' '),
            c if is_reserved(c) => {
                out.push(BACKSLASH);
                out.push(c);
            }
            c => out.push(c),
        }
    }

    if pending_backslash {
        out.push(BACKSLASH);
        out.push(BACKSLASH);
    }
    out
}

/// Undo [`escape`] for display.
///
/// A backslash in front of a reserved character is dropped; any other
/// backslash was not an escape and is kept as is.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_escape = false;

    for c in text.chars() {
        if in_escape {
            if !is_reserved(c) {
                out.push(BACKSLASH);
            }
            out.push(c);
            in_escape = false;
        } else if c == BACKSLASH {
            in_escape = true;
        } else {
            out.push(c);
        }
    }

    // a trailing lone backslash escapes nothing
    if in_escape {
        out.push(BACKSLASH);
    }
    out
}
