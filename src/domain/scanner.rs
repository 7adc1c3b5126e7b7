//! Tokenizer for SGF text.
//!
//! Grammar recognized (whitespace allowed between all parts):
//!
//! ```text
//! token    = "(" | ")" | node
//! node     = ";" property*
//! property = [A-Z]+ value+
//! value    = "[" content "]"
//! ```
//!
//! `content` runs to the first `]` not preceded by an odd number of
//! backslashes. Anything else is skipped and reported as an error item; the
//! scanner always resumes behind it.

use std::ops::ControlFlow;

use tracing::trace;

use crate::domain::error::{DomainError, DomainResult};

/// One structural token. A node keeps its raw text including the leading `;`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    OpenBranch,
    CloseBranch,
    Node(&'a str),
}

/// A token with the byte offset it starts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spanned<'a> {
    pub offset: usize,
    pub token: Token<'a>,
}

/// Advance past ASCII/Unicode whitespace.
pub(crate) fn skip_whitespace(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(text.len(), |(i, _)| pos + i)
}

/// End of the uppercase identifier starting at `pos` (== `pos` if none).
pub(crate) fn identifier_end(text: &str, pos: usize) -> usize {
    text.as_bytes()[pos..]
        .iter()
        .position(|b| !b.is_ascii_uppercase())
        .map_or(text.len(), |i| pos + i)
}

/// End (exclusive, behind the `]`) of the bracketed value opening at `pos`.
///
/// `None` if the value never closes.
pub(crate) fn value_end(text: &str, pos: usize) -> Option<usize> {
    debug_assert_eq!(text.as_bytes().get(pos), Some(&b'['));
    let mut in_escape = false;
    for (i, &b) in text.as_bytes()[pos + 1..].iter().enumerate() {
        match b {
            _ if in_escape => in_escape = false,
            b'\\' => in_escape = true,
            b']' => return Some(pos + 1 + i + 1),
            _ => {}
        }
    }
    None
}

/// Scan one node starting at the `;` at `pos`.
///
/// Returns the end of the node text and, if a property broke off inside an
/// unclosed value, the offset of that value.
fn node_end(text: &str, pos: usize) -> (usize, Option<usize>) {
    let bytes = text.as_bytes();
    let mut end = pos + 1;

    loop {
        let ident = skip_whitespace(text, end);
        let ident_end = identifier_end(text, ident);
        if ident_end == ident {
            return (end, None);
        }

        let mut cursor = ident_end;
        let mut values = 0;
        loop {
            let open = skip_whitespace(text, cursor);
            if bytes.get(open) != Some(&b'[') {
                break;
            }
            match value_end(text, open) {
                Some(close) => {
                    cursor = close;
                    values += 1;
                }
                None => return (if values > 0 { cursor } else { end }, Some(open)),
            }
        }

        if values == 0 {
            return (end, None);
        }
        end = cursor;
    }
}

fn is_structural(c: char) -> bool {
    matches!(c, '(' | ')' | ';')
}

/// Iterator over the tokens of an SGF document.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    pending: Option<DomainError>,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            pending: None,
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = DomainResult<Spanned<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending.take() {
            return Some(Err(err));
        }

        let start = skip_whitespace(self.text, self.pos);
        let c = self.text[start..].chars().next()?;

        let token = match c {
            '(' => {
                self.pos = start + 1;
                Token::OpenBranch
            }
            ')' => {
                self.pos = start + 1;
                Token::CloseBranch
            }
            ';' => {
                let (end, unterminated) = node_end(self.text, start);
                if let Some(offset) = unterminated {
                    self.pending = Some(DomainError::UnterminatedValue { offset });
                }
                self.pos = end;
                Token::Node(&self.text[start..end])
            }
            _ => {
                let end = self.text[start..]
                    .char_indices()
                    .find(|&(_, c)| c.is_whitespace() || is_structural(c))
                    .map_or(self.text.len(), |(i, _)| start + i);
                self.pos = end;
                return Some(Err(DomainError::UnexpectedInput {
                    offset: start,
                    fragment: self.text[start..end].to_string(),
                }));
            }
        };

        trace!(offset = start, ?token, "token");
        Some(Ok(Spanned {
            offset: start,
            token,
        }))
    }
}

/// Callback-driven scan with early stop.
///
/// `on_tree(true)` for `(`, `on_tree(false)` for `)`, `on_node` with the raw
/// node text. Malformed input is skipped.
pub fn scan<T, N>(text: &str, mut on_tree: T, mut on_node: N) -> ControlFlow<()>
where
    T: FnMut(bool) -> ControlFlow<()>,
    N: FnMut(&str) -> ControlFlow<()>,
{
    for spanned in Scanner::new(text).flatten() {
        match spanned.token {
            Token::OpenBranch => on_tree(true)?,
            Token::CloseBranch => on_tree(false)?,
            Token::Node(node) => on_node(node)?,
        }
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_end_handles_escaped_brackets() {
        assert_eq!(value_end("[]", 0), Some(2));
        assert_eq!(value_end(r"[a\]b]", 0), Some(6));
        assert_eq!(value_end(r"[\\]x]", 0), Some(4));
        assert_eq!(value_end(r"[abc", 0), None);
    }

    #[test]
    fn test_node_end_stops_before_valueless_identifier() {
        let text = ";FF[4]GM";
        assert_eq!(node_end(text, 0), (6, None));
    }

    #[test]
    fn test_node_end_reports_unterminated_value() {
        let text = ";FF[4]C[open";
        assert_eq!(node_end(text, 0), (6, Some(7)));
    }
}
