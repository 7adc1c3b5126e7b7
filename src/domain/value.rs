//! Property value codec.
//!
//! Naming: a *raw* value is the bracketed form produced by the parser
//! (`"[ab]"`), a *bare* value is its content without the brackets (`"ab"`).
//! All conversions are pure. The plain variants degrade to zero on bad input,
//! the `try_*` variants report a [`DomainError`].

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::text::{escape, unescape};

/// Board size covered by the point encoding.
pub const BOARD_SIZE: usize = 19;

/// Point value meaning "no point" (pass).
pub const PASS: &str = "tt";

/// `"[property value]"` → `"property value"`
pub fn unwrap_value(raw: &str) -> &str {
    if raw.len() < 2 {
        warn!("SGF property value format error: {:?}", raw);
    }
    let bare = raw.strip_prefix('[').unwrap_or(raw);
    bare.strip_suffix(']').unwrap_or(bare)
}

/// `"property value"` → `"[property value]"`
pub fn wrap_value(bare: &str) -> String {
    format!("[{}]", bare)
}

/// Split a composed value `"x:y"` on the first unescaped colon.
///
/// Returns the first part and, if the value was composed, the second.
/// Escaped colons in either part come back as plain `:`; other escapes are
/// left for [`unescape`].
pub fn split_composed(bare: &str) -> (String, Option<String>) {
    let mut first = String::new();
    let mut second: Option<String> = None;
    let mut in_escape = false;

    for c in bare.chars() {
        if !in_escape && c == ':' && second.is_none() {
            second = Some(String::new());
            continue;
        }
        let part = second.as_mut().unwrap_or(&mut first);
        if in_escape {
            if c != ':' {
                part.push('\\');
            }
            part.push(c);
            in_escape = false;
        } else if c == '\\' {
            in_escape = true;
        } else {
            part.push(c);
        }
    }
    if in_escape {
        second.as_mut().unwrap_or(&mut first).push('\\');
    }
    (first, second)
}

/// `"x"`, `"y"` → `"x:y"`
pub fn join_composed(x: &str, y: &str) -> String {
    format!("{}:{}", x, y)
}

/// Number, Double and Color-as-number values. Unparseable input yields 0.
pub fn parse_int(bare: &str) -> i64 {
    try_parse_int(bare).unwrap_or(0)
}

/// No trimming: `" 5"` is not a number.
pub fn try_parse_int(bare: &str) -> DomainResult<i64> {
    bare.parse()
        .map_err(|_| DomainError::InvalidNumber(bare.to_string()))
}

pub fn format_int(n: i64) -> String {
    n.to_string()
}

/// Real values. Unparseable input yields 0.0.
pub fn parse_real(bare: &str) -> f64 {
    try_parse_real(bare).unwrap_or(0.0)
}

pub fn try_parse_real(bare: &str) -> DomainResult<f64> {
    bare.parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .ok_or_else(|| DomainError::InvalidReal(bare.to_string()))
}

pub fn format_real(r: f64) -> String {
    r.to_string()
}

fn coord_to_char(n: usize) -> char {
    // callers guarantee n < BOARD_SIZE
    char::from(b'a' + n as u8)
}

fn char_to_coord(c: char) -> Option<usize> {
    c.is_ascii_lowercase().then(|| c as usize - 'a' as usize)
}

/// `(x, y)` → `"ab"`; anything off the board becomes the pass value `"tt"`.
pub fn point_to_value(x: usize, y: usize) -> String {
    if x >= BOARD_SIZE || y >= BOARD_SIZE {
        return PASS.to_string();
    }
    [coord_to_char(x), coord_to_char(y)].iter().collect()
}

/// `"ab"` → `(0, 1)`. Reads the first two characters only.
///
/// The empty value is a pass and maps to `(19, 19)` like `"tt"`; any other
/// unreadable coordinate maps to 0.
pub fn value_to_point(bare: &str) -> (usize, usize) {
    if bare.is_empty() {
        return (BOARD_SIZE, BOARD_SIZE);
    }
    let mut chars = bare.chars();
    let x = chars.next().and_then(char_to_coord).unwrap_or(0);
    let y = chars.next().and_then(char_to_coord).unwrap_or(0);
    (x, y)
}

pub fn try_value_to_point(bare: &str) -> DomainResult<(usize, usize)> {
    if bare.is_empty() {
        return Ok((BOARD_SIZE, BOARD_SIZE));
    }
    let invalid = || DomainError::InvalidPoint(bare.to_string());
    let mut chars = bare.chars();
    let x = chars.next().and_then(char_to_coord).ok_or_else(invalid)?;
    let y = chars.next().and_then(char_to_coord).ok_or_else(invalid)?;
    if chars.next().is_some() {
        return Err(invalid());
    }
    Ok((x, y))
}

/// `[x1, y1, x2, y2]` → `"ab:cd"`.
///
/// Fewer than four coordinates give an empty value; a corner off the board
/// collapses the whole value to `"tt"`.
pub fn points_to_value(p: &[usize]) -> String {
    if p.len() < 4 {
        return String::new();
    }
    if p[..4].iter().any(|&c| c >= BOARD_SIZE) {
        return PASS.to_string();
    }
    join_composed(&point_to_value(p[0], p[1]), &point_to_value(p[2], p[3]))
}

/// `"ab:cd"` → `[0, 1, 2, 3]`, `"ab"` → `[0, 1]`.
pub fn value_to_points(bare: &str) -> Vec<usize> {
    let (a, b) = split_composed(bare);
    let (x, y) = value_to_point(&a);
    match b {
        Some(b) => {
            let (m, n) = value_to_point(&b);
            vec![x, y, m, n]
        }
        None => vec![x, y],
    }
}

pub fn try_value_to_points(bare: &str) -> DomainResult<Vec<usize>> {
    let (a, b) = split_composed(bare);
    let (x, y) = try_value_to_point(&a)?;
    match b {
        Some(b) => {
            let (m, n) = try_value_to_point(&b)?;
            Ok(vec![x, y, m, n])
        }
        None => Ok(vec![x, y]),
    }
}

/// Player color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Black => "B",
            Color::White => "W",
        }
    }
}

/// SGF value types a caller can assign to a property identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    None,
    Number,
    Real,
    Double,
    Color,
    SimpleText,
    Text,
    Point,
    Move,
    Stone,
    CompressedPoint,
    Composed,
}

/// A decoded property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    None,
    Number(i64),
    Real(f64),
    Double(i64),
    Color(Color),
    SimpleText(String),
    Text(String),
    Point(usize, usize),
    Points(Vec<usize>),
    Composed(String, String),
}

/// Decode one raw value according to `ty`, degrading to zero values.
pub fn decode_value(raw: &str, ty: ValueType) -> PropValue {
    let bare = unwrap_value(raw);
    match ty {
        ValueType::None => PropValue::None,
        ValueType::Number => PropValue::Number(parse_int(bare)),
        ValueType::Real => PropValue::Real(parse_real(bare)),
        ValueType::Double => PropValue::Double(parse_int(bare)),
        ValueType::Color => PropValue::Color(if bare.trim() == "W" {
            Color::White
        } else {
            Color::Black
        }),
        ValueType::SimpleText => PropValue::SimpleText(unescape(bare)),
        ValueType::Text => PropValue::Text(unescape(bare)),
        ValueType::Point | ValueType::Move | ValueType::Stone => {
            let (x, y) = value_to_point(bare);
            PropValue::Point(x, y)
        }
        ValueType::CompressedPoint => PropValue::Points(value_to_points(bare)),
        ValueType::Composed => {
            let (a, b) = split_composed(bare);
            PropValue::Composed(unescape(&a), unescape(&b.unwrap_or_default()))
        }
    }
}

/// Strict counterpart of [`decode_value`].
pub fn try_decode_value(raw: &str, ty: ValueType) -> DomainResult<PropValue> {
    let bare = unwrap_value(raw);
    Ok(match ty {
        ValueType::Number => PropValue::Number(try_parse_int(bare)?),
        ValueType::Real => PropValue::Real(try_parse_real(bare)?),
        ValueType::Double => match try_parse_int(bare)? {
            d @ (1 | 2) => PropValue::Double(d),
            _ => return Err(DomainError::InvalidNumber(bare.to_string())),
        },
        ValueType::Color => match bare {
            "B" => PropValue::Color(Color::Black),
            "W" => PropValue::Color(Color::White),
            _ => return Err(DomainError::InvalidColor(bare.to_string())),
        },
        ValueType::Point | ValueType::Move | ValueType::Stone => {
            let (x, y) = try_value_to_point(bare)?;
            PropValue::Point(x, y)
        }
        ValueType::CompressedPoint => PropValue::Points(try_value_to_points(bare)?),
        _ => decode_value(raw, ty),
    })
}

/// Encode a decoded value back into its raw bracketed form.
pub fn encode_value(value: &PropValue) -> String {
    let bare = match value {
        PropValue::None => String::new(),
        PropValue::Number(n) | PropValue::Double(n) => format_int(*n),
        PropValue::Real(r) => format_real(*r),
        PropValue::Color(c) => c.as_str().to_string(),
        PropValue::SimpleText(t) => escape(t, true),
        PropValue::Text(t) => escape(t, false),
        PropValue::Point(x, y) => point_to_value(*x, *y),
        PropValue::Points(p) if p.len() < 4 => p
            .get(..2)
            .map(|xy| point_to_value(xy[0], xy[1]))
            .unwrap_or_default(),
        PropValue::Points(p) => points_to_value(p),
        PropValue::Composed(a, b) => join_composed(&escape(a, true), &escape(b, true)),
    };
    wrap_value(&bare)
}
