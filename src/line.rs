//! Decoding of single `Key <data>` lines.
//!
//! These helpers are stateless: each takes a line and the key the caller
//! expects it to start with, and decodes whatever follows.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::FormatError;
use crate::shared_types::{BoundingBox, Vector};

/// Returns the data following `key`, with leading whitespace removed.
pub(crate) fn value<'a>(line: &'a str, key: &str) -> Result<&'a str, FormatError> {
    let rest = line
        .strip_prefix(key)
        .ok_or_else(|| FormatError::new(format!("expected '{}', found '{}'", key, line)))?;
    let rest = rest.trim_start();
    if rest.is_empty() {
        return Err(FormatError::new(format!("missing value for '{}'", key)));
    }
    Ok(rest)
}

pub(crate) fn decimal(line: &str, key: &str) -> Result<Decimal, FormatError> {
    value(line, key).and_then(|v| parse_decimal(v.trim_end()))
}

pub(crate) fn integer(line: &str, key: &str) -> Result<i32, FormatError> {
    value(line, key).and_then(|v| parse_int(v.trim_end()))
}

pub(crate) fn string(line: &str, key: &str) -> Result<String, FormatError> {
    value(line, key).map(String::from)
}

pub(crate) fn boolean(line: &str, key: &str) -> Result<bool, FormatError> {
    let v = value(line, key)?;
    if v.starts_with("true") {
        Ok(true)
    } else if v.starts_with("false") {
        Ok(false)
    } else {
        Err(FormatError::new(format!("invalid boolean '{}' for '{}'", v, key)))
    }
}

pub(crate) fn vector(line: &str, key: &str) -> Result<Vector, FormatError> {
    value(line, key).and_then(parse_vector)
}

pub(crate) fn bounding_box(line: &str, key: &str) -> Result<BoundingBox, FormatError> {
    value(line, key).and_then(parse_bounding_box)
}

/// Returns the first whitespace-delimited token of a line.
pub(crate) fn keyword(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

/// Returns `true` if the first token of `line` is exactly `key`.
pub(crate) fn has_key(line: &str, key: &str) -> bool {
    keyword(line) == key
}

pub(crate) fn parse_decimal(token: &str) -> Result<Decimal, FormatError> {
    Decimal::from_str(token)
        .or_else(|_| Decimal::from_scientific(token))
        .map_err(|_| FormatError::new(format!("invalid number '{}'", token)))
}

pub(crate) fn parse_int(token: &str) -> Result<i32, FormatError> {
    token.parse().map_err(|_| FormatError::new(format!("invalid integer '{}'", token)))
}

/// Parses a hexadecimal number, optionally wrapped in angle brackets.
pub(crate) fn parse_hex(token: &str) -> Result<u32, FormatError> {
    let digits = token.strip_prefix('<').and_then(|t| t.strip_suffix('>')).unwrap_or(token);
    u32::from_str_radix(digits, 16)
        .map_err(|_| FormatError::new(format!("invalid hexadecimal number '{}'", token)))
}

pub(crate) fn parse_vector(data: &str) -> Result<Vector, FormatError> {
    match decimals::<2>(data) {
        Some([x, y]) => Ok(Vector::new(x?, y?)),
        None => Err(FormatError::new(format!("expected two numbers, found '{}'", data))),
    }
}

pub(crate) fn parse_bounding_box(data: &str) -> Result<BoundingBox, FormatError> {
    match decimals::<4>(data) {
        Some([left, bottom, right, top]) => Ok(BoundingBox::new(left?, bottom?, right?, top?)),
        None => Err(FormatError::new(format!("expected four numbers, found '{}'", data))),
    }
}

/// Splits `data` into exactly `N` numbers, or `None` if the count is wrong.
fn decimals<const N: usize>(data: &str) -> Option<[Result<Decimal, FormatError>; N]> {
    let tokens: Vec<&str> = data.split_whitespace().collect();
    if tokens.len() != N {
        return None;
    }
    Some(std::array::from_fn(|i| parse_decimal(tokens[i])))
}
