//! Pair and track kerning.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::character::{CharId, CharacterIndex};
use crate::error::FormatError;
use crate::line::{parse_decimal, parse_hex, parse_int};
use crate::shared_types::Vector;

/// A kerning adjustment between two adjacent characters.
///
/// A pair is stored on its `first` character; `second` only refers to the
/// character that must follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KerningPair {
    /// The earlier character of the pair.
    pub first: CharId,
    /// The later character of the pair.
    pub second: CharId,
    /// The adjustment to apply between the two characters.
    pub vector: Vector,
}

impl KerningPair {
    /// Parse one line of a `KernPairs` section.
    ///
    /// Supported forms are `KP`, `KPH`, `KPX` and `KPY`. Characters are
    /// looked up in `index`, which must already hold every character.
    pub(crate) fn parse(line: &str, index: &CharacterIndex) -> Result<KerningPair, FormatError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (first, second, vector) = match tokens.as_slice() {
            ["KP", first, second, dx, dy] => (
                index.require_name(first)?,
                index.require_name(second)?,
                Vector::new(parse_decimal(dx)?, parse_decimal(dy)?),
            ),
            ["KPH", first, second, dx, dy] => (
                index.require_code(hex_code(first)?)?,
                index.require_code(hex_code(second)?)?,
                Vector::new(parse_decimal(dx)?, parse_decimal(dy)?),
            ),
            ["KPX", first, second, dx] => (
                index.require_name(first)?,
                index.require_name(second)?,
                Vector::horizontal(parse_decimal(dx)?),
            ),
            ["KPY", first, second, dy] => (
                index.require_name(first)?,
                index.require_name(second)?,
                Vector::vertical(parse_decimal(dy)?),
            ),
            _ => return Err(FormatError::new(format!("invalid kerning pair '{}'", line))),
        };
        Ok(KerningPair { first, second, vector })
    }
}

fn hex_code(token: &str) -> Result<u16, FormatError> {
    let code = parse_hex(token)?;
    u16::try_from(code)
        .map_err(|_| FormatError::new(format!("character code '{}' out of range", token)))
}

/// A track kerning entry, from a `TrackKern` line.
///
/// Track kerning is a point-size dependent adjustment applied between every
/// pair of characters. Between `min_point_size` and `max_point_size` the
/// amount is interpolated linearly; outside that range it is constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackKern {
    /// The degree of tightness; negative values are tighter.
    pub degree: i32,
    /// The smallest point size of the range.
    pub min_point_size: Decimal,
    /// The kerning amount at `min_point_size`, in points.
    pub min_kern: Decimal,
    /// The largest point size of the range.
    pub max_point_size: Decimal,
    /// The kerning amount at `max_point_size`, in points.
    pub max_kern: Decimal,
}

impl TrackKern {
    /// Parse a `TrackKern degree min-ptsize min-kern max-ptsize max-kern` line.
    pub(crate) fn parse(line: &str) -> Result<TrackKern, FormatError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            ["TrackKern", degree, min_point_size, min_kern, max_point_size, max_kern] => {
                Ok(TrackKern {
                    degree: parse_int(degree)?,
                    min_point_size: parse_decimal(min_point_size)?,
                    min_kern: parse_decimal(min_kern)?,
                    max_point_size: parse_decimal(max_point_size)?,
                    max_kern: parse_decimal(max_kern)?,
                })
            }
            _ => Err(FormatError::new(format!("invalid track kern '{}'", line))),
        }
    }

    /// The kerning amount, in points, at the given point size.
    ///
    /// Intermediate results that leave the range of [`Decimal`] saturate.
    pub fn kern_at(&self, point_size: Decimal) -> Decimal {
        if point_size <= self.min_point_size || self.max_point_size <= self.min_point_size {
            return self.min_kern;
        }
        if point_size >= self.max_point_size {
            return self.max_kern;
        }
        let offset = point_size.saturating_sub(self.min_point_size);
        let span = self.max_point_size.saturating_sub(self.min_point_size);
        // span is positive and offset never exceeds it, so t lies in [0, 1]
        let t = offset.checked_div(span).unwrap_or(Decimal::ZERO);
        let delta = self.max_kern.saturating_sub(self.min_kern).saturating_mul(t);
        self.min_kern.saturating_add(delta)
    }
}
