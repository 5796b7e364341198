//! Metrics that apply to a single writing direction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::line::{self, keyword};
use crate::shared_types::Vector;

/// Metrics for one writing direction, from a `StartDirection` block or from
/// the font header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionMetrics {
    /// Distance from the baseline to the centre of the underline.
    pub underline_position: Option<Decimal>,
    /// Stroke width of the underline.
    pub underline_thickness: Option<Decimal>,
    /// Angle of the dominant vertical strokes, in degrees counter-clockwise.
    pub italic_angle: Option<Decimal>,
    /// The common advance of every character, for fixed-pitch fonts.
    pub char_width: Option<Vector>,
    /// Whether every character has the same advance.
    pub is_fixed_pitch: bool,
}

/// Accumulates direction metrics fields one line at a time.
#[derive(Debug, Clone, Default)]
pub(crate) struct DirectionMetricsBuilder {
    underline_position: Option<Decimal>,
    underline_thickness: Option<Decimal>,
    italic_angle: Option<Decimal>,
    char_width: Option<Vector>,
    is_fixed_pitch: Option<bool>,
}

impl DirectionMetricsBuilder {
    /// Consume `text` if it holds a direction metrics field.
    ///
    /// Returns `Ok(false)` for lines that are not direction metrics.
    pub(crate) fn accept(&mut self, text: &str) -> Result<bool, FormatError> {
        match keyword(text) {
            key @ "UnderlinePosition" => {
                self.underline_position = Some(line::decimal(text, key)?)
            }
            key @ "UnderlineThickness" => {
                self.underline_thickness = Some(line::decimal(text, key)?)
            }
            key @ "ItalicAngle" => self.italic_angle = Some(line::decimal(text, key)?),
            key @ "CharWidth" => self.char_width = Some(line::vector(text, key)?),
            key @ "IsFixedPitch" => self.is_fixed_pitch = Some(line::boolean(text, key)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Returns `true` if no field has been seen.
    pub(crate) fn is_empty(&self) -> bool {
        self.underline_position.is_none()
            && self.underline_thickness.is_none()
            && self.italic_angle.is_none()
            && self.char_width.is_none()
            && self.is_fixed_pitch.is_none()
    }

    pub(crate) fn build(self) -> Result<DirectionMetrics, FormatError> {
        if self.char_width.is_some() && self.is_fixed_pitch == Some(false) {
            return Err(FormatError::new("CharWidth given for a font with IsFixedPitch false"));
        }
        let is_fixed_pitch = self.is_fixed_pitch.unwrap_or(self.char_width.is_some());
        Ok(DirectionMetrics {
            underline_position: self.underline_position,
            underline_thickness: self.underline_thickness,
            italic_angle: self.italic_angle,
            char_width: self.char_width,
            is_fixed_pitch,
        })
    }
}
