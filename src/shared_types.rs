//! Small numeric value types shared across the font model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A two-dimensional offset or advance, in design units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector {
    /// The horizontal component.
    pub x: Decimal,
    /// The vertical component.
    pub y: Decimal,
}

impl Vector {
    /// Create a new `Vector`.
    pub fn new(x: Decimal, y: Decimal) -> Self {
        Vector { x, y }
    }

    /// A vector with only a horizontal component.
    pub fn horizontal(x: Decimal) -> Self {
        Vector { x, y: Decimal::ZERO }
    }

    /// A vector with only a vertical component.
    pub fn vertical(y: Decimal) -> Self {
        Vector { x: Decimal::ZERO, y }
    }

    /// Converts the `Vector` to a [`kurbo::Vec2`].
    #[cfg(feature = "kurbo")]
    pub fn to_kurbo(self) -> kurbo::Vec2 {
        kurbo::Vec2::new(to_f64(self.x), to_f64(self.y))
    }
}

impl std::ops::Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector { x: self.x.saturating_add(rhs.x), y: self.y.saturating_add(rhs.y) }
    }
}

impl std::ops::AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        *self = *self + rhs;
    }
}

/// An axis-aligned box, in design units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// The minimum x coordinate.
    pub left: Decimal,
    /// The minimum y coordinate.
    pub bottom: Decimal,
    /// The maximum x coordinate.
    pub right: Decimal,
    /// The maximum y coordinate.
    pub top: Decimal,
}

impl BoundingBox {
    /// Create a new `BoundingBox` from its edges, in AFM order.
    pub fn new(left: Decimal, bottom: Decimal, right: Decimal, top: Decimal) -> Self {
        BoundingBox { left, bottom, right, top }
    }

    /// The horizontal extent of the box.
    pub fn width(&self) -> Decimal {
        self.right.saturating_sub(self.left)
    }

    /// The vertical extent of the box.
    pub fn height(&self) -> Decimal {
        self.top.saturating_sub(self.bottom)
    }

    /// Converts the `BoundingBox` to a [`kurbo::Rect`].
    #[cfg(feature = "kurbo")]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            to_f64(self.left),
            to_f64(self.bottom),
            to_f64(self.right),
            to_f64(self.top),
        )
    }
}

/// A set of advance widths along one axis.
///
/// AFM files may give a general width, and separate widths for writing
/// directions 0 and 1. Any subset of them may be present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidthSet {
    /// The width that applies to both writing directions.
    pub general: Option<Decimal>,
    /// The width for writing direction 0.
    pub direction0: Option<Decimal>,
    /// The width for writing direction 1.
    pub direction1: Option<Decimal>,
}

impl WidthSet {
    /// Returns `true` if no width was given at all.
    pub fn is_empty(&self) -> bool {
        self.general.is_none() && self.direction0.is_none() && self.direction1.is_none()
    }

    /// The width to use for the given writing direction.
    ///
    /// An explicit per-direction width takes precedence over the general one.
    pub fn for_direction(&self, direction: Direction) -> Option<Decimal> {
        let specific = match direction {
            Direction::Horizontal => self.direction0,
            Direction::Vertical => self.direction1,
        };
        specific.or(self.general)
    }
}

/// One of the two AFM writing directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Writing direction 0.
    Horizontal,
    /// Writing direction 1.
    Vertical,
}

impl Direction {
    /// The number AFM uses for this direction.
    pub fn index(self) -> u8 {
        match self {
            Direction::Horizontal => 0,
            Direction::Vertical => 1,
        }
    }

    pub(crate) fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Direction::Horizontal),
            1 => Some(Direction::Vertical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.index())
    }
}

#[cfg(feature = "kurbo")]
fn to_f64(value: Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    value.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{assert_ser_tokens, Token};

    #[test]
    fn width_for_direction_prefers_specific() {
        let widths = WidthSet {
            general: Some(Decimal::from(500)),
            direction0: None,
            direction1: Some(Decimal::from(1000)),
        };
        assert_eq!(widths.for_direction(Direction::Horizontal), Some(Decimal::from(500)));
        assert_eq!(widths.for_direction(Direction::Vertical), Some(Decimal::from(1000)));
        assert!(!widths.is_empty());
        assert!(WidthSet::default().is_empty());
    }

    #[test]
    fn bbox_extent() {
        let bbox = BoundingBox::new(
            Decimal::from(-166),
            Decimal::from(-225),
            Decimal::from(1000),
            Decimal::from(931),
        );
        assert_eq!(bbox.width(), Decimal::from(1166));
        assert_eq!(bbox.height(), Decimal::from(1156));
    }

    #[test]
    fn vector_sum() {
        let mut v = Vector::horizontal(Decimal::from(-50));
        v += Vector::vertical(Decimal::from(20));
        assert_eq!(v, Vector::new(Decimal::from(-50), Decimal::from(20)));
        assert_eq!(v + v, Vector::new(Decimal::from(-100), Decimal::from(40)));
    }

    #[test]
    fn serialize_vector() {
        let v = Vector::new(Decimal::new(125, 1), Decimal::ZERO);
        assert_ser_tokens(
            &v,
            &[
                Token::Struct { name: "Vector", len: 2 },
                Token::Str("x"),
                Token::Str("12.5"),
                Token::Str("y"),
                Token::Str("0"),
                Token::StructEnd,
            ],
        );
    }

    #[cfg(feature = "kurbo")]
    #[test]
    fn kurbo_conversion() {
        let bbox = BoundingBox::new(
            Decimal::from(20),
            Decimal::ZERO,
            Decimal::new(3835, 1),
            Decimal::from(683),
        );
        assert_eq!(bbox.to_kurbo(), kurbo::Rect::new(20.0, 0.0, 383.5, 683.0));
    }
}
