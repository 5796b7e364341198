//! Reading [Adobe Font Metrics][afm] files.
//!
//! An AFM file describes the metrics of a font: global dimensions, the advance
//! width and bounding box of every character, ligature rules and kerning. This
//! crate parses such a file into a [`FontMetrics`] and can measure the width of
//! a run of text, applying ligatures and pair kerning along the way.
//!
//! All numbers are kept as fixed-point [`Decimal`] values, so widths add up
//! exactly.
//!
//! [afm]: https://adobe-type-tools.github.io/font-tech-notes/pdfs/5004.AFM_Spec.pdf
//!
//! # Basic usage:
//!
//! ```no_run
//! use afmetrics::FontMetrics;
//!
//! let font = FontMetrics::load("Times-Roman.afm").expect("failed to load font");
//! let width = font.measure_string_width(&[b'f' as u16, b'i' as u16]);
//! println!("{} is {} units wide", "fi", width);
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

mod character;
mod composite;
mod direction;
pub mod error;
mod font;
mod kerning;
mod ligature;
mod line;
mod name;
mod parse;
mod shared_types;

pub use character::{CharId, Character, Ligature};
pub use composite::{Composite, CompositePart};
pub use direction::DirectionMetrics;
pub use error::{FormatError, LoadError};
pub use font::FontMetrics;
pub use kerning::{KerningPair, TrackKern};
pub use name::Name;
pub use rust_decimal::Decimal;
pub use shared_types::{BoundingBox, Direction, Vector, WidthSet};
