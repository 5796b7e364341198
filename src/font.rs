//! The metrics of a whole font.

use std::path::{Path, PathBuf};
use std::str::FromStr;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::character::{CharId, Character, CharacterIndex};
use crate::composite::Composite;
use crate::direction::DirectionMetrics;
use crate::error::{FormatError, LoadError};
use crate::kerning::{KerningPair, TrackKern};
use crate::parse;
use crate::shared_types::{BoundingBox, Direction, Vector};

/// The contents of an [Adobe Font Metrics][afm] file.
///
/// A `FontMetrics` is built once by one of the parsing constructors and
/// cannot be modified afterwards, apart from its descriptive header fields.
///
/// [afm]: https://adobe-type-tools.github.io/font-tech-notes/pdfs/5004.AFM_Spec.pdf
#[derive(Debug, Clone, Default, PartialEq)]
#[non_exhaustive]
pub struct FontMetrics {
    /// The AFM format version, from the `StartFontMetrics` line.
    pub afm_version: Option<String>,
    /// The PostScript name of the font.
    pub font_name: Option<String>,
    /// The full, human readable name of the font.
    pub full_name: Option<String>,
    /// The name of the typeface family.
    pub family_name: Option<String>,
    /// The weight of the font, such as `Bold`.
    pub weight: Option<String>,
    /// The union of all character bounding boxes.
    pub font_bbox: Option<BoundingBox>,
    /// The version of the font program.
    pub version: Option<String>,
    /// The font's trademark or copyright notice.
    pub notice: Option<String>,
    /// The encoding the character codes refer to, such as `AdobeStandardEncoding`.
    pub encoding_scheme: Option<String>,
    /// The composite font mapping scheme.
    pub mapping_scheme: Option<i32>,
    /// The escape byte for escape-mapped composite fonts.
    pub esc_char: Option<i32>,
    /// The name of the glyph set, such as `AdobeStandardLatin`.
    pub character_set: Option<String>,
    /// The number of characters the font declares.
    pub characters_count: Option<i32>,
    /// Whether the font is a base font (as opposed to a composite font).
    pub is_base_font: Option<bool>,
    /// The vector from origin 0 to origin 1, when shared by all characters.
    pub vvector: Option<Vector>,
    /// Whether `vvector` applies to every character.
    pub is_fixed_v: Option<bool>,
    /// Whether the font is a CID-keyed font.
    pub is_cid_font: Option<bool>,
    /// Height of flat capital letters.
    pub cap_height: Option<Decimal>,
    /// Height of flat lowercase letters.
    pub x_height: Option<Decimal>,
    /// Height of lowercase ascenders.
    pub ascender: Option<Decimal>,
    /// Depth of lowercase descenders.
    pub descender: Option<Decimal>,
    /// Dominant width of horizontal stems.
    pub std_hw: Option<Decimal>,
    /// Dominant width of vertical stems.
    pub std_vw: Option<Decimal>,
    /// The number of explicitly described writing directions, from `MetricsSets`.
    pub metrics_sets: Option<u8>,
    /// Metrics for writing direction 0.
    pub direction0_metrics: Option<DirectionMetrics>,
    /// Metrics for writing direction 1.
    pub direction1_metrics: Option<DirectionMetrics>,
    pub(crate) characters: Vec<Character>,
    pub(crate) index: CharacterIndex,
    pub(crate) track_kerning: Vec<TrackKern>,
    pub(crate) vertical_kerning: Vec<KerningPair>,
    pub(crate) composites: Vec<Composite>,
}

impl FontMetrics {
    /// Parse AFM data held in a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use afmetrics::{Decimal, FontMetrics};
    ///
    /// let afm = "StartFontMetrics 4.1
    /// FontName Test
    /// StartCharMetrics 1
    /// C 32 ; WX 250 ; N space ;
    /// EndCharMetrics
    /// EndFontMetrics";
    /// let font = FontMetrics::parse(afm).unwrap();
    /// assert_eq!(font.font_name.as_deref(), Some("Test"));
    /// assert_eq!(font.measure_string_width(&[32, 32]), Decimal::from(500));
    /// ```
    pub fn parse(data: &str) -> Result<FontMetrics, FormatError> {
        parse::parse_lines(data.lines())
    }

    /// Parse AFM data from a sequence of lines, in file order.
    pub fn from_lines<I, S>(lines: I) -> Result<FontMetrics, FormatError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        parse::parse_lines(lines)
    }

    /// Load and parse the AFM file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<FontMetrics, LoadError> {
        let path = path.as_ref();
        let data =
            std::fs::read_to_string(path).map_err(|e| LoadError::Io(path.to_owned(), e))?;
        FontMetrics::parse(&data).map_err(|e| LoadError::Format(path.to_owned(), e))
    }

    /// Load several AFM files, returning one result per path, in order.
    ///
    /// With the `rayon` feature enabled the files are parsed in parallel.
    pub fn load_all(paths: &[PathBuf]) -> Vec<Result<FontMetrics, LoadError>> {
        #[cfg(feature = "rayon")]
        let iter = paths.par_iter();
        #[cfg(not(feature = "rayon"))]
        let iter = paths.iter();

        iter.map(FontMetrics::load).collect()
    }

    /// All characters, in the order they appear in the file.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// The number of characters.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Returns `true` if the font has no characters.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Returns the character with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different font.
    pub fn character(&self, id: CharId) -> &Character {
        &self.characters[id.0]
    }

    /// Look up a character id by PostScript name.
    pub fn char_id_by_name(&self, name: &str) -> Option<CharId> {
        self.index.by_name(name)
    }

    /// Look up a character id by character code.
    pub fn char_id_by_code(&self, code: u16) -> Option<CharId> {
        self.index.by_code(code)
    }

    /// Look up a character by PostScript name.
    pub fn character_by_name(&self, name: &str) -> Option<&Character> {
        self.char_id_by_name(name).map(|id| self.character(id))
    }

    /// Look up a character by character code.
    pub fn character_by_code(&self, code: u16) -> Option<&Character> {
        self.char_id_by_code(code).map(|id| self.character(id))
    }

    /// The metrics for the given writing direction, if the font has any.
    pub fn direction_metrics(&self, direction: Direction) -> Option<&DirectionMetrics> {
        match direction {
            Direction::Horizontal => self.direction0_metrics.as_ref(),
            Direction::Vertical => self.direction1_metrics.as_ref(),
        }
    }

    /// The pair kerning adjustment when `second` follows `first`.
    pub fn kerning(&self, first: CharId, second: CharId) -> Option<Vector> {
        self.character(first).kerning_with(second)
    }

    /// The ligature that replaces `first` followed by `second`, if any.
    pub fn ligature(&self, first: CharId, second: CharId) -> Option<CharId> {
        self.character(first)
            .ligatures
            .iter()
            .find(|lig| lig.second == second)
            .map(|lig| lig.ligature)
    }

    /// Kerning pairs for writing direction 1, from a `KernPairs1` section.
    pub fn vertical_kerning(&self) -> &[KerningPair] {
        &self.vertical_kerning
    }

    /// Track kerning entries, in file order.
    pub fn track_kerns(&self) -> &[TrackKern] {
        &self.track_kerning
    }

    /// The track kerning amount, in points, for `degree` at `point_size`.
    pub fn track_kerning(&self, degree: i32, point_size: Decimal) -> Option<Decimal> {
        self.track_kerning
            .iter()
            .find(|track| track.degree == degree)
            .map(|track| track.kern_at(point_size))
    }

    /// Composite character descriptions, in file order.
    pub fn composites(&self) -> &[Composite] {
        &self.composites
    }

    /// Convert character codes into the sequence of characters that is
    /// actually set, after ligature substitution.
    ///
    /// The codes are scanned once, left to right. A character followed by the
    /// successor of one of its ligature rules is replaced, together with that
    /// successor, by the ligature; the first matching rule wins. The produced
    /// ligature is not examined for further substitution.
    ///
    /// Codes without a character are dropped, so kerning applies across them.
    /// They are not fully transparent, though: an unmapped code still occupies
    /// its scan position, and so separates a character from the successor of
    /// a ligature rule.
    pub fn shape(&self, codes: &[u16]) -> Vec<CharId> {
        let mut shaped = Vec::with_capacity(codes.len());
        let mut pos = 0;
        while pos < codes.len() {
            let Some(id) = self.index.by_code(codes[pos]) else {
                pos += 1;
                continue;
            };
            let ligature = codes.get(pos + 1).and_then(|&next| {
                self.character(id)
                    .ligatures
                    .iter()
                    .find(|lig| self.character(lig.second).code == Some(next))
            });
            match ligature {
                Some(lig) => {
                    shaped.push(lig.ligature);
                    pos += 2;
                }
                None => {
                    shaped.push(id);
                    pos += 1;
                }
            }
        }
        shaped
    }

    /// The horizontal advance of a string of character codes, in design units.
    ///
    /// This is the sum of the advance widths of the shaped characters (see
    /// [`FontMetrics::shape`]) plus the horizontal component of the kerning
    /// between each adjacent pair. A character without a general x width
    /// falls back to its direction 0 width, and otherwise contributes nothing.
    ///
    /// Sums that leave the range of [`Decimal`] saturate at its bounds.
    pub fn measure_string_width(&self, codes: &[u16]) -> Decimal {
        let shaped = self.shape(codes);
        let advance = shaped
            .iter()
            .map(|&id| advance_width(self.character(id)))
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let kerning = shaped
            .windows(2)
            .filter_map(|pair| self.kerning(pair[0], pair[1]))
            .fold(Decimal::ZERO, |total, kern| total.saturating_add(kern.x));
        advance.saturating_add(kerning)
    }
}

fn advance_width(character: &Character) -> Decimal {
    character.x_width.general.or(character.x_width.direction0).unwrap_or(Decimal::ZERO)
}

impl FromStr for FontMetrics {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontMetrics::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static LIGATURES: &str = "StartFontMetrics 4.1
FontName Test-Ligatures
StartCharMetrics 7
C 102 ; WX 333 ; N f ; L i fi ; L l fl ; L f ff ;
C 105 ; WX 278 ; N i ;
C 108 ; WX 278 ; N l ;
C -1 ; WX 556 ; N fi ;
C -1 ; WX 556 ; N fl ;
C 200 ; WX 600 ; N ff ; L i ffi ;
C -1 ; WX 834 ; N ffi ;
EndCharMetrics
EndFontMetrics";

    fn font(data: &str) -> FontMetrics {
        FontMetrics::parse(data).unwrap()
    }

    #[test]
    fn empty_input_measures_zero() {
        let font = font(LIGATURES);
        assert_eq!(font.measure_string_width(&[]), Decimal::ZERO);
        assert!(font.shape(&[]).is_empty());
    }

    #[test]
    fn ligature_replaces_pair() {
        let font = font(LIGATURES);
        assert_eq!(font.measure_string_width(&[102, 105]), Decimal::from(556));
        assert_eq!(font.measure_string_width(&[102, 108]), Decimal::from(556));
        let fi = font.char_id_by_name("fi").unwrap();
        assert_eq!(font.shape(&[102, 105]), vec![fi]);
    }

    #[test]
    fn ligatures_do_not_chain() {
        let font = font(LIGATURES);
        // f f -> ff, then i stays separate even though ff has an `L i ffi` rule
        let ff = font.char_id_by_name("ff").unwrap();
        let i = font.char_id_by_name("i").unwrap();
        assert_eq!(font.shape(&[102, 102, 105]), vec![ff, i]);
        assert_eq!(font.measure_string_width(&[102, 102, 105]), Decimal::from(878));
    }

    #[test]
    fn unmapped_codes_block_ligatures() {
        let font = font(LIGATURES);
        // the unmapped code still occupies the position after `f`
        assert_eq!(font.measure_string_width(&[102, 7, 105]), Decimal::from(611));
    }

    #[test]
    fn huge_widths_saturate() {
        let font = font(
            "StartFontMetrics 4.1
StartCharMetrics 2
C 65 ; WX 79228162514264337593543950335 ; N A ;
C 66 ; WX -79228162514264337593543950335 ; N B ;
EndCharMetrics
EndFontMetrics",
        );
        assert_eq!(font.measure_string_width(&[65, 65]), Decimal::MAX);
        assert_eq!(font.measure_string_width(&[66, 66, 66]), Decimal::MIN);
    }

    #[test]
    fn blank_names_are_not_indexed() {
        let font = font(
            "StartFontMetrics 4.1
StartCharMetrics 1
C 65 ; WX 500 ; N ;
EndCharMetrics
EndFontMetrics",
        );
        let id = font.char_id_by_code(65).unwrap();
        assert_eq!(font.character(id).name, None);
        assert_eq!(font.character(id).x_width.general, Some(Decimal::from(500)));
        assert_eq!(font.char_id_by_name(""), None);
        assert_eq!(font.measure_string_width(&[65]), Decimal::from(500));
    }

    #[test]
    fn lookups() {
        let font = font(LIGATURES);
        let f = font.char_id_by_code(102).unwrap();
        let i = font.char_id_by_name("i").unwrap();
        assert_eq!(font.ligature(f, i), font.char_id_by_name("fi"));
        assert_eq!(font.ligature(i, f), None);
        assert_eq!(font.kerning(f, i), None);
        assert_eq!(font.character_by_code(105).and_then(|c| c.name.as_deref()), Some("i"));
        assert!(font.character_by_name("ffl").is_none());
        assert_eq!(font.len(), 7);
        assert_eq!(f.index(), 0);
    }

    #[test]
    fn missing_width_counts_as_zero() {
        let font = font(
            "StartFontMetrics 4.1
StartCharMetrics 2
C 65 ; N A ;
C 66 ; W0X 600 ; N B ;
EndCharMetrics
EndFontMetrics",
        );
        assert_eq!(font.measure_string_width(&[65, 66]), Decimal::from(600));
    }

    #[test]
    fn from_str() {
        let font: FontMetrics = LIGATURES.parse().unwrap();
        assert_eq!(font.font_name.as_deref(), Some("Test-Ligatures"));
    }
}
