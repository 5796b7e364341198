//! Individual character metrics, and the parser for `C ... ;` records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::kerning::KerningPair;
use crate::line::{parse_bounding_box, parse_decimal, parse_hex, parse_int, parse_vector};
use crate::name::Name;
use crate::shared_types::{BoundingBox, Vector, WidthSet};

/// The position of a [`Character`] within its font.
///
/// Ids are only meaningful for the [`FontMetrics`] that issued them.
///
/// [`FontMetrics`]: crate::FontMetrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharId(pub(crate) usize);

impl CharId {
    /// The index of the character in [`FontMetrics::characters`].
    ///
    /// [`FontMetrics::characters`]: crate::FontMetrics::characters
    pub fn index(self) -> usize {
        self.0
    }
}

/// The metrics of a single character, from one line of a `CharMetrics` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// The character code, or `None` if the character is unencoded.
    pub code: Option<u16>,
    /// The PostScript name of the character.
    pub name: Option<Name>,
    /// Advance widths along the x axis.
    pub x_width: WidthSet,
    /// Advance widths along the y axis.
    pub y_width: WidthSet,
    /// The vector from origin 0 to origin 1.
    pub vvector: Option<Vector>,
    /// The bounding box of the glyph.
    pub bounding_box: Option<BoundingBox>,
    /// Ligatures that start with this character, in file order.
    pub ligatures: Vec<Ligature>,
    /// Kerning pairs that start with this character, in file order.
    pub kerning_pairs: Vec<KerningPair>,
}

/// A ligature rule: `first` followed by `second` is replaced by `ligature`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ligature {
    /// The character that owns the rule.
    pub first: CharId,
    /// The character that must follow `first`.
    pub second: CharId,
    /// The character that replaces the pair.
    pub ligature: CharId,
}

impl Character {
    /// The kerning adjustment to apply when `second` follows this character.
    ///
    /// If there are several pairs for the same successor, the first one wins.
    pub fn kerning_with(&self, second: CharId) -> Option<Vector> {
        self.kerning_pairs.iter().find(|pair| pair.second == second).map(|pair| pair.vector)
    }
}

/// A ligature as written in the file, before names are resolved.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingLigature {
    pub(crate) second: Name,
    pub(crate) ligature: Name,
}

/// A parsed character record along with its unresolved ligatures.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CharRecord {
    pub(crate) character: Character,
    pub(crate) ligatures: Vec<PendingLigature>,
}

impl CharRecord {
    /// Parse a `;` delimited character metrics line, such as
    /// `C 102 ; WX 333 ; N f ; B 20 0 383 683 ; L i fi ;`.
    pub(crate) fn parse(line: &str) -> Result<CharRecord, FormatError> {
        let mut character = Character::default();
        let mut ligatures = Vec::new();

        for segment in line.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, data) = match segment.split_once(char::is_whitespace) {
                Some((key, data)) => (key, data.trim()),
                None => (segment, ""),
            };
            match key {
                "C" => character.code = char_code(parse_int(single(key, data)?)?)?,
                "CH" => {
                    let code = parse_hex(single(key, data)?)?;
                    character.code = Some(u16::try_from(code).map_err(|_| {
                        FormatError::new(format!("character code '{}' out of range", data))
                    })?);
                }
                // a blank name leaves the character reachable by code only
                "N" if data.is_empty() => character.name = None,
                "N" => character.name = Some(Name::new(single(key, data)?)?),
                "WX" => character.x_width.general = Some(parse_decimal(single(key, data)?)?),
                "W0X" => character.x_width.direction0 = Some(parse_decimal(single(key, data)?)?),
                "W1X" => character.x_width.direction1 = Some(parse_decimal(single(key, data)?)?),
                "WY" => character.y_width.general = Some(parse_decimal(single(key, data)?)?),
                "W0Y" => character.y_width.direction0 = Some(parse_decimal(single(key, data)?)?),
                "W1Y" => character.y_width.direction1 = Some(parse_decimal(single(key, data)?)?),
                "W" => {
                    let v = parse_vector(data)?;
                    character.x_width.general = Some(v.x);
                    character.y_width.general = Some(v.y);
                }
                "W0" => {
                    let v = parse_vector(data)?;
                    character.x_width.direction0 = Some(v.x);
                    character.y_width.direction0 = Some(v.y);
                }
                "W1" => {
                    let v = parse_vector(data)?;
                    character.x_width.direction1 = Some(v.x);
                    character.y_width.direction1 = Some(v.y);
                }
                "VV" => character.vvector = Some(parse_vector(data)?),
                "B" => character.bounding_box = Some(parse_bounding_box(data)?),
                "L" => {
                    let mut names = data.split_whitespace();
                    match (names.next(), names.next(), names.next()) {
                        (Some(second), Some(ligature), None) => ligatures.push(PendingLigature {
                            second: Name::new(second)?,
                            ligature: Name::new(ligature)?,
                        }),
                        _ => {
                            return Err(FormatError::new(format!(
                                "invalid ligature '{}', expected 'L <successor> <ligature>'",
                                segment
                            )))
                        }
                    }
                }
                _ => {
                    return Err(FormatError::new(format!(
                        "unrecognised character metrics field '{}'",
                        segment
                    )))
                }
            }
        }

        Ok(CharRecord { character, ligatures })
    }
}

/// `-1` marks an unencoded character.
fn char_code(code: i32) -> Result<Option<u16>, FormatError> {
    if code == -1 {
        return Ok(None);
    }
    u16::try_from(code)
        .map(Some)
        .map_err(|_| FormatError::new(format!("character code {} out of range", code)))
}

/// Ensures a field carries exactly one token.
fn single<'a>(key: &str, data: &'a str) -> Result<&'a str, FormatError> {
    let mut tokens = data.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(token), None) => Ok(token),
        (None, _) => Err(FormatError::new(format!("missing value for '{}'", key))),
        (Some(_), Some(_)) => {
            Err(FormatError::new(format!("too many values for '{}': '{}'", key, data)))
        }
    }
}

/// Lookup tables from names and codes to characters.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CharacterIndex {
    by_name: IndexMap<Name, CharId>,
    by_code: IndexMap<u16, CharId>,
}

impl CharacterIndex {
    /// Register a character, rejecting duplicate codes or names.
    pub(crate) fn insert(&mut self, id: CharId, character: &Character) -> Result<(), FormatError> {
        if let Some(code) = character.code {
            if self.by_code.contains_key(&code) {
                return Err(FormatError::new(format!("duplicate character code {}", code)));
            }
        }
        if let Some(name) = &character.name {
            if self.by_name.contains_key(name) {
                return Err(FormatError::new(format!("duplicate character name '{}'", name)));
            }
        }
        if let Some(code) = character.code {
            self.by_code.insert(code, id);
        }
        if let Some(name) = &character.name {
            self.by_name.insert(name.clone(), id);
        }
        Ok(())
    }

    pub(crate) fn by_name(&self, name: &str) -> Option<CharId> {
        self.by_name.get(name).copied()
    }

    pub(crate) fn by_code(&self, code: u16) -> Option<CharId> {
        self.by_code.get(&code).copied()
    }

    pub(crate) fn require_name(&self, name: &str) -> Result<CharId, FormatError> {
        self.by_name(name)
            .ok_or_else(|| FormatError::new(format!("no character named '{}'", name)))
    }

    pub(crate) fn require_code(&self, code: u16) -> Result<CharId, FormatError> {
        self.by_code(code)
            .ok_or_else(|| FormatError::new(format!("no character with code {}", code)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use serde_test::{assert_ser_tokens, Token};

    #[test]
    fn parse_full_record() {
        let record = CharRecord::parse("C 102 ; WX 333 ; N f ; B 20 0 383 683 ; L i fi ; L l fl ;")
            .unwrap();
        let c = &record.character;
        assert_eq!(c.code, Some(102));
        assert_eq!(c.name.as_deref(), Some("f"));
        assert_eq!(c.x_width.general, Some(Decimal::from(333)));
        assert_eq!(c.y_width, WidthSet::default());
        assert_eq!(
            c.bounding_box,
            Some(BoundingBox::new(
                Decimal::from(20),
                Decimal::ZERO,
                Decimal::from(383),
                Decimal::from(683)
            ))
        );
        assert_eq!(
            record.ligatures,
            vec![
                PendingLigature { second: Name::new_raw("i"), ligature: Name::new_raw("fi") },
                PendingLigature { second: Name::new_raw("l"), ligature: Name::new_raw("fl") },
            ]
        );
        assert!(c.ligatures.is_empty());
        assert!(c.kerning_pairs.is_empty());
    }

    #[test]
    fn unencoded_and_hex_codes() {
        let record = CharRecord::parse("C -1 ; WX 500 ; N ff ;").unwrap();
        assert_eq!(record.character.code, None);

        let record = CharRecord::parse("CH <1F40> ; WX 1000 ; N cid8000 ;").unwrap();
        assert_eq!(record.character.code, Some(0x1f40));

        assert!(CharRecord::parse("C -2 ; WX 500 ;").is_err());
        assert!(CharRecord::parse("C 70000 ; WX 500 ;").is_err());
    }

    #[test]
    fn width_forms() {
        let record = CharRecord::parse("C 1 ; W 500 20 ; W0 400 10 ; W1X 1000 ; W1Y -880 ; VV 250 880 ;")
            .unwrap();
        let c = record.character;
        assert_eq!(c.x_width.general, Some(Decimal::from(500)));
        assert_eq!(c.y_width.general, Some(Decimal::from(20)));
        assert_eq!(c.x_width.direction0, Some(Decimal::from(400)));
        assert_eq!(c.y_width.direction0, Some(Decimal::from(10)));
        assert_eq!(c.x_width.direction1, Some(Decimal::from(1000)));
        assert_eq!(c.y_width.direction1, Some(Decimal::from(-880)));
        assert_eq!(c.vvector, Some(Vector::new(Decimal::from(250), Decimal::from(880))));
    }

    #[test]
    fn stray_semicolons_are_ignored() {
        let record = CharRecord::parse("C 32 ;; WX 250 ; ; N space ;").unwrap();
        assert_eq!(record.character.code, Some(32));
        assert_eq!(record.character.name.as_deref(), Some("space"));
    }

    #[test]
    fn blank_name() {
        let record = CharRecord::parse("C 65 ; WX 500 ; N ;").unwrap();
        assert_eq!(record.character.code, Some(65));
        assert_eq!(record.character.name, None);
        assert!(CharRecord::parse("C 65 ; N A B ;").is_err());
    }

    #[test]
    fn serialize_character() {
        let character = CharRecord::parse("C 65 ; WX 722 ; N A ;").unwrap().character;
        assert_ser_tokens(
            &character,
            &[
                Token::Struct { name: "Character", len: 8 },
                Token::Str("code"),
                Token::Some,
                Token::U16(65),
                Token::Str("name"),
                Token::Some,
                Token::Str("A"),
                Token::Str("x_width"),
                Token::Struct { name: "WidthSet", len: 3 },
                Token::Str("general"),
                Token::Some,
                Token::Str("722"),
                Token::Str("direction0"),
                Token::None,
                Token::Str("direction1"),
                Token::None,
                Token::StructEnd,
                Token::Str("y_width"),
                Token::Struct { name: "WidthSet", len: 3 },
                Token::Str("general"),
                Token::None,
                Token::Str("direction0"),
                Token::None,
                Token::Str("direction1"),
                Token::None,
                Token::StructEnd,
                Token::Str("vvector"),
                Token::None,
                Token::Str("bounding_box"),
                Token::None,
                Token::Str("ligatures"),
                Token::Seq { len: Some(0) },
                Token::SeqEnd,
                Token::Str("kerning_pairs"),
                Token::Seq { len: Some(0) },
                Token::SeqEnd,
                Token::StructEnd,
            ],
        );
    }

    #[test]
    fn bad_fields() {
        let err = CharRecord::parse("C 32 ; WX wide ; N space ;").unwrap_err();
        assert!(err.message().contains("wide"), "{}", err);
        let err = CharRecord::parse("C 32 ; XX 1 ;").unwrap_err();
        assert!(err.message().contains("XX 1"), "{}", err);
        assert!(CharRecord::parse("C 32 ; L fi ;").is_err());
        assert!(CharRecord::parse("C 32 ; B 1 2 3 ;").is_err());
        assert!(CharRecord::parse("C ; WX 250 ;").is_err());
    }

    #[test]
    fn index_rejects_duplicates() {
        let mut index = CharacterIndex::default();
        let a = CharRecord::parse("C 65 ; WX 500 ; N A ;").unwrap().character;
        let a2 = CharRecord::parse("C 65 ; WX 500 ; N Aalt ;").unwrap().character;
        let a3 = CharRecord::parse("C 66 ; WX 500 ; N A ;").unwrap().character;
        index.insert(CharId(0), &a).unwrap();
        assert!(index.insert(CharId(1), &a2).is_err());
        assert!(index.insert(CharId(1), &a3).is_err());
        assert_eq!(index.by_code(65), Some(CharId(0)));
        assert_eq!(index.by_name("A"), Some(CharId(0)));
        assert_eq!(index.by_name("Aalt"), None);
        assert!(index.require_code(66).is_err());
    }
}
