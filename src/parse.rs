//! The section state machine that reads a whole AFM file.

use log::{debug, trace, warn};

use crate::character::{CharId, CharRecord, PendingLigature};
use crate::composite::Composite;
use crate::direction::DirectionMetricsBuilder;
use crate::error::FormatError;
use crate::font::FontMetrics;
use crate::kerning::{KerningPair, TrackKern};
use crate::ligature;
use crate::line::{self, has_key, keyword};
use crate::shared_types::Direction;

static START_FONT_METRICS: &str = "StartFontMetrics";
static END_FONT_METRICS: &str = "EndFontMetrics";

/// Parse a complete AFM file, given as lines in file order.
pub(crate) fn parse_lines<I, S>(lines: I) -> Result<FontMetrics, FormatError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = AfmParser::new(lines.into_iter());
    parser.start()?;

    let mut section = Section::Header;
    loop {
        section = match section {
            Section::Header => parser.read_header()?,
            Section::Direction(direction) => {
                parser.read_direction(direction)?;
                parser.next_section()?
            }
            Section::CharMetrics(count) => {
                parser.read_char_metrics(count)?;
                parser.next_section()?
            }
            Section::KernData => {
                parser.read_kern_data()?;
                parser.next_section()?
            }
            Section::Composites(count) => {
                parser.read_composites(count)?;
                parser.next_section()?
            }
            Section::Done => break,
        }
    }

    parser.finish()
}

/// The part of the file the parser is about to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Direction(Direction),
    CharMetrics(usize),
    KernData,
    Composites(usize),
    Done,
}

/// A line of input, with its 1-based line number.
struct Line<S> {
    number: usize,
    raw: S,
}

impl<S: AsRef<str>> Line<S> {
    fn text(&self) -> &str {
        self.raw.as_ref().trim()
    }

    fn error(&self, message: impl Into<String>) -> FormatError {
        FormatError::new(message).at_line(self.number)
    }
}

/// Pulls lines from the input, keeping count of line numbers.
struct Lines<I> {
    inner: I,
    number: usize,
}

impl<I, S> Lines<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    fn next_raw(&mut self) -> Option<Line<S>> {
        let raw = self.inner.next()?;
        self.number += 1;
        Some(Line { number: self.number, raw })
    }

    /// The next line that is neither blank nor a comment.
    fn next_significant(&mut self) -> Option<Line<S>> {
        while let Some(line) = self.next_raw() {
            let text = line.text();
            if text.is_empty() || has_key(text, "Comment") {
                continue;
            }
            return Some(line);
        }
        None
    }

    /// Like `next_significant`, but running out of input is an error.
    fn require(&mut self, context: &str) -> Result<Line<S>, FormatError> {
        self.next_significant().ok_or_else(|| {
            FormatError::new(format!("unexpected end of input {}", context))
                .at_line(self.number + 1)
        })
    }
}

struct AfmParser<I> {
    lines: Lines<I>,
    font: FontMetrics,
    /// Unresolved ligatures for each character, with the record's line number.
    pending_ligatures: Vec<(usize, Vec<PendingLigature>)>,
    /// Direction metrics given directly in the header.
    header_direction: DirectionMetricsBuilder,
    /// Which writing directions may have an explicit `StartDirection` block.
    expected_directions: [bool; 2],
    seen_char_metrics: bool,
    seen_kern_data: bool,
    seen_composites: bool,
}

impl<I, S> AfmParser<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    fn new(lines: I) -> Self {
        AfmParser {
            lines: Lines { inner: lines, number: 0 },
            font: FontMetrics::default(),
            pending_ligatures: Vec::new(),
            header_direction: DirectionMetricsBuilder::default(),
            expected_directions: [true, false],
            seen_char_metrics: false,
            seen_kern_data: false,
            seen_composites: false,
        }
    }

    fn start(&mut self) -> Result<(), FormatError> {
        let line = self
            .lines
            .next_raw()
            .ok_or_else(|| FormatError::new("empty input, expected StartFontMetrics"))?;
        let text = line.text().trim_start_matches('\u{feff}');
        let version = text
            .strip_prefix(START_FONT_METRICS)
            .ok_or_else(|| line.error(format!("expected StartFontMetrics, found '{}'", text)))?;
        self.font.afm_version = version.split_whitespace().next().map(String::from);
        Ok(())
    }

    fn read_header(&mut self) -> Result<Section, FormatError> {
        loop {
            let line = self.lines.require("in font header")?;
            if let Some(section) = self.section_marker(&line)? {
                return Ok(section);
            }
            self.header_field(line.text()).map_err(|e| e.at_line(line.number))?;
        }
    }

    fn header_field(&mut self, text: &str) -> Result<(), FormatError> {
        let font = &mut self.font;
        match keyword(text) {
            key @ "FontName" => font.font_name = Some(line::string(text, key)?),
            key @ "FullName" => font.full_name = Some(line::string(text, key)?),
            key @ "FamilyName" => font.family_name = Some(line::string(text, key)?),
            key @ "Weight" => font.weight = Some(line::string(text, key)?),
            key @ "FontBBox" => font.font_bbox = Some(line::bounding_box(text, key)?),
            key @ "Version" => font.version = Some(line::string(text, key)?),
            key @ "Notice" => font.notice = Some(line::string(text, key)?),
            key @ "EncodingScheme" => font.encoding_scheme = Some(line::string(text, key)?),
            key @ "MappingScheme" => font.mapping_scheme = Some(line::integer(text, key)?),
            key @ "EscChar" => font.esc_char = Some(line::integer(text, key)?),
            key @ "CharacterSet" => font.character_set = Some(line::string(text, key)?),
            key @ "Characters" => font.characters_count = Some(line::integer(text, key)?),
            key @ "IsBaseFont" => font.is_base_font = Some(line::boolean(text, key)?),
            key @ "VVector" => font.vvector = Some(line::vector(text, key)?),
            key @ "IsFixedV" => font.is_fixed_v = Some(line::boolean(text, key)?),
            key @ "IsCIDFont" => font.is_cid_font = Some(line::boolean(text, key)?),
            key @ "CapHeight" => font.cap_height = Some(line::decimal(text, key)?),
            key @ "XHeight" => font.x_height = Some(line::decimal(text, key)?),
            key @ "Ascender" => font.ascender = Some(line::decimal(text, key)?),
            key @ "Descender" => font.descender = Some(line::decimal(text, key)?),
            key @ "StdHW" => font.std_hw = Some(line::decimal(text, key)?),
            key @ "StdVW" => font.std_vw = Some(line::decimal(text, key)?),
            key @ "MetricsSets" => {
                let sets = line::integer(text, key)?;
                self.expected_directions = match sets {
                    0 => [true, false],
                    1 => [false, true],
                    2 => [true, true],
                    _ => {
                        return Err(FormatError::new(format!("invalid MetricsSets value {}", sets)))
                    }
                };
                font.metrics_sets = Some(sets as u8);
            }
            _ => {
                if !self.header_direction.accept(text)? {
                    trace!("skipping header line '{}'", text);
                }
            }
        }
        Ok(())
    }

    /// Reads the marker that starts the next section of the font body.
    fn next_section(&mut self) -> Result<Section, FormatError> {
        let line = self.lines.require("before EndFontMetrics")?;
        match self.section_marker(&line)? {
            Some(section) => Ok(section),
            None => Err(line.error(format!("unexpected '{}' outside of a section", line.text()))),
        }
    }

    /// Returns the section a marker line opens, or `None` if it is not a marker.
    fn section_marker(&self, marker: &Line<S>) -> Result<Option<Section>, FormatError> {
        let text = marker.text();
        let at = |e: FormatError| e.at_line(marker.number);
        let section = match keyword(text) {
            _ if text == END_FONT_METRICS => Section::Done,
            key @ "StartDirection" => {
                let index = line::integer(text, key).map_err(at)?;
                let direction = Direction::from_index(index)
                    .ok_or_else(|| marker.error(format!("invalid direction {}", index)))?;
                if !self.expected_directions[direction.index() as usize] {
                    return Err(marker.error(format!("unexpected direction {}", direction)));
                }
                let seen = match direction {
                    Direction::Horizontal => self.font.direction0_metrics.is_some(),
                    Direction::Vertical => self.font.direction1_metrics.is_some(),
                };
                if seen {
                    return Err(marker.error(format!("duplicate direction {}", direction)));
                }
                Section::Direction(direction)
            }
            key @ "StartCharMetrics" => {
                if self.seen_char_metrics {
                    return Err(marker.error("duplicate CharMetrics section"));
                }
                Section::CharMetrics(count(text, key).map_err(at)?)
            }
            "StartKernData" => {
                if self.seen_kern_data {
                    return Err(marker.error("duplicate KernData section"));
                }
                Section::KernData
            }
            key @ "StartComposites" => {
                if self.seen_composites {
                    return Err(marker.error("duplicate Composites section"));
                }
                Section::Composites(count(text, key).map_err(at)?)
            }
            _ => return Ok(None),
        };
        Ok(Some(section))
    }

    fn read_direction(&mut self, direction: Direction) -> Result<(), FormatError> {
        let start = self.lines.number;
        let mut builder = DirectionMetricsBuilder::default();
        loop {
            let line = self.lines.require("in Direction, expected EndDirection")?;
            let text = line.text();
            if has_key(text, "EndDirection") {
                break;
            }
            if !builder.accept(text).map_err(|e| e.at_line(line.number))? {
                trace!("skipping line {} in direction {}: '{}'", line.number, direction, text);
            }
        }
        let metrics = builder.build().map_err(|e| e.at_line(start))?;
        match direction {
            Direction::Horizontal => self.font.direction0_metrics = Some(metrics),
            Direction::Vertical => self.font.direction1_metrics = Some(metrics),
        }
        Ok(())
    }

    fn read_char_metrics(&mut self, count: usize) -> Result<(), FormatError> {
        self.seen_char_metrics = true;
        for read in 0..count {
            let line = self.lines.require("in CharMetrics")?;
            let text = line.text();
            if has_key(text, "EndCharMetrics") {
                return Err(line.error(format!(
                    "expected {} character records, found {}",
                    count, read
                )));
            }
            let at = |e: FormatError| e.at_line(line.number);
            let record = CharRecord::parse(text).map_err(at)?;
            let id = CharId(self.font.characters.len());
            self.font.index.insert(id, &record.character).map_err(at)?;
            self.font.characters.push(record.character);
            self.pending_ligatures.push((line.number, record.ligatures));
        }

        let line = self.lines.require("in CharMetrics, expected EndCharMetrics")?;
        if !has_key(line.text(), "EndCharMetrics") {
            return Err(line.error(format!(
                "expected EndCharMetrics after {} character records, found '{}'",
                count,
                line.text()
            )));
        }
        Ok(())
    }

    fn read_kern_data(&mut self) -> Result<(), FormatError> {
        self.seen_kern_data = true;
        loop {
            let line = self.lines.require("in KernData, expected EndKernData")?;
            let text = line.text();
            let at = |e: FormatError| e.at_line(line.number);
            match keyword(text) {
                "EndKernData" => return Ok(()),
                key @ ("StartKernPairs" | "StartKernPairs0") => {
                    let count = count(text, key).map_err(at)?;
                    self.read_kern_pairs(count, Direction::Horizontal)?;
                }
                key @ "StartKernPairs1" => {
                    let count = count(text, key).map_err(at)?;
                    self.read_kern_pairs(count, Direction::Vertical)?;
                }
                key @ "StartTrackKern" => {
                    let count = count(text, key).map_err(at)?;
                    self.read_track_kern(count)?;
                }
                _ => trace!("skipping line {} in KernData: '{}'", line.number, text),
            }
        }
    }

    fn read_kern_pairs(&mut self, count: usize, direction: Direction) -> Result<(), FormatError> {
        for read in 0..count {
            let line = self.lines.require("in KernPairs")?;
            let text = line.text();
            if has_key(text, "EndKernPairs") {
                return Err(line.error(format!("expected {} kerning pairs, found {}", count, read)));
            }
            let pair = KerningPair::parse(text, &self.font.index)
                .map_err(|e| e.at_line(line.number))?;
            match direction {
                Direction::Horizontal => {
                    self.font.characters[pair.first.0].kerning_pairs.push(pair)
                }
                Direction::Vertical => self.font.vertical_kerning.push(pair),
            }
        }
        self.skip_to("EndKernPairs")
    }

    fn read_track_kern(&mut self, count: usize) -> Result<(), FormatError> {
        for read in 0..count {
            let line = self.lines.require("in TrackKern")?;
            let text = line.text();
            if has_key(text, "EndTrackKern") {
                return Err(line.error(format!("expected {} track kerns, found {}", count, read)));
            }
            let track = TrackKern::parse(text).map_err(|e| e.at_line(line.number))?;
            self.font.track_kerning.push(track);
        }
        self.skip_to("EndTrackKern")
    }

    fn read_composites(&mut self, count: usize) -> Result<(), FormatError> {
        self.seen_composites = true;
        for read in 0..count {
            let line = self.lines.require("in Composites")?;
            let text = line.text();
            if has_key(text, "EndComposites") {
                return Err(line.error(format!("expected {} composites, found {}", count, read)));
            }
            let composite = Composite::parse(text).map_err(|e| e.at_line(line.number))?;
            self.font.composites.push(composite);
        }

        let line = self.lines.require("in Composites, expected EndComposites")?;
        if !has_key(line.text(), "EndComposites") {
            return Err(line.error(format!(
                "expected EndComposites after {} composites, found '{}'",
                count,
                line.text()
            )));
        }
        Ok(())
    }

    /// Skips lines up to and including the `end` marker.
    fn skip_to(&mut self, end: &str) -> Result<(), FormatError> {
        loop {
            let line = self.lines.require(&format!("expected {}", end))?;
            if has_key(line.text(), end) {
                return Ok(());
            }
            trace!("skipping line {} before {}: '{}'", line.number, end, line.text());
        }
    }

    fn finish(mut self) -> Result<FontMetrics, FormatError> {
        if self.expected_directions[0] && self.font.direction0_metrics.is_none() {
            if self.header_direction.is_empty() {
                trace!("no direction 0 metrics given, using defaults");
            }
            self.font.direction0_metrics = Some(self.header_direction.build()?);
        }

        for (pos, (number, pending)) in self.pending_ligatures.iter().enumerate() {
            let ligatures = ligature::resolve(CharId(pos), pending, &self.font.index)
                .map_err(|e| e.at_line(*number))?;
            self.font.characters[pos].ligatures = ligatures;
        }

        if let Some(declared) = self.font.characters_count {
            if usize::try_from(declared).ok() != Some(self.font.characters.len()) {
                warn!(
                    "font declares {} characters but has {}",
                    declared,
                    self.font.characters.len()
                );
            }
        }
        debug!(
            "parsed font '{}' with {} characters",
            self.font.font_name.as_deref().unwrap_or("<unnamed>"),
            self.font.characters.len()
        );
        Ok(self.font)
    }
}

/// Parses the record count of a `Start<Section> count` line.
fn count(text: &str, key: &str) -> Result<usize, FormatError> {
    let count = line::integer(text, key)?;
    usize::try_from(count).map_err(|_| FormatError::new(format!("invalid {} count {}", key, count)))
}
