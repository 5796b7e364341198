//! Error types.

use std::io::Error as IoError;
use std::path::PathBuf;

/// An error that occurs while parsing AFM data.
///
/// There is a single kind of parse failure: the input does not follow the
/// AFM grammar. The first violation aborts the whole parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    message: String,
    line: Option<usize>,
}

impl FormatError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        FormatError { message: message.into(), line: None }
    }

    /// Attach a 1-based line number, unless one is already set.
    pub(crate) fn at_line(mut self, line: usize) -> Self {
        self.line.get_or_insert(line);
        self
    }

    /// The message describing what was wrong with the input.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The 1-based number of the line that caused the failure, if known.
    pub fn line(&self) -> Option<usize> {
        self.line
    }
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for FormatError {}

/// An error that occurs while attempting to load an AFM file from disk.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read AFM file '{}'", .0.display())]
    Io(PathBuf, #[source] IoError),
    /// The file contents are not valid AFM data.
    #[error("failed to parse AFM file '{}'", .0.display())]
    Format(PathBuf, #[source] FormatError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn display_with_and_without_line() {
        let err = FormatError::new("missing EndCharMetrics");
        expect![["missing EndCharMetrics"]].assert_eq(&err.to_string());

        let err = err.at_line(12);
        expect![["line 12: missing EndCharMetrics"]].assert_eq(&err.to_string());
        assert_eq!(err.line(), Some(12));
        assert_eq!(err.message(), "missing EndCharMetrics");
    }

    #[test]
    fn first_line_number_wins() {
        let err = FormatError::new("bad").at_line(3).at_line(9);
        assert_eq!(err.line(), Some(3));
    }
}
