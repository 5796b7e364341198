//! Composite character descriptions, from the `Composites` section.

use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::line::{parse_int, parse_vector};
use crate::name::Name;
use crate::shared_types::Vector;

/// A character built from other characters, such as an accented letter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composite {
    /// The name of the composite character.
    pub name: Name,
    /// The characters it is assembled from, in file order.
    pub parts: Vec<CompositePart>,
}

/// One component of a [`Composite`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositePart {
    /// The name of the component character.
    pub name: Name,
    /// Where the component's origin is placed.
    pub offset: Vector,
}

impl Composite {
    /// Parse a `CC name count ; PCC part dx dy ; ...` line.
    pub(crate) fn parse(line: &str) -> Result<Composite, FormatError> {
        let mut segments = line.split(';').map(str::trim).filter(|s| !s.is_empty());
        let header = segments.next().unwrap_or_default();
        let (name, count) = match header.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["CC", name, count] => (Name::new(name)?, parse_int(count)?),
            _ => return Err(FormatError::new(format!("invalid composite '{}'", line))),
        };

        let parts = segments
            .map(|segment| match segment.split_once(char::is_whitespace) {
                Some(("PCC", data)) => {
                    let (part, offset) = data.trim().split_once(char::is_whitespace).ok_or_else(
                        || FormatError::new(format!("invalid composite part '{}'", segment)),
                    )?;
                    Ok(CompositePart { name: Name::new(part)?, offset: parse_vector(offset)? })
                }
                _ => Err(FormatError::new(format!("invalid composite part '{}'", segment))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if usize::try_from(count).ok() != Some(parts.len()) {
            return Err(FormatError::new(format!(
                "composite '{}' declares {} parts but has {}",
                name,
                count,
                parts.len()
            )));
        }
        Ok(Composite { name, parts })
    }
}
