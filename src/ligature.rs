//! Resolution of ligature names into character references.
//!
//! Ligature rules may name characters that appear later in the file, so they
//! can only be resolved once the whole `CharMetrics` section has been read.

use crate::character::{CharId, CharacterIndex, Ligature, PendingLigature};
use crate::error::FormatError;

/// Resolve the ligature rules written on character `first`.
///
/// An empty `pending` list yields an empty set of ligatures.
pub(crate) fn resolve(
    first: CharId,
    pending: &[PendingLigature],
    index: &CharacterIndex,
) -> Result<Vec<Ligature>, FormatError> {
    pending
        .iter()
        .map(|rule| {
            let second = index.by_name(&rule.second).ok_or_else(|| {
                FormatError::new(format!("ligature refers to unknown successor '{}'", rule.second))
            })?;
            let ligature = index.by_name(&rule.ligature).ok_or_else(|| {
                FormatError::new(format!("unknown ligature character '{}'", rule.ligature))
            })?;
            Ok(Ligature { first, second, ligature })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharRecord;

    fn index() -> CharacterIndex {
        let mut index = CharacterIndex::default();
        for (i, line) in ["C 102 ; WX 333 ; N f ;", "C 105 ; WX 278 ; N i ;", "C -1 ; WX 556 ; N fi ;"]
            .iter()
            .enumerate()
        {
            index.insert(CharId(i), &CharRecord::parse(line).unwrap().character).unwrap();
        }
        index
    }

    #[test]
    fn resolves_names() {
        let record = CharRecord::parse("C 102 ; WX 333 ; N f ; L i fi ;").unwrap();
        let ligatures = resolve(CharId(0), &record.ligatures, &index()).unwrap();
        assert_eq!(
            ligatures,
            vec![Ligature { first: CharId(0), second: CharId(1), ligature: CharId(2) }]
        );
    }

    #[test]
    fn empty_list() {
        assert!(resolve(CharId(0), &[], &index()).unwrap().is_empty());
    }

    #[test]
    fn unknown_names() {
        let record = CharRecord::parse("C 102 ; WX 333 ; N f ; L l fl ;").unwrap();
        let err = resolve(CharId(0), &record.ligatures, &index()).unwrap_err();
        assert!(err.message().contains("'l'"), "{}", err);

        let record = CharRecord::parse("C 102 ; WX 333 ; N f ; L i f_i ;").unwrap();
        let err = resolve(CharId(0), &record.ligatures, &index()).unwrap_err();
        assert!(err.message().contains("'f_i'"), "{}", err);
    }
}
