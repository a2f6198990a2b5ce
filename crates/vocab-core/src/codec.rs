//! Plain-text share format for sections.
//!
//! ```text
//! [VocabTrainer Section]
//! Name: Lesson 1
//! ---
//! hello | hallo
//! world | welt
//! ```
//!
//! Nothing is escaped: a word containing ` | ` or a line break cannot be
//! represented and will not survive a round trip.

use crate::models::{Section, Word};
use thiserror::Error;

/// First line of every shared section.
pub const HEADER: &str = "[VocabTrainer Section]";
/// Prefix of the second line.
pub const NAME_PREFIX: &str = "Name: ";
/// Third line, separating the header block from the words.
pub const SEPARATOR: &str = "---";
/// Splits a word line into original and translation.
pub const DELIMITER: &str = " | ";

/// Structural problems that abort an import.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Text is too short or has the wrong format")]
    TooShort,
    #[error("Not a shared section (wrong header)")]
    MissingHeader,
    #[error("Section name not found")]
    MissingName,
    #[error("Section name is empty")]
    EmptyName,
    #[error("Separator line not found")]
    MissingSeparator,
}

/// A word line that was dropped during decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineWarning {
    /// 1-based line number within the trimmed input.
    pub line: usize,
    /// The offending line as it appeared.
    pub content: String,
}

impl std::fmt::Display for LineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: skipped invalid word line \"{}\"", self.line, self.content)
    }
}

/// Result of a successful decode.
#[derive(Debug, Clone)]
pub struct DecodedSection {
    pub section: Section,
    pub warnings: Vec<LineWarning>,
}

/// Encode a section into the share format.
pub fn encode(section: &Section) -> String {
    let word_lines = section
        .words
        .iter()
        .map(|w| format!("{}{}{}", w.original, DELIMITER, w.translation))
        .collect::<Vec<_>>()
        .join("\n");

    [
        HEADER.to_string(),
        format!("{}{}", NAME_PREFIX, section.name),
        SEPARATOR.to_string(),
        word_lines,
    ]
    .join("\n")
}

/// Decode the share format into a new section with fresh ids.
///
/// Only the header block is fatal; malformed word lines are dropped and
/// reported in [`DecodedSection::warnings`].
pub fn decode(text: &str) -> Result<DecodedSection, CodecError> {
    let normalized = text.trim().replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();

    if lines.len() < 3 {
        return Err(CodecError::TooShort);
    }

    if lines[0].trim() != HEADER {
        return Err(CodecError::MissingHeader);
    }

    let name = lines[1]
        .strip_prefix(NAME_PREFIX)
        .ok_or(CodecError::MissingName)?
        .trim();
    if name.is_empty() {
        return Err(CodecError::EmptyName);
    }

    if lines[2].trim() != SEPARATOR {
        return Err(CodecError::MissingSeparator);
    }

    let mut section = Section::new(name);
    let mut warnings = Vec::new();

    for (idx, line) in lines.iter().enumerate().skip(3) {
        if line.trim().is_empty() {
            continue;
        }
        match parse_word_line(line) {
            Some(word) => section.words.push(word),
            None => {
                let warning = LineWarning {
                    line: idx + 1,
                    content: line.to_string(),
                };
                tracing::warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    Ok(DecodedSection { section, warnings })
}

fn parse_word_line(line: &str) -> Option<Word> {
    let parts: Vec<&str> = line.split(DELIMITER).collect();
    let [original, translation] = parts.as_slice() else {
        return None;
    };
    let (original, translation) = (original.trim(), translation.trim());
    if original.is_empty() || translation.is_empty() {
        return None;
    }
    Some(Word::new(original, translation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pairs(section: &Section) -> Vec<(String, String)> {
        section
            .words
            .iter()
            .map(|w| (w.original.clone(), w.translation.clone()))
            .collect()
    }

    #[test]
    fn test_encode_format() {
        let section = Section::new("Lesson 1")
            .with_word("hello", "hallo")
            .with_word("world", "welt");
        assert_eq!(
            encode(&section),
            "[VocabTrainer Section]\nName: Lesson 1\n---\nhello | hallo\nworld | welt"
        );
    }

    #[test]
    fn test_encode_empty_section_keeps_four_parts() {
        let section = Section::new("Empty");
        assert_eq!(encode(&section), "[VocabTrainer Section]\nName: Empty\n---\n");
        let decoded = decode(&encode(&section)).unwrap();
        assert_eq!(decoded.section.name, "Empty");
        assert!(decoded.section.is_empty());
    }

    #[test]
    fn test_decode_example() {
        let text = "[VocabTrainer Section]\nName: Lesson 1\n---\nhello | hallo\nworld | welt\n";
        let decoded = decode(text).unwrap();
        assert_eq!(decoded.section.name, "Lesson 1");
        assert_eq!(
            pairs(&decoded.section),
            vec![
                ("hello".to_string(), "hallo".to_string()),
                ("world".to_string(), "welt".to_string()),
            ]
        );
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn test_decode_crlf_and_surrounding_whitespace() {
        let text = "\n  [VocabTrainer Section]\r\nName:   Trip  \r\n --- \r\n\r\na | b\r\n\n";
        let decoded = decode(text).unwrap();
        assert_eq!(decoded.section.name, "Trip");
        assert_eq!(pairs(&decoded.section), vec![("a".to_string(), "b".to_string())]);
    }

    #[test]
    fn test_decode_lone_carriage_returns() {
        let decoded = decode("[VocabTrainer Section]\rName: Old Mac\r---\rx | y").unwrap();
        assert_eq!(decoded.section.name, "Old Mac");
        assert_eq!(decoded.section.len(), 1);
    }

    #[test]
    fn test_decode_too_short() {
        assert_eq!(decode("").unwrap_err(), CodecError::TooShort);
        assert_eq!(
            decode("[VocabTrainer Section]\nName: X").unwrap_err(),
            CodecError::TooShort
        );
    }

    #[test]
    fn test_decode_missing_header() {
        let err = decode("[Something Else]\nName: X\n---\na | b").unwrap_err();
        assert_eq!(err, CodecError::MissingHeader);
    }

    #[test]
    fn test_decode_missing_name() {
        let err = decode("[VocabTrainer Section]\nTitle: X\n---\na | b").unwrap_err();
        assert_eq!(err, CodecError::MissingName);
        // Prefix requires the trailing space.
        let err = decode("[VocabTrainer Section]\nName:X\n---").unwrap_err();
        assert_eq!(err, CodecError::MissingName);
    }

    #[test]
    fn test_decode_empty_name() {
        let err = decode("[VocabTrainer Section]\nName:    \n---\na | b").unwrap_err();
        assert_eq!(err, CodecError::EmptyName);
    }

    #[test]
    fn test_decode_missing_separator() {
        let err = decode("[VocabTrainer Section]\nName: X\n___\na | b").unwrap_err();
        assert_eq!(err, CodecError::MissingSeparator);
    }

    #[test]
    fn test_decode_skips_malformed_lines() {
        let text = "[VocabTrainer Section]\nName: Mixed\n---\none | eins\nbroken line\ntwo | zwei\n | leer\na | b | c\nthree | drei";
        let decoded = decode(text).unwrap();
        assert_eq!(
            pairs(&decoded.section),
            vec![
                ("one".to_string(), "eins".to_string()),
                ("two".to_string(), "zwei".to_string()),
                ("three".to_string(), "drei".to_string()),
            ]
        );
        let lines: Vec<usize> = decoded.warnings.iter().map(|w| w.line).collect();
        assert_eq!(lines, vec![5, 7, 8]);
        assert_eq!(decoded.warnings[0].content, "broken line");
    }

    #[test]
    fn test_decode_delimiter_needs_spaces() {
        let decoded = decode("[VocabTrainer Section]\nName: X\n---\na|b").unwrap();
        assert!(decoded.section.is_empty());
        assert_eq!(decoded.warnings.len(), 1);
    }

    #[test]
    fn test_decode_generates_fresh_ids() {
        let section = Section::new("Ids").with_word("a", "b");
        let decoded = decode(&encode(&section)).unwrap().section;
        assert_ne!(decoded.id, section.id);
        assert_ne!(decoded.words[0].id, section.words[0].id);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(CodecError::MissingHeader.to_string(), "Not a shared section (wrong header)");
        assert_eq!(CodecError::EmptyName.to_string(), "Section name is empty");
    }

    fn field() -> impl Strategy<Value = String> {
        "[A-Za-z0-9äöüß][A-Za-z0-9äöüß ,.'|-]{0,15}[A-Za-z0-9äöüß]"
            .prop_filter("no delimiter", |s| !s.contains(DELIMITER))
    }

    proptest! {
        #[test]
        fn test_round_trip(
            name in field(),
            words in prop::collection::vec((field(), field()), 0..12),
        ) {
            let mut section = Section::new(name.clone());
            for (original, translation) in &words {
                section.words.push(Word::new(original.clone(), translation.clone()));
            }

            let decoded = decode(&encode(&section)).unwrap();
            prop_assert_eq!(&decoded.section.name, &name);
            prop_assert_eq!(pairs(&decoded.section), words);
            prop_assert!(decoded.warnings.is_empty());
        }
    }
}
