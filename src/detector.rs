//! Recognition of comdirect checking account exports.
//!
//! An export starts with a line holding a single `;`, followed by a line
//! whose first field is `"Umsätze Girokonto"`. Files are Latin-1, but some
//! reach us re-encoded or with the umlaut replaced, so it is never compared
//! directly: any one to four characters are accepted in its place.

use crate::statement::decode_latin1;
use std::io::BufRead;

const SEPARATOR_LINE: &str = ";";
const TITLE_HEAD: &str = "\"Ums";
const TITLE_TAIL: &str = "tze Girokonto\";";

/// Most characters a mangled `ä` can expand to (e.g. `Ã¤`).
const MAX_UMLAUT_WIDTH: usize = 4;

/// Check the first two lines of an export.
pub fn identify_lines(line1: &str, line2: &str) -> bool {
    line1.trim() == SEPARATOR_LINE && is_title_line(line2.trim())
}

/// Check the beginning of decoded file contents.
pub fn identify_text(text: &str) -> bool {
    let mut lines = text.lines();
    match (lines.next(), lines.next()) {
        (Some(line1), Some(line2)) => identify_lines(line1, line2),
        _ => false,
    }
}

/// Check the first two lines of a reader.
///
/// The reader is left positioned after line 2. Read errors count as a
/// mismatch.
pub fn identify_reader<R: BufRead>(reader: &mut R) -> bool {
    let mut line1 = Vec::new();
    let mut line2 = Vec::new();
    if reader.read_until(b'\n', &mut line1).is_err()
        || reader.read_until(b'\n', &mut line2).is_err()
    {
        return false;
    }
    identify_lines(&decode_latin1(&line1), &decode_latin1(&line2))
}

fn is_title_line(line: &str) -> bool {
    let Some(rest) = line.strip_prefix(TITLE_HEAD) else {
        return false;
    };

    // Skip whatever the umlaut turned into and look for the rest of the title.
    rest.char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(rest.len()))
        .skip(1)
        .take(MAX_UMLAUT_WIDTH)
        .any(|idx| rest[idx..].starts_with(TITLE_TAIL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_identify_text() {
        assert!(identify_text(";\n\"Umsätze Girokonto\";\"Zeitraum: 30 Tage\";\n"));
        assert!(identify_text(";\r\n\"Umsätze Girokonto\";\"Zeitraum: 30 Tage\";\r\n"));
        assert!(!identify_text("Hello, World!"));
        assert!(!identify_text(""));
    }

    #[test]
    fn test_identify_tolerates_mojibake() {
        assert!(identify_lines(";", "\"UmsÃ¤tze Girokonto\";\"Zeitraum: 30 Tage\";"));
        assert!(identify_lines(";", "\"Ums\u{fffd}tze Girokonto\";"));
        assert!(identify_lines(";", "\"UmsÃƒÂ¤tze Girokonto\";\"Zeitraum: 30 Tage\";"));
    }

    #[test]
    fn test_identify_tolerates_replaced_umlaut() {
        assert!(identify_lines(";", "\"Ums?tze Girokonto\";\"Zeitraum: 30 Tage\";"));
        assert!(identify_lines(";", "\"Umsatze Girokonto\";"));
    }

    #[test]
    fn test_identify_rejects_other_accounts() {
        assert!(!identify_lines(";", "\"Umsätze Tagesgeld PLUS-Konto\";\"Zeitraum: 30 Tage\";"));
        assert!(!identify_lines(";", "\"Umstze Girokonto\";"));
        assert!(!identify_lines(";", "\"Umsaetzte Girokonto\";"));
        assert!(!identify_lines(";;", "\"Umsätze Girokonto\";"));
    }

    #[test]
    fn test_identify_reader_decodes_latin1() {
        let mut bytes = b";\n\"Ums".to_vec();
        bytes.push(0xe4);
        bytes.extend_from_slice(b"tze Girokonto\";\"Zeitraum: 30 Tage\";\n");
        bytes.extend_from_slice(b"\"Neuer Kontostand\";\"1,00 EUR\";\n");
        let mut cursor = Cursor::new(bytes);

        assert!(identify_reader(&mut cursor));

        let mut rest = String::new();
        cursor.read_line(&mut rest).unwrap();
        assert!(rest.starts_with("\"Neuer Kontostand\""));
    }
}
