//! Big5 decoding (class `big5`).
//!
//! Big5 is laid out as 89 "fonts" of 157 characters. A lead byte at or above
//! `0xA1` selects the font; the trail byte selects the character from one of
//! two ranges, `0x40..=0x7E` followed by `0xA1..=0xFE`.
//!
//! The table resource is UTF-8 text with one char per font/column slot in
//! row-major order, U+FFFD marking holes. There is no encoder for this class.

use std::sync::Arc;

use crate::translator::{REPLACEMENT_CHAR, Translator, push_char};
use crate::{Error, Result};

/// Number of fonts (lead byte values starting at `0xA1`)
pub const FONTS: usize = 89;
/// Characters per font
pub const FONT_SIZE: usize = 157;
/// Entries in a complete table
pub const TABLE_SIZE: usize = FONTS * FONT_SIZE;

const FIRST_LEAD: u8 = 0xA1;
const LOW_TRAIL_COLUMNS: u8 = 0x7E - 0x40 + 1;

/// The Big5 code table.
#[derive(Debug, Clone)]
pub struct Big5Table {
    chars: Vec<char>,
}

impl Big5Table {
    /// Parses the table resource named `name`.
    pub fn parse(name: &str, data: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|err| Error::resource(name, format_args!("not valid UTF-8: {err}")))?;
        let chars: Vec<char> = text.chars().collect();
        if chars.len() != TABLE_SIZE {
            return Err(Error::resource(
                name,
                format_args!("corrupt table: {} entries (expected {TABLE_SIZE})", chars.len()),
            ));
        }
        Ok(Self { chars })
    }

    /// Builds a table directly from its entries. Missing trailing entries
    /// decode as U+FFFD.
    pub fn from_chars(chars: Vec<char>) -> Self {
        Self { chars }
    }

    /// Looks up the char for a lead/trail pair.
    pub fn lookup(&self, lead: u8, trail: u8) -> char {
        let column = match trail {
            0x40..=0x7E => trail - 0x40,
            0xA1..=0xFE => trail - 0xA1 + LOW_TRAIL_COLUMNS,
            _ => return REPLACEMENT_CHAR,
        };
        let Some(font) = lead.checked_sub(FIRST_LEAD) else {
            return REPLACEMENT_CHAR;
        };
        let index = font as usize * FONT_SIZE + column as usize;
        self.chars.get(index).copied().unwrap_or(REPLACEMENT_CHAR)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    PendingLead(u8),
}

/// Big5 to UTF-8.
///
/// Always consumes all input; a lead byte at the end of a chunk is kept as
/// state and paired with the first byte of the next chunk.
pub struct Big5Decoder {
    table: Arc<Big5Table>,
    state: State,
    scratch: Vec<u8>,
}

impl Big5Decoder {
    /// Creates a decoder over `table`.
    pub fn new(table: Arc<Big5Table>) -> Self {
        Self {
            table,
            state: State::Idle,
            scratch: Vec::new(),
        }
    }

    /// True while a lead byte waits for its trail byte.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::PendingLead(_))
    }
}

impl Translator for Big5Decoder {
    fn translate(&mut self, data: &[u8], is_final: bool) -> Result<(usize, &[u8])> {
        self.scratch.clear();
        for &byte in data {
            match self.state {
                State::Idle => match byte {
                    FIRST_LEAD.. => self.state = State::PendingLead(byte),
                    // DOS end-of-file marker
                    0x1A => self.scratch.push(b'\n'),
                    0x00..=0x7F => self.scratch.push(byte),
                    _ => push_char(&mut self.scratch, REPLACEMENT_CHAR),
                },
                State::PendingLead(lead) => {
                    push_char(&mut self.scratch, self.table.lookup(lead, byte));
                    self.state = State::Idle;
                }
            }
        }
        if is_final && self.is_pending() {
            push_char(&mut self.scratch, REPLACEMENT_CHAR);
            self.state = State::Idle;
        }
        Ok((data.len(), &self.scratch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Arc<Big5Table> {
        let mut chars = vec![REPLACEMENT_CHAR; TABLE_SIZE];
        chars[0] = '\u{4E2D}';
        // font 0xA4, second range column 0
        chars[3 * FONT_SIZE + 63] = '\u{6587}';
        Arc::new(Big5Table::from_chars(chars))
    }

    fn decode(decoder: &mut Big5Decoder, data: &[u8], is_final: bool) -> String {
        let (n, out) = decoder.translate(data, is_final).unwrap();
        assert_eq!(n, data.len());
        String::from_utf8(out.to_vec()).unwrap()
    }

    #[test]
    fn test_pair_decodes_to_table_entry() {
        let mut decoder = Big5Decoder::new(sample_table());
        assert_eq!(decode(&mut decoder, &[0xA1, 0x40], true), "\u{4E2D}");
        assert_eq!(decode(&mut decoder, &[0xA4, 0xA1], true), "\u{6587}");
    }

    #[test]
    fn test_lone_lead_at_end_becomes_replacement() {
        let mut decoder = Big5Decoder::new(sample_table());
        assert_eq!(decode(&mut decoder, &[0xA1], true), "\u{FFFD}");
        assert!(!decoder.is_pending());
    }

    #[test]
    fn test_pending_lead_flushed_by_empty_final_call() {
        let mut decoder = Big5Decoder::new(sample_table());
        assert_eq!(decode(&mut decoder, b"a\xA1", false), "a");
        assert!(decoder.is_pending());
        assert_eq!(decode(&mut decoder, &[], true), "\u{FFFD}");
    }

    #[test]
    fn test_pair_split_across_calls() {
        let mut decoder = Big5Decoder::new(sample_table());
        assert_eq!(decode(&mut decoder, &[b'x', 0xA1], false), "x");
        assert_eq!(decode(&mut decoder, &[0x40, b'y'], false), "\u{4E2D}y");
    }

    #[test]
    fn test_invalid_trail_consumes_both_bytes() {
        let mut decoder = Big5Decoder::new(sample_table());
        assert_eq!(decode(&mut decoder, &[0xA1, 0x20, b'z'], true), "\u{FFFD}z");
    }

    #[test]
    fn test_control_and_high_single_bytes() {
        let mut decoder = Big5Decoder::new(sample_table());
        assert_eq!(decode(&mut decoder, &[b'a', 0x1A, 0x80, b'b'], true), "a\n\u{FFFD}b");
    }

    #[test]
    fn test_lead_beyond_last_font() {
        let mut decoder = Big5Decoder::new(sample_table());
        assert_eq!(decode(&mut decoder, &[0xFE, 0x40], true), "\u{FFFD}");
    }

    #[test]
    fn test_parse_checks_entry_count() {
        let err = Big5Table::parse("big5.dat", "abc".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("corrupt table: 3 entries"));
    }

    #[test]
    fn test_builtin_table() {
        let loader = crate::resource::builtin();
        let data = crate::resource::ResourceLoader::load(&loader, "big5.dat").unwrap();
        let table = Arc::new(Big5Table::parse("big5.dat", &data).unwrap());
        let mut decoder = Big5Decoder::new(table);
        // "中文"
        assert_eq!(decode(&mut decoder, &[0xA4, 0xA4, 0xA4, 0xE5], true), "中文");
    }
}
