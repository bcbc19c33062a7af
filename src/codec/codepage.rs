//! Single-byte code pages (class `cp`).
//!
//! A code page is a UTF-8 text file holding exactly 256 characters: the
//! character at position `i` is what byte `i` decodes to.

use std::collections::HashMap;
use std::sync::Arc;

use crate::translator::{REPLACEMENT_BYTE, Translator, push_char, scan_utf8};
use crate::{Error, Result};

/// Byte-to-char table and its inverse.
#[derive(Debug, Clone)]
pub struct CodePage {
    to_char: [char; CodePage::SIZE],
    to_byte: HashMap<char, u8>,
}

impl CodePage {
    /// Entries in every code page
    pub const SIZE: usize = 256;

    /// Parses a code page resource named `name`.
    pub fn parse(name: &str, data: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|err| Error::resource(name, format_args!("not valid UTF-8: {err}")))?;
        let chars: Vec<char> = text.chars().collect();
        let to_char: [char; Self::SIZE] = chars.try_into().map_err(|chars: Vec<char>| {
            Error::resource(
                name,
                format_args!("wrong rune count: {} (expected {})", chars.len(), Self::SIZE),
            )
        })?;
        Ok(Self::from_table(to_char))
    }

    /// Builds a code page from a decode table.
    ///
    /// When a char appears more than once, encoding picks the lowest byte.
    pub fn from_table(to_char: [char; Self::SIZE]) -> Self {
        let mut to_byte = HashMap::with_capacity(Self::SIZE);
        for (byte, &c) in to_char.iter().enumerate() {
            to_byte.entry(c).or_insert(byte as u8);
        }
        Self { to_char, to_byte }
    }

    /// The char `byte` decodes to
    #[inline]
    pub fn decode_byte(&self, byte: u8) -> char {
        self.to_char[byte as usize]
    }

    /// The byte `c` encodes to, if any
    #[inline]
    pub fn encode_char(&self, c: char) -> Option<u8> {
        self.to_byte.get(&c).copied()
    }
}

/// Code page to UTF-8. Stateless; always consumes everything.
pub struct CodePageDecoder {
    table: Arc<CodePage>,
    scratch: Vec<u8>,
}

impl CodePageDecoder {
    /// Creates a decoder over `table`.
    pub fn new(table: Arc<CodePage>) -> Self {
        Self {
            table,
            scratch: Vec::new(),
        }
    }
}

impl Translator for CodePageDecoder {
    fn translate(&mut self, data: &[u8], _is_final: bool) -> Result<(usize, &[u8])> {
        self.scratch.clear();
        self.scratch.reserve(data.len());
        for &byte in data {
            push_char(&mut self.scratch, self.table.decode_byte(byte));
        }
        Ok((data.len(), &self.scratch))
    }
}

/// UTF-8 to code page. Holds back a trailing partial sequence until more
/// input or the end of the stream arrives.
pub struct CodePageEncoder {
    table: Arc<CodePage>,
    scratch: Vec<u8>,
}

impl CodePageEncoder {
    /// Creates an encoder over `table`.
    pub fn new(table: Arc<CodePage>) -> Self {
        Self {
            table,
            scratch: Vec::new(),
        }
    }
}

impl Translator for CodePageEncoder {
    fn translate(&mut self, data: &[u8], is_final: bool) -> Result<(usize, &[u8])> {
        let Self { table, scratch } = self;
        scratch.clear();
        let consumed = scan_utf8(data, is_final, |c| {
            let byte = c.and_then(|c| table.encode_char(c));
            scratch.push(byte.unwrap_or(REPLACEMENT_BYTE));
        });
        Ok((consumed, &self.scratch))
    }
}
