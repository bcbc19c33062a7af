//! UTF-8 passthrough (class `utf8`), used in both directions.

use crate::Result;
use crate::translator::{REPLACEMENT_CHAR, Translator, push_char, scan_utf8};

/// Copies well-formed UTF-8 and replaces ill-formed sequences with U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Passthrough {
    scratch: Vec<u8>,
}

impl Utf8Passthrough {
    /// Creates a passthrough translator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Translator for Utf8Passthrough {
    fn translate(&mut self, data: &[u8], is_final: bool) -> Result<(usize, &[u8])> {
        let scratch = &mut self.scratch;
        scratch.clear();
        scratch.reserve(data.len());
        let consumed = scan_utf8(data, is_final, |c| {
            push_char(scratch, c.unwrap_or(REPLACEMENT_CHAR));
        });
        Ok((consumed, &self.scratch))
    }
}
