//! The chunk-at-a-time conversion contract shared by every codec.

use crate::Result;

/// Substituted for input that cannot be decoded.
pub const REPLACEMENT_CHAR: char = char::REPLACEMENT_CHARACTER;

/// Substituted for characters that cannot be encoded.
pub const REPLACEMENT_BYTE: u8 = b'?';

/// A stateful converter between a legacy encoding and UTF-8.
///
/// `translate` consumes some prefix of `data` and returns how many bytes it
/// took together with the converted output. Bytes past the consumed prefix
/// must be presented again, ahead of any new input, on the next call.
///
/// The output slice borrows the translator's scratch buffer and is only
/// valid until the next call.
///
/// `is_final` is set on the call carrying the last bytes of the stream (the
/// slice may be empty). On that call the translator must consume everything
/// and resolve any pending state, replacing an incomplete tail with
/// replacement characters.
///
/// Errors are reserved for resource failures. Malformed input is repaired
/// in place and counted as consumed.
pub trait Translator {
    /// Converts a prefix of `data`.
    fn translate(&mut self, data: &[u8], is_final: bool) -> Result<(usize, &[u8])>;
}

impl<T: Translator + ?Sized> Translator for Box<T> {
    fn translate(&mut self, data: &[u8], is_final: bool) -> Result<(usize, &[u8])> {
        (**self).translate(data, is_final)
    }
}

/// A translator handed out by the registry.
pub type BoxTranslator = Box<dyn Translator + Send>;

/// Appends the UTF-8 encoding of `c` to `buf`.
#[inline]
pub(crate) fn push_char(buf: &mut Vec<u8>, c: char) {
    let mut tmp = [0u8; 4];
    buf.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
}

/// Walks the UTF-8 in `data`, calling `f` with each char, or with `None` for
/// each maximal ill-formed subsequence. An incomplete sequence at the end is
/// left unconsumed unless `is_final`, in which case it is reported as `None`.
///
/// Returns the number of bytes consumed.
pub(crate) fn scan_utf8(data: &[u8], is_final: bool, mut f: impl FnMut(Option<char>)) -> usize {
    let mut rest = data;
    loop {
        match std::str::from_utf8(rest) {
            Ok(s) => {
                s.chars().for_each(|c| f(Some(c)));
                return data.len();
            }
            Err(e) => {
                let (valid, tail) = rest.split_at(e.valid_up_to());
                if let Ok(s) = std::str::from_utf8(valid) {
                    s.chars().for_each(|c| f(Some(c)));
                }
                match e.error_len() {
                    Some(len) => {
                        f(None);
                        rest = &tail[len..];
                    }
                    None if is_final => {
                        f(None);
                        return data.len();
                    }
                    None => return data.len() - tail.len(),
                }
            }
        }
    }
}
