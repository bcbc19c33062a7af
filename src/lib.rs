//! # charset-stream - Streaming Character Set Conversion
//!
//! Converts text between legacy byte-oriented character sets and UTF-8 as a
//! streaming pipeline, so inputs of any size can be converted without
//! holding a whole document in memory.
//!
//! ## Features
//!
//! - **`Read`/`Write` adapters** that carry partial multi-byte sequences
//!   across chunk boundaries and flush codec state at end of stream
//! - **Single-byte code pages** driven by 256-entry tables (ISO-8859, Windows,
//!   DOS, EBCDIC, Mac)
//! - **Big5** decoding with a lead/trail-byte state machine
//! - **UTF-8 passthrough** that repairs ill-formed input
//! - **Charset catalog** resolving names and aliases, loaded lazily from JSON
//! - **Pluggable classes** for external converters
//! - **Best-effort conversion**: undecodable input becomes U+FFFD and
//!   unencodable characters become `?`
//!
//! ## Quick Start
//!
//! ```rust
//! use std::io::{Read, Write};
//!
//! // Latin-1 bytes to UTF-8
//! let mut reader = charset_stream::new_reader("latin1", &b"caf\xE9"[..])?;
//! let mut text = String::new();
//! reader.read_to_string(&mut text)?;
//! assert_eq!(text, "café");
//!
//! // UTF-8 to EBCDIC
//! let mut writer = charset_stream::new_writer("ibm037", Vec::new())?;
//! writer.write_all("HELLO".as_bytes())?;
//! let ebcdic = writer.into_inner()?;
//! assert_eq!(ebcdic, [0xC8, 0xC5, 0xD3, 0xD3, 0xD6]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The free functions use a process-wide [`Charsets`] context built from
//! `$CHARSET_STREAM_DIR` (or `/usr/local/share/charset-stream`) with the
//! bundled data as fallback. Build your own context with
//! [`Charsets::builder`] to use other data or register extra classes.

#![deny(missing_docs)]

use std::io::{Read, Write};
use std::sync::{Arc, OnceLock};

pub mod catalog;
pub mod codec;
mod context;
mod error;
pub mod registry;
pub mod resource;
pub mod stream;
mod translator;

pub use catalog::{Catalog, Charset, normalized_name};
pub use context::{CATALOG_FILE, Charsets, CharsetsBuilder};
pub use error::{Direction, Error, Result};
pub use registry::{ClassRegistry, CodecClass, TranslatorFactory};
pub use stream::{TranslatingReader, TranslatingWriter};
pub use translator::{BoxTranslator, REPLACEMENT_BYTE, REPLACEMENT_CHAR, Translator};

pub(crate) const LOG_TARGET: &str = "charset_stream";

static GLOBAL: OnceLock<Charsets> = OnceLock::new();

/// The process-wide default context.
pub fn global() -> &'static Charsets {
    GLOBAL.get_or_init(Charsets::new)
}

/// Wraps `reader` so that text in `charset` is read as UTF-8.
pub fn new_reader<R: Read>(
    charset: &str,
    reader: R,
) -> Result<TranslatingReader<R, BoxTranslator>> {
    global().new_reader(charset, reader)
}

/// Wraps `writer` so that UTF-8 written to it arrives in `charset`.
///
/// Call [`TranslatingWriter::close`] or [`TranslatingWriter::into_inner`]
/// when done to flush trailing state.
pub fn new_writer<W: Write>(
    charset: &str,
    writer: W,
) -> Result<TranslatingWriter<W, BoxTranslator>> {
    global().new_writer(charset, writer)
}

/// Information about a charset, or `None` if it is unknown.
pub fn info(charset: &str) -> Option<Arc<Charset>> {
    global().info(charset)
}

/// Canonical names of all charsets known to the default context.
pub fn names() -> Vec<String> {
    global().names()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog() {
        let names = names();
        for expected in ["big5", "latin1", "utf-8", "windows-1252", "ibm037"] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_info_resolves_alias() {
        let latin1 = info("ISO_8859-1").unwrap();
        assert_eq!(latin1.name, "latin1");
        assert_eq!(info("iso8859-1").unwrap().name, "latin1");
        assert!(info("klingon").is_none());
    }

    #[test]
    fn test_unknown_charset() {
        let err = new_reader("klingon", std::io::empty()).err().unwrap();
        assert_eq!(err, Error::NotFound("klingon".into()));
    }

    #[test]
    fn test_windows_1252_special_chars() {
        let mut reader = new_reader("cp1252", &[0x80u8, 0x99][..]).unwrap();
        let mut text = String::new();
        reader.read_to_string(&mut text).unwrap();
        assert_eq!(text, "€™");
    }

    #[test]
    fn test_big5_bundled_table() {
        let mut reader = new_reader("big5", &[0xA4u8, 0xA4, 0xA4, 0xE5, 0xA1][..]).unwrap();
        let mut text = String::new();
        reader.read_to_string(&mut text).unwrap();
        assert_eq!(text, "中文\u{FFFD}");
    }

    #[test]
    fn test_cp437_box_drawing() {
        let mut reader = new_reader("ibm437", &[0xC9u8, 0xCD, 0xBB, 0x20, 0xF8][..]).unwrap();
        let mut text = String::new();
        reader.read_to_string(&mut text).unwrap();
        assert_eq!(text, "╔═╗ °");
    }

    #[test]
    fn test_iso_8859_15_euro() {
        let mut writer = new_writer("latin-9", Vec::new()).unwrap();
        writer.write_all("€".as_bytes()).unwrap();
        assert_eq!(writer.into_inner().unwrap(), vec![0xA4]);
    }
}
