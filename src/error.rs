//! Error types for charset lookup and translator construction.
//!
//! Per-character conversion failures never show up here: undecodable input is
//! replaced with U+FFFD and unencodable characters with `?`.

use std::fmt;
use std::io;

use thiserror::Error;

/// Result type for charset operations
pub type Result<T> = std::result::Result<T, Error>;

/// Conversion direction relative to UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Legacy bytes to UTF-8.
    Decode,
    /// UTF-8 to legacy bytes.
    Encode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Decode => f.write_str("decode"),
            Direction::Encode => f.write_str("encode"),
        }
    }
}

/// Errors that can occur while resolving a charset or building a translator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No charset or alias with this name is known.
    #[error("character set not found: `{0}`")]
    NotFound(String),

    /// The catalog refers to a class that was never registered.
    #[error("character set `{charset}` uses unregistered class `{class}`")]
    BadClass {
        /// Canonical charset name
        charset: String,
        /// Class name from the catalog
        class: String,
    },

    /// The class has no translator for the requested direction.
    #[error("class `{class}` cannot {direction}")]
    Unsupported {
        /// Class name
        class: String,
        /// Requested direction
        direction: Direction,
    },

    /// Backing data is missing, unreadable or malformed.
    #[error("resource `{name}`: {reason}")]
    Resource {
        /// Resource identifier
        name: String,
        /// What went wrong
        reason: String,
    },

    /// The sink accepted fewer bytes than requested while flushing.
    #[error("short write: {written} of {expected} bytes accepted")]
    ShortWrite {
        /// Bytes the sink took
        written: usize,
        /// Bytes offered
        expected: usize,
    },
}

impl Error {
    /// Creates a resource error for `name`.
    pub fn resource(name: impl Into<String>, reason: impl fmt::Display) -> Self {
        Error::Resource {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates an error for a class that lacks one direction.
    pub fn unsupported(class: impl Into<String>, direction: Direction) -> Self {
        Error::Unsupported {
            class: class.into(),
            direction,
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match err {
            Error::NotFound(_) => io::ErrorKind::NotFound,
            Error::ShortWrite { .. } => io::ErrorKind::WriteZero,
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let error = Error::NotFound("klingon".to_string());
        assert_eq!(error.to_string(), "character set not found: `klingon`");
    }

    #[test]
    fn test_unsupported_message() {
        let error = Error::unsupported("big5", Direction::Encode);
        assert_eq!(error.to_string(), "class `big5` cannot encode");
    }

    #[test]
    fn test_io_error_kinds() {
        let io_err: io::Error = Error::NotFound("x".into()).into();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);

        let io_err: io::Error = Error::ShortWrite {
            written: 1,
            expected: 3,
        }
        .into();
        assert_eq!(io_err.kind(), io::ErrorKind::WriteZero);

        let io_err: io::Error = Error::resource("latin1.cp", "wrong rune count").into();
        assert_eq!(io_err.kind(), io::ErrorKind::Other);
        assert!(io_err.to_string().contains("latin1.cp"));
    }
}
