//! Codec classes and the registry that names them.
//!
//! The built-in classes form a closed set. Anything else, such as a binding
//! to a native conversion library, plugs in through [`TranslatorFactory`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::codec::{
    Big5Decoder, CodePageDecoder, CodePageEncoder, Tables, Utf8Passthrough,
};
use crate::translator::BoxTranslator;
use crate::{Direction, Error, Result};

/// Creates translators for an externally supplied class.
///
/// `arg` is the class argument from the charset descriptor.
pub trait TranslatorFactory: Send + Sync {
    /// Translator from the charset to UTF-8.
    fn decoder(&self, arg: &str) -> Result<BoxTranslator>;

    /// Translator from UTF-8 to the charset.
    fn encoder(&self, arg: &str) -> Result<BoxTranslator>;
}

/// A family of codecs parameterized by an argument.
#[derive(Clone)]
pub enum CodecClass {
    /// Single-byte code page; the argument names the table resource.
    CodePage,
    /// Big5, decode only; the argument names the table resource.
    Big5,
    /// UTF-8 passthrough; the argument is ignored.
    Utf8,
    /// A class registered at runtime.
    External {
        /// Registered name
        name: String,
        /// Translator source
        factory: Arc<dyn TranslatorFactory>,
    },
}

impl CodecClass {
    /// Name of the class in the catalog
    pub fn name(&self) -> &str {
        match self {
            CodecClass::CodePage => "cp",
            CodecClass::Big5 => "big5",
            CodecClass::Utf8 => "utf8",
            CodecClass::External { name, .. } => name,
        }
    }

    pub(crate) fn translator(
        &self,
        direction: Direction,
        arg: &str,
        tables: &Tables,
    ) -> Result<BoxTranslator> {
        Ok(match (self, direction) {
            (CodecClass::CodePage, Direction::Decode) => {
                Box::new(CodePageDecoder::new(tables.code_page(arg)?))
            }
            (CodecClass::CodePage, Direction::Encode) => {
                Box::new(CodePageEncoder::new(tables.code_page(arg)?))
            }
            (CodecClass::Big5, Direction::Decode) => Box::new(Big5Decoder::new(tables.big5(arg)?)),
            (CodecClass::Big5, Direction::Encode) => {
                return Err(Error::unsupported(self.name(), direction));
            }
            (CodecClass::Utf8, _) => Box::new(Utf8Passthrough::new()),
            (CodecClass::External { factory, .. }, Direction::Decode) => factory.decoder(arg)?,
            (CodecClass::External { factory, .. }, Direction::Encode) => factory.encoder(arg)?,
        })
    }
}

impl fmt::Debug for CodecClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecClass::External { name, .. } => f.debug_tuple("External").field(name).finish(),
            builtin => f.write_str(builtin.name()),
        }
    }
}

/// Class name to class.
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    classes: HashMap<String, CodecClass>,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// A registry holding the built-in classes.
    pub fn new() -> Self {
        let classes = [CodecClass::CodePage, CodecClass::Big5, CodecClass::Utf8]
            .into_iter()
            .map(|class| (class.name().to_owned(), class))
            .collect();
        Self { classes }
    }

    /// Registers an external class.
    ///
    /// An existing class of the same name, built-in or not, is only replaced
    /// when `override_existing` is set. Returns whether the class was stored.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: Arc<dyn TranslatorFactory>,
        override_existing: bool,
    ) -> bool {
        let name = name.into();
        if !override_existing && self.classes.contains_key(&name) {
            return false;
        }
        let class = CodecClass::External {
            name: name.clone(),
            factory,
        };
        self.classes.insert(name, class);
        true
    }

    /// Looks up a class by name.
    pub fn get(&self, name: &str) -> Option<&CodecClass> {
        self.classes.get(name)
    }

    /// Registered class names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
