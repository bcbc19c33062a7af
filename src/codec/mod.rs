//! Built-in codecs and the tables backing them.

pub mod big5;
pub mod codepage;
pub mod utf8;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::resource::{ResourceCache, ResourceLoader};
use crate::{Error, LOG_TARGET, Result};

pub use big5::{Big5Decoder, Big5Table};
pub use codepage::{CodePage, CodePageDecoder, CodePageEncoder};
pub use utf8::Utf8Passthrough;

/// Parsed tables shared by every translator of one context.
pub(crate) struct Tables {
    loader: Arc<dyn ResourceLoader>,
    code_pages: ResourceCache<CodePage>,
    big5: ResourceCache<Big5Table>,
}

impl Tables {
    pub(crate) fn new(loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            loader,
            code_pages: ResourceCache::new(),
            big5: ResourceCache::new(),
        }
    }

    pub(crate) fn loader(&self) -> &dyn ResourceLoader {
        self.loader.as_ref()
    }

    pub(crate) fn code_page(&self, name: &str) -> Result<Arc<CodePage>> {
        self.code_pages.get_or_load(name, || {
            CodePage::parse(name, &self.read(name)?).inspect_err(|err| parse_failed(name, err))
        })
    }

    pub(crate) fn big5(&self, name: &str) -> Result<Arc<Big5Table>> {
        self.big5.get_or_load(name, || {
            Big5Table::parse(name, &self.read(name)?).inspect_err(|err| parse_failed(name, err))
        })
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        debug!(target: LOG_TARGET, resource = name, "loading resource");
        self.loader.load(name).map_err(|err| {
            warn!(target: LOG_TARGET, resource = name, error = %err, "cannot load resource");
            Error::resource(name, err)
        })
    }
}

fn parse_failed(name: &str, err: &Error) {
    warn!(target: LOG_TARGET, resource = name, error = %err, "malformed resource");
}
