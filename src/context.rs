//! The conversion context: registry, catalog, resource loader and table
//! caches bundled together.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::catalog::{Catalog, Charset};
use crate::codec::Tables;
use crate::registry::{ClassRegistry, CodecClass, TranslatorFactory};
use crate::resource::{self, ResourceLoader};
use crate::stream::{TranslatingReader, TranslatingWriter};
use crate::translator::BoxTranslator;
use crate::{Direction, Error, LOG_TARGET, Result};

/// Default catalog resource name
pub const CATALOG_FILE: &str = "charsets.json";

/// Resolves charset names and creates translators.
///
/// The catalog is read from the resource loader the first time it is needed
/// and never changes afterwards. Parsed tables are cached per context and
/// shared by every translator it creates.
pub struct Charsets {
    registry: ClassRegistry,
    extra: Vec<(Charset, bool)>,
    catalog_file: String,
    catalog: OnceLock<Catalog>,
    tables: Tables,
}

impl Default for Charsets {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Charsets {
    /// A context over the default data directory and the bundled data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts configuring a context.
    pub fn builder() -> CharsetsBuilder {
        CharsetsBuilder::default()
    }

    /// The class registry
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// The catalog, loaded on first use.
    pub fn catalog(&self) -> &Catalog {
        self.catalog.get_or_init(|| self.load_catalog())
    }

    fn load_catalog(&self) -> Catalog {
        let mut catalog = match self.tables.loader().load(&self.catalog_file) {
            Ok(data) => Catalog::from_json(&data).unwrap_or_else(|err| {
                warn!(
                    target: LOG_TARGET,
                    file = %self.catalog_file,
                    error = %err,
                    "cannot decode catalog"
                );
                Catalog::new()
            }),
            Err(err) => {
                warn!(
                    target: LOG_TARGET,
                    file = %self.catalog_file,
                    error = %err,
                    "cannot open catalog"
                );
                Catalog::new()
            }
        };
        for (charset, override_existing) in &self.extra {
            catalog.register(charset.clone(), *override_existing);
        }
        debug!(target: LOG_TARGET, charsets = catalog.len(), "catalog loaded");
        catalog
    }

    /// Looks up a charset by name or alias.
    pub fn info(&self, name: &str) -> Option<Arc<Charset>> {
        self.catalog().get(name).cloned()
    }

    /// Canonical names of all known charsets, sorted.
    pub fn names(&self) -> Vec<String> {
        self.catalog().names().into_iter().map(str::to_owned).collect()
    }

    /// Finds the class and argument for a charset name.
    pub fn resolve(&self, name: &str) -> Result<(CodecClass, String)> {
        let charset = self
            .catalog()
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_owned()))?;
        let class = self
            .registry
            .get(&charset.class)
            .ok_or_else(|| Error::BadClass {
                charset: charset.name.clone(),
                class: charset.class.clone(),
            })?;
        Ok((class.clone(), charset.arg.clone()))
    }

    fn translator(&self, name: &str, direction: Direction) -> Result<BoxTranslator> {
        let (class, arg) = self.resolve(name)?;
        debug!(
            target: LOG_TARGET,
            charset = name,
            class = class.name(),
            %direction,
            "creating translator"
        );
        class.translator(direction, &arg, &self.tables)
    }

    /// A translator from `name` to UTF-8.
    pub fn decoder(&self, name: &str) -> Result<BoxTranslator> {
        self.translator(name, Direction::Decode)
    }

    /// A translator from UTF-8 to `name`.
    pub fn encoder(&self, name: &str) -> Result<BoxTranslator> {
        self.translator(name, Direction::Encode)
    }

    /// Wraps `reader` so that text in charset `name` is read as UTF-8.
    pub fn new_reader<R: Read>(
        &self,
        name: &str,
        reader: R,
    ) -> Result<TranslatingReader<R, BoxTranslator>> {
        Ok(TranslatingReader::new(reader, self.decoder(name)?))
    }

    /// Wraps `writer` so that UTF-8 written to it arrives in charset `name`.
    ///
    /// The returned writer must be closed to flush trailing state.
    pub fn new_writer<W: Write>(
        &self,
        name: &str,
        writer: W,
    ) -> Result<TranslatingWriter<W, BoxTranslator>> {
        Ok(TranslatingWriter::new(writer, self.encoder(name)?))
    }
}

/// Configures a [`Charsets`] context.
pub struct CharsetsBuilder {
    loader: Option<Arc<dyn ResourceLoader>>,
    catalog_file: String,
    registry: ClassRegistry,
    extra: Vec<(Charset, bool)>,
}

impl Default for CharsetsBuilder {
    fn default() -> Self {
        Self {
            loader: None,
            catalog_file: CATALOG_FILE.to_owned(),
            registry: ClassRegistry::new(),
            extra: Vec::new(),
        }
    }
}

impl CharsetsBuilder {
    /// Uses `loader` for the catalog and all tables.
    pub fn loader(mut self, loader: impl ResourceLoader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Reads data from `dir`, falling back to the bundled data.
    pub fn data_dir(self, dir: impl Into<PathBuf>) -> Self {
        self.loader(resource::dir_then_builtin(dir))
    }

    /// Name of the catalog resource (default `charsets.json`).
    pub fn catalog_file(mut self, name: impl Into<String>) -> Self {
        self.catalog_file = name.into();
        self
    }

    /// Registers an external codec class. See [`ClassRegistry::register`].
    pub fn register_class(
        mut self,
        name: impl Into<String>,
        factory: Arc<dyn TranslatorFactory>,
        override_existing: bool,
    ) -> Self {
        self.registry.register(name, factory, override_existing);
        self
    }

    /// Adds a charset on top of the catalog file. See [`Catalog::register`].
    pub fn register_charset(mut self, charset: Charset, override_existing: bool) -> Self {
        self.extra.push((charset, override_existing));
        self
    }

    /// Builds the context. Nothing is loaded until first use.
    pub fn build(self) -> Charsets {
        let loader = self
            .loader
            .unwrap_or_else(|| Arc::new(resource::dir_then_builtin(resource::default_data_dir())));
        Charsets {
            registry: self.registry,
            extra: self.extra,
            catalog_file: self.catalog_file,
            catalog: OnceLock::new(),
            tables: Tables::new(loader),
        }
    }
}
