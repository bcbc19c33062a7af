//! Resource lookup and the shared cache of parsed tables.
//!
//! A [`ResourceLoader`] turns a resource name (a catalog argument such as
//! `latin1.cp`, or the catalog file itself) into raw bytes. The library only
//! checks the content for the invariants each codec needs.

use std::borrow::Cow;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::Result;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "CHARSET_STREAM_DIR";

/// Data directory used when [`DATA_DIR_ENV`] is unset.
pub const DEFAULT_DATA_DIR: &str = "/usr/local/share/charset-stream";

/// Supplies raw bytes for named resources.
pub trait ResourceLoader: Send + Sync {
    /// Returns the contents of `name`, or an error of kind
    /// [`io::ErrorKind::NotFound`] when the loader does not have it.
    fn load(&self, name: &str) -> io::Result<Vec<u8>>;
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for Arc<L> {
    fn load(&self, name: &str) -> io::Result<Vec<u8>> {
        (**self).load(name)
    }
}

/// Reads resources as files under a directory.
#[derive(Debug, Clone)]
pub struct DirLoader {
    dir: PathBuf,
}

impl DirLoader {
    /// Creates a loader rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The root directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ResourceLoader for DirLoader {
    fn load(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.dir.join(name))
    }
}

/// Serves resources from memory.
///
/// Used for the bundled data and for embedding tables in a binary.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: HashMap<String, Cow<'static, [u8]>>,
}

impl MemoryLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a resource.
    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Cow<'static, [u8]>>) {
        self.files.insert(name.into(), data.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, data: impl Into<Cow<'static, [u8]>>) -> Self {
        self.insert(name, data);
        self
    }

    /// Names of all resources held
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

impl ResourceLoader for MemoryLoader {
    fn load(&self, name: &str) -> io::Result<Vec<u8>> {
        self.files
            .get(name)
            .map(|data| data.to_vec())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no resource `{name}`")))
    }
}

/// Tries each loader in order; the first one that has the resource wins.
///
/// Errors other than `NotFound` stop the search.
#[derive(Clone, Default)]
pub struct Chain {
    loaders: Vec<Arc<dyn ResourceLoader>>,
}

impl Chain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a loader with lower priority than the ones already present.
    pub fn then(mut self, loader: impl ResourceLoader + 'static) -> Self {
        self.loaders.push(Arc::new(loader));
        self
    }
}

impl ResourceLoader for Chain {
    fn load(&self, name: &str) -> io::Result<Vec<u8>> {
        for loader in &self.loaders {
            match loader.load(name) {
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                other => return other,
            }
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no resource `{name}`"),
        ))
    }
}

/// The data files shipped with the crate.
pub fn builtin() -> MemoryLoader {
    MemoryLoader::new()
        .with("charsets.json", &include_bytes!("../data/charsets.json")[..])
        .with("latin1.cp", &include_bytes!("../data/latin1.cp")[..])
        .with("iso-8859-15.cp", &include_bytes!("../data/iso-8859-15.cp")[..])
        .with("windows-1252.cp", &include_bytes!("../data/windows-1252.cp")[..])
        .with("cp437.cp", &include_bytes!("../data/cp437.cp")[..])
        .with("cp850.cp", &include_bytes!("../data/cp850.cp")[..])
        .with("koi8-r.cp", &include_bytes!("../data/koi8-r.cp")[..])
        .with("ibm037.cp", &include_bytes!("../data/ibm037.cp")[..])
        .with("macintosh.cp", &include_bytes!("../data/macintosh.cp")[..])
        .with("big5.dat", &include_bytes!("../data/big5.dat")[..])
}

/// `$CHARSET_STREAM_DIR`, falling back to [`DEFAULT_DATA_DIR`].
pub fn default_data_dir() -> PathBuf {
    env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Files in `dir` first, then the bundled data.
pub fn dir_then_builtin(dir: impl Into<PathBuf>) -> Chain {
    Chain::new().then(DirLoader::new(dir)).then(builtin())
}

type Slot<T> = Arc<Mutex<Option<Result<Arc<T>>>>>;

/// Parsed resources keyed by name, each populated at most once.
///
/// The key map lock is only held long enough to find the key's slot. Loading
/// happens under the slot's own lock, so concurrent first requests for one
/// key wait for a single load while other keys proceed. Failures are cached
/// like successes.
pub struct ResourceCache<T> {
    slots: Mutex<HashMap<String, Slot<T>>>,
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> ResourceCache<T> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `key`, running `load` if this is the first
    /// request for it.
    pub fn get_or_load(&self, key: &str, load: impl FnOnce() -> Result<T>) -> Result<Arc<T>> {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(key.to_owned()).or_default())
        };

        let mut entry = slot.lock();
        if let Some(ready) = entry.as_ref() {
            return ready.clone();
        }
        let loaded = load().map(Arc::new);
        *entry = Some(loaded.clone());
        loaded
    }

    /// Number of keys requested so far
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// True if nothing was requested yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
