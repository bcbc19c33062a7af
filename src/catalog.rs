//! The charset catalog: public names and aliases mapped to a class and its
//! argument.
//!
//! The catalog file is a JSON object keyed by canonical charset name:
//!
//! ```json
//! {
//!     "latin1": {
//!         "aliases": ["iso-8859-1", "l1"],
//!         "desc": "ISO-8859-1 Western European",
//!         "class": "cp",
//!         "arg": "latin1.cp"
//!     },
//!     "iso8859-1": { "alias": "latin1" }
//! }
//! ```
//!
//! An entry with `alias` set adds another name for an existing canonical
//! charset. It must name a canonical entry, never another alias.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::LOG_TARGET;

/// One charset as described by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Charset {
    /// Canonical, normalized name
    pub name: String,
    /// Other normalized names resolving to this charset
    pub aliases: Vec<String>,
    /// Human readable description
    pub description: String,
    /// Class name
    pub class: String,
    /// Class argument, usually a resource name
    pub arg: String,
}

impl Charset {
    /// Creates a descriptor with no aliases or description.
    pub fn new(name: impl Into<String>, class: impl Into<String>, arg: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            class: class.into(),
            arg: arg.into(),
        }
    }

    /// Adds aliases.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogEntry {
    alias: Option<String>,
    aliases: Vec<String>,
    desc: String,
    class: String,
    arg: String,
}

/// Normalized name to charset.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    by_name: HashMap<String, Arc<Charset>>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON catalog.
    ///
    /// Alias entries whose target is missing or is itself an alias are
    /// skipped with a warning.
    pub fn from_json(data: &[u8]) -> serde_json::Result<Self> {
        let entries: BTreeMap<String, CatalogEntry> = serde_json::from_slice(data)?;

        let mut charsets = BTreeMap::new();
        let mut alias_entries = Vec::new();
        for (name, entry) in entries {
            let name = normalized_name(&name);
            match entry.alias {
                Some(target) => alias_entries.push((name, normalized_name(&target))),
                None => {
                    let charset = Charset {
                        name: name.clone(),
                        aliases: entry.aliases,
                        description: entry.desc,
                        class: entry.class,
                        arg: entry.arg,
                    };
                    charsets.insert(name, charset);
                }
            }
        }

        for (alias, target) in alias_entries {
            match charsets.get_mut(&target) {
                Some(charset) => charset.aliases.push(alias),
                None => warn!(
                    target: LOG_TARGET,
                    alias = %alias,
                    target_name = %target,
                    "alias does not name a canonical character set, skipping"
                ),
            }
        }

        let mut catalog = Catalog::new();
        for charset in charsets.into_values() {
            catalog.register(charset, false);
        }
        Ok(catalog)
    }

    /// Adds a charset, normalizing its name and aliases.
    ///
    /// Without `override_existing`, names already present keep their current
    /// charset and are dropped from the new descriptor's aliases; if the
    /// canonical name is taken nothing is added. Returns whether the
    /// canonical name was stored.
    pub fn register(&mut self, mut charset: Charset, override_existing: bool) -> bool {
        charset.name = normalized_name(&charset.name);
        if !override_existing && self.by_name.contains_key(&charset.name) {
            return false;
        }
        for alias in &mut charset.aliases {
            *alias = normalized_name(alias);
        }
        let mut seen = HashSet::new();
        charset.aliases.retain(|alias| {
            *alias != charset.name
                && (override_existing || !self.by_name.contains_key(alias))
                && seen.insert(alias.clone())
        });

        let charset = Arc::new(charset);
        self.by_name
            .insert(charset.name.clone(), Arc::clone(&charset));
        for alias in &charset.aliases {
            self.by_name.insert(alias.clone(), Arc::clone(&charset));
        }
        true
    }

    /// Looks up a charset by any of its names.
    pub fn get(&self, name: &str) -> Option<&Arc<Charset>> {
        self.by_name.get(&normalized_name(name))
    }

    /// Canonical names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .by_name
            .iter()
            .filter(|(key, charset)| **key == charset.name)
            .map(|(key, _)| key.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of canonical charsets
    pub fn len(&self) -> usize {
        self.names().len()
    }

    /// True if the catalog holds no charsets.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Maps ASCII capitals to lower case and `_` to `-`.
pub fn normalized_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '_' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}
