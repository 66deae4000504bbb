//! Per-locale display strings loaded from `<dir>/<locale>.json`.

use crate::error::{Error, Result};
use crate::types::Locale;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Nested string table for one locale. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    locale: Locale,
    root: Map<String, Value>,
}

impl Dictionary {
    /// Parse a dictionary from JSON text. The root must be an object.
    pub fn from_json(locale: Locale, json: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(root) => Ok(Self { locale, root }),
            _ => Err(Error::InvalidData(format!(
                "dictionary '{}' must be a JSON object",
                locale
            ))),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Value at a dotted path such as `pages.contact.title`
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        let mut parts = key.split('.');
        let mut current = self.root.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// String at a dotted path
    pub fn text(&self, key: &str) -> Option<&str> {
        self.lookup(key).and_then(Value::as_str)
    }

    /// Object at a dotted path
    pub fn section(&self, key: &str) -> Option<&Map<String, Value>> {
        self.lookup(key).and_then(Value::as_object)
    }

    /// Dotted paths of every leaf value
    pub fn leaf_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_leaves(&self.root, String::new(), &mut keys);
        keys.sort();
        keys
    }

    /// Leaf keys present in `other` but missing here
    pub fn missing_keys(&self, other: &Dictionary) -> Vec<String> {
        other
            .leaf_keys()
            .into_iter()
            .filter(|key| self.lookup(key).is_none())
            .collect()
    }
}

fn collect_leaves(map: &Map<String, Value>, prefix: String, out: &mut Vec<String>) {
    for (name, value) in map {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        match value {
            Value::Object(child) => collect_leaves(child, path, out),
            _ => out.push(path),
        }
    }
}

/// Loads dictionaries on first use and keeps them for the life of the process.
///
/// The cache is append-only and keyed by locale. The locale set is fixed and
/// dictionaries are build-time data, so entries are never invalidated. A failed
/// load leaves its slot empty and the next call retries.
#[derive(Debug)]
pub struct DictionaryStore {
    dir: PathBuf,
    cache: [OnceCell<Arc<Dictionary>>; Locale::ALL.len()],
}

impl DictionaryStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            cache: Default::default(),
        }
    }

    /// File a locale's dictionary is read from
    pub fn path_for(&self, locale: Locale) -> PathBuf {
        self.dir.join(format!("{}.json", locale))
    }

    /// Dictionary for `locale`, loading it on first call
    pub async fn get(&self, locale: Locale) -> Result<Arc<Dictionary>> {
        self.cache[locale.index()]
            .get_or_try_init(|| self.load(locale))
            .await
            .cloned()
    }

    async fn load(&self, locale: Locale) -> Result<Arc<Dictionary>> {
        let path = self.path_for(locale);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::DictionaryNotFound(locale));
            }
            Err(err) => return Err(err.into()),
        };
        let dictionary = Dictionary::from_json(locale, &json)?;
        tracing::debug!(%locale, path = %path.display(), "loaded dictionary");
        Ok(Arc::new(dictionary))
    }
}
