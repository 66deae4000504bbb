use anyhow::{Context, Result};
use folio_core::config::{CONFIG_FILE, parse_site_toml};
use folio_core::{BlogStore, Dictionary, DictionaryStore, Locale, SiteConfig};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A site directory with its configuration and content sources opened
pub struct Project {
    pub root: PathBuf,
    pub config: SiteConfig,
    pub dictionaries: DictionaryStore,
    pub blog: BlogStore,
}

impl Project {
    /// Load site.toml and scan the content directory
    pub async fn load(root: &Path, drafts: bool) -> Result<Self> {
        if !root.exists() {
            anyhow::bail!(
                "Site directory does not exist: {}\nRun 'folio init {}' first",
                root.display(),
                root.display()
            );
        }

        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            anyhow::bail!(
                "{} not found in {}\nRun 'folio init {}' first",
                CONFIG_FILE,
                root.display(),
                root.display()
            );
        }

        let config = parse_site_toml(&config_path)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        Self::from_config(root, config, drafts).await
    }

    /// Open content sources for an already parsed config
    pub async fn from_config(root: &Path, config: SiteConfig, drafts: bool) -> Result<Self> {
        let dictionaries = DictionaryStore::new(root.join(&config.paths.dictionaries));
        let content_dir = root.join(&config.paths.content);
        let blog = BlogStore::open(&content_dir)
            .await
            .with_context(|| format!("Failed to scan {}", content_dir.display()))?
            .with_drafts(drafts);

        Ok(Self {
            root: root.to_path_buf(),
            config,
            dictionaries,
            blog,
        })
    }

    pub fn public_dir(&self) -> PathBuf {
        self.root.join(&self.config.paths.public)
    }

    /// Every locale's dictionary; any missing one is an error
    pub async fn all_dictionaries(&self) -> Result<BTreeMap<Locale, Arc<Dictionary>>> {
        let mut loaded = BTreeMap::new();
        for locale in Locale::ALL {
            let dict = self.dictionaries.get(locale).await.with_context(|| {
                format!(
                    "Failed to load dictionary {}",
                    self.dictionaries.path_for(locale).display()
                )
            })?;
            loaded.insert(locale, dict);
        }
        Ok(loaded)
    }
}
