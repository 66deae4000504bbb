//! Blog posts stored as `<root>/<locale>/<slug>.mdx`.
//!
//! Each file starts with a TOML front matter block between `+++` lines:
//!
//! ```text
//! +++
//! title = "Hello"
//! date = 2024-06-01
//! description = "First post"
//! +++
//!
//! Markdown body...
//! ```

use crate::error::{Error, Result};
use crate::types::{Locale, Post, PostMeta};
use chrono::NaiveDate;
use futures::future::join_all;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Accepted content file extensions
pub const CONTENT_EXTENSIONS: &[&str] = &["mdx", "md"];

const FRONT_MATTER_DELIMITER: &str = "+++";
const WORDS_PER_MINUTE: usize = 200;

/// Lowercase kebab-case: `[a-z0-9]` words joined by single hyphens
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Content files of one locale as `(slug, path)`, sorted by slug.
/// A missing locale directory yields an empty list.
async fn scan_locale(root: &Path, locale: Locale) -> Result<Vec<(String, PathBuf)>> {
    let dir = root.join(locale.as_str());
    let mut entries = match tokio::fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut found = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !CONTENT_EXTENSIONS.contains(&ext) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if !is_valid_slug(stem) {
            tracing::warn!(path = %path.display(), "skipping content file with invalid slug");
            continue;
        }
        found.push((stem.to_string(), path));
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    // Same slug with two extensions: keep the first extension in CONTENT_EXTENSIONS order
    found.dedup_by(|later, earlier| {
        if later.0 != earlier.0 {
            return false;
        }
        if extension_rank(&later.1) < extension_rank(&earlier.1) {
            std::mem::swap(later, earlier);
        }
        tracing::warn!(slug = %earlier.0, "duplicate post slug, ignoring {}", later.1.display());
        true
    });
    Ok(found)
}

fn extension_rank(path: &Path) -> usize {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|ext| CONTENT_EXTENSIONS.iter().position(|c| *c == ext))
        .unwrap_or(usize::MAX)
}

/// Slugs of every post available for `locale`, sorted.
/// A locale without a content directory has no posts.
pub async fn list_slugs(root: &Path, locale: Locale) -> Result<Vec<String>> {
    Ok(scan_locale(root, locale)
        .await?
        .into_iter()
        .map(|(slug, _)| slug)
        .collect())
}

/// Split a content file into front matter text and body
fn split_front_matter(source: &str) -> Result<(&str, &str)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let rest = source
        .trim_start_matches(['\n', '\r'])
        .strip_prefix(FRONT_MATTER_DELIMITER)
        .ok_or_else(|| Error::FrontMatter("missing opening '+++'".to_string()))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FRONT_MATTER_DELIMITER && offset > 0 {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((front, body));
        }
        offset += line.len();
    }
    Err(Error::FrontMatter("missing closing '+++'".to_string()))
}

fn reading_minutes(body: &str) -> u32 {
    let words = body.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Front matter as written. Dates may be TOML dates or quoted strings.
#[derive(Debug, Deserialize)]
struct RawPostMeta {
    title: String,
    date: toml::Value,
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    author: Option<String>,
    image: Option<String>,
    #[serde(default)]
    draft: bool,
    updated: Option<toml::Value>,
}

fn parse_date(value: &toml::Value, field: &str) -> Result<NaiveDate> {
    match value {
        toml::Value::Datetime(dt) => {
            let date = dt.date.ok_or_else(|| {
                Error::FrontMatter(format!("'{}' must include a date, got '{}'", field, dt))
            })?;
            NaiveDate::from_ymd_opt(date.year.into(), date.month.into(), date.day.into())
                .ok_or_else(|| Error::FrontMatter(format!("Invalid {} '{}'", field, dt)))
        }
        toml::Value::String(text) => parse_date_str(text)
            .map_err(|e| Error::FrontMatter(format!("Invalid {} '{}': {}", field, text, e))),
        other => Err(Error::FrontMatter(format!(
            "'{}' must be a date, got {}",
            field,
            other.type_str()
        ))),
    }
}

/// `YYYY-MM-DD`, optionally followed by an RFC 3339 time part
fn parse_date_str(text: &str) -> std::result::Result<NaiveDate, String> {
    let (date, rest) =
        NaiveDate::parse_and_remainder(text, "%Y-%m-%d").map_err(|e| e.to_string())?;
    if rest.is_empty() || rest.starts_with(['T', 't', ' ']) {
        Ok(date)
    } else {
        Err("trailing input".to_string())
    }
}

fn parse_meta(front: &str) -> Result<PostMeta> {
    let raw: RawPostMeta =
        toml::from_str(front).map_err(|e| Error::FrontMatter(e.to_string()))?;
    if raw.title.trim().is_empty() {
        return Err(Error::FrontMatter("title must not be empty".to_string()));
    }
    let updated = match &raw.updated {
        Some(value) => Some(parse_date(value, "updated")?),
        None => None,
    };
    Ok(PostMeta {
        date: parse_date(&raw.date, "date")?,
        title: raw.title,
        description: raw.description,
        tags: raw.tags,
        author: raw.author,
        image: raw.image,
        draft: raw.draft,
        updated,
    })
}

/// Parse a post from its file contents
pub fn parse_post(locale: Locale, slug: &str, source: &str) -> Result<Post> {
    let (front, body) = split_front_matter(source)?;
    let meta = parse_meta(front)?;
    let body = body.trim_start_matches(['\n', '\r']).to_string();
    Ok(Post {
        locale,
        slug: slug.to_string(),
        reading_minutes: reading_minutes(&body),
        meta,
        body,
    })
}

/// Registry of every `(locale, slug)` pair found at startup.
///
/// Loads only ever read files recorded here, so request input never becomes
/// part of a filesystem path.
#[derive(Debug, Clone)]
pub struct BlogStore {
    registry: BTreeMap<Locale, Vec<(String, PathBuf)>>,
    include_drafts: bool,
}

impl BlogStore {
    /// Scan `root` for every locale's posts
    pub async fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let mut registry = BTreeMap::new();
        for locale in Locale::ALL {
            let entries = scan_locale(&root, locale).await?;
            tracing::debug!(%locale, posts = entries.len(), "registered blog posts");
            registry.insert(locale, entries);
        }
        Ok(Self {
            registry,
            include_drafts: false,
        })
    }

    /// Keep posts marked `draft = true` in listings (preview mode)
    pub fn with_drafts(mut self, include: bool) -> Self {
        self.include_drafts = include;
        self
    }

    /// Registered slugs for `locale`, sorted
    pub fn slugs(&self, locale: Locale) -> Vec<&str> {
        self.entries(locale).iter().map(|(s, _)| s.as_str()).collect()
    }

    pub fn contains(&self, locale: Locale, slug: &str) -> bool {
        self.path_of(locale, slug).is_some()
    }

    fn entries(&self, locale: Locale) -> &[(String, PathBuf)] {
        self.registry.get(&locale).map(Vec::as_slice).unwrap_or(&[])
    }

    fn path_of(&self, locale: Locale, slug: &str) -> Option<&Path> {
        let entries = self.entries(locale);
        entries
            .binary_search_by(|(s, _)| s.as_str().cmp(slug))
            .ok()
            .map(|i| entries[i].1.as_path())
    }

    /// Load and parse one post, reporting why it failed
    pub async fn try_load_post(&self, locale: Locale, slug: &str) -> Result<Post> {
        let path = self.path_of(locale, slug).ok_or_else(|| {
            Error::InvalidData(format!("no post '{}' for locale '{}'", slug, locale))
        })?;
        let source = tokio::fs::read_to_string(path).await?;
        parse_post(locale, slug, &source)
    }

    /// Load one post. `None` when the slug is unknown or the file fails to
    /// load; callers answer with not-found.
    pub async fn load_post(&self, locale: Locale, slug: &str) -> Option<Post> {
        if !self.contains(locale, slug) {
            return None;
        }
        match self.try_load_post(locale, slug).await {
            Ok(post) if post.meta.draft && !self.include_drafts => None,
            Ok(post) => Some(post),
            Err(err) => {
                tracing::warn!(%locale, slug, error = %err, "failed to load post");
                None
            }
        }
    }

    /// Every loadable post of `locale`, newest first.
    ///
    /// Posts are loaded concurrently; failures are skipped. Posts with the
    /// same date keep their slug order.
    pub async fn list_posts(&self, locale: Locale) -> Vec<Post> {
        let loads = self
            .entries(locale)
            .iter()
            .map(|(slug, _)| self.load_post(locale, slug));
        let mut posts: Vec<Post> = join_all(loads).await.into_iter().flatten().collect();
        posts.sort_by(|a, b| b.meta.date.cmp(&a.meta.date));
        posts
    }

    /// Every post that fails to load, with the reason (for validation)
    pub async fn failures(&self) -> Vec<(Locale, String, Error)> {
        let mut failures = Vec::new();
        for (locale, entries) in &self.registry {
            for (slug, _) in entries {
                if let Err(err) = self.try_load_post(*locale, slug).await {
                    failures.push((*locale, slug.clone(), err));
                }
            }
        }
        failures
    }
}
