use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "site.toml";

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: RawSite,
    #[serde(default)]
    paths: RawPaths,
    #[serde(default)]
    robots: RawRobots,
}

#[derive(Debug, Deserialize)]
struct RawSite {
    name: String,
    base_url: String,
    author: String,
    email: Option<String>,
    twitter: Option<String>,
    default_image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPaths {
    dictionaries: Option<String>,
    content: Option<String>,
    public: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRobots {
    #[serde(default)]
    disallow: Vec<String>,
}

/// Validated site configuration
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub name: String,
    /// Absolute origin without trailing slash, e.g. `https://kowalski.dev`
    pub base_url: String,
    pub author: String,
    pub email: Option<String>,
    pub twitter: Option<String>,
    pub default_image: Option<String>,
    pub paths: Paths,
    pub robots_disallow: Vec<String>,
}

/// Project-relative locations of site inputs
#[derive(Debug, Clone, PartialEq)]
pub struct Paths {
    pub dictionaries: PathBuf,
    pub content: PathBuf,
    pub public: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            dictionaries: PathBuf::from("dictionaries"),
            content: PathBuf::from("content/blog"),
            public: PathBuf::from("public"),
        }
    }
}

impl SiteConfig {
    /// Absolute URL for a site path such as `/en/contact`
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Parse site.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Parse site.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<SiteConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.site.name.trim().is_empty() {
        return Err(Error::ConfigParse("site.name must not be empty".to_string()));
    }

    let base_url = validate_base_url(&raw.site.base_url)?;

    let defaults = Paths::default();
    let paths = Paths {
        dictionaries: optional_path(raw.paths.dictionaries, "paths.dictionaries")?
            .unwrap_or(defaults.dictionaries),
        content: optional_path(raw.paths.content, "paths.content")?.unwrap_or(defaults.content),
        public: optional_path(raw.paths.public, "paths.public")?.unwrap_or(defaults.public),
    };

    for rule in &raw.robots.disallow {
        if !rule.starts_with('/') {
            return Err(Error::ConfigParse(format!(
                "robots.disallow entries must start with '/': '{}'",
                rule
            )));
        }
    }

    Ok(SiteConfig {
        name: raw.site.name,
        base_url,
        author: raw.site.author,
        email: raw.site.email,
        twitter: raw.site.twitter,
        default_image: raw.site.default_image,
        paths,
        robots_disallow: raw.robots.disallow,
    })
}

fn validate_base_url(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');
    let Some(host) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    else {
        return Err(Error::ConfigParse(format!(
            "site.base_url must start with http:// or https://: '{}'",
            url
        )));
    };
    if host.is_empty() || host.starts_with('/') {
        return Err(Error::ConfigParse(format!(
            "site.base_url has no host: '{}'",
            url
        )));
    }
    Ok(url.to_string())
}

fn optional_path(value: Option<String>, field_name: &str) -> Result<Option<PathBuf>> {
    value.map(|v| validate_path(&v, field_name)).transpose()
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and parent directory references (`..`) so that
/// a site.toml cannot point the build at files outside the project directory.
///
/// ```text
/// validate_path("content/blog", "paths.content")  → Ok(PathBuf)
/// validate_path("/etc", "paths.content")           → Err("Absolute paths not allowed...")
/// validate_path("../shared", "paths.content")      → Err("Parent directory references...")
/// ```
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    let path = Path::new(path_str);

    // Ensure path is not empty
    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    if path.is_absolute() || path_str.starts_with('/') {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    if path
        .components()
        .any(|component| component == std::path::Component::ParentDir)
    {
        return Err(Error::ConfigParse(format!(
            "Parent directory references (..) not allowed in '{}': '{}'",
            field_name, path_str
        )));
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[site]
name = "Jan Kowalski"
base_url = "https://kowalski.dev/"
author = "Jan Kowalski"
"#;

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_site_toml_str(MINIMAL).unwrap();
        assert_eq!(config.name, "Jan Kowalski");
        assert_eq!(config.base_url, "https://kowalski.dev");
        assert_eq!(config.paths, Paths::default());
        assert!(config.robots_disallow.is_empty());
        assert!(config.twitter.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[site]
name = "Jan Kowalski"
base_url = "https://kowalski.dev"
author = "Jan Kowalski"
email = "hello@kowalski.dev"
twitter = "@kowalski"
default_image = "/og.png"

[paths]
dictionaries = "i18n"
content = "posts"
public = "static"

[robots]
disallow = ["/api/", "/drafts/"]
"#;
        let config = parse_site_toml_str(toml).unwrap();
        assert_eq!(config.email.as_deref(), Some("hello@kowalski.dev"));
        assert_eq!(config.paths.dictionaries, PathBuf::from("i18n"));
        assert_eq!(config.paths.content, PathBuf::from("posts"));
        assert_eq!(config.paths.public, PathBuf::from("static"));
        assert_eq!(config.robots_disallow.len(), 2);
    }

    #[test]
    fn test_absolute_url() {
        let config = parse_site_toml_str(MINIMAL).unwrap();
        assert_eq!(
            config.absolute_url("/pl/kontakt"),
            "https://kowalski.dev/pl/kontakt"
        );
        assert_eq!(config.absolute_url("og.png"), "https://kowalski.dev/og.png");
        assert_eq!(
            config.absolute_url("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        for url in ["kowalski.dev", "ftp://kowalski.dev", "https://", "https:///"] {
            let toml = format!(
                "[site]\nname = \"n\"\nbase_url = \"{}\"\nauthor = \"a\"\n",
                url
            );
            let result = parse_site_toml_str(&toml);
            assert!(result.is_err(), "accepted {}", url);
            assert!(result.unwrap_err().to_string().contains("base_url"));
        }
    }

    #[test]
    fn test_missing_site_section() {
        let result = parse_site_toml_str("[paths]\ncontent = \"posts\"\n");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_validate_path_valid_relative() {
        assert!(validate_path("content/blog", "paths.content").is_ok());
        assert!(validate_path("dictionaries", "paths.dictionaries").is_ok());
        assert!(validate_path("./public", "paths.public").is_ok());
    }

    #[test]
    fn test_validate_path_rejects_absolute() {
        let result = validate_path("/etc/passwd", "paths.content");
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Absolute paths not allowed"));
        assert!(message.contains("paths.content"));
    }

    #[test]
    fn test_validate_path_rejects_parent_dir() {
        for path in ["../shared", "content/../../etc", ".."] {
            let result = validate_path(path, "paths.public");
            assert!(result.is_err());
            assert!(
                result
                    .unwrap_err()
                    .to_string()
                    .contains("Parent directory references")
            );
        }
    }

    #[test]
    fn test_validate_path_rejects_empty() {
        let result = validate_path("", "paths.public");
        assert!(result.unwrap_err().to_string().contains("Empty path"));
        assert!(validate_path("   ", "paths.public").is_err());
    }

    #[test]
    fn test_config_rejects_traversal_in_paths() {
        let toml = format!("{}\n[paths]\ncontent = \"../../secret\"\n", MINIMAL);
        let result = parse_site_toml_str(&toml);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Parent directory references")
        );
    }

    #[test]
    fn test_config_rejects_relative_robots_rule() {
        let toml = format!("{}\n[robots]\ndisallow = [\"api\"]\n", MINIMAL);
        assert!(parse_site_toml_str(&toml).is_err());
    }
}
