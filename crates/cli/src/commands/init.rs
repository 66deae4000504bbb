use anyhow::{Context, Result};
use chrono::Local;
use folio_core::Locale;
use folio_core::config::{CONFIG_FILE, Paths};
use std::fs;
use std::path::{Path, PathBuf};

const EN_DICTIONARY: &str = r#"{
  "meta": {
    "description": "Freelance web developer building fast websites, online stores and web applications."
  },
  "nav": {
    "home": "Home",
    "about": "About",
    "services": "Services",
    "projects": "Projects",
    "blog": "Blog",
    "contact": "Contact"
  },
  "pages": {
    "home": { "title": "Freelance Web Developer", "description": "Websites that load fast and rank well." },
    "about": { "title": "About me", "description": "Who I am and how I work." },
    "services": {
      "title": "Services",
      "description": "What I can build for you.",
      "websites": { "title": "Websites", "description": "Company websites and landing pages." },
      "ecommerce": { "title": "Online stores", "description": "E-commerce that converts." },
      "web-apps": { "title": "Web applications", "description": "Custom tools for your business." },
      "seo": { "title": "SEO", "description": "Technical SEO and performance audits." }
    },
    "projects": { "title": "Projects", "description": "Selected case studies." },
    "blog": { "title": "Blog", "description": "Notes on building for the web." },
    "contact": { "title": "Contact", "description": "Tell me about your project." },
    "faq": { "title": "FAQ", "description": "Answers to common questions." },
    "privacy-policy": { "title": "Privacy policy", "description": "How this site handles your data." }
  },
  "blog": {
    "empty": "No posts yet.",
    "back": "Back to blog",
    "reading_time": "min read"
  },
  "not_found": {
    "title": "Page not found",
    "description": "The page you are looking for does not exist.",
    "home": "Go to the home page"
  },
  "footer": {
    "copyright": "All rights reserved."
  }
}
"#;

const PL_DICTIONARY: &str = r#"{
  "meta": {
    "description": "Freelancer tworzący szybkie strony internetowe, sklepy i aplikacje webowe."
  },
  "nav": {
    "home": "Start",
    "about": "O mnie",
    "services": "Usługi",
    "projects": "Projekty",
    "blog": "Blog",
    "contact": "Kontakt"
  },
  "pages": {
    "home": { "title": "Programista stron internetowych", "description": "Strony, które szybko się ładują i dobrze pozycjonują." },
    "about": { "title": "O mnie", "description": "Kim jestem i jak pracuję." },
    "services": {
      "title": "Usługi",
      "description": "Co mogę dla Ciebie zbudować.",
      "websites": { "title": "Strony internetowe", "description": "Strony firmowe i landing page." },
      "ecommerce": { "title": "Sklepy internetowe", "description": "Sklepy, które sprzedają." },
      "web-apps": { "title": "Aplikacje webowe", "description": "Narzędzia szyte na miarę." },
      "seo": { "title": "Pozycjonowanie", "description": "Techniczne SEO i audyty wydajności." }
    },
    "projects": { "title": "Projekty", "description": "Wybrane realizacje." },
    "blog": { "title": "Blog", "description": "Notatki o tworzeniu stron." },
    "contact": { "title": "Kontakt", "description": "Opowiedz mi o swoim projekcie." },
    "faq": { "title": "FAQ", "description": "Odpowiedzi na częste pytania." },
    "privacy-policy": { "title": "Polityka prywatności", "description": "Jak ta strona przetwarza Twoje dane." }
  },
  "blog": {
    "empty": "Brak wpisów.",
    "back": "Wróć do bloga",
    "reading_time": "min czytania"
  },
  "not_found": {
    "title": "Nie znaleziono strony",
    "description": "Strona, której szukasz, nie istnieje.",
    "home": "Przejdź na stronę główną"
  },
  "footer": {
    "copyright": "Wszelkie prawa zastrzeżone."
  }
}
"#;

/// Escape a string for safe inclusion in a TOML basic string
///
/// Hand-written because the template keeps comments, which the toml
/// serializer would drop.
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Site name from the directory name: `jan-kowalski` -> `Jan Kowalski`
fn name_from_dir(path: &Path) -> String {
    let stem = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("My Portfolio");
    stem.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn generate_site_toml(name: &str, base_url: &str) -> String {
    let paths = Paths::default();
    format!(
        r#"# Site configuration for folio

[site]
name = "{name}"
base_url = "{base_url}"
author = "{name}"
# email = "hello@example.com"
# twitter = "@handle"
# default_image = "/og.png"

[paths]
dictionaries = "{dictionaries}"
content = "{content}"
public = "{public}"

[robots]
disallow = []
"#,
        name = toml_escape_string(name),
        base_url = toml_escape_string(base_url),
        dictionaries = paths.dictionaries.display(),
        content = paths.content.display(),
        public = paths.public.display(),
    )
}

fn sample_post(locale: Locale, date: &str) -> (&'static str, String) {
    match locale {
        Locale::En => (
            "hello-world",
            format!(
                "+++\ntitle = \"Hello, world\"\ndate = {}\ndescription = \"Why I started this blog.\"\ntags = [\"news\"]\n+++\n\nThis is the first post. Edit or delete it, then write your own.\n",
                date
            ),
        ),
        Locale::Pl => (
            "witaj-swiecie",
            format!(
                "+++\ntitle = \"Witaj, świecie\"\ndate = {}\ndescription = \"Dlaczego zacząłem pisać.\"\ntags = [\"news\"]\n+++\n\nTo pierwszy wpis. Zmień go lub usuń i napisz własny.\n",
                date
            ),
        ),
    }
}

/// Write the scaffold into `base`, which must be empty or missing
pub fn scaffold(base: &Path, name: &str, base_url: &str) -> Result<()> {
    if base.join(CONFIG_FILE).exists() {
        anyhow::bail!("{} already exists in {}", CONFIG_FILE, base.display());
    }

    let paths = Paths::default();
    fs::create_dir_all(base.join(&paths.dictionaries))
        .context("Failed to create dictionaries directory")?;
    fs::create_dir_all(base.join(&paths.public)).context("Failed to create public directory")?;

    fs::write(base.join(CONFIG_FILE), generate_site_toml(name, base_url))
        .with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    for locale in Locale::ALL {
        let dictionary = match locale {
            Locale::En => EN_DICTIONARY,
            Locale::Pl => PL_DICTIONARY,
        };
        fs::write(
            base.join(&paths.dictionaries).join(format!("{}.json", locale)),
            dictionary,
        )
        .with_context(|| format!("Failed to write {} dictionary", locale))?;

        let post_dir = base.join(&paths.content).join(locale.as_str());
        fs::create_dir_all(&post_dir).context("Failed to create content directory")?;
        let today = Local::now().date_naive().to_string();
        let (slug, source) = sample_post(locale, &today);
        fs::write(post_dir.join(format!("{}.mdx", slug)), source)
            .with_context(|| format!("Failed to write sample post {}", slug))?;
    }

    Ok(())
}

/// Initialize a new site directory
pub async fn run(path: PathBuf, name: Option<String>, base_url: String) -> Result<()> {
    println!("📁 Initializing site at {}", path.display());

    let name = name.unwrap_or_else(|| name_from_dir(&path));
    scaffold(&path, &name, &base_url)?;

    println!("   ✓ Created {}", CONFIG_FILE);
    println!("   ✓ Created dictionaries for {}", Locale::ALL.map(|l| l.as_str()).join(", "));
    println!("   ✓ Created sample posts");
    println!();
    println!("Next steps:");
    println!("   folio validate {}", path.display());
    println!("   folio preview {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::project::Project;
    use crate::commands::validate::check;
    use folio_core::config::parse_site_toml_str;
    use tempfile::TempDir;

    #[test]
    fn test_toml_escape_string() {
        assert_eq!(toml_escape_string(r#"Jan "JK" K"#), r#"Jan \"JK\" K"#);
        assert_eq!(toml_escape_string("a\\b"), "a\\\\b");
        assert_eq!(toml_escape_string("line\nbreak"), "line\\nbreak");
    }

    #[test]
    fn test_name_from_dir() {
        assert_eq!(name_from_dir(Path::new("/tmp/jan-kowalski")), "Jan Kowalski");
        assert_eq!(name_from_dir(Path::new("portfolio_site")), "Portfolio Site");
    }

    #[test]
    fn test_generated_toml_parses() {
        let toml = generate_site_toml(r#"Jan "JK" Kowalski"#, "https://kowalski.dev");
        let config = parse_site_toml_str(&toml).unwrap();
        assert_eq!(config.name, r#"Jan "JK" Kowalski"#);
        assert_eq!(config.paths, Paths::default());
    }

    #[tokio::test]
    async fn test_scaffold_is_valid() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("site");
        scaffold(&base, "Jan Kowalski", "https://kowalski.dev").unwrap();

        let project = Project::load(&base, false).await.unwrap();
        let report = check(&project).await;
        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);

        assert_eq!(project.blog.slugs(Locale::En), vec!["hello-world"]);
        assert_eq!(project.blog.slugs(Locale::Pl), vec!["witaj-swiecie"]);
        assert_eq!(project.blog.list_posts(Locale::Pl).await.len(), 1);
    }

    #[test]
    fn test_scaffold_refuses_existing_site() {
        let dir = TempDir::new().unwrap();
        scaffold(dir.path(), "A", "https://a.dev").unwrap();
        assert!(scaffold(dir.path(), "A", "https://a.dev").is_err());
    }
}
