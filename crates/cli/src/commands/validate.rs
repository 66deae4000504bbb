use super::project::Project;
use folio_core::{Dictionary, Locale, RouteKey};
use serde_json::{Map, Value};
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Route ids under `pages` that match no route, e.g. a misspelled `pages.contcat`
fn unknown_page_sections(dict: &Dictionary) -> Vec<String> {
    let mut unknown = Vec::new();
    if let Some(pages) = dict.section("pages") {
        collect_page_ids(pages, "", &mut unknown);
    }
    unknown
}

fn collect_page_ids(map: &Map<String, Value>, prefix: &str, unknown: &mut Vec<String>) {
    for (name, value) in map {
        let Value::Object(child) = value else {
            continue;
        };
        let id = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", prefix, name)
        };
        if RouteKey::from_id(&id).is_none() {
            unknown.push(id);
            continue;
        }
        collect_page_ids(child, &id, unknown);
    }
}

/// Check dictionaries and posts of a loaded project
pub async fn check(project: &Project) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut loaded = Vec::new();
    for locale in Locale::ALL {
        match project.dictionaries.get(locale).await {
            Ok(dict) => {
                report.info.push(format!(
                    "dictionary {}: {} keys",
                    locale,
                    dict.leaf_keys().len()
                ));
                loaded.push(dict);
            }
            Err(err) => report.errors.push(format!(
                "dictionary {} ({}): {}",
                locale,
                project.dictionaries.path_for(locale).display(),
                err
            )),
        }
    }

    for dict in &loaded {
        for other in &loaded {
            if dict.locale() == other.locale() {
                continue;
            }
            for key in dict.missing_keys(other) {
                report.warnings.push(format!(
                    "dictionary {} is missing '{}' (present in {})",
                    dict.locale(),
                    key,
                    other.locale()
                ));
            }
        }
        for id in unknown_page_sections(dict) {
            report.warnings.push(format!(
                "dictionary {} has strings for unknown page '{}'",
                dict.locale(),
                id
            ));
        }
        for key in RouteKey::ALL {
            let title_key = format!("{}.title", key.dictionary_key());
            if dict.text(&title_key).is_none() {
                report.warnings.push(format!(
                    "dictionary {} has no '{}'",
                    dict.locale(),
                    title_key
                ));
            }
        }
    }

    for locale in Locale::ALL {
        report.info.push(format!(
            "posts {}: {}",
            locale,
            project.blog.slugs(locale).len()
        ));
    }
    for (locale, slug, err) in project.blog.failures().await {
        report
            .errors
            .push(format!("post {}/{}: {}", locale, slug, err));
    }

    report
}

pub async fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating site at: {}", path.display());

    let project = Project::load(&path, true).await?;
    println!("✓ site.toml valid");
    println!("  Site: {} ({})", project.config.name, project.config.base_url);

    let report = check(&project).await;
    for line in &report.info {
        println!("  {}", line);
    }
    for line in &report.warnings {
        println!("⚠ {}", line);
    }
    for line in &report.errors {
        println!("✗ {}", line);
    }

    if !report.is_ok() {
        anyhow::bail!("Validation failed with {} error(s)", report.errors.len());
    }
    println!(
        "\n✅ Valid ({} warning(s))",
        report.warnings.len()
    );
    Ok(())
}
