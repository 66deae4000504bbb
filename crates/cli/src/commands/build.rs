use super::project::Project;
use anyhow::{Context, Result};
use chrono::Local;
use folio_core::Locale;
use folio_generator::{SiteInput, generate_site};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Copy `public/` into the output root, keeping its layout
fn copy_public(src: &Path, output: &Path) -> Result<usize> {
    if !src.exists() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(src)
            .context("Public file outside public directory")?;
        let dst = output.join(relative);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dst)
            .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        copied += 1;
    }
    Ok(copied)
}

/// Render the site into `output`
pub async fn build_site(project: &Project, output: &Path) -> Result<usize> {
    let dictionaries = project.all_dictionaries().await?;

    let mut posts = BTreeMap::new();
    for locale in Locale::ALL {
        posts.insert(locale, project.blog.list_posts(locale).await);
    }

    let generated = generate_site(&SiteInput {
        site: &project.config,
        dictionaries,
        posts,
        build_date: Some(Local::now().date_naive()),
    });

    fs::create_dir_all(output).context("Failed to create output directory")?;
    for (path, contents) in &generated.pages {
        let dst = output.join(path);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&dst, contents).with_context(|| format!("Failed to write {}", dst.display()))?;
    }
    Ok(generated.pages.len())
}

/// Build static site for deployment
pub async fn run(path: PathBuf, output: PathBuf, drafts: bool) -> Result<()> {
    println!("🔨 Building static site...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    let project = Project::load(&path, drafts).await?;
    println!("✓ Loaded: {}", project.config.name);
    for locale in Locale::ALL {
        println!("  Posts ({}): {}", locale, project.blog.slugs(locale).len());
    }
    println!();

    println!("📄 Generating pages...");
    let written = build_site(&project, &output).await?;
    println!("   ✓ Wrote {} files", written);

    println!("🎨 Copying public files...");
    let copied = copy_public(&project.public_dir(), &output)?;
    println!("   ✓ Copied {} files", copied);

    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", output.display());
    println!();

    Ok(())
}
