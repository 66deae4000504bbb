use super::project::Project;
use anyhow::Result;
use folio_core::routes::post_path;
use folio_core::{Locale, Post};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct PostSummary<'a> {
    slug: &'a str,
    path: String,
    title: &'a str,
    date: String,
    description: &'a str,
    tags: &'a [String],
    draft: bool,
    reading_minutes: u32,
}

impl<'a> From<&'a Post> for PostSummary<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            slug: &post.slug,
            path: post_path(post.locale, &post.slug),
            title: &post.meta.title,
            date: post.meta.date.to_string(),
            description: &post.meta.description,
            tags: &post.meta.tags,
            draft: post.meta.draft,
            reading_minutes: post.reading_minutes,
        }
    }
}

/// List a locale's posts newest first
pub async fn run(path: PathBuf, locale: Locale, drafts: bool, json: bool) -> Result<()> {
    let project = Project::load(&path, drafts).await?;
    let posts = project.blog.list_posts(locale).await;
    let summaries: Vec<PostSummary> = posts.iter().map(PostSummary::from).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    let registered = project.blog.slugs(locale).len();
    println!("Posts ({}): {}", locale, summaries.len());
    for summary in &summaries {
        let marker = if summary.draft { " [draft]" } else { "" };
        println!(
            "  {}  {:<32} {}{}",
            summary.date, summary.path, summary.title, marker
        );
    }
    if summaries.len() < registered {
        println!(
            "\n⚠ {} post(s) not listed (drafts or unreadable), run 'folio validate {}' for details",
            registered - summaries.len(),
            path.display()
        );
    }
    Ok(())
}
