// Static output for the site: page documents, SEO tags, sitemap and robots

mod escape;
pub mod markdown;
pub mod page;
pub mod robots;
pub mod seo;
pub mod sitemap;

use folio_core::routes;
use folio_core::{Dictionary, Locale, Post, RouteKey, SiteConfig};
use std::collections::BTreeMap;
use std::sync::Arc;

pub use escape::html_escape;
pub use markdown::render_markdown;
pub use seo::PageMeta;

/// Everything the generator reads, already loaded
pub struct SiteInput<'a> {
    pub site: &'a SiteConfig,
    pub dictionaries: BTreeMap<Locale, Arc<Dictionary>>,
    /// Published posts per locale, newest first
    pub posts: BTreeMap<Locale, Vec<Post>>,
    /// `lastmod` for route pages in the sitemap
    pub build_date: Option<chrono::NaiveDate>,
}

pub struct GeneratedSite {
    pub pages: Vec<(String, String)>, // (path, html)
}

/// Output file for a site path: `/pl/kontakt` -> `pl/kontakt/index.html`
pub fn output_path(site_path: &str) -> String {
    let trimmed = site_path.trim_matches('/');
    if trimmed.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}/index.html", trimmed)
    }
}

/// Render every page of the site. Locales without a dictionary are skipped,
/// in the pages and in the sitemap.
pub fn generate_site(input: &SiteInput<'_>) -> GeneratedSite {
    let site = input.site;
    let mut pages = Vec::new();
    let no_posts = Vec::new();

    for (locale, dict) in &input.dictionaries {
        let locale = *locale;
        let posts = input.posts.get(&locale).unwrap_or(&no_posts);

        for key in RouteKey::ALL {
            let path = output_path(&routes::resolve(locale, key));
            let html = if key == RouteKey::Blog {
                page::render_blog_index(site, dict, locale, posts)
            } else {
                page::render_route_page(site, dict, locale, key)
            };
            pages.push((path, html));
        }

        for post in posts {
            let path = output_path(&routes::post_path(locale, &post.slug));
            pages.push((path, page::render_post_page(site, dict, post)));
        }

        pages.push((
            format!("{}/404.html", locale),
            page::render_not_found(site, dict, locale),
        ));
    }

    pages.push((
        "index.html".to_string(),
        page::render_redirect(&routes::resolve(Locale::DEFAULT, RouteKey::Home)),
    ));

    let locales: Vec<Locale> = input.dictionaries.keys().copied().collect();
    let all_posts: Vec<Post> = input.posts.values().flatten().cloned().collect();
    let entries = sitemap::sitemap_entries(site, &locales, &all_posts, input.build_date);
    pages.push((robots::SITEMAP_FILE.to_string(), sitemap::sitemap_xml(&entries)));
    pages.push(("robots.txt".to_string(), robots::robots_txt(site)));

    GeneratedSite { pages }
}
