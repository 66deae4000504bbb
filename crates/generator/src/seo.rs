//! Per-page metadata: title, description, canonical and hreflang links,
//! Open Graph / Twitter tags and JSON-LD structured data.

use crate::escape::html_escape;
use chrono::NaiveDate;
use folio_core::routes;
use folio_core::{Dictionary, Locale, Post, RouteKey, SiteConfig};
use serde_json::{Value, json};

/// Open Graph object type
#[derive(Debug, Clone, PartialEq)]
pub enum OgType {
    Website,
    Article {
        published: NaiveDate,
        modified: NaiveDate,
        tags: Vec<String>,
    },
}

/// Everything that goes into a page's `<head>`
#[derive(Debug, Clone)]
pub struct PageMeta {
    pub locale: Locale,
    pub title: String,
    pub description: String,
    /// Absolute canonical URL
    pub canonical: String,
    /// Absolute URL of the page in each locale it exists in
    pub alternates: Vec<(Locale, String)>,
    /// Target of `hreflang="x-default"`
    pub x_default: Option<String>,
    pub og_type: OgType,
    pub image: Option<String>,
    pub twitter_site: Option<String>,
    pub json_ld: Vec<Value>,
}

fn page_strings(dict: &Dictionary, key: RouteKey) -> (Option<&str>, Option<&str>) {
    let base = key.dictionary_key();
    (
        dict.text(&format!("{}.title", base)),
        dict.text(&format!("{}.description", base)),
    )
}

/// Heading shown on the page itself
pub fn page_heading(site: &SiteConfig, dict: &Dictionary, key: RouteKey) -> String {
    match page_strings(dict, key).0 {
        Some(title) => title.to_string(),
        None if key == RouteKey::Home => site.name.clone(),
        None => key.id().to_string(),
    }
}

/// Metadata for a route page
pub fn page_meta(site: &SiteConfig, dict: &Dictionary, locale: Locale, key: RouteKey) -> PageMeta {
    let (title, description) = page_strings(dict, key);
    let title = match (key, title) {
        (RouteKey::Home, _) => site.name.clone(),
        (_, Some(title)) => format!("{} | {}", title, site.name),
        (_, None) => format!("{} | {}", key.id(), site.name),
    };
    let description = description
        .or_else(|| dict.text("meta.description"))
        .unwrap_or_default()
        .to_string();

    let alternates = routes::alternates(key)
        .into_iter()
        .map(|(l, path)| (l, site.absolute_url(&path)))
        .collect();
    let canonical = site.absolute_url(&routes::resolve(locale, key));

    let mut json_ld = Vec::new();
    if key == RouteKey::Home {
        json_ld.push(json_ld_website(site, locale));
        json_ld.push(json_ld_person(site));
    } else {
        json_ld.push(json_ld_breadcrumbs(site, dict, locale, key));
    }
    if key.is_service() {
        json_ld.push(json!({
            "@context": "https://schema.org",
            "@type": "Service",
            "name": page_heading(site, dict, key),
            "description": description,
            "url": canonical,
            "provider": { "@type": "Person", "name": site.author },
            "areaServed": "PL",
        }));
    }

    PageMeta {
        locale,
        title,
        description,
        canonical,
        alternates,
        x_default: Some(site.absolute_url(&routes::resolve(Locale::DEFAULT, key))),
        og_type: OgType::Website,
        image: site.default_image.as_deref().map(|i| site.absolute_url(i)),
        twitter_site: site.twitter.clone(),
        json_ld,
    }
}

/// Metadata for a blog post. Posts exist in one locale only.
pub fn post_meta(site: &SiteConfig, post: &Post) -> PageMeta {
    let canonical = site.absolute_url(&routes::post_path(post.locale, &post.slug));
    let image = post
        .meta
        .image
        .as_deref()
        .or(site.default_image.as_deref())
        .map(|i| site.absolute_url(i));

    PageMeta {
        locale: post.locale,
        title: format!("{} | {}", post.meta.title, site.name),
        description: post.meta.description.clone(),
        alternates: vec![(post.locale, canonical.clone())],
        x_default: None,
        og_type: OgType::Article {
            published: post.meta.date,
            modified: post.meta.last_modified(),
            tags: post.meta.tags.clone(),
        },
        image,
        twitter_site: site.twitter.clone(),
        json_ld: vec![json_ld_article(site, post, &canonical)],
        canonical,
    }
}

/// Structured data describing the site owner
pub fn json_ld_person(site: &SiteConfig) -> Value {
    let mut person = json!({
        "@context": "https://schema.org",
        "@type": "Person",
        "name": site.author,
        "url": site.base_url,
        "jobTitle": "Web Developer",
    });
    if let Some(email) = &site.email {
        person["email"] = json!(format!("mailto:{}", email));
    }
    if let Some(twitter) = &site.twitter {
        let handle = twitter.trim_start_matches('@');
        person["sameAs"] = json!([format!("https://x.com/{}", handle)]);
    }
    person
}

fn json_ld_website(site: &SiteConfig, locale: Locale) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": site.name,
        "url": site.absolute_url(&routes::resolve(locale, RouteKey::Home)),
        "inLanguage": locale.hreflang(),
    })
}

fn json_ld_breadcrumbs(site: &SiteConfig, dict: &Dictionary, locale: Locale, key: RouteKey) -> Value {
    let mut trail = vec![key];
    let mut current = key;
    while let Some(parent) = current.parent() {
        trail.push(parent);
        current = parent;
    }
    trail.reverse();

    let items: Vec<Value> = trail
        .iter()
        .enumerate()
        .map(|(i, k)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": page_heading(site, dict, *k),
                "item": site.absolute_url(&routes::resolve(locale, *k)),
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

/// Structured data for a blog post
pub fn json_ld_article(site: &SiteConfig, post: &Post, url: &str) -> Value {
    let author = post.meta.author.as_deref().unwrap_or(&site.author);
    let mut article = json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": post.meta.title,
        "description": post.meta.description,
        "datePublished": post.meta.date.to_string(),
        "dateModified": post.meta.last_modified().to_string(),
        "inLanguage": post.locale.hreflang(),
        "url": url,
        "mainEntityOfPage": url,
        "author": { "@type": "Person", "name": author },
        "timeRequired": format!("PT{}M", post.reading_minutes),
    });
    if !post.meta.tags.is_empty() {
        article["keywords"] = json!(post.meta.tags.join(", "));
    }
    if let Some(image) = &post.meta.image {
        article["image"] = json!(site.absolute_url(image));
    }
    article
}

fn meta_name(out: &mut String, name: &str, content: &str) {
    out.push_str(&format!(
        "<meta name=\"{}\" content=\"{}\">\n",
        name,
        html_escape(content)
    ));
}

fn meta_property(out: &mut String, property: &str, content: &str) {
    out.push_str(&format!(
        "<meta property=\"{}\" content=\"{}\">\n",
        property,
        html_escape(content)
    ));
}

/// JSON for a `<script>` element; `</` must not appear inside it
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

/// Render the metadata tags of a page's `<head>`
pub fn render_head(meta: &PageMeta) -> String {
    let mut out = String::new();
    out.push_str(&format!("<title>{}</title>\n", html_escape(&meta.title)));
    meta_name(&mut out, "description", &meta.description);
    out.push_str(&format!(
        "<link rel=\"canonical\" href=\"{}\">\n",
        html_escape(&meta.canonical)
    ));
    for (locale, url) in &meta.alternates {
        out.push_str(&format!(
            "<link rel=\"alternate\" hreflang=\"{}\" href=\"{}\">\n",
            locale.hreflang(),
            html_escape(url)
        ));
    }
    if let Some(url) = &meta.x_default {
        out.push_str(&format!(
            "<link rel=\"alternate\" hreflang=\"x-default\" href=\"{}\">\n",
            html_escape(url)
        ));
    }

    meta_property(&mut out, "og:title", &meta.title);
    meta_property(&mut out, "og:description", &meta.description);
    meta_property(&mut out, "og:url", &meta.canonical);
    meta_property(&mut out, "og:locale", meta.locale.og_locale());
    for locale in meta.locale.others() {
        if meta.alternates.iter().any(|(l, _)| *l == locale) {
            meta_property(&mut out, "og:locale:alternate", locale.og_locale());
        }
    }
    match &meta.og_type {
        OgType::Website => meta_property(&mut out, "og:type", "website"),
        OgType::Article {
            published,
            modified,
            tags,
        } => {
            meta_property(&mut out, "og:type", "article");
            meta_property(&mut out, "article:published_time", &published.to_string());
            meta_property(&mut out, "article:modified_time", &modified.to_string());
            for tag in tags {
                meta_property(&mut out, "article:tag", tag);
            }
        }
    }
    if let Some(image) = &meta.image {
        meta_property(&mut out, "og:image", image);
    }

    let card = if meta.image.is_some() {
        "summary_large_image"
    } else {
        "summary"
    };
    meta_name(&mut out, "twitter:card", card);
    meta_name(&mut out, "twitter:title", &meta.title);
    meta_name(&mut out, "twitter:description", &meta.description);
    if let Some(image) = &meta.image {
        meta_name(&mut out, "twitter:image", image);
    }
    if let Some(site) = &meta.twitter_site {
        meta_name(&mut out, "twitter:site", site);
    }

    for value in &meta.json_ld {
        out.push_str(&format!(
            "<script type=\"application/ld+json\">{}</script>\n",
            script_json(value)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::PostMeta;
    use folio_core::config::parse_site_toml_str;

    fn site() -> SiteConfig {
        parse_site_toml_str(
            r#"
[site]
name = "Jan Kowalski"
base_url = "https://kowalski.dev"
author = "Jan Kowalski"
twitter = "@kowalski"
default_image = "/og.png"
"#,
        )
        .unwrap()
    }

    fn dict(locale: Locale) -> Dictionary {
        Dictionary::from_json(
            locale,
            r#"{
                "meta": { "description": "Strony internetowe" },
                "pages": {
                    "home": { "title": "Web developer" },
                    "contact": { "title": "Kontakt", "description": "Napisz do mnie" },
                    "services": { "title": "Usługi", "seo": { "title": "SEO" } }
                }
            }"#,
        )
        .unwrap()
    }

    fn post() -> Post {
        Post {
            locale: Locale::En,
            slug: "hello-world".to_string(),
            meta: PostMeta {
                title: "Hello <World>".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                description: "First post".to_string(),
                tags: vec!["rust".to_string()],
                author: None,
                image: None,
                draft: false,
                updated: Some(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()),
            },
            body: "Hi".to_string(),
            reading_minutes: 1,
        }
    }

    #[test]
    fn test_page_meta_titles() {
        let site = site();
        let pl = dict(Locale::Pl);
        let meta = page_meta(&site, &pl, Locale::Pl, RouteKey::Contact);
        assert_eq!(meta.title, "Kontakt | Jan Kowalski");
        assert_eq!(meta.description, "Napisz do mnie");
        assert_eq!(meta.canonical, "https://kowalski.dev/pl/kontakt");

        let home = page_meta(&site, &pl, Locale::Pl, RouteKey::Home);
        // Home uses the bare site name even when the page has a title
        assert_eq!(home.title, "Jan Kowalski");
        assert_eq!(page_heading(&site, &pl, RouteKey::Home), "Web developer");
        // Falls back to the site-wide description
        assert_eq!(home.description, "Strony internetowe");
    }

    #[test]
    fn test_page_meta_alternates() {
        let site = site();
        let meta = page_meta(&site, &dict(Locale::Pl), Locale::Pl, RouteKey::Contact);
        assert_eq!(
            meta.alternates,
            vec![
                (Locale::En, "https://kowalski.dev/en/contact".to_string()),
                (Locale::Pl, "https://kowalski.dev/pl/kontakt".to_string()),
            ]
        );
        assert_eq!(
            meta.x_default.as_deref(),
            Some("https://kowalski.dev/en/contact")
        );
        assert_eq!(meta.image.as_deref(), Some("https://kowalski.dev/og.png"));
    }

    #[test]
    fn test_service_page_has_service_and_breadcrumbs() {
        let site = site();
        let meta = page_meta(&site, &dict(Locale::Pl), Locale::Pl, RouteKey::ServiceSeo);
        let types: Vec<_> = meta
            .json_ld
            .iter()
            .map(|v| v["@type"].as_str().unwrap())
            .collect();
        assert_eq!(types, vec!["BreadcrumbList", "Service"]);

        let items = meta.json_ld[0]["itemListElement"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1]["name"], "Usługi");
        assert_eq!(items[2]["item"], "https://kowalski.dev/pl/uslugi/pozycjonowanie");
    }

    #[test]
    fn test_post_meta() {
        let site = site();
        let meta = post_meta(&site, &post());
        assert_eq!(meta.canonical, "https://kowalski.dev/en/blog/hello-world");
        assert_eq!(meta.alternates.len(), 1);
        assert!(meta.x_default.is_none());
        assert!(matches!(meta.og_type, OgType::Article { .. }));
        assert_eq!(meta.json_ld[0]["dateModified"], "2024-07-01");
        assert_eq!(meta.json_ld[0]["author"]["name"], "Jan Kowalski");
    }

    #[test]
    fn test_render_head_escapes_and_links() {
        let site = site();
        let head = render_head(&post_meta(&site, &post()));
        assert!(head.contains("<title>Hello &lt;World&gt; | Jan Kowalski</title>"));
        assert!(head.contains("<meta property=\"og:type\" content=\"article\">"));
        assert!(head.contains("<meta property=\"article:tag\" content=\"rust\">"));
        assert!(head.contains("twitter:card\" content=\"summary_large_image\""));
        assert!(!head.contains("x-default"));
        assert!(!head.contains("og:locale:alternate"));
        // The raw title inside JSON-LD must not close the script element
        assert!(!head.contains("<World></script>"));

        let page = render_head(&page_meta(&site, &dict(Locale::Pl), Locale::Pl, RouteKey::Contact));
        assert!(page.contains(
            "<link rel=\"alternate\" hreflang=\"en\" href=\"https://kowalski.dev/en/contact\">"
        ));
        assert!(page.contains("hreflang=\"x-default\""));
        assert!(page.contains("<meta property=\"og:locale\" content=\"pl_PL\">"));
        assert!(page.contains("<meta property=\"og:locale:alternate\" content=\"en_US\">"));
    }

    #[test]
    fn test_script_json_escapes_closing_tags() {
        let value = json!({ "headline": "</script><b>" });
        assert!(!script_json(&value).contains("</script>"));
    }

    #[test]
    fn test_person_same_as() {
        let person = json_ld_person(&site());
        assert_eq!(person["sameAs"][0], "https://x.com/kowalski");
    }
}
