use crate::escape::xml_escape;
use chrono::NaiveDate;
use folio_core::routes;
use folio_core::{Locale, Post, RouteKey, SiteConfig};

/// One `<url>` element
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub alternates: Vec<(Locale, String)>,
    pub lastmod: Option<NaiveDate>,
    pub priority: f32,
}

/// Entries for every route in each of `locales`, followed by every post in them.
/// Route pages carry `lastmod` only when `updated` is given.
pub fn sitemap_entries(
    site: &SiteConfig,
    locales: &[Locale],
    posts: &[Post],
    updated: Option<NaiveDate>,
) -> Vec<SitemapEntry> {
    let mut entries = Vec::new();
    for key in RouteKey::ALL {
        let alternates: Vec<(Locale, String)> = routes::alternates(key)
            .into_iter()
            .filter(|(l, _)| locales.contains(l))
            .map(|(l, path)| (l, site.absolute_url(&path)))
            .collect();
        for (_, loc) in &alternates {
            entries.push(SitemapEntry {
                loc: loc.clone(),
                alternates: alternates.clone(),
                lastmod: updated,
                priority: key.priority(),
            });
        }
    }
    for post in posts
        .iter()
        .filter(|p| !p.meta.draft && locales.contains(&p.locale))
    {
        let loc = site.absolute_url(&routes::post_path(post.locale, &post.slug));
        entries.push(SitemapEntry {
            alternates: vec![(post.locale, loc.clone())],
            loc,
            lastmod: Some(post.meta.last_modified()),
            priority: 0.6,
        });
    }
    entries
}

/// Render a sitemap with `xhtml:link` language alternates
pub fn sitemap_xml(entries: &[SitemapEntry]) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" \
         xmlns:xhtml=\"http://www.w3.org/1999/xhtml\">\n",
    );
    for entry in entries {
        out.push_str("  <url>\n");
        out.push_str(&format!("    <loc>{}</loc>\n", xml_escape(&entry.loc)));
        if entry.alternates.len() > 1 {
            for (locale, href) in &entry.alternates {
                out.push_str(&format!(
                    "    <xhtml:link rel=\"alternate\" hreflang=\"{}\" href=\"{}\"/>\n",
                    locale.hreflang(),
                    xml_escape(href)
                ));
            }
            if let Some((_, href)) = entry.alternates.iter().find(|(l, _)| l.is_default()) {
                out.push_str(&format!(
                    "    <xhtml:link rel=\"alternate\" hreflang=\"x-default\" href=\"{}\"/>\n",
                    xml_escape(href)
                ));
            }
        }
        if let Some(lastmod) = entry.lastmod {
            out.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
        }
        out.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        out.push_str("  </url>\n");
    }
    out.push_str("</urlset>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::PostMeta;
    use folio_core::config::parse_site_toml_str;

    fn site() -> SiteConfig {
        parse_site_toml_str(
            "[site]\nname = \"n\"\nbase_url = \"https://kowalski.dev\"\nauthor = \"a\"\n",
        )
        .unwrap()
    }

    fn post(slug: &str, draft: bool) -> Post {
        Post {
            locale: Locale::Pl,
            slug: slug.to_string(),
            meta: PostMeta {
                title: slug.to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                description: String::new(),
                tags: vec![],
                author: None,
                image: None,
                draft,
                updated: None,
            },
            body: String::new(),
            reading_minutes: 1,
        }
    }

    #[test]
    fn test_entries_cover_every_route_and_post() {
        let posts = vec![post("jak-zaczac", false), post("szkic", true)];
        let entries = sitemap_entries(&site(), &Locale::ALL, &posts, None);
        assert_eq!(entries.len(), RouteKey::ALL.len() * Locale::ALL.len() + 1);

        let last = entries.last().unwrap();
        assert_eq!(last.loc, "https://kowalski.dev/pl/blog/jak-zaczac");
        assert_eq!(last.lastmod, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert!(entries.iter().all(|e| !e.loc.contains("szkic")));
    }

    #[test]
    fn test_entries_only_for_given_locales() {
        let mut en_post = post("hello", false);
        en_post.locale = Locale::En;
        let posts = vec![post("jak-zaczac", false), en_post];
        let entries = sitemap_entries(&site(), &[Locale::En], &posts, None);

        assert_eq!(entries.len(), RouteKey::ALL.len() + 1);
        assert!(entries.iter().all(|e| e.loc.starts_with("https://kowalski.dev/en")));
        assert!(entries.iter().all(|e| e.alternates.len() == 1));

        // Single-locale entries carry no alternate links
        let xml = sitemap_xml(&entries);
        assert!(!xml.contains("xhtml:link"));
    }

    #[test]
    fn test_sitemap_xml() {
        let entries = sitemap_entries(&site(), &Locale::ALL, &[post("jak-zaczac", false)], None);
        let xml = sitemap_xml(&entries);
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<loc>https://kowalski.dev/pl/kontakt</loc>"));
        assert!(xml.contains(
            "<xhtml:link rel=\"alternate\" hreflang=\"en\" href=\"https://kowalski.dev/en/contact\"/>"
        ));
        assert!(xml.contains(
            "<xhtml:link rel=\"alternate\" hreflang=\"x-default\" href=\"https://kowalski.dev/en/contact\"/>"
        ));
        assert!(xml.contains("<lastmod>2024-01-01</lastmod>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }
}
