use folio_core::SiteConfig;

pub const SITEMAP_FILE: &str = "sitemap.xml";

/// robots.txt allowing everything except the configured prefixes
pub fn robots_txt(site: &SiteConfig) -> String {
    let mut out = String::from("User-agent: *\nAllow: /\n");
    for rule in &site.robots_disallow {
        out.push_str(&format!("Disallow: {}\n", rule));
    }
    out.push_str(&format!(
        "\nSitemap: {}\n",
        site.absolute_url(&format!("/{}", SITEMAP_FILE))
    ));
    out
}
