//! Minimal HTML documents carrying metadata, navigation and page text.

use crate::escape::html_escape;
use crate::markdown::render_markdown;
use crate::seo::{self, PageMeta};
use folio_core::routes;
use folio_core::{Dictionary, Locale, Post, RouteKey, SiteConfig};

fn nav_label<'a>(dict: &'a Dictionary, key: RouteKey, fallback: &'a str) -> String {
    dict.text(&format!("nav.{}", key.id().replace('/', ".")))
        .unwrap_or(fallback)
        .to_string()
}

fn render_nav(site: &SiteConfig, dict: &Dictionary, locale: Locale, current: Option<RouteKey>) -> String {
    let items: String = RouteKey::ALL
        .into_iter()
        .filter(|key| key.in_nav())
        .map(|key| {
            let heading = seo::page_heading(site, dict, key);
            let label = nav_label(dict, key, &heading);
            let current_attr = if current == Some(key) {
                " aria-current=\"page\""
            } else {
                ""
            };
            format!(
                "<li><a href=\"{}\"{}>{}</a></li>",
                routes::resolve(locale, key),
                current_attr,
                html_escape(&label)
            )
        })
        .collect();
    format!("<nav><ul>{}</ul></nav>", items)
}

/// Links to the same page in the other locales
fn render_switcher(links: &[(Locale, String)]) -> String {
    if links.is_empty() {
        return String::new();
    }
    let items: String = links
        .iter()
        .map(|(locale, href)| {
            format!(
                "<a href=\"{}\" hreflang=\"{}\" lang=\"{}\">{}</a>",
                html_escape(href),
                locale.hreflang(),
                locale.hreflang(),
                locale.native_name()
            )
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("<div class=\"lang-switch\">{}</div>", items)
}

/// Wrap page content in a complete document
pub fn render_document(
    site: &SiteConfig,
    dict: &Dictionary,
    meta: &PageMeta,
    current: Option<RouteKey>,
    switch_links: &[(Locale, String)],
    main: &str,
) -> String {
    let footer = dict
        .text("footer.copyright")
        .map(html_escape)
        .unwrap_or_else(|| html_escape(&site.author));
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{head}</head>
<body>
<header>
<a class="brand" href="{home}">{name}</a>
{nav}
{switcher}
</header>
<main>
{main}
</main>
<footer>{footer}</footer>
</body>
</html>
"#,
        lang = meta.locale.hreflang(),
        head = seo::render_head(meta),
        home = routes::resolve(meta.locale, RouteKey::Home),
        name = html_escape(&site.name),
        nav = render_nav(site, dict, meta.locale, current),
        switcher = render_switcher(switch_links),
        main = main,
        footer = footer,
    )
}

fn route_switch_links(locale: Locale, key: RouteKey) -> Vec<(Locale, String)> {
    let path = routes::resolve(locale, key);
    locale
        .others()
        .filter_map(|other| routes::switch_locale(&path, other).map(|target| (other, target)))
        .collect()
}

/// Page for a route other than the blog index
pub fn render_route_page(site: &SiteConfig, dict: &Dictionary, locale: Locale, key: RouteKey) -> String {
    let meta = seo::page_meta(site, dict, locale, key);
    let heading = seo::page_heading(site, dict, key);
    let mut main = format!("<h1>{}</h1>\n", html_escape(&heading));
    if let Some(intro) = dict.text(&format!("{}.description", key.dictionary_key())) {
        main.push_str(&format!("<p>{}</p>\n", html_escape(intro)));
    }

    if key == RouteKey::Services {
        let items: String = RouteKey::ALL
            .into_iter()
            .filter(|k| k.is_service())
            .map(|k| {
                format!(
                    "<li><a href=\"{}\">{}</a></li>",
                    routes::resolve(locale, k),
                    html_escape(&seo::page_heading(site, dict, k))
                )
            })
            .collect();
        main.push_str(&format!("<ul class=\"services\">{}</ul>\n", items));
    }

    render_document(
        site,
        dict,
        &meta,
        Some(key),
        &route_switch_links(locale, key),
        &main,
    )
}

fn render_post_card(dict: &Dictionary, post: &Post) -> String {
    let minutes_label = dict.text("blog.reading_time").unwrap_or("min");
    format!(
        "<article>\n<h2><a href=\"{}\">{}</a></h2>\n<p><time datetime=\"{date}\">{date}</time> · {} {}</p>\n<p>{}</p>\n</article>\n",
        routes::post_path(post.locale, &post.slug),
        html_escape(&post.meta.title),
        post.reading_minutes,
        html_escape(minutes_label),
        html_escape(&post.meta.description),
        date = post.meta.date,
    )
}

/// Blog index listing `posts` in the given order
pub fn render_blog_index(site: &SiteConfig, dict: &Dictionary, locale: Locale, posts: &[Post]) -> String {
    let meta = seo::page_meta(site, dict, locale, RouteKey::Blog);
    let heading = seo::page_heading(site, dict, RouteKey::Blog);
    let mut main = format!("<h1>{}</h1>\n", html_escape(&heading));
    if posts.is_empty() {
        let empty = dict.text("blog.empty").unwrap_or("No posts yet.");
        main.push_str(&format!("<p>{}</p>\n", html_escape(empty)));
    }
    for post in posts {
        main.push_str(&render_post_card(dict, post));
    }
    render_document(
        site,
        dict,
        &meta,
        Some(RouteKey::Blog),
        &route_switch_links(locale, RouteKey::Blog),
        &main,
    )
}

/// Full post page. The switcher points at the other locale's blog index,
/// since posts are not translated one-to-one.
pub fn render_post_page(site: &SiteConfig, dict: &Dictionary, post: &Post) -> String {
    let meta = seo::post_meta(site, post);
    let back = dict.text("blog.back").unwrap_or("Back to blog");
    let main = format!(
        "<article>\n<h1>{}</h1>\n<p><time datetime=\"{date}\">{date}</time></p>\n{}\n</article>\n<p><a href=\"{}\">{}</a></p>\n",
        html_escape(&post.meta.title),
        render_markdown(&post.body),
        routes::resolve(post.locale, RouteKey::Blog),
        html_escape(back),
        date = post.meta.date,
    );
    render_document(
        site,
        dict,
        &meta,
        Some(RouteKey::Blog),
        &route_switch_links(post.locale, RouteKey::Blog),
        &main,
    )
}

/// 404 page in the given locale
pub fn render_not_found(site: &SiteConfig, dict: &Dictionary, locale: Locale) -> String {
    let title = dict.text("not_found.title").unwrap_or("Page not found");
    let body = dict
        .text("not_found.description")
        .unwrap_or("The page you are looking for does not exist.");
    let home_label = dict.text("not_found.home").unwrap_or("Go to the home page");
    let meta = PageMeta {
        locale,
        title: format!("{} | {}", title, site.name),
        description: body.to_string(),
        canonical: site.absolute_url(&routes::resolve(locale, RouteKey::Home)),
        alternates: Vec::new(),
        x_default: None,
        og_type: seo::OgType::Website,
        image: None,
        twitter_site: None,
        json_ld: Vec::new(),
    };
    let main = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"{}\">{}</a></p>\n",
        html_escape(title),
        html_escape(body),
        routes::resolve(locale, RouteKey::Home),
        html_escape(home_label)
    );
    render_document(site, dict, &meta, None, &[], &main)
}

/// Bare 404 for requests whose locale is unknown or whose dictionary is missing
pub fn render_plain_not_found() -> String {
    "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>404</title></head>\
     <body><h1>404</h1></body></html>\n"
        .to_string()
}

/// Root page that sends visitors to the default locale
pub fn render_redirect(target: &str) -> String {
    let target = html_escape(target);
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">\
         <meta http-equiv=\"refresh\" content=\"0; url={0}\">\
         <link rel=\"canonical\" href=\"{0}\"></head>\
         <body><a href=\"{0}\">{0}</a></body></html>\n",
        target
    )
}
