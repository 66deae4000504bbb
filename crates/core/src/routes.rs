//! Localized URL slugs for every logical page.
//!
//! The slug table is an exhaustive match over `(RouteKey, Locale)`, so a key
//! missing from any locale is a compile error rather than a runtime lookup miss.

use crate::types::{Locale, RouteKey};

/// URL slug of `key` under `locale`, without the locale prefix.
/// Empty for the home page.
pub fn slug(locale: Locale, key: RouteKey) -> &'static str {
    match (key, locale) {
        (RouteKey::Home, _) => "",
        (RouteKey::About, Locale::En) => "about",
        (RouteKey::About, Locale::Pl) => "o-mnie",
        (RouteKey::Services, Locale::En) => "services",
        (RouteKey::Services, Locale::Pl) => "uslugi",
        (RouteKey::ServiceWebsites, Locale::En) => "services/websites",
        (RouteKey::ServiceWebsites, Locale::Pl) => "uslugi/strony-internetowe",
        (RouteKey::ServiceEcommerce, Locale::En) => "services/ecommerce",
        (RouteKey::ServiceEcommerce, Locale::Pl) => "uslugi/sklepy-internetowe",
        (RouteKey::ServiceWebApps, Locale::En) => "services/web-applications",
        (RouteKey::ServiceWebApps, Locale::Pl) => "uslugi/aplikacje-webowe",
        (RouteKey::ServiceSeo, Locale::En) => "services/seo",
        (RouteKey::ServiceSeo, Locale::Pl) => "uslugi/pozycjonowanie",
        (RouteKey::Projects, Locale::En) => "projects",
        (RouteKey::Projects, Locale::Pl) => "projekty",
        (RouteKey::Blog, _) => "blog",
        (RouteKey::Contact, Locale::En) => "contact",
        (RouteKey::Contact, Locale::Pl) => "kontakt",
        (RouteKey::Faq, _) => "faq",
        (RouteKey::PrivacyPolicy, Locale::En) => "privacy-policy",
        (RouteKey::PrivacyPolicy, Locale::Pl) => "polityka-prywatnosci",
    }
}

/// Full locale-prefixed path of `key`, e.g. `/pl/kontakt`.
pub fn resolve(locale: Locale, key: RouteKey) -> String {
    match slug(locale, key) {
        "" => format!("/{}", locale),
        s => format!("/{}/{}", locale, s),
    }
}

/// Split `/<locale>/<rest>` into the locale and `rest` (without leading slash).
fn split_locale(pathname: &str) -> Option<(Locale, &str)> {
    let path = pathname.strip_prefix('/')?;
    let (segment, rest) = match path.split_once('/') {
        Some((segment, rest)) => (segment, Some(rest)),
        None => (path, None),
    };
    let locale = Locale::parse(segment)?;
    match rest {
        // "/en/" is not "/en"
        Some("") => None,
        Some(rest) => Some((locale, rest)),
        None => Some((locale, "")),
    }
}

/// Locale and route key of a full pathname. Exact slug match only.
pub fn match_path(pathname: &str) -> Option<(Locale, RouteKey)> {
    let (locale, rest) = split_locale(pathname)?;
    RouteKey::ALL
        .into_iter()
        .find(|key| slug(locale, *key) == rest)
        .map(|key| (locale, key))
}

/// Route key a full pathname was resolved from, or `None` if no slug of
/// that path's locale matches exactly.
pub fn reverse_resolve(pathname: &str) -> Option<RouteKey> {
    match_path(pathname).map(|(_, key)| key)
}

/// Path of a blog post, e.g. `/en/blog/hello-world`.
pub fn post_path(locale: Locale, post_slug: &str) -> String {
    format!("{}/{}", resolve(locale, RouteKey::Blog), post_slug)
}

/// Locale and post slug of a blog post path. The slug is not checked
/// against the content registry.
pub fn parse_post_path(pathname: &str) -> Option<(Locale, &str)> {
    let (locale, rest) = split_locale(pathname)?;
    let post_slug = rest
        .strip_prefix(slug(locale, RouteKey::Blog))?
        .strip_prefix('/')?;
    if post_slug.is_empty() || post_slug.contains('/') {
        return None;
    }
    Some((locale, post_slug))
}

/// Equivalent path in `target` for a route or blog post path.
///
/// Blog posts keep their slug; whether the target locale has a post
/// with that slug is for the caller to check.
pub fn switch_locale(pathname: &str, target: Locale) -> Option<String> {
    if let Some((_, key)) = match_path(pathname) {
        return Some(resolve(target, key));
    }
    parse_post_path(pathname).map(|(_, post_slug)| post_path(target, post_slug))
}

/// Every locale's path for `key`, for hreflang links.
pub fn alternates(key: RouteKey) -> Vec<(Locale, String)> {
    Locale::ALL
        .into_iter()
        .map(|locale| (locale, resolve(locale, key)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_resolve_starts_with_locale() {
        for locale in Locale::ALL {
            for key in RouteKey::ALL {
                let path = resolve(locale, key);
                assert!(!path.is_empty());
                assert!(
                    path.starts_with(&format!("/{}", locale)),
                    "{} does not start with /{}",
                    path,
                    locale
                );
            }
        }
    }

    #[test]
    fn test_resolve_examples() {
        assert_eq!(resolve(Locale::En, RouteKey::Home), "/en");
        assert_eq!(resolve(Locale::Pl, RouteKey::Contact), "/pl/kontakt");
        assert_eq!(resolve(Locale::En, RouteKey::ServiceSeo), "/en/services/seo");
    }

    #[test]
    fn test_round_trip() {
        for locale in Locale::ALL {
            for key in RouteKey::ALL {
                let path = resolve(locale, key);
                assert_eq!(reverse_resolve(&path), Some(key), "path {}", path);
                assert_eq!(match_path(&path), Some((locale, key)));
            }
        }
    }

    #[test]
    fn test_slugs_unique_per_locale() {
        for locale in Locale::ALL {
            let slugs: HashSet<_> = RouteKey::ALL.iter().map(|k| slug(locale, *k)).collect();
            assert_eq!(slugs.len(), RouteKey::ALL.len(), "duplicate slug in {}", locale);
        }
    }

    #[test]
    fn test_reverse_resolve_exact_only() {
        assert_eq!(reverse_resolve("/pl/kontakt"), Some(RouteKey::Contact));
        // English slug under the Polish prefix
        assert_eq!(reverse_resolve("/pl/contact"), None);
        assert_eq!(reverse_resolve("/en/contact/"), None);
        assert_eq!(reverse_resolve("/en/cont"), None);
        assert_eq!(reverse_resolve("/en/contact/form"), None);
        assert_eq!(reverse_resolve("/en/"), None);
        assert_eq!(reverse_resolve("/de/contact"), None);
        assert_eq!(reverse_resolve("en/contact"), None);
        assert_eq!(reverse_resolve("/"), None);
        assert_eq!(reverse_resolve(""), None);
    }

    #[test]
    fn test_post_paths() {
        assert_eq!(post_path(Locale::Pl, "jak-zaczac"), "/pl/blog/jak-zaczac");
        assert_eq!(
            parse_post_path("/pl/blog/jak-zaczac"),
            Some((Locale::Pl, "jak-zaczac"))
        );
        assert_eq!(parse_post_path("/en/blog"), None);
        assert_eq!(parse_post_path("/en/blog/"), None);
        assert_eq!(parse_post_path("/en/blog/a/b"), None);
        assert_eq!(parse_post_path("/en/blogs/a"), None);
        assert_eq!(parse_post_path("/fr/blog/a"), None);
    }

    #[test]
    fn test_switch_locale() {
        assert_eq!(
            switch_locale("/en/services/websites", Locale::Pl).as_deref(),
            Some("/pl/uslugi/strony-internetowe")
        );
        assert_eq!(switch_locale("/pl", Locale::En).as_deref(), Some("/en"));
        assert_eq!(
            switch_locale("/en/blog/hello", Locale::Pl).as_deref(),
            Some("/pl/blog/hello")
        );
        assert_eq!(switch_locale("/en/nope", Locale::Pl), None);
    }

    #[test]
    fn test_alternates_cover_all_locales() {
        let alts = alternates(RouteKey::About);
        assert_eq!(
            alts,
            vec![
                (Locale::En, "/en/about".to_string()),
                (Locale::Pl, "/pl/o-mnie".to_string()),
            ]
        );
    }
}
