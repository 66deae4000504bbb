use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported site languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Pl,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Pl];
    pub const DEFAULT: Locale = Locale::En;

    /// Parse a URL segment or config value. Unknown input yields `None`.
    pub fn parse(s: &str) -> Option<Locale> {
        match s {
            "en" => Some(Locale::En),
            "pl" => Some(Locale::Pl),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Pl => "pl",
        }
    }

    /// Value for `hreflang` and the `<html lang>` attribute
    pub fn hreflang(self) -> &'static str {
        self.as_str()
    }

    /// Value for `og:locale`
    pub fn og_locale(self) -> &'static str {
        match self {
            Locale::En => "en_US",
            Locale::Pl => "pl_PL",
        }
    }

    /// Name of the language in that language, for the switcher link
    pub fn native_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Pl => "Polski",
        }
    }

    pub fn is_default(self) -> bool {
        self == Locale::DEFAULT
    }

    /// Index into per-locale arrays
    pub(crate) fn index(self) -> usize {
        match self {
            Locale::En => 0,
            Locale::Pl => 1,
        }
    }

    /// The other locales, in `ALL` order
    pub fn others(self) -> impl Iterator<Item = Locale> {
        Locale::ALL.into_iter().filter(move |l| *l != self)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical page identifier, independent of locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteKey {
    Home,
    About,
    Services,
    ServiceWebsites,
    ServiceEcommerce,
    ServiceWebApps,
    ServiceSeo,
    Projects,
    Blog,
    Contact,
    Faq,
    PrivacyPolicy,
}

impl RouteKey {
    pub const ALL: [RouteKey; 12] = [
        RouteKey::Home,
        RouteKey::About,
        RouteKey::Services,
        RouteKey::ServiceWebsites,
        RouteKey::ServiceEcommerce,
        RouteKey::ServiceWebApps,
        RouteKey::ServiceSeo,
        RouteKey::Projects,
        RouteKey::Blog,
        RouteKey::Contact,
        RouteKey::Faq,
        RouteKey::PrivacyPolicy,
    ];

    /// Stable locale-independent id, also the dictionary key under `pages.`
    pub fn id(self) -> &'static str {
        match self {
            RouteKey::Home => "home",
            RouteKey::About => "about",
            RouteKey::Services => "services",
            RouteKey::ServiceWebsites => "services/websites",
            RouteKey::ServiceEcommerce => "services/ecommerce",
            RouteKey::ServiceWebApps => "services/web-apps",
            RouteKey::ServiceSeo => "services/seo",
            RouteKey::Projects => "projects",
            RouteKey::Blog => "blog",
            RouteKey::Contact => "contact",
            RouteKey::Faq => "faq",
            RouteKey::PrivacyPolicy => "privacy-policy",
        }
    }

    pub fn from_id(id: &str) -> Option<RouteKey> {
        RouteKey::ALL.into_iter().find(|key| key.id() == id)
    }

    /// Dictionary path of this page's strings, e.g. `pages.services.seo`
    pub fn dictionary_key(self) -> String {
        format!("pages.{}", self.id().replace('/', "."))
    }

    /// Sitemap priority hint
    pub fn priority(self) -> f32 {
        match self {
            RouteKey::Home => 1.0,
            RouteKey::Services | RouteKey::Projects | RouteKey::Contact => 0.9,
            RouteKey::ServiceWebsites
            | RouteKey::ServiceEcommerce
            | RouteKey::ServiceWebApps
            | RouteKey::ServiceSeo => 0.8,
            RouteKey::About | RouteKey::Blog | RouteKey::Faq => 0.7,
            RouteKey::PrivacyPolicy => 0.3,
        }
    }

    /// Enclosing page in the breadcrumb trail
    pub fn parent(self) -> Option<RouteKey> {
        match self {
            RouteKey::Home => None,
            RouteKey::ServiceWebsites
            | RouteKey::ServiceEcommerce
            | RouteKey::ServiceWebApps
            | RouteKey::ServiceSeo => Some(RouteKey::Services),
            _ => Some(RouteKey::Home),
        }
    }

    pub fn is_service(self) -> bool {
        self.parent() == Some(RouteKey::Services)
    }

    /// Pages shown in the main navigation
    pub fn in_nav(self) -> bool {
        matches!(
            self,
            RouteKey::Home
                | RouteKey::About
                | RouteKey::Services
                | RouteKey::Projects
                | RouteKey::Blog
                | RouteKey::Contact
        )
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Front matter of a blog post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMeta {
    pub title: String,
    pub date: NaiveDate,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub draft: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<NaiveDate>,
}

impl PostMeta {
    /// Date of the latest revision
    pub fn last_modified(&self) -> NaiveDate {
        self.updated.unwrap_or(self.date)
    }
}

/// A loaded blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub locale: Locale,
    pub slug: String,
    pub meta: PostMeta,
    /// Markdown source after the front matter
    pub body: String,
    pub reading_minutes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parse() {
        assert_eq!(Locale::parse("en"), Some(Locale::En));
        assert_eq!(Locale::parse("pl"), Some(Locale::Pl));
        assert_eq!(Locale::parse("EN"), None);
        assert_eq!(Locale::parse("de"), None);
        assert_eq!(Locale::parse(""), None);
    }

    #[test]
    fn test_exactly_one_default_locale() {
        let defaults = Locale::ALL.iter().filter(|l| l.is_default()).count();
        assert_eq!(defaults, 1);
    }

    #[test]
    fn test_locale_others() {
        assert_eq!(Locale::En.others().collect::<Vec<_>>(), vec![Locale::Pl]);
        assert_eq!(Locale::Pl.others().collect::<Vec<_>>(), vec![Locale::En]);
    }

    #[test]
    fn test_route_key_id_round_trip() {
        for key in RouteKey::ALL {
            assert_eq!(RouteKey::from_id(key.id()), Some(key));
        }
        assert_eq!(RouteKey::from_id("services/unknown"), None);
    }

    #[test]
    fn test_parent_chain_ends_at_home() {
        for key in RouteKey::ALL {
            let mut current = key;
            let mut steps = 0;
            while let Some(parent) = current.parent() {
                current = parent;
                steps += 1;
                assert!(steps <= 2);
            }
            assert_eq!(current, RouteKey::Home);
        }
        assert!(RouteKey::ServiceSeo.is_service());
        assert!(!RouteKey::Services.is_service());
    }

    #[test]
    fn test_dictionary_key() {
        assert_eq!(RouteKey::Contact.dictionary_key(), "pages.contact");
        assert_eq!(RouteKey::ServiceSeo.dictionary_key(), "pages.services.seo");
    }
}
