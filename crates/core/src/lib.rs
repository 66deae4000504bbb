pub mod blog;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod routes;
pub mod types;

pub use blog::BlogStore;
pub use config::{SiteConfig, parse_site_toml};
pub use dictionary::{Dictionary, DictionaryStore};
pub use error::{Error, Result};
pub use types::*;
