use folio_core::routes::resolve;
use folio_core::{Locale, RouteKey};

/// Print the route table, one row per route key
pub fn run(only: Option<Locale>) -> anyhow::Result<()> {
    let locales: Vec<Locale> = match only {
        Some(locale) => vec![locale],
        None => Locale::ALL.to_vec(),
    };

    let header: Vec<String> = locales.iter().map(|l| l.to_string()).collect();
    println!("{:<20} {}", "route", header.join(" | "));
    for key in RouteKey::ALL {
        let paths: Vec<String> = locales.iter().map(|l| resolve(*l, key)).collect();
        println!("{:<20} {}", key.id(), paths.join(" | "));
    }
    Ok(())
}
