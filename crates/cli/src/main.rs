mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use folio_core::Locale;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Bilingual portfolio site generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Initialize a new site directory
    Init {
        /// Path to create the site in
        path: PathBuf,

        /// Site name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,

        /// Public origin, e.g. https://kowalski.dev
        #[arg(long, default_value = "https://example.com")]
        base_url: String,
    },

    /// Validate configuration, dictionaries and posts
    Validate {
        /// Path to site directory
        path: PathBuf,
    },

    /// Print the localized route table
    Routes {
        /// Only show one locale
        #[arg(short, long, value_parser = parse_locale)]
        locale: Option<Locale>,
    },

    /// List blog posts newest first
    Posts {
        /// Path to site directory
        path: PathBuf,

        /// Locale to list
        #[arg(short, long, value_parser = parse_locale, default_value = "en")]
        locale: Locale,

        /// Include drafts
        #[arg(long)]
        drafts: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Build the static site
    Build {
        /// Path to site directory
        path: PathBuf,

        /// Output directory for generated site
        #[arg(short, long)]
        output: PathBuf,

        /// Include drafts
        #[arg(long)]
        drafts: bool,
    },

    /// Serve the site locally, resolving localized paths on each request
    Preview {
        /// Path to site directory
        path: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Include drafts
        #[arg(long)]
        drafts: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_locale(s: &str) -> Result<Locale, String> {
    Locale::parse(s).ok_or_else(|| {
        let supported: Vec<&str> = Locale::ALL.iter().map(|l| l.as_str()).collect();
        format!("unsupported locale '{}' (expected one of: {})", s, supported.join(", "))
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Init {
            path,
            name,
            base_url,
        } => commands::init::run(path, name, base_url).await,
        Command::Validate { path } => commands::validate::run(path).await,
        Command::Routes { locale } => commands::routes::run(locale),
        Command::Posts {
            path,
            locale,
            drafts,
            json,
        } => commands::posts::run(path, locale, drafts, json).await,
        Command::Build {
            path,
            output,
            drafts,
        } => commands::build::run(path, output, drafts).await,
        Command::Preview {
            path,
            port,
            drafts,
        } => commands::preview::run(path, port, drafts).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "folio", &mut io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!(parse_locale("pl"), Ok(Locale::Pl));
        let err = parse_locale("de").unwrap_err();
        assert!(err.contains("en, pl"));
    }
}
