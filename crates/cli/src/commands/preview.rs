use super::project::Project;
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use folio_core::routes;
use folio_core::{Locale, RouteKey};
use folio_generator::page;
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::sync::RwLock;
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
struct AppState {
    project: Arc<RwLock<Arc<Project>>>,
}

/// What a request path refers to
#[derive(Debug, PartialEq)]
enum PageRequest<'a> {
    Root,
    Route(Locale, RouteKey),
    Post(Locale, &'a str),
    /// Valid locale prefix but nothing under it
    Missing(Locale),
    /// No locale prefix; may be a public file
    Unmatched,
}

fn classify(path: &str) -> PageRequest<'_> {
    if path == "/" {
        return PageRequest::Root;
    }
    let path = path.strip_suffix('/').unwrap_or(path);
    if let Some((locale, key)) = routes::match_path(path) {
        return PageRequest::Route(locale, key);
    }
    if let Some((locale, slug)) = routes::parse_post_path(path) {
        return PageRequest::Post(locale, slug);
    }
    match path
        .trim_start_matches('/')
        .split('/')
        .next()
        .and_then(Locale::parse)
    {
        Some(locale) => PageRequest::Missing(locale),
        None => PageRequest::Unmatched,
    }
}

fn plain_not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(page::render_plain_not_found())).into_response()
}

/// A missing dictionary means the locale has no pages
fn dictionary_error(err: folio_core::Error) -> Response {
    if err.is_not_found() {
        return plain_not_found();
    }
    tracing::error!(error = %err, "failed to load dictionary");
    (StatusCode::INTERNAL_SERVER_ERROR, "dictionary error").into_response()
}

async fn not_found(project: &Project, locale: Locale) -> Response {
    match project.dictionaries.get(locale).await {
        Ok(dict) => (
            StatusCode::NOT_FOUND,
            Html(page::render_not_found(&project.config, &dict, locale)),
        )
            .into_response(),
        Err(err) => dictionary_error(err),
    }
}

async fn serve_public(project: &Project, request: Request) -> Response {
    match ServeDir::new(project.public_dir()).oneshot(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.into_response(),
        _ => plain_not_found(),
    }
}

async fn page_handler(State(state): State<AppState>, request: Request) -> Response {
    let path = request.uri().path().to_string();
    let project = state.project.read().await.clone();
    let site = &project.config;

    match classify(&path) {
        PageRequest::Root => {
            Redirect::temporary(&routes::resolve(Locale::DEFAULT, RouteKey::Home)).into_response()
        }
        PageRequest::Route(locale, key) => {
            let dict = match project.dictionaries.get(locale).await {
                Ok(dict) => dict,
                Err(err) => return dictionary_error(err),
            };
            let html = if key == RouteKey::Blog {
                let posts = project.blog.list_posts(locale).await;
                page::render_blog_index(site, &dict, locale, &posts)
            } else {
                page::render_route_page(site, &dict, locale, key)
            };
            Html(html).into_response()
        }
        PageRequest::Post(locale, slug) => {
            let dict = match project.dictionaries.get(locale).await {
                Ok(dict) => dict,
                Err(err) => return dictionary_error(err),
            };
            match project.blog.load_post(locale, slug).await {
                Some(post) => Html(page::render_post_page(site, &dict, &post)).into_response(),
                None => not_found(&project, locale).await,
            }
        }
        PageRequest::Missing(locale) => not_found(&project, locale).await,
        PageRequest::Unmatched => serve_public(&project, request).await,
    }
}

fn app(state: AppState) -> Router {
    Router::new()
        .fallback(page_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start preview server for local development.
///
/// Every request goes through the route and blog resolvers, so the preview
/// answers exactly the paths the build writes. Content changes rescan the
/// site; the next request sees them.
pub async fn run(path: PathBuf, port: u16, drafts: bool) -> Result<()> {
    println!("🌐 Starting preview server...");
    println!("   Site: {}", path.display());

    let project = Project::load(&path, drafts).await?;
    println!("   ✓ Loaded: {}", project.config.name);
    for locale in Locale::ALL {
        println!("   ✓ Posts ({}): {}", locale, project.blog.slugs(locale).len());
    }

    let state = AppState {
        project: Arc::new(RwLock::new(Arc::new(project))),
    };

    let watcher_state = state.clone();
    let watcher_path = path.clone();
    tokio::spawn(async move {
        if let Err(e) = watch_files(watcher_path, drafts, watcher_state).await {
            tracing::error!(error = %e, "file watcher stopped");
        }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!(
        "\n🚀 Preview ready at: http://localhost:{}{}",
        port,
        routes::resolve(Locale::DEFAULT, RouteKey::Home)
    );
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;

    Ok(())
}

/// Reload the project whenever a file under the site directory changes
async fn watch_files(path: PathBuf, drafts: bool, state: AppState) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    watcher.watch(&path, RecursiveMode::Recursive)?;

    while let Some(event) = rx.recv().await {
        if !matches!(
            event.kind,
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
        ) {
            continue;
        }
        // Ignore editor temporaries and hidden files
        let relevant = event.paths.iter().any(|p| {
            let filename = p.file_name().unwrap_or_default().to_string_lossy();
            !filename.starts_with('.') && !filename.ends_with('~')
        });
        if !relevant {
            continue;
        }

        match Project::load(&path, drafts).await {
            Ok(project) => {
                *state.project.write().await = Arc::new(project);
                println!("   📝 Files changed, reloaded");
            }
            Err(e) => tracing::warn!(error = %format!("{:#}", e), "reload failed, keeping previous site"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::scaffold;
    use axum::body::Body;
    use tempfile::TempDir;

    #[test]
    fn test_classify() {
        assert_eq!(classify("/"), PageRequest::Root);
        assert_eq!(
            classify("/pl/kontakt"),
            PageRequest::Route(Locale::Pl, RouteKey::Contact)
        );
        assert_eq!(
            classify("/pl/kontakt/"),
            PageRequest::Route(Locale::Pl, RouteKey::Contact)
        );
        assert_eq!(classify("/en"), PageRequest::Route(Locale::En, RouteKey::Home));
        assert_eq!(
            classify("/en/blog/hello-world"),
            PageRequest::Post(Locale::En, "hello-world")
        );
        assert_eq!(classify("/pl/contact"), PageRequest::Missing(Locale::Pl));
        assert_eq!(classify("/de/contact"), PageRequest::Unmatched);
        assert_eq!(classify("/og.png"), PageRequest::Unmatched);
    }

    async fn test_app() -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        scaffold(dir.path(), "Jan Kowalski", "https://kowalski.dev").unwrap();
        std::fs::write(dir.path().join("public/og.png"), b"png").unwrap();
        let project = Project::load(dir.path(), false).await.unwrap();
        let state = AppState {
            project: Arc::new(RwLock::new(Arc::new(project))),
        };
        (dir, app(state))
    }

    async fn get(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_preview_responses() {
        let (_dir, app) = test_app().await;

        assert_eq!(get(&app, "/pl/kontakt").await.status(), StatusCode::OK);
        assert_eq!(get(&app, "/pl/blog").await.status(), StatusCode::OK);
        assert_eq!(
            get(&app, "/pl/blog/witaj-swiecie").await.status(),
            StatusCode::OK
        );
        assert_eq!(get(&app, "/og.png").await.status(), StatusCode::OK);

        let redirect = get(&app, "/").await;
        assert_eq!(redirect.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(redirect.headers()["location"], "/en");

        for missing in ["/pl/contact", "/en/blog/witaj-swiecie", "/de", "/missing.png"] {
            assert_eq!(
                get(&app, missing).await.status(),
                StatusCode::NOT_FOUND,
                "{}",
                missing
            );
        }
    }
}
