//! Development server - reloads content before every page request

use anyhow::Result;
use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router, ServiceExt,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{ContentIndex, ReloadReport};
use crate::render::SiteRenderer;
use crate::Blog;

/// Server state
struct ServerState {
    index: ContentIndex,
    renderer: SiteRenderer,
}

/// Start the development server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let index = blog.index();
    log_reload(&index.load_all());

    let renderer = SiteRenderer::new(&blog.config)?;
    let state = Arc::new(ServerState { index, renderer });

    if !blog.static_dir.is_dir() {
        tracing::warn!("Static directory {:?} not found", blog.static_dir);
    }

    let app = Router::new()
        .route("/", get(index_front))
        .route("/:page", get(index_paged))
        .route("/archive", get(archive))
        .route("/archive/:tag", get(archive_tag))
        .route("/page/*path", get(page_view))
        .route("/post/*path", get(post_view))
        .nest_service("/static", ServeDir::new(&blog.static_dir))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Directory-style URLs arrive with a trailing slash
    let app = NormalizePathLayer::trim_trailing_slash().layer(app);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let pages = state.index.pages().pages.len();
    let posts = state.index.posts().posts.len();
    println!("Serving {} pages and {} posts at http://{}:{}", pages, posts, ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}

/// Reload all content; a kind that fails keeps its previous snapshot
fn refresh(state: &ServerState) {
    log_reload(&state.index.load_all());
}

fn log_reload(report: &ReloadReport) {
    match &report.pages {
        Ok(stats) => {
            for error in &stats.errors {
                tracing::warn!("Skipped page: {}", error);
            }
        }
        Err(e) => tracing::warn!("Page reload failed, serving previous pages: {}", e),
    }
    match &report.posts {
        Ok(stats) => {
            for error in &stats.errors {
                tracing::warn!("Skipped post: {}", error);
            }
        }
        Err(e) => tracing::warn!("Post reload failed, serving previous posts: {}", e),
    }
}

async fn index_front(State(state): State<Arc<ServerState>>) -> Response {
    render_index(&state, 1)
}

async fn index_paged(
    State(state): State<Arc<ServerState>>,
    Path(page): Path<String>,
) -> Response {
    // Anything non-numeric here is just an unknown URL
    match page.parse::<usize>() {
        Ok(page) => render_index(&state, page),
        Err(_) => not_found().await,
    }
}

fn render_index(state: &ServerState, page: usize) -> Response {
    refresh(state);
    let posts = state.index.posts();
    match state.renderer.index(&posts, page) {
        Ok(html) => Html(html).into_response(),
        Err(e) => server_error(e),
    }
}

async fn archive(State(state): State<Arc<ServerState>>) -> Response {
    refresh(&state);
    let posts = state.index.posts();
    match state.renderer.archive(&posts) {
        Ok(html) => Html(html).into_response(),
        Err(e) => server_error(e),
    }
}

async fn archive_tag(
    State(state): State<Arc<ServerState>>,
    Path(tag): Path<String>,
) -> Response {
    refresh(&state);
    let posts = state.index.posts();
    match state.renderer.archive_tag(&posts, &tag) {
        Ok(Some(html)) => Html(html).into_response(),
        Ok(None) => not_found().await,
        Err(e) => server_error(e),
    }
}

async fn page_view(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
) -> Response {
    refresh(&state);
    match state.index.page_by_path(path.trim_matches('/')) {
        Some(page) => match state.renderer.page(&page) {
            Ok(html) => Html(html).into_response(),
            Err(e) => server_error(e),
        },
        None => not_found().await,
    }
}

async fn post_view(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
) -> Response {
    refresh(&state);
    match state.index.post_by_path(path.trim_matches('/')) {
        Some(post) => match state.renderer.post(&post) {
            Ok(html) => Html(html).into_response(),
            Err(e) => server_error(e),
        },
        None => not_found().await,
    }
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html("<h1>404 Not Found</h1>")).into_response()
}

fn server_error(error: anyhow::Error) -> Response {
    tracing::error!("Render failed: {}", error);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<h1>500 Internal Server Error</h1>"),
    )
        .into_response()
}
