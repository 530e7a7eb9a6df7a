//! HTTP server for post pages
//!
//! Routes:
//! - `GET /` lists every known post
//! - `GET /post/:slug` renders a post, rendering unknown slugs on demand
//! - `POST /post/:slug` submits the comment form and re-renders the page
//! - `GET /healthz`

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::cache::PageCache;
use crate::comments::{CommentForm, CommentInput, SubmissionOutcome};
use crate::content::Post;
use crate::error::Error;
use crate::PostView;

/// Server state
struct ServerState {
    app: PostView,
    cache: Arc<PageCache>,
}

/// Build the router for an application
pub fn router(app: PostView) -> Router {
    let cache = PageCache::new(app.store.clone(), app.config.revalidate_after());
    let state = Arc::new(ServerState { app, cache });

    Router::new()
        .route("/", get(index_handler))
        .route("/healthz", get(|| async { "ok" }))
        .route("/post/:slug", get(post_handler).post(comment_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(app: &PostView, ip: &str, port: u16, open: bool) -> Result<()> {
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!(
        "Pages revalidate after {}s. Press Ctrl+C to stop.",
        app.config.revalidate
    );

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(app.clone())).await?;

    Ok(())
}

async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    let rendered = match state.app.static_paths().await {
        Ok(slugs) => state.app.renderer.render_index(&slugs),
        Err(e) => return error_response(e),
    };

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => error_response(e),
    }
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    let post = match load_post(&state, &slug).await {
        Ok(Some(post)) => post,
        Ok(None) => return not_found(&state),
        Err(e) => return error_response(e),
    };

    let form = CommentForm::new(&post.id);
    match state.app.renderer.render_post(&post, &form) {
        Ok(html) => Html(html).into_response(),
        Err(e) => error_response(e),
    }
}

async fn comment_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
    Form(input): Form<CommentInput>,
) -> Response {
    let post = match load_post(&state, &slug).await {
        Ok(Some(post)) => post,
        Ok(None) => return not_found(&state),
        Err(e) => return error_response(e),
    };

    let mut form = CommentForm::new(&post.id);
    let outcome = form.submit(input, state.app.comments.as_ref()).await;

    let status = match outcome {
        SubmissionOutcome::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };

    match state.app.renderer.render_post(&post, &form) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn load_post(state: &ServerState, slug: &str) -> crate::Result<Option<Arc<Post>>> {
    let lookup = state.cache.get(slug).await?;
    if lookup.post.is_none() {
        tracing::warn!("Post not found: {}", slug);
    }
    Ok(lookup.post)
}

fn not_found(state: &ServerState) -> Response {
    match state.app.renderer.render_not_found() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(err: Error) -> Response {
    tracing::error!("Request failed: {}", err);
    let status = match err {
        Error::Store(_) | Error::Decode(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, "Server error").into_response()
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::testing::ScriptedSink;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn form_post(slug: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/post/{}", slug))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_get_post() {
        let dir = tempfile::tempdir().unwrap();
        let app = crate::testing::app(dir.path(), Arc::new(ScriptedSink::succeeding()));

        let (status, body) = send(router(app), get("/post/hello-world")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Hello World"));
        assert!(body.contains("Ana"));
        assert!(body.contains("Great post!"));
        assert!(body.contains("Leave a comment below!"));
    }

    #[tokio::test]
    async fn test_unknown_slug_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = crate::testing::app(dir.path(), Arc::new(ScriptedSink::succeeding()));

        let (status, body) = send(router(app), get("/post/missing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("404"));
    }

    #[tokio::test]
    async fn test_invalid_comment_not_sent() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(ScriptedSink::succeeding());
        let app = crate::testing::app(dir.path(), sink.clone());

        let (status, body) = send(
            router(app),
            form_post("hello-world", "_id=p1&name=&email=a%40b.com&comment=hi"),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("The Name Field is required"));
        assert!(!body.contains("The Email Field is required"));
        assert!(!body.contains("The Comment Field is required"));
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn test_comment_submitted() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(ScriptedSink::succeeding());
        let app = crate::testing::app(dir.path(), sink.clone());

        let (status, body) = send(
            router(app),
            form_post("hello-world", "_id=p1&name=Ana&email=a%40b.com&comment=Nice+one"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Thank you for submitting your comment!"));
        assert!(!body.contains("<form"));
        // Not visible until approved
        assert!(!body.contains("Nice one"));

        let calls = sink.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].post_id, "p1");
        assert_eq!(calls[0].email, "a@b.com");
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_form() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(ScriptedSink::failing());
        let app = crate::testing::app(dir.path(), sink.clone());

        let (status, body) = send(
            router(app),
            form_post("hello-world", "_id=p1&name=Ana&email=a%40b.com&comment=hi"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<form"));
        assert!(!body.contains("Thank you for submitting your comment!"));
        assert!(!body.contains("Field is required"));
        assert_eq!(sink.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_index_lists_posts() {
        let dir = tempfile::tempdir().unwrap();
        let app = crate::testing::app(dir.path(), Arc::new(ScriptedSink::succeeding()));

        let (status, body) = send(router(app), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("hello-world"));
        assert!(body.contains("second"));
    }
}
