//! HTTP front end: turns axum requests into page renders.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::http::HeaderName;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use prerender_sdk::prelude::{
    incoming_request_id, AuthenticatedUser, Method, PageRenderer, RequestContext,
};
use tokio::net::TcpListener;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    renderer: Arc<PageRenderer>,
    trusted_user_header: Option<HeaderName>,
}

impl AppState {
    /// Create handler state.
    pub fn new(renderer: PageRenderer) -> Self {
        Self {
            renderer: Arc::new(renderer),
            trusted_user_header: None,
        }
    }

    /// Accept the viewer identity a trusted proxy puts in `header`.
    pub fn with_trusted_user_header(mut self, header: HeaderName) -> Self {
        self.trusted_user_header = Some(header);
        self
    }
}

/// Build the router: a health check, every other path is a page.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .fallback(render_page)
        .layer(middleware::from_fn_with_state(state.clone(), trusted_user))
        .with_state(state)
}

/// Serve `app` on `bind` until Ctrl-C.
pub async fn serve(bind: &str, app: Router) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding {}", bind))?;
    tracing::info!(address = %bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn healthz() -> &'static str {
    "ok"
}

async fn render_page(State(state): State<AppState>, request: Request) -> Response {
    let (parts, _body) = request.into_parts();
    let ctx = request_context(&parts);
    state.renderer.render(ctx).await.map(Body::from).into_response()
}

/// Attach `AuthenticatedUser` from the trusted proxy header.
///
/// The identity is taken only from the configured header; anything a client
/// sends under that name is assumed to be stripped by the proxy.
async fn trusted_user(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if let Some(header) = &state.trusted_user_header {
        let user = request
            .headers()
            .get(header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(AuthenticatedUser::new);
        if let Some(user) = user {
            request.extensions_mut().insert(user);
        }
    }
    next.run(request).await
}

fn request_context(parts: &Parts) -> RequestContext {
    let url = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let request_id =
        incoming_request_id(|name| parts.headers.get(name).and_then(|v| v.to_str().ok()));

    let mut ctx = RequestContext::new(Method::from(&parts.method), url).with_request_id(request_id);
    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            ctx = ctx.with_header(name.as_str(), value);
        }
    }
    if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
        ctx = ctx.with_user(user.clone());
    }
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app;
    use axum::http::{header, StatusCode};
    use prerender_sdk::prelude::{
        AssetManifest, BuildPaths, DocumentMode, EntryBundle, GraphQlConfig, RenderConfig,
        RenderEnvironment,
    };
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEMPLATE: &str = r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><title>App</title></head><body><div id="root"></div><script src="/static/js/main.abc.js"></script></body></html>"#;

    struct TestApp {
        _dir: tempfile::TempDir,
        env: RenderEnvironment,
    }

    impl TestApp {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let build = BuildPaths::from_build_dir(dir.path());
            std::fs::write(&build.template, TEMPLATE).unwrap();

            let manifest = AssetManifest::from_entries([
                ("about.js", "/static/js/about.1a2b.chunk.js"),
                ("account.js", "/static/js/account.3c4d.chunk.js"),
            ]);
            let env = RenderEnvironment::new(build, manifest, EntryBundle::new("main.abc.js"))
                .with_graphql(GraphQlConfig::new("http://127.0.0.1:9/graphql"));

            Self { _dir: dir, env }
        }

        fn with_graphql(mut self, endpoint: String) -> Self {
            self.env = self.env.with_graphql(GraphQlConfig::new(endpoint));
            self
        }

        fn router(&self) -> Router {
            let renderer = PageRenderer::new(Arc::new(self.env.clone()), app::root());
            build_router(
                AppState::new(renderer)
                    .with_trusted_user_header(HeaderName::from_static("x-authenticated-user")),
            )
        }
    }

    fn page_request(uri: &str) -> axum::http::request::Builder {
        axum::http::Request::builder().uri(uri)
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    // === Routing Tests ===

    #[tokio::test]
    async fn test_healthz() {
        let app = TestApp::new();
        let response = app
            .router()
            .oneshot(page_request("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_about_page_rendered() {
        let app = TestApp::new();
        let response = app
            .router()
            .oneshot(page_request("/about").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "max-age=300, s-maxage=3600, stale-while-revalidate=300, must-revalidate"
        );
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));

        let body = body_text(response).await;
        assert!(body.contains("<title>About us</title>"));
        assert!(body.contains(r#"<html lang="en">"#));
        assert_eq!(body.matches("lang=").count(), 1);
        assert!(body.contains("/static/js/about.1a2b.chunk.js"));
        assert!(!body.contains("account.3c4d"));
        assert!(body.contains("window.__PRELOADED_STATE__"));
    }

    #[tokio::test]
    async fn test_request_id_propagated() {
        let app = TestApp::new();
        let response = app
            .router()
            .oneshot(
                page_request("/about")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn test_unknown_path_renders_not_found_page() {
        let app = TestApp::new();
        let response = app
            .router()
            .oneshot(page_request("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Page not found"));
    }

    // === Session Tests ===

    #[tokio::test]
    async fn test_account_redirects_anonymous_viewer() {
        let app = TestApp::new();
        let response = app
            .router()
            .oneshot(page_request("/account").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn test_account_rendered_with_session_cookie() {
        let app = TestApp::new();
        let response = app
            .router()
            .oneshot(
                page_request("/account")
                    .header(header::COOKIE, "theme=dark; session=alice")
                    .header("x-authenticated-user", "alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "s-maxage=0");

        let body = body_text(response).await;
        assert!(body.contains("Signed in as alice"));
        assert!(body.contains(r#""currentUser":"alice""#));
        assert!(body.contains("/static/js/account.3c4d.chunk.js"));
    }

    #[tokio::test]
    async fn test_repeated_cookie_headers_joined() {
        let app = TestApp::new();
        let response = app
            .router()
            .oneshot(
                page_request("/account")
                    .header(header::COOKIE, "session=alice")
                    .header(header::COOKIE, "theme=dark")
                    .header("x-authenticated-user", "alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Signed in as alice"));
    }

    #[tokio::test]
    async fn test_trusted_header_ignored_when_not_configured() {
        let app = TestApp::new();
        let renderer = PageRenderer::new(Arc::new(app.env.clone()), app::root());
        let router = build_router(AppState::new(renderer));

        let response = router
            .oneshot(
                page_request("/about")
                    .header("x-authenticated-user", "mallory")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "max-age=300, s-maxage=3600, stale-while-revalidate=300, must-revalidate"
        );
    }

    // === Data Tests ===

    #[tokio::test]
    async fn test_home_page_prefetches_featured_products() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "operationName": "Featured" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "featured": [
                    { "id": "p1", "name": "Kettle <steel>", "price": 24.5 }
                ] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let app = TestApp::new().with_graphql(format!("{}/graphql", server.uri()));
        let response = app
            .router()
            .oneshot(page_request("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains(r#"<li data-id="p1">Kettle &lt;steel&gt; <span class="price">24.50</span></li>"#));
        assert!(body.contains(r#""featured":["p1"]"#));
        assert!(body.contains("window.__DATA__"));
        assert!(body.contains(r#"Kettle \u003csteel>"#));
    }

    #[tokio::test]
    async fn test_home_page_fails_without_api() {
        let app = TestApp::new();
        let response = app
            .router()
            .oneshot(page_request("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    }

    #[tokio::test]
    async fn test_shell_mode_needs_no_template() {
        let mut app = TestApp::new();
        std::fs::remove_file(&app.env.build().template).unwrap();
        app.env = app.env.with_render_config(RenderConfig {
            document: DocumentMode::Shell,
            ..RenderConfig::default()
        });

        let response = app
            .router()
            .oneshot(page_request("/about").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("We sell things."));
        assert!(body.contains(r#"<script defer="defer" src="/static/js/main.abc.js"></script>"#));
    }

    #[tokio::test]
    async fn test_missing_template_is_not_found() {
        let app = TestApp::new();
        std::fs::remove_file(&app.env.build().template).unwrap();

        let response = app
            .router()
            .oneshot(page_request("/about").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // === Request Context Tests ===

    #[test]
    fn test_request_context_from_parts() {
        let mut request = axum::http::Request::builder()
            .method("GET")
            .uri("/search?q=tea")
            .header("Cookie", "session=bob")
            .header("traceparent", "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(AuthenticatedUser::new("bob"));
        let (parts, _) = request.into_parts();

        let ctx = request_context(&parts);
        assert_eq!(ctx.path, "/search");
        assert_eq!(ctx.query.as_deref(), Some("q=tea"));
        assert_eq!(ctx.method, Method::Get);
        assert_eq!(ctx.cookie("session"), Some("bob"));
        assert_eq!(ctx.request_id.as_str(), "0af7651916cd43dd8448eb211c80319c");
        assert!(ctx.is_authenticated());
    }
}
