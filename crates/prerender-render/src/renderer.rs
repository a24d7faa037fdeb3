//! Turns a request into a page response.

use std::sync::Arc;

use http::header::{HeaderName, HeaderValue};
use http::{Response, StatusCode};
use serde_json::Value;
use tracing::Instrument;

use prerender_cache::{CacheDirectives, CacheHeadersBuilder};
use prerender_core::{RenderPhase, RequestContext};
use prerender_data::GraphQlClient;
use prerender_observability::{render_span, RequestLogger};
use prerender_store::Store;
use prerender_template::{DocumentSlots, DocumentTemplate, TemplateError};

use crate::component::{Element, PrefetchScope, RedirectSlot, RenderScope, TreeView};
use crate::config::{DocumentMode, PrefetchFailurePolicy};
use crate::environment::RenderEnvironment;
use crate::tree::{Markup, RenderTree};

/// Content type of rendered pages.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

const TIMED_PHASES: [RenderPhase; 4] = [
    RenderPhase::TemplateLoaded,
    RenderPhase::PrefetchComplete,
    RenderPhase::MarkupComplete,
    RenderPhase::ResponseReady,
];

/// Renders pages of one application tree.
#[derive(Clone)]
pub struct PageRenderer {
    env: Arc<RenderEnvironment>,
    tree: RenderTree,
}

impl PageRenderer {
    /// Create a renderer for the tree rooted at `root`.
    pub fn new(env: Arc<RenderEnvironment>, root: Element) -> Self {
        Self {
            env,
            tree: RenderTree::new(root),
        }
    }

    /// Shared environment.
    pub fn environment(&self) -> &RenderEnvironment {
        &self.env
    }

    /// Render the page for a request.
    ///
    /// Never fails: every failure maps to a status code.
    /// - 302 with `Location` when a component redirected
    /// - 200 with the document
    /// - 404 when the template cannot be read
    /// - 500 on a malformed template or a prefetch failure under
    ///   `PrefetchFailurePolicy::Fail`
    pub async fn render(&self, ctx: RequestContext) -> Response<String> {
        let span = render_span(&ctx);
        self.render_page(ctx).instrument(span).await
    }

    async fn render_page(&self, mut ctx: RequestContext) -> Response<String> {
        let env = &*self.env;
        let logger = RequestLogger::new(ctx.request_id.clone()).with_route(ctx.path.clone());
        let page_headers = CacheHeadersBuilder::for_request(env.cache_policy(), &ctx).build();

        let template = match env.render_config().document {
            DocumentMode::Template => match DocumentTemplate::load(&env.build().template).await {
                Ok(template) => Some(template),
                Err(e @ TemplateError::Read { .. }) => {
                    logger
                        .error_builder("template read failed")
                        .field("error", e.to_string())
                        .emit();
                    return error_response(StatusCode::NOT_FOUND, &ctx);
                }
                Err(e) => {
                    logger
                        .error_builder("template unusable")
                        .field("error", e.to_string())
                        .emit();
                    return error_response(StatusCode::INTERNAL_SERVER_ERROR, &ctx);
                }
            },
            DocumentMode::Shell => None,
        };
        ctx.timing.mark_phase(RenderPhase::TemplateLoaded);

        let store = env.stores().create(&ctx);
        let client = GraphQlClient::new(env.http().clone(), env.graphql().clone())
            .with_cookie(ctx.cookie_header());
        let redirect = RedirectSlot::default();

        let prefetched = {
            let view = TreeView::new(&ctx, &store, &client);
            self.tree.prefetch(PrefetchScope::new(view, &redirect)).await
        };
        ctx.timing.mark_phase(RenderPhase::PrefetchComplete);

        if let Some(target) = redirect.get() {
            return redirect_response(&logger, page_headers, &target, &ctx);
        }

        let (markup, modules) = match prefetched {
            Ok(modules) => {
                let view = TreeView::new(&ctx, &store, &client);
                let markup = self.tree.render(RenderScope::new(view, &redirect));
                ctx.timing.mark_phase(RenderPhase::MarkupComplete);

                if let Some(target) = redirect.get() {
                    return redirect_response(&logger, page_headers, &target, &ctx);
                }
                (markup, modules)
            }
            Err(e) => match env.render_config().prefetch_failure {
                PrefetchFailurePolicy::Fail => {
                    logger
                        .error_builder("prefetch failed")
                        .field("error", e.to_string())
                        .emit();
                    return error_response(StatusCode::INTERNAL_SERVER_ERROR, &ctx);
                }
                PrefetchFailurePolicy::ClientOnly => {
                    logger
                        .warn_builder("prefetch failed, leaving render to the client")
                        .field("error", e.to_string())
                        .emit();
                    (Markup::default(), Vec::new())
                }
            },
        };

        let document = match self.assemble(template.as_ref(), &markup, &modules, &store, &client) {
            Ok(document) => document,
            Err(e) => {
                logger
                    .error_builder("document assembly failed")
                    .field("error", e.to_string())
                    .emit();
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, &ctx);
            }
        };
        ctx.timing.mark_phase(RenderPhase::ResponseReady);

        let mut log = logger
            .info_builder("page rendered")
            .field_u64("status", 200)
            .field_u64("modules", modules.len() as u64)
            .field_u64("queries", client.network_requests() as u64)
            .field_bool("authenticated", ctx.is_authenticated());
        for phase in TIMED_PHASES {
            if let Some(elapsed) = ctx.timing.phase(phase) {
                log = log.duration_ms(phase.as_str(), elapsed);
            }
        }
        log.emit();

        let mut headers = page_headers;
        headers.push(("Content-Type", HTML_CONTENT_TYPE.to_string()));
        build_response(StatusCode::OK, headers, document)
    }

    /// Fill the document with the render output.
    fn assemble(
        &self,
        template: Option<&DocumentTemplate>,
        markup: &Markup,
        modules: &[String],
        store: &Store,
        client: &GraphQlClient,
    ) -> Result<String, TemplateError> {
        let env = &*self.env;
        let state = store.to_json();
        let data = (env.render_config().embed_data && client.has_data()).then(|| client.extract());
        let subscriptions = env.graphql().subscriptions_meta_tag();

        match template {
            Some(template) => {
                let mut slots = DocumentSlots::new()
                    .with_head(&markup.head)
                    .with_body(markup.html.clone())
                    .with_state(&state)?
                    .with_scripts(env.manifest().script_tags(modules));
                if let Some(tag) = &subscriptions {
                    slots = slots.with_meta_tag(tag);
                }
                if let Some(data) = &data {
                    slots = slots.with_data(data)?;
                }
                Ok(template.render(&slots))
            }
            None => {
                let mut meta = markup.head.render();
                if let Some(tag) = &subscriptions {
                    meta.push_str(tag);
                }
                let bundles: Vec<String> = env
                    .manifest()
                    .resolve(modules)
                    .into_iter()
                    .map(|file| format!("/{}", file.trim_start_matches('/')))
                    .collect();
                let data = data.unwrap_or_else(|| Value::Object(Default::default()));
                let footer = env.shell().footer(&state, &data, &bundles)?;
                Ok(format!("{}{}{}", env.shell().header(&meta), markup.html, footer))
            }
        }
    }
}

fn build_response(
    status: StatusCode,
    headers: Vec<(&'static str, String)>,
    body: String,
) -> Response<String> {
    let mut response = Response::new(body);
    *response.status_mut() = status;

    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().append(name, value);
            }
            _ => tracing::warn!(header = name, "dropping invalid response header"),
        }
    }
    response
}

fn error_response(status: StatusCode, ctx: &RequestContext) -> Response<String> {
    let headers = CacheHeadersBuilder::new()
        .cache_control(CacheDirectives::no_store().header_value())
        .request_id(ctx.request_id.as_str())
        .build();
    build_response(status, headers, String::new())
}

fn redirect_response(
    logger: &RequestLogger,
    mut headers: Vec<(&'static str, String)>,
    target: &str,
    ctx: &RequestContext,
) -> Response<String> {
    if HeaderValue::from_str(target).is_err() {
        logger
            .error_builder("redirect target is not a valid header value")
            .field("target", target)
            .emit();
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, ctx);
    }

    logger
        .info_builder("redirecting")
        .field_u64("status", 302)
        .field("location", target)
        .emit();
    headers.push(("Location", target.to_string()));
    build_response(StatusCode::FOUND, headers, String::new())
}
