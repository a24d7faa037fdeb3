//! Configurable components and per-request fixtures for tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use prerender_core::{Method, RequestContext};
use prerender_data::{GraphQlClient, GraphQlConfig, QueryRequest};
use prerender_store::{Action, Store, StoreFactory};

use crate::component::{
    Component, Element, PrefetchScope, RedirectSlot, RenderScope, TreeView,
};
use crate::error::RenderError;

/// Endpoint nothing listens on.
pub(crate) const UNREACHABLE_ENDPOINT: &str = "http://127.0.0.1:9/graphql";

#[derive(Default)]
pub(crate) struct Node {
    name: String,
    module: Option<String>,
    tag: Option<&'static str>,
    text: Option<String>,
    title: Option<String>,
    html_attribute: Option<(String, String)>,
    children: Vec<Element>,
    children_require: Option<String>,
    set_domain: Option<(String, Value)>,
    query: Option<(QueryRequest, String)>,
    show_domain: Option<String>,
    redirect_prefetch: Option<String>,
    redirect_render: Option<String>,
    fail: bool,
    barrier: Option<Arc<tokio::sync::Barrier>>,
}

impl Node {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn module(mut self, module: &str) -> Self {
        self.module = Some(module.to_string());
        self
    }

    pub(crate) fn tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    pub(crate) fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub(crate) fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub(crate) fn html_attribute(mut self, name: &str, value: &str) -> Self {
        self.html_attribute = Some((name.to_string(), value.to_string()));
        self
    }

    pub(crate) fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Only expose children once `domain` is in the store.
    pub(crate) fn children_require(mut self, domain: &str) -> Self {
        self.children_require = Some(domain.to_string());
        self
    }

    pub(crate) fn set_domain(mut self, key: &str, value: Value) -> Self {
        self.set_domain = Some((key.to_string(), value));
        self
    }

    /// Run `query` during prefetch and store its data under `domain`.
    pub(crate) fn query(mut self, query: QueryRequest, domain: &str) -> Self {
        self.query = Some((query, domain.to_string()));
        self
    }

    /// Render the JSON of a store domain as text.
    pub(crate) fn show_domain(mut self, domain: &str) -> Self {
        self.show_domain = Some(domain.to_string());
        self
    }

    pub(crate) fn redirect_prefetch(mut self, target: &str) -> Self {
        self.redirect_prefetch = Some(target.to_string());
        self
    }

    pub(crate) fn redirect_render(mut self, target: &str) -> Self {
        self.redirect_render = Some(target.to_string());
        self
    }

    pub(crate) fn fail(mut self) -> Self {
        self.fail = true;
        self
    }

    pub(crate) fn barrier(mut self, barrier: Arc<tokio::sync::Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub(crate) fn build(self) -> Element {
        Arc::new(self)
    }
}

#[async_trait]
impl Component for Node {
    fn name(&self) -> &str {
        &self.name
    }

    fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    fn children(&self, view: &TreeView<'_>) -> Vec<Element> {
        match &self.children_require {
            Some(domain) if view.store().domain(domain).is_none() => Vec::new(),
            _ => self.children.clone(),
        }
    }

    async fn prefetch(&self, scope: &PrefetchScope<'_>) -> Result<(), RenderError> {
        if let Some(target) = &self.redirect_prefetch {
            scope.redirect(target.clone());
        }
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if self.fail {
            return Err(RenderError::component(&self.name, "boom"));
        }
        if let Some((key, value)) = &self.set_domain {
            scope.dispatch(Action::set_domain(key.clone(), value.clone()));
        }
        if let Some((query, domain)) = &self.query {
            let data = scope.query(query).await?;
            scope.dispatch(Action::set_domain(domain.clone(), data));
        }
        Ok(())
    }

    fn render(&self, scope: &mut RenderScope<'_>, children: String) -> String {
        if let Some(title) = &self.title {
            scope.set_title(title.clone());
        }
        if let Some((name, value)) = &self.html_attribute {
            scope.set_html_attribute(name.clone(), value.clone());
        }
        if let Some(target) = &self.redirect_render {
            scope.redirect(target.clone());
        }

        let mut inner = self.text.clone().unwrap_or_default();
        if let Some(domain) = &self.show_domain {
            let value = scope.store().domain(domain).unwrap_or(Value::Null);
            inner.push_str(&prerender_template::escape_text(&value.to_string()));
        }
        inner.push_str(&children);

        match self.tag {
            Some(tag) => format!("<{tag}>{inner}</{tag}>"),
            None => inner,
        }
    }
}

/// Request-scoped pieces a render needs.
pub(crate) struct Fixture {
    pub(crate) ctx: RequestContext,
    pub(crate) store: Store,
    pub(crate) client: GraphQlClient,
}

impl Fixture {
    pub(crate) fn new(url: &str) -> Self {
        Self::with_endpoint(url, UNREACHABLE_ENDPOINT)
    }

    pub(crate) fn with_endpoint(url: &str, endpoint: &str) -> Self {
        let ctx = RequestContext::new(Method::Get, url);
        let store = StoreFactory::default().create(&ctx);
        let client = GraphQlClient::new(reqwest::Client::new(), GraphQlConfig::new(endpoint));
        Self { ctx, store, client }
    }

    pub(crate) fn prefetch_scope<'a>(&'a self, redirect: &'a RedirectSlot) -> PrefetchScope<'a> {
        PrefetchScope::new(TreeView::new(&self.ctx, &self.store, &self.client), redirect)
    }
}
