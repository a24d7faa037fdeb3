//! Component model and the scopes components see during each pass.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use prerender_core::RequestContext;
use prerender_data::{GraphQlClient, QueryRequest};
use prerender_store::{Action, Store};
use prerender_template::{LinkTag, MetaTag, PageHead};

use crate::error::RenderError;

/// A node in the application tree.
pub type Element = Arc<dyn Component>;

/// A piece of the application that can load data and render markup.
#[async_trait]
pub trait Component: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Code-split chunk this component lives in.
    fn module(&self) -> Option<&str> {
        None
    }

    /// Child components. Called after this component's prefetch resolved
    /// and again during the markup pass, so it may depend on fetched data.
    fn children(&self, _view: &TreeView<'_>) -> Vec<Element> {
        Vec::new()
    }

    /// Load data this component needs before markup.
    async fn prefetch(&self, _scope: &PrefetchScope<'_>) -> Result<(), RenderError> {
        Ok(())
    }

    /// Render this component around its children's markup.
    fn render(&self, scope: &mut RenderScope<'_>, children: String) -> String;
}

/// Redirect target set by a component.
///
/// The first target set wins; later ones are ignored.
#[derive(Debug, Default)]
pub struct RedirectSlot {
    target: Mutex<Option<String>>,
}

impl RedirectSlot {
    /// Request a redirect.
    pub fn set(&self, target: impl Into<String>) {
        let mut slot = self.target.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_none() {
            *slot = Some(target.into());
        }
    }

    /// Current target.
    pub fn get(&self) -> Option<String> {
        self.target
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Read-only view of the request used to decide which children exist.
#[derive(Clone, Copy)]
pub struct TreeView<'a> {
    request: &'a RequestContext,
    store: &'a Store,
    data: &'a GraphQlClient,
}

impl<'a> TreeView<'a> {
    /// Create a view.
    pub fn new(request: &'a RequestContext, store: &'a Store, data: &'a GraphQlClient) -> Self {
        Self {
            request,
            store,
            data,
        }
    }

    /// The request being rendered.
    pub fn request(&self) -> &'a RequestContext {
        self.request
    }

    /// Request path.
    pub fn path(&self) -> &'a str {
        &self.request.path
    }

    /// The request's store.
    pub fn store(&self) -> &'a Store {
        self.store
    }

    /// Result of a query already run during this request.
    pub fn cached(&self, query: &QueryRequest) -> Option<Value> {
        self.data.cached(query)
    }
}

/// What a component can do during the prefetch pass.
#[derive(Clone, Copy)]
pub struct PrefetchScope<'a> {
    view: TreeView<'a>,
    redirect: &'a RedirectSlot,
}

impl<'a> PrefetchScope<'a> {
    /// Create a scope.
    pub fn new(view: TreeView<'a>, redirect: &'a RedirectSlot) -> Self {
        Self { view, redirect }
    }

    /// Tree view for child discovery.
    pub fn view(&self) -> TreeView<'a> {
        self.view
    }

    /// The request being rendered.
    pub fn request(&self) -> &'a RequestContext {
        self.view.request
    }

    /// The request's store.
    pub fn store(&self) -> &'a Store {
        self.view.store
    }

    /// Dispatch an action to the store.
    pub fn dispatch(&self, action: Action) {
        self.view.store.dispatch(action);
    }

    /// Run a query.
    pub async fn query(&self, query: &QueryRequest) -> Result<Value, RenderError> {
        Ok(self.view.data.query(query).await?)
    }

    /// Run a query and deserialize its data.
    pub async fn query_as<T: DeserializeOwned>(
        &self,
        query: &QueryRequest,
    ) -> Result<T, RenderError> {
        Ok(self.view.data.query_as(query).await?)
    }

    /// Respond with a redirect instead of the page.
    pub fn redirect(&self, target: impl Into<String>) {
        self.redirect.set(target);
    }
}

/// What a component can do during the markup pass.
///
/// Deeper components take precedence over their ancestors for the title,
/// meta tags with the same key and `<html>` attributes, even though
/// ancestors render later.
pub struct RenderScope<'a> {
    view: TreeView<'a>,
    redirect: &'a RedirectSlot,
    head: PageHead,
    depth: usize,
    set_at: HashMap<String, usize>,
}

impl<'a> RenderScope<'a> {
    /// Create a scope with empty head metadata.
    pub fn new(view: TreeView<'a>, redirect: &'a RedirectSlot) -> Self {
        Self {
            view,
            redirect,
            head: PageHead::new(),
            depth: 0,
            set_at: HashMap::new(),
        }
    }

    pub(crate) fn enter(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Whether a value set at the current depth may replace `slot`.
    fn claim(&mut self, slot: String) -> bool {
        match self.set_at.get(&slot) {
            Some(&depth) if depth > self.depth => false,
            _ => {
                self.set_at.insert(slot, self.depth);
                true
            }
        }
    }

    /// Tree view for child discovery.
    pub fn view(&self) -> TreeView<'a> {
        self.view
    }

    /// The request being rendered.
    pub fn request(&self) -> &'a RequestContext {
        self.view.request
    }

    /// The request's store.
    pub fn store(&self) -> &'a Store {
        self.view.store
    }

    /// Result of a query run during the prefetch pass.
    pub fn cached(&self, query: &QueryRequest) -> Option<Value> {
        self.view.cached(query)
    }

    /// Set the page title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        if self.claim("title".to_string()) {
            self.head.set_title(title);
        }
    }

    /// Add or replace a meta tag.
    pub fn add_meta(&mut self, tag: MetaTag) {
        if self.claim(format!("meta:{}", tag.key())) {
            self.head.add_meta(tag);
        }
    }

    /// Add a link tag.
    pub fn add_link(&mut self, link: LinkTag) {
        self.head.add_link(link);
    }

    /// Set an attribute on `<html>`.
    pub fn set_html_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if self.claim(format!("html:{name}")) {
            self.head.set_html_attribute(name, value);
        }
    }

    /// Respond with a redirect instead of the page.
    pub fn redirect(&self, target: impl Into<String>) {
        self.redirect.set(target);
    }

    /// Head metadata collected so far.
    pub fn head(&self) -> &PageHead {
        &self.head
    }

    /// Finish the pass, returning the collected head metadata.
    pub fn into_head(self) -> PageHead {
        self.head
    }
}
