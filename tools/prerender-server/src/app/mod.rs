//! The application rendered by the server.
//!
//! A small storefront: a home page backed by the GraphQL API, a
//! code-split about page, and an account page that requires a session.

mod pages;

use std::sync::Arc;

use prerender_sdk::prelude::{escape_attr, Component, Element, RenderScope, TreeView};

use pages::{About, Account, Home, Login, NotFound};

const NAV: [(&str, &str); 3] = [("/", "Home"), ("/about", "About"), ("/account", "Account")];

/// Root component: navigation plus the page for the request path.
pub struct App;

/// Root of the application tree.
pub fn root() -> Element {
    Arc::new(App)
}

impl Component for App {
    fn name(&self) -> &str {
        "app"
    }

    fn children(&self, view: &TreeView<'_>) -> Vec<Element> {
        let page: Element = match view.path() {
            "/" => Arc::new(Home),
            "/about" => Arc::new(About),
            "/account" => Arc::new(Account),
            "/login" => Arc::new(Login),
            _ => Arc::new(NotFound),
        };
        vec![page]
    }

    fn render(&self, scope: &mut RenderScope<'_>, children: String) -> String {
        scope.set_title("Storefront");
        scope.set_html_attribute("lang", "en");

        let current = scope.request().path.as_str();
        let links: String = NAV
            .iter()
            .map(|(href, label)| {
                let class = if *href == current { r#" class="active""# } else { "" };
                format!(r#"<a href="{}"{}>{}</a>"#, escape_attr(href), class, label)
            })
            .collect();

        format!(r#"<div class="app"><nav>{links}</nav>{children}</div>"#)
    }
}
