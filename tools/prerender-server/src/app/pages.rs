//! Pages of the application.

use async_trait::async_trait;
use prerender_sdk::prelude::{
    escape_attr, escape_text, Action, Component, MetaTag, PrefetchScope, QueryRequest,
    RenderError, RenderScope,
};
use serde::Deserialize;
use serde_json::Value;

/// Query the home page runs during prefetch.
pub const FEATURED_QUERY: &str = "query Featured { featured { id name price } }";

#[derive(Debug, Deserialize)]
struct Featured {
    featured: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    id: String,
    name: String,
    price: f64,
}

/// Landing page listing featured products.
pub struct Home;

impl Home {
    fn query() -> QueryRequest {
        QueryRequest::new(FEATURED_QUERY).with_operation_name("Featured")
    }
}

#[async_trait]
impl Component for Home {
    fn name(&self) -> &str {
        "home"
    }

    async fn prefetch(&self, scope: &PrefetchScope<'_>) -> Result<(), RenderError> {
        let featured: Featured = scope.query_as(&Self::query()).await?;
        let ids: Vec<Value> = featured
            .featured
            .iter()
            .map(|p| Value::String(p.id.clone()))
            .collect();
        scope.dispatch(Action::set_domain("featured", Value::Array(ids)));
        Ok(())
    }

    fn render(&self, scope: &mut RenderScope<'_>, _children: String) -> String {
        scope.add_meta(MetaTag::name("description", "Featured products"));

        let products = scope
            .cached(&Self::query())
            .and_then(|data| serde_json::from_value::<Featured>(data).ok())
            .map(|f| f.featured)
            .unwrap_or_default();

        let items: String = products
            .iter()
            .map(|p| {
                format!(
                    r#"<li data-id="{}">{} <span class="price">{:.2}</span></li>"#,
                    escape_attr(&p.id),
                    escape_text(&p.name),
                    p.price
                )
            })
            .collect();

        format!(r#"<main class="home"><h1>Featured</h1><ul>{items}</ul></main>"#)
    }
}

/// Static page shipped in its own chunk.
pub struct About;

impl Component for About {
    fn name(&self) -> &str {
        "about"
    }

    fn module(&self) -> Option<&str> {
        Some("about")
    }

    fn render(&self, scope: &mut RenderScope<'_>, _children: String) -> String {
        scope.set_title("About us");
        scope.add_meta(MetaTag::name("description", "Who we are"));
        scope.add_meta(MetaTag::property("og:title", "About us"));

        r#"<main class="about"><h1>About us</h1><p>We sell things.</p></main>"#.to_string()
    }
}

/// Signed-in viewer's account. Anonymous viewers go to the login page.
pub struct Account;

#[async_trait]
impl Component for Account {
    fn name(&self) -> &str {
        "account"
    }

    fn module(&self) -> Option<&str> {
        Some("account")
    }

    async fn prefetch(&self, scope: &PrefetchScope<'_>) -> Result<(), RenderError> {
        if !scope.store().is_authenticated() {
            scope.redirect("/login");
        }
        Ok(())
    }

    fn render(&self, scope: &mut RenderScope<'_>, _children: String) -> String {
        scope.set_title("Your account");

        let user = scope
            .store()
            .with_state(|state| state.auth.current_user.clone())
            .unwrap_or_default();

        format!(
            r#"<main class="account"><h1>Your account</h1><p>Signed in as {}</p></main>"#,
            escape_text(&user)
        )
    }
}

/// Login form.
pub struct Login;

impl Component for Login {
    fn name(&self) -> &str {
        "login"
    }

    fn module(&self) -> Option<&str> {
        Some("login")
    }

    fn render(&self, scope: &mut RenderScope<'_>, _children: String) -> String {
        scope.set_title("Sign in");

        r#"<main class="login"><h1>Sign in</h1><form method="post" action="/api/login"><input name="email" type="email"><button type="submit">Sign in</button></form></main>"#.to_string()
    }
}

/// Fallback for unknown paths. The client router shows the same page.
pub struct NotFound;

impl Component for NotFound {
    fn name(&self) -> &str {
        "not-found"
    }

    fn render(&self, scope: &mut RenderScope<'_>, _children: String) -> String {
        scope.set_title("Page not found");
        scope.add_meta(MetaTag::name("robots", "noindex"));

        r#"<main class="not-found"><h1>Page not found</h1></main>"#.to_string()
    }
}
