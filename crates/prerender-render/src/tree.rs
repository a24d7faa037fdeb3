//! The two passes over the component tree.

use std::collections::HashSet;

use futures::future::{try_join_all, BoxFuture, FutureExt};

use prerender_template::PageHead;

use crate::component::{Element, PrefetchScope, RenderScope};
use crate::error::RenderError;

/// Output of the markup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    /// Rendered tree.
    pub html: String,
    /// Head metadata set by components.
    pub head: PageHead,
}

/// Application tree rooted at one component.
#[derive(Clone)]
pub struct RenderTree {
    root: Element,
}

impl RenderTree {
    /// Create a tree.
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Root component.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Prefetch pass.
    ///
    /// Siblings prefetch concurrently. A component's children are asked
    /// for only after its own prefetch resolved. Returns the code-split
    /// modules of every visited component, level by level within each
    /// subtree, without duplicates. The first error aborts the pass.
    pub async fn prefetch(&self, scope: PrefetchScope<'_>) -> Result<Vec<String>, RenderError> {
        let modules = prefetch_nodes(vec![self.root.clone()], scope).await?;

        let mut seen = HashSet::new();
        Ok(modules
            .into_iter()
            .filter(|m| seen.insert(m.clone()))
            .collect())
    }

    /// Markup pass. Children render first and the parent wraps them.
    pub fn render(&self, mut scope: RenderScope<'_>) -> Markup {
        let html = render_node(&self.root, &mut scope);
        Markup {
            html,
            head: scope.into_head(),
        }
    }
}

fn prefetch_nodes<'a>(
    nodes: Vec<Element>,
    scope: PrefetchScope<'a>,
) -> BoxFuture<'a, Result<Vec<String>, RenderError>> {
    async move {
        let mut modules: Vec<String> = nodes
            .iter()
            .filter_map(|node| node.module().map(str::to_string))
            .collect();

        let subtrees = try_join_all(nodes.into_iter().map(move |node| async move {
            if let Err(e) = node.prefetch(&scope).await {
                tracing::warn!(component = node.name(), error = %e, "prefetch failed");
                return Err(e);
            }
            let children = node.children(&scope.view());
            prefetch_nodes(children, scope).await
        }))
        .await?;

        modules.extend(subtrees.into_iter().flatten());
        Ok(modules)
    }
    .boxed()
}

fn render_node(node: &Element, scope: &mut RenderScope<'_>) -> String {
    let children = node.children(&scope.view());

    let mut inner = String::new();
    scope.enter();
    for child in &children {
        inner.push_str(&render_node(child, scope));
    }
    scope.leave();

    node.render(scope, inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{RedirectSlot, TreeView};
    use crate::testing::{Fixture, Node};
    use std::sync::Arc;
    use std::time::Duration;

    // === Prefetch Tests ===

    #[tokio::test]
    async fn test_modules_recorded_level_by_level() {
        let tree = RenderTree::new(
            Node::new("app")
                .child(
                    Node::new("home")
                        .module("home")
                        .child(Node::new("widget").module("widget").build())
                        .build(),
                )
                .child(Node::new("footer").module("footer").build())
                .build(),
        );
        let fx = Fixture::new("/");
        let redirect = RedirectSlot::default();

        let modules = tree.prefetch(fx.prefetch_scope(&redirect)).await.unwrap();
        assert_eq!(modules, vec!["home", "footer", "widget"]);
    }

    #[tokio::test]
    async fn test_modules_deduplicated() {
        let tree = RenderTree::new(
            Node::new("app")
                .child(Node::new("a").module("shared").build())
                .child(Node::new("b").module("shared").build())
                .build(),
        );
        let fx = Fixture::new("/");
        let redirect = RedirectSlot::default();

        let modules = tree.prefetch(fx.prefetch_scope(&redirect)).await.unwrap();
        assert_eq!(modules, vec!["shared"]);
    }

    #[tokio::test]
    async fn test_siblings_prefetch_concurrently() {
        let barrier = Arc::new(tokio::sync::Barrier::new(2));
        let tree = RenderTree::new(
            Node::new("app")
                .child(Node::new("left").barrier(barrier.clone()).build())
                .child(Node::new("right").barrier(barrier).build())
                .build(),
        );
        let fx = Fixture::new("/");
        let redirect = RedirectSlot::default();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            tree.prefetch(fx.prefetch_scope(&redirect)),
        )
        .await;
        assert!(result.is_ok(), "siblings waited on each other sequentially");
    }

    #[tokio::test]
    async fn test_children_discovered_after_parent_data() {
        let tree = RenderTree::new(
            Node::new("page")
                .set_domain("page", serde_json::json!({"ready": true}))
                .child(Node::new("details").module("details").build())
                .children_require("page")
                .build(),
        );
        let fx = Fixture::new("/");
        let redirect = RedirectSlot::default();

        let modules = tree.prefetch(fx.prefetch_scope(&redirect)).await.unwrap();
        assert_eq!(modules, vec!["details"]);
    }

    #[tokio::test]
    async fn test_prefetch_error_aborts() {
        let tree = RenderTree::new(
            Node::new("app")
                .child(Node::new("broken").fail().build())
                .build(),
        );
        let fx = Fixture::new("/");
        let redirect = RedirectSlot::default();

        let err = tree
            .prefetch(fx.prefetch_scope(&redirect))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Component { ref component, .. } if component == "broken"));
    }

    // === Markup Tests ===

    #[tokio::test]
    async fn test_render_post_order() {
        let tree = RenderTree::new(
            Node::new("app")
                .tag("main")
                .child(Node::new("a").tag("p").text("one").build())
                .child(Node::new("b").tag("p").text("two").build())
                .build(),
        );
        let fx = Fixture::new("/");
        let redirect = RedirectSlot::default();

        let markup = tree.render(RenderScope::new(
            TreeView::new(&fx.ctx, &fx.store, &fx.client),
            &redirect,
        ));
        assert_eq!(markup.html, "<main><p>one</p><p>two</p></main>");
    }

    #[tokio::test]
    async fn test_render_deepest_title_wins() {
        let tree = RenderTree::new(
            Node::new("app")
                .title("App")
                .child(Node::new("about").title("About").build())
                .build(),
        );
        let fx = Fixture::new("/");
        let redirect = RedirectSlot::default();

        let markup = tree.render(RenderScope::new(
            TreeView::new(&fx.ctx, &fx.store, &fx.client),
            &redirect,
        ));
        assert_eq!(markup.head.title.as_deref(), Some("About"));
    }
}
