//! Page head metadata collected while rendering.

use crate::escape::{escape_attr, escape_text, is_attribute_name};

/// A `<meta>` tag keyed by `name` or `property`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    key_attribute: &'static str,
    key: String,
    content: String,
}

impl MetaTag {
    /// `<meta name=".." content="..">`
    pub fn name(key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key_attribute: "name",
            key: key.into(),
            content: content.into(),
        }
    }

    /// `<meta property=".." content="..">`, used by Open Graph.
    pub fn property(key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key_attribute: "property",
            key: key.into(),
            content: content.into(),
        }
    }

    /// Identifying key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Render to HTML.
    pub fn render(&self) -> String {
        format!(
            r#"<meta {}="{}" content="{}">"#,
            self.key_attribute,
            escape_attr(&self.key),
            escape_attr(&self.content)
        )
    }
}

/// A `<link>` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTag {
    rel: String,
    href: String,
    attributes: Vec<(String, String)>,
}

impl LinkTag {
    /// Link with a relation and target.
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            attributes: Vec::new(),
        }
    }

    /// Canonical URL link.
    pub fn canonical(href: impl Into<String>) -> Self {
        Self::new("canonical", href)
    }

    /// Stylesheet link.
    pub fn stylesheet(href: impl Into<String>) -> Self {
        Self::new("stylesheet", href)
    }

    /// Add an extra attribute. Names that are not valid attribute names are dropped.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if is_attribute_name(&name) {
            self.attributes.push((name, value.into()));
        } else {
            tracing::warn!(attribute = %name, "dropping invalid link attribute");
        }
        self
    }

    /// Render to HTML.
    pub fn render(&self) -> String {
        let mut html = format!(
            r#"<link rel="{}" href="{}""#,
            escape_attr(&self.rel),
            escape_attr(&self.href)
        );
        for (name, value) in self.attributes.iter().filter(|(n, _)| is_attribute_name(n)) {
            html.push_str(&format!(r#" {}="{}""#, name, escape_attr(value)));
        }
        html.push('>');
        html
    }
}

/// Head metadata set by components during the markup pass.
///
/// Later writes win: setting the title twice keeps the second one, and a
/// meta tag with an existing key replaces it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageHead {
    /// Attributes for the `<html>` element.
    pub html_attributes: Vec<(String, String)>,
    /// Page title.
    pub title: Option<String>,
    /// Meta tags.
    pub meta: Vec<MetaTag>,
    /// Link tags.
    pub links: Vec<LinkTag>,
}

impl PageHead {
    /// Create empty head metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Add or replace a meta tag.
    pub fn add_meta(&mut self, tag: MetaTag) {
        match self.meta.iter_mut().find(|m| m.key == tag.key) {
            Some(existing) => *existing = tag,
            None => self.meta.push(tag),
        }
    }

    /// Add a link tag.
    pub fn add_link(&mut self, link: LinkTag) {
        self.links.push(link);
    }

    /// Set an attribute on `<html>`. Names that are not valid attribute names are ignored.
    pub fn set_html_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if !is_attribute_name(&name) {
            tracing::warn!(attribute = %name, "ignoring invalid html attribute");
            return;
        }
        let value = value.into();
        match self.html_attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => self.html_attributes.push((name, value)),
        }
    }

    /// Whether nothing was set.
    pub fn is_empty(&self) -> bool {
        self.html_attributes.is_empty()
            && self.title.is_none()
            && self.meta.is_empty()
            && self.links.is_empty()
    }

    /// `<title>` element, if a title was set.
    pub fn title_tag(&self) -> Option<String> {
        self.title
            .as_ref()
            .map(|t| format!("<title>{}</title>", escape_text(t)))
    }

    /// Meta tags followed by link tags.
    pub fn tags(&self) -> String {
        let mut html = String::new();
        for meta in &self.meta {
            html.push_str(&meta.render());
        }
        for link in &self.links {
            html.push_str(&link.render());
        }
        html
    }

    /// Title, meta and link tags.
    pub fn render(&self) -> String {
        let mut html = self.title_tag().unwrap_or_default();
        html.push_str(&self.tags());
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let head = PageHead::new();
        assert!(head.is_empty());
        assert_eq!(head.render(), "");
        assert!(head.html_attributes.is_empty());
    }

    #[test]
    fn test_title_escaped() {
        let mut head = PageHead::new();
        head.set_title("Tom & Jerry <3");
        assert_eq!(
            head.title_tag().unwrap(),
            "<title>Tom &amp; Jerry &lt;3</title>"
        );
    }

    #[test]
    fn test_later_title_wins() {
        let mut head = PageHead::new();
        head.set_title("App");
        head.set_title("About");
        assert_eq!(head.title.as_deref(), Some("About"));
    }

    #[test]
    fn test_meta_replaced_by_key() {
        let mut head = PageHead::new();
        head.add_meta(MetaTag::name("description", "one"));
        head.add_meta(MetaTag::property("og:title", "T"));
        head.add_meta(MetaTag::name("description", "two"));

        assert_eq!(
            head.tags(),
            r#"<meta name="description" content="two"><meta property="og:title" content="T">"#
        );
    }

    #[test]
    fn test_links_rendered_after_meta() {
        let mut head = PageHead::new();
        head.add_link(LinkTag::canonical("https://example.com/about"));
        head.add_meta(MetaTag::name("robots", "index"));

        assert_eq!(
            head.tags(),
            r#"<meta name="robots" content="index"><link rel="canonical" href="https://example.com/about">"#
        );
    }

    #[test]
    fn test_link_attributes() {
        let link = LinkTag::new("icon", "/favicon.png").with_attribute("sizes", "32x32");
        assert_eq!(
            link.render(),
            r#"<link rel="icon" href="/favicon.png" sizes="32x32">"#
        );
    }

    #[test]
    fn test_html_attributes() {
        let mut head = PageHead::new();
        head.set_html_attribute("lang", "en");
        head.set_html_attribute("dir", "ltr");
        head.set_html_attribute("lang", "it");

        assert_eq!(
            head.html_attributes,
            vec![
                ("lang".to_string(), "it".to_string()),
                ("dir".to_string(), "ltr".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_link_attribute_dropped() {
        let link = LinkTag::new("icon", "/favicon.png")
            .with_attribute(r#"x"><script>alert(1)</script><b a"#, "1")
            .with_attribute("sizes", "16x16");
        assert_eq!(
            link.render(),
            r#"<link rel="icon" href="/favicon.png" sizes="16x16">"#
        );
    }

    #[test]
    fn test_invalid_html_attribute_ignored() {
        let mut head = PageHead::new();
        head.set_html_attribute("lang onload", "x");
        assert!(head.is_empty());
    }
}
