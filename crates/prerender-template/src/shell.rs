//! Code-generated document shell.

use serde::{Deserialize, Serialize};

use crate::document::{DATA_GLOBAL, PRELOADED_STATE_GLOBAL};
use crate::error::TemplateError;
use crate::escape::{escape_attr, serialize_state};

/// Global the shell footer exposes the server state under, alongside
/// `PRELOADED_STATE_GLOBAL`.
pub const SERVER_STATE_GLOBAL: &str = "window.__SERVER_STATE__";

fn default_lang() -> String {
    "en".to_string()
}

fn default_head_tags() -> Vec<String> {
    vec![
        r##"<meta name="theme-color" content="#171A21">"##.to_string(),
        r#"<link rel="manifest" href="/manifest.json">"#.to_string(),
    ]
}

/// Static parts of the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// `lang` attribute of `<html>`.
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Tags emitted in every head after the charset and viewport metas
    /// (icons, manifest, social metas).
    #[serde(default = "default_head_tags")]
    pub head_tags: Vec<String>,

    /// Polyfill script loaded before the bundles.
    #[serde(default)]
    pub polyfill_src: Option<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            lang: default_lang(),
            head_tags: default_head_tags(),
            polyfill_src: None,
        }
    }
}

/// Deferred script tag.
pub fn deferred_script_tag(src: &str) -> String {
    format!(r#"<script defer="defer" src="{}"></script>"#, escape_attr(src))
}

/// Document header and footer generated without a template file.
///
/// The header ends inside the root container and the footer starts by
/// closing it, so `header + markup + footer` is a complete page.
#[derive(Debug, Clone)]
pub struct ShellTemplate {
    config: ShellConfig,
    entry_src: String,
}

impl ShellTemplate {
    /// Create a shell loading `entry_src` as the last script.
    pub fn new(config: ShellConfig, entry_src: impl Into<String>) -> Self {
        Self {
            config,
            entry_src: entry_src.into(),
        }
    }

    /// Entry bundle src.
    pub fn entry_src(&self) -> &str {
        &self.entry_src
    }

    /// Doctype through the opening root container, with `meta_tags` at
    /// the end of the head.
    pub fn header(&self, meta_tags: &str) -> String {
        let mut html = String::from("<!DOCTYPE html>\n");
        html.push_str(&format!(r#"<html lang="{}">"#, escape_attr(&self.config.lang)));
        html.push_str("\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\n");
        for tag in &self.config.head_tags {
            html.push_str(tag);
            html.push('\n');
        }
        html.push_str(meta_tags);
        html.push_str("\n</head>\n<body>\n<div id=\"root\">");
        html
    }

    /// Closing root container, state and data scripts, bundles, and the
    /// entry bundle.
    pub fn footer<S: AsRef<str>>(
        &self,
        state: &serde_json::Value,
        data: &serde_json::Value,
        bundles: &[S],
    ) -> Result<String, TemplateError> {
        let mut html = String::from("</div>\n");
        html.push_str(&format!(
            "<script>{SERVER_STATE_GLOBAL}={PRELOADED_STATE_GLOBAL}={}</script>\n",
            serialize_state(state)?
        ));
        html.push_str(&format!(
            "<script>{DATA_GLOBAL}={}</script>\n",
            serialize_state(data)?
        ));
        if let Some(polyfill) = &self.config.polyfill_src {
            html.push_str(&format!(
                r#"<script defer="defer" type="text/javascript" src="{}"></script>"#,
                escape_attr(polyfill)
            ));
            html.push('\n');
        }
        for bundle in bundles {
            html.push_str(&deferred_script_tag(bundle.as_ref()));
            html.push('\n');
        }
        html.push_str(&deferred_script_tag(&self.entry_src));
        html.push_str("\n</body>\n</html>\n");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shell() -> ShellTemplate {
        ShellTemplate::new(ShellConfig::default(), "/static/js/main.abc.js")
    }

    #[test]
    fn test_header_structure() {
        let header = shell().header(r#"<title>Home</title>"#);

        assert!(header.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(header.contains("<link rel=\"manifest\" href=\"/manifest.json\">"));
        assert!(header.contains("<title>Home</title>\n</head>"));
        assert!(header.ends_with("<div id=\"root\">"));
    }

    #[test]
    fn test_footer_scripts_in_order() {
        let footer = shell()
            .footer(&json!({"a": "<x>"}), &json!({}), &["/static/js/1.chunk.js"])
            .unwrap();

        assert!(footer.starts_with("</div>"));
        assert!(footer.contains(
            r#"<script>window.__SERVER_STATE__=window.__PRELOADED_STATE__={"a":"\u003cx>"}</script>"#
        ));
        assert!(footer.contains("<script>window.__DATA__={}</script>"));

        let chunk = footer.find("/static/js/1.chunk.js").unwrap();
        let entry = footer.find("/static/js/main.abc.js").unwrap();
        assert!(chunk < entry);
        assert!(footer.ends_with("</html>\n"));
    }

    #[test]
    fn test_footer_polyfill() {
        let config = ShellConfig {
            polyfill_src: Some("https://cdn.example.com/polyfill.min.js".to_string()),
            ..ShellConfig::default()
        };
        let footer = ShellTemplate::new(config, "/static/js/bundle.js")
            .footer::<&str>(&json!(null), &json!(null), &[])
            .unwrap();

        let polyfill = footer.find("polyfill.min.js").unwrap();
        let entry = footer.find("bundle.js").unwrap();
        assert!(polyfill < entry);
    }

    #[test]
    fn test_page_from_header_and_footer() {
        let shell = shell();
        let page = format!(
            "{}{}{}",
            shell.header(""),
            "<p>hi</p>",
            shell.footer::<&str>(&json!({}), &json!({}), &[]).unwrap()
        );
        assert!(page.contains("<div id=\"root\"><p>hi</p></div>"));
    }

    #[test]
    fn test_config_from_toml() {
        let config: ShellConfig = toml::from_str(
            r#"
            lang = "it"
            head_tags = []
            "#,
        )
        .unwrap();

        assert_eq!(config.lang, "it");
        assert!(config.head_tags.is_empty());
        assert!(config.polyfill_src.is_none());
    }
}
