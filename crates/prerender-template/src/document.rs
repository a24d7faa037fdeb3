//! The build's `index.html` as a structured template.

use std::path::Path;

use serde::Serialize;

use crate::error::TemplateError;
use crate::escape::{escape_attr, is_attribute_name, serialize_state};
use crate::head::PageHead;

/// Empty root container the client mounts into.
pub const ROOT_CONTAINER: &str = r#"<div id="root"></div>"#;

/// Global the client store reads its initial state from.
pub const PRELOADED_STATE_GLOBAL: &str = "window.__PRELOADED_STATE__";

/// Global the client data cache is restored from.
pub const DATA_GLOBAL: &str = "window.__DATA__";

/// Values inserted into a `DocumentTemplate`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSlots {
    /// `<html>` attributes. Each replaces a template attribute with the same
    /// name; the rest are appended.
    pub html_attributes: Vec<(String, String)>,
    /// Replacement `<title>` element. The template's own title is kept when unset.
    pub title: Option<String>,
    /// Tags appended to the end of `<head>`.
    pub meta: String,
    /// Markup placed inside the root container.
    pub body: String,
    /// Serialized state, see `serialize_state`.
    pub state: Option<String>,
    /// Serialized data cache.
    pub data: Option<String>,
    /// Script tags placed before `</body>`.
    pub scripts: Vec<String>,
}

impl DocumentSlots {
    /// Create empty slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the head slots from collected metadata.
    pub fn with_head(mut self, head: &PageHead) -> Self {
        self.html_attributes = head.html_attributes.clone();
        self.title = head.title_tag();
        self.meta.push_str(&head.tags());
        self
    }

    /// Append a raw tag to the head.
    pub fn with_meta_tag(mut self, tag: &str) -> Self {
        self.meta.push_str(tag);
        self
    }

    /// Set the root container markup.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Serialize and embed state.
    pub fn with_state<T: Serialize + ?Sized>(mut self, state: &T) -> Result<Self, TemplateError> {
        self.state = Some(serialize_state(state)?);
        Ok(self)
    }

    /// Serialize and embed the data cache.
    pub fn with_data<T: Serialize + ?Sized>(mut self, data: &T) -> Result<Self, TemplateError> {
        self.data = Some(serialize_state(data)?);
        Ok(self)
    }

    /// Set the trailing scripts.
    pub fn with_scripts(mut self, scripts: Vec<String>) -> Self {
        self.scripts = scripts;
        self
    }
}

/// A parsed HTML document with fixed insertion points.
///
/// Parsing splits the document once; rendering concatenates the segments
/// with the slot values, so slot contents never affect where other slots go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTemplate {
    prologue: String,
    html_attributes: String,
    html_attribute_list: Vec<(String, String)>,
    head_before_title: String,
    title: Option<String>,
    head_after_title: String,
    body_before_root: String,
    body_after_root: String,
    epilogue: String,
}

/// Find `tag` (lowercase, without `>`) as an element start at or after `from`.
fn find_tag(lower: &str, tag: &str, from: usize) -> Option<usize> {
    let mut offset = from;
    while let Some(found) = lower.get(offset..)?.find(tag) {
        let start = offset + found;
        let next = lower.as_bytes().get(start + tag.len()).copied();
        match next {
            Some(b'>') | Some(b'/') => return Some(start),
            Some(b) if b.is_ascii_whitespace() => return Some(start),
            _ => offset = start + tag.len(),
        }
    }
    None
}

fn find_from(lower: &str, needle: &str, from: usize) -> Option<usize> {
    lower.get(from..)?.find(needle).map(|i| from + i)
}

/// Split the inside of a start tag into `(lowercase name, raw text)` pairs.
fn split_attributes(attrs: &str) -> Vec<(String, String)> {
    let bytes = attrs.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() || bytes[i] == b'/' {
            i += 1;
            continue;
        }

        let start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'='
            && bytes[i] != b'/'
        {
            i += 1;
        }
        let name = attrs[start..i].to_ascii_lowercase();

        let mut j = i;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if bytes.get(j) == Some(&b'=') {
            j += 1;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            match bytes.get(j) {
                Some(&quote) if quote == b'"' || quote == b'\'' => {
                    j += 1;
                    while j < bytes.len() && bytes[j] != quote {
                        j += 1;
                    }
                    j = (j + 1).min(bytes.len());
                }
                _ => {
                    while j < bytes.len() && !bytes[j].is_ascii_whitespace() {
                        j += 1;
                    }
                }
            }
            i = j;
        }

        if !name.is_empty() {
            out.push((name, attrs[start..i].to_string()));
        }
    }
    out
}

impl DocumentTemplate {
    /// Parse a document.
    ///
    /// Requires an `<html>` element, a `<head>` closed by `</head>`, a
    /// `<body>` closed by `</body>` and the empty root container inside
    /// the body. Tag names match case-insensitively.
    pub fn parse(html: &str) -> Result<Self, TemplateError> {
        let lower = html.to_ascii_lowercase();

        let html_start = find_tag(&lower, "<html", 0).ok_or(TemplateError::Malformed("<html>"))?;
        let html_end = find_from(&lower, ">", html_start).ok_or(TemplateError::Malformed("<html>"))?;
        let head_start = find_tag(&lower, "<head", html_end).ok_or(TemplateError::Malformed("<head>"))?;
        let head_close =
            find_from(&lower, "</head>", head_start).ok_or(TemplateError::Malformed("</head>"))?;

        let head = html_end + 1..head_close;
        let title_span = find_tag(&lower, "<title", head.start)
            .filter(|&start| start < head.end)
            .and_then(|start| {
                find_from(&lower, "</title>", start)
                    .map(|close| (start, close + "</title>".len()))
                    .filter(|&(_, end)| end <= head.end)
            });

        let (head_before_title, title, head_after_title) = match title_span {
            Some((start, end)) => (
                html[head.start..start].to_string(),
                Some(html[start..end].to_string()),
                html[end..head.end].to_string(),
            ),
            None => (html[head.clone()].to_string(), None, String::new()),
        };

        let body_start =
            find_tag(&lower, "<body", head_close).ok_or(TemplateError::Malformed("<body>"))?;
        let root_start = find_from(&lower, ROOT_CONTAINER, body_start)
            .ok_or(TemplateError::Malformed("root container"))?;
        let root_end = root_start + ROOT_CONTAINER.len();
        let body_close = lower
            .rfind("</body>")
            .filter(|&close| close >= root_end)
            .ok_or(TemplateError::Malformed("</body>"))?;

        let html_attributes = html[html_start + "<html".len()..html_end]
            .trim()
            .to_string();

        Ok(Self {
            prologue: html[..html_start].to_string(),
            html_attribute_list: split_attributes(&html_attributes),
            html_attributes,
            head_before_title,
            title,
            head_after_title,
            body_before_root: html[head_close..root_start].to_string(),
            body_after_root: html[root_end..body_close].to_string(),
            epilogue: html[body_close..].to_string(),
        })
    }

    /// Read and parse a template file.
    pub async fn load(path: &Path) -> Result<Self, TemplateError> {
        let html = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| TemplateError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::trace!(path = %path.display(), bytes = html.len(), "template read");
        Self::parse(&html)
    }

    /// The template's own `<title>` element.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Attributes already present on `<html>`.
    pub fn html_attributes(&self) -> &str {
        &self.html_attributes
    }

    /// `<html>` attributes with `overrides` applied by name.
    ///
    /// Without overrides the template's attributes are kept verbatim.
    fn merged_html_attributes(&self, overrides: &[(String, String)]) -> String {
        let overrides: Vec<&(String, String)> = overrides
            .iter()
            .filter(|(name, _)| is_attribute_name(name))
            .collect();
        if overrides.is_empty() {
            return self.html_attributes.clone();
        }

        let format_attr =
            |(name, value): &(String, String)| format!(r#"{}="{}""#, name, escape_attr(value));
        let mut used = vec![false; overrides.len()];
        let mut parts = Vec::new();

        for (name, raw) in &self.html_attribute_list {
            match overrides.iter().position(|(n, _)| n.eq_ignore_ascii_case(name)) {
                Some(i) if !used[i] => {
                    parts.push(format_attr(overrides[i]));
                    used[i] = true;
                }
                Some(_) => {}
                None => parts.push(raw.clone()),
            }
        }
        for (attr, _) in overrides.iter().zip(&used).filter(|(_, used)| !**used) {
            parts.push(format_attr(*attr));
        }

        parts.join(" ")
    }

    /// Produce the final document.
    pub fn render(&self, slots: &DocumentSlots) -> String {
        let mut out = String::with_capacity(
            self.prologue.len()
                + self.head_before_title.len()
                + self.body_before_root.len()
                + self.body_after_root.len()
                + slots.body.len()
                + slots.state.as_ref().map_or(0, String::len)
                + slots.data.as_ref().map_or(0, String::len)
                + 256,
        );

        out.push_str(&self.prologue);
        out.push_str("<html");
        let attrs = self.merged_html_attributes(&slots.html_attributes);
        if !attrs.is_empty() {
            out.push(' ');
            out.push_str(&attrs);
        }
        out.push('>');

        out.push_str(&self.head_before_title);
        if let Some(title) = slots.title.as_ref().or(self.title.as_ref()) {
            out.push_str(title);
        }
        out.push_str(&self.head_after_title);
        out.push_str(&slots.meta);

        out.push_str(&self.body_before_root);
        out.push_str(r#"<div id="root">"#);
        out.push_str(&slots.body);
        out.push_str("</div>");
        if let Some(state) = &slots.state {
            out.push_str(&format!("<script>{PRELOADED_STATE_GLOBAL} = {state}</script>"));
        }
        if let Some(data) = &slots.data {
            out.push_str(&format!("<script>{DATA_GLOBAL} = {data}</script>"));
        }
        out.push_str(&self.body_after_root);

        for script in &slots.scripts {
            out.push_str(script);
        }
        out.push_str(&self.epilogue);

        out
    }
}
