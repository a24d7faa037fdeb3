//! Request cookie parsing.

use std::collections::HashMap;

/// Cookies sent with a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookies {
    values: HashMap<String, String>,
}

impl Cookies {
    /// Parse a `Cookie` header value (`a=1; b=2`).
    ///
    /// Pairs without `=` are ignored. Surrounding double quotes are stripped
    /// from values, then `%XX` escapes are decoded; a value that does not
    /// decode to UTF-8 is kept as sent. When a name repeats, the first
    /// occurrence wins.
    pub fn parse(header: &str) -> Self {
        let mut values = HashMap::new();

        for pair in header.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);

            values
                .entry(name.to_string())
                .or_insert_with(|| percent_decode(value).unwrap_or_else(|| value.to_string()));
        }

        Self { values }
    }

    /// Get a cookie value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|s| s.as_str())
    }

    /// Check whether a cookie is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of cookies.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no cookies were sent.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Decode `%XX` escapes. `None` on a malformed escape or non-UTF-8 result.
fn percent_decode(value: &str) -> Option<String> {
    if !value.contains('%') {
        return Some(value.to_string());
    }

    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = std::str::from_utf8(bytes.get(i + 1..i + 3)?).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
