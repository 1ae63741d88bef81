//! HTML attribute and class-list assembly.
//!
//! Every helper returns a fragment with a leading space (` id="x"`) or an
//! empty string, so callers can splice results straight into an open tag.

use std::fmt::Write;

use wl_document::Node;

/// Escape a value for an attribute position.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape character data (`&`, `<`, `>`).
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// ` id="…"` for a present id.
#[must_use]
pub fn id_attr(id: Option<&str>) -> String {
    id.map_or_else(String::new, |id| format!(r#" id="{}""#, escape_html(id)))
}

/// ` name="…"` when a value is present.
#[must_use]
pub fn opt_attr(name: &str, value: Option<&str>) -> String {
    value.map_or_else(String::new, |v| format!(r#" {name}="{}""#, escape_html(v)))
}

/// Ordered class tokens; empty tokens are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// List starting with an element's fixed base class.
    #[must_use]
    pub fn base(base: &str) -> Self {
        let mut list = Self::new();
        list.push(base);
        list
    }

    pub fn push(&mut self, token: impl AsRef<str>) {
        let token = token.as_ref();
        if !token.is_empty() {
            self.tokens.push(token.to_owned());
        }
    }

    pub fn push_opt(&mut self, token: Option<impl AsRef<str>>) {
        if let Some(token) = token {
            self.push(token);
        }
    }

    #[must_use]
    pub fn with(mut self, token: Option<impl AsRef<str>>) -> Self {
        self.push_opt(token);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens joined by single spaces.
    #[must_use]
    pub fn joined(&self) -> String {
        self.tokens.join(" ")
    }

    /// ` class="…"`, or nothing when there are no tokens.
    #[must_use]
    pub fn attr(&self) -> String {
        if self.tokens.is_empty() {
            String::new()
        } else {
            format!(r#" class="{}""#, escape_html(&self.joined()))
        }
    }
}

/// ` class="role"` for nodes whose only class is their role.
#[must_use]
pub fn role_attr(node: &Node) -> String {
    ClassList::new().with(node.role()).attr()
}

/// `target`/`rel` attributes for a link node.
///
/// `nofollow` comes from the option of that name. `noopener` is added when
/// a `window` is set and it is `_blank` or the `noopener` option is present.
#[must_use]
pub fn link_constraint_attrs(node: &Node) -> String {
    let mut out = String::new();
    let mut rel = Vec::new();
    if node.has_option("nofollow") {
        rel.push("nofollow");
    }
    if let Some(window) = node.attr("window") {
        let _ = write!(out, r#" target="{}""#, escape_html(window));
        if window == "_blank" || node.has_option("noopener") {
            rel.push("noopener");
        }
    }
    if !rel.is_empty() {
        let _ = write!(out, r#" rel="{}""#, rel.join(" "));
    }
    out
}
