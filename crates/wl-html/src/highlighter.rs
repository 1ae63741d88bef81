//! Syntax highlighter contract.
//!
//! The converter never highlights code itself. A host injects an
//! implementation with [`Converter::with_highlighter`](crate::Converter::with_highlighter);
//! the converter hands it source listings and asks it for the page assets it
//! needs in the document head and footer.

use std::fmt::Write;

use wl_document::{Document, Node};

use crate::attrs::escape_html;

/// Options passed to [`SyntaxHighlighter::format`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// `<name>-css` document attribute (`class` when unset). Only set for
    /// highlighters that highlight while converting.
    pub css_mode: Option<String>,
    /// `<name>-style` document attribute. Only set for highlighters that
    /// highlight while converting.
    pub style: Option<String>,
    /// Disable line wrapping in the rendered block.
    pub nowrap: bool,
}

/// Context passed to the head and footer contributions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocinfoContext {
    /// CDN base URL, e.g. `https://cdnjs.cloudflare.com/ajax/libs`.
    pub cdn_base_url: String,
    /// Whether stylesheets are linked rather than embedded.
    pub linkcss: bool,
}

/// A syntax highlighter plugged into the converter.
pub trait SyntaxHighlighter {
    /// Name used for the `<name>-css` and `<name>-style` attributes.
    fn name(&self) -> &str;

    /// Whether the highlighter transforms source while converting, as opposed
    /// to shipping a client-side script.
    fn highlights(&self) -> bool {
        false
    }

    /// Class placed first on the `<pre>` element.
    fn pre_class(&self) -> &str {
        self.name()
    }

    /// Render a source listing.
    ///
    /// `content` is the listing body, already escaped (and with callout
    /// markup in place).
    fn format(
        &self,
        node: &Node,
        lang: Option<&str>,
        content: &str,
        opts: &FormatOptions,
    ) -> String {
        let _ = node;
        CodeTags::new(self.pre_class(), lang, opts.nowrap).wrap(content)
    }

    fn has_head_contribution(&self) -> bool {
        false
    }

    /// Markup for the document head, `None` to drop the reserved slot.
    fn head_contribution(&self, doc: &Document, ctx: &DocinfoContext) -> Option<String> {
        let _ = (doc, ctx);
        None
    }

    fn has_footer_contribution(&self) -> bool {
        false
    }

    /// Markup appended after the page footer.
    fn footer_contribution(&self, doc: &Document, ctx: &DocinfoContext) -> String {
        let _ = (doc, ctx);
        String::new()
    }
}

/// Attribute lists for the `<pre><code>` pair of a highlighted listing.
///
/// `data-lang` always ends up as the last `<code>` attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeTags {
    pub pre: Vec<(String, String)>,
    pub code: Vec<(String, String)>,
}

impl CodeTags {
    /// Base tags: `<pre class="PRE highlight [nowrap]"><code [data-lang="L"]>`.
    #[must_use]
    pub fn new(pre_class: &str, lang: Option<&str>, nowrap: bool) -> Self {
        let class = if nowrap {
            format!("{pre_class} highlight nowrap")
        } else {
            format!("{pre_class} highlight")
        };
        let mut tags = Self {
            pre: vec![("class".to_owned(), class)],
            code: Vec::new(),
        };
        if let Some(lang) = lang {
            tags.set_code("data-lang", lang);
        }
        tags
    }

    pub fn set_pre(&mut self, name: &str, value: impl Into<String>) {
        set(&mut self.pre, name, value.into());
    }

    pub fn set_code(&mut self, name: &str, value: impl Into<String>) {
        set(&mut self.code, name, value.into());
    }

    /// Wrap `content` in the `<pre><code>` pair.
    #[must_use]
    pub fn wrap(mut self, content: &str) -> String {
        if let Some(pos) = self.code.iter().position(|(k, _)| k == "data-lang") {
            let lang = self.code.remove(pos);
            self.code.push(lang);
        }
        let mut out = String::from("<pre");
        write_attrs(&mut out, &self.pre);
        out.push_str("><code");
        write_attrs(&mut out, &self.code);
        let _ = write!(out, ">{content}</code></pre>");
        out
    }
}

fn set(attrs: &mut Vec<(String, String)>, name: &str, value: String) {
    if let Some(slot) = attrs.iter_mut().find(|(k, _)| k == name) {
        slot.1 = value;
    } else {
        attrs.push((name.to_owned(), value));
    }
}

fn write_attrs(out: &mut String, attrs: &[(String, String)]) {
    for (name, value) in attrs {
        let _ = write!(out, r#" {name}="{}""#, escape_html(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wl_document::NodeKind;

    struct Plain;

    impl SyntaxHighlighter for Plain {
        fn name(&self) -> &str {
            "plain"
        }
    }

    #[test]
    fn test_default_format() {
        let node = Node::new(NodeKind::Listing);
        let opts = FormatOptions {
            nowrap: true,
            ..FormatOptions::default()
        };
        assert_eq!(
            Plain.format(&node, Some("rust"), "fn main() {}", &opts),
            r#"<pre class="plain highlight nowrap"><code data-lang="rust">fn main() {}</code></pre>"#
        );
    }

    #[test]
    fn test_default_format_without_lang() {
        let node = Node::new(NodeKind::Listing);
        assert_eq!(
            Plain.format(&node, None, "x", &FormatOptions::default()),
            r#"<pre class="plain highlight"><code>x</code></pre>"#
        );
    }

    #[test]
    fn test_data_lang_moves_last() {
        let mut tags = CodeTags::new("hl", Some("c"), false);
        tags.set_code("class", "language-c");
        tags.set_pre("data-id", "main");
        assert_eq!(
            tags.wrap("int x;"),
            r#"<pre class="hl highlight" data-id="main"><code class="language-c" data-lang="c">int x;</code></pre>"#
        );
    }

    #[test]
    fn test_no_contributions_by_default() {
        let ctx = DocinfoContext {
            cdn_base_url: "https://cdn".to_owned(),
            linkcss: false,
        };
        let doc = Document::new();
        assert!(!Plain.has_head_contribution());
        assert_eq!(Plain.head_contribution(&doc, &ctx), None);
        assert_eq!(Plain.footer_contribution(&doc, &ctx), "");
    }
}
