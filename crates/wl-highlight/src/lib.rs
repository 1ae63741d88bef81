//! highlight.js adapter for the Waterlens HTML converter.
//!
//! [`HighlightJs`] does not touch the listing source. It tags `<code>` so the
//! highlight.js 10 runtime picks it up in the browser, and appends the theme
//! stylesheet and scripts after the page footer.
//!
//! highlight.js 11 dropped support for unescaped HTML inside code blocks,
//! which callout markers rely on, so the runtime is pinned to 10.7.3.
//!
//! # Example
//!
//! ```
//! use wl_highlight::HighlightJs;
//! use wl_html::{Converter, ConverterOptions};
//!
//! let converter = Converter::new(ConverterOptions::default()).with_highlighter(HighlightJs);
//! assert_eq!(converter.highlighter().map(|h| h.name()), Some("highlightjs"));
//! ```

use wl_document::{Document, Node};
use wl_html::{CodeTags, DocinfoContext, FormatOptions, SyntaxHighlighter, escape_html};

/// Pinned highlight.js release.
pub const HIGHLIGHT_JS_VERSION: &str = "10.7.3";

const DEFAULT_THEME: &str = "atom-one-light";

/// Client-side highlighting with highlight.js.
///
/// Document attributes:
/// - `highlightjsdir`: asset base URL, defaults to the CDN release
/// - `highlightjs-theme`: style sheet name, defaults to `atom-one-light`
/// - `highlightjs-languages`: comma-separated extra language modules
#[derive(Clone, Copy, Debug, Default)]
pub struct HighlightJs;

impl HighlightJs {
    fn base_url(doc: &Document, ctx: &DocinfoContext) -> String {
        doc.attr("highlightjsdir").map_or_else(
            || format!("{}/highlight.js/{HIGHLIGHT_JS_VERSION}", ctx.cdn_base_url),
            |dir| dir.trim_end_matches('/').to_owned(),
        )
    }
}

impl SyntaxHighlighter for HighlightJs {
    fn name(&self) -> &str {
        "highlightjs"
    }

    fn format(&self, node: &Node, lang: Option<&str>, content: &str, opts: &FormatOptions) -> String {
        let mut tags = CodeTags::new(self.pre_class(), lang, opts.nowrap);
        tags.set_code("class", format!("language-{} hljs", lang.unwrap_or("none")));
        tags.set_code("data-noescape", "true");
        if let Some(id) = node.attr("data-id") {
            tags.set_pre("data-id", id);
        }
        if node.has_option("trim") {
            tags.set_code("data-trim", "");
        }
        tags.wrap(content)
    }

    fn has_footer_contribution(&self) -> bool {
        true
    }

    fn footer_contribution(&self, doc: &Document, ctx: &DocinfoContext) -> String {
        let base_url = escape_html(&Self::base_url(doc, ctx));
        let theme = doc.attr("highlightjs-theme").unwrap_or(DEFAULT_THEME);
        let mut lines = vec![
            format!(
                r#"<link rel="stylesheet" href="{base_url}/styles/{}.min.css">"#,
                escape_html(theme)
            ),
            format!(r#"<script src="{base_url}/highlight.min.js"></script>"#),
        ];
        if let Some(languages) = doc.attr("highlightjs-languages") {
            let languages: Vec<&str> = languages
                .split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            tracing::debug!(?languages, "Adding highlight.js language modules");
            for lang in languages {
                lines.push(format!(
                    r#"<script src="{base_url}/languages/{}.min.js"></script>"#,
                    escape_html(lang)
                ));
            }
        }
        lines.push("<script>\nhljs.highlightAll();\n</script>".to_owned());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wl_document::NodeKind;

    fn ctx() -> DocinfoContext {
        DocinfoContext {
            cdn_base_url: "https://cdnjs.cloudflare.com/ajax/libs".to_owned(),
            linkcss: false,
        }
    }

    #[test]
    fn test_format_tags_code_for_runtime() {
        let node = Node::new(NodeKind::Listing).with_attr("data-id", "ex1");
        assert_eq!(
            HighlightJs.format(&node, Some("rust"), "fn main() {}", &FormatOptions::default()),
            r#"<pre class="highlightjs highlight" data-id="ex1"><code class="language-rust hljs" data-noescape="true" data-lang="rust">fn main() {}</code></pre>"#
        );
    }

    #[test]
    fn test_format_without_lang() {
        let node = Node::new(NodeKind::Listing).with_option("trim");
        let opts = FormatOptions {
            nowrap: true,
            ..FormatOptions::default()
        };
        assert_eq!(
            HighlightJs.format(&node, None, "x", &opts),
            r#"<pre class="highlightjs highlight nowrap"><code class="language-none hljs" data-noescape="true" data-trim="">x</code></pre>"#
        );
    }

    #[test]
    fn test_footer_from_cdn() {
        let doc = Document::new();
        assert!(!HighlightJs.has_head_contribution());
        assert!(HighlightJs.has_footer_contribution());
        assert_eq!(
            HighlightJs.footer_contribution(&doc, &ctx()),
            "<link rel=\"stylesheet\" href=\"https://cdnjs.cloudflare.com/ajax/libs/highlight.js/10.7.3/styles/atom-one-light.min.css\">\n<script src=\"https://cdnjs.cloudflare.com/ajax/libs/highlight.js/10.7.3/highlight.min.js\"></script>\n<script>\nhljs.highlightAll();\n</script>"
        );
    }

    #[test]
    fn test_footer_with_local_dir_theme_and_languages() {
        let doc = Document::new()
            .with_attr("highlightjsdir", "/js/hljs/")
            .with_attr("highlightjs-theme", "github")
            .with_attr("highlightjs-languages", "rust, haskell,,");
        assert_eq!(
            HighlightJs.footer_contribution(&doc, &ctx()),
            "<link rel=\"stylesheet\" href=\"/js/hljs/styles/github.min.css\">\n<script src=\"/js/hljs/highlight.min.js\"></script>\n<script src=\"/js/hljs/languages/rust.min.js\"></script>\n<script src=\"/js/hljs/languages/haskell.min.js\"></script>\n<script>\nhljs.highlightAll();\n</script>"
        );
    }
}
