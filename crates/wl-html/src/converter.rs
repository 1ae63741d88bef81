//! Converter entry point and per-render state.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use wl_document::{Document, Node};

use crate::attrs::escape_html;
use crate::highlighter::SyntaxHighlighter;
use crate::options::ConverterOptions;
use crate::xref::XrefGuard;

static SVG_PREAMBLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<svg[\s>]").unwrap());
static SVG_START_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<svg(?:\s[^>]*)?>").unwrap());
static DIMENSION_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s(?:width|height|style)=(?:"[^"]*"|'[^']*')"#).unwrap()
});

/// Result of converting a document or node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Recovered problems (unknown inline types, unreadable files, misplaced blocks).
    pub warnings: Vec<String>,
}

/// Converts prepared [`Document`]s to HTML.
///
/// A converter holds only configuration; every call gets fresh render state,
/// so one converter can serve many documents.
///
/// # Example
///
/// ```
/// use wl_document::{Document, Node};
/// use wl_html::{Converter, ConverterOptions};
///
/// let doc = Document::new()
///     .with_block(Node::paragraph("hello").with_id("p1").with_role("note"))
///     .prepared();
/// let converter = Converter::new(ConverterOptions::default().with_standalone(false));
/// assert_eq!(converter.convert(&doc).html, r#"<p id="p1" class="note">hello</p>"#);
/// ```
pub struct Converter {
    options: ConverterOptions,
    highlighter: Option<Box<dyn SyntaxHighlighter>>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConverterOptions::default())
    }
}

impl Converter {
    #[must_use]
    pub fn new(options: ConverterOptions) -> Self {
        Self {
            options,
            highlighter: None,
        }
    }

    /// Use `highlighter` for `source` listings and page assets.
    #[must_use]
    pub fn with_highlighter(mut self, highlighter: impl SyntaxHighlighter + 'static) -> Self {
        self.highlighter = Some(Box::new(highlighter));
        self
    }

    #[must_use]
    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    #[must_use]
    pub fn highlighter(&self) -> Option<&dyn SyntaxHighlighter> {
        self.highlighter.as_deref()
    }

    /// Run [`Document::prepare`] with this converter's global attributes as
    /// defaults, so numbering follows the same lookup chain as rendering.
    pub fn prepare(&self, doc: &mut Document) {
        doc.prepare_with_defaults(&self.options.attributes);
    }

    /// Convert a document as a full page or an embeddable fragment,
    /// depending on [`ConverterOptions::standalone`].
    #[must_use]
    pub fn convert(&self, doc: &Document) -> RenderResult {
        if self.options.standalone {
            self.convert_standalone(doc)
        } else {
            self.convert_embedded(doc)
        }
    }

    /// Convert a document to a full HTML page.
    #[must_use]
    pub fn convert_standalone(&self, doc: &Document) -> RenderResult {
        let mut render = self.render(doc);
        let html = render.standalone();
        render.finish(html)
    }

    /// Convert a document to its body content only.
    #[must_use]
    pub fn convert_embedded(&self, doc: &Document) -> RenderResult {
        let mut render = self.render(doc);
        let html = render.embedded();
        render.finish(html)
    }

    /// Display text for a cross-reference to `refid`.
    ///
    /// `explicit_text` wins when given. Unknown ids yield `[refid]`; an empty
    /// id refers to the document itself.
    #[must_use]
    pub fn resolve_reference(
        &self,
        doc: &Document,
        refid: &str,
        explicit_text: Option<&str>,
    ) -> String {
        if let Some(text) = explicit_text {
            return text.to_owned();
        }
        let mut render = self.render(doc);
        render.xref_text(None, refid, XrefGuard::Idle)
    }

    pub(crate) fn render<'a>(&'a self, doc: &'a Document) -> Render<'a> {
        Render {
            doc,
            options: &self.options,
            highlighter: self.highlighter.as_deref(),
            warnings: Vec::new(),
        }
    }
}

/// State of a single top-level render call.
pub(crate) struct Render<'a> {
    pub(crate) doc: &'a Document,
    pub(crate) options: &'a ConverterOptions,
    pub(crate) highlighter: Option<&'a dyn SyntaxHighlighter>,
    warnings: Vec<String>,
}

impl<'a> Render<'a> {
    pub(crate) fn finish(self, html: String) -> RenderResult {
        RenderResult {
            html,
            warnings: self.warnings,
        }
    }

    /// Record a recovered problem. Callers log it with `tracing` themselves
    /// so the event carries structured fields.
    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Document attribute, falling back to the configured global default.
    pub(crate) fn doc_attr(&self, name: &str) -> Option<&'a str> {
        self.doc
            .attr(name)
            .or_else(|| self.options.attributes.get(name).map(String::as_str))
    }

    pub(crate) fn has_doc_attr(&self, name: &str) -> bool {
        self.doc_attr(name).is_some()
    }

    pub(crate) fn doc_attr_is(&self, name: &str, expected: &str) -> bool {
        self.doc_attr(name) == Some(expected)
    }

    /// Node attribute, then the document attribute named `fallback`, then
    /// the global default of that name.
    pub(crate) fn node_attr<'n>(
        &self,
        node: &'n Node,
        name: &str,
        fallback: Option<&str>,
    ) -> Option<&'n str>
    where
        'a: 'n,
    {
        node.attr(name)
            .or_else(|| fallback.and_then(|f| self.doc_attr(f)))
    }

    pub(crate) fn icons_enabled(&self) -> bool {
        self.has_doc_attr("icons")
    }

    pub(crate) fn font_icons(&self) -> bool {
        self.doc_attr_is("icons", "font")
    }

    /// `asset-uri-scheme` with its colon, empty when the scheme is blank.
    pub(crate) fn asset_uri_scheme(&self) -> String {
        match self.doc_attr("asset-uri-scheme").unwrap_or("https") {
            "" => String::new(),
            scheme => format!("{scheme}:"),
        }
    }

    pub(crate) fn cdn_base_url(&self) -> String {
        format!("{}//cdnjs.cloudflare.com/ajax/libs", self.asset_uri_scheme())
    }

    /// Image reference relative to `imagesdir`.
    pub(crate) fn image_uri(&self, target: &str) -> String {
        join_asset(self.doc_attr("imagesdir"), target)
    }

    /// Audio/video reference, resolved like images.
    pub(crate) fn media_uri(&self, target: &str) -> String {
        self.image_uri(target)
    }

    /// Icon image reference for `name`, honouring a node-level `icon` attribute.
    pub(crate) fn icon_uri(&self, node: Option<&Node>, name: &str) -> String {
        let icontype = self.doc_attr("icontype").unwrap_or("png");
        let icon = match node.and_then(|n| n.attr("icon")) {
            Some(icon) if Path::new(icon).extension().is_some() => icon.to_owned(),
            Some(icon) => format!("{icon}.{icontype}"),
            None => format!("{name}.{icontype}"),
        };
        let iconsdir = self.doc_attr("iconsdir").map_or_else(
            || match self.doc_attr("imagesdir") {
                Some(dir) if !dir.is_empty() => format!("{}/icons", dir.trim_end_matches('/')),
                _ => "./images/icons".to_owned(),
            },
            str::to_owned,
        );
        join_asset(Some(&iconsdir), &icon)
    }

    /// Read an SVG file for inline embedding.
    ///
    /// Everything before the root `<svg` element is dropped. When the node
    /// sets `width` or `height`, the root element's dimension and style
    /// attributes are replaced by them. Returns `None` (after recording a
    /// warning) when the file cannot be read or is empty.
    pub(crate) fn read_svg(&mut self, node: &Node, target: &str) -> Option<String> {
        if is_uri(target) {
            tracing::warn!(target = %target, "Cannot embed remote SVG");
            self.warn(format!("cannot embed remote SVG: {target}"));
            return None;
        }
        let path = match self.doc_attr("imagesdir") {
            Some(dir) if !dir.is_empty() && !is_uri(dir) => {
                self.options.base_dir.join(dir).join(target)
            }
            _ => self.options.base_dir.join(target),
        };
        let svg = match std::fs::read_to_string(&path) {
            Ok(svg) => svg,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read SVG");
                self.warn(format!("SVG {} could not be read: {e}", path.display()));
                return None;
            }
        };
        if svg.is_empty() {
            tracing::warn!(path = %path.display(), "SVG is empty");
            self.warn(format!("SVG {} is empty", path.display()));
            return None;
        }
        Some(rewrite_svg(&svg, node.attr("width"), node.attr("height")))
    }

    /// Read a stylesheet below the base directory.
    pub(crate) fn read_stylesheet(&mut self, path: &str) -> String {
        let full = self.options.base_dir.join(path);
        match std::fs::read_to_string(&full) {
            Ok(css) => css,
            Err(e) => {
                tracing::warn!(path = %full.display(), error = %e, "Failed to read stylesheet");
                self.warn(format!("stylesheet {} could not be read: {e}", full.display()));
                String::new()
            }
        }
    }
}

/// Drop the SVG preamble and apply explicit dimensions to the root element.
pub(crate) fn rewrite_svg(svg: &str, width: Option<&str>, height: Option<&str>) -> String {
    let svg = if svg.starts_with("<svg") {
        svg
    } else {
        SVG_PREAMBLE.find(svg).map_or(svg, |m| &svg[m.start()..])
    };
    if width.is_none() && height.is_none() {
        return svg.to_owned();
    }
    let Some(start_tag) = SVG_START_TAG.find(svg) else {
        return svg.to_owned();
    };
    let old = start_tag.as_str();
    let mut new_tag = DIMENSION_ATTRIBUTE.replace_all(old, "").into_owned();
    for (name, value) in [("width", width), ("height", height)] {
        if let Some(value) = value {
            new_tag.pop();
            new_tag = format!(r#"{new_tag} {name}="{}">"#, escape_html(value));
        }
    }
    format!("{new_tag}{}", &svg[old.len()..])
}

/// Whether `target` carries a URI scheme (`https://`, `data:`).
pub(crate) fn is_uri(target: &str) -> bool {
    if target.starts_with("data:") {
        return true;
    }
    target.find("://").is_some_and(|i| {
        i > 0
            && target[..i]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
    })
}

/// Join `target` onto an asset directory unless it is already absolute.
pub(crate) fn join_asset(dir: Option<&str>, target: &str) -> String {
    match dir {
        Some(dir) if !dir.is_empty() && !is_uri(target) && !target.starts_with('/') => {
            format!("{}/{target}", dir.trim_end_matches('/'))
        }
        _ => target.to_owned(),
    }
}
