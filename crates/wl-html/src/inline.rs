//! Inline node rendering.

use std::path::Path;

use wl_document::{AttrValue, FOOTNOTE_INDEX_ATTR, Node, NodeKind};

use crate::attrs::{ClassList, escape_html, escape_text, id_attr, link_constraint_attrs, opt_attr};
use crate::converter::Render;
use crate::xref::XrefGuard;

/// Open/close delimiters of a quoted span and whether they form an HTML tag.
fn quote_delimiters(node_type: &str) -> (&'static str, &'static str, bool) {
    match node_type {
        "monospaced" => ("<code>", "</code>", true),
        "emphasis" => ("<em>", "</em>", true),
        "strong" => ("<strong>", "</strong>", true),
        "double" => ("&#8220;", "&#8221;", false),
        "single" => ("&#8216;", "&#8217;", false),
        "mark" => ("<mark>", "</mark>", true),
        "superscript" => ("<sup>", "</sup>", true),
        "subscript" => ("<sub>", "</sub>", true),
        "asciimath" => (r"\$", r"\$", false),
        "latexmath" => (r"\(", r"\)", false),
        _ => ("", "", false),
    }
}

/// Alternate text of an image: the `alt` attribute, else the file name
/// without extension, with `-` and `_` read as spaces.
pub(crate) fn image_alt(node: &Node) -> String {
    if let Some(alt) = node.attr("alt") {
        return alt.to_owned();
    }
    let target = node.target.as_deref().unwrap_or_default();
    Path::new(target)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(target)
        .replace(['-', '_'], " ")
}

/// Whether an image target is an SVG.
pub(crate) fn is_svg(node: &Node, target: &str) -> bool {
    node.attributes.is("format", "svg") || target.contains(".svg")
}

impl Render<'_> {
    /// Render an inline sequence.
    pub(crate) fn render_inlines(&mut self, nodes: &[Node], guard: XrefGuard) -> String {
        let mut out = String::new();
        for node in nodes {
            out.push_str(&self.render_inline(node, guard));
        }
        out
    }

    pub(crate) fn render_inline(&mut self, node: &Node, guard: XrefGuard) -> String {
        self.render_inline_as(node.kind, node, guard)
    }

    /// Render `node` with the routine for `kind`.
    pub(crate) fn render_inline_as(&mut self, kind: NodeKind, node: &Node, guard: XrefGuard) -> String {
        match kind {
            NodeKind::Text => escape_text(node.source.as_deref().unwrap_or_default()),
            NodeKind::InlineQuoted => self.inline_quoted(node, guard),
            NodeKind::InlineAnchor => self.inline_anchor(node, guard),
            NodeKind::InlineBreak => format!("{}<br>", self.inline_content(node, guard)),
            NodeKind::InlineButton => {
                format!(r#"<b class="button">{}</b>"#, self.inline_content(node, guard))
            }
            NodeKind::InlineCallout => self.inline_callout(node),
            NodeKind::InlineFootnote => self.inline_footnote(node, guard),
            NodeKind::InlineImage => self.inline_image(node),
            NodeKind::InlineIndexterm => {
                if node.node_type.as_deref() == Some("visible") {
                    self.inline_content(node, guard)
                } else {
                    String::new()
                }
            }
            NodeKind::InlineKbd => inline_kbd(node),
            NodeKind::InlineMenu => self.inline_menu(node),
            NodeKind::Document
            | NodeKind::Section
            | NodeKind::Preamble
            | NodeKind::Paragraph
            | NodeKind::Admonition
            | NodeKind::Audio
            | NodeKind::Colist
            | NodeKind::Dlist
            | NodeKind::Example
            | NodeKind::FloatingTitle
            | NodeKind::Image
            | NodeKind::Listing
            | NodeKind::Literal
            | NodeKind::Stem
            | NodeKind::Olist
            | NodeKind::Open
            | NodeKind::PageBreak
            | NodeKind::Pass
            | NodeKind::Quote
            | NodeKind::Sidebar
            | NodeKind::Table
            | NodeKind::ThematicBreak
            | NodeKind::Ulist
            | NodeKind::Verse
            | NodeKind::Video
            | NodeKind::ListItem => {
                tracing::warn!(kind = %kind, "Block node in inline content, skipping");
                self.warn(format!("block node `{kind}` in inline content was skipped"));
                String::new()
            }
        }
    }

    /// Rendered `text` inlines, or the escaped `source` when there are none.
    pub(crate) fn inline_content(&mut self, node: &Node, guard: XrefGuard) -> String {
        match &node.text {
            Some(text) => self.render_inlines(text, guard),
            None => escape_text(node.source.as_deref().unwrap_or_default()),
        }
    }

    fn inline_quoted(&mut self, node: &Node, guard: XrefGuard) -> String {
        let (open, close, tag) = quote_delimiters(node.node_type.as_deref().unwrap_or_default());
        let text = self.inline_content(node, guard);
        let attrs = format!("{}{}", id_attr(node.id.as_deref()), ClassList::new().with(node.role()).attr());
        if attrs.is_empty() {
            format!("{open}{text}{close}")
        } else if tag {
            format!("{}{attrs}>{text}{close}", &open[..open.len() - 1])
        } else {
            format!("<span{attrs}>{open}{text}{close}</span>")
        }
    }

    fn inline_anchor(&mut self, node: &Node, guard: XrefGuard) -> String {
        let role_class = ClassList::new().with(node.role()).attr();
        match node.node_type.as_deref() {
            Some("xref") => {
                if let Some(path) = node.attr("path") {
                    let text = if node.has_text() {
                        self.inline_content(node, guard)
                    } else {
                        escape_text(path)
                    };
                    let href = node.target.as_deref().unwrap_or(path);
                    return format!(
                        r#"<a href="{}"{role_class}{}>{text}</a>"#,
                        escape_html(href),
                        link_constraint_attrs(node)
                    );
                }
                let refid = node
                    .attr("refid")
                    .or_else(|| node.target.as_deref().map(|t| t.trim_start_matches('#')))
                    .unwrap_or_default();
                let text = if node.has_text() {
                    self.inline_content(node, guard)
                } else {
                    self.xref_text(Some(node), refid, guard)
                };
                let href = node
                    .target
                    .clone()
                    .unwrap_or_else(|| format!("#{refid}"));
                format!(r#"<a href="{}"{role_class}>{text}</a>"#, escape_html(&href))
            }
            Some("ref") => format!("<a{}></a>", id_attr(node.id.as_deref())),
            Some("link") => {
                let target = node.target.as_deref().unwrap_or_default();
                let text = if node.has_text() {
                    self.inline_content(node, guard)
                } else {
                    escape_text(target)
                };
                format!(
                    r#"<a href="{}"{}{role_class}{}{}>{text}</a>"#,
                    escape_html(target),
                    id_attr(node.id.as_deref()),
                    opt_attr("title", node.attr("title")),
                    link_constraint_attrs(node)
                )
            }
            Some("bibref") => {
                let id = node.id.as_deref().unwrap_or_default();
                let label = node.attr("reftext").filter(|r| !r.is_empty()).unwrap_or(id);
                format!("<a{}></a>[{}]", id_attr(node.id.as_deref()), escape_text(label))
            }
            other => {
                let other = other.unwrap_or("none");
                tracing::warn!(anchor_type = %other, "Unknown anchor type");
                self.warn(format!("unknown anchor type: {other}"));
                String::new()
            }
        }
    }

    fn inline_callout(&mut self, node: &Node) -> String {
        let source = node.source.as_deref().unwrap_or_default();
        let number = escape_text(source);
        if self.font_icons() {
            format!(
                r#"<i class="conum" data-value="{}"></i><b>({number})</b>"#,
                escape_html(source)
            )
        } else if self.icons_enabled() {
            let src = self.icon_uri(None, &format!("callouts/{source}"));
            format!(
                r#"<img src="{}" alt="{}">"#,
                escape_html(&src),
                escape_html(source)
            )
        } else {
            match node.attributes.get("guard") {
                Some(AttrValue::List(_)) => {
                    format!(r#"&lt;!--<b class="conum">({number})</b>--&gt;"#)
                }
                Some(AttrValue::Str(guard)) => format!(r#"{guard}<b class="conum">({number})</b>"#),
                None => format!(r#"<b class="conum">({number})</b>"#),
            }
        }
    }

    fn inline_footnote(&mut self, node: &Node, guard: XrefGuard) -> String {
        let is_xref = node.node_type.as_deref() == Some("xref");
        match node.attr(FOOTNOTE_INDEX_ATTR) {
            Some(index) if is_xref => format!(
                r##"<sup class="footnoteref">[<a class="footnote" href="#_footnotedef_{index}" title="View footnote.">{index}</a>]</sup>"##
            ),
            Some(index) => {
                let id = node
                    .id
                    .as_deref()
                    .map(|id| format!(r#" id="_footnote_{}""#, escape_html(id)))
                    .unwrap_or_default();
                format!(
                    r##"<sup class="footnote"{id}>[<a id="_footnoteref_{index}" class="footnote" href="#_footnotedef_{index}" title="View footnote.">{index}</a>]</sup>"##
                )
            }
            None if is_xref => format!(
                r#"<sup class="footnoteref red" title="Unresolved footnote reference.">[{}]</sup>"#,
                self.inline_content(node, guard)
            ),
            None => String::new(),
        }
    }

    fn inline_image(&mut self, node: &Node) -> String {
        let target = node.target.as_deref().unwrap_or_default();
        let node_type = node.node_type.as_deref().unwrap_or("image");
        let alt = image_alt(node);
        let dimensions = format!(
            "{}{}{}",
            opt_attr("width", node.attr("width")),
            opt_attr("height", node.attr("height")),
            opt_attr("title", node.attr("title"))
        );

        let img = if node_type == "icon" {
            if self.font_icons() {
                let mut classes = ClassList::base("fa");
                classes.push(format!("fa-{target}"));
                classes.push_opt(node.attr("size").map(|s| format!("fa-{s}")));
                if let Some(flip) = node.attr("flip") {
                    classes.push(format!("fa-flip-{flip}"));
                } else if let Some(rotate) = node.attr("rotate") {
                    classes.push(format!("fa-rotate-{rotate}"));
                }
                format!("<i{}{}></i>", classes.attr(), opt_attr("title", node.attr("title")))
            } else if self.icons_enabled() {
                format!(
                    r#"<img src="{}" alt="{}"{dimensions}>"#,
                    escape_html(&self.icon_uri(Some(node), target)),
                    escape_html(&alt)
                )
            } else {
                format!("[{}&#93;", escape_text(&alt))
            }
        } else {
            let plain_img = |uri: String| {
                format!(r#"<img src="{}" alt="{}"{dimensions}>"#, escape_html(&uri), escape_html(&alt))
            };
            let alt_span = format!(r#"<span class="alt">{}</span>"#, escape_text(&alt));
            if is_svg(node, target) && node.has_option("inline") {
                self.read_svg(node, target).unwrap_or(alt_span)
            } else if is_svg(node, target) && node.has_option("interactive") {
                let fallback = match node.attr("fallback") {
                    Some(fallback) => plain_img(self.image_uri(fallback)),
                    None => alt_span,
                };
                format!(
                    r#"<object type="image/svg+xml" data="{}"{dimensions}>{fallback}</object>"#,
                    escape_html(&self.image_uri(target))
                )
            } else {
                plain_img(self.image_uri(target))
            }
        };

        let img = match node.attr("link") {
            Some(link) => format!(
                r#"<a class="image" href="{}"{}>{img}</a>"#,
                escape_html(link),
                link_constraint_attrs(node)
            ),
            None => img,
        };
        let classes = ClassList::base(node_type)
            .with(node.attr("float"))
            .with(node.role());
        format!("<span{}>{img}</span>", classes.attr())
    }

    fn inline_menu(&self, node: &Node) -> String {
        let caret = if self.font_icons() {
            r#"&#160;<i class="fa fa-angle-right caret"></i> "#
        } else {
            r#"&#160;<b class="caret">&#8250;</b> "#
        };
        let menu = escape_text(node.attr("menu").unwrap_or_default());
        let submenus: Vec<String> = node.attr_list("submenus").into_iter().map(escape_text).collect();
        let menuitem = node.attr("menuitem").map(escape_text);

        if submenus.is_empty() {
            return match menuitem {
                Some(item) => format!(
                    r#"<span class="menuseq"><b class="menu">{menu}</b>{caret}<b class="menuitem">{item}</b></span>"#
                ),
                None => format!(r#"<b class="menuref">{menu}</b>"#),
            };
        }
        let joiner = format!(r#"</b>{caret}<b class="submenu">"#);
        format!(
            r#"<span class="menuseq"><b class="menu">{menu}</b>{caret}<b class="submenu">{}</b>{caret}<b class="menuitem">{}</b></span>"#,
            submenus.join(&joiner),
            menuitem.unwrap_or_default()
        )
    }
}

fn inline_kbd(node: &Node) -> String {
    let keys: Vec<String> = node.attr_list("keys").into_iter().map(escape_text).collect();
    if let [key] = keys.as_slice() {
        format!("<kbd>{key}</kbd>")
    } else {
        format!(r#"<span class="keyseq"><kbd>{}</kbd></span>"#, keys.join("</kbd>+<kbd>"))
    }
}
