//! Cross-reference text resolution.
//!
//! The display text of an xref is borrowed from its target: the target's
//! `reftext`, or its (numbered, captioned) title. A title can itself contain
//! an xref, so resolution threads an [`XrefGuard`] through inline rendering.
//! While a title is being rendered for another reference the guard is
//! [`XrefGuard::Active`], and nested references fall back to `[id]` instead
//! of recursing.

use std::sync::LazyLock;

use regex::Regex;
use wl_document::{Node, NodeKind, RefTarget};

use crate::attrs::escape_text;
use crate::converter::Render;

static DROP_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:a\b[^>]*|/a)>").unwrap());

/// Whether an xref text is currently being generated higher up the call chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum XrefGuard {
    #[default]
    Idle,
    Active,
}

/// Remove `<a …>` and `</a>` tags, keeping their content.
pub(crate) fn drop_anchors(text: &str) -> String {
    if text.contains("<a") {
        DROP_ANCHOR.replace_all(text, "").into_owned()
    } else {
        text.to_owned()
    }
}

fn default_refsig(sectname: &str) -> Option<&'static str> {
    match sectname {
        "section" => Some("Section"),
        "chapter" => Some("Chapter"),
        "appendix" => Some("Appendix"),
        "part" => Some("Part"),
        _ => None,
    }
}

impl Render<'_> {
    /// Text for a reference to `refid` without explicit link text.
    ///
    /// `node` is the referencing node; its `xrefstyle` attribute overrides
    /// the document's.
    pub(crate) fn xref_text(&mut self, node: Option<&Node>, refid: &str, guard: XrefGuard) -> String {
        let doc = self.doc;
        let root;
        let (target, top) = match doc.catalog.get_ref(refid) {
            Some(target) => (target, false),
            None if refid.is_empty() => {
                root = doc.root_target();
                (&root, true)
            }
            None => {
                tracing::debug!(refid = %refid, "Unresolved cross reference");
                return format!("[{}]", escape_text(refid));
            }
        };
        let fallback = || {
            if top {
                "[^top]".to_owned()
            } else {
                format!("[{}]", escape_text(refid))
            }
        };

        if guard == XrefGuard::Active {
            return fallback();
        }

        let style = match node {
            Some(node) => self.node_attr(node, "xrefstyle", Some("xrefstyle")),
            None => self.doc_attr("xrefstyle"),
        };
        match self.generate_xreftext(target, style) {
            Some(text) if !text.is_empty() => drop_anchors(&text),
            _ => fallback(),
        }
    }

    /// Reference text a target offers for `style` (`full`, `short`, `basic`).
    fn generate_xreftext(&mut self, target: &RefTarget, style: Option<&str>) -> Option<String> {
        if let Some(reftext) = target.reftext.as_deref().filter(|r| !r.is_empty()) {
            return Some(escape_text(reftext));
        }
        let title = target
            .title
            .as_ref()
            .map(|t| self.render_inlines(t, XrefGuard::Active));

        if target.kind == NodeKind::Section {
            let sectname = target.sectname.as_deref().unwrap_or("section");
            let emphasized = matches!(sectname, "chapter" | "appendix");
            let basic = |title: String| {
                if emphasized {
                    format!("<em>{title}</em>")
                } else {
                    title
                }
            };
            let Some(style) = style else {
                return title;
            };
            let numbered = target.numbered.then_some(target.sectnum.as_deref()).flatten();
            let Some(sectnum) = numbered else {
                return title.map(basic);
            };
            let refsig_attr = format!("{sectname}-refsig");
            let signifier = self
                .doc_attr(&refsig_attr)
                .or_else(|| default_refsig(sectname))
                .filter(|s| !s.is_empty());
            let number = sectnum.trim_end_matches('.');
            return match style {
                "full" => {
                    let quoted = if emphasized {
                        format!("<em>{}</em>", title.unwrap_or_default())
                    } else {
                        format!("&#8220;{}&#8221;", title.unwrap_or_default())
                    };
                    Some(match signifier {
                        Some(sig) => format!("{sig} {number}, {quoted}"),
                        None => format!("{number}, {quoted}"),
                    })
                }
                "short" => Some(match signifier {
                    Some(sig) => format!("{sig} {number}"),
                    None => number.to_owned(),
                }),
                _ => title.map(basic),
            };
        }

        let caption = target.caption.as_deref().filter(|c| !c.is_empty());
        match (style, caption, title) {
            (Some("full"), Some(caption), Some(title)) => Some(format!(
                "{}, &#8220;{title}&#8221;",
                escape_text(caption.strip_suffix(". ").unwrap_or(caption))
            )),
            (Some("short"), Some(caption), Some(_)) => Some(escape_text(
                caption.strip_suffix(". ").unwrap_or(caption),
            )),
            (_, _, title) => title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::Converter;
    use pretty_assertions::assert_eq;
    use wl_document::Document;

    fn xref(refid: &str) -> Node {
        Node::new(NodeKind::InlineAnchor)
            .with_node_type("xref")
            .with_attr("refid", refid)
    }

    fn section(id: &str, title: Vec<Node>) -> Node {
        Node::new(NodeKind::Section)
            .with_level(1)
            .with_id(id)
            .with_title(title)
    }

    fn resolve(doc: &Document, refid: &str) -> String {
        Converter::default().resolve_reference(doc, refid, None)
    }

    #[test]
    fn test_explicit_text_is_verbatim() {
        let doc = Document::new().prepared();
        let text = Converter::default().resolve_reference(&doc, "x", Some("see <b>this</b>"));
        assert_eq!(text, "see <b>this</b>");
    }

    #[test]
    fn test_unknown_id_falls_back_to_bracketed_id() {
        let doc = Document::new().prepared();
        assert_eq!(resolve(&doc, "missing"), "[missing]");
    }

    #[test]
    fn test_resolves_title() {
        let doc = Document::new()
            .with_block(section("intro", vec![Node::plain("Getting started")]))
            .prepared();
        assert_eq!(resolve(&doc, "intro"), "Getting started");
        assert_eq!(resolve(&doc, "intro"), resolve(&doc, "intro"));
    }

    #[test]
    fn test_reftext_wins() {
        let doc = Document::new()
            .with_block(
                section("intro", vec![Node::plain("Getting started")])
                    .with_attr("reftext", "Intro & more"),
            )
            .prepared();
        assert_eq!(resolve(&doc, "intro"), "Intro &amp; more");
    }

    #[test]
    fn test_empty_refid_targets_document_root() {
        let doc = Document::new().with_plain_title("Manual").prepared();
        assert_eq!(resolve(&doc, ""), "Manual");
        let untitled = Document::new().prepared();
        assert_eq!(resolve(&untitled, ""), "[^top]");
    }

    #[test]
    fn test_target_without_title_falls_back() {
        let doc = Document::new()
            .with_block(Node::paragraph("x").with_id("para"))
            .prepared();
        assert_eq!(resolve(&doc, "para"), "[para]");
    }

    #[test]
    fn test_cycle_terminates_with_fallback() {
        let doc = Document::new()
            .with_block(section("a", vec![Node::plain("A sees "), xref("b")]))
            .with_block(section("b", vec![Node::plain("B sees "), xref("a")]))
            .prepared();
        assert_eq!(resolve(&doc, "a"), "A sees [b]");
        assert_eq!(resolve(&doc, "b"), "B sees [a]");
    }

    #[test]
    fn test_anchor_markup_is_stripped() {
        let link = Node::new(NodeKind::InlineAnchor)
            .with_node_type("link")
            .with_target("https://example.com")
            .with_plain_text("site");
        let doc = Document::new()
            .with_block(section("a", vec![Node::plain("About the "), link]))
            .prepared();
        assert_eq!(resolve(&doc, "a"), "About the site");
    }

    #[test]
    fn test_numbered_section_styles() {
        let doc = Document::new()
            .with_attr("sectnums", "")
            .with_block(section("one", vec![Node::plain("First")]).numbered())
            .prepared();

        let styled = |style: &str| {
            let mut doc = doc.clone();
            doc.attributes.insert("xrefstyle", style);
            resolve(&doc, "one")
        };
        assert_eq!(styled("full"), "Section 1, &#8220;First&#8221;");
        assert_eq!(styled("short"), "Section 1");
        assert_eq!(styled("basic"), "First");
    }

    #[test]
    fn test_chapter_titles_are_emphasized() {
        let doc = Document::new()
            .with_attr("sectnums", "")
            .with_attr("xrefstyle", "full")
            .with_attr("chapter-refsig", "Ch.")
            .with_block(
                section("c1", vec![Node::plain("Origins")])
                    .numbered()
                    .with_sectname("chapter"),
            )
            .prepared();
        assert_eq!(resolve(&doc, "c1"), "Ch. 1, <em>Origins</em>");
    }

    #[test]
    fn test_captioned_block_styles() {
        let doc = Document::new()
            .with_attr("xrefstyle", "full")
            .with_block(
                Node::new(NodeKind::Table)
                    .with_id("t1")
                    .with_caption("Table 1. ")
                    .with_plain_title("Prices"),
            )
            .prepared();
        assert_eq!(resolve(&doc, "t1"), "Table 1, &#8220;Prices&#8221;");
    }
}
