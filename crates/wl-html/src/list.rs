//! Ordered, unordered, callout and description lists.

use wl_document::Node;

use crate::attrs::{ClassList, escape_html, id_attr, opt_attr};
use crate::converter::Render;
use crate::xref::XrefGuard;

/// `type` attribute of an `<ol>` for a numbering style.
fn list_marker_keyword(style: &str) -> Option<&'static str> {
    match style {
        "loweralpha" => Some("a"),
        "upperalpha" => Some("A"),
        "lowerroman" => Some("i"),
        "upperroman" => Some("I"),
        _ => None,
    }
}

/// `<li>` open tag carrying the item's own id and role.
fn li_open(item: &Node) -> String {
    format!(
        "<li{}{}>",
        id_attr(item.id.as_deref()),
        ClassList::new().with(item.role()).attr()
    )
}

/// Checklist markers for checked and unchecked items.
struct Markers {
    checked: &'static str,
    unchecked: &'static str,
}

impl Render<'_> {
    fn item_text(&mut self, item: &Node) -> String {
        match &item.text {
            Some(text) => self.render_inlines(text, XrefGuard::Idle),
            None => String::new(),
        }
    }

    fn item_blocks(&mut self, item: &Node) -> Option<String> {
        if item.blocks.is_empty() {
            None
        } else {
            Some(self.render_blocks(&item.blocks, Some(item)))
        }
    }

    /// A list item rendered on its own: its text paragraph then its blocks.
    pub(crate) fn list_item_body(&mut self, item: &Node) -> String {
        let mut lines = Vec::new();
        if item.has_text() {
            lines.push(format!("<p>{}</p>", self.item_text(item)));
        }
        lines.extend(self.item_blocks(item));
        lines.join("\n")
    }

    /// Opening `<div>` and optional title shared by all list kinds.
    fn list_open(&mut self, node: &Node, classes: &ClassList) -> Vec<String> {
        let mut lines = vec![format!("<div{}{}>", id_attr(node.id.as_deref()), classes.attr())];
        if node.has_title() {
            lines.push(format!("<div class=\"title\">{}</div>", self.title(node)));
        }
        lines
    }

    pub(crate) fn olist(&mut self, node: &Node) -> String {
        let style = node.style.as_deref();
        let classes = ClassList::base("olist").with(style).with(node.role());
        let mut lines = self.list_open(node, &classes);
        lines.push(format!(
            "<ol{}{}{}{}>",
            ClassList::new().with(style).attr(),
            opt_attr("type", style.and_then(list_marker_keyword)),
            opt_attr("start", node.attr("start")),
            if node.has_option("reversed") { " reversed" } else { "" }
        ));
        for item in &node.items {
            lines.push(li_open(item));
            lines.push(format!("<p>{}</p>", self.item_text(item)));
            lines.extend(self.item_blocks(item));
            lines.push("</li>".to_owned());
        }
        lines.push("</ol>".to_owned());
        lines.push("</div>".to_owned());
        lines.join("\n")
    }

    pub(crate) fn ulist(&mut self, node: &Node) -> String {
        let checklist = node.has_option("checklist");
        let mut classes = ClassList::base("ulist");
        let (ul_class, markers) = if checklist {
            classes.push("checklist");
            let markers = if node.has_option("interactive") {
                Markers {
                    checked: r#"<input type="checkbox" data-item-complete="1" checked> "#,
                    unchecked: r#"<input type="checkbox" data-item-complete="0"> "#,
                }
            } else if self.font_icons() {
                Markers {
                    checked: r#"<i class="fa fa-check-square-o"></i> "#,
                    unchecked: r#"<i class="fa fa-square-o"></i> "#,
                }
            } else {
                Markers {
                    checked: "&#10003; ",
                    unchecked: "&#10063; ",
                }
            };
            (ClassList::base("checklist"), Some(markers))
        } else {
            (ClassList::new().with(node.style.as_deref()), None)
        };
        classes.push_opt(node.style.as_deref());
        classes.push_opt(node.role());

        let mut lines = self.list_open(node, &classes);
        lines.push(format!("<ul{}>", ul_class.attr()));
        for item in &node.items {
            lines.push(li_open(item));
            let marker = match &markers {
                Some(markers) if item.has_attr("checkbox") => {
                    if item.has_attr("checked") {
                        markers.checked
                    } else {
                        markers.unchecked
                    }
                }
                _ => "",
            };
            lines.push(format!("<p>{marker}{}</p>", self.item_text(item)));
            lines.extend(self.item_blocks(item));
            lines.push("</li>".to_owned());
        }
        lines.push("</ul>".to_owned());
        lines.push("</div>".to_owned());
        lines.join("\n")
    }

    pub(crate) fn colist(&mut self, node: &Node) -> String {
        let classes = ClassList::base("colist")
            .with(node.style.as_deref())
            .with(node.role());
        let mut lines = self.list_open(node, &classes);
        if self.icons_enabled() {
            lines.push("<table>".to_owned());
            let font_icons = self.font_icons();
            for (i, item) in node.items.iter().enumerate() {
                let num = i + 1;
                let label = if font_icons {
                    format!(r#"<i class="conum" data-value="{num}"></i><b>{num}</b>"#)
                } else {
                    format!(
                        r#"<img src="{}" alt="{num}">"#,
                        escape_html(&self.icon_uri(None, &format!("callouts/{num}")))
                    )
                };
                let text = self.item_text(item);
                let blocks = self
                    .item_blocks(item)
                    .map(|b| format!("\n{b}"))
                    .unwrap_or_default();
                lines.push(format!("<tr>\n<td>{label}</td>\n<td>{text}{blocks}</td>\n</tr>"));
            }
            lines.push("</table>".to_owned());
        } else {
            lines.push("<ol>".to_owned());
            for item in &node.items {
                let text = self.item_text(item);
                let blocks = self
                    .item_blocks(item)
                    .map(|b| format!("\n{b}"))
                    .unwrap_or_default();
                lines.push(format!("<li>\n<p>{text}</p>{blocks}\n</li>"));
            }
            lines.push("</ol>".to_owned());
        }
        lines.push("</div>".to_owned());
        lines.join("\n")
    }

    /// Description paragraph and blocks of a dlist entry.
    fn description(&mut self, dd: &Node, lines: &mut Vec<String>) {
        if dd.has_text() {
            lines.push(format!("<p>{}</p>", self.item_text(dd)));
        }
        lines.extend(self.item_blocks(dd));
    }

    pub(crate) fn dlist(&mut self, node: &Node) -> String {
        let style = node.style.as_deref();
        let classes = match style {
            Some("qanda") => ClassList::base("qlist").with(Some("qanda")).with(node.role()),
            Some("horizontal") => ClassList::base("hdlist").with(node.role()),
            _ => ClassList::base("dlist").with(style).with(node.role()),
        };
        let mut lines = self.list_open(node, &classes);
        match style {
            Some("qanda") => {
                lines.push("<ol>".to_owned());
                for entry in &node.entries {
                    lines.push("<li>".to_owned());
                    for dt in &entry.terms {
                        lines.push(format!("<p><em>{}</em></p>", self.item_text(dt)));
                    }
                    if let Some(dd) = &entry.description {
                        self.description(dd, &mut lines);
                    }
                    lines.push("</li>".to_owned());
                }
                lines.push("</ol>".to_owned());
            }
            Some("horizontal") => {
                lines.push("<table>".to_owned());
                let labelwidth = node.attr("labelwidth");
                let itemwidth = node.attr("itemwidth");
                if labelwidth.is_some() || itemwidth.is_some() {
                    lines.push("<colgroup>".to_owned());
                    for width in [labelwidth, itemwidth] {
                        let style = width
                            .map(|w| format!(r#" style="width: {}%;""#, escape_html(w.trim_end_matches('%'))))
                            .unwrap_or_default();
                        lines.push(format!("<col{style}>"));
                    }
                    lines.push("</colgroup>".to_owned());
                }
                let term_class = ClassList::base("hdlist1")
                    .with(node.has_option("strong").then_some("strong"))
                    .attr();
                for entry in &node.entries {
                    lines.push("<tr>".to_owned());
                    lines.push(format!("<td{term_class}>"));
                    for (i, dt) in entry.terms.iter().enumerate() {
                        if i > 0 {
                            lines.push("<br>".to_owned());
                        }
                        lines.push(self.item_text(dt));
                    }
                    lines.push("</td>".to_owned());
                    lines.push(r#"<td class="hdlist2">"#.to_owned());
                    if let Some(dd) = &entry.description {
                        self.description(dd, &mut lines);
                    }
                    lines.push("</td>".to_owned());
                    lines.push("</tr>".to_owned());
                }
                lines.push("</table>".to_owned());
            }
            _ => {
                lines.push("<dl>".to_owned());
                let dt_class = if style.is_none() { r#" class="hdlist1""# } else { "" };
                for entry in &node.entries {
                    for dt in &entry.terms {
                        lines.push(format!("<dt{dt_class}>{}</dt>", self.item_text(dt)));
                    }
                    let Some(dd) = &entry.description else {
                        continue;
                    };
                    lines.push("<dd>".to_owned());
                    self.description(dd, &mut lines);
                    lines.push("</dd>".to_owned());
                }
                lines.push("</dl>".to_owned());
            }
        }
        lines.push("</div>".to_owned());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::Converter;
    use pretty_assertions::assert_eq;
    use wl_document::{DlistEntry, Document, NodeKind};

    fn render(doc: &Document, node: &Node) -> String {
        let converter = Converter::default();
        let mut render = converter.render(doc);
        render.render_block(node, None)
    }

    fn item(text: &str) -> Node {
        Node::new(NodeKind::ListItem).with_plain_text(text)
    }

    fn checklist() -> Node {
        Node::new(NodeKind::Ulist)
            .with_option("checklist")
            .with_item(item("done").with_attr("checkbox", "").with_attr("checked", ""))
            .with_item(item("todo").with_attr("checkbox", ""))
    }

    #[test]
    fn test_olist_with_nested_block() {
        let doc = Document::new();
        let list = Node::new(NodeKind::Olist)
            .with_item(item("one").with_block(Node::paragraph("nested")))
            .with_item(item("two"));
        assert_eq!(
            render(&doc, &list),
            "<div class=\"olist\">\n<ol>\n<li>\n<p>one</p>\n<p>nested</p>\n</li>\n<li>\n<p>two</p>\n</li>\n</ol>\n</div>"
        );
    }

    #[test]
    fn test_olist_style_and_start() {
        let doc = Document::new();
        let list = Node::new(NodeKind::Olist)
            .with_style("loweralpha")
            .with_attr("start", "3")
            .with_option("reversed")
            .with_item(item("x").with_id("first").with_role("hot"));
        let html = render(&doc, &list);
        assert!(html.starts_with("<div class=\"olist loweralpha\">\n<ol class=\"loweralpha\" type=\"a\" start=\"3\" reversed>"));
        assert!(html.contains(r#"<li id="first" class="hot">"#));
    }

    #[test]
    fn test_ulist_plain() {
        let doc = Document::new();
        let list = Node::new(NodeKind::Ulist).with_item(item("a"));
        assert_eq!(
            render(&doc, &list),
            "<div class=\"ulist\">\n<ul>\n<li>\n<p>a</p>\n</li>\n</ul>\n</div>"
        );
    }

    #[test]
    fn test_checklist_interactive_markers() {
        let doc = Document::new().with_attr("icons", "font");
        let html = render(&doc, &checklist().with_option("interactive"));
        assert!(html.starts_with("<div class=\"ulist checklist\">\n<ul class=\"checklist\">"));
        assert!(html.contains(r#"<p><input type="checkbox" data-item-complete="1" checked> done</p>"#));
        assert!(html.contains(r#"<p><input type="checkbox" data-item-complete="0"> todo</p>"#));
    }

    #[test]
    fn test_checklist_font_icon_markers() {
        let doc = Document::new().with_attr("icons", "font");
        let html = render(&doc, &checklist());
        assert!(html.contains(r#"<p><i class="fa fa-check-square-o"></i> done</p>"#));
        assert!(html.contains(r#"<p><i class="fa fa-square-o"></i> todo</p>"#));
    }

    #[test]
    fn test_checklist_text_markers() {
        let doc = Document::new();
        let html = render(&doc, &checklist());
        assert!(html.contains("<p>&#10003; done</p>"));
        assert!(html.contains("<p>&#10063; todo</p>"));
    }

    #[test]
    fn test_colist_variants() {
        let list = Node::new(NodeKind::Colist).with_item(item("explained"));
        assert_eq!(
            render(&Document::new(), &list),
            "<div class=\"colist\">\n<ol>\n<li>\n<p>explained</p>\n</li>\n</ol>\n</div>"
        );
        assert_eq!(
            render(&Document::new().with_attr("icons", "font"), &list),
            "<div class=\"colist\">\n<table>\n<tr>\n<td><i class=\"conum\" data-value=\"1\"></i><b>1</b></td>\n<td>explained</td>\n</tr>\n</table>\n</div>"
        );
    }

    #[test]
    fn test_dlist_default() {
        let doc = Document::new();
        let list = Node::new(NodeKind::Dlist).with_entry(DlistEntry::new(
            vec![item("CPU")],
            Some(item("Processor")),
        ));
        assert_eq!(
            render(&doc, &list),
            "<div class=\"dlist\">\n<dl>\n<dt class=\"hdlist1\">CPU</dt>\n<dd>\n<p>Processor</p>\n</dd>\n</dl>\n</div>"
        );
    }

    #[test]
    fn test_dlist_qanda() {
        let doc = Document::new();
        let list = Node::new(NodeKind::Dlist)
            .with_style("qanda")
            .with_entry(DlistEntry::new(vec![item("Why?")], Some(item("Because."))));
        assert_eq!(
            render(&doc, &list),
            "<div class=\"qlist qanda\">\n<ol>\n<li>\n<p><em>Why?</em></p>\n<p>Because.</p>\n</li>\n</ol>\n</div>"
        );
    }

    #[test]
    fn test_dlist_horizontal() {
        let doc = Document::new();
        let list = Node::new(NodeKind::Dlist)
            .with_style("horizontal")
            .with_attr("labelwidth", "25%")
            .with_option("strong")
            .with_entry(DlistEntry::new(vec![item("A"), item("B")], None));
        assert_eq!(
            render(&doc, &list),
            "<div class=\"hdlist\">\n<table>\n<colgroup>\n<col style=\"width: 25%;\">\n<col>\n</colgroup>\n<tr>\n<td class=\"hdlist1 strong\">\nA\n<br>\nB\n</td>\n<td class=\"hdlist2\">\n</td>\n</tr>\n</table>\n</div>"
        );
    }
}
