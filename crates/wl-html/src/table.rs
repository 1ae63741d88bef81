//! Table rendering.

use wl_document::{Cell, CellStyle, Node, TableSection};

use crate::attrs::{ClassList, escape_html, escape_text, id_attr};
use crate::converter::Render;
use crate::xref::XrefGuard;

impl Render<'_> {
    /// Table width in percent: `tablepcwidth`, else `width` without its `%`.
    fn table_pcwidth(node: &Node) -> f64 {
        node.attr("tablepcwidth")
            .or_else(|| node.attr("width").map(|w| w.trim_end_matches('%')))
            .and_then(|w| w.trim().parse::<f64>().ok())
            .unwrap_or(100.0)
    }

    pub(crate) fn table(&mut self, node: &Node) -> String {
        let frame = match self.node_attr(node, "frame", Some("table-frame")).unwrap_or("all") {
            "topbot" => "ends",
            frame => frame,
        };
        let grid = self.node_attr(node, "grid", Some("table-grid")).unwrap_or("all");
        let mut classes = ClassList::base("table");
        classes.push(format!("frame-{frame}"));
        classes.push(format!("grid-{grid}"));
        classes.push_opt(
            self.node_attr(node, "stripes", Some("table-stripes"))
                .map(|s| format!("stripes-{s}")),
        );

        let autowidth = node.has_option("autowidth");
        let mut style = String::new();
        if autowidth && !node.has_attr("width") {
            classes.push("fit-content");
        } else {
            let pcwidth = Self::table_pcwidth(node);
            if (pcwidth - 100.0).abs() < f64::EPSILON {
                classes.push("stretch");
            } else {
                style = format!(r#" style="width: {pcwidth}%;""#);
            }
        }
        classes.push_opt(node.attr("float"));
        classes.push_opt(node.role());

        let mut lines = vec![format!(
            "<table{}{}{style}>",
            id_attr(node.id.as_deref()),
            classes.attr()
        )];
        if node.has_title() {
            lines.push(format!(
                "<caption class=\"title\">{}</caption>",
                self.captioned_title(node)
            ));
        }

        if let Some(table) = node.table.as_ref().filter(|t| t.row_count() > 0) {
            lines.push("<colgroup>".to_owned());
            for column in &table.columns {
                match column.pcwidth {
                    Some(width) if !autowidth && !column.autowidth => {
                        lines.push(format!(r#"<col style="width: {width}%;">"#));
                    }
                    _ => lines.push("<col>".to_owned()),
                }
            }
            lines.push("</colgroup>".to_owned());

            let background = self
                .doc_attr("cellbgcolor")
                .map(|color| format!(r#" style="background-color: {};""#, escape_html(color)))
                .unwrap_or_default();
            for (section, rows) in table.sections() {
                if rows.is_empty() {
                    continue;
                }
                let group = section.as_str();
                lines.push(format!("<t{group}>"));
                for row in rows {
                    lines.push("<tr>".to_owned());
                    for cell in row {
                        let head = section == TableSection::Head;
                        let content = self.cell_content(node, cell, head);
                        let tag = if head || cell.style == CellStyle::Header { "th" } else { "td" };
                        let colspan = cell
                            .colspan
                            .map(|n| format!(r#" colspan="{n}""#))
                            .unwrap_or_default();
                        let rowspan = cell
                            .rowspan
                            .map(|n| format!(r#" rowspan="{n}""#))
                            .unwrap_or_default();
                        lines.push(format!(
                            r#"<{tag} class="table halign-{} valign-{}"{colspan}{rowspan}{background}>{content}</{tag}>"#,
                            cell.halign.as_str(),
                            cell.valign.as_str()
                        ));
                    }
                    lines.push("</tr>".to_owned());
                }
                lines.push(format!("</t{group}>"));
            }
        }
        lines.push("</table>".to_owned());
        lines.join("\n")
    }

    fn cell_paragraphs(&mut self, cell: &Cell) -> Vec<String> {
        cell.paragraphs
            .iter()
            .map(|p| self.render_inlines(p, XrefGuard::Idle))
            .collect()
    }

    fn cell_content(&mut self, table: &Node, cell: &Cell, head: bool) -> String {
        if head {
            return self.cell_paragraphs(cell).join(" ");
        }
        match cell.style {
            CellStyle::Asciidoc => {
                format!(
                    r#"<div class="content">{}</div>"#,
                    self.render_blocks(&cell.blocks, Some(table))
                )
            }
            CellStyle::Literal => {
                let text = match &cell.source {
                    Some(source) => escape_text(source),
                    None => self.cell_paragraphs(cell).join("\n"),
                };
                format!(r#"<div class="literal"><pre>{text}</pre></div>"#)
            }
            style => {
                let (open, close) = match style {
                    CellStyle::Emphasis => ("<em>", "</em>"),
                    CellStyle::Strong => ("<strong>", "</strong>"),
                    CellStyle::Monospaced => ("<code>", "</code>"),
                    _ => ("", ""),
                };
                let paragraphs: Vec<String> = self
                    .cell_paragraphs(cell)
                    .into_iter()
                    .map(|p| format!(r#"<p class="table">{open}{p}{close}</p>"#))
                    .collect();
                paragraphs.join("\n")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::Converter;
    use crate::options::ConverterOptions;
    use pretty_assertions::assert_eq;
    use wl_document::{Column, Document, HAlign, NodeKind, Table, VAlign};

    fn render_with(converter: &Converter, doc: &Document, node: &Node) -> String {
        let mut render = converter.render(doc);
        render.render_block(node, None)
    }

    fn render(doc: &Document, node: &Node) -> String {
        render_with(&Converter::default(), doc, node)
    }

    fn simple_table() -> Table {
        Table {
            columns: vec![Column::with_width(50.0), Column::with_width(50.0)],
            head: vec![vec![Cell::text("Name"), Cell::text("Value")]],
            body: vec![vec![Cell::text("a"), Cell::text("1")]],
            foot: Vec::new(),
        }
    }

    #[test]
    fn test_full_width_table_stretches() {
        let doc = Document::new();
        let node = Node::new(NodeKind::Table).with_table(simple_table());
        assert_eq!(
            render(&doc, &node),
            "<table class=\"table frame-all grid-all stretch\">\n<colgroup>\n<col style=\"width: 50%;\">\n<col style=\"width: 50%;\">\n</colgroup>\n<thead>\n<tr>\n<th class=\"table halign-left valign-top\">Name</th>\n<th class=\"table halign-left valign-top\">Value</th>\n</tr>\n</thead>\n<tbody>\n<tr>\n<td class=\"table halign-left valign-top\"><p class=\"table\">a</p></td>\n<td class=\"table halign-left valign-top\"><p class=\"table\">1</p></td>\n</tr>\n</tbody>\n</table>"
        );
    }

    #[test]
    fn test_explicit_width_sets_style() {
        let doc = Document::new();
        let node = Node::new(NodeKind::Table)
            .with_attr("width", "60%")
            .with_table(simple_table());
        let html = render(&doc, &node);
        assert!(html.starts_with(r#"<table class="table frame-all grid-all" style="width: 60%;">"#));
        assert!(!html.contains("stretch"));

        let node = Node::new(NodeKind::Table)
            .with_attr("tablepcwidth", "100")
            .with_table(simple_table());
        let html = render(&doc, &node);
        assert!(html.contains("stretch"));
        assert!(!html.contains("style=\"width: 100"));
    }

    #[test]
    fn test_autowidth_fits_content() {
        let doc = Document::new();
        let node = Node::new(NodeKind::Table)
            .with_option("autowidth")
            .with_table(simple_table());
        let html = render(&doc, &node);
        assert!(html.starts_with(r#"<table class="table frame-all grid-all fit-content">"#));
        assert!(html.contains("<colgroup>\n<col>\n<col>\n</colgroup>"));
    }

    #[test]
    fn test_frame_grid_stripes_fallbacks() {
        let converter = Converter::new(ConverterOptions::default().with_attr("table-stripes", "odd"));
        let doc = Document::new().with_attr("table-frame", "topbot");
        let node = Node::new(NodeKind::Table)
            .with_attr("grid", "rows")
            .with_attr("float", "left")
            .with_role("compact")
            .with_table(simple_table());
        let html = render_with(&converter, &doc, &node);
        assert!(html.starts_with(
            r#"<table class="table frame-ends grid-rows stripes-odd stretch left compact">"#
        ));
    }

    #[test]
    fn test_empty_table_has_no_colgroup() {
        let doc = Document::new();
        let node = Node::new(NodeKind::Table)
            .with_caption("Table 1. ")
            .with_plain_title("Empty")
            .with_table(Table::default());
        assert_eq!(
            render(&doc, &node),
            "<table class=\"table frame-all grid-all stretch\">\n<caption class=\"title\">Table 1. Empty</caption>\n</table>"
        );
    }

    #[test]
    fn test_cell_styles() {
        let doc = Document::new().with_attr("cellbgcolor", "#eee");
        let table = Table {
            columns: vec![Column::auto()],
            head: Vec::new(),
            body: vec![
                vec![Cell::text("x").with_paragraph(vec![Node::plain("y")]).with_style(CellStyle::Strong)],
                vec![Cell {
                    source: Some("a < b".to_owned()),
                    ..Cell::default().with_style(CellStyle::Literal)
                }],
                vec![Cell {
                    blocks: vec![Node::paragraph("nested")],
                    ..Cell::default().with_style(CellStyle::Asciidoc)
                }],
                vec![Cell::text("h")
                    .with_style(CellStyle::Header)
                    .with_colspan(2)
                    .with_align(HAlign::Center, VAlign::Middle)],
            ],
            foot: Vec::new(),
        };
        let html = render(&doc, &Node::new(NodeKind::Table).with_table(table));
        let bg = r##" style="background-color: #eee;""##;
        assert!(html.contains(&format!(
            "<td class=\"table halign-left valign-top\"{bg}><p class=\"table\"><strong>x</strong></p>\n<p class=\"table\"><strong>y</strong></p></td>"
        )));
        assert!(html.contains(&format!(
            "<td class=\"table halign-left valign-top\"{bg}><div class=\"literal\"><pre>a &lt; b</pre></div></td>"
        )));
        assert!(html.contains(&format!(
            "<td class=\"table halign-left valign-top\"{bg}><div class=\"content\"><p>nested</p></div></td>"
        )));
        assert!(html.contains(&format!(
            "<th class=\"table halign-center valign-middle\" colspan=\"2\"{bg}><p class=\"table\">h</p></th>"
        )));
    }
}
