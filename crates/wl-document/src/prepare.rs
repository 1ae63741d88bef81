//! Parse-time preparation passes.
//!
//! These passes are the only place the document is mutated. They fill the
//! [`Catalog`](crate::Catalog) and annotate nodes (section numbers, footnote
//! indices) so rendering can be a read-only walk. Running them twice yields
//! the same result.

use std::collections::BTreeMap;

use crate::document::{Document, Footnote, RefTarget};
use crate::node::{Node, NodeKind};

/// Attribute holding a footnote's assigned index.
pub const FOOTNOTE_INDEX_ATTR: &str = "index";

impl Document {
    /// Number sections, index footnotes and register reference targets.
    pub fn prepare(&mut self) {
        self.prepare_with_defaults(&BTreeMap::new());
    }

    /// [`prepare`](Self::prepare) with `defaults` standing in for
    /// attributes the document does not set (such as `sectnums` from a
    /// site configuration).
    pub fn prepare_with_defaults(&mut self, defaults: &BTreeMap<String, String>) {
        self.catalog.refs.clear();
        self.catalog.footnotes.clear();

        if self.has_attr("sectnums") || defaults.contains_key("sectnums") {
            let mut counter = 0;
            number_sections(&mut self.root.blocks, "", &mut counter);
        }

        // Titles are copied into reference targets, so their footnotes
        // must carry an index first.
        let mut footnotes = std::mem::take(&mut self.catalog.footnotes);
        self.root
            .walk_mut(&mut |node| index_footnote(node, &mut footnotes));
        self.catalog.footnotes = footnotes;

        let mut refs = std::mem::take(&mut self.catalog.refs);
        if let Some(header) = &mut self.header {
            for node in &mut header.title {
                node.walk_mut(&mut |n| register_ref(n, &mut refs));
            }
        }
        self.root.walk_mut(&mut |node| register_ref(node, &mut refs));
        self.catalog.refs = refs;

        tracing::debug!(
            refs = self.catalog.refs.len(),
            footnotes = self.catalog.footnotes.len(),
            "Document prepared"
        );
    }
}

/// Assign `sectnum` values such as `1.`, `1.2.` to numbered sections.
///
/// Level-0 sections (book parts) are not numbered; their chapters continue
/// the count across parts.
fn number_sections(blocks: &mut [Node], prefix: &str, counter: &mut usize) {
    for block in blocks.iter_mut().filter(|b| b.kind == NodeKind::Section) {
        if block.level == 0 {
            block.sectnum = None;
            number_sections(&mut block.blocks, prefix, counter);
        } else if block.numbered {
            *counter += 1;
            let sectnum = format!("{prefix}{counter}.");
            let mut child_counter = 0;
            number_sections(&mut block.blocks, &sectnum, &mut child_counter);
            block.sectnum = Some(sectnum);
        } else {
            block.sectnum = None;
        }
    }
}

fn register_ref(node: &Node, refs: &mut BTreeMap<String, RefTarget>) {
    let Some(id) = node.id.as_deref() else {
        return;
    };
    let registrable = match node.kind {
        NodeKind::InlineAnchor => matches!(node.node_type.as_deref(), Some("ref" | "bibref")),
        NodeKind::InlineFootnote => false,
        kind => !kind.is_inline() && kind != NodeKind::Document,
    };
    if !registrable {
        return;
    }
    if refs.contains_key(id) {
        tracing::warn!(id = %id, "Duplicate reference id, keeping first definition");
        return;
    }
    refs.insert(id.to_owned(), RefTarget::from_node(id, node));
}

/// Index footnotes in first-occurrence order.
///
/// A footnote with `node_type = xref` refers back to an earlier footnote by
/// its `target` (or id) and reuses that index; an unknown reference stays
/// unindexed and keeps the referenced id as its text.
fn index_footnote(node: &mut Node, footnotes: &mut Vec<Footnote>) {
    if node.kind != NodeKind::InlineFootnote {
        return;
    }
    node.attributes.remove(FOOTNOTE_INDEX_ATTR);

    if node.node_type.as_deref() == Some("xref") {
        let Some(refid) = node.target.clone().or_else(|| node.id.clone()) else {
            return;
        };
        if let Some(footnote) = footnotes.iter().find(|f| f.id.as_deref() == Some(&refid)) {
            node.attributes
                .insert(FOOTNOTE_INDEX_ATTR, footnote.index.to_string());
        } else {
            tracing::warn!(refid = %refid, "Unresolved footnote reference");
            if !node.has_text() {
                node.text = Some(vec![Node::plain(refid)]);
            }
        }
        return;
    }

    let index = footnotes.len() + 1;
    footnotes.push(Footnote {
        index,
        id: node.id.clone(),
        text: node.text.clone().unwrap_or_default(),
    });
    node.attributes
        .insert(FOOTNOTE_INDEX_ATTR, index.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn footnote(text: &str) -> Node {
        Node::new(NodeKind::InlineFootnote).with_plain_text(text)
    }

    #[test]
    fn test_footnotes_indexed_in_first_occurrence_order() {
        let mut doc = Document::new()
            .with_block(Node::new(NodeKind::Paragraph).with_text(vec![
                Node::plain("a"),
                footnote("first"),
            ]))
            .with_block(Node::new(NodeKind::Paragraph).with_text(vec![
                footnote("second").with_id("disclaimer"),
                Node::new(NodeKind::InlineFootnote)
                    .with_node_type("xref")
                    .with_target("disclaimer"),
            ]));
        doc.prepare();

        let indices: Vec<usize> = doc.catalog.footnotes.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(doc.catalog.footnotes[1].id.as_deref(), Some("disclaimer"));

        let second = doc.root.blocks[1].text.as_ref().unwrap();
        assert_eq!(second[0].attr(FOOTNOTE_INDEX_ATTR), Some("2"));
        assert_eq!(second[1].attr(FOOTNOTE_INDEX_ATTR), Some("2"));
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let mut doc = Document::new().with_block(
            Node::new(NodeKind::Paragraph).with_text(vec![footnote("x"), footnote("y")]),
        );
        doc.prepare();
        let first = doc.clone();
        doc.prepare();
        assert_eq!(doc, first);
        assert_eq!(doc.catalog.footnotes.len(), 2);
    }

    #[test]
    fn test_unresolved_footnote_reference_stays_unindexed() {
        let mut doc = Document::new().with_block(Node::new(NodeKind::Paragraph).with_text(vec![
            Node::new(NodeKind::InlineFootnote)
                .with_node_type("xref")
                .with_target("nope"),
        ]));
        doc.prepare();
        let node = &doc.root.blocks[0].text.as_ref().unwrap()[0];
        assert_eq!(node.attr(FOOTNOTE_INDEX_ATTR), None);
        assert_eq!(Node::plain_text(node.text.as_ref().unwrap()), "nope");
        assert!(doc.catalog.footnotes.is_empty());
    }

    #[test]
    fn test_section_numbering() {
        let mut doc = Document::new().with_attr("sectnums", "").with_blocks([
            Node::new(NodeKind::Section)
                .with_level(1)
                .numbered()
                .with_block(Node::new(NodeKind::Section).with_level(2).numbered())
                .with_block(Node::new(NodeKind::Section).with_level(2).numbered()),
            Node::new(NodeKind::Section).with_level(1).numbered(),
            Node::new(NodeKind::Section).with_level(1),
        ]);
        doc.prepare();

        let blocks = &doc.root.blocks;
        assert_eq!(blocks[0].sectnum.as_deref(), Some("1."));
        assert_eq!(blocks[0].blocks[0].sectnum.as_deref(), Some("1.1."));
        assert_eq!(blocks[0].blocks[1].sectnum.as_deref(), Some("1.2."));
        assert_eq!(blocks[1].sectnum.as_deref(), Some("2."));
        assert_eq!(blocks[2].sectnum, None);
    }

    #[test]
    fn test_sectnums_from_defaults() {
        let mut doc = Document::new()
            .with_block(Node::new(NodeKind::Section).with_level(1).numbered());
        doc.prepare();
        assert_eq!(doc.root.blocks[0].sectnum, None);

        let defaults = BTreeMap::from([("sectnums".to_owned(), String::new())]);
        doc.prepare_with_defaults(&defaults);
        assert_eq!(doc.root.blocks[0].sectnum.as_deref(), Some("1."));
    }

    #[test]
    fn test_chapters_continue_numbering_across_parts() {
        let part = |n: usize| {
            Node::new(NodeKind::Section)
                .with_level(0)
                .with_id(format!("part{n}"))
                .with_block(Node::new(NodeKind::Section).with_level(1).numbered())
        };
        let mut doc = Document::new()
            .with_attr("sectnums", "")
            .with_attr("doctype", "book")
            .with_blocks([part(1), part(2)]);
        doc.prepare();
        assert_eq!(doc.root.blocks[0].sectnum, None);
        assert_eq!(doc.root.blocks[0].blocks[0].sectnum.as_deref(), Some("1."));
        assert_eq!(doc.root.blocks[1].blocks[0].sectnum.as_deref(), Some("2."));
    }

    #[test]
    fn test_register_refs_keeps_first_definition() {
        let mut doc = Document::new().with_blocks([
            Node::new(NodeKind::Section)
                .with_level(1)
                .with_id("intro")
                .with_plain_title("Introduction"),
            Node::paragraph("dup").with_id("intro"),
            Node::new(NodeKind::Paragraph).with_text(vec![
                Node::new(NodeKind::InlineAnchor)
                    .with_node_type("ref")
                    .with_id("here"),
            ]),
        ]);
        doc.prepare();
        let intro = doc.catalog.get_ref("intro").unwrap();
        assert_eq!(intro.kind, NodeKind::Section);
        assert!(doc.catalog.get_ref("here").is_some());
        assert_eq!(doc.catalog.refs.len(), 2);
    }

    #[test]
    fn test_reference_title_keeps_footnote_index() {
        let mut doc = Document::new().with_block(
            Node::new(NodeKind::Section)
                .with_level(1)
                .with_id("limits")
                .with_title(vec![Node::plain("Limits"), footnote("as of 2024")]),
        );
        doc.prepare();
        let title = doc.catalog.get_ref("limits").unwrap().title.as_ref().unwrap();
        assert_eq!(title[1].attr(FOOTNOTE_INDEX_ATTR), Some("1"));
    }
}
