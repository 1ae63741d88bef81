//! Named dispatch: map a transform name to a render routine.

use std::fmt;
use std::str::FromStr;

use wl_document::{Document, Node, NodeKind};

use crate::converter::{Converter, RenderResult};
use crate::error::RenderError;
use crate::xref::XrefGuard;

/// A render routine addressable by name.
///
/// `document` and `embedded` render a whole document; every other name is a
/// [`NodeKind`] (`paragraph`, `inline_anchor`, `floating_title`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transform {
    Document,
    Embedded,
    Node(NodeKind),
}

impl Transform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Embedded => "embedded",
            Self::Node(kind) => kind.as_str(),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transform {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(Self::Document),
            "embedded" => Ok(Self::Embedded),
            _ => s
                .parse::<NodeKind>()
                .map(Self::Node)
                .map_err(|_| RenderError::UnknownTransform(s.to_owned())),
        }
    }
}

impl Converter {
    /// Render `node` with the transform registered under `name`.
    ///
    /// Whole-document transforms ignore `node`.
    pub fn convert_named(
        &self,
        name: &str,
        doc: &Document,
        node: &Node,
    ) -> Result<RenderResult, RenderError> {
        let transform = name.parse::<Transform>().inspect_err(|_| {
            tracing::warn!(transform = %name, "Unknown transform");
        })?;
        Ok(self.convert_with(transform, doc, node))
    }

    /// Render `node` with an already resolved transform.
    #[must_use]
    pub fn convert_with(&self, transform: Transform, doc: &Document, node: &Node) -> RenderResult {
        match transform {
            Transform::Document => self.convert_standalone(doc),
            Transform::Embedded => self.convert_embedded(doc),
            Transform::Node(kind) => {
                let mut render = self.render(doc);
                let html = if kind.is_inline() {
                    render.render_inline_as(kind, node, XrefGuard::Idle)
                } else {
                    render.render_block_as(kind, node, None)
                };
                render.finish(html)
            }
        }
    }

    /// Render a single block node as if it sat at the top of `doc`.
    pub fn convert_block(&self, doc: &Document, node: &Node) -> Result<RenderResult, RenderError> {
        if node.kind.is_inline() {
            tracing::error!(kind = %node.kind, "Inline node passed as a block");
            return Err(RenderError::NotABlock(node.kind));
        }
        Ok(self.convert_with(Transform::Node(node.kind), doc, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_transform() {
        assert_eq!("document".parse(), Ok(Transform::Document));
        assert_eq!("embedded".parse(), Ok(Transform::Embedded));
        assert_eq!("inline_anchor".parse(), Ok(Transform::Node(NodeKind::InlineAnchor)));
        assert_eq!("floating_title".parse(), Ok(Transform::Node(NodeKind::FloatingTitle)));
        assert_eq!(
            "convert_paragraph".parse::<Transform>(),
            Err(RenderError::UnknownTransform("convert_paragraph".to_owned()))
        );
        assert_eq!(Transform::Node(NodeKind::PageBreak).to_string(), "page_break");
    }

    #[test]
    fn test_convert_named_paragraph() {
        let converter = Converter::default();
        let doc = Document::new();
        let node = Node::paragraph("hello").with_role("lead");
        let result = converter.convert_named("paragraph", &doc, &node).unwrap();
        assert_eq!(result.html, r#"<p class="lead">hello</p>"#);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_convert_named_inline() {
        let converter = Converter::default();
        let doc = Document::new();
        let node = Node::new(NodeKind::InlineQuoted)
            .with_node_type("strong")
            .with_plain_text("bold");
        let result = converter.convert_named("inline_quoted", &doc, &node).unwrap();
        assert_eq!(result.html, "<strong>bold</strong>");
    }

    #[test]
    fn test_convert_named_unknown() {
        let converter = Converter::default();
        let doc = Document::new();
        let err = converter
            .convert_named("sparkles", &doc, &Node::paragraph("x"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown transform: sparkles");
    }

    #[test]
    fn test_convert_block_rejects_inline() {
        let converter = Converter::default();
        let doc = Document::new();
        let node = Node::new(NodeKind::InlineBreak).with_plain_text("x");
        assert_eq!(
            converter.convert_block(&doc, &node),
            Err(RenderError::NotABlock(NodeKind::InlineBreak))
        );
        let result = converter
            .convert_block(&doc, &Node::new(NodeKind::ThematicBreak))
            .unwrap();
        assert_eq!(result.html, "<hr>");
    }

    #[test]
    fn test_embedded_transform_ignores_node() {
        let converter = Converter::default();
        let doc = Document::new().with_block(Node::paragraph("body")).prepared();
        let result = converter
            .convert_named("embedded", &doc, &Node::paragraph("ignored"))
            .unwrap();
        assert_eq!(result.html, "<p>body</p>");
    }
}
