//! Document root, header and reference catalog.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::node::{Attributes, Inlines, Node, NodeKind};

/// A document author.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Author {
    pub name: String,
    pub email: Option<String>,
}

impl Author {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Document header: title (already split into main title and subtitle) and authors.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Header {
    pub title: Inlines,
    pub subtitle: Option<Inlines>,
    pub authors: Vec<Author>,
}

/// What the catalog knows about a cross-reference target.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RefTarget {
    pub kind: NodeKind,
    pub id: String,
    pub title: Option<Inlines>,
    pub reftext: Option<String>,
    pub caption: Option<String>,
    pub sectname: Option<String>,
    pub sectnum: Option<String>,
    pub numbered: bool,
    pub level: usize,
}

impl RefTarget {
    /// Catalog entry for a node carrying an id.
    #[must_use]
    pub fn from_node(id: &str, node: &Node) -> Self {
        Self {
            kind: node.kind,
            id: id.to_owned(),
            title: node.title.clone(),
            reftext: node.attr("reftext").map(str::to_owned),
            caption: node.caption.clone(),
            sectname: node.sectname.clone(),
            sectnum: node.sectnum.clone(),
            numbered: node.numbered,
            level: node.level,
        }
    }
}

/// A collected footnote definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Footnote {
    /// 1-based index in first-occurrence order.
    pub index: usize,
    pub id: Option<String>,
    pub text: Inlines,
}

/// Document-wide lookup tables filled by [`Document::prepare`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Catalog {
    pub refs: BTreeMap<String, RefTarget>,
    pub footnotes: Vec<Footnote>,
}

impl Catalog {
    #[must_use]
    pub fn get_ref(&self, id: &str) -> Option<&RefTarget> {
        self.refs.get(id)
    }

    #[must_use]
    pub fn footnote(&self, index: usize) -> Option<&Footnote> {
        index
            .checked_sub(1)
            .and_then(|i| self.footnotes.get(i))
    }
}

/// A parsed document.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Document {
    /// Root node; its `blocks` are the document body.
    pub root: Node,
    pub header: Option<Header>,
    pub attributes: Attributes,
    pub catalog: Catalog,
    /// Whether this document is nested inside another (e.g. an `asciidoc` table cell).
    pub nested: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            root: Node::new(NodeKind::Document),
            header: None,
            attributes: Attributes::new(),
            catalog: Catalog::default(),
            nested: false,
        }
    }
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: Inlines) -> Self {
        self.header.get_or_insert_with(Header::default).title = title;
        self
    }

    #[must_use]
    pub fn with_plain_title(self, title: impl Into<String>) -> Self {
        self.with_title(vec![Node::plain(title)])
    }

    #[must_use]
    pub fn with_subtitle(mut self, subtitle: Inlines) -> Self {
        self.header.get_or_insert_with(Header::default).subtitle = Some(subtitle);
        self
    }

    #[must_use]
    pub fn with_author(mut self, author: Author) -> Self {
        self.header
            .get_or_insert_with(Header::default)
            .authors
            .push(author);
        self
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name, value.into());
        self
    }

    #[must_use]
    pub fn with_block(mut self, block: Node) -> Self {
        self.root.blocks.push(block);
        self
    }

    #[must_use]
    pub fn with_blocks(mut self, blocks: impl IntoIterator<Item = Node>) -> Self {
        self.root.blocks.extend(blocks);
        self
    }

    /// Builder form of [`prepare`](Self::prepare).
    #[must_use]
    pub fn prepared(mut self) -> Self {
        self.prepare();
        self
    }

    /// Document attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.str(name)
    }

    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }

    /// `doctype` attribute, `article` when unset.
    #[must_use]
    pub fn doctype(&self) -> &str {
        self.attr("doctype").unwrap_or("article")
    }

    /// Main title inlines, if the document has a header title.
    #[must_use]
    pub fn title(&self) -> Option<&Inlines> {
        self.header
            .as_ref()
            .map(|h| &h.title)
            .filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn has_footnotes(&self) -> bool {
        !self.catalog.footnotes.is_empty()
    }

    /// Catalog entry describing the document root itself.
    #[must_use]
    pub fn root_target(&self) -> RefTarget {
        let mut target = RefTarget::from_node(self.root.id.as_deref().unwrap_or(""), &self.root);
        target.title = self.title().cloned();
        target
    }
}
