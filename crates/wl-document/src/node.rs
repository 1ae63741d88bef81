//! Document nodes.
//!
//! A [`Node`] is a single struct shared by every block and inline kind. The
//! [`NodeKind`] tag decides which fields a renderer looks at; all other
//! fields stay empty.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::table::{DlistEntry, Table};

/// Sequence of inline nodes (the rendered text of a block, title, or cell).
pub type Inlines = Vec<Node>;

/// Semantic kind of a node.
///
/// The set is closed: every kind the converter understands is listed here and
/// dispatch is an exhaustive `match`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum NodeKind {
    Document,
    Section,
    Preamble,
    #[default]
    Paragraph,
    Admonition,
    Audio,
    Colist,
    Dlist,
    Example,
    FloatingTitle,
    Image,
    Listing,
    Literal,
    Stem,
    Olist,
    Open,
    PageBreak,
    Pass,
    Quote,
    Sidebar,
    Table,
    ThematicBreak,
    Ulist,
    Verse,
    Video,
    ListItem,
    Text,
    InlineAnchor,
    InlineBreak,
    InlineButton,
    InlineCallout,
    InlineFootnote,
    InlineImage,
    InlineIndexterm,
    InlineKbd,
    InlineMenu,
    InlineQuoted,
}

impl NodeKind {
    /// All kinds, in declaration order.
    pub const ALL: [NodeKind; 37] = [
        Self::Document,
        Self::Section,
        Self::Preamble,
        Self::Paragraph,
        Self::Admonition,
        Self::Audio,
        Self::Colist,
        Self::Dlist,
        Self::Example,
        Self::FloatingTitle,
        Self::Image,
        Self::Listing,
        Self::Literal,
        Self::Stem,
        Self::Olist,
        Self::Open,
        Self::PageBreak,
        Self::Pass,
        Self::Quote,
        Self::Sidebar,
        Self::Table,
        Self::ThematicBreak,
        Self::Ulist,
        Self::Verse,
        Self::Video,
        Self::ListItem,
        Self::Text,
        Self::InlineAnchor,
        Self::InlineBreak,
        Self::InlineButton,
        Self::InlineCallout,
        Self::InlineFootnote,
        Self::InlineImage,
        Self::InlineIndexterm,
        Self::InlineKbd,
        Self::InlineMenu,
        Self::InlineQuoted,
    ];

    /// Canonical snake_case name (e.g. `floating_title`, `inline_anchor`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Section => "section",
            Self::Preamble => "preamble",
            Self::Paragraph => "paragraph",
            Self::Admonition => "admonition",
            Self::Audio => "audio",
            Self::Colist => "colist",
            Self::Dlist => "dlist",
            Self::Example => "example",
            Self::FloatingTitle => "floating_title",
            Self::Image => "image",
            Self::Listing => "listing",
            Self::Literal => "literal",
            Self::Stem => "stem",
            Self::Olist => "olist",
            Self::Open => "open",
            Self::PageBreak => "page_break",
            Self::Pass => "pass",
            Self::Quote => "quote",
            Self::Sidebar => "sidebar",
            Self::Table => "table",
            Self::ThematicBreak => "thematic_break",
            Self::Ulist => "ulist",
            Self::Verse => "verse",
            Self::Video => "video",
            Self::ListItem => "list_item",
            Self::Text => "text",
            Self::InlineAnchor => "inline_anchor",
            Self::InlineBreak => "inline_break",
            Self::InlineButton => "inline_button",
            Self::InlineCallout => "inline_callout",
            Self::InlineFootnote => "inline_footnote",
            Self::InlineImage => "inline_image",
            Self::InlineIndexterm => "inline_indexterm",
            Self::InlineKbd => "inline_kbd",
            Self::InlineMenu => "inline_menu",
            Self::InlineQuoted => "inline_quoted",
        }
    }

    /// Whether this kind only appears inside inline content.
    #[must_use]
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            Self::Text
                | Self::InlineAnchor
                | Self::InlineBreak
                | Self::InlineButton
                | Self::InlineCallout
                | Self::InlineFootnote
                | Self::InlineImage
                | Self::InlineIndexterm
                | Self::InlineKbd
                | Self::InlineMenu
                | Self::InlineQuoted
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a kind name is not part of [`NodeKind`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown node kind: {}", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for NodeKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_owned()))
    }
}

/// Value of a named attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum AttrValue {
    Str(String),
    List(Vec<String>),
}

impl AttrValue {
    /// String value, `None` for lists.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// List value; a string is treated as a one-element list.
    #[must_use]
    pub fn as_list(&self) -> Vec<&str> {
        match self {
            Self::Str(s) => vec![s.as_str()],
            Self::List(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<&[&str]> for AttrValue {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(|s| (*s).to_owned()).collect())
    }
}

/// Sparse named attribute map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Attributes(BTreeMap<String, AttrValue>);

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        self.0.remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    /// String value of `name`.
    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(AttrValue::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Whether `name` is set to exactly `expected`.
    #[must_use]
    pub fn is(&self, name: &str, expected: &str) -> bool {
        self.str(name) == Some(expected)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A node of the document tree.
///
/// Fields are public so a parser can fill them directly; the `with_*`
/// builders cover the common cases.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Node {
    pub kind: NodeKind,
    pub id: Option<String>,
    /// Block style or variant (e.g. `source`, `qanda`, `abstract`).
    pub style: Option<String>,
    pub roles: Vec<String>,
    pub title: Option<Inlines>,
    /// Caption prefix such as `Table 1. `, prepended to the title.
    pub caption: Option<String>,
    /// Section nesting level, also used by floating titles.
    pub level: usize,
    pub numbered: bool,
    /// Section number such as `1.2.`, assigned by [`Document::prepare`](crate::Document::prepare).
    pub sectnum: Option<String>,
    /// Section name: `section`, `chapter`, `appendix`, `part`.
    pub sectname: Option<String>,
    /// Inline sub-kind (`xref`, `link`, `icon`, `emphasis`, `visible`, ...).
    pub node_type: Option<String>,
    pub target: Option<String>,
    pub text: Option<Inlines>,
    /// Verbatim content (listing, literal, stem, pass) or the literal of a text node.
    pub source: Option<String>,
    pub blocks: Vec<Node>,
    pub items: Vec<Node>,
    pub entries: Vec<DlistEntry>,
    pub table: Option<Table>,
    pub attributes: Attributes,
    pub options: BTreeSet<String>,
}

impl Node {
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Plain text leaf.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text).with_source(text)
    }

    /// Paragraph with plain text content.
    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Paragraph).with_plain_text(text)
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: Inlines) -> Self {
        self.title = Some(title);
        self
    }

    #[must_use]
    pub fn with_plain_title(self, title: impl Into<String>) -> Self {
        self.with_title(vec![Self::plain(title)])
    }

    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    /// Mark a section as numbered.
    #[must_use]
    pub fn numbered(mut self) -> Self {
        self.numbered = true;
        self
    }

    #[must_use]
    pub fn with_sectname(mut self, name: impl Into<String>) -> Self {
        self.sectname = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_node_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: Inlines) -> Self {
        self.text = Some(text);
        self
    }

    #[must_use]
    pub fn with_plain_text(self, text: impl Into<String>) -> Self {
        self.with_text(vec![Self::plain(text)])
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_block(mut self, block: Node) -> Self {
        self.blocks.push(block);
        self
    }

    #[must_use]
    pub fn with_blocks(mut self, blocks: impl IntoIterator<Item = Node>) -> Self {
        self.blocks.extend(blocks);
        self
    }

    #[must_use]
    pub fn with_item(mut self, item: Node) -> Self {
        self.items.push(item);
        self
    }

    #[must_use]
    pub fn with_entry(mut self, entry: DlistEntry) -> Self {
        self.entries.push(entry);
        self
    }

    #[must_use]
    pub fn with_table(mut self, table: Table) -> Self {
        self.table = Some(table);
        self
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.insert(option.into());
        self
    }

    /// String value of a node-level attribute.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.str(name)
    }

    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }

    /// List value of a node-level attribute (a string counts as one element).
    #[must_use]
    pub fn attr_list(&self, name: &str) -> Vec<&str> {
        self.attributes
            .get(name)
            .map(AttrValue::as_list)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_option(&self, name: &str) -> bool {
        self.options.contains(name)
    }

    /// Roles joined by a single space, `None` when there are none.
    #[must_use]
    pub fn role(&self) -> Option<String> {
        let roles: Vec<&str> = self
            .roles
            .iter()
            .map(String::as_str)
            .filter(|r| !r.is_empty())
            .collect();
        if roles.is_empty() {
            None
        } else {
            Some(roles.join(" "))
        }
    }

    #[must_use]
    pub fn has_title(&self) -> bool {
        self.title.as_ref().is_some_and(|t| !t.is_empty())
    }

    #[must_use]
    pub fn has_text(&self) -> bool {
        self.text.as_ref().is_some_and(|t| !t.is_empty())
    }

    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.kind.is_inline()
    }

    /// Concatenated literal text of an inline sequence, markup-free.
    ///
    /// Used for sanitized titles (`<title>`) and alt-like plain values.
    #[must_use]
    pub fn plain_text(inlines: &[Node]) -> String {
        let mut out = String::new();
        for node in inlines {
            if let Some(source) = &node.source
                && node.kind == NodeKind::Text
            {
                out.push_str(source);
            }
            if let Some(text) = &node.text {
                out.push_str(&Self::plain_text(text));
            }
        }
        out
    }

    /// Visit this node and every descendant in document order.
    ///
    /// Order: the node itself, its title, its text, list items, description
    /// list entries, child blocks, then table cells.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Node)) {
        visit(self);
        if let Some(title) = &mut self.title {
            for node in title {
                node.walk_mut(visit);
            }
        }
        if let Some(text) = &mut self.text {
            for node in text {
                node.walk_mut(visit);
            }
        }
        for item in &mut self.items {
            item.walk_mut(visit);
        }
        for entry in &mut self.entries {
            for term in &mut entry.terms {
                term.walk_mut(visit);
            }
            if let Some(description) = &mut entry.description {
                description.walk_mut(visit);
            }
        }
        for block in &mut self.blocks {
            block.walk_mut(visit);
        }
        if let Some(table) = &mut self.table {
            for cell in table.cells_mut() {
                for paragraph in &mut cell.paragraphs {
                    for node in paragraph {
                        node.walk_mut(visit);
                    }
                }
                for block in &mut cell.blocks {
                    block.walk_mut(visit);
                }
            }
        }
    }
}
