//! Document tree model for the Waterlens HTML converter.
//!
//! A parser builds a [`Document`] out of [`Node`]s, then calls
//! [`Document::prepare`] once to fill the [`Catalog`] (reference targets,
//! footnotes) and number sections. After that the tree is read-only and can
//! be rendered any number of times.
//!
//! With the `serde` feature the whole tree (de)serializes, so a parser in
//! another process can hand over a document as JSON.
//!
//! # Example
//!
//! ```
//! use wl_document::{Document, Node, NodeKind};
//!
//! let doc = Document::new()
//!     .with_plain_title("Notes")
//!     .with_block(
//!         Node::new(NodeKind::Section)
//!             .with_level(1)
//!             .with_id("intro")
//!             .with_plain_title("Introduction")
//!             .with_block(Node::paragraph("hello")),
//!     )
//!     .prepared();
//!
//! assert!(doc.catalog.get_ref("intro").is_some());
//! ```

mod document;
mod node;
mod prepare;
mod table;

pub use document::{Author, Catalog, Document, Footnote, Header, RefTarget};
pub use node::{AttrValue, Attributes, Inlines, Node, NodeKind, UnknownKind};
pub use prepare::FOOTNOTE_INDEX_ATTR;
pub use table::{Cell, CellStyle, Column, DlistEntry, HAlign, Row, Section as TableSection, Table, VAlign};
