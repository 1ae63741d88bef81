//! HTML converter for Waterlens document trees.
//!
//! This crate turns a prepared [`wl_document::Document`] into HTML, either as
//! a complete page or as an embeddable fragment.
//!
//! # Architecture
//!
//! A [`Converter`] holds configuration only. Every conversion creates a
//! short-lived render state that walks the tree by exhaustive `match` over
//! [`wl_document::NodeKind`]:
//! - block nodes become block markup (sections, lists, tables, admonitions)
//! - inline nodes become spans, links and images
//! - cross-references borrow their text from the referenced node, guarded
//!   against reference cycles with [`XrefGuard`]
//!
//! Syntax highlighting is delegated to an injected [`SyntaxHighlighter`];
//! the `wl-highlight` crate ships a highlight.js adapter.
//!
//! Rendering never fails. Unresolved references fall back to `[id]`, and
//! unreadable files or misplaced nodes degrade to fallback markup; each such
//! problem is logged with `tracing` and collected in
//! [`RenderResult::warnings`]. Only named dispatch with an unknown name
//! returns a [`RenderError`].
//!
//! # Example
//!
//! ```
//! use wl_document::{Document, Node, NodeKind};
//! use wl_html::{Converter, ConverterOptions};
//!
//! let doc = Document::new()
//!     .with_plain_title("Guide")
//!     .with_block(
//!         Node::new(NodeKind::Section)
//!             .with_level(1)
//!             .with_id("intro")
//!             .with_plain_title("Introduction")
//!             .with_block(Node::paragraph("hello")),
//!     )
//!     .prepared();
//!
//! let converter = Converter::new(ConverterOptions::default());
//! let result = converter.convert(&doc);
//! assert!(result.html.starts_with("<!DOCTYPE html>"));
//! assert!(result.html.contains(r#"<h2 id="intro">Introduction</h2>"#));
//! assert!(result.warnings.is_empty());
//! ```

mod attrs;
mod block;
mod chrome;
mod converter;
mod dispatch;
mod document;
mod error;
mod highlighter;
mod inline;
mod list;
mod options;
mod table;
mod xref;

pub use attrs::{ClassList, escape_html, escape_text};
pub use converter::{Converter, RenderResult};
pub use dispatch::Transform;
pub use error::RenderError;
pub use highlighter::{CodeTags, DocinfoContext, FormatOptions, SyntaxHighlighter};
pub use options::ConverterOptions;
pub use xref::XrefGuard;
