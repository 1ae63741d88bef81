//! Converter error types.

use wl_document::NodeKind;

/// Error returned by named dispatch.
///
/// Rendering itself never fails: unresolved references, unknown inline
/// types and unreadable files degrade to fallback markup plus a warning.
/// Only asking for a transform that does not exist is an error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RenderError {
    /// No transform is registered under this name.
    #[error("Unknown transform: {0}")]
    UnknownTransform(String),
    /// An inline node was passed where a block transform was requested.
    #[error("Node kind {0} cannot be rendered as a block")]
    NotABlock(NodeKind),
}
