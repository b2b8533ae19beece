//! Error types for document operations.

use crate::document::NodeId;

/// Errors raised by structural document operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// Node does not exist (never created or already destroyed).
    NodeNotFound(NodeId),
    /// The operation would make a node its own ancestor.
    HierarchyCycle { parent: NodeId, child: NodeId },
    /// `insert_before` reference node is not a child of the given parent.
    NotAChild { parent: NodeId, child: NodeId },
    /// The body element cannot be moved or destroyed.
    BodyImmutable,
    /// The layout engine rejected an update.
    Layout(String),
    /// Clearing the text selection failed on this platform.
    Selection,
}

impl std::fmt::Display for DomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomError::NodeNotFound(id) => write!(f, "Node {:?} not found", id),
            DomError::HierarchyCycle { parent, child } => {
                write!(f, "Cannot insert {:?} into its own descendant {:?}", child, parent)
            }
            DomError::NotAChild { parent, child } => {
                write!(f, "{:?} is not a child of {:?}", child, parent)
            }
            DomError::BodyImmutable => write!(f, "The body element cannot be moved or removed"),
            DomError::Layout(msg) => write!(f, "Layout error: {}", msg),
            DomError::Selection => write!(f, "Failed to clear the selection"),
        }
    }
}

impl std::error::Error for DomError {}

impl From<taffy::TaffyError> for DomError {
    fn from(err: taffy::TaffyError) -> Self {
        DomError::Layout(err.to_string())
    }
}

/// Result type for document operations.
pub type DomResult<T> = Result<T, DomError>;
