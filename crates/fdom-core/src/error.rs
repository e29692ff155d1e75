use thiserror::Error;

use crate::dom::NodeId;
use crate::event::ListenerError;

pub type Result<T> = std::result::Result<T, DomError>;

/// Failures reported by the live document.
///
/// These mirror the exceptions a browser document raises for the same calls
/// (`InvalidCharacterError`, `HierarchyRequestError`, `NotFoundError`, ...).
#[derive(Debug, Error)]
pub enum DomError {
    #[error("invalid tag name: {tag:?}")]
    InvalidTagName { tag: String },

    #[error("invalid attribute name: {name:?}")]
    InvalidAttributeName { name: String },

    #[error("node does not exist: {node:?}")]
    NodeNotFound { node: NodeId },

    #[error("node is not an element: {node:?}")]
    NotAnElement { node: NodeId },

    #[error("node is not a text node: {node:?}")]
    NotAText { node: NodeId },

    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("node has no parent: {node:?}")]
    Detached { node: NodeId },

    #[error("cannot insert {child:?} under {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("invalid selector: {selector:?}")]
    InvalidSelector { selector: String },

    #[error("listener for {event:?} failed: {source}")]
    Listener {
        event: String,
        #[source]
        source: ListenerError,
    },
}
