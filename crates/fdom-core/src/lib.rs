#![forbid(unsafe_code)]

//! Core: the live document tree, events, selector lookup, and serialization.
//!
//! `fdom-core` is the host side of FrankenDOM. It plays the role a browser
//! document plays for a web renderer: it owns real nodes, validates tag and
//! attribute names, stores listeners, and dispatches events. It knows nothing
//! about virtual nodes or reactive state.

pub mod dom;
pub mod error;
pub mod event;
pub mod html;
pub mod selector;

pub use dom::{Document, DocumentStats, NodeId, NodeKind, SharedDocument};
pub use error::{DomError, Result};
pub use event::{Event, Listener, ListenerError, dispatch};
pub use selector::Selector;
