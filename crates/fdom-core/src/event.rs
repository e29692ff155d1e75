#![forbid(unsafe_code)]

//! Events and listener dispatch.
//!
//! Dispatch follows the bubbling half of the DOM event model: listeners on
//! the target run first, then each ancestor's, up to the body. A listener may
//! call [`Event::stop_propagation`] to keep the event from reaching further
//! ancestors; remaining listeners on the current node still run.
//!
//! The propagation path is computed before any listener runs. Listeners are
//! free to mutate the document (a re-render triggered from a click handler is
//! the normal case), so the document is never borrowed while one executes.

use std::cell::Cell;
use std::rc::Rc;

use crate::dom::{NodeId, SharedDocument};
use crate::error::{DomError, Result};

/// Error type returned by listeners. Kept opaque so that higher layers can
/// carry their own error types through dispatch and recover them afterwards.
pub type ListenerError = Box<dyn std::error::Error + 'static>;

/// Event callback stored on an element.
pub type Listener = Rc<dyn Fn(&Event) -> std::result::Result<(), ListenerError>>;

/// Wrap a closure as a [`Listener`].
pub fn listener(
    f: impl Fn(&Event) -> std::result::Result<(), ListenerError> + 'static,
) -> Listener {
    Rc::new(f)
}

#[derive(Debug, Clone)]
pub struct Event {
    name: String,
    data: Option<String>,
    target: Cell<Option<NodeId>>,
    current_target: Cell<Option<NodeId>>,
    propagation_stopped: Cell<bool>,
}

impl Event {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: None,
            target: Cell::new(None),
            current_target: Cell::new(None),
            propagation_stopped: Cell::new(false),
        }
    }

    /// Attach a payload, such as the current value of an input.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// The node the event was dispatched to.
    #[must_use]
    pub fn target(&self) -> Option<NodeId> {
        self.target.get()
    }

    /// The node whose listener is currently running.
    #[must_use]
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target.get()
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    #[must_use]
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

/// Dispatch `event` at `target`, bubbling to the root.
///
/// Returns the number of listeners invoked. The first listener error aborts
/// dispatch and is returned as [`DomError::Listener`].
pub fn dispatch(doc: &SharedDocument, target: NodeId, event: &Event) -> Result<usize> {
    let path = doc.borrow().ancestors(target)?;
    event.target.set(Some(target));

    let mut invoked = 0;
    for node in path {
        let listeners = doc.borrow().listeners(node, event.name());
        event.current_target.set(Some(node));
        for listener in listeners {
            listener(event).map_err(|source| DomError::Listener {
                event: event.name().to_owned(),
                source,
            })?;
            invoked += 1;
        }
        if event.is_propagation_stopped() {
            break;
        }
    }
    event.current_target.set(None);
    Ok(invoked)
}
