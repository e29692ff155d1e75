use fdom_core::DomError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no view function configured")]
    MissingView,

    #[error("mount target not found: {selector}")]
    MountTargetNotFound { selector: String },

    #[error("no element matches selector: {selector}")]
    NoMatch { selector: String },

    #[error("mount target is not an element in the document")]
    InvalidMountNode,

    #[error("no mount target given and no `el` option configured")]
    NoMountTarget,

    #[error("unknown state cell: {name}")]
    UnknownCell { name: String },

    #[error("state cell is read-only: {name}")]
    ReadOnlyCell { name: String },

    #[error("unknown method: {name}")]
    UnknownMethod { name: String },

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("{message}")]
    Callback { message: String },
}

impl Error {
    /// Error raised by user code (handlers, hooks, watchers, methods).
    #[must_use]
    pub fn callback(message: impl Into<String>) -> Self {
        Self::Callback {
            message: message.into(),
        }
    }
}
