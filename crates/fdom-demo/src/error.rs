use thiserror::Error;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("runtime error: {0}")]
    Runtime(#[from] fdom::runtime::Error),

    #[error("document error: {0}")]
    Dom(#[from] fdom::core::DomError),

    #[error("invalid log filter: {0}")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("element not found: {selector}")]
    MissingElement { selector: String },
}

impl DemoError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LogFilter(_) => 2,
            _ => 1,
        }
    }
}
