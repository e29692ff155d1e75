#![forbid(unsafe_code)]

//! Demo application: a counter and a todo list mounted into an in-memory
//! document and driven by simulated clicks and input events.

pub mod cli;
pub mod error;
pub mod todo_app;

pub use cli::{Cli, run, run_from_env};
pub use error::{DemoError, Result};
