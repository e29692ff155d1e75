#![forbid(unsafe_code)]

//! Runtime: reactive cells, virtual nodes, rendering, reconciliation, and the
//! application dispatcher.
//!
//! A write to a mutable cell re-runs the view and reconciles the new virtual
//! tree against the previous one, mutating the live [`fdom_core::Document`]
//! in place. One write, one pass.

pub mod app;
pub mod error;
pub mod options;
pub mod reactive;
pub mod reconcile;
pub mod render;
pub mod value;
pub mod vnode;

pub use app::{App, MountTarget};
pub use error::{Error, Result};
pub use options::{Hook, Hooks, Options, ViewFn, Watcher};
pub use reactive::{
    CellInit, CellKind, ComputeFn, DerivedCell, Method, MutableCell, ReactiveCell, State,
    computed, reactive,
};
pub use reconcile::{Decision, decide, reconcile, reconcile_blocking};
pub use render::{render, render_element};
pub use value::Value;
pub use vnode::{Children, Handler, PropValue, Props, VChild, VNode, event_name, h, handler};
