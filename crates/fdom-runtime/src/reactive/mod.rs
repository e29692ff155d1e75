#![forbid(unsafe_code)]

//! Reactive cells and the state mapping handed to every callback.
//!
//! - [`ReactiveCell`]: a tagged cell, either [`MutableCell`] (stored value
//!   plus notification callback) or [`DerivedCell`] (value-producing function).
//! - [`reactive`]: the factory; a value yields a mutable cell, a function a
//!   derived one.
//! - [`State`]: the name → cell mapping, plus the method table declared in
//!   options.
//!
//! # Invariants
//!
//! 1. Every write to a mutable cell stores the value and then invokes the
//!    notification callback exactly once, even when the value is unchanged.
//! 2. The notification callback runs synchronously, after the new value is
//!    visible to readers.
//! 3. Derived cells never cache: each read calls the function again.
//! 4. Cells are shared handles; cloning a cell never copies its storage.

pub mod cell;
pub mod state;

pub use cell::{CellInit, CellKind, DerivedCell, MutableCell, ReactiveCell, computed, reactive};
pub use state::{ComputeFn, Method, State};
