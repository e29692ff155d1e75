#![forbid(unsafe_code)]

//! The state mapping passed to views, hooks, watchers, handlers and methods.

use std::rc::{Rc, Weak};

use ahash::AHashMap;

use super::cell::{DerivedCell, ReactiveCell};
use crate::error::{Error, Result};
use crate::value::Value;

/// A method declared in options, callable through [`State::call`].
pub type Method = Rc<dyn Fn(&State, &[Value]) -> Result<Value>>;

/// A derived value declared in options; receives the state it belongs to.
pub type ComputeFn = Rc<dyn Fn(&State) -> Value>;

struct StateInner {
    cells: AHashMap<String, ReactiveCell>,
    order: Vec<String>,
    methods: AHashMap<String, Method>,
}

impl StateInner {
    fn insert(&mut self, name: String, cell: ReactiveCell) {
        if self.cells.insert(name.clone(), cell).is_none() {
            self.order.push(name);
        }
    }
}

/// Name → cell mapping shared by every callback of one application.
///
/// Cloning is cheap and yields a handle to the same cells.
#[derive(Clone)]
pub struct State {
    inner: Rc<StateInner>,
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("cells", &self.inner.order)
            .field("methods", &self.inner.methods.len())
            .finish()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new(std::iter::empty::<(String, ReactiveCell)>())
    }
}

impl State {
    /// Build a state from already-created cells.
    ///
    /// A name declared twice keeps its first position and its last cell.
    pub fn new<K, I>(cells: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ReactiveCell)>,
    {
        Self::build(cells, Vec::new(), Vec::new())
    }

    /// Build a state from cells, state-reading derived values and methods.
    ///
    /// Each derived value becomes a [`DerivedCell`] holding a weak handle
    /// back to the state, so reading it sees the current values of its
    /// siblings. Derived entries are inserted after the plain cells.
    pub fn build<K, I>(
        cells: I,
        computed: Vec<(String, ComputeFn)>,
        methods: Vec<(String, Method)>,
    ) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ReactiveCell)>,
    {
        let inner = Rc::new_cyclic(|weak: &Weak<StateInner>| {
            let mut inner = StateInner {
                cells: AHashMap::new(),
                order: Vec::new(),
                methods: methods.into_iter().collect(),
            };
            for (name, cell) in cells {
                inner.insert(name.into(), cell);
            }
            for (name, compute) in computed {
                let weak = weak.clone();
                let cell = DerivedCell::new(move || match weak.upgrade() {
                    Some(inner) => compute(&State { inner }),
                    None => Value::Null,
                });
                inner.insert(name, ReactiveCell::Derived(cell));
            }
            inner
        });
        Self { inner }
    }

    /// Read a cell by name.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.cell(name)
            .map(ReactiveCell::value)
            .ok_or_else(|| Error::UnknownCell {
                name: name.to_owned(),
            })
    }

    /// Read a cell by name, yielding `null` for unknown names.
    #[must_use]
    pub fn value(&self, name: &str) -> Value {
        self.cell(name).map_or(Value::Null, ReactiveCell::value)
    }

    /// Write a mutable cell by name. The write notifies (and re-renders)
    /// before this returns.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        match self.cell(name) {
            Some(ReactiveCell::Mutable(cell)) => cell.set(value),
            Some(ReactiveCell::Derived(_)) => Err(Error::ReadOnlyCell {
                name: name.to_owned(),
            }),
            None => Err(Error::UnknownCell {
                name: name.to_owned(),
            }),
        }
    }

    #[must_use]
    pub fn cell(&self, name: &str) -> Option<&ReactiveCell> {
        self.inner.cells.get(name)
    }

    /// Cell names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.order.iter().map(String::as_str)
    }

    /// `(name, cell)` pairs in declaration order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &ReactiveCell)> {
        self.inner
            .order
            .iter()
            .filter_map(|name| Some((name.as_str(), self.inner.cells.get(name)?)))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.cells.contains_key(name)
    }

    /// Invoke a declared method.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let method = self
            .inner
            .methods
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownMethod {
                name: name.to_owned(),
            })?;
        method(self, args)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.cells.is_empty()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
