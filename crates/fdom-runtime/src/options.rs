#![forbid(unsafe_code)]

//! Application configuration.
//!
//! [`Options`] is a builder consumed by [`App::new`](crate::App::new). Every
//! callback receives the application's [`State`] explicitly.
//!
//! Cells are created in this order: the `state` factory's cells, then each
//! `data` entry, then each `computed` entry.

use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use crate::error::Result;
use crate::reactive::{ComputeFn, Method, ReactiveCell, State};
use crate::value::Value;
use crate::vnode::VNode;

/// Produces the virtual tree for the current state.
pub type ViewFn = Rc<dyn Fn(&State) -> VNode>;

/// Lifecycle callback (`created`, `mounted`, `updated`).
pub type Hook = Rc<dyn Fn(&State) -> Result<()>>;

/// Called with the new value after a pass triggered by the watched cell.
pub type Watcher = Rc<dyn Fn(&State, &Value) -> Result<()>>;

pub(crate) type StateFactory = Box<dyn FnOnce() -> Vec<(String, ReactiveCell)>>;

#[derive(Clone, Default)]
pub struct Hooks {
    pub created: Option<Hook>,
    pub mounted: Option<Hook>,
    pub updated: Option<Hook>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("created", &self.created.is_some())
            .field("mounted", &self.mounted.is_some())
            .field("updated", &self.updated.is_some())
            .finish()
    }
}

#[derive(Default)]
pub struct Options {
    pub(crate) el: Option<String>,
    pub(crate) view: Option<ViewFn>,
    pub(crate) state: Option<StateFactory>,
    pub(crate) data: Vec<(String, Value)>,
    pub(crate) computed: Vec<(String, ComputeFn)>,
    pub(crate) methods: Vec<(String, Method)>,
    pub(crate) watch: AHashMap<String, Watcher>,
    pub(crate) hooks: Hooks,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("el", &self.el)
            .field("view", &self.view.is_some())
            .field("state", &self.state.is_some())
            .field("data", &self.data)
            .field("computed", &self.computed.len())
            .field("methods", &self.methods.len())
            .field("watch", &self.watch.len())
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selector of the default mount target.
    #[must_use]
    pub fn el(mut self, selector: impl Into<String>) -> Self {
        self.el = Some(selector.into());
        self
    }

    #[must_use]
    pub fn view(mut self, view: impl Fn(&State) -> VNode + 'static) -> Self {
        self.view = Some(Rc::new(view));
        self
    }

    /// Factory returning the initial cells. Called once, from `App::new`.
    #[must_use]
    pub fn state<K, I, F>(mut self, factory: F) -> Self
    where
        K: Into<String> + 'static,
        I: IntoIterator<Item = (K, ReactiveCell)> + 'static,
        F: FnOnce() -> I + 'static,
    {
        self.state = Some(Box::new(move || {
            factory()
                .into_iter()
                .map(|(name, cell)| (name.into(), cell))
                .collect::<Vec<(String, ReactiveCell)>>()
        }));
        self
    }

    /// Declare a mutable cell.
    #[must_use]
    pub fn data(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.push((name.into(), value.into()));
        self
    }

    /// Declare a derived cell computed from the state on every read.
    #[must_use]
    pub fn computed(
        mut self,
        name: impl Into<String>,
        compute: impl Fn(&State) -> Value + 'static,
    ) -> Self {
        self.computed.push((name.into(), Rc::new(compute)));
        self
    }

    #[must_use]
    pub fn method(
        mut self,
        name: impl Into<String>,
        method: impl Fn(&State, &[Value]) -> Result<Value> + 'static,
    ) -> Self {
        self.methods.push((name.into(), Rc::new(method)));
        self
    }

    /// Watch a cell. A later watcher for the same name replaces the earlier one.
    #[must_use]
    pub fn watch(
        mut self,
        name: impl Into<String>,
        watcher: impl Fn(&State, &Value) -> Result<()> + 'static,
    ) -> Self {
        self.watch.insert(name.into(), Rc::new(watcher));
        self
    }

    #[must_use]
    pub fn created(mut self, hook: impl Fn(&State) -> Result<()> + 'static) -> Self {
        self.hooks.created = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn mounted(mut self, hook: impl Fn(&State) -> Result<()> + 'static) -> Self {
        self.hooks.mounted = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn updated(mut self, hook: impl Fn(&State) -> Result<()> + 'static) -> Self {
        self.hooks.updated = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn el_selector(&self) -> Option<&str> {
        self.el.as_deref()
    }

    #[must_use]
    pub fn has_view(&self) -> bool {
        self.view.is_some()
    }

    /// Consume the cell declarations and build the state.
    pub(crate) fn build_state(&mut self) -> State {
        let mut cells = self.state.take().map(|factory| factory()).unwrap_or_default();
        cells.extend(
            self.data
                .drain(..)
                .map(|(name, value)| (name, crate::reactive::reactive(value))),
        );
        State::build(
            cells,
            std::mem::take(&mut self.computed),
            std::mem::take(&mut self.methods),
        )
    }
}
