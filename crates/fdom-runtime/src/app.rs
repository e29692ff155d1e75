#![forbid(unsafe_code)]

//! The dispatcher: owns state, the current tree snapshot and the live root,
//! and turns every mutable-cell write into one render pass.
//!
//! # Design
//!
//! `App::new` installs a notification callback on each mutable cell. The
//! callback holds a weak handle to the application, so cells never keep it
//! alive. A write then runs one pass:
//!
//! 1. the current tree becomes `previous`;
//! 2. the view produces `next`, which becomes current;
//! 3. `previous → next` is reconciled against the live root and the
//!    (possibly replaced) root is recorded;
//! 4. `updated` runs, then the watcher for the written cell.
//!
//! # Invariants
//!
//! 1. Exactly one pass per write once mounted; writes before mount render
//!    nothing.
//! 2. Passes never overlap. A write made from inside a pass (view, hook,
//!    watcher) is queued and gets its own pass, in FIFO order, after the
//!    current one finishes.
//! 3. The live root is always the single child the app placed in its
//!    mount target.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use ahash::AHashMap;
use fdom_core::{Document, DomError, Event, NodeId, NodeKind, SharedDocument};
use futures::executor::block_on;
use tracing::field;
use web_time::Instant;

use crate::error::{Error, Result};
use crate::options::{Hook, Hooks, Options, ViewFn, Watcher};
use crate::reactive::{ReactiveCell, State};
use crate::reconcile::reconcile;
use crate::render::render;
use crate::vnode::VChild;

/// Where [`App::mount_to`] places the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountTarget {
    /// The `el` option.
    Default,
    Node(NodeId),
    Selector(String),
}

impl From<NodeId> for MountTarget {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl From<&str> for MountTarget {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_owned())
    }
}

impl From<String> for MountTarget {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl fmt::Display for MountTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("el"),
            Self::Node(id) => write!(f, "{id:?}"),
            Self::Selector(selector) => f.write_str(selector),
        }
    }
}

struct AppInner {
    doc: SharedDocument,
    state: State,
    view: Option<ViewFn>,
    el: Option<String>,
    watchers: AHashMap<String, Watcher>,
    hooks: Hooks,
    mounted: Cell<bool>,
    target: Cell<Option<NodeId>>,
    root: Cell<Option<NodeId>>,
    tree: RefCell<Option<VChild>>,
    in_pass: Cell<bool>,
    pending: RefCell<VecDeque<String>>,
}

/// Clears the in-pass flag even when a pass unwinds.
struct PassGuard<'a>(&'a Cell<bool>);

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

fn run_hook(hook: Option<&Hook>, state: &State) -> Result<()> {
    match hook {
        Some(hook) => hook(state),
        None => Ok(()),
    }
}

impl AppInner {
    fn on_write(&self, name: &str) -> Result<()> {
        if !self.mounted.get() {
            tracing::debug!(cell = name, "write before mount; nothing rendered");
            return Ok(());
        }
        if self.in_pass.get() {
            let mut pending = self.pending.borrow_mut();
            pending.push_back(name.to_owned());
            tracing::debug!(cell = name, queued = pending.len(), "write queued behind running pass");
            return Ok(());
        }

        self.in_pass.set(true);
        let _reset = PassGuard(&self.in_pass);
        let mut result = self.run_pass(name);
        while result.is_ok() {
            let Some(next) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            result = self.run_pass(&next);
        }
        if result.is_err() {
            self.pending.borrow_mut().clear();
        }
        result
    }

    fn run_pass(&self, name: &str) -> Result<()> {
        let span = tracing::debug_span!("fdom.pass", cell = name, pass_duration_us = field::Empty);
        let _guard = span.enter();
        let start = Instant::now();

        let view = self.view.as_ref().ok_or(Error::MissingView)?;
        let next = VChild::from(view(&self.state));
        let previous = self.tree.replace(Some(next.clone()));
        let root = block_on(reconcile(
            &self.doc,
            self.root.get(),
            previous.as_ref(),
            Some(&next),
            &self.state,
        ))?;
        self.root.set(root);

        let elapsed_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        span.record("pass_duration_us", elapsed_us);

        run_hook(self.hooks.updated.as_ref(), &self.state)?;
        if let Some(watcher) = self.watchers.get(name) {
            watcher(&self.state, &self.state.value(name))?;
        }
        Ok(())
    }

    fn resolve_target(&self, target: MountTarget) -> Result<NodeId> {
        let doc = self.doc.borrow();
        let selector = match target {
            MountTarget::Node(id) => {
                return match doc.kind(id) {
                    Ok(NodeKind::Element) => Ok(id),
                    _ => Err(Error::InvalidMountNode),
                };
            }
            MountTarget::Selector(selector) => selector,
            MountTarget::Default => self.el.clone().ok_or(Error::NoMountTarget)?,
        };
        doc.query_selector(&selector)?
            .ok_or(Error::MountTargetNotFound { selector })
    }
}

/// Detach the previously mounted root, then make `root` the only child of
/// `target`.
fn place_root(
    doc: &mut Document,
    previous: Option<NodeId>,
    target: NodeId,
    root: Option<NodeId>,
) -> std::result::Result<(), DomError> {
    if let Some(old) = previous {
        if let Some(parent) = doc.parent(old) {
            doc.remove_child(parent, old)?;
        }
    }
    doc.clear_children(target)?;
    if let Some(root) = root {
        doc.append_child(target, root)?;
    }
    Ok(())
}

/// A mounted (or mountable) application.
#[derive(Clone)]
pub struct App {
    inner: Rc<AppInner>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("state", &self.inner.state)
            .field("mounted", &self.inner.mounted.get())
            .field("target", &self.inner.target.get())
            .field("root", &self.inner.root.get())
            .finish_non_exhaustive()
    }
}

impl App {
    /// Build the state, wire cell notifications, and run `created`.
    pub fn new(doc: SharedDocument, mut options: Options) -> Result<Self> {
        let state = options.build_state();
        let inner = Rc::new(AppInner {
            doc,
            state,
            view: options.view.take(),
            el: options.el.take(),
            watchers: std::mem::take(&mut options.watch),
            hooks: std::mem::take(&mut options.hooks),
            mounted: Cell::new(false),
            target: Cell::new(None),
            root: Cell::new(None),
            tree: RefCell::new(None),
            in_pass: Cell::new(false),
            pending: RefCell::new(VecDeque::new()),
        });

        for (name, cell) in inner.state.cells() {
            if let ReactiveCell::Mutable(cell) = cell {
                let app: Weak<AppInner> = Rc::downgrade(&inner);
                let name = name.to_owned();
                cell.set_notify(move || match app.upgrade() {
                    Some(app) => app.on_write(&name),
                    None => Ok(()),
                });
            }
        }

        run_hook(inner.hooks.created.as_ref(), &inner.state)?;
        Ok(Self { inner })
    }

    /// Mount into the `el` target.
    pub fn mount(&self) -> Result<&Self> {
        self.mount_to(MountTarget::Default)
    }

    /// Render the view and make it the only child of `target`.
    ///
    /// Mounting again moves the application: the previous root is removed
    /// from its old target, so the app never owns more than one subtree. A
    /// target inside the current root is rejected.
    pub fn mount_to(&self, target: impl Into<MountTarget>) -> Result<&Self> {
        let target = target.into();
        let span = tracing::debug_span!("fdom.mount", target = %target);
        let _guard = span.enter();

        let inner = &self.inner;
        let view = inner.view.as_ref().ok_or(Error::MissingView)?;
        let target = inner.resolve_target(target)?;
        let previous = inner.root.get().filter(|&old| inner.doc.borrow().contains(old));
        if let Some(old) = previous {
            if inner.doc.borrow().ancestors(target)?.contains(&old) {
                return Err(Error::InvalidMountNode);
            }
        }
        let tree = VChild::from(view(&inner.state));
        let root = {
            let mut doc = inner.doc.borrow_mut();
            let root = render(&mut doc, Some(&tree), &inner.state)?;
            if let Err(err) = place_root(&mut doc, previous, target, root) {
                if let Some(root) = root {
                    doc.discard(root)?;
                }
                return Err(err.into());
            }
            root
        };

        inner.tree.replace(Some(tree));
        inner.target.set(Some(target));
        inner.root.set(root);
        inner.mounted.set(true);
        tracing::debug!(?root, "mounted");

        run_hook(inner.hooks.mounted.as_ref(), &inner.state)?;
        Ok(self)
    }

    /// Dispatch a host event at `node`, bubbling to the body.
    ///
    /// Returns the number of listeners invoked. An error raised by a handler
    /// comes back as the handler's own [`Error`].
    pub fn dispatch(&self, node: NodeId, event: &Event) -> Result<usize> {
        fdom_core::dispatch(&self.inner.doc, node, event).map_err(|err| match err {
            DomError::Listener { event, source } => match source.downcast::<Error>() {
                Ok(err) => *err,
                Err(source) => Error::Dom(DomError::Listener { event, source }),
            },
            other => Error::Dom(other),
        })
    }

    /// Dispatch `event` at the first element matching `selector` under the
    /// mount target.
    pub fn dispatch_selector(&self, selector: &str, event: &Event) -> Result<usize> {
        let node = self
            .query(selector)?
            .ok_or_else(|| Error::NoMatch {
                selector: selector.to_owned(),
            })?;
        self.dispatch(node, event)
    }

    /// First element under the mount target matching `selector`.
    pub fn query(&self, selector: &str) -> Result<Option<NodeId>> {
        let doc = self.inner.doc.borrow();
        let root = self.inner.target.get().unwrap_or_else(|| doc.body());
        Ok(doc.query_selector_from(root, selector)?)
    }

    /// Serialized content of the mount target; empty before mount.
    pub fn html(&self) -> Result<String> {
        match self.inner.target.get() {
            Some(target) => Ok(self.inner.doc.borrow().inner_html(target)?),
            None => Ok(String::new()),
        }
    }

    #[must_use]
    pub fn state(&self) -> &State {
        &self.inner.state
    }

    #[must_use]
    pub fn document(&self) -> &SharedDocument {
        &self.inner.doc
    }

    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.inner.root.get()
    }

    #[must_use]
    pub fn target(&self) -> Option<NodeId> {
        self.inner.target.get()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    /// The tree produced by the most recent render.
    #[must_use]
    pub fn current_tree(&self) -> Option<VChild> {
        self.inner.tree.borrow().clone()
    }
}
