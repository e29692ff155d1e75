#![forbid(unsafe_code)]

//! Mutable and derived cells.
//!
//! Unlike a memoized `Computed`, a [`DerivedCell`] has no dependency graph and
//! no dirty flag: the function is the whole cell, and it is re-run on every
//! read. That keeps derived values correct without any invalidation signal at
//! the cost of recomputation, which is acceptable because reads happen once
//! per render.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::value::Value;

type Notify = Rc<dyn Fn() -> Result<()>>;

struct MutableInner {
    value: RefCell<Value>,
    notify: RefCell<Notify>,
}

/// A stored value with a notification callback.
///
/// Cloning a `MutableCell` creates a new handle to the **same** storage.
#[derive(Clone)]
pub struct MutableCell {
    inner: Rc<MutableInner>,
}

impl std::fmt::Debug for MutableCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutableCell")
            .field("value", &*self.inner.value.borrow())
            .finish()
    }
}

impl MutableCell {
    /// Create a cell whose notification callback does nothing.
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        let noop: Notify = Rc::new(|| Ok(()));
        Self {
            inner: Rc::new(MutableInner {
                value: RefCell::new(value.into()),
                notify: RefCell::new(noop),
            }),
        }
    }

    /// Current value (cloned).
    #[must_use]
    pub fn get(&self) -> Value {
        self.inner.value.borrow().clone()
    }

    /// Access the current value by reference without cloning.
    ///
    /// # Panics
    ///
    /// Panics if the closure writes to this same cell.
    pub fn with<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Store `value` and invoke the notification callback.
    ///
    /// There is no equality check: writing the current value notifies too.
    /// Errors from the callback (a failed re-render, a failing watcher) are
    /// returned to the writer.
    pub fn set(&self, value: impl Into<Value>) -> Result<()> {
        *self.inner.value.borrow_mut() = value.into();
        let notify = Rc::clone(&*self.inner.notify.borrow());
        notify()
    }

    /// Replace the notification callback.
    pub fn set_notify(&self, notify: impl Fn() -> Result<()> + 'static) {
        *self.inner.notify.borrow_mut() = Rc::new(notify);
    }

    /// Whether two handles share storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// A read-only cell computed on every read.
#[derive(Clone)]
pub struct DerivedCell {
    compute: Rc<dyn Fn() -> Value>,
}

impl std::fmt::Debug for DerivedCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedCell").finish_non_exhaustive()
    }
}

impl DerivedCell {
    #[must_use]
    pub fn new(compute: impl Fn() -> Value + 'static) -> Self {
        Self {
            compute: Rc::new(compute),
        }
    }

    #[must_use]
    pub fn get(&self) -> Value {
        (self.compute)()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Mutable,
    Derived,
}

/// A reactive cell: either mutable state or a derived value.
#[derive(Debug, Clone)]
pub enum ReactiveCell {
    Mutable(MutableCell),
    Derived(DerivedCell),
}

impl ReactiveCell {
    #[must_use]
    pub fn kind(&self) -> CellKind {
        match self {
            Self::Mutable(_) => CellKind::Mutable,
            Self::Derived(_) => CellKind::Derived,
        }
    }

    /// Read the cell. Derived cells run their function.
    #[must_use]
    pub fn value(&self) -> Value {
        match self {
            Self::Mutable(cell) => cell.get(),
            Self::Derived(cell) => cell.get(),
        }
    }

    #[must_use]
    pub fn as_mutable(&self) -> Option<&MutableCell> {
        match self {
            Self::Mutable(cell) => Some(cell),
            Self::Derived(_) => None,
        }
    }
}

/// Input to [`reactive`]: a plain value or a value-producing function.
#[derive(Clone)]
pub enum CellInit {
    Value(Value),
    Compute(Rc<dyn Fn() -> Value>),
}

impl CellInit {
    pub fn compute(f: impl Fn() -> Value + 'static) -> Self {
        Self::Compute(Rc::new(f))
    }
}

impl From<Value> for CellInit {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

macro_rules! cell_init_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for CellInit {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

cell_init_from!(&str, String, bool, i32, i64, u32, u64, f64);

/// Create a cell: mutable for a value, derived for a function.
pub fn reactive(init: impl Into<CellInit>) -> ReactiveCell {
    match init.into() {
        CellInit::Value(value) => ReactiveCell::Mutable(MutableCell::new(value)),
        CellInit::Compute(compute) => ReactiveCell::Derived(DerivedCell { compute }),
    }
}

/// Shorthand for `reactive(CellInit::compute(f))`.
pub fn computed(f: impl Fn() -> Value + 'static) -> ReactiveCell {
    reactive(CellInit::compute(f))
}
