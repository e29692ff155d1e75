#![forbid(unsafe_code)]

//! Virtual nodes and the [`h`] factory.
//!
//! A [`VNode`] is an immutable description of one element: a tag name, an
//! insertion-ordered property bag and a normalized child sequence. Every
//! render builds a fresh tree; nodes are shared through `Rc` so that a view
//! can hand back the same subtree twice and the reconciler can skip it by
//! reference.
//!
//! # Invariants
//!
//! 1. `children` is always a sequence. Falsy inputs (`None`, `false`,
//!    `null`, zero, NaN, the empty string) never reach it.
//! 2. A property whose name is `on` followed by an ASCII uppercase letter
//!    is an event property; every other property is an attribute.
//! 3. Two calls to [`h`] with equal arguments produce equal, distinct nodes.

use std::fmt;
use std::rc::Rc;

use fdom_core::Event;
use smallvec::SmallVec;

use crate::error::Result;
use crate::reactive::State;
use crate::value::{self, Value};

/// Event callback attached through an event property.
pub type Handler = Rc<dyn Fn(&State, &Event) -> Result<()>>;

/// Wrap a closure as a [`Handler`].
pub fn handler(f: impl Fn(&State, &Event) -> Result<()> + 'static) -> Handler {
    Rc::new(f)
}

/// Prefix marking an event property (`onClick`).
pub const EVENT_PREFIX: &str = "on";

/// Property name reserved for the reconciliation key.
pub const KEY_PROP: &str = "key";

/// Event name for an event property: `onClick` → `click`,
/// `onMouseMove` → `mouseMove`. `None` for attribute names.
#[must_use]
pub fn event_name(prop: &str) -> Option<String> {
    let rest = prop.strip_prefix(EVENT_PREFIX)?;
    let first = rest.chars().next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    let mut name = String::with_capacity(rest.len());
    name.push(first.to_ascii_lowercase());
    name.push_str(&rest[first.len_utf8()..]);
    Some(name)
}

#[must_use]
pub fn is_event_prop(prop: &str) -> bool {
    event_name(prop).is_some()
}

/// Value of one property.
#[derive(Clone)]
pub enum PropValue {
    Attr(Value),
    Handler(Handler),
}

impl PropValue {
    #[must_use]
    pub fn as_attr(&self) -> Option<&Value> {
        match self {
            Self::Attr(v) => Some(v),
            Self::Handler(_) => None,
        }
    }

    #[must_use]
    pub fn as_handler(&self) -> Option<&Handler> {
        match self {
            Self::Handler(h) => Some(h),
            Self::Attr(_) => None,
        }
    }
}

/// Handlers compare by identity.
impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Attr(a), Self::Attr(b)) => a == b,
            (Self::Handler(a), Self::Handler(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attr(v) => f.debug_tuple("Attr").field(v).finish(),
            Self::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

macro_rules! prop_from_attr {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for PropValue {
                fn from(value: $ty) -> Self {
                    Self::Attr(Value::from(value))
                }
            }
        )*
    };
}

prop_from_attr!(Value, &str, String, bool, i32, i64, u32, u64, f64);

/// Insertion-ordered property bag.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct Props {
    entries: SmallVec<[(String, PropValue); 4]>,
}

impl Props {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an attribute property.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, PropValue::Attr(value.into()));
        self
    }

    /// Add or replace a property holding a handler. `name` is the full
    /// property name, e.g. `"onClick"`.
    #[must_use]
    pub fn handler(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&State, &Event) -> Result<()> + 'static,
    ) -> Self {
        self.insert(name, PropValue::Handler(Rc::new(f)));
        self
    }

    /// Add a handler for `event`; the property name is built from it
    /// (`on("click", ..)` → `onClick`).
    #[must_use]
    pub fn on(
        self,
        event: &str,
        f: impl Fn(&State, &Event) -> Result<()> + 'static,
    ) -> Self {
        let mut name = String::with_capacity(EVENT_PREFIX.len() + event.len());
        name.push_str(EVENT_PREFIX);
        let mut chars = event.chars();
        if let Some(first) = chars.next() {
            name.push(first.to_ascii_uppercase());
            name.push_str(chars.as_str());
        }
        self.handler(name, f)
    }

    /// Shorthand for `attr("key", value)`.
    #[must_use]
    pub fn with_key(self, key: impl Into<Value>) -> Self {
        self.attr(KEY_PROP, key)
    }

    /// Insert a property, replacing an existing one in place.
    pub fn insert(&mut self, name: impl Into<String>, value: PropValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `key` property, if set.
    #[must_use]
    pub fn key(&self) -> Option<&PropValue> {
        self.get(KEY_PROP)
    }
}

impl From<()> for Props {
    fn from((): ()) -> Self {
        Self::new()
    }
}

impl From<Option<Props>> for Props {
    fn from(props: Option<Props>) -> Self {
        props.unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Self::new();
        for (name, value) in iter {
            props.insert(name, value.into());
        }
        props
    }
}

impl<K: Into<String>, V: Into<PropValue>, const N: usize> From<[(K, V); N]> for Props {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// One element of the virtual tree.
#[derive(Clone, PartialEq, Debug)]
pub struct VNode {
    tag: String,
    props: Props,
    children: Vec<VChild>,
}

impl VNode {
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn props(&self) -> &Props {
        &self.props
    }

    #[must_use]
    pub fn children(&self) -> &[VChild] {
        &self.children
    }

    #[must_use]
    pub fn key(&self) -> Option<&PropValue> {
        self.props.key()
    }
}

/// A position in the virtual tree: an element or a text run.
#[derive(Clone, PartialEq, Debug)]
pub enum VChild {
    Element(Rc<VNode>),
    Text(String),
}

impl VChild {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub fn as_element(&self) -> Option<&Rc<VNode>> {
        match self {
            Self::Element(node) => Some(node),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Element(_) => None,
        }
    }
}

impl From<VNode> for VChild {
    fn from(node: VNode) -> Self {
        Self::Element(Rc::new(node))
    }
}

impl From<Rc<VNode>> for VChild {
    fn from(node: Rc<VNode>) -> Self {
        Self::Element(node)
    }
}

/// Normalized child list accepted by [`h`].
#[derive(Clone, Default, PartialEq, Debug)]
pub struct Children(Vec<VChild>);

impl Children {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append children, dropping falsy ones.
    pub fn push(&mut self, children: impl Into<Children>) {
        self.0.extend(children.into().0);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VChild> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<VChild> {
        self.0
    }

    fn one(child: VChild) -> Self {
        Self(vec![child])
    }
}

impl From<()> for Children {
    fn from((): ()) -> Self {
        Self::new()
    }
}

impl From<&str> for Children {
    fn from(text: &str) -> Self {
        Self::from(text.to_owned())
    }
}

impl From<&String> for Children {
    fn from(text: &String) -> Self {
        Self::from(text.clone())
    }
}

impl From<String> for Children {
    fn from(text: String) -> Self {
        if text.is_empty() {
            Self::new()
        } else {
            Self::one(VChild::Text(text))
        }
    }
}

impl From<VNode> for Children {
    fn from(node: VNode) -> Self {
        Self::one(node.into())
    }
}

impl From<Rc<VNode>> for Children {
    fn from(node: Rc<VNode>) -> Self {
        Self::one(VChild::Element(node))
    }
}

impl From<VChild> for Children {
    fn from(child: VChild) -> Self {
        match child {
            VChild::Text(text) => Self::from(text),
            element => Self::one(element),
        }
    }
}

/// Arrays are flattened; other truthy values become their text form.
impl From<Value> for Children {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => items.into_iter().collect(),
            Value::String(text) => Self::from(text),
            other if value::is_truthy(&other) => Self::one(VChild::Text(value::to_text(&other))),
            _ => Self::new(),
        }
    }
}

macro_rules! children_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Children {
                fn from(value: $ty) -> Self {
                    Self::from(Value::from(value))
                }
            }
        )*
    };
}

children_from_scalar!(bool, i32, i64, u32, u64, f64);

impl<T: Into<Children>> From<Option<T>> for Children {
    fn from(child: Option<T>) -> Self {
        child.map(Into::into).unwrap_or_default()
    }
}

impl<T: Into<Children>> From<Vec<T>> for Children {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Into<Children>, const N: usize> From<[T; N]> for Children {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Into<Children>> FromIterator<T> for Children {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut children = Self::new();
        for item in iter {
            children.push(item);
        }
        children
    }
}

impl IntoIterator for Children {
    type Item = VChild;
    type IntoIter = std::vec::IntoIter<VChild>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Build a heterogeneous child list: `children!["label: ", h("b", (), name), cond.then(..)]`.
#[macro_export]
macro_rules! children {
    () => {
        $crate::vnode::Children::new()
    };
    ($($child:expr),+ $(,)?) => {{
        let mut children = $crate::vnode::Children::new();
        $(children.push($child);)+
        children
    }};
}

/// Create a virtual node.
pub fn h(tag: impl Into<String>, props: impl Into<Props>, children: impl Into<Children>) -> VNode {
    VNode {
        tag: tag.into(),
        props: props.into(),
        children: children.into().into_vec(),
    }
}
