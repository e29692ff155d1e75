#![forbid(unsafe_code)]

//! Reconciliation of a live subtree from one virtual tree to the next.
//!
//! # Design
//!
//! [`decide`] is a pure classification of a `(prev, next)` pair; [`reconcile`]
//! applies the decision to the live node. Rules, first match wins:
//!
//! | Rule | Condition                             | Effect                         |
//! |------|---------------------------------------|--------------------------------|
//! | Keep | same element `Rc`, equal text, or both absent | nothing               |
//! | Replace | categories differ (element / text / absent) | fresh render in place |
//! | Text | both text, unequal                    | set the text content           |
//! | Replace | tag or `key` differs               | fresh render in place          |
//! | Patch | otherwise                            | props, then children           |
//!
//! A patch runs prop removal, prop addition/update, trailing-child
//! truncation, child reconciliation and trailing-child growth, in that
//! order. Child reconciliations of one parent are driven concurrently with
//! `join_all`; the parent resumes only after every child settles.
//!
//! # Invariants
//!
//! 1. Keep performs zero document mutations.
//! 2. The document is never borrowed across an await point.
//! 3. Handlers on an existing event property are never swapped; a handler
//!    is registered only when its property is new.

use futures::future::{self, FutureExt, LocalBoxFuture};
use std::rc::Rc;

use fdom_core::{DomError, NodeId, SharedDocument};

use crate::error::Result;
use crate::reactive::State;
use crate::render::{apply_prop, render};
use crate::vnode::{PropValue, VChild, VNode, event_name};

/// Classification of a `(prev, next)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Replace,
    Text,
    Patch,
}

#[must_use]
pub fn decide(prev: Option<&VChild>, next: Option<&VChild>) -> Decision {
    match (prev, next) {
        (None, None) => Decision::Keep,
        (Some(VChild::Text(a)), Some(VChild::Text(b))) => {
            if a == b {
                Decision::Keep
            } else {
                Decision::Text
            }
        }
        (Some(VChild::Element(a)), Some(VChild::Element(b))) => {
            if Rc::ptr_eq(a, b) {
                Decision::Keep
            } else if a.tag() != b.tag() || a.key() != b.key() {
                Decision::Replace
            } else {
                Decision::Patch
            }
        }
        _ => Decision::Replace,
    }
}

/// Bring `live` from `prev` to `next`.
///
/// Resolves to the live node now occupying the position: `live` itself
/// after a patch, the new node after a replacement, `None` after removal.
/// Without a live node there is nothing to patch, so `next` is rendered
/// detached and the caller places it.
pub fn reconcile<'a>(
    doc: &'a SharedDocument,
    live: Option<NodeId>,
    prev: Option<&'a VChild>,
    next: Option<&'a VChild>,
    ctx: &'a State,
) -> LocalBoxFuture<'a, Result<Option<NodeId>>> {
    async move {
        let decision = decide(prev, next);
        let Some(live) = live else {
            return match decision {
                Decision::Keep => Ok(None),
                _ => render(&mut doc.borrow_mut(), next, ctx),
            };
        };
        match decision {
            Decision::Keep => Ok(Some(live)),
            Decision::Replace => replace(doc, live, next, ctx),
            Decision::Text => {
                let text = next.and_then(VChild::as_text).unwrap_or_default();
                tracing::trace!(message = "reconcile.text", len = text.len());
                doc.borrow_mut().set_text(live, text)?;
                Ok(Some(live))
            }
            Decision::Patch => match (prev, next) {
                (Some(VChild::Element(prev)), Some(VChild::Element(next))) => {
                    patch(doc, live, prev, next, ctx).await?;
                    Ok(Some(live))
                }
                _ => replace(doc, live, next, ctx),
            },
        }
    }
    .boxed_local()
}

/// Drive [`reconcile`] to completion on the current thread.
pub fn reconcile_blocking(
    doc: &SharedDocument,
    live: Option<NodeId>,
    prev: Option<&VChild>,
    next: Option<&VChild>,
    ctx: &State,
) -> Result<Option<NodeId>> {
    futures::executor::block_on(reconcile(doc, live, prev, next, ctx))
}

fn replace(
    doc: &SharedDocument,
    live: NodeId,
    next: Option<&VChild>,
    ctx: &State,
) -> Result<Option<NodeId>> {
    let mut doc = doc.borrow_mut();
    let parent = doc.parent(live).ok_or(DomError::Detached { node: live })?;
    let fresh = render(&mut doc, next, ctx)?;
    tracing::trace!(message = "reconcile.replace", removed = fresh.is_none());
    match fresh {
        Some(fresh) => {
            if let Err(err) = doc.replace_child(parent, fresh, live) {
                doc.discard(fresh)?;
                return Err(err.into());
            }
        }
        None => doc.remove_child(parent, live)?,
    }
    Ok(fresh)
}

async fn patch(
    doc: &SharedDocument,
    live: NodeId,
    prev: &VNode,
    next: &VNode,
    ctx: &State,
) -> Result<()> {
    tracing::trace!(message = "reconcile.patch", tag = next.tag());
    let live_children = {
        let mut d = doc.borrow_mut();
        patch_props(&mut d, live, prev, next, ctx)?;

        let (prev_len, next_len) = (prev.children().len(), next.children().len());
        if prev_len > next_len {
            let excess = d.children(live)?.get(next_len..).map(<[NodeId]>::to_vec);
            for child in excess.unwrap_or_default() {
                d.remove_child(live, child)?;
            }
        }
        d.children(live)?.to_vec()
    };

    let pending = live_children.iter().enumerate().map(|(index, &child)| {
        reconcile(
            doc,
            Some(child),
            prev.children().get(index),
            next.children().get(index),
            ctx,
        )
    });
    for settled in future::join_all(pending).await {
        settled?;
    }

    let prev_len = prev.children().len();
    if next.children().len() > prev_len {
        let mut d = doc.borrow_mut();
        for child in &next.children()[prev_len..] {
            if let Some(id) = render(&mut d, Some(child), ctx)? {
                if let Err(err) = d.append_child(live, id) {
                    d.discard(id)?;
                    return Err(err.into());
                }
            }
        }
    }
    Ok(())
}

fn patch_props(
    doc: &mut fdom_core::Document,
    live: NodeId,
    prev: &VNode,
    next: &VNode,
    ctx: &State,
) -> Result<()> {
    for (name, _) in prev.props().iter() {
        if next.props().contains(name) {
            continue;
        }
        match event_name(name) {
            Some(event) => {
                doc.remove_event_listeners(live, &event)?;
            }
            None => {
                doc.remove_attribute(live, name)?;
            }
        }
    }

    for (name, value) in next.props().iter() {
        let old = prev.props().get(name);
        if old == Some(value) {
            continue;
        }
        if event_name(name).is_some() {
            if old.is_some() {
                continue;
            }
        } else if matches!(value, PropValue::Handler(_)) {
            continue;
        }
        apply_prop(doc, live, name, value, ctx)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vnode::{Props, h};
    use fdom_core::{Document, Event, dispatch};
    use std::cell::Cell;

    struct Mounted {
        doc: SharedDocument,
        root: NodeId,
        tree: VChild,
        state: State,
    }

    fn mount(tree: VNode) -> Mounted {
        let doc = Document::new_shared();
        let tree = VChild::from(tree);
        let state = State::default();
        let root = {
            let mut d = doc.borrow_mut();
            let root = render(&mut d, Some(&tree), &state).unwrap().unwrap();
            let body = d.body();
            d.append_child(body, root).unwrap();
            d.reset_stats();
            root
        };
        Mounted {
            doc,
            root,
            tree,
            state,
        }
    }

    impl Mounted {
        fn update(&mut self, next: VNode) -> Option<NodeId> {
            let next = VChild::from(next);
            let root = reconcile_blocking(
                &self.doc,
                Some(self.root),
                Some(&self.tree),
                Some(&next),
                &self.state,
            )
            .unwrap();
            self.tree = next;
            if let Some(root) = root {
                self.root = root;
            }
            root
        }

        fn html(&self) -> String {
            let d = self.doc.borrow();
            d.inner_html(d.body()).unwrap()
        }
    }

    #[test]
    fn decide_rules() {
        let a = VChild::from(h("div", (), ()));
        let b = VChild::from(h("div", (), "x"));
        let span = VChild::from(h("span", (), ()));
        let keyed = VChild::from(h("div", Props::new().with_key(1), ()));
        let t1 = VChild::text("a");
        let t2 = VChild::text("b");

        assert_eq!(decide(None, None), Decision::Keep);
        assert_eq!(decide(Some(&a), Some(&a.clone())), Decision::Keep);
        assert_eq!(decide(Some(&t1), Some(&VChild::text("a"))), Decision::Keep);
        assert_eq!(decide(Some(&t1), Some(&t2)), Decision::Text);
        assert_eq!(decide(Some(&t1), Some(&a)), Decision::Replace);
        assert_eq!(decide(Some(&a), None), Decision::Replace);
        assert_eq!(decide(None, Some(&a)), Decision::Replace);
        assert_eq!(decide(Some(&a), Some(&span)), Decision::Replace);
        assert_eq!(decide(Some(&a), Some(&keyed)), Decision::Replace);
        assert_eq!(decide(Some(&a), Some(&b)), Decision::Patch);
    }

    #[test]
    fn identical_reference_is_a_no_op() {
        let mut m = mount(h("div", Props::new().attr("id", "x"), vec![h("p", (), "a")]));
        let same = m.tree.clone();
        let root = reconcile_blocking(&m.doc, Some(m.root), Some(&m.tree), Some(&same), &m.state)
            .unwrap();
        assert_eq!(root, Some(m.root));
        assert_eq!(m.doc.borrow().stats().mutations(), 0);
        m.tree = same;
    }

    #[test]
    fn child_text_change_leaves_attributes_alone() {
        let mut m = mount(h("div", Props::new().attr("class", "c"), "old"));
        let root = m.root;
        m.update(h("div", Props::new().attr("class", "c"), "new"));
        let stats = m.doc.borrow().stats();
        assert_eq!(stats.attributes_set, 0);
        assert_eq!(stats.attributes_removed, 0);
        assert_eq!(stats.text_updates, 1);
        assert_eq!(stats.mutations(), 1);
        assert_eq!(m.root, root);
        assert_eq!(m.html(), r#"<div class="c">new</div>"#);
    }

    #[test]
    fn tag_change_replaces_in_place() {
        let mut m = mount(h("section", (), vec![h("div", (), "a"), h("div", (), "b")]));
        let old_first = m.doc.borrow().child_at(m.root, 0).unwrap();
        m.update(h("section", (), vec![h("p", (), "a"), h("div", (), "b")]));
        let d = m.doc.borrow();
        let new_first = d.child_at(m.root, 0).unwrap();
        assert_ne!(old_first, new_first);
        assert!(!d.contains(old_first));
        assert_eq!(d.tag(new_first).unwrap(), "p");
        assert_eq!(d.stats().nodes_replaced, 1);
        drop(d);
        assert_eq!(m.html(), "<section><p>a</p><div>b</div></section>");
    }

    #[test]
    fn root_replacement_returns_new_node() {
        let mut m = mount(h("div", (), "x"));
        let old = m.root;
        let new = m.update(h("span", (), "x")).unwrap();
        assert_ne!(old, new);
        assert_eq!(m.html(), "<span>x</span>");
    }

    #[test]
    fn key_change_replaces_wholesale() {
        let mut m = mount(h("li", Props::new().with_key("a"), "same"));
        let old = m.root;
        m.update(h("li", Props::new().with_key("b"), "same"));
        assert_ne!(m.root, old);
        assert!(!m.doc.borrow().contains(old));
        assert_eq!(m.html(), r#"<li key="b">same</li>"#);
    }

    #[test]
    fn truncation_removes_trailing_children() {
        let mut m = mount(h("ul", (), vec![h("li", (), "1"), h("li", (), "2"), h("li", (), "3")]));
        let kept: Vec<_> = m.doc.borrow().children(m.root).unwrap()[..1].to_vec();
        m.update(h("ul", (), vec![h("li", (), "1")]));
        let d = m.doc.borrow();
        assert_eq!(d.children(m.root).unwrap(), kept.as_slice());
        assert_eq!(d.stats().nodes_removed, 2);
        drop(d);
        assert_eq!(m.html(), "<ul><li>1</li></ul>");
    }

    #[test]
    fn growth_appends_trailing_children() {
        let mut m = mount(h("ul", (), vec![h("li", (), "1")]));
        m.update(h("ul", (), vec![h("li", (), "1"), h("li", (), "2")]));
        assert_eq!(m.html(), "<ul><li>1</li><li>2</li></ul>");
        assert_eq!(m.doc.borrow().stats().nodes_replaced, 0);
    }

    #[test]
    fn attributes_added_updated_removed() {
        let mut m = mount(h("a", Props::new().attr("href", "a.html").attr("title", "t"), ()));
        m.update(h("a", Props::new().attr("href", "b.html").attr("rel", "next"), ()));
        let stats = m.doc.borrow().stats();
        assert_eq!(stats.attributes_removed, 1);
        assert_eq!(stats.attributes_set, 2);
        assert_eq!(m.html(), r#"<a href="b.html" rel="next"></a>"#);
    }

    #[test]
    fn text_to_element_and_back() {
        let mut m = mount(h("div", (), "plain"));
        m.update(h("div", (), h("b", (), "bold")));
        assert_eq!(m.html(), "<div><b>bold</b></div>");
        m.update(h("div", (), "plain"));
        assert_eq!(m.html(), "<div>plain</div>");
    }

    #[test]
    fn handlers_registered_once_and_removed() {
        let calls = Rc::new(Cell::new(0u32));
        let counter = |calls: &Rc<Cell<u32>>| {
            let calls = Rc::clone(calls);
            move |_: &State, _: &Event| {
                calls.set(calls.get() + 1);
                Ok::<(), crate::Error>(())
            }
        };
        let mut m = mount(h("button", Props::new().on("click", counter(&calls)), ()));
        m.update(h("button", Props::new().on("click", counter(&calls)), ()));
        assert_eq!(m.doc.borrow().listener_count(m.root, "click"), 1);
        dispatch(&m.doc, m.root, &Event::new("click")).unwrap();
        assert_eq!(calls.get(), 1);

        m.update(h("button", (), ()));
        assert_eq!(m.doc.borrow().listener_count(m.root, "click"), 0);
        dispatch(&m.doc, m.root, &Event::new("click")).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn nested_patch_reaches_deep_text() {
        let mut m = mount(h("div", (), h("p", (), h("span", (), "deep"))));
        m.update(h("div", (), h("p", (), h("span", (), "deeper"))));
        assert_eq!(m.html(), "<div><p><span>deeper</span></p></div>");
        assert_eq!(m.doc.borrow().stats().mutations(), 1);
    }

    #[test]
    fn errors_propagate_after_siblings_settle() {
        let mut m = mount(h("div", (), vec![h("p", (), "a"), h("p", (), "b")]));
        let next = VChild::from(h("div", (), vec![h("bad tag", (), ()), h("p", (), "c")]));
        let err = reconcile_blocking(&m.doc, Some(m.root), Some(&m.tree), Some(&next), &m.state);
        assert!(err.is_err());
        let d = m.doc.borrow();
        let second = d.child_at(m.root, 1).unwrap();
        let text = d.child_at(second, 0).unwrap();
        assert_eq!(d.text(text).unwrap(), "c");
        drop(d);
        m.tree = next;
    }

    #[test]
    fn failed_replacement_leaves_arena_unchanged() {
        let m = mount(h("div", (), "x"));
        let before = m.doc.borrow().len();
        let next = VChild::from(h(
            "span",
            (),
            crate::children![h("p", (), ()), h("p", (), ()), h("bad tag", (), ())],
        ));
        for _ in 0..10 {
            let result =
                reconcile_blocking(&m.doc, Some(m.root), Some(&m.tree), Some(&next), &m.state);
            assert!(result.is_err());
        }
        assert_eq!(m.doc.borrow().len(), before);
        assert_eq!(m.html(), "<div>x</div>");
    }

    #[test]
    fn failed_growth_leaves_arena_unchanged() {
        let m = mount(h("ul", (), vec![h("li", (), "1")]));
        let before = m.doc.borrow().len();
        let next = VChild::from(h(
            "ul",
            (),
            vec![h("li", (), "1"), h("li", (), vec![h("b", (), "2"), h("bad tag", (), ())])],
        ));
        let result = reconcile_blocking(&m.doc, Some(m.root), Some(&m.tree), Some(&next), &m.state);
        assert!(result.is_err());
        assert_eq!(m.doc.borrow().len(), before);
        assert_eq!(m.html(), "<ul><li>1</li></ul>");
    }

    #[test]
    fn no_live_node_renders_detached() {
        let doc = Document::new_shared();
        let next = VChild::from(h("p", (), "x"));
        let id = reconcile_blocking(&doc, None, None, Some(&next), &State::default())
            .unwrap()
            .unwrap();
        assert_eq!(doc.borrow().parent(id), None);
        assert_eq!(doc.borrow().outer_html(id).unwrap(), "<p>x</p>");
    }
}
