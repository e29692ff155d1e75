#![forbid(unsafe_code)]

//! Fresh materialization of virtual trees into the live document.
//!
//! Used for the initial mount and for every subtree the reconciler replaces
//! wholesale. The result is detached; the caller decides where it goes.

use std::rc::Rc;

use fdom_core::event::listener;
use fdom_core::{Document, Listener, NodeId};

use crate::error::Result;
use crate::reactive::State;
use crate::value;
use crate::vnode::{Handler, PropValue, VChild, VNode, event_name};

/// Render `node` and return the created live node (`None` for absent input).
pub fn render(doc: &mut Document, node: Option<&VChild>, ctx: &State) -> Result<Option<NodeId>> {
    match node {
        None => Ok(None),
        Some(VChild::Text(text)) => Ok(Some(doc.create_text(text.as_str()))),
        Some(VChild::Element(element)) => render_element(doc, element, ctx).map(Some),
    }
}

/// Render one element and its children, depth first.
///
/// On failure every node created for this subtree is freed again, so a
/// failed render leaves the arena as it found it.
pub fn render_element(doc: &mut Document, node: &VNode, ctx: &State) -> Result<NodeId> {
    let id = doc.create_element(node.tag())?;
    match fill_element(doc, id, node, ctx) {
        Ok(()) => Ok(id),
        Err(err) => {
            doc.discard(id)?;
            Err(err)
        }
    }
}

fn fill_element(doc: &mut Document, id: NodeId, node: &VNode, ctx: &State) -> Result<()> {
    for (name, value) in node.props().iter() {
        apply_prop(doc, id, name, value, ctx)?;
    }
    for child in node.children() {
        if let Some(child_id) = render(doc, Some(child), ctx)? {
            if let Err(err) = doc.append_child(id, child_id) {
                doc.discard(child_id)?;
                return Err(err.into());
            }
        }
    }
    Ok(())
}

/// Set an attribute or register a listener for one property.
pub(crate) fn apply_prop(
    doc: &mut Document,
    id: NodeId,
    name: &str,
    value: &PropValue,
    ctx: &State,
) -> Result<()> {
    match (event_name(name), value) {
        (Some(event), PropValue::Handler(handler)) => {
            doc.add_event_listener(id, &event, bind(handler, ctx))?;
        }
        (None, PropValue::Attr(value)) => {
            doc.set_attribute(id, name, value::to_text(value))?;
        }
        (Some(_), PropValue::Attr(_)) | (None, PropValue::Handler(_)) => {
            tracing::trace!(message = "render.skip_prop", prop = name);
        }
    }
    Ok(())
}

/// Close a handler over the rendering context.
pub(crate) fn bind(handler: &Handler, ctx: &State) -> Listener {
    let handler = Rc::clone(handler);
    let state = ctx.clone();
    listener(move |event| handler(&state, event).map_err(Into::into))
}
