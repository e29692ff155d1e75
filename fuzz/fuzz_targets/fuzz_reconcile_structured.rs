#![no_main]

use arbitrary::Arbitrary;
use fdom_core::{Document, NodeId};
use fdom_runtime::{Props, State, VChild, h, reconcile_blocking, render};
use libfuzzer_sys::fuzz_target;

const TAGS: [&str; 3] = ["div", "p", "span"];
const ATTRS: [&str; 3] = ["class", "id", "title"];

#[derive(Arbitrary, Debug)]
enum FuzzNode {
    Text(u8),
    Element {
        tag: u8,
        key: Option<u8>,
        attrs: Vec<(u8, u8)>,
        children: Vec<FuzzNode>,
    },
}

impl FuzzNode {
    fn build(&self, depth: usize) -> VChild {
        match self {
            FuzzNode::Text(t) => VChild::text(format!("t{}", t % 4)),
            FuzzNode::Element {
                tag,
                key,
                attrs,
                children,
            } => {
                let mut props: Props = attrs
                    .iter()
                    .take(3)
                    .map(|(n, v)| (ATTRS[usize::from(*n) % 3], format!("v{}", v % 3)))
                    .collect();
                if let Some(key) = key {
                    props = props.with_key(u32::from(key % 2));
                }
                let kids: Vec<VChild> = if depth < 4 {
                    children.iter().take(4).map(|c| c.build(depth + 1)).collect()
                } else {
                    Vec::new()
                };
                VChild::from(h(TAGS[usize::from(*tag) % 3], props, kids))
            }
        }
    }
}

fn sorted(doc: &Document, id: NodeId) -> String {
    let Ok(tag) = doc.tag(id) else {
        return doc.text(id).unwrap_or_default().to_owned();
    };
    let mut attrs = doc.attributes(id).map(<[_]>::to_vec).unwrap_or_default();
    attrs.sort();
    let kids: Vec<String> = doc
        .children(id)
        .unwrap_or_default()
        .iter()
        .map(|&c| sorted(doc, c))
        .collect();
    format!("<{tag} {attrs:?}>[{}]", kids.join("|"))
}

fuzz_target!(|input: (u8, FuzzNode, FuzzNode)| {
    let (tag, prev, next) = input;
    let wrap = |node: &FuzzNode| {
        VChild::from(h(TAGS[usize::from(tag) % 3], (), node.build(0)))
    };
    let (prev, next) = (wrap(&prev), wrap(&next));
    let ctx = State::default();

    let doc = Document::new_shared();
    let root = {
        let mut d = doc.borrow_mut();
        let root = render(&mut d, Some(&prev), &ctx).unwrap().unwrap();
        let body = d.body();
        d.append_child(body, root).unwrap();
        root
    };
    let live = reconcile_blocking(&doc, Some(root), Some(&prev), Some(&next), &ctx)
        .unwrap()
        .unwrap();

    let mut fresh = Document::new();
    let expected = render(&mut fresh, Some(&next), &ctx).unwrap().unwrap();
    assert_eq!(sorted(&doc.borrow(), live), sorted(&fresh, expected));
});
