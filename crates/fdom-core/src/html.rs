#![forbid(unsafe_code)]

//! HTML serialization of live subtrees.
//!
//! Output is deterministic: attributes appear in insertion order, void
//! elements without children are written without a closing tag, and text and
//! attribute values are HTML-escaped.

use crate::dom::{Document, NodeId, NodeKind};
use crate::error::Result;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

impl Document {
    /// Serialize `id` and its subtree.
    pub fn outer_html(&self, id: NodeId) -> Result<String> {
        let mut out = String::new();
        self.write_html(id, &mut out)?;
        Ok(out)
    }

    /// Serialize the children of `id`.
    pub fn inner_html(&self, id: NodeId) -> Result<String> {
        let mut out = String::new();
        for &child in self.children(id)? {
            self.write_html(child, &mut out)?;
        }
        Ok(out)
    }

    fn write_html(&self, id: NodeId, out: &mut String) -> Result<()> {
        if self.kind(id)? == NodeKind::Text {
            out.push_str(&html_escape(self.text(id)?));
            return Ok(());
        }
        let tag = self.tag(id)?;
        out.push('<');
        out.push_str(tag);
        for (name, value) in self.attributes(id)? {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&html_escape(value));
            out.push('"');
        }
        out.push('>');
        let children = self.children(id)?;
        if children.is_empty() && VOID_ELEMENTS.contains(&tag) {
            return Ok(());
        }
        for &child in children {
            self.write_html(child, out)?;
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
        Ok(())
    }
}

fn html_escape(value: &str) -> String {
    v_htmlescape::escape(value).to_string()
}
