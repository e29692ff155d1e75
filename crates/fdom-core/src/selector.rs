#![forbid(unsafe_code)]

//! Selector lookup used to resolve mount targets.
//!
//! Supported grammar: a comma-separated list of compound selectors, each an
//! optional tag name followed by any number of `#id`, `.class`, `[attr]` and
//! `[attr=value]` parts. Combinators (descendant, child, sibling) are not
//! supported and are reported as [`DomError::InvalidSelector`].

use crate::dom::{Document, NodeId};
use crate::error::{DomError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Tag(String),
    Id(String),
    Class(String),
    Attr { name: String, value: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    parts: Vec<Part>,
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self> {
        let invalid = || DomError::InvalidSelector {
            selector: source.to_owned(),
        };
        let alternatives = source
            .split(',')
            .map(|alt| parse_compound(alt.trim()).ok_or_else(invalid))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { alternatives })
    }

    /// Whether the element `id` matches any alternative.
    #[must_use]
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        self.alternatives
            .iter()
            .any(|compound| compound.parts.iter().all(|part| part_matches(doc, id, part)))
    }
}

fn parse_compound(source: &str) -> Option<Compound> {
    if source.is_empty() {
        return None;
    }
    let mut parts = Vec::new();
    let mut rest = source;

    let tag_len = rest
        .find(|c: char| matches!(c, '#' | '.' | '['))
        .unwrap_or(rest.len());
    if tag_len > 0 {
        let tag = &rest[..tag_len];
        if tag != "*" {
            if !is_ident(tag) {
                return None;
            }
            parts.push(Part::Tag(tag.to_ascii_lowercase()));
        }
        rest = &rest[tag_len..];
    }

    while let Some(marker) = rest.chars().next() {
        rest = &rest[marker.len_utf8()..];
        match marker {
            '#' | '.' => {
                let len = rest
                    .find(|c: char| matches!(c, '#' | '.' | '['))
                    .unwrap_or(rest.len());
                let name = &rest[..len];
                if !is_ident(name) {
                    return None;
                }
                parts.push(if marker == '#' {
                    Part::Id(name.to_owned())
                } else {
                    Part::Class(name.to_owned())
                });
                rest = &rest[len..];
            }
            '[' => {
                let close = rest.find(']')?;
                let body = &rest[..close];
                let (name, value) = match body.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                        (name.trim(), Some(value.to_owned()))
                    }
                    None => (body.trim(), None),
                };
                if !is_ident(name) {
                    return None;
                }
                parts.push(Part::Attr {
                    name: name.to_owned(),
                    value,
                });
                rest = &rest[close + 1..];
            }
            _ => return None,
        }
    }
    Some(Compound { parts })
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with(|c: char| c.is_ascii_digit())
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
}

fn part_matches(doc: &Document, id: NodeId, part: &Part) -> bool {
    match part {
        Part::Tag(tag) => doc.tag(id).is_ok_and(|t| t == tag.as_str()),
        Part::Id(want) => doc
            .attribute(id, "id")
            .ok()
            .flatten()
            .is_some_and(|have| have == want.as_str()),
        Part::Class(want) => doc
            .attribute(id, "class")
            .ok()
            .flatten()
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == want.as_str())),
        Part::Attr { name, value } => match doc.attribute(id, name).ok().flatten() {
            Some(have) => value.as_deref().is_none_or(|want| have == want),
            None => false,
        },
    }
}

impl Document {
    /// First element in document order (starting at the body) matching `selector`.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        self.query_selector_from(self.body(), selector)
    }

    /// First element under `root` (inclusive) matching `selector`.
    pub fn query_selector_from(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(root)?
            .into_iter()
            .find(|&id| selector.matches(self, id)))
    }

    /// Every element under the body matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(self.body())?
            .into_iter()
            .filter(|&id| selector.matches(self, id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let app = doc.create_element("div").unwrap();
        doc.set_attribute(app, "id", "app").unwrap();
        doc.set_attribute(app, "class", "root shell").unwrap();
        let first = doc.create_element("p").unwrap();
        doc.set_attribute(first, "class", "note").unwrap();
        let second = doc.create_element("p").unwrap();
        doc.set_attribute(second, "data-kind", "warn").unwrap();
        doc.append_child(doc.body(), app).unwrap();
        doc.append_child(app, first).unwrap();
        doc.append_child(app, second).unwrap();
        (doc, app, first, second)
    }

    #[test]
    fn id_selector() {
        let (doc, app, _, _) = sample();
        assert_eq!(doc.query_selector("#app").unwrap(), Some(app));
        assert_eq!(doc.query_selector("#missing").unwrap(), None);
    }

    #[test]
    fn tag_and_class_selectors() {
        let (doc, app, first, second) = sample();
        assert_eq!(doc.query_selector("p").unwrap(), Some(first));
        assert_eq!(doc.query_selector(".shell").unwrap(), Some(app));
        assert_eq!(doc.query_selector("div.root#app").unwrap(), Some(app));
        assert_eq!(doc.query_selector_all("p").unwrap(), vec![first, second]);
    }

    #[test]
    fn attribute_selectors() {
        let (doc, _, _, second) = sample();
        assert_eq!(doc.query_selector("[data-kind]").unwrap(), Some(second));
        assert_eq!(doc.query_selector("p[data-kind=\"warn\"]").unwrap(), Some(second));
        assert_eq!(doc.query_selector("[data-kind=info]").unwrap(), None);
    }

    #[test]
    fn selector_lists_match_any() {
        let (doc, app, _, _) = sample();
        assert_eq!(doc.query_selector("#nope, div").unwrap(), Some(app));
    }

    #[test]
    fn body_is_searchable() {
        let (doc, _, _, _) = sample();
        assert_eq!(doc.query_selector("body").unwrap(), Some(doc.body()));
        assert_eq!(doc.query_selector("*").unwrap(), Some(doc.body()));
    }

    #[test]
    fn invalid_selectors_rejected() {
        let (doc, _, _, _) = sample();
        for bad in ["", "div p", "div > p", "#", ".1x", "[unterminated", "a,"] {
            assert!(
                matches!(doc.query_selector(bad), Err(DomError::InvalidSelector { .. })),
                "{bad:?} should be rejected"
            );
        }
    }
}
