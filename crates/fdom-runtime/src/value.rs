#![forbid(unsafe_code)]

//! Dynamic values held by reactive cells and attribute props.

pub use serde_json::Value;

/// Truthiness used to filter conditional children.
///
/// `null`, `false`, zero, NaN and the empty string are falsy; everything
/// else, including empty arrays and objects, is truthy.
///
/// Because zero is falsy, passing a numeric cell straight to [`h`] drops it
/// while it holds `0`: `h("b", (), s.value("n"))` renders `<b></b>`. Views
/// that display numbers pass [`to_text`] of the value instead, which is a
/// non-empty string and always kept.
///
/// [`h`]: crate::vnode::h
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String form used for attribute values and text children.
///
/// Strings are written raw; every other value uses its compact JSON form.
#[must_use]
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values() {
        for v in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&v), "{v} should be falsy");
        }
    }

    #[test]
    fn truthy_values() {
        for v in [json!(true), json!(1), json!(-2.5), json!("0"), json!([]), json!({})] {
            assert!(is_truthy(&v), "{v} should be truthy");
        }
    }

    #[test]
    fn zero_counter_needs_text_form() {
        use crate::vnode::{VChild, h};

        let raw = h("b", (), json!(0));
        assert!(raw.children().is_empty());
        let shown = h("b", (), to_text(&json!(0)));
        assert_eq!(shown.children(), &[VChild::text("0")]);
    }

    #[test]
    fn text_form() {
        assert_eq!(to_text(&json!("plain")), "plain");
        assert_eq!(to_text(&json!(42)), "42");
        assert_eq!(to_text(&json!(true)), "true");
        assert_eq!(to_text(&json!(null)), "null");
        assert_eq!(to_text(&json!([1, "a"])), r#"[1,"a"]"#);
    }
}
