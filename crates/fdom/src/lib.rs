#![forbid(unsafe_code)]

//! FrankenDOM public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users.
//!
//! ```
//! use fdom::prelude::*;
//!
//! let doc = Document::new_shared();
//! let app = App::new(
//!     doc,
//!     Options::new()
//!         .el("body")
//!         .data("name", "world")
//!         .view(|s| h("p", (), format!("hello {}", s.value("name").as_str().unwrap_or("?")))),
//! )?;
//! app.mount()?;
//! assert_eq!(app.html()?, "<p>hello world</p>");
//!
//! app.state().set("name", "dom")?;
//! assert_eq!(app.html()?, "<p>hello dom</p>");
//! # Ok::<(), fdom::runtime::Error>(())
//! ```

pub use fdom_core as core;
#[cfg(feature = "runtime")]
pub use fdom_runtime as runtime;

pub mod prelude {
    pub use fdom_core::{Document, DomError, Event, NodeId, SharedDocument};

    #[cfg(feature = "runtime")]
    pub use fdom_runtime::{
        App, MountTarget, Options, Props, ReactiveCell, State, VChild, VNode, Value, children,
        computed, h, reactive,
    };
}

#[cfg(all(test, feature = "runtime"))]
mod tests {
    use super::prelude::*;
    use serde_json::json;

    #[test]
    fn prelude_builds_and_mounts() {
        let doc = Document::new_shared();
        let app = App::new(
            doc,
            Options::new()
                .el("body")
                .state(|| [("items", reactive(json!(["a", "b"])))])
                .view(|s| {
                    let items = s.value("items");
                    h(
                        "ol",
                        (),
                        items
                            .as_array()
                            .into_iter()
                            .flatten()
                            .map(|i| h("li", (), i.clone()))
                            .collect::<Vec<_>>(),
                    )
                }),
        )
        .unwrap();
        app.mount().unwrap();
        assert_eq!(app.html().unwrap(), "<ol><li>a</li><li>b</li></ol>");
    }
}
