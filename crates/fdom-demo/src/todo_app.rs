//! The demo application definition.

use fdom::prelude::*;
use serde_json::json;

pub const INCREMENT: &str = "#increment";
pub const DRAFT: &str = "#draft";
pub const ADD: &str = "#add";

fn as_count(value: &Value) -> i64 {
    value.as_i64().unwrap_or(0)
}

fn todo_items(state: &State) -> Vec<Value> {
    state.value("todos").as_array().cloned().unwrap_or_default()
}

/// Options for the counter/todo application, mounted at `#app`.
pub fn options() -> Options {
    Options::new()
        .el("#app")
        .data("count", 0)
        .data("draft", "")
        .data("todos", json!([]))
        .computed("summary", |s| {
            let count = as_count(&s.value("count"));
            let todos = s.value("todos").as_array().map_or(0, Vec::len);
            json!(format!("{count} clicks, {todos} todos"))
        })
        .method("add_todo", |s, _| {
            let draft = s.value("draft");
            let text = draft.as_str().unwrap_or_default().trim();
            if text.is_empty() {
                return Ok(Value::Bool(false));
            }
            let mut todos = todo_items(s);
            todos.push(json!(text));
            s.set("todos", Value::Array(todos))?;
            s.set("draft", "")?;
            Ok(Value::Bool(true))
        })
        .watch("count", |_, value| {
            tracing::info!(count = %value, "counter changed");
            Ok(())
        })
        .watch("todos", |_, value| {
            let len = value.as_array().map_or(0, Vec::len);
            tracing::info!(len, "todo list changed");
            Ok(())
        })
        .mounted(|s| {
            tracing::info!(cells = s.len(), "demo mounted");
            Ok(())
        })
        .view(view)
}

fn view(s: &State) -> VNode {
    let count = as_count(&s.value("count"));
    let todos = todo_items(s);
    h(
        "main",
        Props::new().attr("class", "demo"),
        children![
            h("h1", (), "FrankenDOM"),
            h(
                "section",
                Props::new().attr("class", "counter"),
                children![
                    h(
                        "button",
                        Props::new().attr("id", "increment").on("click", |s, _| {
                            let next = as_count(&s.value("count")) + 1;
                            s.set("count", next)
                        }),
                        "+1",
                    ),
                    h("output", (), count.to_string()),
                    (count >= 3).then(|| h("strong", (), "on a roll")),
                ],
            ),
            h(
                "section",
                Props::new().attr("class", "todos"),
                children![
                    h(
                        "input",
                        Props::new()
                            .attr("id", "draft")
                            .attr("value", s.value("draft"))
                            .on("input", |s, ev| s.set("draft", ev.data().unwrap_or_default())),
                        (),
                    ),
                    h(
                        "button",
                        Props::new()
                            .attr("id", "add")
                            .on("click", |s, _| s.call("add_todo", &[]).map(drop)),
                        "add",
                    ),
                    h(
                        "ul",
                        (),
                        todos
                            .iter()
                            .enumerate()
                            .map(|(i, todo)| {
                                h("li", Props::new().with_key(i as u64), todo.clone())
                            })
                            .collect::<Vec<_>>(),
                    ),
                ],
            ),
            h("footer", (), s.value("summary")),
        ],
    )
}
