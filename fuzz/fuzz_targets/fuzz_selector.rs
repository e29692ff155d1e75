#![no_main]

use fdom_core::Document;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let mut doc = Document::new();
    let Ok(div) = doc.create_element("div") else {
        return;
    };
    let _ = doc.set_attribute(div, "id", "app");
    let _ = doc.set_attribute(div, "class", "a b");
    let body = doc.body();
    let _ = doc.append_child(body, div);

    if let Ok(Some(found)) = doc.query_selector(data) {
        assert!(doc.contains(found));
    }
    let _ = doc.query_selector_all(data);
});
