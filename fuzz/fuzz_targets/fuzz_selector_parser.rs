#![no_main]

use libfuzzer_sys::fuzz_target;
use treejoin_dom::{Document, parse};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    match parse(input) {
        Ok(_) => {
            let mut doc = Document::<()>::new();
            let root = doc.root();
            let div = doc.element(root, "div");
            doc.set_attr(div, "class", "a b");
            let found = doc.query_selector_all(root, input).unwrap_or_default();
            assert!(found.iter().all(|node| *node != root));
        }
        Err(err) => {
            assert!(err.position <= input.len());
            assert!(input.is_char_boundary(err.position));
        }
    }
});
