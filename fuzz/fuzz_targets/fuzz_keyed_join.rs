#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use treejoin::Selection;
use treejoin_dom::Document;

#[derive(Debug, Arbitrary)]
struct Input {
    old: Vec<u8>,
    new: Vec<u8>,
    keyed: bool,
}

fuzz_target!(|input: Input| {
    let old: Vec<u8> = input.old.into_iter().take(64).collect();
    let new: Vec<u8> = input.new.into_iter().take(64).collect();

    let mut doc = Document::<u8>::new();
    let root = doc.root();
    let ul = doc.element(root, "ul");
    for key in &old {
        let li = doc.element(ul, "li");
        doc.set_node_datum(li, Some(*key));
    }
    let sel = Selection::<Document<u8>>::from_nodes(Some(ul), doc.children(ul).to_vec());
    let joined = if input.keyed {
        sel.join_by(&mut doc, new.clone(), |d, _| *d)
    } else {
        sel.join(&mut doc, new.clone())
    };
    let Ok(mut update) = joined else {
        panic!("plain data never fails to join");
    };

    assert_eq!(update.groups().len(), new.len());
    assert_eq!(update.size() + update.enter().size(), new.len());
    assert_eq!(update.size() + update.exit().size(), old.len());

    update.enter_insert(&mut doc, "li", None).expect("list has a parent");
    update.exit().remove(&mut doc);
    assert_eq!(doc.children(ul).len(), new.len());
});
