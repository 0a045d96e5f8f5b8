#![forbid(unsafe_code)]

//! Integration tests: `select`, `select_all` and `filter` over fixtures.

use serde_json::json;
use treejoin::{Group, Predicate, Selector, SelectorAll, SelectionError};
use treejoin_harness::{JsonDoc, JsonSelection, list, nested, select_levels, table};

#[test]
fn select_keeps_depth_and_propagates_datum() {
    let (mut doc, table) = table(&[vec![json!(1), json!(2)], vec![json!(3)]]);
    let rows = JsonSelection::from_node(table)
        .select_all(&mut doc, "tr")
        .unwrap();
    let first_cells = rows.select(&mut doc, "td").unwrap();
    assert_eq!(first_cells.depth(), rows.depth());
    assert_eq!(
        first_cells.data(&doc),
        vec![Some(json!([1, 2])), Some(json!([3]))],
        "row datum overwrites the selected cell's datum"
    );
}

#[test]
fn select_leaves_gaps_for_misses() {
    let (mut doc, ul) = list(&[json!("a"), json!("b")]);
    let first = doc.children(ul)[0];
    doc.element(first, "b");
    let items = JsonSelection::from_node(ul).select_all(&mut doc, "li").unwrap();
    let bold = items.select(&mut doc, "b").unwrap();
    let Group::Branch { groups, .. } = bold.groups() else {
        panic!("select_all result keeps its branch level");
    };
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2, "one slot per li, hit or miss");
    match &groups[0] {
        Group::Leaf { slots, .. } => {
            assert!(slots[0].is_some());
            assert!(slots[1].is_none(), "second li has no b");
        }
        Group::Branch { .. } => panic!("expected leaf"),
    }
    assert_eq!(bold.size(), 1);
}

#[test]
fn select_all_adds_a_level_owned_by_each_element() {
    let (mut doc, table) = table(&[vec![json!(1), json!(2)], vec![json!(3)]]);
    let rows = JsonSelection::from_node(table)
        .select_all(&mut doc, "tr")
        .unwrap();
    let cells = rows.select_all(&mut doc, "td").unwrap();
    assert_eq!(cells.depth(), rows.depth() + 1);
    assert_eq!(cells.size(), 3);
    let owners: Vec<_> = rows.nodes();
    let mut seen = Vec::new();
    cells.each(&mut doc, |doc: &mut JsonDoc, node, ctx| {
        seen.push((ctx.indices().collect::<Vec<_>>(), doc.parent_node(*node)));
    });
    assert_eq!(
        seen,
        vec![
            (vec![0, 0, 0], Some(owners[0])),
            (vec![0, 0, 1], Some(owners[0])),
            (vec![0, 1, 0], Some(owners[1])),
        ]
    );
}

#[test]
fn select_all_callback_sees_context() {
    let mut doc = nested(&[2, 2]);
    let outer = select_levels(&mut doc, 1).unwrap();
    let inner = outer
        .select_all(
            &mut doc,
            SelectorAll::<JsonDoc>::func(|doc, node, ctx| {
                let mut children = doc.children(*node).to_vec();
                if ctx.index() == 1 {
                    children.reverse();
                }
                children
            }),
        )
        .unwrap();
    let indices: Vec<_> = inner
        .data(&doc)
        .into_iter()
        .map(|d| d.and_then(|d| d["index"].as_i64()))
        .collect();
    assert_eq!(indices, vec![Some(0), Some(1), Some(1), Some(0)]);
}

#[test]
fn filter_is_dense_and_ordered() {
    let (mut doc, ul) = list(&[json!(1), json!(2), json!(3), json!(4)]);
    let items = JsonSelection::from_node(ul).select_all(&mut doc, "li").unwrap();
    let even = items
        .filter(
            &mut doc,
            Predicate::<JsonDoc>::func(|_, _, ctx| {
                ctx.datum()
                    .and_then(serde_json::Value::as_i64)
                    .is_some_and(|n| n % 2 == 0)
            }),
        )
        .unwrap();
    assert_eq!(even.depth(), items.depth());
    assert_eq!(even.data(&doc), vec![Some(json!(2)), Some(json!(4))]);
    let Group::Branch { groups, .. } = even.groups() else {
        panic!("filter keeps the branch level");
    };
    assert_eq!(groups[0].len(), 2, "filtered leaf holds only the matches");
}

#[test]
fn filter_by_selector_string() {
    let (mut doc, ul) = list(&[json!("a"), json!("b"), json!("c")]);
    let items = JsonSelection::from_node(ul).select_all(&mut doc, "li").unwrap();
    let second = doc.children(ul)[1];
    doc.set_attr(second, "class", "hot");
    let hot = items.filter(&mut doc, ".hot").unwrap();
    assert_eq!(hot.nodes(), vec![second]);
}

#[test]
fn invalid_selectors_fail_before_traversal() {
    let mut doc = JsonDoc::new();
    let empty = JsonSelection::from_nodes(None, Vec::new());
    for bad in ["li >", "[x", "#", ""] {
        let err = empty.select_all(&mut doc, bad).unwrap_err();
        assert!(
            matches!(err, SelectionError::InvalidSelector { ref selector, .. } if selector == bad),
            "{bad:?} -> {err}"
        );
    }
    assert!(empty.select(&mut doc, Selector::<JsonDoc>::from("a b,")).is_err());
    assert!(JsonSelection::select_root(&mut doc, "..x").is_err());
}

#[test]
fn root_queries() {
    let (mut doc, ul) = list(&[json!(1), json!(2)]);
    let one = JsonSelection::select_root(&mut doc, "ul").unwrap();
    assert_eq!(one.node(), Some(&ul));
    assert_eq!(one.depth(), 1);
    let none = JsonSelection::select_root(&mut doc, "table").unwrap();
    assert!(none.is_empty());
    assert_eq!(none.groups().len(), 1, "one empty slot");
    let all = JsonSelection::select_all_root(&mut doc, "li").unwrap();
    assert_eq!(all.size(), 2);
    assert_eq!(all.groups().parent(), Some(&doc.root()));
}

#[test]
fn narrowing_twice_is_deterministic() {
    let mut doc = nested(&[3, 3]);
    let run = |doc: &mut JsonDoc| {
        let outer = select_levels(doc, 1).unwrap();
        outer
            .select_all(doc, "l1")
            .unwrap()
            .filter(
                doc,
                Predicate::<JsonDoc>::func(|_, _, ctx| ctx.indices().sum::<usize>() % 2 == 0),
            )
            .unwrap()
    };
    let first = run(&mut doc);
    let second = run(&mut doc);
    assert_eq!(first, second);
    assert_eq!(first.depth(), 2);
}
