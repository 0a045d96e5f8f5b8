#![forbid(unsafe_code)]

//! Integration tests: the depth walker as seen through `each`/`try_each`.

use serde_json::{Value, json};
use treejoin_harness::{JsonSelection, Recorder, nested, select_levels};

#[test]
fn each_visits_every_leaf_once_with_full_context() {
    let mut doc = nested(&[2, 2, 3]);
    let sel = select_levels(&mut doc, 3).unwrap();
    let recorder = Recorder::new();
    sel.each(&mut doc, |_, node, ctx| {
        assert_eq!(ctx.len(), 6, "two entries per level");
        recorder.record(*node, ctx);
    });
    assert_eq!(recorder.len(), 12);
    let paths = recorder.paths();
    assert_eq!(paths.first(), Some(&vec![0, 0, 0]));
    assert_eq!(paths.last(), Some(&vec![1, 1, 2]));
    assert!(paths.windows(2).all(|w| w[0] < w[1]), "walk order is group order");
}

#[test]
fn ancestor_levels_carry_owner_datums() {
    let mut doc = nested(&[1, 2]);
    let sel = select_levels(&mut doc, 2).unwrap();
    let recorder = Recorder::new();
    sel.each(&mut doc, |_, node, ctx| recorder.record(*node, ctx));
    let calls = recorder.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1].levels,
        vec![
            (Some(json!({"level": 0, "index": 0})), 0),
            (Some(json!({"level": 1, "index": 1})), 1),
        ]
    );
}

#[test]
fn depth_one_context_has_only_the_leaf() {
    let mut doc = nested(&[3]);
    let sel = select_levels(&mut doc, 1).unwrap();
    let recorder = Recorder::new();
    sel.each(&mut doc, |_, node, ctx| recorder.record(*node, ctx));
    assert_eq!(recorder.paths(), vec![vec![0], vec![1], vec![2]]);
    assert_eq!(
        recorder.to_json()[2]["context"],
        json!([[{"level": 0, "index": 2}, 2]])
    );
}

#[test]
fn empty_groups_are_walked_without_calls() {
    let mut doc = nested(&[2, 0]);
    let sel = select_levels(&mut doc, 2).unwrap();
    assert_eq!(sel.depth(), 2);
    assert_eq!(sel.groups().len(), 2, "one empty group per owner");
    assert_eq!(sel.size(), 0);
    assert!(sel.is_empty());
    let recorder = Recorder::new();
    sel.each(&mut doc, |_, node, ctx| recorder.record(*node, ctx));
    assert!(recorder.is_empty());
}

#[test]
fn gaps_are_skipped() {
    let mut doc = nested(&[3]);
    let sel = select_levels(&mut doc, 1).unwrap();
    let data: Vec<Value> = (0..5).map(|i| json!(i)).collect();
    let update = sel.join(&mut doc, data).unwrap();
    assert_eq!(update.groups().len(), 5);
    let recorder = Recorder::new();
    update.each(&mut doc, |_, node, ctx| recorder.record(*node, ctx));
    assert_eq!(recorder.paths(), vec![vec![0], vec![1], vec![2]]);
}

#[test]
fn try_each_stops_at_first_error() {
    let mut doc = nested(&[2, 2]);
    let sel = select_levels(&mut doc, 2).unwrap();
    let mut visited = 0;
    let err = sel
        .try_each(&mut doc, |_, _, ctx| {
            visited += 1;
            if ctx.indices().collect::<Vec<_>>() == [1, 0] {
                Err(format!("failed at {}", ctx.datum().map(Value::to_string).unwrap_or_default()))
            } else {
                Ok(())
            }
        })
        .unwrap_err();
    assert_eq!(visited, 3, "no call after the failing one");
    assert!(err.contains("\"index\":0"));
}

#[test]
fn each_noop_changes_nothing() {
    let mut doc = nested(&[2, 3]);
    let sel = select_levels(&mut doc, 2).unwrap();
    let before = sel.clone();
    let data_before = sel.data(&doc);
    sel.each(&mut doc, |_, _, _| {});
    assert_eq!(sel, before);
    assert_eq!(sel.data(&doc), data_before);
}

#[test]
fn call_hands_over_selection_and_tree() {
    let mut doc = nested(&[2]);
    let sel = select_levels(&mut doc, 1).unwrap();
    let mut sizes = Vec::new();
    sel.call(&mut doc, |s: &JsonSelection, doc| {
        sizes.push(s.size());
        s.attr(doc, "data-called", "yes");
    });
    assert_eq!(sizes, vec![2]);
    assert_eq!(sel.attr_value(&doc, "data-called").as_deref(), Some("yes"));
}
