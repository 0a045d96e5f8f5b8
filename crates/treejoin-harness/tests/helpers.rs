#![forbid(unsafe_code)]

//! Integration tests: attribute, style, class and content helpers, and
//! structural `append`/`insert`/`remove`.

use serde_json::json;
use treejoin::Value as NodeValue;
use treejoin_harness::{JsonDoc, JsonSelection, display, list, records, table};

fn items(doc: &mut JsonDoc, ul: treejoin_dom::NodeId) -> JsonSelection {
    JsonSelection::from_node(ul).select_all(doc, "li").unwrap()
}

#[test]
fn attributes_from_data() {
    let (mut doc, ul) = list(&records(&[4, 9]));
    let sel = items(&mut doc, ul);
    sel.attr(
        &mut doc,
        "data-id",
        NodeValue::<JsonDoc, _>::func(|_, _, ctx| ctx.datum().map(|d| d["id"].to_string())),
    )
    .attr(&mut doc, "xlink:title", "t");
    let expected = concat!(
        r#"<ul><li data-id="4" xlink:title="t">{"id":4,"name":"item-4"}</li>"#,
        r#"<li data-id="9" xlink:title="t">{"id":9,"name":"item-9"}</li></ul>"#,
    );
    assert_eq!(doc.outer_html(ul), expected);
    assert_eq!(sel.attr_value(&doc, "data-id").as_deref(), Some("4"));
    assert_eq!(sel.attr_value(&doc, "title"), None, "qualified name is distinct");

    sel.attr(&mut doc, "data-id", None::<&str>);
    assert_eq!(sel.attr_value(&doc, "data-id"), None);
}

#[test]
fn styles_with_priority() {
    let (mut doc, table) = table(&[vec![json!(1), json!(-2)]]);
    let cells = JsonSelection::from_node(table)
        .select_all(&mut doc, "td")
        .unwrap();
    cells.style(
        &mut doc,
        "color",
        NodeValue::<JsonDoc, _>::func(|_, _, ctx| {
            let negative = ctx.datum().and_then(|d| d.as_i64()).is_some_and(|n| n < 0);
            Some(if negative { "red" } else { "black" }.to_string())
        }),
        "important",
    );
    let tds = cells.nodes();
    assert_eq!(
        doc.outer_html(tds[1]),
        "<td style=\"color: red !important;\">-2</td>"
    );
    assert_eq!(cells.style_value(&doc, "color").as_deref(), Some("black"));
    cells.style(&mut doc, "color", None::<&str>, "");
    assert_eq!(doc.outer_html(tds[0]), "<td>1</td>");
}

#[test]
fn classes_toggle_exact_tokens() {
    let (mut doc, ul) = list(&[json!(1), json!(2)]);
    let first = doc.children(ul)[0];
    doc.set_attr(first, "class", "  active  activated ");
    let sel = items(&mut doc, ul);

    sel.classed(&mut doc, "active", false);
    assert_eq!(doc.get_attribute(first, "class"), Some("activated"));

    sel.classed(
        &mut doc,
        "odd selected",
        NodeValue::<JsonDoc, _>::func(|_, _, ctx| ctx.index() % 2 == 0),
    );
    assert_eq!(doc.get_attribute(first, "class"), Some("activated odd selected"));
    assert!(sel.has_classes(&doc, "selected odd"));
    assert!(!sel.has_classes(&doc, "active"));
    assert_eq!(doc.get_attribute(doc.children(ul)[1], "class"), Some(""));
}

#[test]
fn text_and_html_replace_content() {
    let (mut doc, ul) = list(&[json!("a"), json!("b")]);
    let sel = items(&mut doc, ul);
    sel.html(
        &mut doc,
        NodeValue::<JsonDoc, _>::func(|_, _, ctx| {
            ctx.datum().map(|d| format!("<em>{}</em>", display(d)))
        }),
    );
    assert_eq!(sel.html_value(&doc).as_deref(), Some("<em>a</em>"));
    assert_eq!(sel.text_value(&doc).as_deref(), Some("a"));

    sel.text(&mut doc, "x < y");
    assert_eq!(doc.inner_html(ul), "<li>x &lt; y</li><li>x &lt; y</li>");

    sel.text(&mut doc, None::<&str>);
    assert!(sel.nodes().iter().all(|li| doc.children(*li).is_empty()));
}

#[test]
fn append_inherits_datum_and_keeps_shape() {
    let (mut doc, ul) = list(&records(&[1, 2]));
    let sel = items(&mut doc, ul);
    let spans = sel.append(&mut doc, "span");
    assert_eq!(spans.depth(), sel.depth());
    assert_eq!(spans.size(), 2);
    assert_eq!(spans.data(&doc), sel.data(&doc));
    for (span, li) in spans.nodes().iter().zip(sel.nodes()) {
        assert_eq!(doc.parent_node(*span), Some(li));
        assert_eq!(doc.children(li).last(), Some(span));
    }
}

#[test]
fn insert_before_first_child() {
    let (mut doc, ul) = list(&[json!("a")]);
    let sel = JsonSelection::from_node(ul);
    let header = sel.insert(&mut doc, "li", "li").unwrap();
    header.text(&mut doc, "header");
    assert_eq!(doc.inner_html(ul), "<li>header</li><li>a</li>");
    assert!(sel.insert(&mut doc, "li", "li[").is_err());
}

#[test]
fn datum_helper_sets_and_clears() {
    let (mut doc, ul) = list(&[json!(1), json!(2)]);
    let sel = items(&mut doc, ul);
    sel.datum(
        &mut doc,
        NodeValue::func(|_, _, ctx| Some(json!({"slot": ctx.index()}))),
    );
    assert_eq!(sel.datum_value(&doc), Some(json!({"slot": 0})));
    sel.datum(&mut doc, NodeValue::constant(None));
    assert_eq!(sel.data(&doc), vec![None, None]);
}

#[test]
fn remove_detaches_selected_elements() {
    let (mut doc, ul) = list(&[json!(1), json!(2), json!(3)]);
    let sel = items(&mut doc, ul);
    let err = sel.filter(&mut doc, "li:nth").map(|_| ()).unwrap_err();
    assert!(err.to_string().contains("li:nth"), "{err}");
    let nodes = sel.nodes();
    JsonSelection::from_nodes(Some(ul), [nodes[0], nodes[2]]).remove(&mut doc);
    assert_eq!(doc.children(ul), &[nodes[1]]);
    assert_eq!(doc.parent_node(nodes[0]), None);
}
