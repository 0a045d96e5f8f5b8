#![forbid(unsafe_code)]

//! Fixtures and recorders for treejoin integration tests.
//!
//! Every fixture builds a [`JsonDoc`]: the reference document with
//! `serde_json::Value` datums, so tests can bind heterogeneous records and
//! compare recorded contexts as JSON.
//!
//! - [`list`]: `ul > li` with one datum per item.
//! - [`table`]: `table > tr > td`, rows carry the row array, cells the cell.
//! - [`nested`]: levels tagged `l0`, `l1`, ... with a fixed fan-out per
//!   level, for depth-generic properties.
//! - [`Recorder`]: captures every callback invocation with its context.
//! - [`strategies`]: proptest strategies for shapes and key sets.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Value, json};
use treejoin::{Context, Selection, SelectionResult};
use treejoin_dom::{Document, NodeId};

/// Reference document holding JSON datums.
pub type JsonDoc = Document<Value>;

/// Selection over a [`JsonDoc`].
pub type JsonSelection = Selection<JsonDoc>;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// `ul` under the root with one `li` per item. Each `li` holds its item as
/// datum and its display string as text.
pub fn list(items: &[Value]) -> (JsonDoc, NodeId) {
    let mut doc = JsonDoc::new();
    let root = doc.root();
    let ul = doc.element(root, "ul");
    for item in items {
        let li = doc.element(ul, "li");
        doc.set_node_datum(li, Some(item.clone()));
        doc.replace_text(li, &display(item));
    }
    tracing::debug!(items = items.len(), "built list fixture");
    (doc, ul)
}

/// `table` under the root with one `tr` per row and one `td` per cell.
pub fn table(rows: &[Vec<Value>]) -> (JsonDoc, NodeId) {
    let mut doc = JsonDoc::new();
    let root = doc.root();
    let table = doc.element(root, "table");
    for row in rows {
        let tr = doc.element(table, "tr");
        doc.set_node_datum(tr, Some(Value::Array(row.clone())));
        for cell in row {
            let td = doc.element(tr, "td");
            doc.set_node_datum(td, Some(cell.clone()));
            doc.replace_text(td, &display(cell));
        }
    }
    tracing::debug!(rows = rows.len(), "built table fixture");
    (doc, table)
}

/// Nested levels under the root: `shape[0]` elements `l0`, each with
/// `shape[1]` children `l1`, and so on. Every element's datum is
/// `{"level": depth, "index": position among siblings}`.
pub fn nested(shape: &[usize]) -> JsonDoc {
    fn grow(doc: &mut JsonDoc, parent: NodeId, level: usize, shape: &[usize]) {
        let Some((&fan_out, rest)) = shape.split_first() else {
            return;
        };
        for index in 0..fan_out {
            let child = doc.element(parent, &format!("l{level}"));
            doc.set_node_datum(child, Some(json!({"level": level, "index": index})));
            grow(doc, child, level + 1, rest);
        }
    }

    let mut doc = JsonDoc::new();
    let root = doc.root();
    grow(&mut doc, root, 0, shape);
    tracing::debug!(?shape, nodes = doc.len(), "built nested fixture");
    doc
}

/// Select the `l0` .. `l{depth-1}` levels of a [`nested`] fixture, one
/// `select_all` per level. The result has depth `depth`.
///
/// # Errors
///
/// Never for the built-in selectors; propagated for completeness.
pub fn select_levels(doc: &mut JsonDoc, depth: usize) -> SelectionResult<JsonSelection> {
    let mut selection = JsonSelection::select_all_root(doc, "l0")?;
    for level in 1..depth {
        selection = selection.select_all(doc, format!("l{level}"))?;
    }
    Ok(selection)
}

/// Text shown for a datum: strings without quotes, anything else as JSON.
#[must_use]
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Record `{"id": .., "name": ..}` for each id.
#[must_use]
pub fn records(ids: &[i64]) -> Vec<Value> {
    ids.iter()
        .map(|id| json!({"id": id, "name": format!("item-{id}")}))
        .collect()
}

/// Join key for [`records`].
#[must_use]
pub fn record_id(datum: &Value, _index: usize) -> Option<i64> {
    datum.get("id").and_then(Value::as_i64)
}

// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

/// One recorded callback invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Element the callback ran on.
    pub node: NodeId,
    /// `(datum, index)` per level, outermost first.
    pub levels: Vec<(Option<Value>, usize)>,
}

impl Call {
    /// Index path of the call, outermost first.
    #[must_use]
    pub fn path(&self) -> Vec<usize> {
        self.levels.iter().map(|(_, index)| *index).collect()
    }
}

/// Shared log of callback invocations.
///
/// Clones share one log, so a clone can move into a listener while the
/// test keeps the original.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl Recorder {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one invocation.
    pub fn record(&self, node: NodeId, ctx: &Context<Value>) {
        let levels = ctx
            .levels()
            .iter()
            .map(|level| (level.datum.clone(), level.index))
            .collect();
        self.calls.borrow_mut().push(Call { node, levels });
    }

    /// Snapshot of every call so far.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Number of calls so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }

    /// Index paths of every call.
    #[must_use]
    pub fn paths(&self) -> Vec<Vec<usize>> {
        self.calls.borrow().iter().map(Call::path).collect()
    }

    /// Every call as JSON: `[{"node": n, "context": [[datum, index], ..]}]`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.calls
                .borrow()
                .iter()
                .map(|call| {
                    let context: Vec<Value> = call
                        .levels
                        .iter()
                        .map(|(datum, index)| json!([datum, index]))
                        .collect();
                    json!({"node": call.node.index(), "context": context})
                })
                .collect(),
        )
    }

    /// Forget every call.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// proptest strategies shared by the property suites.
pub mod strategies {
    use proptest::collection::{btree_set, vec};
    use proptest::prelude::*;

    /// Fan-out per level, 1..=`max_depth` levels of 0..4 children.
    pub fn shape(max_depth: usize) -> impl Strategy<Value = Vec<usize>> {
        vec(0usize..4, 1..=max_depth)
    }

    /// Distinct ids, in ascending order.
    pub fn ids(max: usize) -> impl Strategy<Value = Vec<i64>> {
        btree_set(0i64..32, 0..max).prop_map(|set| set.into_iter().collect())
    }

    /// Ids with repeats allowed, in arbitrary order.
    pub fn ids_with_repeats(max: usize) -> impl Strategy<Value = Vec<i64>> {
        vec(0i64..8, 0..max)
    }
}
