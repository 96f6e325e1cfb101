//! Relational to tree composition.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::types::{NodeId, RelationalModel};

/// Surviving children of each parent, grouped by kind in first-seen order.
type ChildIndex<'a> = HashMap<&'a NodeId, IndexMap<&'a str, Vec<&'a NodeId>>>;

fn index_children(model: &RelationalModel) -> ChildIndex<'_> {
    let mut index: ChildIndex<'_> = HashMap::new();
    for rel in &model.relations {
        // Dangling children are already removed; skip before counting so a
        // group collapses the same way it would had the edge never existed.
        if !model.contains(&rel.child) {
            continue;
        }
        index
            .entry(&rel.parent)
            .or_default()
            .entry(rel.kind.as_str())
            .or_default()
            .push(&rel.child);
    }
    index
}

struct Composer<'a> {
    model: &'a RelationalModel,
    children: ChildIndex<'a>,
    path: Vec<&'a NodeId>,
}

impl<'a> Composer<'a> {
    fn build(&mut self, id: &'a NodeId) -> Map<String, Value> {
        let mut out = self.model.node(id).cloned().unwrap_or_default();
        let groups = match self.children.get(id) {
            Some(groups) => groups.clone(),
            None => return out,
        };

        self.path.push(id);
        for (kind, ids) in groups {
            let mut values: Vec<Value> = Vec::with_capacity(ids.len());
            for child in ids {
                if self.path.contains(&child) {
                    warn!(parent = %id, child = %child, kind, "relation cycle, skipping child");
                    continue;
                }
                values.push(Value::Object(self.build(child)));
            }
            let value = match values.len() {
                0 => continue,
                1 => values.pop().unwrap_or_default(),
                _ => Value::Array(values),
            };
            out.insert(kind.to_string(), value);
        }
        self.path.pop();
        out
    }
}

/// Rebuilds the nested tree described by `model`.
///
/// Relations sharing a `(parent, kind)` pair become an array in relation
/// order; a pair with a single relation becomes a bare object. A kind that
/// matches a data key replaces the data value.
///
/// A missing root yields `{}`; relations to missing children are skipped.
///
/// # Example
///
/// ```
/// use tree_surgeon::{compose, decompose};
/// use serde_json::json;
///
/// let tree = json!({"name": "root", "kids": [{"n": 1}, {"n": 2}], "only": {"n": 3}});
/// assert_eq!(compose(&decompose(&tree).unwrap()), tree);
/// ```
pub fn compose(model: &RelationalModel) -> Value {
    if !model.has_root() {
        debug!(root = %model.root, "root not present, composing empty document");
        return Value::Object(Map::new());
    }
    let mut composer = Composer {
        model,
        children: index_children(model),
        path: Vec::new(),
    };
    let tree = composer.build(&model.root);
    debug!(
        root = %model.root,
        nodes = model.nodes.len(),
        relations = model.relations.len(),
        "composed tree"
    );
    Value::Object(tree)
}
