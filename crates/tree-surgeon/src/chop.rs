//! Structural pruning over the relational form.
//!
//! Every operation reads its input model and returns a new one. Removing a
//! node also removes each relation it takes part in; the root id is carried
//! over unchanged even when the root itself is removed, so composing such a
//! model yields `{}`.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::types::{NodeData, NodeId, RelationalModel};

/// Expands `seed` with every node reachable from it through relations.
fn descendant_closure<'a>(model: &'a RelationalModel, seed: HashSet<&'a NodeId>) -> HashSet<&'a NodeId> {
    let mut children: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
    for rel in &model.relations {
        children.entry(&rel.parent).or_default().push(&rel.child);
    }

    let mut pending: Vec<&NodeId> = seed.iter().copied().collect();
    let mut removed = seed;
    while let Some(id) = pending.pop() {
        for &child in children.get(id).into_iter().flatten() {
            if removed.insert(child) {
                pending.push(child);
            }
        }
    }
    removed
}

/// Copy of `model` without the `removed` nodes and their relations.
fn without(model: &RelationalModel, removed: &HashSet<&NodeId>, operation: &'static str) -> RelationalModel {
    let nodes = model
        .nodes
        .iter()
        .filter(|(id, _)| !removed.contains(id))
        .map(|(id, data)| (id.clone(), data.clone()))
        .collect();
    let relations = model
        .relations
        .iter()
        .filter(|r| !removed.contains(&r.parent) && !removed.contains(&r.child))
        .cloned()
        .collect();
    let out = RelationalModel {
        root: model.root.clone(),
        nodes,
        relations,
    };
    debug!(
        operation,
        removed = model.nodes.len() - out.nodes.len(),
        nodes = out.nodes.len(),
        relations = out.relations.len(),
        "chopped model"
    );
    out
}

fn matching<F>(model: &RelationalModel, filter: F) -> HashSet<&NodeId>
where
    F: Fn(&NodeData) -> bool,
{
    model
        .nodes
        .iter()
        .filter(|&(_, data)| filter(data))
        .map(|(id, _)| id)
        .collect()
}

/// Removes every node matching `filter` together with its whole subtree.
///
/// # Example
///
/// ```
/// use tree_surgeon::{chop, compose, decompose, predicate::field_equals};
/// use serde_json::json;
///
/// let tree = json!({
///     "keep": {"match": "no", "goneChild": {"match": "yes"}},
///     "gone": {"match": "yes"}
/// });
/// let model = chop(field_equals("match", "yes"), &decompose(&tree).unwrap());
/// assert_eq!(compose(&model), json!({"keep": {"match": "no"}}));
/// ```
pub fn chop<F>(filter: F, model: &RelationalModel) -> RelationalModel
where
    F: Fn(&NodeData) -> bool,
{
    let seed = matching(model, filter);
    without(model, &descendant_closure(model, seed), "chop")
}

/// Removes everything below nodes matching `filter`, keeping the nodes.
///
/// A matching node keeps its data but loses all of its relations to
/// children. Nodes with no matching ancestor are untouched.
pub fn chop_after<F>(filter: F, model: &RelationalModel) -> RelationalModel
where
    F: Fn(&NodeData) -> bool,
{
    let matched = matching(model, filter);
    let seed = model
        .relations
        .iter()
        .filter(|r| matched.contains(&r.parent))
        .map(|r| &r.child)
        .collect();
    without(model, &descendant_closure(model, seed), "chop_after")
}

/// Removes nodes matching `filter` that were reached through a `kind`
/// relation, with their subtrees.
///
/// Matching nodes reached under any other kind stay, and so does the root,
/// which has no incoming relation.
pub fn chop_by_kind<F>(kind: &str, filter: F, model: &RelationalModel) -> RelationalModel
where
    F: Fn(&NodeData) -> bool,
{
    let seed = model
        .relations
        .iter()
        .filter(|r| r.kind == kind)
        .filter(|r| model.node(&r.child).is_some_and(|data| filter(data)))
        .map(|r| &r.child)
        .collect();
    without(model, &descendant_closure(model, seed), "chop_by_kind")
}

/// Removes nodes matching `filter` that have no outgoing relations.
///
/// A matching node with children is left as it is, children included. Only
/// the input's leaves are considered; leaves exposed by this pass are not.
pub fn chop_childless<F>(filter: F, model: &RelationalModel) -> RelationalModel
where
    F: Fn(&NodeData) -> bool,
{
    let parents: HashSet<&NodeId> = model.relations.iter().map(|r| &r.parent).collect();
    let removed = matching(model, filter)
        .into_iter()
        .filter(|id| !parents.contains(id))
        .collect();
    without(model, &removed, "chop_childless")
}

/// Removes the nodes with the given ids together with their subtrees.
///
/// Ids not present in the model are ignored.
///
/// # Example
///
/// ```
/// use tree_surgeon::{chop_nodes_by_ids, compose, decompose_with_ids, NodeId};
/// use serde_json::json;
///
/// let tree = json!({"id": "r", "a": {"id": "a"}, "b": {"id": "b"}});
/// let model = decompose_with_ids(&tree, |n| NodeId::from(n["id"].as_str().unwrap_or_default())).unwrap();
/// let model = chop_nodes_by_ids(["a"], &model);
/// assert_eq!(compose(&model), json!({"id": "r", "b": {"id": "b"}}));
/// ```
pub fn chop_nodes_by_ids<I>(ids: I, model: &RelationalModel) -> RelationalModel
where
    I: IntoIterator,
    I::Item: Into<NodeId>,
{
    let wanted: HashSet<NodeId> = ids.into_iter().map(Into::into).collect();
    let seed = model.nodes.keys().filter(|id| wanted.contains(*id)).collect();
    without(model, &descendant_closure(model, seed), "chop_nodes_by_ids")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Relation;
    use serde_json::{json, Value};

    fn model(nodes: &[(&str, Value)], relations: &[(&str, &str, &str)]) -> RelationalModel {
        let mut m = RelationalModel::new(nodes[0].0);
        for (id, value) in nodes {
            m.nodes.insert(NodeId::from(*id), value.as_object().cloned().unwrap_or_default());
        }
        for (p, c, k) in relations {
            m.relations.push(Relation::new(*p, *c, *k));
        }
        m
    }

    fn ids(m: &RelationalModel) -> Vec<&str> {
        m.nodes.keys().map(NodeId::as_str).collect()
    }

    /// r -> a -> b -> c, r -> d
    fn chain() -> RelationalModel {
        model(
            &[
                ("r", json!({})),
                ("a", json!({"hit": true})),
                ("b", json!({})),
                ("c", json!({"hit": true})),
                ("d", json!({})),
            ],
            &[("r", "a", "x"), ("a", "b", "x"), ("b", "c", "x"), ("r", "d", "y")],
        )
    }

    fn hit(n: &NodeData) -> bool {
        n.get("hit") == Some(&json!(true))
    }

    #[test]
    fn test_descendant_closure_reaches_fixed_point() {
        let m = chain();
        let a = NodeId::from("a");
        let closed = descendant_closure(&m, [&a].into_iter().collect());
        let mut got: Vec<&str> = closed.iter().map(|id| id.as_str()).collect();
        got.sort();
        assert_eq!(got, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_chop_removes_subtree_and_edges() {
        let out = chop(hit, &chain());
        assert_eq!(ids(&out), vec!["r", "d"]);
        assert_eq!(out.relations, vec![Relation::new("r", "d", "y")]);
    }

    #[test]
    fn test_chop_root_keeps_root_id() {
        let out = chop(|_| true, &chain());
        assert!(out.nodes.is_empty());
        assert!(out.relations.is_empty());
        assert_eq!(out.root.as_str(), "r");
    }

    #[test]
    fn test_chop_after_keeps_matching_node() {
        let out = chop_after(hit, &chain());
        assert_eq!(ids(&out), vec!["r", "a", "d"]);
        assert_eq!(
            out.relations,
            vec![Relation::new("r", "a", "x"), Relation::new("r", "d", "y")]
        );
    }

    #[test]
    fn test_chop_by_kind_scoped() {
        let out = chop_by_kind("y", hit, &chain());
        assert_eq!(out, chain());
        let out = chop_by_kind("x", hit, &chain());
        assert_eq!(ids(&out), vec!["r", "d"]);
    }

    #[test]
    fn test_chop_by_kind_never_removes_root() {
        let m = model(&[("r", json!({"hit": true}))], &[]);
        assert_eq!(chop_by_kind("x", hit, &m), m);
    }

    #[test]
    fn test_chop_childless_only_leaves() {
        let out = chop_childless(hit, &chain());
        assert_eq!(ids(&out), vec!["r", "a", "b", "d"]);
        assert_eq!(out.relations.len(), 3);
    }

    #[test]
    fn test_chop_childless_single_pass() {
        let m = model(
            &[("r", json!({})), ("a", json!({"hit": true})), ("b", json!({"hit": true}))],
            &[("r", "a", "x"), ("a", "b", "x")],
        );
        let out = chop_childless(hit, &m);
        assert_eq!(ids(&out), vec!["r", "a"]);
    }

    #[test]
    fn test_chop_nodes_by_ids_ignores_unknown() {
        let out = chop_nodes_by_ids(["b", "nope"], &chain());
        assert_eq!(ids(&out), vec!["r", "a", "d"]);
        let out = chop_nodes_by_ids(Vec::<NodeId>::new(), &chain());
        assert_eq!(out, chain());
    }

    #[test]
    fn test_input_not_mutated() {
        let m = chain();
        let before = m.clone();
        let _ = chop(hit, &m);
        let _ = chop_after(hit, &m);
        let _ = chop_childless(hit, &m);
        assert_eq!(m, before);
    }
}
