//! Tree to relational decomposition.
//!
//! Walks a document depth-first (attribute order, then array order), splitting
//! each object into its data attributes and its relationship attributes.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{type_name, SurgeryError};
use crate::types::{NodeData, NodeId, Relation, RelationalModel};

/// Options for [`decompose_with_options`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecomposeOptions {
    /// Prefix of generated ids.
    pub id_prefix: String,
    /// Sequence number given to the root.
    pub first_id: u64,
}

impl Default for DecomposeOptions {
    fn default() -> Self {
        DecomposeOptions {
            id_prefix: "id_".to_string(),
            first_id: 0,
        }
    }
}

/// Sequential id generator: `{prefix}{n}` in visitation order.
struct Sequence<'a> {
    prefix: &'a str,
    next: u64,
}

impl Sequence<'_> {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

/// Whether an attribute value holds child nodes rather than data.
///
/// Objects are nodes. Arrays are relationships only when non-empty and made
/// entirely of objects; any other array is kept verbatim as data.
fn is_relationship(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => !items.is_empty() && items.iter().all(Value::is_object),
        _ => false,
    }
}

fn children_of(value: &Value) -> Vec<&Map<String, Value>> {
    match value {
        Value::Object(map) => vec![map],
        Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
        _ => Vec::new(),
    }
}

/// Data attributes of `node`, in key order.
fn split_data(node: &Map<String, Value>) -> NodeData {
    node.iter()
        .filter(|(_, v)| !is_relationship(v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

struct Decomposer<F> {
    id_of: F,
    model: RelationalModel,
}

impl<F, E> Decomposer<F>
where
    F: FnMut(&NodeData) -> Result<NodeId, E>,
{
    /// Assigns an id to `node` and records its data.
    fn enter(&mut self, node: &Map<String, Value>) -> Result<NodeId, E> {
        let data = split_data(node);
        let id = (self.id_of)(&data)?;
        trace!(node = %id, attributes = data.len(), "decompose node");
        // Later duplicates overwrite, keeping the first insertion slot.
        self.model.nodes.insert(id.clone(), data);
        Ok(id)
    }

    /// Records the relationships below an already entered node.
    fn visit(&mut self, id: &NodeId, node: &Map<String, Value>) -> Result<(), E> {
        for (key, value) in node {
            if !is_relationship(value) {
                continue;
            }
            for child in children_of(value) {
                let child_id = self.enter(child)?;
                self.model
                    .relations
                    .push(Relation::new(id.clone(), child_id.clone(), key.as_str()));
                self.visit(&child_id, child)?;
            }
        }
        Ok(())
    }
}

fn as_document(tree: &Value) -> Result<&Map<String, Value>, SurgeryError> {
    tree.as_object()
        .ok_or_else(|| SurgeryError::NotADocument(type_name(tree)))
}

/// Decomposes a tree with caller-extracted ids, stopping at the first error.
///
/// `id_of` receives each node's data attributes (its relationship attributes
/// are already split off) and must return ids that are unique across the
/// tree. Uniqueness is not checked: a later node with a repeated id replaces
/// the earlier node's data.
///
/// # Errors
///
/// Returns [`SurgeryError::NotADocument`] (converted into `E`) if `tree` is
/// not an object, or the first error produced by `id_of`.
///
/// # Example
///
/// ```
/// use tree_surgeon::{try_decompose_with_ids, predicate::field_id, SurgeryError};
/// use serde_json::json;
///
/// let tree = json!({"id": "r", "child": {"id": "c"}});
/// let model = try_decompose_with_ids(&tree, field_id("id")).unwrap();
/// assert_eq!(model.root.as_str(), "r");
///
/// let missing = json!({"id": "r", "child": {"name": "c"}});
/// let err = try_decompose_with_ids(&missing, field_id("id")).unwrap_err();
/// assert_eq!(err, SurgeryError::MissingId { field: "id".to_string() });
/// ```
pub fn try_decompose_with_ids<F, E>(tree: &Value, id_of: F) -> Result<RelationalModel, E>
where
    F: FnMut(&NodeData) -> Result<NodeId, E>,
    E: From<SurgeryError>,
{
    let document = as_document(tree)?;
    let mut decomposer = Decomposer {
        id_of,
        model: RelationalModel::new(""),
    };
    let root = decomposer.enter(document)?;
    decomposer.visit(&root, document)?;
    let mut model = decomposer.model;
    model.root = root;
    debug!(
        root = %model.root,
        nodes = model.nodes.len(),
        relations = model.relations.len(),
        "decomposed tree"
    );
    Ok(model)
}

/// Decomposes a tree, taking each node's id from `id_of`.
///
/// See [`try_decompose_with_ids`] for the uniqueness contract.
///
/// # Errors
///
/// Returns [`SurgeryError::NotADocument`] if `tree` is not an object.
pub fn decompose_with_ids<F>(tree: &Value, mut id_of: F) -> Result<RelationalModel, SurgeryError>
where
    F: FnMut(&NodeData) -> NodeId,
{
    try_decompose_with_ids(tree, |data: &NodeData| Ok::<_, SurgeryError>(id_of(data)))
}

/// Decomposes a tree, generating ids from `options`.
///
/// # Errors
///
/// Returns [`SurgeryError::NotADocument`] if `tree` is not an object.
pub fn decompose_with_options(
    tree: &Value,
    options: &DecomposeOptions,
) -> Result<RelationalModel, SurgeryError> {
    let mut sequence = Sequence {
        prefix: &options.id_prefix,
        next: options.first_id,
    };
    decompose_with_ids(tree, |_| sequence.next_id())
}

/// Decomposes a tree into a [`RelationalModel`] with generated ids.
///
/// Ids are `id_0`, `id_1`, ... in depth-first visitation order, so the root
/// is always `id_0`.
///
/// # Errors
///
/// Returns [`SurgeryError::NotADocument`] if `tree` is not an object.
///
/// # Example
///
/// ```
/// use tree_surgeon::decompose;
/// use serde_json::json;
///
/// let model = decompose(&json!({"name": "root", "kids": [{"n": 1}, {"n": 2}]})).unwrap();
/// assert_eq!(model.root.as_str(), "id_0");
/// assert_eq!(model.nodes.len(), 3);
/// assert_eq!(model.relations.len(), 2);
/// assert!(model.relations.iter().all(|r| r.kind == "kids"));
/// ```
pub fn decompose(tree: &Value) -> Result<RelationalModel, SurgeryError> {
    decompose_with_options(tree, &DecomposeOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_relationship() {
        assert!(is_relationship(&json!({})));
        assert!(is_relationship(&json!({"a": 1})));
        assert!(is_relationship(&json!([{"a": 1}, {}])));
        assert!(!is_relationship(&json!([])));
        assert!(!is_relationship(&json!([1, 2, 3])));
        assert!(!is_relationship(&json!([{"a": 1}, 2])));
        assert!(!is_relationship(&json!([[{"a": 1}]])));
        assert!(!is_relationship(&json!("x")));
        assert!(!is_relationship(&json!(null)));
    }

    #[test]
    fn test_ids_follow_visitation_order() {
        let tree = json!({
            "a": {"b": {"leaf": true}},
            "c": [{"x": 1}, {"x": 2}]
        });
        let model = decompose(&tree).unwrap();
        let ids: Vec<&str> = model.nodes.keys().map(NodeId::as_str).collect();
        assert_eq!(ids, vec!["id_0", "id_1", "id_2", "id_3", "id_4"]);
        assert_eq!(
            model.relations,
            vec![
                Relation::new("id_0", "id_1", "a"),
                Relation::new("id_1", "id_2", "b"),
                Relation::new("id_0", "id_3", "c"),
                Relation::new("id_0", "id_4", "c"),
            ]
        );
        assert_eq!(model.node(&NodeId::from("id_4")), json!({"x": 2}).as_object());
    }

    #[test]
    fn test_data_attributes_kept_verbatim() {
        let tree = json!({
            "s": "str",
            "n": 1.5,
            "nil": null,
            "list": [1, "two", null],
            "empty": [],
            "mixed": [{"a": 1}, 2]
        });
        let model = decompose(&tree).unwrap();
        assert!(model.relations.is_empty());
        assert_eq!(model.node(&model.root), tree.as_object());
    }

    #[test]
    fn test_empty_node_has_entry() {
        let model = decompose(&json!({"child": {}})).unwrap();
        assert_eq!(model.node(&NodeId::from("id_1")), Some(&Map::new()));
        assert_eq!(model.node(&NodeId::from("id_0")), Some(&Map::new()));
    }

    #[test]
    fn test_options_prefix_and_start() {
        let options = DecomposeOptions {
            id_prefix: "n".to_string(),
            first_id: 10,
        };
        let model = decompose_with_options(&json!({"k": {}}), &options).unwrap();
        assert_eq!(model.root.as_str(), "n10");
        assert_eq!(model.relations, vec![Relation::new("n10", "n11", "k")]);
    }

    #[test]
    fn test_rejects_non_object() {
        assert_eq!(
            decompose(&json!([1, 2])),
            Err(SurgeryError::NotADocument("array"))
        );
        assert_eq!(
            decompose(&json!("tree")),
            Err(SurgeryError::NotADocument("string"))
        );
    }

    #[test]
    fn test_duplicate_ids_overwrite() {
        let tree = json!({"id": "a", "v": 1, "child": {"id": "a", "v": 2}});
        let model = decompose_with_ids(&tree, |d| NodeId::from(d["id"].as_str().unwrap_or(""))).unwrap();
        assert_eq!(model.nodes.len(), 1);
        assert_eq!(model.node(&NodeId::from("a")), json!({"id": "a", "v": 2}).as_object());
        assert_eq!(model.relations, vec![Relation::new("a", "a", "child")]);
    }

    #[test]
    fn test_id_of_sees_data_only() {
        let tree = json!({"id": 1, "child": {"id": 2}});
        let mut seen = Vec::new();
        decompose_with_ids(&tree, |d| {
            seen.push(d.clone());
            NodeId::new(d["id"].to_string())
        })
        .unwrap();
        assert_eq!(seen[0], *json!({"id": 1}).as_object().unwrap());
        assert_eq!(seen[1], *json!({"id": 2}).as_object().unwrap());
    }
}
