//! Type definitions for the relational form of a document tree.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Scalar payload of a single node.
///
/// Holds only the "data" attributes of a document object: primitives and
/// arrays that are not arrays of nodes. Key order is preserved.
pub type NodeData = Map<String, Value>;

/// Node table keyed by id, iterated in insertion order.
pub type Nodes = IndexMap<NodeId, NodeData>;

/// Unique identifier of a node within a [`RelationalModel`].
///
/// Serializes as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId(id)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

impl From<&String> for NodeId {
    fn from(id: &String) -> Self {
        NodeId(id.clone())
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single `(Parent, Child, Kind)` edge.
///
/// `kind` is the attribute key under which the child was nested in tree form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Relation {
    pub parent: NodeId,
    pub child: NodeId,
    pub kind: String,
}

impl Relation {
    pub fn new(parent: impl Into<NodeId>, child: impl Into<NodeId>, kind: impl Into<String>) -> Self {
        Relation {
            parent: parent.into(),
            child: child.into(),
            kind: kind.into(),
        }
    }

    /// Whether `id` is either endpoint of this relation.
    pub fn touches(&self, id: &NodeId) -> bool {
        &self.parent == id || &self.child == id
    }
}

/// Flattened form of a document tree.
///
/// `relations` order is significant: relations sharing a `(parent, kind)` pair
/// compose to array elements in sequence order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RelationalModel {
    pub root: NodeId,
    pub nodes: Nodes,
    pub relations: Vec<Relation>,
}

impl RelationalModel {
    pub fn new(root: impl Into<NodeId>) -> Self {
        RelationalModel {
            root: root.into(),
            nodes: IndexMap::new(),
            relations: Vec::new(),
        }
    }

    /// Data of the node with the given id, if it is still present.
    pub fn node(&self, id: &NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Whether the root id still resolves to a node.
    pub fn has_root(&self) -> bool {
        self.contains(&self.root)
    }

    /// Outgoing `(kind, child)` pairs of `id`, in relation order.
    pub fn children<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = (&'a str, &'a NodeId)> + 'a {
        self.relations
            .iter()
            .filter(move |r| &r.parent == id)
            .map(|r| (r.kind.as_str(), &r.child))
    }

    /// The relation through which `id` was reached, if any.
    ///
    /// Returns the first match; a well-formed model has at most one.
    pub fn parent(&self, id: &NodeId) -> Option<&Relation> {
        self.relations.iter().find(|r| &r.child == id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
