//! Validation of hand-built relational models.
//!
//! The chop operations and [`compose`](crate::compose) accept any model and
//! tolerate a missing root or dangling children. `validate_model` is an
//! opt-in check that a model is a well-formed forest rooted at `root`.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::types::{NodeId, RelationalModel};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ROOT_MISSING: root `{0}` is not a node")]
    MissingRoot(NodeId),
    #[error("DANGLING_PARENT: relation parent `{0}` is not a node")]
    DanglingParent(NodeId),
    #[error("DANGLING_CHILD: relation child `{0}` is not a node")]
    DanglingChild(NodeId),
    #[error("MULTIPLE_PARENTS: `{0}` is the child of more than one relation")]
    MultipleParents(NodeId),
    #[error("ROOT_HAS_PARENT: root `{0}` is the child of a relation")]
    RootHasParent(NodeId),
    #[error("CYCLE: `{0}` is its own ancestor")]
    Cycle(NodeId),
}

/// Checks that `model` is a forest rooted at `model.root`.
///
/// Reports the first problem found, in this order: missing root, dangling
/// relation endpoints, a child with several parents, a parent above the
/// root, a relation cycle. Nodes unreachable from the root are allowed.
///
/// # Errors
///
/// Returns the [`ValidationError`] describing the first violation.
///
/// # Example
///
/// ```
/// use tree_surgeon::{chop, decompose, validate_model, ValidationError};
/// use serde_json::json;
///
/// let model = decompose(&json!({"a": {"b": {}}})).unwrap();
/// validate_model(&model).unwrap();
///
/// let chopped = chop(|_| true, &model);
/// assert!(matches!(validate_model(&chopped), Err(ValidationError::MissingRoot(_))));
/// ```
pub fn validate_model(model: &RelationalModel) -> Result<(), ValidationError> {
    if !model.has_root() {
        return Err(ValidationError::MissingRoot(model.root.clone()));
    }

    let mut parent_of: HashMap<&NodeId, &NodeId> = HashMap::new();
    for rel in &model.relations {
        if !model.contains(&rel.parent) {
            return Err(ValidationError::DanglingParent(rel.parent.clone()));
        }
        if !model.contains(&rel.child) {
            return Err(ValidationError::DanglingChild(rel.child.clone()));
        }
        if parent_of.insert(&rel.child, &rel.parent).is_some() {
            return Err(ValidationError::MultipleParents(rel.child.clone()));
        }
    }
    if parent_of.contains_key(&model.root) {
        return Err(ValidationError::RootHasParent(model.root.clone()));
    }

    // With one parent per node, walking up from each node either ends at a
    // parentless node or revisits one on the current walk.
    let mut settled: HashSet<&NodeId> = HashSet::new();
    for start in model.nodes.keys() {
        let mut walk: Vec<&NodeId> = Vec::new();
        let mut current = start;
        while !settled.contains(current) {
            if walk.contains(&current) {
                return Err(ValidationError::Cycle(current.clone()));
            }
            walk.push(current);
            match parent_of.get(current) {
                Some(&parent) => current = parent,
                None => break,
            }
        }
        settled.extend(walk);
    }
    Ok(())
}
