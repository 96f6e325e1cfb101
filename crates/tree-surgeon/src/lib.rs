//! Tree/relational duality for JSON documents.
//!
//! A document tree is decomposed into a flat [`RelationalModel`]: a node table
//! holding each object's data attributes, plus an ordered list of
//! `(parent, child, kind)` [`Relation`]s recording where every child object was
//! nested. [`compose`] is the inverse. The chop family prunes the relational
//! form:
//!
//! - [`chop`] removes matching nodes and their subtrees;
//! - [`chop_after`] keeps matching nodes but removes everything below them;
//! - [`chop_by_kind`] only removes matching nodes reached under one kind;
//! - [`chop_childless`] only removes matching leaves;
//! - [`chop_nodes_by_ids`] removes an explicit set of nodes and their subtrees.
//!
//! # Example
//!
//! ```
//! use tree_surgeon::{chop_by_kind, compose, decompose, predicate::field_equals};
//! use serde_json::json;
//!
//! let tree = json!({
//!     "children": [
//!         {"hello": "world"},
//!         {"goodbye": "world", "match": "yes"},
//!         {"where": "is waldo", "match": "no"}
//!     ],
//!     "other": {"match": "yes"}
//! });
//! let model = decompose(&tree).unwrap();
//! let pruned = chop_by_kind("children", field_equals("match", "yes"), &model);
//!
//! assert_eq!(
//!     compose(&pruned),
//!     json!({
//!         "children": [{"hello": "world"}, {"where": "is waldo", "match": "no"}],
//!         "other": {"match": "yes"}
//!     })
//! );
//! ```

pub mod chop;
pub mod compose;
pub mod decompose;
pub mod error;
pub mod predicate;
pub mod types;
pub mod validate;

pub use chop::{chop, chop_after, chop_by_kind, chop_childless, chop_nodes_by_ids};
pub use compose::compose;
pub use decompose::{
    decompose, decompose_with_ids, decompose_with_options, try_decompose_with_ids, DecomposeOptions,
};
pub use error::SurgeryError;
pub use types::{NodeData, NodeId, Nodes, Relation, RelationalModel};
pub use validate::{validate_model, ValidationError};
