//! Ready-made node predicates and id extractors.
//!
//! Any `Fn(&NodeData) -> bool` works as a filter; these cover the common
//! cases of matching on a single attribute.

use serde_json::Value;

use crate::error::SurgeryError;
use crate::types::{NodeData, NodeId};

/// Matches nodes whose `field` attribute equals `expected`.
///
/// # Example
///
/// ```
/// use tree_surgeon::predicate::field_equals;
/// use serde_json::json;
///
/// let is_match = field_equals("match", "yes");
/// assert!(is_match(json!({"match": "yes"}).as_object().unwrap()));
/// assert!(!is_match(json!({"match": "no"}).as_object().unwrap()));
/// assert!(!is_match(json!({}).as_object().unwrap()));
/// ```
pub fn field_equals(field: impl Into<String>, expected: impl Into<Value>) -> impl Fn(&NodeData) -> bool {
    let field = field.into();
    let expected = expected.into();
    move |data| data.get(&field) == Some(&expected)
}

/// Matches nodes that carry a `field` attribute, whatever its value.
pub fn has_field(field: impl Into<String>) -> impl Fn(&NodeData) -> bool {
    let field = field.into();
    move |data| data.contains_key(&field)
}

/// Negates a predicate.
pub fn not<F>(filter: F) -> impl Fn(&NodeData) -> bool
where
    F: Fn(&NodeData) -> bool,
{
    move |data| !filter(data)
}

/// Extracts ids from the `field` attribute, for
/// [`try_decompose_with_ids`](crate::try_decompose_with_ids).
///
/// Strings are used as-is and numbers by their JSON text.
///
/// # Errors
///
/// The returned function fails with [`SurgeryError::MissingId`] when a node
/// lacks the attribute and [`SurgeryError::InvalidId`] when it is neither a
/// string nor a number.
pub fn field_id(field: impl Into<String>) -> impl Fn(&NodeData) -> Result<NodeId, SurgeryError> {
    let field = field.into();
    move |data| match data.get(&field) {
        Some(Value::String(s)) => Ok(NodeId::new(s.as_str())),
        Some(Value::Number(n)) => Ok(NodeId::new(n.to_string())),
        Some(_) => Err(SurgeryError::InvalidId {
            field: field.clone(),
        }),
        None => Err(SurgeryError::MissingId {
            field: field.clone(),
        }),
    }
}
