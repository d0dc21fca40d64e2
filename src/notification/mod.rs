//! Incident notifications as published by the alerting pipeline.
//!
//! Only the node label is of interest:
//!
//! ```json
//! { "incident": { "metric": { "labels": { "Node": "prod-cluster-node-7" } } } }
//! ```
//!
//! Everything else in the payload is ignored.

use serde_json::Value;

use crate::kubernetes::model::NodeName;

const NODE_PATH: [&str; 4] = ["incident", "metric", "labels", "Node"];

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Payload is not valid JSON: {0}")]
    NotStructured(#[from] serde_json::Error),
    #[error("Missing field `{path}`.")]
    MissingField { path: String },
    #[error("Field `{path}` should be {expected}, got {found}.")]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

pub fn decode_node_name(payload: &[u8]) -> Result<NodeName, DecodeError> {
    let root: Value = serde_json::from_slice(payload)?;

    let mut current = &root;
    for (depth, key) in NODE_PATH.iter().enumerate() {
        let object = current.as_object().ok_or_else(|| DecodeError::WrongType {
            path: path_until(depth),
            expected: "an object",
            found: json_type(current),
        })?;
        current = object
            .get(*key)
            .ok_or_else(|| DecodeError::MissingField {
                path: path_until(depth + 1),
            })?;
    }

    match current {
        Value::String(node) => Ok(NodeName::new(node.as_str())),
        other => Err(DecodeError::WrongType {
            path: path_until(NODE_PATH.len()),
            expected: "a string",
            found: json_type(other),
        }),
    }
}

fn path_until(depth: usize) -> String {
    if depth == 0 {
        "$".to_string()
    } else {
        NODE_PATH[..depth].join(".")
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
