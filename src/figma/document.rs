//! Flattening of a Figma file document into [`FileAttributes`].

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::types::{FileAttributes, NodeAttributes};
use crate::error::{AppError, Result};

/// Build import attributes from a `GET /v1/files/{key}` response body.
///
/// Every object in the `document` tree becomes one node, in pre-order.
/// A node's raw data is its JSON object without `children`, since each
/// child is stored as its own node.
pub fn file_attributes(key: &str, doc: &Value) -> Result<FileAttributes> {
    let name = doc
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::BadRequest(format!("file '{}' has no name", key)))?;

    let mut attrs = FileAttributes::new(key, name);

    if let Some(url) = doc.get("thumbnailUrl").and_then(Value::as_str) {
        attrs = attrs.with_thumbnail_url(url);
    }

    if let Some(ts) = doc.get("lastModified").and_then(Value::as_str) {
        let modified = DateTime::parse_from_rfc3339(ts)
            .map_err(|e| AppError::BadRequest(format!("invalid lastModified '{}': {}", ts, e)))?;
        attrs = attrs.with_modified(modified.with_timezone(&Utc));
    }

    let mut nodes = Vec::new();
    if let Some(root) = doc.get("document") {
        collect_nodes(root, &mut nodes);
    }
    tracing::debug!("Flattened {} nodes from file '{}'", nodes.len(), key);

    Ok(attrs.with_nodes(nodes))
}

fn collect_nodes(value: &Value, out: &mut Vec<NodeAttributes>) {
    let Some(object) = value.as_object() else {
        return;
    };

    let id = object.get("id").and_then(Value::as_str);
    let node_type = object.get("type").and_then(Value::as_str);

    if let (Some(id), Some(node_type)) = (id, node_type) {
        let name = object.get("name").and_then(Value::as_str).unwrap_or_default();
        let mut raw = object.clone();
        raw.remove("children");
        out.push(NodeAttributes::new(id, name, node_type, Value::Object(raw)));
    } else {
        tracing::warn!("Skipping node without id or type");
    }

    if let Some(children) = object.get("children").and_then(Value::as_array) {
        for child in children {
            collect_nodes(child, out);
        }
    }
}
