//! JSON response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::figma::{file, node};

/// A stored file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: i32,
    pub key: String,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<NodeResponse>>,
}

impl FileResponse {
    pub fn with_nodes(file: file::Model, nodes: Vec<node::Model>) -> Self {
        let mut response = Self::from(file);
        response.nodes = Some(nodes.into_iter().map(NodeResponse::from).collect());
        response
    }
}

impl From<file::Model> for FileResponse {
    fn from(file: file::Model) -> Self {
        Self {
            id: file.id,
            key: file.key,
            name: file.name,
            thumbnail_url: file.thumbnail_url,
            created: file.created,
            modified: file.modified,
            nodes: None,
        }
    }
}

/// A stored node.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeResponse {
    pub id: i32,
    pub file_id: i32,
    pub node_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub raw_data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<Box<FileResponse>>,
}

impl NodeResponse {
    pub fn with_file(node: node::Model, file: file::Model) -> Self {
        let mut response = Self::from(node);
        response.file = Some(Box::new(FileResponse::from(file)));
        response
    }
}

impl From<node::Model> for NodeResponse {
    fn from(node: node::Model) -> Self {
        Self {
            id: node.id,
            file_id: node.file_id,
            node_id: node.node_id,
            name: node.name,
            node_type: node.node_type,
            raw_data: node.raw_data,
            file: None,
        }
    }
}
