//! Typed construction inputs for FileRecord and NodeRecord.
//!
//! These are the only shapes external input can be bound to. Each struct
//! lists exactly the fields a caller may set; unknown keys in a JSON body
//! have nowhere to land and are dropped during deserialization. Surrogate
//! ids are never part of an input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Check that a Figma file key is non-empty ASCII alphanumeric.
///
/// Keys are used as URL path segments and as lookup keys, so anything
/// else is rejected before it reaches the Figma API or the database.
pub fn validate_file_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(AppError::BadRequest("file key must not be empty".to_string()));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::BadRequest(format!(
            "file key '{}' must be ASCII letters and digits",
            key
        )));
    }
    Ok(())
}

/// Settable fields of a FileRecord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttributes {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Only used when the file is first stored.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub nodes: Vec<NodeAttributes>,
}

impl FileAttributes {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            thumbnail_url: None,
            created: None,
            modified: None,
            nodes: Vec::new(),
        }
    }

    pub fn with_thumbnail_url(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }

    pub fn with_nodes(mut self, nodes: Vec<NodeAttributes>) -> Self {
        self.nodes = nodes;
        self
    }
}

/// Reference to an owning FileRecord by its Figma key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub key: String,
}

/// Settable fields of a NodeRecord.
///
/// The owner is given either as `file_id` (the stored file's id) or as
/// `file` (its key). When nested inside [`FileAttributes`] both are ignored
/// and the enclosing file owns the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAttributes {
    #[serde(default)]
    pub file_id: Option<i32>,
    pub node_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub raw_data: serde_json::Value,
    #[serde(default)]
    pub file: Option<FileRef>,
}

impl NodeAttributes {
    pub fn new(
        node_id: impl Into<String>,
        name: impl Into<String>,
        node_type: impl Into<String>,
        raw_data: serde_json::Value,
    ) -> Self {
        Self {
            file_id: None,
            node_id: node_id.into(),
            name: name.into(),
            node_type: node_type.into(),
            raw_data,
            file: None,
        }
    }

    /// Owned by the stored file with this id.
    pub fn in_file(mut self, file_id: i32) -> Self {
        self.file_id = Some(file_id);
        self
    }

    /// Owned by the stored file with this key.
    pub fn in_file_key(mut self, key: impl Into<String>) -> Self {
        self.file = Some(FileRef { key: key.into() });
        self
    }
}
