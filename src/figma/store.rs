//! Persistence for Figma files and nodes on top of sea-orm.

use chrono::Utc;
use sea_orm::sea_query::Index;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection,
    EntityTrait, ModelTrait, NotSet, PaginatorTrait, QueryFilter,
    QueryOrder, Schema, Set, TransactionTrait,
};
use std::collections::HashSet;

use super::client::FigmaClient;
use super::types::{validate_file_key, FileAttributes, NodeAttributes};
use super::{document, file, node};
use crate::error::{AppError, Result};

/// Name of the unique index over `(file_id, node_id)`.
pub const NODE_UNIQUE_INDEX: &str = "idx_figma_nodes_file_node";

/// Rows per multi-row INSERT when importing nodes. Five bound columns per
/// row keeps a batch well under SQLite's host parameter limit.
pub const NODE_INSERT_BATCH: usize = 500;

/// Store of FileRecords and NodeRecords.
#[derive(Clone, Debug)]
pub struct FigmaStore {
    pub db: DatabaseConnection,
}

impl FigmaStore {
    /// Connect to the database and make sure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self> {
        tracing::debug!("Connecting to database {}", database_url);
        let db = Database::connect(database_url).await?;
        let store = Self { db };
        store.init_schema().await?;
        Ok(store)
    }

    /// Create tables and indexes if they do not exist yet.
    pub async fn init_schema(&self) -> Result<()> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);

        let files = schema
            .create_table_from_entity(file::Entity)
            .if_not_exists()
            .to_owned();
        self.db.execute(backend.build(&files)).await?;

        let nodes = schema
            .create_table_from_entity(node::Entity)
            .if_not_exists()
            .to_owned();
        self.db.execute(backend.build(&nodes)).await?;

        let unique_node = Index::create()
            .name(NODE_UNIQUE_INDEX)
            .table(node::Entity)
            .col(node::Column::FileId)
            .col(node::Column::NodeId)
            .unique()
            .if_not_exists()
            .to_owned();
        self.db.execute(backend.build(&unique_node)).await?;

        tracing::debug!("Database schema ready");
        Ok(())
    }

    // ========================================================================
    // Import
    // ========================================================================

    /// Insert or refresh a file by key and replace all of its nodes.
    ///
    /// Runs in one transaction. On re-import the stored `created` is kept,
    /// name, thumbnail and `modified` are refreshed, and the node set is
    /// replaced wholesale.
    pub async fn import_file(
        &self,
        attrs: FileAttributes,
    ) -> Result<(file::Model, Vec<node::Model>)> {
        validate_file(&attrs)?;
        for node in &attrs.nodes {
            validate_node(node)?;
        }
        check_unique_node_ids(&attrs.nodes)?;

        let FileAttributes {
            key,
            name,
            thumbnail_url,
            created,
            modified,
            nodes,
        } = attrs;
        let now = Utc::now();
        let modified = modified.unwrap_or(now);

        let txn = self.db.begin().await?;

        let existing = file::Entity::find()
            .filter(file::Column::Key.eq(key.as_str()))
            .one(&txn)
            .await?;

        let stored = match existing {
            Some(model) => {
                tracing::debug!("Re-importing file '{}' (id={})", key, model.id);
                let mut active: file::ActiveModel = model.into();
                active.name = Set(name);
                active.thumbnail_url = Set(thumbnail_url);
                active.modified = Set(modified);
                active.update(&txn).await?
            }
            None => {
                tracing::debug!("Importing new file '{}'", key);
                file::ActiveModel {
                    id: NotSet,
                    key: Set(key),
                    name: Set(name),
                    thumbnail_url: Set(thumbnail_url),
                    created: Set(created.unwrap_or(now)),
                    modified: Set(modified),
                }
                .insert(&txn)
                .await?
            }
        };

        let removed = node::Entity::delete_many()
            .filter(node::Column::FileId.eq(stored.id))
            .exec(&txn)
            .await?;

        let file_id = stored.id;
        let mut rows = nodes
            .into_iter()
            .map(|attrs| node_row(file_id, attrs))
            .peekable();
        while rows.peek().is_some() {
            let batch: Vec<node::ActiveModel> =
                rows.by_ref().take(NODE_INSERT_BATCH).collect();
            node::Entity::insert_many(batch).exec(&txn).await?;
        }

        let inserted = node::Entity::find()
            .filter(node::Column::FileId.eq(stored.id))
            .order_by_asc(node::Column::Id)
            .all(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(
            "Imported file '{}' (id={}): {} nodes ({} replaced)",
            stored.key,
            stored.id,
            inserted.len(),
            removed.rows_affected
        );
        Ok((stored, inserted))
    }

    /// Fetch a file from Figma and import it.
    pub async fn sync_file(
        &self,
        client: &FigmaClient,
        key: &str,
    ) -> Result<(file::Model, Vec<node::Model>)> {
        validate_file_key(key)?;
        let doc = client.fetch_file(key).await?;
        let attrs = document::file_attributes(key, &doc)?;
        self.import_file(attrs).await
    }

    /// Create a single node in an existing file.
    ///
    /// The owner is resolved from `file_id`, falling back to `file.key`.
    pub async fn create_node(&self, attrs: NodeAttributes) -> Result<node::Model> {
        validate_node(&attrs)?;

        let owner = match (attrs.file_id, attrs.file.as_ref()) {
            (Some(id), _) => file::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("file id {}", id)))?,
            (None, Some(file_ref)) => self.get_file(&file_ref.key).await?,
            (None, None) => {
                return Err(AppError::BadRequest(
                    "Node must reference a file via fileId or file.key".to_string(),
                ))
            }
        };

        let duplicate = node::Entity::find()
            .filter(node::Column::FileId.eq(owner.id))
            .filter(node::Column::NodeId.eq(attrs.node_id.as_str()))
            .count(&self.db)
            .await?;
        if duplicate > 0 {
            return Err(AppError::Conflict(format!(
                "node '{}' already exists in file '{}'",
                attrs.node_id, owner.key
            )));
        }

        // A concurrent insert can still win the race; the unique index then
        // fails this one and the error maps to Conflict.
        let model = node_row(owner.id, attrs).insert(&self.db).await?;

        tracing::info!(
            "Created node '{}' in file '{}' (id={})",
            model.node_id,
            owner.key,
            model.id
        );
        Ok(model)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// All files, most recently modified first.
    pub async fn list_files(&self) -> Result<Vec<file::Model>> {
        Ok(file::Entity::find()
            .order_by_desc(file::Column::Modified)
            .order_by_asc(file::Column::Key)
            .all(&self.db)
            .await?)
    }

    pub async fn find_file(&self, key: &str) -> Result<Option<file::Model>> {
        Ok(file::Entity::find()
            .filter(file::Column::Key.eq(key))
            .one(&self.db)
            .await?)
    }

    /// Like [`find_file`](Self::find_file) but a miss is an error.
    pub async fn get_file(&self, key: &str) -> Result<file::Model> {
        self.find_file(key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("file '{}'", key)))
    }

    /// A file together with its nodes, loaded through the `nodes` relation.
    pub async fn get_file_with_nodes(&self, key: &str) -> Result<(file::Model, Vec<node::Model>)> {
        let file = self.get_file(key).await?;
        let mut nodes = file.find_related(node::Entity).all(&self.db).await?;
        nodes.sort_by(|a, b| a.node_id.cmp(&b.node_id));
        Ok((file, nodes))
    }

    /// Nodes of a file, optionally restricted to one node type.
    pub async fn list_nodes(
        &self,
        key: &str,
        node_type: Option<&str>,
    ) -> Result<Vec<node::Model>> {
        let file = self.get_file(key).await?;
        let mut query = file.find_related(node::Entity);
        if let Some(node_type) = node_type {
            query = query.filter(node::Column::NodeType.eq(node_type));
        }
        Ok(query
            .order_by_asc(node::Column::NodeId)
            .all(&self.db)
            .await?)
    }

    pub async fn count_nodes(&self, key: &str) -> Result<u64> {
        let file = self.get_file(key).await?;
        Ok(file.find_related(node::Entity).count(&self.db).await?)
    }

    /// A node together with its owning file, loaded through the `file` relation.
    pub async fn get_node(&self, id: i32) -> Result<(node::Model, file::Model)> {
        let (node, file) = node::Entity::find_by_id(id)
            .find_also_related(file::Entity)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("node id {}", id)))?;

        let file = file.ok_or_else(|| {
            AppError::Internal(format!("node {} references missing file {}", id, node.file_id))
        })?;
        Ok((node, file))
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    /// Delete a file and all of its nodes. Returns whether the file existed.
    pub async fn delete_file(&self, key: &str) -> Result<bool> {
        let txn = self.db.begin().await?;

        let Some(file) = file::Entity::find()
            .filter(file::Column::Key.eq(key))
            .one(&txn)
            .await?
        else {
            tracing::debug!("Delete of unknown file '{}' ignored", key);
            return Ok(false);
        };

        let removed = node::Entity::delete_many()
            .filter(node::Column::FileId.eq(file.id))
            .exec(&txn)
            .await?;
        file.delete(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            "Deleted file '{}' and {} nodes",
            key,
            removed.rows_affected
        );
        Ok(true)
    }
}

fn node_row(file_id: i32, attrs: NodeAttributes) -> node::ActiveModel {
    node::ActiveModel {
        id: NotSet,
        file_id: Set(file_id),
        node_id: Set(attrs.node_id),
        name: Set(attrs.name),
        node_type: Set(attrs.node_type),
        raw_data: Set(attrs.raw_data),
    }
}

fn validate_file(attrs: &FileAttributes) -> Result<()> {
    validate_file_key(&attrs.key)?;
    if attrs.name.trim().is_empty() {
        return Err(AppError::BadRequest(format!(
            "file '{}' has an empty name",
            attrs.key
        )));
    }
    Ok(())
}

fn validate_node(attrs: &NodeAttributes) -> Result<()> {
    if attrs.node_id.trim().is_empty() {
        return Err(AppError::BadRequest("nodeId must not be empty".to_string()));
    }
    if attrs.node_type.trim().is_empty() {
        return Err(AppError::BadRequest(format!(
            "node '{}' has an empty type",
            attrs.node_id
        )));
    }
    Ok(())
}

fn check_unique_node_ids(nodes: &[NodeAttributes]) -> Result<()> {
    let mut seen = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !seen.insert(node.node_id.as_str()) {
            return Err(AppError::Conflict(format!(
                "duplicate nodeId '{}' in import",
                node.node_id
            )));
        }
    }
    Ok(())
}
