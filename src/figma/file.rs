//! FileRecord: one imported Figma file.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "figma_files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Key issued by Figma, e.g. the `abc123` in `figma.com/file/abc123/...`.
    #[sea_orm(unique)]
    pub key: String,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub created: DateTimeUtc,
    pub modified: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::node::Entity")]
    Nodes,
}

impl Related<super::node::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Nodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
