use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A flag token attached to a publication (e.g. "verified", "commentary").
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "publication_flags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub publication_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub flag: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::publication::Entity",
        from = "Column::PublicationId",
        to = "super::publication::Column::Id",
        on_delete = "Cascade"
    )]
    Publication,
}

impl Related<super::publication::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Publication.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
