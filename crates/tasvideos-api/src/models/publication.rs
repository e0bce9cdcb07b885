use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Publication entity: a published movie in the `publications` table.
///
/// Game, system and class are denormalized to their display keys since
/// this service only reads them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "publications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    pub branch: Option<String>,

    pub emulator_version: Option<String>,

    /// Publication class, e.g. "Standard", "Moons", "Stars"
    pub class_name: String,

    /// System code, e.g. "NES", "SNES", "GBA"
    pub system_code: String,

    pub submission_id: i32,

    pub game_id: i32,

    pub game_name: String,

    /// Release year of the game
    pub year: i32,

    /// Set once a newer publication supersedes this one
    pub obsoleted_by_id: Option<i32>,

    pub frames: i32,

    pub rerecord_count: i32,

    pub create_timestamp: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::publication_author::Entity")]
    Authors,
    #[sea_orm(has_many = "super::publication_flag::Entity")]
    Flags,
}

impl Related<super::publication_author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Authors.def()
    }
}

impl Related<super::publication_flag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ─── Response DTO ──────────────────────────────────────────────

/// The JSON representation returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicationResponse {
    pub id: i32,
    pub title: String,
    pub branch: Option<String>,
    pub emulator_version: Option<String>,
    #[serde(rename = "class")]
    pub class_name: String,
    pub system_code: String,
    pub submission_id: i32,
    pub game_id: i32,
    pub game_name: String,
    pub year: i32,
    pub obsoleted_by_id: Option<i32>,
    pub frames: i32,
    pub rerecords: i32,
    pub create_timestamp: NaiveDateTime,
    /// Author user names, alphabetical
    pub authors: Vec<String>,
    /// Flag tokens, alphabetical
    pub flags: Vec<String>,
}

/// Response properties that can be sorted on, with their backing column.
///
/// `authors` and `flags` are collections and deliberately absent.
pub const SORTABLE_FIELDS: &[(&str, Column)] = &[
    ("id", Column::Id),
    ("title", Column::Title),
    ("branch", Column::Branch),
    ("emulatorVersion", Column::EmulatorVersion),
    ("class", Column::ClassName),
    ("systemCode", Column::SystemCode),
    ("submissionId", Column::SubmissionId),
    ("gameId", Column::GameId),
    ("gameName", Column::GameName),
    ("year", Column::Year),
    ("obsoletedById", Column::ObsoletedById),
    ("frames", Column::Frames),
    ("rerecords", Column::RerecordCount),
    ("createTimestamp", Column::CreateTimestamp),
];

/// Names of the sortable response properties.
pub fn sortable_field_names() -> Vec<&'static str> {
    SORTABLE_FIELDS.iter().map(|(name, _)| *name).collect()
}

/// Column backing a response property, matched case-insensitively.
pub fn sort_column(field: &str) -> Option<Column> {
    SORTABLE_FIELDS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(field))
        .map(|(_, column)| *column)
}

impl PublicationResponse {
    pub fn from_parts(m: Model, mut authors: Vec<String>, mut flags: Vec<String>) -> Self {
        authors.sort_by_key(|a| a.to_lowercase());
        flags.sort_by_key(|f| f.to_lowercase());
        PublicationResponse {
            id: m.id,
            title: m.title,
            branch: m.branch,
            emulator_version: m.emulator_version,
            class_name: m.class_name,
            system_code: m.system_code,
            submission_id: m.submission_id,
            game_id: m.game_id,
            game_name: m.game_name,
            year: m.year,
            obsoleted_by_id: m.obsoleted_by_id,
            frames: m.frames,
            rerecords: m.rerecord_count,
            create_timestamp: m.create_timestamp,
            authors,
            flags,
        }
    }
}
