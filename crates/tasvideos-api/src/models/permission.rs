use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A capability that can be granted to a role.
///
/// Stored as an integer in `role_permissions.permission_id`; the
/// discriminants are part of the schema and must never be renumbered.
/// Values are grouped by site area in blocks of 100.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum PermissionTo {
    // Wiki
    #[sea_orm(num_value = 1)]
    EditWikiPages,
    #[sea_orm(num_value = 2)]
    EditGameResources,
    #[sea_orm(num_value = 3)]
    EditSystemPages,
    #[sea_orm(num_value = 4)]
    EditHomePage,

    // Submission queue
    #[sea_orm(num_value = 100)]
    SubmitMovies,
    #[sea_orm(num_value = 101)]
    JudgeSubmissions,
    #[sea_orm(num_value = 102)]
    PublishMovies,
    #[sea_orm(num_value = 103)]
    ReplaceSubmissionMovieFile,

    // Publications
    #[sea_orm(num_value = 200)]
    EditPublicationMetaData,
    #[sea_orm(num_value = 201)]
    SetTier,
    #[sea_orm(num_value = 202)]
    EditPublicationFiles,

    // Forum
    #[sea_orm(num_value = 300)]
    CreateForumPosts,
    #[sea_orm(num_value = 301)]
    EditForumPosts,
    #[sea_orm(num_value = 302)]
    DeleteForumPosts,
    #[sea_orm(num_value = 303)]
    LockTopics,

    // User administration
    #[sea_orm(num_value = 400)]
    EditUsers,
    #[sea_orm(num_value = 401)]
    EditRoles,
    #[sea_orm(num_value = 402)]
    AssignRoles,
    #[sea_orm(num_value = 403)]
    SeeEmails,
}
