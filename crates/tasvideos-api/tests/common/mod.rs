#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use sea_orm_migration::MigratorTrait;
use tasvideos_api::migrations::Migrator;
use tasvideos_api::models::{
    PermissionTo, publication, publication_author, publication_flag, role, role_permission, user,
    user_role,
};
use tasvideos_core::{Config, db};

/// Fresh in-memory database with the schema applied.
pub async fn migrated_db() -> DatabaseConnection {
    let connection = db::connect(&Config::for_tests()).await.unwrap();
    Migrator::up(&connection, None).await.unwrap();
    connection
}

pub async fn add_user(db: &DatabaseConnection, id: i32, name: &str) {
    user::ActiveModel {
        id: Set(id),
        user_name: Set(name.to_string()),
    }
    .insert(db)
    .await
    .unwrap();
}

pub async fn add_role(db: &DatabaseConnection, id: i32, name: &str) {
    role::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        description: Set(None),
    }
    .insert(db)
    .await
    .unwrap();
}

pub async fn grant(db: &DatabaseConnection, role_id: i32, permission: PermissionTo) {
    role_permission::Entity::insert(role_permission::grant(role_id, permission))
        .exec_without_returning(db)
        .await
        .unwrap();
}

pub async fn assign(db: &DatabaseConnection, user_id: i32, role_id: i32) {
    user_role::Entity::insert(user_role::ActiveModel {
        user_id: Set(user_id),
        role_id: Set(role_id),
    })
    .exec_without_returning(db)
    .await
    .unwrap();
}

pub fn timestamp(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Publication row with every optional column empty.
pub struct SeedPublication {
    pub id: i32,
    pub title: &'static str,
    pub class_name: &'static str,
    pub system_code: &'static str,
    pub game_id: i32,
    pub game_name: &'static str,
    pub year: i32,
    pub obsoleted_by_id: Option<i32>,
    pub frames: i32,
    pub rerecords: i32,
    pub created: NaiveDateTime,
    pub authors: &'static [i32],
    pub flags: &'static [&'static str],
}

pub async fn add_publication(db: &DatabaseConnection, seed: SeedPublication) {
    publication::ActiveModel {
        id: Set(seed.id),
        title: Set(seed.title.to_string()),
        branch: Set(None),
        emulator_version: Set(None),
        class_name: Set(seed.class_name.to_string()),
        system_code: Set(seed.system_code.to_string()),
        submission_id: Set(seed.id * 10),
        game_id: Set(seed.game_id),
        game_name: Set(seed.game_name.to_string()),
        year: Set(seed.year),
        obsoleted_by_id: Set(seed.obsoleted_by_id),
        frames: Set(seed.frames),
        rerecord_count: Set(seed.rerecords),
        create_timestamp: Set(seed.created),
    }
    .insert(db)
    .await
    .unwrap();

    for user_id in seed.authors {
        publication_author::Entity::insert(publication_author::ActiveModel {
            publication_id: Set(seed.id),
            user_id: Set(*user_id),
        })
        .exec_without_returning(db)
        .await
        .unwrap();
    }
    for flag in seed.flags {
        publication_flag::Entity::insert(publication_flag::ActiveModel {
            publication_id: Set(seed.id),
            flag: Set(flag.to_string()),
        })
        .exec_without_returning(db)
        .await
        .unwrap();
    }
}

/// Three current publications and one obsoleted by #1.
///
/// | id | system | class    | game | year | frames | created    | authors        | flags                |
/// |----|--------|----------|------|------|--------|------------|----------------|----------------------|
/// | 1  | NES    | Standard | 1    | 1985 | 17000  | 2020-01-01 | Alpha, bravo   | Verified             |
/// | 2  | SNES   | Moons    | 2    | 1994 | 150000 | 2021-03-04 | Charlie        | verified, commentary |
/// | 3  | GBA    | Stars    | 3    | 2002 | 90000  | 2019-06-01 | bravo          |                      |
/// | 4  | NES    | Standard | 1    | 1985 | 18000  | 2015-01-01 | Alpha          | (obsoleted by 1)     |
pub async fn seed_catalog(db: &DatabaseConnection) {
    add_user(db, 1, "Alpha").await;
    add_user(db, 2, "bravo").await;
    add_user(db, 3, "Charlie").await;

    add_publication(
        db,
        SeedPublication {
            id: 1,
            title: "NES Super Mario Bros. in 4:54.032",
            class_name: "Standard",
            system_code: "NES",
            game_id: 1,
            game_name: "Super Mario Bros.",
            year: 1985,
            obsoleted_by_id: None,
            frames: 17_000,
            rerecords: 2_000,
            created: timestamp(2020, 1, 1),
            authors: &[1, 2],
            flags: &["Verified"],
        },
    )
    .await;
    add_publication(
        db,
        SeedPublication {
            id: 2,
            title: "SNES Super Metroid in 41:41.45",
            class_name: "Moons",
            system_code: "SNES",
            game_id: 2,
            game_name: "Super Metroid",
            year: 1994,
            obsoleted_by_id: None,
            frames: 150_000,
            rerecords: 8_000,
            created: timestamp(2021, 3, 4),
            authors: &[3],
            flags: &["verified", "commentary"],
        },
    )
    .await;
    add_publication(
        db,
        SeedPublication {
            id: 3,
            title: "GBA Metroid Fusion in 1:17:37.97",
            class_name: "Stars",
            system_code: "GBA",
            game_id: 3,
            game_name: "Metroid Fusion",
            year: 2002,
            obsoleted_by_id: None,
            frames: 90_000,
            rerecords: 500,
            created: timestamp(2019, 6, 1),
            authors: &[2],
            flags: &[],
        },
    )
    .await;
    add_publication(
        db,
        SeedPublication {
            id: 4,
            title: "NES Super Mario Bros. in 4:57.31",
            class_name: "Standard",
            system_code: "NES",
            game_id: 1,
            game_name: "Super Mario Bros.",
            year: 1985,
            obsoleted_by_id: Some(1),
            frames: 18_000,
            rerecords: 1_000,
            created: timestamp(2015, 1, 1),
            authors: &[1],
            flags: &[],
        },
    )
    .await;
}
