use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ── publications ──
        manager
            .create_table(
                Table::create()
                    .table(Publications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Publications::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Publications::Title).string().not_null())
                    .col(ColumnDef::new(Publications::Branch).string().null())
                    .col(ColumnDef::new(Publications::EmulatorVersion).string().null())
                    .col(ColumnDef::new(Publications::ClassName).string().not_null())
                    .col(ColumnDef::new(Publications::SystemCode).string().not_null())
                    .col(
                        ColumnDef::new(Publications::SubmissionId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Publications::GameId).integer().not_null())
                    .col(ColumnDef::new(Publications::GameName).string().not_null())
                    .col(ColumnDef::new(Publications::Year).integer().not_null())
                    .col(ColumnDef::new(Publications::ObsoletedById).integer().null())
                    .col(
                        ColumnDef::new(Publications::Frames)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Publications::RerecordCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Publications::CreateTimestamp)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_publications_system_code", Publications::SystemCode),
            ("idx_publications_game_id", Publications::GameId),
            ("idx_publications_obsoleted_by_id", Publications::ObsoletedById),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Publications::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        // ── publication_authors ──
        manager
            .create_table(
                Table::create()
                    .table(PublicationAuthors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PublicationAuthors::PublicationId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PublicationAuthors::UserId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(PublicationAuthors::PublicationId)
                            .col(PublicationAuthors::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_publication_authors_publication")
                            .from(PublicationAuthors::Table, PublicationAuthors::PublicationId)
                            .to(Publications::Table, Publications::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_publication_authors_user")
                            .from(PublicationAuthors::Table, PublicationAuthors::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_publication_authors_user")
                    .table(PublicationAuthors::Table)
                    .col(PublicationAuthors::UserId)
                    .to_owned(),
            )
            .await?;

        // ── publication_flags ──
        manager
            .create_table(
                Table::create()
                    .table(PublicationFlags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PublicationFlags::PublicationId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PublicationFlags::Flag).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(PublicationFlags::PublicationId)
                            .col(PublicationFlags::Flag),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_publication_flags_publication")
                            .from(PublicationFlags::Table, PublicationFlags::PublicationId)
                            .to(Publications::Table, Publications::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PublicationFlags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PublicationAuthors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Publications::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden, Clone, Copy)]
enum Publications {
    Table,
    Id,
    Title,
    Branch,
    EmulatorVersion,
    ClassName,
    SystemCode,
    SubmissionId,
    GameId,
    GameName,
    Year,
    ObsoletedById,
    Frames,
    RerecordCount,
    CreateTimestamp,
}

#[derive(Iden)]
enum PublicationAuthors {
    Table,
    PublicationId,
    UserId,
}

#[derive(Iden)]
enum PublicationFlags {
    Table,
    PublicationId,
    Flag,
}
