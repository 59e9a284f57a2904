//! Create `research_grant` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ResearchGrant::Table)
                    .if_not_exists()
                    .col(uuid(ResearchGrant::Id).primary_key())
                    .col(uuid(ResearchGrant::InstitutionId).not_null())
                    .col(uuid(ResearchGrant::ProjectId).not_null())
                    .col(string_len(ResearchGrant::Donor, 255).not_null())
                    .col(decimal_len(ResearchGrant::Amount, 14, 2).not_null())
                    .col(date(ResearchGrant::DateAwarded).not_null())
                    .col(timestamp_with_time_zone(ResearchGrant::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_research_grant_institution")
                            .from(ResearchGrant::Table, ResearchGrant::InstitutionId)
                            .to(Institution::Table, Institution::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_research_grant_project")
                            .from(ResearchGrant::Table, ResearchGrant::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ResearchGrant::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ResearchGrant {
    Table,
    Id,
    InstitutionId,
    ProjectId,
    Donor,
    Amount,
    DateAwarded,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Institution {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Project {
    Table,
    Id,
}
