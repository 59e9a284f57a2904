//! Create `project` table (innovations, startups, industrial projects).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Project::Table)
                    .if_not_exists()
                    .col(uuid(Project::Id).primary_key())
                    .col(uuid(Project::InstitutionId).not_null())
                    .col(ColumnDef::new(Project::HubId).uuid().null())
                    .col(string_len(Project::Name, 255).not_null())
                    .col(string_len(Project::TeamName, 255).not_null())
                    .col(string_len(Project::Sector, 50).not_null())
                    .col(string_len(Project::LocationCategory, 10).not_null())
                    .col(string_len(Project::Stage, 50).not_null())
                    .col(text(Project::ProblemStatement).not_null())
                    .col(text(Project::ProposedSolution).not_null())
                    .col(decimal_len(Project::RevenueGenerated, 14, 2).not_null())
                    .col(decimal_len(Project::FundingAcquired, 14, 2).not_null())
                    .col(integer(Project::JobsCreated).not_null())
                    .col(timestamp_with_time_zone(Project::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Project::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_institution")
                            .from(Project::Table, Project::InstitutionId)
                            .to(Institution::Table, Institution::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_hub")
                            .from(Project::Table, Project::HubId)
                            .to(InnovationHub::Table, InnovationHub::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Project::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Project {
    Table,
    Id,
    InstitutionId,
    HubId,
    Name,
    TeamName,
    Sector,
    LocationCategory,
    Stage,
    ProblemStatement,
    ProposedSolution,
    RevenueGenerated,
    FundingAcquired,
    JobsCreated,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Institution {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum InnovationHub {
    Table,
    Id,
}
