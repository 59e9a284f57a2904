//! Create `faculty` table with FK to `institution`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Faculty::Table)
                    .if_not_exists()
                    .col(uuid(Faculty::Id).primary_key())
                    .col(uuid(Faculty::InstitutionId).not_null())
                    .col(string_len(Faculty::Name, 255).not_null())
                    .col(string_len(Faculty::Dean, 100).not_null())
                    .col(string_len(Faculty::Location, 100).not_null())
                    .col(string_len(Faculty::Email, 255).not_null())
                    .col(text(Faculty::Description).not_null())
                    .col(string_len(Faculty::Status, 20).not_null())
                    .col(timestamp_with_time_zone(Faculty::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Faculty::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_faculty_institution")
                            .from(Faculty::Table, Faculty::InstitutionId)
                            .to(Institution::Table, Institution::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Faculty::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Faculty {
    Table,
    Id,
    InstitutionId,
    Name,
    Dean,
    Location,
    Email,
    Description,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Institution {
    Table,
    Id,
}
