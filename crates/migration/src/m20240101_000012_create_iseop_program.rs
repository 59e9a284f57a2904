//! Create `iseop_program` table (community outreach programs).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IseopProgram::Table)
                    .if_not_exists()
                    .col(uuid(IseopProgram::Id).primary_key())
                    .col(uuid(IseopProgram::InstitutionId).not_null())
                    .col(string_len(IseopProgram::Name, 255).not_null())
                    .col(integer(IseopProgram::Capacity).not_null())
                    .col(integer(IseopProgram::Occupied).not_null())
                    .col(string_len(IseopProgram::Status, 20).not_null())
                    .col(ColumnDef::new(IseopProgram::ActivityLevel).string_len(100).null())
                    .col(ColumnDef::new(IseopProgram::Description).text().null())
                    .col(timestamp_with_time_zone(IseopProgram::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(IseopProgram::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_iseop_program_institution")
                            .from(IseopProgram::Table, IseopProgram::InstitutionId)
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
            .drop_table(Table::drop().table(IseopProgram::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum IseopProgram {
    Table,
    Id,
    InstitutionId,
    Name,
    Capacity,
    Occupied,
    Status,
    ActivityLevel,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Institution {
    Table,
    Id,
}
