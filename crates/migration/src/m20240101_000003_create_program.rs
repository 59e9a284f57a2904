//! Create `program` table with FK to `faculty`.
//!
//! Program codes are unique per faculty (composite unique index).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Program::Table)
                    .if_not_exists()
                    .col(uuid(Program::Id).primary_key())
                    .col(uuid(Program::FacultyId).not_null())
                    .col(string_len(Program::Name, 255).not_null())
                    .col(string_len(Program::Code, 50).not_null())
                    .col(integer(Program::DurationYears).not_null())
                    .col(string_len(Program::Level, 50).not_null())
                    .col(text(Program::Description).not_null())
                    .col(string_len(Program::Coordinator, 100).not_null())
                    .col(integer(Program::StudentCapacity).not_null())
                    .col(text(Program::Modules).not_null())
                    .col(text(Program::EntryRequirements).not_null())
                    .col(timestamp_with_time_zone(Program::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Program::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_program_faculty")
                            .from(Program::Table, Program::FacultyId)
                            .to(Faculty::Table, Faculty::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uniq_program_faculty_code")
                    .table(Program::Table)
                    .col(Program::FacultyId)
                    .col(Program::Code)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Program::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Program {
    Table,
    Id,
    FacultyId,
    Name,
    Code,
    DurationYears,
    Level,
    Description,
    Coordinator,
    StudentCapacity,
    Modules,
    EntryRequirements,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Faculty {
    Table,
    Id,
}
