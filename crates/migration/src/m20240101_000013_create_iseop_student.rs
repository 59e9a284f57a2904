//! Create `iseop_student` table.
//!
//! `national_id` holds Fernet ciphertext (see the student migration for
//! why it carries no unique index).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IseopStudent::Table)
                    .if_not_exists()
                    .col(uuid(IseopStudent::Id).primary_key())
                    .col(uuid(IseopStudent::InstitutionId).not_null())
                    .col(ColumnDef::new(IseopStudent::ProgramId).uuid().null())
                    .col(string_len(IseopStudent::StudentId, 50).unique_key().not_null())
                    .col(text(IseopStudent::NationalId).not_null())
                    .col(string_len(IseopStudent::FirstName, 100).not_null())
                    .col(string_len(IseopStudent::LastName, 100).not_null())
                    .col(ColumnDef::new(IseopStudent::Email).string_len(255).null())
                    .col(ColumnDef::new(IseopStudent::Gender).string_len(20).null())
                    .col(ColumnDef::new(IseopStudent::EnrollmentYear).integer().null())
                    .col(string_len(IseopStudent::Status, 100).not_null())
                    .col(string_len(IseopStudent::DisabilityType, 50).not_null())
                    .col(ColumnDef::new(IseopStudent::DisabilityOther).string_len(255).null())
                    .col(timestamp_with_time_zone(IseopStudent::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(IseopStudent::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_iseop_student_institution")
                            .from(IseopStudent::Table, IseopStudent::InstitutionId)
                            .to(Institution::Table, Institution::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_iseop_student_program")
                            .from(IseopStudent::Table, IseopStudent::ProgramId)
                            .to(IseopProgram::Table, IseopProgram::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IseopStudent::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum IseopStudent {
    Table,
    Id,
    InstitutionId,
    ProgramId,
    StudentId,
    NationalId,
    FirstName,
    LastName,
    Email,
    Gender,
    EnrollmentYear,
    Status,
    DisabilityType,
    DisabilityOther,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Institution {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum IseopProgram {
    Table,
    Id,
}
