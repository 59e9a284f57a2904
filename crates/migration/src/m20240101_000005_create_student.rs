//! Create `student` table.
//!
//! Institution/program FKs are RESTRICT: enrolled students block
//! deletion of the hierarchy above them. `national_id` holds Fernet
//! ciphertext, so it is sized for tokens rather than raw IDs and has no
//! unique index (uniqueness is enforced on the plaintext in the service
//! layer).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(uuid(Student::Id).primary_key())
                    .col(string_len(Student::StudentId, 50).unique_key().not_null())
                    .col(ColumnDef::new(Student::NationalId).text().null())
                    .col(string_len(Student::FirstName, 100).not_null())
                    .col(string_len(Student::LastName, 100).not_null())
                    .col(string_len(Student::Gender, 10).not_null())
                    .col(ColumnDef::new(Student::DateOfBirth).date().null())
                    .col(integer(Student::EnrollmentYear).not_null())
                    .col(string_len(Student::Status, 20).not_null())
                    .col(ColumnDef::new(Student::DropoutReason).string_len(50).null())
                    .col(uuid(Student::InstitutionId).not_null())
                    .col(uuid(Student::ProgramId).not_null())
                    .col(ColumnDef::new(Student::GraduationYear).integer().null())
                    .col(ColumnDef::new(Student::FinalGrade).string_len(20).null())
                    .col(timestamp_with_time_zone(Student::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Student::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_institution")
                            .from(Student::Table, Student::InstitutionId)
                            .to(Institution::Table, Institution::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_program")
                            .from(Student::Table, Student::ProgramId)
                            .to(Program::Table, Program::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Student {
    Table,
    Id,
    StudentId,
    NationalId,
    FirstName,
    LastName,
    Gender,
    DateOfBirth,
    EnrollmentYear,
    Status,
    DropoutReason,
    InstitutionId,
    ProgramId,
    GraduationYear,
    FinalGrade,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Institution {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Program {
    Table,
    Id,
}
