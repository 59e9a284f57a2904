//! Create `staff` table. Faculty link is optional (admin staff).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Staff::Table)
                    .if_not_exists()
                    .col(uuid(Staff::Id).primary_key())
                    .col(uuid(Staff::InstitutionId).not_null())
                    .col(ColumnDef::new(Staff::FacultyId).uuid().null())
                    .col(string_len(Staff::FirstName, 100).not_null())
                    .col(string_len(Staff::LastName, 100).not_null())
                    .col(string_len(Staff::Email, 255).not_null())
                    .col(string_len(Staff::Phone, 50).not_null())
                    .col(string_len(Staff::EmployeeId, 50).unique_key().not_null())
                    .col(string_len(Staff::Position, 50).not_null())
                    .col(string_len(Staff::Department, 100).not_null())
                    .col(string_len(Staff::Qualification, 50).not_null())
                    .col(text(Staff::Specialization).not_null())
                    .col(date(Staff::DateJoined).not_null())
                    .col(boolean(Staff::IsActive).not_null())
                    .col(timestamp_with_time_zone(Staff::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Staff::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_institution")
                            .from(Staff::Table, Staff::InstitutionId)
                            .to(Institution::Table, Institution::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_faculty")
                            .from(Staff::Table, Staff::FacultyId)
                            .to(Faculty::Table, Faculty::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Staff::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Staff {
    Table,
    Id,
    InstitutionId,
    FacultyId,
    FirstName,
    LastName,
    Email,
    Phone,
    EmployeeId,
    Position,
    Department,
    Qualification,
    Specialization,
    DateJoined,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Institution {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Faculty {
    Table,
    Id,
}
