//! Create `payment` table with FK to `student` (cascade).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(uuid(Payment::Id).primary_key())
                    .col(uuid(Payment::StudentId).not_null())
                    .col(decimal_len(Payment::Amount, 10, 2).not_null())
                    .col(date(Payment::DatePaid).not_null())
                    .col(string_len(Payment::Reference, 100).not_null())
                    .col(timestamp_with_time_zone(Payment::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_student")
                            .from(Payment::Table, Payment::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Payment {
    Table,
    Id,
    StudentId,
    Amount,
    DatePaid,
    Reference,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Student {
    Table,
    Id,
}
