//! Create `fee_structure` table, one row per program.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeeStructure::Table)
                    .if_not_exists()
                    .col(uuid(FeeStructure::Id).primary_key())
                    .col(uuid(FeeStructure::ProgramId).unique_key().not_null())
                    .col(decimal_len(FeeStructure::SemesterFee, 10, 2).not_null())
                    .col(timestamp_with_time_zone(FeeStructure::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(FeeStructure::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fee_structure_program")
                            .from(FeeStructure::Table, FeeStructure::ProgramId)
                            .to(Program::Table, Program::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeeStructure::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FeeStructure {
    Table,
    Id,
    ProgramId,
    SemesterFee,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Program {
    Table,
    Id,
}
