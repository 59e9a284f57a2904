//! Create `partnership` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Partnership::Table)
                    .if_not_exists()
                    .col(uuid(Partnership::Id).primary_key())
                    .col(uuid(Partnership::InstitutionId).not_null())
                    .col(string_len(Partnership::PartnerName, 255).not_null())
                    .col(string_len(Partnership::FocusArea, 255).not_null())
                    .col(ColumnDef::new(Partnership::AgreementDate).date().null())
                    .col(string_len(Partnership::Status, 50).not_null())
                    .col(timestamp_with_time_zone(Partnership::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Partnership::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_partnership_institution")
                            .from(Partnership::Table, Partnership::InstitutionId)
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
            .drop_table(Table::drop().table(Partnership::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Partnership {
    Table,
    Id,
    InstitutionId,
    PartnerName,
    FocusArea,
    AgreementDate,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Institution {
    Table,
    Id,
}
