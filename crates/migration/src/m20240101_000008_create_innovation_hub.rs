//! Create `innovation_hub` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InnovationHub::Table)
                    .if_not_exists()
                    .col(uuid(InnovationHub::Id).primary_key())
                    .col(uuid(InnovationHub::InstitutionId).not_null())
                    .col(string_len(InnovationHub::Name, 255).not_null())
                    .col(integer(InnovationHub::Capacity).not_null())
                    .col(integer(InnovationHub::Occupied).not_null())
                    .col(string_len(InnovationHub::Activity, 50).not_null())
                    .col(timestamp_with_time_zone(InnovationHub::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(InnovationHub::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_innovation_hub_institution")
                            .from(InnovationHub::Table, InnovationHub::InstitutionId)
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
            .drop_table(Table::drop().table(InnovationHub::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum InnovationHub {
    Table,
    Id,
    InstitutionId,
    Name,
    Capacity,
    Occupied,
    Activity,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Institution {
    Table,
    Id,
}
