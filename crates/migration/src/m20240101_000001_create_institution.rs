//! Create `institution` table, the root of the hierarchy.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Institution::Table)
                    .if_not_exists()
                    .col(uuid(Institution::Id).primary_key())
                    .col(string_len(Institution::Name, 255).unique_key().not_null())
                    .col(string_len(Institution::Kind, 50).not_null())
                    .col(string_len(Institution::Province, 50).not_null())
                    .col(string_len(Institution::Location, 100).not_null())
                    .col(text(Institution::Address).not_null())
                    .col(integer(Institution::Capacity).not_null())
                    .col(integer(Institution::StaffCount).not_null())
                    .col(string_len(Institution::Status, 50).not_null())
                    .col(integer(Institution::Established).not_null())
                    .col(boolean(Institution::HasInnovationHub).not_null())
                    .col(timestamp_with_time_zone(Institution::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Institution::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Institution::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Institution {
    Table,
    Id,
    Name,
    Kind,
    Province,
    Location,
    Address,
    Capacity,
    StaffCount,
    Status,
    Established,
    HasInnovationHub,
    CreatedAt,
    UpdatedAt,
}
