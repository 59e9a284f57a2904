//! Create `app_user` table (API accounts with roles).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppUser::Table)
                    .if_not_exists()
                    .col(uuid(AppUser::Id).primary_key())
                    .col(string_len(AppUser::Email, 255).unique_key().not_null())
                    .col(string_len(AppUser::Name, 128).not_null())
                    .col(string_len(AppUser::Role, 50).not_null())
                    .col(ColumnDef::new(AppUser::InstitutionId).uuid().null())
                    .col(timestamp_with_time_zone(AppUser::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(AppUser::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_app_user_institution")
                            .from(AppUser::Table, AppUser::InstitutionId)
                            .to(Institution::Table, Institution::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AppUser::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AppUser {
    Table,
    Id,
    Email,
    Name,
    Role,
    InstitutionId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Institution {
    Table,
    Id,
}
