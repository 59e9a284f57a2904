//! Create `report_template` and `generated_report` tables.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReportTemplate::Table)
                    .if_not_exists()
                    .col(uuid(ReportTemplate::Id).primary_key())
                    .col(string_len(ReportTemplate::Name, 200).not_null())
                    .col(text(ReportTemplate::Description).not_null())
                    .col(string_len(ReportTemplate::Category, 50).not_null())
                    .col(string_len(ReportTemplate::DefaultFormat, 10).not_null())
                    .col(boolean(ReportTemplate::IsActive).not_null())
                    .col(timestamp_with_time_zone(ReportTemplate::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(GeneratedReport::Table)
                    .if_not_exists()
                    .col(uuid(GeneratedReport::Id).primary_key())
                    .col(ColumnDef::new(GeneratedReport::TemplateId).uuid().null())
                    .col(string_len(GeneratedReport::Title, 255).not_null())
                    .col(string_len(GeneratedReport::Format, 10).not_null())
                    .col(string_len(GeneratedReport::Status, 20).not_null())
                    .col(ColumnDef::new(GeneratedReport::RequestedBy).uuid().null())
                    .col(timestamp_with_time_zone(GeneratedReport::RequestedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_generated_report_template")
                            .from(GeneratedReport::Table, GeneratedReport::TemplateId)
                            .to(ReportTemplate::Table, ReportTemplate::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_generated_report_user")
                            .from(GeneratedReport::Table, GeneratedReport::RequestedBy)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GeneratedReport::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ReportTemplate::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ReportTemplate {
    Table,
    Id,
    Name,
    Description,
    Category,
    DefaultFormat,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GeneratedReport {
    Table,
    Id,
    TemplateId,
    Title,
    Format,
    Status,
    RequestedBy,
    RequestedAt,
}

#[derive(DeriveIden)]
enum AppUser {
    Table,
    Id,
}
