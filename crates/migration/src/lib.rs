//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_institution;
mod m20240101_000002_create_faculty;
mod m20240101_000003_create_program;
mod m20240101_000004_create_fee_structure;
mod m20240101_000005_create_student;
mod m20240101_000006_create_payment;
mod m20240101_000007_create_staff;
mod m20240101_000008_create_innovation_hub;
mod m20240101_000009_create_project;
mod m20240101_000010_create_research_grant;
mod m20240101_000011_create_partnership;
mod m20240101_000012_create_iseop_program;
mod m20240101_000013_create_iseop_student;
mod m20240101_000014_create_app_user;
mod m20240101_000015_create_user_credentials;
mod m20240101_000016_create_report_tables;
mod m20240101_000017_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_institution::Migration),
            Box::new(m20240101_000002_create_faculty::Migration),
            Box::new(m20240101_000003_create_program::Migration),
            Box::new(m20240101_000004_create_fee_structure::Migration),
            Box::new(m20240101_000005_create_student::Migration),
            Box::new(m20240101_000006_create_payment::Migration),
            Box::new(m20240101_000007_create_staff::Migration),
            Box::new(m20240101_000008_create_innovation_hub::Migration),
            Box::new(m20240101_000009_create_project::Migration),
            Box::new(m20240101_000010_create_research_grant::Migration),
            Box::new(m20240101_000011_create_partnership::Migration),
            Box::new(m20240101_000012_create_iseop_program::Migration),
            Box::new(m20240101_000013_create_iseop_student::Migration),
            Box::new(m20240101_000014_create_app_user::Migration),
            Box::new(m20240101_000015_create_user_credentials::Migration),
            Box::new(m20240101_000016_create_report_tables::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000017_add_indexes::Migration),
        ]
    }
}
