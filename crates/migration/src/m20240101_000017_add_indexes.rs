use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Students: hot filters are institution, program and status
        manager
            .create_index(
                Index::create()
                    .name("idx_student_institution")
                    .table(Student::Table)
                    .col(Student::InstitutionId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_student_program")
                    .table(Student::Table)
                    .col(Student::ProgramId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_student_status")
                    .table(Student::Table)
                    .col(Student::Status)
                    .to_owned(),
            )
            .await?;

        // Payments: recent-activity scans by student and created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_payment_student")
                    .table(Payment::Table)
                    .col(Payment::StudentId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_payment_created")
                    .table(Payment::Table)
                    .col(Payment::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Staff: institution lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_staff_institution")
                    .table(Staff::Table)
                    .col(Staff::InstitutionId)
                    .to_owned(),
            )
            .await?;

        // Faculty names are looked up per institution during bulk upload
        manager
            .create_index(
                Index::create()
                    .name("idx_faculty_institution")
                    .table(Faculty::Table)
                    .col(Faculty::InstitutionId)
                    .to_owned(),
            )
            .await?;

        // Projects: pipeline stats group by stage within an institution
        manager
            .create_index(
                Index::create()
                    .name("idx_project_institution")
                    .table(Project::Table)
                    .col(Project::InstitutionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_iseop_student_institution")
                    .table(IseopStudent::Table)
                    .col(IseopStudent::InstitutionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_student_institution").table(Student::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_student_program").table(Student::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_student_status").table(Student::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_payment_student").table(Payment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_payment_created").table(Payment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_staff_institution").table(Staff::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_faculty_institution").table(Faculty::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_project_institution").table(Project::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_iseop_student_institution")
                    .table(IseopStudent::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Student {
    Table,
    InstitutionId,
    ProgramId,
    Status,
}

#[derive(DeriveIden)]
enum Payment {
    Table,
    StudentId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Staff {
    Table,
    InstitutionId,
}

#[derive(DeriveIden)]
enum Faculty {
    Table,
    InstitutionId,
}

#[derive(DeriveIden)]
enum Project {
    Table,
    InstitutionId,
}

#[derive(DeriveIden)]
enum IseopStudent {
    Table,
    InstitutionId,
}
