use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use models::{fee_structure, program};

pub use models::program::NewProgram;

pub async fn create_program(
    db: &DatabaseConnection,
    input: NewProgram,
) -> Result<program::Model, ServiceError> {
    let faculty = models::faculty::Entity::find_by_id(input.faculty_id).one(db).await?;
    if faculty.is_none() {
        return Err(ServiceError::not_found("faculty"));
    }
    Ok(program::create(db, input).await?)
}

pub async fn get_program(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<program::Model>, ServiceError> {
    Ok(program::Entity::find_by_id(id).one(db).await?)
}

pub async fn list_programs(
    db: &DatabaseConnection,
    faculty_id: Option<Uuid>,
) -> Result<Vec<program::Model>, ServiceError> {
    let mut query = program::Entity::find().order_by_asc(program::Column::Name);
    if let Some(faculty) = faculty_id {
        query = query.filter(program::Column::FacultyId.eq(faculty));
    }
    Ok(query.all(db).await?)
}

pub async fn update_program(
    db: &DatabaseConnection,
    id: Uuid,
    input: NewProgram,
) -> Result<program::Model, ServiceError> {
    let found = program::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("program"))?;
    models::validate_choice("level", &input.level, program::LEVELS)?;
    if input.code != found.code {
        let clash = program::Entity::find()
            .filter(program::Column::FacultyId.eq(found.faculty_id))
            .filter(program::Column::Code.eq(input.code.clone()))
            .one(db)
            .await?;
        if clash.is_some() {
            return Err(ServiceError::Conflict(format!(
                "program code '{}' already exists in this faculty",
                input.code
            )));
        }
    }
    let mut am: program::ActiveModel = found.into();
    am.name = Set(input.name);
    am.code = Set(input.code);
    am.duration_years = Set(input.duration_years);
    am.level = Set(input.level);
    am.description = Set(input.description);
    am.coordinator = Set(input.coordinator);
    am.student_capacity = Set(input.student_capacity);
    am.modules = Set(input.modules);
    am.entry_requirements = Set(input.entry_requirements);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete_program(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    use sea_orm::PaginatorTrait;
    let enrolled = models::student::Entity::find()
        .filter(models::student::Column::ProgramId.eq(id))
        .count(db)
        .await?;
    if enrolled > 0 {
        return Err(ServiceError::Conflict(format!("program has {} enrolled students", enrolled)));
    }
    let res = program::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

/// Upsert the semester fee for a program.
pub async fn set_program_fee(
    db: &DatabaseConnection,
    program_id: Uuid,
    semester_fee: Decimal,
) -> Result<fee_structure::Model, ServiceError> {
    if semester_fee < Decimal::ZERO {
        return Err(ServiceError::Validation("semester_fee must be >= 0".into()));
    }
    let program = program::Entity::find_by_id(program_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("program"))?;
    let now = Utc::now().into();
    if let Some(existing) = fee_structure::Entity::find()
        .filter(fee_structure::Column::ProgramId.eq(program.id))
        .one(db)
        .await?
    {
        let mut am: fee_structure::ActiveModel = existing.into();
        am.semester_fee = Set(semester_fee);
        am.updated_at = Set(now);
        Ok(am.update(db).await?)
    } else {
        let am = fee_structure::ActiveModel {
            id: Set(Uuid::new_v4()),
            program_id: Set(program.id),
            semester_fee: Set(semester_fee),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(am.insert(db).await?)
    }
}
