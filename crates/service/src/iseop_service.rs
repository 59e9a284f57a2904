use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::ServiceError;
use common::crypto::KeyRing;
use models::{
    iseop_program, iseop_student::{self, NewIseopStudent}, validate_choice, validate_required,
};

#[derive(Debug, Clone, Deserialize)]
pub struct IseopProgramInput {
    pub institution_id: Uuid,
    pub name: String,
    pub capacity: i32,
    #[serde(default = "default_program_status")]
    pub status: String,
    pub activity_level: Option<String>,
    pub description: Option<String>,
}

fn default_program_status() -> String {
    "Active".to_string()
}

pub async fn create_iseop_program(
    db: &DatabaseConnection,
    input: IseopProgramInput,
) -> Result<iseop_program::Model, ServiceError> {
    validate_required("name", &input.name)?;
    validate_choice("status", &input.status, iseop_program::STATUSES)?;
    let institution = models::institution::Entity::find_by_id(input.institution_id)
        .one(db)
        .await?;
    if institution.is_none() {
        return Err(ServiceError::not_found("institution"));
    }
    let now = Utc::now().into();
    let am = iseop_program::ActiveModel {
        id: Set(Uuid::new_v4()),
        institution_id: Set(input.institution_id),
        name: Set(input.name),
        capacity: Set(input.capacity),
        occupied: Set(0),
        status: Set(input.status),
        activity_level: Set(input.activity_level),
        description: Set(input.description),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn list_iseop_programs(
    db: &DatabaseConnection,
    institution_id: Option<Uuid>,
) -> Result<Vec<iseop_program::Model>, ServiceError> {
    let mut query = iseop_program::Entity::find().order_by_asc(iseop_program::Column::Name);
    if let Some(inst) = institution_id {
        query = query.filter(iseop_program::Column::InstitutionId.eq(inst));
    }
    Ok(query.all(db).await?)
}

pub async fn update_iseop_program(
    db: &DatabaseConnection,
    id: Uuid,
    input: IseopProgramInput,
) -> Result<iseop_program::Model, ServiceError> {
    validate_required("name", &input.name)?;
    validate_choice("status", &input.status, iseop_program::STATUSES)?;
    let found = iseop_program::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("program"))?;
    let mut am: iseop_program::ActiveModel = found.into();
    am.name = Set(input.name);
    am.capacity = Set(input.capacity);
    am.status = Set(input.status);
    am.activity_level = Set(input.activity_level);
    am.description = Set(input.description);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete_iseop_program(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    use sea_orm::PaginatorTrait;
    let enrolled = iseop_student::Entity::find()
        .filter(iseop_student::Column::ProgramId.eq(id))
        .count(db)
        .await?;
    if enrolled > 0 {
        return Err(ServiceError::Conflict(format!("program has {} enrolled students", enrolled)));
    }
    let res = iseop_program::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

/// Recount program occupancy after a membership change.
async fn refresh_occupancy(db: &DatabaseConnection, program_id: Uuid) -> Result<(), ServiceError> {
    use sea_orm::PaginatorTrait;
    let found = iseop_program::Entity::find_by_id(program_id).one(db).await?;
    if let Some(program) = found {
        let occupied = iseop_student::Entity::find()
            .filter(iseop_student::Column::ProgramId.eq(program_id))
            .count(db)
            .await?;
        let capacity = program.capacity;
        let was_full = program.status == "Full";
        let mut am: iseop_program::ActiveModel = program.into();
        am.occupied = Set(occupied as i32);
        if occupied as i32 >= capacity {
            am.status = Set("Full".to_string());
        } else if was_full {
            am.status = Set("Active".to_string());
        }
        am.updated_at = Set(Utc::now().into());
        am.update(db).await?;
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct IseopStudentInput {
    pub institution_id: Uuid,
    pub program_id: Option<Uuid>,
    pub student_id: String,
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub enrollment_year: Option<i32>,
    #[serde(default = "default_student_status")]
    pub status: String,
    #[serde(default = "default_disability")]
    pub disability_type: String,
    pub disability_other: Option<String>,
}

fn default_student_status() -> String {
    "Active/Enrolled".to_string()
}

fn default_disability() -> String {
    "None".to_string()
}

fn reveal(
    keys: &KeyRing,
    mut m: iseop_student::Model,
) -> Result<iseop_student::Model, ServiceError> {
    m.national_id = keys.decrypt(&m.national_id)?;
    Ok(m)
}

async fn national_id_in_use(
    db: &DatabaseConnection,
    keys: &KeyRing,
    plain: &str,
    exclude: Option<Uuid>,
) -> Result<bool, ServiceError> {
    let rows = iseop_student::Entity::find().all(db).await?;
    for row in rows {
        if Some(row.id) == exclude {
            continue;
        }
        if keys.decrypt(&row.national_id).map(|p| p == plain).unwrap_or(false) {
            return Ok(true);
        }
    }
    Ok(false)
}

pub async fn create_iseop_student(
    db: &DatabaseConnection,
    keys: &KeyRing,
    input: IseopStudentInput,
) -> Result<iseop_student::Model, ServiceError> {
    if national_id_in_use(db, keys, &input.national_id, None).await? {
        return Err(ServiceError::Conflict(format!(
            "national_id '{}' already exists",
            input.national_id
        )));
    }
    if let Some(program_id) = input.program_id {
        let program = iseop_program::Entity::find_by_id(program_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("program"))?;
        if program.occupied >= program.capacity {
            return Err(ServiceError::Conflict(format!("program '{}' is full", program.name)));
        }
    }
    let new = NewIseopStudent {
        institution_id: input.institution_id,
        program_id: input.program_id,
        student_id: input.student_id,
        national_id: keys.encrypt(&input.national_id),
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        gender: input.gender,
        enrollment_year: input.enrollment_year,
        status: input.status,
        disability_type: input.disability_type,
        disability_other: input.disability_other,
    };
    let created = iseop_student::create(db, new).await?;
    if let Some(program_id) = created.program_id {
        refresh_occupancy(db, program_id).await?;
    }
    reveal(keys, created)
}

pub async fn get_iseop_student(
    db: &DatabaseConnection,
    keys: &KeyRing,
    id: Uuid,
) -> Result<Option<iseop_student::Model>, ServiceError> {
    match iseop_student::Entity::find_by_id(id).one(db).await? {
        Some(m) => Ok(Some(reveal(keys, m)?)),
        None => Ok(None),
    }
}

pub async fn list_iseop_students(
    db: &DatabaseConnection,
    keys: &KeyRing,
    institution_id: Option<Uuid>,
) -> Result<Vec<iseop_student::Model>, ServiceError> {
    let mut query = iseop_student::Entity::find().order_by_asc(iseop_student::Column::LastName);
    if let Some(inst) = institution_id {
        query = query.filter(iseop_student::Column::InstitutionId.eq(inst));
    }
    let rows = query.all(db).await?;
    rows.into_iter().map(|m| reveal(keys, m)).collect()
}

pub async fn update_iseop_student(
    db: &DatabaseConnection,
    keys: &KeyRing,
    id: Uuid,
    input: IseopStudentInput,
) -> Result<iseop_student::Model, ServiceError> {
    let found = iseop_student::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("student"))?;
    if input.student_id != found.student_id {
        if iseop_student::find_by_student_id(db, &input.student_id).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "student_id '{}' already exists",
                input.student_id
            )));
        }
    }
    if national_id_in_use(db, keys, &input.national_id, Some(id)).await? {
        return Err(ServiceError::Conflict(format!(
            "national_id '{}' already exists",
            input.national_id
        )));
    }
    let old_program = found.program_id;
    let new = NewIseopStudent {
        institution_id: input.institution_id,
        program_id: input.program_id,
        student_id: input.student_id,
        national_id: keys.encrypt(&input.national_id),
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        gender: input.gender,
        enrollment_year: input.enrollment_year,
        status: input.status,
        disability_type: input.disability_type,
        disability_other: input.disability_other,
    };
    iseop_student::validate(&new)?;
    let mut am: iseop_student::ActiveModel = found.into();
    am.institution_id = Set(new.institution_id);
    am.program_id = Set(new.program_id);
    am.student_id = Set(new.student_id);
    am.national_id = Set(new.national_id);
    am.first_name = Set(new.first_name);
    am.last_name = Set(new.last_name);
    am.email = Set(new.email);
    am.gender = Set(new.gender);
    am.enrollment_year = Set(new.enrollment_year);
    am.status = Set(new.status);
    am.disability_type = Set(new.disability_type);
    am.disability_other = Set(new.disability_other);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    // keep occupancy counters in step when membership moves
    if old_program != updated.program_id {
        if let Some(prev) = old_program {
            refresh_occupancy(db, prev).await?;
        }
        if let Some(next) = updated.program_id {
            refresh_occupancy(db, next).await?;
        }
    }
    reveal(keys, updated)
}

pub async fn delete_iseop_student(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let found = iseop_student::Entity::find_by_id(id).one(db).await?;
    match found {
        Some(m) => {
            let program_id = m.program_id;
            iseop_student::Entity::delete_by_id(id).exec(db).await?;
            if let Some(program_id) = program_id {
                refresh_occupancy(db, program_id).await?;
            }
            Ok(true)
        }
        None => Ok(false),
    }
}
