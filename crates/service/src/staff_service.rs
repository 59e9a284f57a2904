use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{errors::ServiceError, pagination::Pagination};
use models::staff::{self, NewStaff};

#[derive(Debug, Clone, Deserialize)]
pub struct StaffInput {
    pub institution_id: Uuid,
    pub faculty_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub employee_id: String,
    pub position: String,
    #[serde(default)]
    pub department: String,
    pub qualification: String,
    #[serde(default)]
    pub specialization: String,
    pub date_joined: chrono::NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffFilter {
    pub institution_id: Option<Uuid>,
    pub faculty_id: Option<Uuid>,
    pub position: Option<String>,
    pub is_active: Option<bool>,
}

impl From<StaffInput> for NewStaff {
    fn from(input: StaffInput) -> Self {
        NewStaff {
            institution_id: input.institution_id,
            faculty_id: input.faculty_id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            employee_id: input.employee_id,
            position: input.position,
            department: input.department,
            qualification: input.qualification,
            specialization: input.specialization,
            date_joined: input.date_joined,
        }
    }
}

pub async fn create_staff(
    db: &DatabaseConnection,
    input: StaffInput,
) -> Result<staff::Model, ServiceError> {
    let institution = models::institution::Entity::find_by_id(input.institution_id)
        .one(db)
        .await?;
    if institution.is_none() {
        return Err(ServiceError::not_found("institution"));
    }
    Ok(staff::create(db, input.into()).await?)
}

pub async fn get_staff(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<staff::Model>, ServiceError> {
    Ok(staff::Entity::find_by_id(id).one(db).await?)
}

pub async fn list_staff(
    db: &DatabaseConnection,
    filter: StaffFilter,
    opts: Pagination,
) -> Result<Vec<staff::Model>, ServiceError> {
    let mut query = staff::Entity::find();
    if let Some(inst) = filter.institution_id {
        query = query.filter(staff::Column::InstitutionId.eq(inst));
    }
    if let Some(fac) = filter.faculty_id {
        query = query.filter(staff::Column::FacultyId.eq(fac));
    }
    if let Some(position) = filter.position {
        query = query.filter(staff::Column::Position.eq(position));
    }
    if let Some(active) = filter.is_active {
        query = query.filter(staff::Column::IsActive.eq(active));
    }
    let (page_idx, per_page) = opts.normalize();
    Ok(query.paginate(db, per_page).fetch_page(page_idx).await?)
}

pub async fn update_staff(
    db: &DatabaseConnection,
    id: Uuid,
    input: StaffInput,
) -> Result<staff::Model, ServiceError> {
    let found = staff::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("staff member"))?;
    if input.employee_id != found.employee_id {
        if staff::find_by_employee_id(db, &input.employee_id).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "employee_id '{}' already exists",
                input.employee_id
            )));
        }
    }
    let new: NewStaff = input.into();
    staff::validate(&new)?;
    let mut am: staff::ActiveModel = found.into();
    am.institution_id = Set(new.institution_id);
    am.faculty_id = Set(new.faculty_id);
    am.first_name = Set(new.first_name);
    am.last_name = Set(new.last_name);
    am.email = Set(new.email);
    am.phone = Set(new.phone);
    am.employee_id = Set(new.employee_id);
    am.position = Set(new.position);
    am.department = Set(new.department);
    am.qualification = Set(new.qualification);
    am.specialization = Set(new.specialization);
    am.date_joined = Set(new.date_joined);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Soft delete. Staff rows are retained for reporting; deactivation
/// removes them from active listings.
pub async fn deactivate_staff(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let found = staff::Entity::find_by_id(id).one(db).await?;
    match found {
        Some(m) => {
            let mut am: staff::ActiveModel = m.into();
            am.is_active = Set(false);
            am.updated_at = Set(Utc::now().into());
            am.update(db).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}

pub async fn delete_staff(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = staff::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
