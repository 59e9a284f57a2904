use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::ServiceError;
use models::{faculty, validate_choice, validate_required};

#[derive(Debug, Clone, Deserialize)]
pub struct FacultyInput {
    pub institution_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub dean: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "Active".to_string()
}

pub async fn create_faculty(
    db: &DatabaseConnection,
    input: FacultyInput,
) -> Result<faculty::Model, ServiceError> {
    validate_required("name", &input.name)?;
    validate_choice("status", &input.status, faculty::STATUSES)?;
    let institution = models::institution::Entity::find_by_id(input.institution_id)
        .one(db)
        .await?;
    if institution.is_none() {
        return Err(ServiceError::not_found("institution"));
    }
    let now = Utc::now().into();
    let am = faculty::ActiveModel {
        id: Set(Uuid::new_v4()),
        institution_id: Set(input.institution_id),
        name: Set(input.name),
        dean: Set(input.dean),
        location: Set(input.location),
        email: Set(input.email),
        description: Set(input.description),
        status: Set(input.status),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn get_faculty(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<faculty::Model>, ServiceError> {
    Ok(faculty::Entity::find_by_id(id).one(db).await?)
}

pub async fn list_faculties(
    db: &DatabaseConnection,
    institution_id: Option<Uuid>,
) -> Result<Vec<faculty::Model>, ServiceError> {
    let mut query = faculty::Entity::find().order_by_asc(faculty::Column::Name);
    if let Some(inst) = institution_id {
        query = query.filter(faculty::Column::InstitutionId.eq(inst));
    }
    Ok(query.all(db).await?)
}

pub async fn update_faculty(
    db: &DatabaseConnection,
    id: Uuid,
    input: FacultyInput,
) -> Result<faculty::Model, ServiceError> {
    validate_required("name", &input.name)?;
    validate_choice("status", &input.status, faculty::STATUSES)?;
    let found = faculty::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("faculty"))?;
    let mut am: faculty::ActiveModel = found.into();
    am.name = Set(input.name);
    am.dean = Set(input.dean);
    am.location = Set(input.location);
    am.email = Set(input.email);
    am.description = Set(input.description);
    am.status = Set(input.status);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete_faculty(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = faculty::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
