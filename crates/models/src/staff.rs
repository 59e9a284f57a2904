use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{faculty, institution, validate_choice, validate_email, validate_required};

pub const POSITIONS: &[&str] = &["Professor", "Lecturer", "Assistant", "Admin", "Other"];
pub const QUALIFICATIONS: &[&str] =
    &["PhD", "Masters", "Bachelors", "Diploma", "Certificate", "Other"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub institution_id: Uuid,
    pub faculty_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub employee_id: String,
    pub position: String,
    pub department: String,
    pub qualification: String,
    pub specialization: String,
    pub date_joined: Date,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Institution,
    Faculty,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Institution => Entity::belongs_to(institution::Entity)
                .from(Column::InstitutionId)
                .to(institution::Column::Id)
                .into(),
            Relation::Faculty => Entity::belongs_to(faculty::Entity)
                .from(Column::FacultyId)
                .to(faculty::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

pub struct NewStaff {
    pub institution_id: Uuid,
    pub faculty_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub employee_id: String,
    pub position: String,
    pub department: String,
    pub qualification: String,
    pub specialization: String,
    pub date_joined: Date,
}

pub fn validate(input: &NewStaff) -> Result<(), ModelError> {
    validate_required("employee_id", &input.employee_id)?;
    validate_required("first_name", &input.first_name)?;
    validate_required("last_name", &input.last_name)?;
    validate_email(&input.email)?;
    validate_choice("position", &input.position, POSITIONS)?;
    validate_choice("qualification", &input.qualification, QUALIFICATIONS)?;
    Ok(())
}

pub async fn find_by_employee_id(
    db: &DatabaseConnection,
    employee_id: &str,
) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::EmployeeId.eq(employee_id))
        .one(db)
        .await?)
}

pub async fn create(db: &DatabaseConnection, input: NewStaff) -> Result<Model, ModelError> {
    validate(&input)?;
    if find_by_employee_id(db, &input.employee_id).await?.is_some() {
        return Err(ModelError::Duplicate(format!(
            "employee_id '{}' already exists",
            input.employee_id
        )));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        institution_id: Set(input.institution_id),
        faculty_id: Set(input.faculty_id),
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        email: Set(input.email),
        phone: Set(input.phone),
        employee_id: Set(input.employee_id),
        position: Set(input.position),
        department: Set(input.department),
        qualification: Set(input.qualification),
        specialization: Set(input.specialization),
        date_joined: Set(input.date_joined),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
