use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{faculty, validate_choice, validate_required};

pub const LEVELS: &[&str] =
    &["Certificate", "Diploma", "Bachelors", "Masters", "PhD", "Other"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "program")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub faculty_id: Uuid,
    pub name: String,
    pub code: String,
    pub duration_years: i32,
    pub level: String,
    pub description: String,
    pub coordinator: String,
    pub student_capacity: i32,
    pub modules: String,
    pub entry_requirements: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Faculty,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Faculty => Entity::belongs_to(faculty::Entity)
                .from(Column::FacultyId)
                .to(faculty::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub struct NewProgram {
    pub faculty_id: Uuid,
    pub name: String,
    pub code: String,
    pub duration_years: i32,
    pub level: String,
    pub description: String,
    pub coordinator: String,
    pub student_capacity: i32,
    pub modules: String,
    pub entry_requirements: String,
}

pub async fn create(db: &DatabaseConnection, input: NewProgram) -> Result<Model, ModelError> {
    validate_required("name", &input.name)?;
    validate_required("code", &input.code)?;
    validate_choice("level", &input.level, LEVELS)?;
    if input.duration_years <= 0 {
        return Err(ModelError::Validation("duration must be positive".into()));
    }
    // code is unique within a faculty
    let clash = Entity::find()
        .filter(Column::FacultyId.eq(input.faculty_id))
        .filter(Column::Code.eq(input.code.clone()))
        .one(db)
        .await?;
    if clash.is_some() {
        return Err(ModelError::Duplicate(format!(
            "program code '{}' already exists in this faculty",
            input.code
        )));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        faculty_id: Set(input.faculty_id),
        name: Set(input.name),
        code: Set(input.code),
        duration_years: Set(input.duration_years),
        level: Set(input.level),
        description: Set(input.description),
        coordinator: Set(input.coordinator),
        student_capacity: Set(input.student_capacity),
        modules: Set(input.modules),
        entry_requirements: Set(input.entry_requirements),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
