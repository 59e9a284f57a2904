use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{institution, program, validate_choice, validate_required, validate_year};

pub const GENDERS: &[&str] = &["Male", "Female", "Other"];
pub const STATUSES: &[&str] = &["Active", "Attachment", "Graduated", "Suspended", "Deferred"];
pub const DROPOUT_REASONS: &[&str] =
    &["Financial", "Academic", "Medical", "Personal", "Transfer", "Other"];
pub const FINAL_GRADES: &[&str] = &["Distinction", "Credit", "Pass", "Fail"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: String,
    /// Fernet ciphertext at rest; the service layer decrypts on read.
    pub national_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub date_of_birth: Option<Date>,
    pub enrollment_year: i32,
    pub status: String,
    pub dropout_reason: Option<String>,
    pub institution_id: Uuid,
    pub program_id: Uuid,
    pub graduation_year: Option<i32>,
    pub final_grade: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Institution,
    Program,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Institution => Entity::belongs_to(institution::Entity)
                .from(Column::InstitutionId)
                .to(institution::Column::Id)
                .into(),
            Relation::Program => Entity::belongs_to(program::Entity)
                .from(Column::ProgramId)
                .to(program::Column::Id)
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

pub struct NewStudent {
    pub student_id: String,
    /// Already encrypted by the caller when encryption is configured.
    pub national_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub date_of_birth: Option<Date>,
    pub enrollment_year: i32,
    pub status: String,
    pub dropout_reason: Option<String>,
    pub institution_id: Uuid,
    pub program_id: Uuid,
    pub graduation_year: Option<i32>,
    pub final_grade: Option<String>,
}

pub fn validate(input: &NewStudent) -> Result<(), ModelError> {
    validate_required("student_id", &input.student_id)?;
    validate_required("first_name", &input.first_name)?;
    validate_required("last_name", &input.last_name)?;
    validate_choice("gender", &input.gender, GENDERS)?;
    validate_choice("status", &input.status, STATUSES)?;
    validate_year("enrollment_year", input.enrollment_year)?;
    if let Some(reason) = &input.dropout_reason {
        validate_choice("dropout_reason", reason, DROPOUT_REASONS)?;
    }
    if let Some(grade) = &input.final_grade {
        validate_choice("final_grade", grade, FINAL_GRADES)?;
    }
    if let Some(year) = input.graduation_year {
        validate_year("graduation_year", year)?;
    }
    Ok(())
}

pub async fn find_by_student_id(
    db: &DatabaseConnection,
    student_id: &str,
) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::StudentId.eq(student_id))
        .one(db)
        .await?)
}

pub async fn create(db: &DatabaseConnection, input: NewStudent) -> Result<Model, ModelError> {
    validate(&input)?;
    if find_by_student_id(db, &input.student_id).await?.is_some() {
        return Err(ModelError::Duplicate(format!(
            "student_id '{}' already exists",
            input.student_id
        )));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        student_id: Set(input.student_id),
        national_id: Set(input.national_id),
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        gender: Set(input.gender),
        date_of_birth: Set(input.date_of_birth),
        enrollment_year: Set(input.enrollment_year),
        status: Set(input.status),
        dropout_reason: Set(input.dropout_reason),
        institution_id: Set(input.institution_id),
        program_id: Set(input.program_id),
        graduation_year: Set(input.graduation_year),
        final_grade: Set(input.final_grade),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
