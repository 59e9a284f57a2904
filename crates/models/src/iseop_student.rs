use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{institution, iseop_program, validate_choice, validate_required};

pub const STATUSES: &[&str] = &["Active/Enrolled", "Deferred", "Completed"];

pub const DISABILITY_TYPES: &[&str] = &[
    "None",
    "Physical",
    "Amputation",
    "Paralysis",
    "CerebralPalsy",
    "SpinalCord",
    "Visual",
    "Hearing",
    "Speech",
    "DeafBlind",
    "Intellectual",
    "Learning",
    "Autism",
    "ADHD",
    "Epilepsy",
    "MentalHealth",
    "Albino",
    "DownSyndrome",
    "SickleCell",
    "ChronicIllness",
    "Multiple",
    "Other",
];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "iseop_student")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub institution_id: Uuid,
    pub program_id: Option<Uuid>,
    pub student_id: String,
    /// Fernet ciphertext at rest; the service layer decrypts on read.
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub enrollment_year: Option<i32>,
    pub status: String,
    pub disability_type: String,
    pub disability_other: Option<String>,
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
            Relation::Program => Entity::belongs_to(iseop_program::Entity)
                .from(Column::ProgramId)
                .to(iseop_program::Column::Id)
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

pub struct NewIseopStudent {
    pub institution_id: Uuid,
    pub program_id: Option<Uuid>,
    pub student_id: String,
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub enrollment_year: Option<i32>,
    pub status: String,
    pub disability_type: String,
    pub disability_other: Option<String>,
}

pub fn validate(input: &NewIseopStudent) -> Result<(), ModelError> {
    validate_required("student_id", &input.student_id)?;
    validate_required("national_id", &input.national_id)?;
    validate_required("first_name", &input.first_name)?;
    validate_required("last_name", &input.last_name)?;
    validate_choice("status", &input.status, STATUSES)?;
    validate_choice("disability_type", &input.disability_type, DISABILITY_TYPES)?;
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

pub async fn create(db: &DatabaseConnection, input: NewIseopStudent) -> Result<Model, ModelError> {
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
        institution_id: Set(input.institution_id),
        program_id: Set(input.program_id),
        student_id: Set(input.student_id),
        national_id: Set(input.national_id),
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        email: Set(input.email),
        gender: Set(input.gender),
        enrollment_year: Set(input.enrollment_year),
        status: Set(input.status),
        disability_type: Set(input.disability_type),
        disability_other: Set(input.disability_other),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
