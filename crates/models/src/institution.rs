use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{validate_choice, validate_required, validate_year};

pub const KINDS: &[&str] = &["Polytechnic", "Teachers College", "Industrial Training", "Other"];
pub const STATUSES: &[&str] = &["Active", "Renovation", "Closed"];
pub const PROVINCES: &[&str] = &[
    "Harare",
    "Bulawayo",
    "Midlands",
    "Manicaland",
    "Masvingo",
    "Mashonaland East",
    "Mashonaland West",
    "Mashonaland Central",
    "Matabeleland North",
    "Matabeleland South",
];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "institution")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub province: String,
    pub location: String,
    pub address: String,
    pub capacity: i32,
    pub staff_count: i32,
    pub status: String,
    pub established: i32,
    pub has_innovation_hub: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("no relations defined here")
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub struct NewInstitution {
    pub name: String,
    pub kind: String,
    pub province: String,
    pub location: String,
    pub address: String,
    pub capacity: i32,
    pub staff_count: i32,
    pub status: String,
    pub established: i32,
    pub has_innovation_hub: bool,
}

pub fn validate(input: &NewInstitution) -> Result<(), ModelError> {
    validate_required("name", &input.name)?;
    validate_choice("type", &input.kind, KINDS)?;
    validate_choice("province", &input.province, PROVINCES)?;
    validate_choice("status", &input.status, STATUSES)?;
    validate_year("established", input.established)?;
    if input.capacity < 0 || input.staff_count < 0 {
        return Err(ModelError::Validation("capacity and staff_count must be >= 0".into()));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, input: NewInstitution) -> Result<Model, ModelError> {
    validate(&input)?;
    let existing = Entity::find()
        .filter(Column::Name.eq(input.name.clone()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(ModelError::Duplicate(format!("institution '{}' already exists", input.name)));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        kind: Set(input.kind),
        province: Set(input.province),
        location: Set(input.location),
        address: Set(input.address),
        capacity: Set(input.capacity),
        staff_count: Set(input.staff_count),
        status: Set(input.status),
        established: Set(input.established),
        has_innovation_hub: Set(input.has_innovation_hub),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(kind: &str, province: &str) -> NewInstitution {
        NewInstitution {
            name: "Test Institute".into(),
            kind: kind.into(),
            province: province.into(),
            location: String::new(),
            address: String::new(),
            capacity: 0,
            staff_count: 0,
            status: "Active".into(),
            established: 1998,
            has_innovation_hub: false,
        }
    }

    #[test]
    fn known_kind_and_province_pass() {
        assert!(validate(&input("Polytechnic", "Harare")).is_ok());
        assert!(validate(&input("Teachers College", "Midlands")).is_ok());
    }

    #[test]
    fn unknown_kind_or_province_is_rejected() {
        assert!(validate(&input("Technical College", "Harare")).is_err());
        assert!(validate(&input("Polytechnic", "Central")).is_err());
    }
}
