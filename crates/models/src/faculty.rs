use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{institution, validate_choice, validate_required};

pub const STATUSES: &[&str] = &["Active", "Setup", "Review", "Archived"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "faculty")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub institution_id: Uuid,
    pub name: String,
    pub dean: String,
    pub location: String,
    pub email: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Institution,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Institution => Entity::belongs_to(institution::Entity)
                .from(Column::InstitutionId)
                .to(institution::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    institution_id: Uuid,
    name: &str,
    dean: &str,
    description: &str,
    status: &str,
) -> Result<Model, ModelError> {
    validate_required("name", name)?;
    validate_choice("status", status, STATUSES)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        institution_id: Set(institution_id),
        name: Set(name.to_string()),
        dean: Set(dean.to_string()),
        location: Set(String::new()),
        email: Set(String::new()),
        description: Set(description.to_string()),
        status: Set(status.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
