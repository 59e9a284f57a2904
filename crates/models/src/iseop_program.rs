use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::institution;

pub const STATUSES: &[&str] = &["Active", "Full", "Closed"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "iseop_program")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub institution_id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub occupied: i32,
    pub status: String,
    pub activity_level: Option<String>,
    pub description: Option<String>,
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
