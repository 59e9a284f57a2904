use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{innovation_hub, institution};

pub const SECTORS: &[&str] = &[
    "agritech",
    "edtech",
    "healthtech",
    "fintech",
    "mining",
    "energy",
    "manufacturing",
    "other",
];

/// Lifecycle runs ideation -> industrial; the first three are the
/// innovation phase, the rest commercialisation.
pub const STAGES: &[&str] = &[
    "ideation",
    "prototype",
    "incubation",
    "market_ready",
    "scaling",
    "industrial",
];

pub const LOCATION_CATEGORIES: &[&str] = &["Urban", "Rural"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub institution_id: Uuid,
    pub hub_id: Option<Uuid>,
    pub name: String,
    pub team_name: String,
    pub sector: String,
    pub location_category: String,
    pub stage: String,
    pub problem_statement: String,
    pub proposed_solution: String,
    pub revenue_generated: Decimal,
    pub funding_acquired: Decimal,
    pub jobs_created: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Institution,
    Hub,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Institution => Entity::belongs_to(institution::Entity)
                .from(Column::InstitutionId)
                .to(institution::Column::Id)
                .into(),
            Relation::Hub => Entity::belongs_to(innovation_hub::Entity)
                .from(Column::HubId)
                .to(innovation_hub::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
