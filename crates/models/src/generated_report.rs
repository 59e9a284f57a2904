use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{app_user, report_template};

pub const STATUSES: &[&str] = &["pending", "generating", "completed", "failed"];

/// Audit row for every report generation request; reports render
/// synchronously so rows move pending -> completed/failed within the
/// request.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "generated_report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub template_id: Option<Uuid>,
    pub title: String,
    pub format: String,
    pub status: String,
    pub requested_by: Option<Uuid>,
    pub requested_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Template,
    RequestedBy,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Template => Entity::belongs_to(report_template::Entity)
                .from(Column::TemplateId)
                .to(report_template::Column::Id)
                .into(),
            Relation::RequestedBy => Entity::belongs_to(app_user::Entity)
                .from(Column::RequestedBy)
                .to(app_user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
