//! Report templates and the audit trail of generation requests.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::Deserialize;
use uuid::Uuid;

use models::{generated_report, report_template};

use super::engine::ReportRequest;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default = "default_format")]
    pub default_format: String,
}

fn default_format() -> String {
    "pdf".to_string()
}

pub async fn create_template(
    db: &DatabaseConnection,
    input: TemplateInput,
) -> Result<report_template::Model, ServiceError> {
    if input.name.trim().is_empty() {
        return Err(ServiceError::Validation("template name is required".into()));
    }
    if !report_template::CATEGORIES.contains(&input.category.as_str()) {
        return Err(ServiceError::Validation(format!(
            "invalid category '{}'",
            input.category
        )));
    }
    if !report_template::FORMATS.contains(&input.default_format.as_str()) {
        return Err(ServiceError::Validation(format!(
            "invalid format '{}'",
            input.default_format
        )));
    }
    let row = report_template::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        description: Set(input.description),
        category: Set(input.category),
        default_format: Set(input.default_format),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    };
    Ok(row.insert(db).await?)
}

pub async fn list_templates(
    db: &DatabaseConnection,
) -> Result<Vec<report_template::Model>, ServiceError> {
    Ok(report_template::Entity::find()
        .filter(report_template::Column::IsActive.eq(true))
        .order_by_asc(report_template::Column::Name)
        .all(db)
        .await?)
}

pub async fn deactivate_template(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<bool, ServiceError> {
    let Some(found) = report_template::Entity::find_by_id(id).one(db).await? else {
        return Ok(false);
    };
    let mut am: report_template::ActiveModel = found.into();
    am.is_active = Set(false);
    am.update(db).await?;
    Ok(true)
}

/// Append an audit row for a generation request. Reports render inline,
/// so the row lands already in its terminal status.
pub async fn record_generation(
    db: &DatabaseConnection,
    request: &ReportRequest,
    title: &str,
    status: &str,
    requested_by: Option<Uuid>,
) -> Result<generated_report::Model, ServiceError> {
    let row = generated_report::ActiveModel {
        id: Set(Uuid::new_v4()),
        template_id: Set(None),
        title: Set(title.to_string()),
        format: Set(request.format.clone()),
        status: Set(status.to_string()),
        requested_by: Set(requested_by),
        requested_at: Set(Utc::now().into()),
    };
    Ok(row.insert(db).await?)
}

pub async fn recent_generations(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<generated_report::Model>, ServiceError> {
    Ok(generated_report::Entity::find()
        .order_by_desc(generated_report::Column::RequestedAt)
        .limit(limit)
        .all(db)
        .await?)
}
