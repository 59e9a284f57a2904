use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::errors::ServiceError;
use models::{innovation_hub, partnership, project, research_grant, validate_choice, validate_required};

#[derive(Debug, Clone, Deserialize)]
pub struct HubInput {
    pub institution_id: Uuid,
    pub name: String,
    pub capacity: i32,
    #[serde(default)]
    pub occupied: i32,
    pub activity: String,
}

pub async fn create_hub(
    db: &DatabaseConnection,
    input: HubInput,
) -> Result<innovation_hub::Model, ServiceError> {
    validate_required("name", &input.name)?;
    validate_choice("activity", &input.activity, innovation_hub::ACTIVITY_LEVELS)?;
    if input.occupied > input.capacity {
        return Err(ServiceError::Validation("occupied cannot exceed capacity".into()));
    }
    let institution = models::institution::Entity::find_by_id(input.institution_id)
        .one(db)
        .await?;
    if institution.is_none() {
        return Err(ServiceError::not_found("institution"));
    }
    let now = Utc::now().into();
    let am = innovation_hub::ActiveModel {
        id: Set(Uuid::new_v4()),
        institution_id: Set(input.institution_id),
        name: Set(input.name),
        capacity: Set(input.capacity),
        occupied: Set(input.occupied),
        activity: Set(input.activity),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn list_hubs(
    db: &DatabaseConnection,
    institution_id: Option<Uuid>,
) -> Result<Vec<innovation_hub::Model>, ServiceError> {
    let mut query = innovation_hub::Entity::find().order_by_asc(innovation_hub::Column::Name);
    if let Some(inst) = institution_id {
        query = query.filter(innovation_hub::Column::InstitutionId.eq(inst));
    }
    Ok(query.all(db).await?)
}

pub async fn update_hub(
    db: &DatabaseConnection,
    id: Uuid,
    input: HubInput,
) -> Result<innovation_hub::Model, ServiceError> {
    validate_required("name", &input.name)?;
    validate_choice("activity", &input.activity, innovation_hub::ACTIVITY_LEVELS)?;
    if input.occupied > input.capacity {
        return Err(ServiceError::Validation("occupied cannot exceed capacity".into()));
    }
    let found = innovation_hub::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("hub"))?;
    let mut am: innovation_hub::ActiveModel = found.into();
    am.name = Set(input.name);
    am.capacity = Set(input.capacity);
    am.occupied = Set(input.occupied);
    am.activity = Set(input.activity);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete_hub(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = innovation_hub::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    pub institution_id: Uuid,
    pub hub_id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub team_name: String,
    pub sector: String,
    pub location_category: String,
    pub stage: String,
    #[serde(default)]
    pub problem_statement: String,
    #[serde(default)]
    pub proposed_solution: String,
    #[serde(default)]
    pub revenue_generated: Decimal,
    #[serde(default)]
    pub funding_acquired: Decimal,
    #[serde(default)]
    pub jobs_created: i32,
}

fn validate_project(input: &ProjectInput) -> Result<(), ServiceError> {
    validate_required("name", &input.name)?;
    validate_choice("sector", &input.sector, project::SECTORS)?;
    validate_choice("stage", &input.stage, project::STAGES)?;
    validate_choice("location_category", &input.location_category, project::LOCATION_CATEGORIES)?;
    Ok(())
}

pub async fn create_project(
    db: &DatabaseConnection,
    input: ProjectInput,
) -> Result<project::Model, ServiceError> {
    validate_project(&input)?;
    if let Some(hub_id) = input.hub_id {
        if innovation_hub::Entity::find_by_id(hub_id).one(db).await?.is_none() {
            return Err(ServiceError::not_found("hub"));
        }
    }
    let now = Utc::now().into();
    let am = project::ActiveModel {
        id: Set(Uuid::new_v4()),
        institution_id: Set(input.institution_id),
        hub_id: Set(input.hub_id),
        name: Set(input.name),
        team_name: Set(input.team_name),
        sector: Set(input.sector),
        location_category: Set(input.location_category),
        stage: Set(input.stage),
        problem_statement: Set(input.problem_statement),
        proposed_solution: Set(input.proposed_solution),
        revenue_generated: Set(input.revenue_generated),
        funding_acquired: Set(input.funding_acquired),
        jobs_created: Set(input.jobs_created),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn get_project(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<project::Model>, ServiceError> {
    Ok(project::Entity::find_by_id(id).one(db).await?)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    pub institution_id: Option<Uuid>,
    pub sector: Option<String>,
    pub stage: Option<String>,
}

pub async fn list_projects(
    db: &DatabaseConnection,
    filter: ProjectFilter,
) -> Result<Vec<project::Model>, ServiceError> {
    let mut query = project::Entity::find().order_by_asc(project::Column::Name);
    if let Some(inst) = filter.institution_id {
        query = query.filter(project::Column::InstitutionId.eq(inst));
    }
    if let Some(sector) = filter.sector {
        query = query.filter(project::Column::Sector.eq(sector));
    }
    if let Some(stage) = filter.stage {
        query = query.filter(project::Column::Stage.eq(stage));
    }
    Ok(query.all(db).await?)
}

pub async fn update_project(
    db: &DatabaseConnection,
    id: Uuid,
    input: ProjectInput,
) -> Result<project::Model, ServiceError> {
    validate_project(&input)?;
    let found = project::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("project"))?;
    let mut am: project::ActiveModel = found.into();
    am.hub_id = Set(input.hub_id);
    am.name = Set(input.name);
    am.team_name = Set(input.team_name);
    am.sector = Set(input.sector);
    am.location_category = Set(input.location_category);
    am.stage = Set(input.stage);
    am.problem_statement = Set(input.problem_statement);
    am.proposed_solution = Set(input.proposed_solution);
    am.revenue_generated = Set(input.revenue_generated);
    am.funding_acquired = Set(input.funding_acquired);
    am.jobs_created = Set(input.jobs_created);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete_project(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = project::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrantInput {
    pub institution_id: Uuid,
    pub project_id: Uuid,
    pub donor: String,
    pub amount: Decimal,
    pub date_awarded: chrono::NaiveDate,
}

pub async fn create_grant(
    db: &DatabaseConnection,
    input: GrantInput,
) -> Result<research_grant::Model, ServiceError> {
    validate_required("donor", &input.donor)?;
    if input.amount <= Decimal::ZERO {
        return Err(ServiceError::Validation("amount must be greater than zero".into()));
    }
    if project::Entity::find_by_id(input.project_id).one(db).await?.is_none() {
        return Err(ServiceError::not_found("project"));
    }
    let am = research_grant::ActiveModel {
        id: Set(Uuid::new_v4()),
        institution_id: Set(input.institution_id),
        project_id: Set(input.project_id),
        donor: Set(input.donor),
        amount: Set(input.amount),
        date_awarded: Set(input.date_awarded),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub async fn list_grants(
    db: &DatabaseConnection,
    institution_id: Option<Uuid>,
) -> Result<Vec<research_grant::Model>, ServiceError> {
    let mut query =
        research_grant::Entity::find().order_by_desc(research_grant::Column::DateAwarded);
    if let Some(inst) = institution_id {
        query = query.filter(research_grant::Column::InstitutionId.eq(inst));
    }
    Ok(query.all(db).await?)
}

pub async fn delete_grant(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = research_grant::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartnershipInput {
    pub institution_id: Uuid,
    pub partner_name: String,
    #[serde(default)]
    pub focus_area: String,
    pub agreement_date: Option<chrono::NaiveDate>,
    #[serde(default = "default_partnership_status")]
    pub status: String,
}

fn default_partnership_status() -> String {
    "Active".to_string()
}

pub async fn create_partnership(
    db: &DatabaseConnection,
    input: PartnershipInput,
) -> Result<partnership::Model, ServiceError> {
    validate_required("partner_name", &input.partner_name)?;
    let now = Utc::now().into();
    let am = partnership::ActiveModel {
        id: Set(Uuid::new_v4()),
        institution_id: Set(input.institution_id),
        partner_name: Set(input.partner_name),
        focus_area: Set(input.focus_area),
        agreement_date: Set(input.agreement_date),
        status: Set(input.status),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn list_partnerships(
    db: &DatabaseConnection,
    institution_id: Option<Uuid>,
) -> Result<Vec<partnership::Model>, ServiceError> {
    let mut query = partnership::Entity::find().order_by_asc(partnership::Column::PartnerName);
    if let Some(inst) = institution_id {
        query = query.filter(partnership::Column::InstitutionId.eq(inst));
    }
    Ok(query.all(db).await?)
}

pub async fn delete_partnership(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = partnership::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[derive(Debug, Serialize)]
pub struct PipelineStats {
    pub total_projects: u64,
    pub by_stage: BTreeMap<String, u64>,
    pub by_sector: BTreeMap<String, u64>,
    pub total_revenue: Decimal,
    pub total_funding: Decimal,
    pub total_jobs: i64,
}

/// Aggregate view of the innovation pipeline, optionally scoped to one
/// institution.
pub async fn pipeline_stats(
    db: &DatabaseConnection,
    institution_id: Option<Uuid>,
) -> Result<PipelineStats, ServiceError> {
    let mut query = project::Entity::find();
    if let Some(inst) = institution_id {
        query = query.filter(project::Column::InstitutionId.eq(inst));
    }
    let projects = query.all(db).await?;

    let mut by_stage: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_sector: BTreeMap<String, u64> = BTreeMap::new();
    let mut total_revenue = Decimal::ZERO;
    let mut total_funding = Decimal::ZERO;
    let mut total_jobs = 0i64;
    for p in &projects {
        *by_stage.entry(p.stage.clone()).or_default() += 1;
        *by_sector.entry(p.sector.clone()).or_default() += 1;
        total_revenue += p.revenue_generated;
        total_funding += p.funding_acquired;
        total_jobs += p.jobs_created as i64;
    }
    Ok(PipelineStats {
        total_projects: projects.len() as u64,
        by_stage,
        by_sector,
        total_revenue,
        total_funding,
        total_jobs,
    })
}
