use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::{errors::ServiceError, pagination::Pagination};
use models::institution::{self, NewInstitution};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstitutionFilter {
    pub province: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
}

pub async fn create_institution(
    db: &DatabaseConnection,
    input: NewInstitution,
) -> Result<institution::Model, ServiceError> {
    Ok(institution::create(db, input).await?)
}

pub async fn get_institution(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<institution::Model>, ServiceError> {
    Ok(institution::Entity::find_by_id(id).one(db).await?)
}

pub async fn list_institutions(
    db: &DatabaseConnection,
    filter: InstitutionFilter,
    opts: Pagination,
) -> Result<Vec<institution::Model>, ServiceError> {
    let mut query = institution::Entity::find();
    if let Some(province) = filter.province {
        query = query.filter(institution::Column::Province.eq(province));
    }
    if let Some(kind) = filter.kind {
        query = query.filter(institution::Column::Kind.eq(kind));
    }
    if let Some(status) = filter.status {
        query = query.filter(institution::Column::Status.eq(status));
    }
    let (page_idx, per_page) = opts.normalize();
    Ok(query.paginate(db, per_page).fetch_page(page_idx).await?)
}

pub async fn update_institution(
    db: &DatabaseConnection,
    id: Uuid,
    input: NewInstitution,
) -> Result<institution::Model, ServiceError> {
    institution::validate(&input)?;
    let found = institution::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("institution"))?;
    // renames must not collide with another institution
    if found.name != input.name {
        let clash = institution::Entity::find()
            .filter(institution::Column::Name.eq(input.name.clone()))
            .one(db)
            .await?;
        if clash.is_some() {
            return Err(ServiceError::Conflict(format!(
                "institution '{}' already exists",
                input.name
            )));
        }
    }
    let mut am: institution::ActiveModel = found.into();
    am.name = Set(input.name);
    am.kind = Set(input.kind);
    am.province = Set(input.province);
    am.location = Set(input.location);
    am.address = Set(input.address);
    am.capacity = Set(input.capacity);
    am.staff_count = Set(input.staff_count);
    am.status = Set(input.status);
    am.established = Set(input.established);
    am.has_innovation_hub = Set(input.has_innovation_hub);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Deletion is blocked by RESTRICT FKs while students reference the
/// institution; surface that as a conflict rather than a 500.
pub async fn delete_institution(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let enrolled = models::student::Entity::find()
        .filter(models::student::Column::InstitutionId.eq(id))
        .count(db)
        .await?;
    if enrolled > 0 {
        return Err(ServiceError::Conflict(format!(
            "institution has {} enrolled students",
            enrolled
        )));
    }
    let res = institution::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[derive(Debug, Serialize)]
pub struct InstitutionStats {
    pub total: u64,
    pub by_province: BTreeMap<String, u64>,
    pub by_kind: BTreeMap<String, u64>,
    pub by_status: BTreeMap<String, u64>,
}

pub async fn institution_stats(db: &DatabaseConnection) -> Result<InstitutionStats, ServiceError> {
    let all = institution::Entity::find().all(db).await?;
    let mut by_province: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_kind: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_status: BTreeMap<String, u64> = BTreeMap::new();
    for inst in &all {
        *by_province.entry(inst.province.clone()).or_default() += 1;
        *by_kind.entry(inst.kind.clone()).or_default() += 1;
        *by_status.entry(inst.status.clone()).or_default() += 1;
    }
    Ok(InstitutionStats { total: all.len() as u64, by_province, by_kind, by_status })
}
