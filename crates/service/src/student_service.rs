use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::{errors::ServiceError, pagination::Pagination};
use common::crypto::KeyRing;
use models::student::{self, NewStudent};

/// API-facing student payload. `national_id` is plaintext here; it only
/// exists encrypted in the database.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentInput {
    pub student_id: String,
    pub national_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub enrollment_year: i32,
    #[serde(default = "default_status")]
    pub status: String,
    pub dropout_reason: Option<String>,
    pub institution_id: Uuid,
    pub program_id: Uuid,
    pub graduation_year: Option<i32>,
    pub final_grade: Option<String>,
}

fn default_status() -> String {
    "Active".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentFilter {
    pub institution_id: Option<Uuid>,
    pub program_id: Option<Uuid>,
    pub status: Option<String>,
    pub enrollment_year: Option<i32>,
}

/// Decrypt the national_id of a freshly loaded row.
fn reveal(keys: &KeyRing, mut m: student::Model) -> Result<student::Model, ServiceError> {
    if let Some(nid) = m.national_id.take() {
        m.national_id = Some(keys.decrypt(&nid)?);
    }
    Ok(m)
}

/// Fernet output is non-deterministic, so plaintext uniqueness has to be
/// checked by decrypting stored values.
async fn national_id_in_use(
    db: &DatabaseConnection,
    keys: &KeyRing,
    plain: &str,
    exclude: Option<Uuid>,
) -> Result<bool, ServiceError> {
    let rows: Vec<(Uuid, Option<String>)> = student::Entity::find()
        .select_only()
        .column(student::Column::Id)
        .column(student::Column::NationalId)
        .into_tuple()
        .all(db)
        .await?;
    for (id, nid) in rows {
        if Some(id) == exclude {
            continue;
        }
        if let Some(nid) = nid {
            if keys.decrypt(&nid).map(|p| p == plain).unwrap_or(false) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

pub async fn create_student(
    db: &DatabaseConnection,
    keys: &KeyRing,
    input: StudentInput,
) -> Result<student::Model, ServiceError> {
    if let Some(nid) = &input.national_id {
        if national_id_in_use(db, keys, nid, None).await? {
            return Err(ServiceError::Conflict(format!("national_id '{}' already exists", nid)));
        }
    }
    let new = NewStudent {
        student_id: input.student_id,
        national_id: input.national_id.as_deref().map(|nid| keys.encrypt(nid)),
        first_name: input.first_name,
        last_name: input.last_name,
        gender: input.gender,
        date_of_birth: input.date_of_birth,
        enrollment_year: input.enrollment_year,
        status: input.status,
        dropout_reason: input.dropout_reason,
        institution_id: input.institution_id,
        program_id: input.program_id,
        graduation_year: input.graduation_year,
        final_grade: input.final_grade,
    };
    let created = student::create(db, new).await?;
    reveal(keys, created)
}

pub async fn get_student(
    db: &DatabaseConnection,
    keys: &KeyRing,
    id: Uuid,
) -> Result<Option<student::Model>, ServiceError> {
    match student::Entity::find_by_id(id).one(db).await? {
        Some(m) => Ok(Some(reveal(keys, m)?)),
        None => Ok(None),
    }
}

pub async fn list_students(
    db: &DatabaseConnection,
    keys: &KeyRing,
    filter: StudentFilter,
    opts: Pagination,
) -> Result<Vec<student::Model>, ServiceError> {
    let mut query = student::Entity::find();
    if let Some(inst) = filter.institution_id {
        query = query.filter(student::Column::InstitutionId.eq(inst));
    }
    if let Some(program) = filter.program_id {
        query = query.filter(student::Column::ProgramId.eq(program));
    }
    if let Some(status) = filter.status {
        query = query.filter(student::Column::Status.eq(status));
    }
    if let Some(year) = filter.enrollment_year {
        query = query.filter(student::Column::EnrollmentYear.eq(year));
    }
    let (page_idx, per_page) = opts.normalize();
    let rows = query.paginate(db, per_page).fetch_page(page_idx).await?;
    rows.into_iter().map(|m| reveal(keys, m)).collect()
}

pub async fn update_student(
    db: &DatabaseConnection,
    keys: &KeyRing,
    id: Uuid,
    input: StudentInput,
) -> Result<student::Model, ServiceError> {
    let found = student::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("student"))?;
    // student_id stays unique across the table
    if input.student_id != found.student_id {
        if student::find_by_student_id(db, &input.student_id).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "student_id '{}' already exists",
                input.student_id
            )));
        }
    }
    if let Some(nid) = &input.national_id {
        if national_id_in_use(db, keys, nid, Some(id)).await? {
            return Err(ServiceError::Conflict(format!("national_id '{}' already exists", nid)));
        }
    }
    // moving to Graduated stamps the graduation year if the caller
    // didn't supply one
    let mut graduation_year = input.graduation_year;
    if input.status == "Graduated" && graduation_year.is_none() {
        graduation_year = found.graduation_year.or_else(|| Some(Utc::now().year()));
    }
    let new = NewStudent {
        student_id: input.student_id.clone(),
        national_id: input.national_id.as_deref().map(|nid| keys.encrypt(nid)),
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        gender: input.gender.clone(),
        date_of_birth: input.date_of_birth,
        enrollment_year: input.enrollment_year,
        status: input.status.clone(),
        dropout_reason: input.dropout_reason.clone(),
        institution_id: input.institution_id,
        program_id: input.program_id,
        graduation_year,
        final_grade: input.final_grade.clone(),
    };
    student::validate(&new)?;
    let mut am: student::ActiveModel = found.into();
    am.student_id = Set(new.student_id);
    am.national_id = Set(new.national_id);
    am.first_name = Set(new.first_name);
    am.last_name = Set(new.last_name);
    am.gender = Set(new.gender);
    am.date_of_birth = Set(new.date_of_birth);
    am.enrollment_year = Set(new.enrollment_year);
    am.status = Set(new.status);
    am.dropout_reason = Set(new.dropout_reason);
    am.institution_id = Set(new.institution_id);
    am.program_id = Set(new.program_id);
    am.graduation_year = Set(new.graduation_year);
    am.final_grade = Set(new.final_grade);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    reveal(keys, updated)
}

pub async fn delete_student(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = student::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

/// Sum of all recorded payments for a student.
pub async fn total_paid(db: &DatabaseConnection, student_pk: Uuid) -> Result<Decimal, ServiceError> {
    let payments = models::payment::Entity::find()
        .filter(models::payment::Column::StudentId.eq(student_pk))
        .all(db)
        .await?;
    Ok(payments.iter().map(|p| p.amount).sum())
}

#[derive(Debug, Serialize)]
pub struct GraduationStats {
    pub total_graduates: u64,
    pub by_year: BTreeMap<i32, u64>,
    pub by_program: BTreeMap<String, u64>,
}

pub async fn graduation_stats(
    db: &DatabaseConnection,
    institution_id: Option<Uuid>,
) -> Result<GraduationStats, ServiceError> {
    let mut query = student::Entity::find().filter(student::Column::Status.eq("Graduated"));
    if let Some(inst) = institution_id {
        query = query.filter(student::Column::InstitutionId.eq(inst));
    }
    let graduates = query.all(db).await?;

    let program_ids: Vec<Uuid> = graduates.iter().map(|s| s.program_id).collect();
    let programs = models::program::Entity::find()
        .filter(models::program::Column::Id.is_in(program_ids))
        .all(db)
        .await?;
    let program_names: BTreeMap<Uuid, String> =
        programs.into_iter().map(|p| (p.id, p.name)).collect();

    let mut by_year: BTreeMap<i32, u64> = BTreeMap::new();
    let mut by_program: BTreeMap<String, u64> = BTreeMap::new();
    for grad in &graduates {
        if let Some(year) = grad.graduation_year {
            *by_year.entry(year).or_default() += 1;
        }
        let name = program_names
            .get(&grad.program_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        *by_program.entry(name).or_default() += 1;
    }
    Ok(GraduationStats { total_graduates: graduates.len() as u64, by_year, by_program })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use models::{faculty, institution, program};
    use sea_orm::ActiveModelTrait;

    async fn seed_program(db: &DatabaseConnection, tag: &str) -> (Uuid, Uuid) {
        let inst = institution::create(
            db,
            institution::NewInstitution {
                name: format!("Test Institution {tag}"),
                kind: "Polytechnic".into(),
                province: "Harare".into(),
                location: "Harare".into(),
                address: "1 Test Rd".into(),
                capacity: 500,
                staff_count: 40,
                status: "Active".into(),
                established: 1980,
                has_innovation_hub: false,
            },
        )
        .await
        .unwrap();
        let now = Utc::now().into();
        let fac = faculty::ActiveModel {
            id: sea_orm::Set(Uuid::new_v4()),
            institution_id: sea_orm::Set(inst.id),
            name: sea_orm::Set(format!("Engineering {tag}")),
            dean: sea_orm::Set(String::new()),
            location: sea_orm::Set(String::new()),
            email: sea_orm::Set(String::new()),
            description: sea_orm::Set(String::new()),
            status: sea_orm::Set("Active".into()),
            created_at: sea_orm::Set(now),
            updated_at: sea_orm::Set(now),
        }
        .insert(db)
        .await
        .unwrap();
        let prog = program::create(
            db,
            program::NewProgram {
                faculty_id: fac.id,
                name: format!("Mining {tag}"),
                code: format!("MIN-{tag}"),
                duration_years: 3,
                level: "Diploma".into(),
                description: String::new(),
                coordinator: String::new(),
                student_capacity: 100,
                modules: String::new(),
                entry_requirements: String::new(),
            },
        )
        .await
        .unwrap();
        (inst.id, prog.id)
    }

    fn input(tag: &str, institution_id: Uuid, program_id: Uuid) -> StudentInput {
        StudentInput {
            student_id: format!("ST-{tag}"),
            national_id: Some(format!("63-{tag}-X18")),
            first_name: "Tariro".into(),
            last_name: "Moyo".into(),
            gender: "Female".into(),
            date_of_birth: None,
            enrollment_year: 2023,
            status: "Active".into(),
            dropout_reason: None,
            institution_id,
            program_id,
            graduation_year: None,
            final_grade: None,
        }
    }

    #[tokio::test]
    async fn national_id_is_ciphertext_at_rest_and_plaintext_on_read() {
        if test_support::db_tests_disabled() {
            return;
        }
        let db = test_support::get_db().await.unwrap();
        let keys = KeyRing::from_keys(&[KeyRing::generate_key()]).unwrap();
        let tag = Uuid::new_v4().simple().to_string();
        let (inst, prog) = seed_program(&db, &tag).await;

        let created = create_student(&db, &keys, input(&tag, inst, prog)).await.unwrap();
        assert_eq!(created.national_id.as_deref(), Some(format!("63-{tag}-X18").as_str()));

        let stored = student::Entity::find_by_id(created.id).one(&db).await.unwrap().unwrap();
        let stored_nid = stored.national_id.unwrap();
        assert!(common::crypto::is_token(&stored_nid));
        assert_eq!(keys.decrypt(&stored_nid).unwrap(), format!("63-{tag}-X18"));
    }

    #[tokio::test]
    async fn duplicate_student_id_is_a_conflict() {
        if test_support::db_tests_disabled() {
            return;
        }
        let db = test_support::get_db().await.unwrap();
        let keys = KeyRing::from_keys(&[KeyRing::generate_key()]).unwrap();
        let tag = Uuid::new_v4().simple().to_string();
        let (inst, prog) = seed_program(&db, &tag).await;

        create_student(&db, &keys, input(&tag, inst, prog)).await.unwrap();
        let mut dup = input(&tag, inst, prog);
        dup.national_id = Some(format!("63-{tag}-Y22"));
        let err = create_student(&db, &keys, dup).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn graduation_sets_year_when_missing() {
        if test_support::db_tests_disabled() {
            return;
        }
        let db = test_support::get_db().await.unwrap();
        let keys = KeyRing::from_keys(&[KeyRing::generate_key()]).unwrap();
        let tag = Uuid::new_v4().simple().to_string();
        let (inst, prog) = seed_program(&db, &tag).await;

        let created = create_student(&db, &keys, input(&tag, inst, prog)).await.unwrap();
        let mut grad = input(&tag, inst, prog);
        grad.status = "Graduated".into();
        grad.final_grade = Some("Credit".into());
        let updated = update_student(&db, &keys, created.id, grad).await.unwrap();
        assert_eq!(updated.graduation_year, Some(Utc::now().year()));
    }
}
