use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::errors::ServiceError;
use models::{payment, student};

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentInput {
    /// Business identifier, not the row uuid.
    pub student_id: String,
    pub amount: Decimal,
    pub date_paid: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub reference: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentReceipt {
    pub payment: payment::Model,
    pub student_name: String,
    pub total_paid: Decimal,
}

/// Record a payment against a student, looked up by their business id.
pub async fn record_payment(
    db: &DatabaseConnection,
    input: PaymentInput,
) -> Result<PaymentReceipt, ServiceError> {
    let found = student::find_by_student_id(db, &input.student_id)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("student '{}' not found", input.student_id))
        })?;
    let date_paid = input.date_paid.unwrap_or_else(|| Utc::now().date_naive());
    let created = payment::create(db, found.id, input.amount, date_paid, &input.reference).await?;
    let total = crate::student_service::total_paid(db, found.id).await?;
    Ok(PaymentReceipt {
        payment: created,
        student_name: found.full_name(),
        total_paid: total,
    })
}

pub async fn payments_for_student(
    db: &DatabaseConnection,
    student_pk: Uuid,
) -> Result<Vec<payment::Model>, ServiceError> {
    Ok(payment::Entity::find()
        .filter(payment::Column::StudentId.eq(student_pk))
        .order_by_desc(payment::Column::DatePaid)
        .all(db)
        .await?)
}

#[derive(Debug, Serialize)]
pub struct RecentPayment {
    pub payment: payment::Model,
    pub student_name: String,
    pub student_id: String,
}

/// Latest payments for an institution, newest first.
pub async fn recent_activity(
    db: &DatabaseConnection,
    institution_id: Option<Uuid>,
    limit: u64,
) -> Result<Vec<RecentPayment>, ServiceError> {
    let mut students = student::Entity::find();
    if let Some(inst) = institution_id {
        students = students.filter(student::Column::InstitutionId.eq(inst));
    }
    let students = students.all(db).await?;
    let by_pk: BTreeMap<Uuid, &student::Model> = students.iter().map(|s| (s.id, s)).collect();

    let rows = payment::Entity::find()
        .filter(payment::Column::StudentId.is_in(by_pk.keys().copied().collect::<Vec<_>>()))
        .order_by_desc(payment::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .filter_map(|p| {
            by_pk.get(&p.student_id).map(|s| RecentPayment {
                student_name: s.full_name(),
                student_id: s.student_id.clone(),
                payment: p,
            })
        })
        .collect())
}

#[derive(Debug, Serialize)]
pub struct FinanceSummary {
    pub year: i32,
    pub total_collected: Decimal,
    pub payment_count: u64,
    pub monthly: BTreeMap<u32, Decimal>,
}

/// Year-to-date collections with a per-month breakdown.
pub async fn finance_summary(
    db: &DatabaseConnection,
    institution_id: Option<Uuid>,
) -> Result<FinanceSummary, ServiceError> {
    let year = Utc::now().year();
    let mut student_pks: Option<Vec<Uuid>> = None;
    if let Some(inst) = institution_id {
        let pks: Vec<Uuid> = student::Entity::find()
            .filter(student::Column::InstitutionId.eq(inst))
            .select_only()
            .column(student::Column::Id)
            .into_tuple()
            .all(db)
            .await?;
        student_pks = Some(pks);
    }
    let mut query = payment::Entity::find();
    if let Some(pks) = student_pks {
        query = query.filter(payment::Column::StudentId.is_in(pks));
    }
    let rows = query.all(db).await?;

    let mut total = Decimal::ZERO;
    let mut count = 0u64;
    let mut monthly: BTreeMap<u32, Decimal> = BTreeMap::new();
    for p in rows.iter().filter(|p| p.date_paid.year() == year) {
        total += p.amount;
        count += 1;
        *monthly.entry(p.date_paid.month()).or_insert(Decimal::ZERO) += p.amount;
    }
    Ok(FinanceSummary { year, total_collected: total, payment_count: count, monthly })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::student_service::{self, StudentInput};
    use crate::test_support;
    use common::crypto::KeyRing;
    use models::{faculty, institution, program};
    use sea_orm::ActiveModelTrait;

    async fn seed_student(db: &DatabaseConnection, tag: &str) -> models::student::Model {
        let inst = institution::create(
            db,
            institution::NewInstitution {
                name: format!("Pay Institution {tag}"),
                kind: "Polytechnic".into(),
                province: "Bulawayo".into(),
                location: "Bulawayo".into(),
                address: "2 Test Rd".into(),
                capacity: 300,
                staff_count: 25,
                status: "Active".into(),
                established: 1975,
                has_innovation_hub: false,
            },
        )
        .await
        .unwrap();
        let now = Utc::now().into();
        let fac = faculty::ActiveModel {
            id: sea_orm::Set(Uuid::new_v4()),
            institution_id: sea_orm::Set(inst.id),
            name: sea_orm::Set(format!("Commerce {tag}")),
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
                name: format!("Accounting {tag}"),
                code: format!("ACC-{tag}"),
                duration_years: 2,
                level: "Diploma".into(),
                description: String::new(),
                coordinator: String::new(),
                student_capacity: 80,
                modules: String::new(),
                entry_requirements: String::new(),
            },
        )
        .await
        .unwrap();
        let keys = KeyRing::from_keys(&[KeyRing::generate_key()]).unwrap();
        student_service::create_student(
            db,
            &keys,
            StudentInput {
                student_id: format!("PAY-{tag}"),
                national_id: None,
                first_name: "Rudo".into(),
                last_name: "Chirwa".into(),
                gender: "Female".into(),
                date_of_birth: None,
                enrollment_year: 2024,
                status: "Active".into(),
                dropout_reason: None,
                institution_id: inst.id,
                program_id: prog.id,
                graduation_year: None,
                final_grade: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn recording_a_payment_increases_total_paid() {
        if test_support::db_tests_disabled() {
            return;
        }
        let db = test_support::get_db().await.unwrap();
        let tag = Uuid::new_v4().simple().to_string();
        let student = seed_student(&db, &tag).await;

        let before = crate::student_service::total_paid(&db, student.id).await.unwrap();
        let receipt = record_payment(
            &db,
            PaymentInput {
                student_id: student.student_id.clone(),
                amount: Decimal::new(15000, 2),
                date_paid: None,
                reference: "RCPT-001".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(receipt.total_paid, before + Decimal::new(15000, 2));
    }

    #[tokio::test]
    async fn nonpositive_amounts_are_rejected() {
        if test_support::db_tests_disabled() {
            return;
        }
        let db = test_support::get_db().await.unwrap();
        let tag = Uuid::new_v4().simple().to_string();
        let student = seed_student(&db, &tag).await;

        let err = record_payment(
            &db,
            PaymentInput {
                student_id: student.student_id,
                amount: Decimal::ZERO,
                date_paid: None,
                reference: String::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_) | ServiceError::Model(_)));
    }

    #[tokio::test]
    async fn unknown_student_is_not_found() {
        if test_support::db_tests_disabled() {
            return;
        }
        let db = test_support::get_db().await.unwrap();
        let err = record_payment(
            &db,
            PaymentInput {
                student_id: "NO-SUCH-STUDENT".into(),
                amount: Decimal::ONE,
                date_paid: None,
                reference: String::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
