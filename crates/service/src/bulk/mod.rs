//! Best-effort bulk import of students and staff from uploaded CSV/XLSX
//! files. Each row is validated and inserted independently; bad rows are
//! reported with their 1-based row number and never abort the run.

pub mod parse;

use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use common::crypto::KeyRing;
use models::{faculty, program, staff, student};

use parse::{optional, parse_table, require, Row};

#[derive(Debug, Serialize)]
pub struct RowError {
    /// Spreadsheet row number as the user sees it: the header is row 1,
    /// so the first data row is 2.
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Default, Serialize)]
pub struct BulkOutcome {
    pub created: usize,
    pub skipped: usize,
    pub errors: Vec<RowError>,
}

/// Resolves faculty/program names to ids, creating missing rows on the
/// fly. The cache spans one import run so repeated names cost one lookup.
struct HierarchyCache {
    institution_id: Uuid,
    faculties: HashMap<String, Uuid>,
    programs: HashMap<(Uuid, String), Uuid>,
}

impl HierarchyCache {
    fn new(institution_id: Uuid) -> Self {
        Self { institution_id, faculties: HashMap::new(), programs: HashMap::new() }
    }

    async fn faculty_id(
        &mut self,
        db: &DatabaseConnection,
        name: &str,
    ) -> Result<Uuid, ServiceError> {
        let key = name.to_lowercase();
        if let Some(id) = self.faculties.get(&key) {
            return Ok(*id);
        }
        let existing = faculty::Entity::find()
            .filter(faculty::Column::InstitutionId.eq(self.institution_id))
            .filter(faculty::Column::Name.eq(name))
            .one(db)
            .await?;
        let id = match existing {
            Some(f) => f.id,
            None => {
                let now = Utc::now().into();
                let am = faculty::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    institution_id: Set(self.institution_id),
                    name: Set(name.to_string()),
                    dean: Set(String::new()),
                    location: Set(String::new()),
                    email: Set(String::new()),
                    description: Set(String::new()),
                    status: Set("Active".to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                let created = am.insert(db).await?;
                info!(faculty = name, "auto-created faculty during import");
                created.id
            }
        };
        self.faculties.insert(key, id);
        Ok(id)
    }

    async fn program_id(
        &mut self,
        db: &DatabaseConnection,
        faculty_id: Uuid,
        name: &str,
    ) -> Result<Uuid, ServiceError> {
        let key = (faculty_id, name.to_lowercase());
        if let Some(id) = self.programs.get(&key) {
            return Ok(*id);
        }
        let existing = program::Entity::find()
            .filter(program::Column::FacultyId.eq(faculty_id))
            .filter(program::Column::Name.eq(name))
            .one(db)
            .await?;
        let id = match existing {
            Some(p) => p.id,
            None => {
                let created = program::create(
                    db,
                    program::NewProgram {
                        faculty_id,
                        name: name.to_string(),
                        code: derive_code(name),
                        duration_years: 3,
                        level: "Diploma".to_string(),
                        description: String::new(),
                        coordinator: String::new(),
                        student_capacity: 0,
                        modules: String::new(),
                        entry_requirements: String::new(),
                    },
                )
                .await?;
                info!(program = name, "auto-created program during import");
                created.id
            }
        };
        self.programs.insert(key, id);
        Ok(id)
    }
}

/// Initials of the name, good enough for auto-created placeholder rows.
fn derive_code(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .collect::<String>()
        .to_uppercase();
    if initials.is_empty() { "PRG".to_string() } else { initials }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .map_err(|_| format!("invalid date '{value}', expected YYYY-MM-DD"))
}

fn parse_year(value: &str) -> Result<i32, String> {
    value.parse::<i32>().map_err(|_| format!("invalid year '{value}'"))
}

#[instrument(skip(db, keys, bytes), fields(file = filename))]
pub async fn import_students(
    db: &DatabaseConnection,
    keys: &KeyRing,
    institution_id: Uuid,
    filename: &str,
    bytes: &[u8],
) -> Result<BulkOutcome, ServiceError> {
    let rows = parse_table(filename, bytes)?;
    let mut outcome = BulkOutcome::default();
    let mut cache = HierarchyCache::new(institution_id);
    for (idx, row) in rows.iter().enumerate() {
        // header occupies row 1 of the file
        let row_no = idx + 2;
        match import_student_row(db, keys, &mut cache, row).await {
            Ok(RowResult::Created) => outcome.created += 1,
            Ok(RowResult::Skipped(message)) => {
                outcome.skipped += 1;
                outcome.errors.push(RowError { row: row_no, message });
            }
            Err(message) => {
                outcome.skipped += 1;
                outcome.errors.push(RowError { row: row_no, message });
            }
        }
    }
    info!(created = outcome.created, skipped = outcome.skipped, "student import finished");
    Ok(outcome)
}

enum RowResult {
    Created,
    Skipped(String),
}

async fn import_student_row(
    db: &DatabaseConnection,
    keys: &KeyRing,
    cache: &mut HierarchyCache,
    row: &Row,
) -> Result<RowResult, String> {
    let student_id = require(row, "student_id")?;
    let first_name = require(row, "first_name")?;
    let last_name = require(row, "last_name")?;
    let gender = require(row, "gender")?;
    let faculty_name = require(row, "faculty")?;
    let program_name = require(row, "program")?;

    let duplicate = student::find_by_student_id(db, &student_id)
        .await
        .map_err(|e| e.to_string())?;
    if duplicate.is_some() {
        return Ok(RowResult::Skipped(format!("student_id '{student_id}' already exists")));
    }

    let enrollment_year = match optional(row, "enrollment_year") {
        Some(v) => parse_year(&v)?,
        None => Utc::now().year(),
    };
    let date_of_birth = match optional(row, "date_of_birth") {
        Some(v) => Some(parse_date(&v)?),
        None => None,
    };
    let national_id = optional(row, "national_id").map(|nid| keys.encrypt(&nid));

    let faculty_id = cache
        .faculty_id(db, &faculty_name)
        .await
        .map_err(|e| e.to_string())?;
    let program_id = cache
        .program_id(db, faculty_id, &program_name)
        .await
        .map_err(|e| e.to_string())?;

    let new = student::NewStudent {
        student_id,
        national_id,
        first_name,
        last_name,
        gender,
        date_of_birth,
        enrollment_year,
        status: optional(row, "status").unwrap_or_else(|| "Active".to_string()),
        dropout_reason: None,
        institution_id: cache.institution_id,
        program_id,
        graduation_year: None,
        final_grade: None,
    };
    student::create(db, new).await.map_err(|e| e.to_string())?;
    Ok(RowResult::Created)
}

#[instrument(skip(db, bytes), fields(file = filename))]
pub async fn import_staff(
    db: &DatabaseConnection,
    institution_id: Uuid,
    filename: &str,
    bytes: &[u8],
) -> Result<BulkOutcome, ServiceError> {
    let rows = parse_table(filename, bytes)?;
    let mut outcome = BulkOutcome::default();
    let mut cache = HierarchyCache::new(institution_id);
    for (idx, row) in rows.iter().enumerate() {
        let row_no = idx + 2;
        match import_staff_row(db, &mut cache, row).await {
            Ok(RowResult::Created) => outcome.created += 1,
            Ok(RowResult::Skipped(message)) => {
                outcome.skipped += 1;
                outcome.errors.push(RowError { row: row_no, message });
            }
            Err(message) => {
                outcome.skipped += 1;
                outcome.errors.push(RowError { row: row_no, message });
            }
        }
    }
    info!(created = outcome.created, skipped = outcome.skipped, "staff import finished");
    Ok(outcome)
}

async fn import_staff_row(
    db: &DatabaseConnection,
    cache: &mut HierarchyCache,
    row: &Row,
) -> Result<RowResult, String> {
    let employee_id = require(row, "employee_id")?;
    let first_name = require(row, "first_name")?;
    let last_name = require(row, "last_name")?;
    let email = require(row, "email")?;
    let position = require(row, "position")?;
    let qualification = require(row, "qualification")?;

    let duplicate = staff::find_by_employee_id(db, &employee_id)
        .await
        .map_err(|e| e.to_string())?;
    if duplicate.is_some() {
        return Ok(RowResult::Skipped(format!("employee_id '{employee_id}' already exists")));
    }

    let faculty_id = match optional(row, "faculty") {
        Some(name) => Some(cache.faculty_id(db, &name).await.map_err(|e| e.to_string())?),
        None => None,
    };
    let date_joined = match optional(row, "date_joined") {
        Some(v) => parse_date(&v)?,
        None => Utc::now().date_naive(),
    };

    let new = staff::NewStaff {
        institution_id: cache.institution_id,
        faculty_id,
        first_name,
        last_name,
        email,
        phone: optional(row, "phone").unwrap_or_default(),
        employee_id,
        position,
        department: optional(row, "department").unwrap_or_default(),
        qualification,
        specialization: optional(row, "specialization").unwrap_or_default(),
        date_joined,
    };
    staff::create(db, new).await.map_err(|e| e.to_string())?;
    Ok(RowResult::Created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_code_uses_initials() {
        assert_eq!(derive_code("Computer Science"), "CS");
        assert_eq!(derive_code("mining"), "M");
        assert_eq!(derive_code(""), "PRG");
    }

    #[test]
    fn dates_accept_both_formats() {
        assert!(parse_date("2024-03-01").is_ok());
        assert!(parse_date("01/03/2024").is_ok());
        assert!(parse_date("March 1").is_err());
    }
}
