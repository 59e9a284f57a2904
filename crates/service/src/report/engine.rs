//! Generic filter/group/project pipeline over the static schemas.
//!
//! Rows are loaded into `Record`s holding both a raw value (for
//! filtering) and a display string (for output), so the same code path
//! serves every report type.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::instrument;
use uuid::Uuid;

use crate::errors::ServiceError;
use super::schema::{self, FieldKind, ReportSchema};

#[derive(Debug, Clone)]
pub struct Cell {
    pub raw: Value,
    pub display: String,
}

impl Cell {
    fn new(raw: Value, display: impl Into<String>) -> Self {
        Self { raw, display: display.into() }
    }

    fn text(value: &str) -> Self {
        Self::new(Value::String(value.to_string()), value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Record {
    cells: HashMap<&'static str, Cell>,
}

impl Record {
    fn put(&mut self, key: &'static str, cell: Cell) {
        self.cells.insert(key, cell);
    }

    pub fn display(&self, key: &str) -> String {
        self.cells.get(key).map(|c| c.display.clone()).unwrap_or_default()
    }

    fn raw(&self, key: &str) -> Option<&Value> {
        self.cells.get(key).map(|c| &c.raw)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    pub report_type: String,
    #[serde(default)]
    pub filters: Map<String, Value>,
    pub columns: Option<Vec<String>>,
    pub group_by: Option<String>,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "json".to_string()
}

#[derive(Debug, Serialize)]
pub struct ColumnOut {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct ReportPayload {
    pub report_type: String,
    pub title: String,
    pub columns: Vec<ColumnOut>,
    pub data: Vec<Map<String, Value>>,
    pub total: usize,
    pub is_aggregated: bool,
    pub group_by: Option<String>,
}

pub enum ReportOutput {
    Json(ReportPayload),
    Pdf(Vec<u8>),
}

pub fn schemas() -> Vec<&'static ReportSchema> {
    schema::ALL.to_vec()
}

pub fn get_schema(report_type: &str) -> Result<&'static ReportSchema, ServiceError> {
    schema::lookup(report_type)
        .ok_or_else(|| ServiceError::Validation(format!("unknown report type '{report_type}'")))
}

#[instrument(skip(db, request), fields(report_type = %request.report_type))]
pub async fn run_report(
    db: &DatabaseConnection,
    request: &ReportRequest,
) -> Result<ReportOutput, ServiceError> {
    let payload = build_payload(db, request, None).await?;
    match request.format.as_str() {
        "json" => Ok(ReportOutput::Json(payload)),
        "pdf" => {
            let bytes = super::pdf::render(&payload)?;
            Ok(ReportOutput::Pdf(bytes))
        }
        other => Err(ServiceError::Validation(format!("unknown format '{other}'"))),
    }
}

/// First rows only, always JSON.
pub async fn preview_report(
    db: &DatabaseConnection,
    request: &ReportRequest,
) -> Result<ReportPayload, ServiceError> {
    build_payload(db, request, Some(10)).await
}

async fn build_payload(
    db: &DatabaseConnection,
    request: &ReportRequest,
    limit: Option<usize>,
) -> Result<ReportPayload, ServiceError> {
    let schema = get_schema(&request.report_type)?;
    let records = load_records(db, schema).await?;
    let records = apply_filters(schema, records, &request.filters)?;
    let total = records.len();

    if let Some(group_key) = request.group_by.as_deref().filter(|g| !g.is_empty()) {
        let field = schema
            .field(group_key)
            .ok_or_else(|| ServiceError::Validation(format!("unknown field '{group_key}'")))?;
        if !field.groupable {
            return Err(ServiceError::Validation(format!("field '{group_key}' is not groupable")));
        }
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for record in &records {
            *counts.entry(record.display(group_key)).or_default() += 1;
        }
        let mut grouped: Vec<(String, usize)> = counts.into_iter().collect();
        grouped.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let data = grouped
            .into_iter()
            .map(|(value, count)| {
                let mut row = Map::new();
                row.insert(group_key.to_string(), Value::String(value));
                row.insert("count".to_string(), json!(count));
                row
            })
            .collect();
        return Ok(ReportPayload {
            report_type: schema.report_type.to_string(),
            title: schema.title.to_string(),
            columns: vec![
                ColumnOut { key: group_key.to_string(), label: field.label.to_string() },
                ColumnOut { key: "count".to_string(), label: "Count".to_string() },
            ],
            data,
            total,
            is_aggregated: true,
            group_by: Some(group_key.to_string()),
        });
    }

    let columns = resolve_columns(schema, request.columns.as_deref())?;
    let mut data = Vec::new();
    for record in records.iter().take(limit.unwrap_or(usize::MAX)) {
        let mut row = Map::new();
        for col in &columns {
            row.insert(col.key.clone(), Value::String(record.display(&col.key)));
        }
        data.push(row);
    }
    Ok(ReportPayload {
        report_type: schema.report_type.to_string(),
        title: schema.title.to_string(),
        columns,
        data,
        total,
        is_aggregated: false,
        group_by: None,
    })
}

fn resolve_columns(
    schema: &ReportSchema,
    requested: Option<&[String]>,
) -> Result<Vec<ColumnOut>, ServiceError> {
    let keys: Vec<String> = match requested {
        Some(cols) if !cols.is_empty() => cols.to_vec(),
        _ => schema.default_columns.iter().map(|k| k.to_string()).collect(),
    };
    let mut out = Vec::new();
    for key in keys {
        let field = schema
            .field(&key)
            .ok_or_else(|| ServiceError::Validation(format!("unknown field '{key}'")))?;
        if !field.selectable {
            return Err(ServiceError::Validation(format!("field '{key}' is not selectable")));
        }
        out.push(ColumnOut { key, label: field.label.to_string() });
    }
    Ok(out)
}

async fn load_records(
    db: &DatabaseConnection,
    schema: &ReportSchema,
) -> Result<Vec<Record>, ServiceError> {
    match schema.report_type {
        "staff" => load_staff(db).await,
        "students" => load_students(db, false).await,
        "graduates" => load_students(db, true).await,
        other => Err(ServiceError::Validation(format!("unknown report type '{other}'"))),
    }
}

fn name_map<E, F>(rows: Vec<E>, f: F) -> HashMap<Uuid, String>
where
    F: Fn(&E) -> (Uuid, String),
{
    rows.iter().map(|r| f(r)).collect()
}

fn relation_cell(names: &HashMap<Uuid, String>, id: Uuid) -> Cell {
    let display = names.get(&id).cloned().unwrap_or_else(|| "Unknown".to_string());
    Cell::new(Value::String(id.to_string()), display)
}

async fn load_students(
    db: &DatabaseConnection,
    graduates_only: bool,
) -> Result<Vec<Record>, ServiceError> {
    use models::student;
    let mut query = student::Entity::find();
    if graduates_only {
        query = query.filter(student::Column::Status.eq("Graduated"));
    }
    let rows = query.all(db).await?;

    let programs =
        name_map(models::program::Entity::find().all(db).await?, |p| (p.id, p.name.clone()));
    let institutions =
        name_map(models::institution::Entity::find().all(db).await?, |i| (i.id, i.name.clone()));

    let mut records = Vec::with_capacity(rows.len());
    for s in rows {
        let mut record = Record::default();
        record.put("student_id", Cell::text(&s.student_id));
        record.put("full_name", Cell::text(&s.full_name()));
        record.put("first_name", Cell::text(&s.first_name));
        record.put("last_name", Cell::text(&s.last_name));
        record.put("gender", Cell::text(&s.gender));
        record.put(
            "enrollment_year",
            Cell::new(json!(s.enrollment_year), s.enrollment_year.to_string()),
        );
        record.put("status", Cell::text(&s.status));
        record.put("program", relation_cell(&programs, s.program_id));
        record.put("institution", relation_cell(&institutions, s.institution_id));
        match s.graduation_year {
            Some(year) => record.put("graduation_year", Cell::new(json!(year), year.to_string())),
            None => record.put("graduation_year", Cell::new(Value::Null, "")),
        }
        record.put("final_grade", Cell::text(s.final_grade.as_deref().unwrap_or("")));
        records.push(record);
    }
    Ok(records)
}

async fn load_staff(db: &DatabaseConnection) -> Result<Vec<Record>, ServiceError> {
    let rows = models::staff::Entity::find().all(db).await?;
    let institutions =
        name_map(models::institution::Entity::find().all(db).await?, |i| (i.id, i.name.clone()));
    let faculties =
        name_map(models::faculty::Entity::find().all(db).await?, |f| (f.id, f.name.clone()));

    let mut records = Vec::with_capacity(rows.len());
    for s in rows {
        let mut record = Record::default();
        record.put("employee_id", Cell::text(&s.employee_id));
        record.put("full_name", Cell::text(&s.full_name()));
        record.put("email", Cell::text(&s.email));
        record.put("position", Cell::text(&s.position));
        record.put("department", Cell::text(&s.department));
        record.put("qualification", Cell::text(&s.qualification));
        record.put(
            "is_active",
            Cell::new(json!(s.is_active), if s.is_active { "Active" } else { "Inactive" }),
        );
        record.put("institution", relation_cell(&institutions, s.institution_id));
        match s.faculty_id {
            Some(id) => record.put("faculty", relation_cell(&faculties, id)),
            None => record.put("faculty", Cell::new(Value::Null, "")),
        }
        record.put("date_joined", Cell::text(&s.date_joined.format("%Y-%m-%d").to_string()));
        records.push(record);
    }
    Ok(records)
}

fn apply_filters(
    schema: &ReportSchema,
    records: Vec<Record>,
    filters: &Map<String, Value>,
) -> Result<Vec<Record>, ServiceError> {
    let mut active: Vec<(&'static str, FieldKind, &Value)> = Vec::new();
    for (key, value) in filters {
        if is_blank(value) {
            continue;
        }
        // unknown keys are silently ignored
        let Some(field) = schema.field(key) else { continue };
        if !field.filterable {
            return Err(ServiceError::Validation(format!("field '{key}' is not filterable")));
        }
        active.push((field.key, field.kind, value));
    }
    if active.is_empty() {
        return Ok(records);
    }
    Ok(records
        .into_iter()
        .filter(|r| active.iter().all(|(key, kind, value)| matches(r, key, *kind, value)))
        .collect())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty() || s.eq_ignore_ascii_case("all"),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => matches!(s.to_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn matches(record: &Record, key: &str, kind: FieldKind, filter: &Value) -> bool {
    match kind {
        FieldKind::String => {
            let needle = as_text(filter).to_lowercase();
            record.display(key).to_lowercase().contains(&needle)
        }
        FieldKind::Choice(_) => match filter {
            Value::Array(options) => {
                options.iter().any(|o| record.display(key).eq_ignore_ascii_case(&as_text(o)))
            }
            other => record.display(key).eq_ignore_ascii_case(&as_text(other)),
        },
        FieldKind::Boolean => {
            record.raw(key).map(truthy).unwrap_or(false) == truthy(filter)
        }
        FieldKind::Number => {
            let Some(actual) = record.raw(key).and_then(as_number) else { return false };
            match filter {
                Value::Object(range) => {
                    let min = range.get("min").and_then(as_number);
                    let max = range.get("max").and_then(as_number);
                    min.map_or(true, |m| actual >= m) && max.map_or(true, |m| actual <= m)
                }
                other => as_number(other).map_or(false, |wanted| actual == wanted),
            }
        }
        FieldKind::Date => {
            // ISO dates compare correctly as strings
            let actual = record.display(key);
            if actual.is_empty() {
                return false;
            }
            match filter {
                Value::Object(range) => {
                    let from = range.get("from").map(as_text);
                    let to = range.get("to").map(as_text);
                    from.map_or(true, |f| actual >= f) && to.map_or(true, |t| actual <= t)
                }
                other => actual == as_text(other),
            }
        }
        FieldKind::Relation => {
            let wanted = as_text(filter);
            let by_id = record
                .raw(key)
                .and_then(|v| v.as_str())
                .map(|id| id == wanted)
                .unwrap_or(false);
            by_id || record.display(key).eq_ignore_ascii_case(&wanted)
        }
        FieldKind::Computed => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        let mut r = Record::default();
        r.put("status", Cell::text("Graduated"));
        r.put("first_name", Cell::text("Tariro"));
        r.put("enrollment_year", Cell::new(json!(2021), "2021"));
        r.put("is_active", Cell::new(json!(true), "Active"));
        r.put("date_joined", Cell::text("2022-05-14"));
        r.put(
            "program",
            Cell::new(json!("6b7e0d7e-0000-0000-0000-000000000001"), "Mining Engineering"),
        );
        r
    }

    #[test]
    fn string_filters_are_case_insensitive_contains() {
        let r = sample();
        assert!(matches(&r, "first_name", FieldKind::String, &json!("tari")));
        assert!(!matches(&r, "first_name", FieldKind::String, &json!("zed")));
    }

    #[test]
    fn choice_filters_accept_lists() {
        let r = sample();
        let kind = FieldKind::Choice(models::student::STATUSES);
        assert!(matches(&r, "status", kind, &json!(["Active", "Graduated"])));
        assert!(!matches(&r, "status", kind, &json!("Active")));
    }

    #[test]
    fn number_filters_support_ranges() {
        let r = sample();
        assert!(matches(&r, "enrollment_year", FieldKind::Number, &json!(2021)));
        assert!(matches(&r, "enrollment_year", FieldKind::Number, &json!({"min": 2020})));
        assert!(!matches(&r, "enrollment_year", FieldKind::Number, &json!({"max": 2020})));
    }

    #[test]
    fn boolean_filters_parse_truthy_strings() {
        let r = sample();
        assert!(matches(&r, "is_active", FieldKind::Boolean, &json!("1")));
        assert!(matches(&r, "is_active", FieldKind::Boolean, &json!(true)));
        assert!(!matches(&r, "is_active", FieldKind::Boolean, &json!("false")));
    }

    #[test]
    fn date_filters_support_ranges() {
        let r = sample();
        let filter = json!({"from": "2022-01-01", "to": "2022-12-31"});
        assert!(matches(&r, "date_joined", FieldKind::Date, &filter));
        assert!(!matches(&r, "date_joined", FieldKind::Date, &json!({"from": "2023-01-01"})));
    }

    #[test]
    fn relation_filters_accept_id_or_name() {
        let r = sample();
        let kind = FieldKind::Relation;
        assert!(matches(&r, "program", kind, &json!("mining engineering")));
        assert!(matches(&r, "program", kind, &json!("6b7e0d7e-0000-0000-0000-000000000001")));
        assert!(!matches(&r, "program", kind, &json!("Agriculture")));
    }

    #[test]
    fn blank_and_all_values_are_ignored() {
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!("all")));
        assert!(is_blank(&Value::Null));
        assert!(!is_blank(&json!("Active")));
    }

    #[test]
    fn unknown_filter_keys_are_ignored() {
        let schema = schema::lookup("students").unwrap();
        let mut filters = Map::new();
        filters.insert("no_such_field".to_string(), json!("x"));
        let out = apply_filters(schema, vec![sample()], &filters).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn non_filterable_fields_are_rejected() {
        let schema = schema::lookup("students").unwrap();
        let mut filters = Map::new();
        filters.insert("full_name".to_string(), json!("Tariro"));
        assert!(apply_filters(schema, vec![sample()], &filters).is_err());
    }
}
