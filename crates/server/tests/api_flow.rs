mod support;

use axum::http::StatusCode;
use axum::Router;
use serde_json::{json, Value};
use uuid::Uuid;

use support::{build_app, login_token, multipart_upload, send_json, send_raw, skip_db_tests};

fn decimal(v: &Value) -> rust_decimal::Decimal {
    match v {
        Value::String(s) => s.parse().unwrap_or_default(),
        other => other.to_string().parse().unwrap_or_default(),
    }
}

/// Create an institution, a faculty, and a program; returns their ids.
async fn seed_hierarchy(
    app: &Router,
    token: &str,
    tag: &str,
) -> anyhow::Result<(Uuid, Uuid, Uuid)> {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/institutions",
        Some(token),
        Some(json!({
            "name": format!("Test Institute {tag}"),
            "kind": "Polytechnic",
            "province": "Harare",
            "established": 1998
        })),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::CREATED, "institution: {body}");
    let institution_id: Uuid = body["id"].as_str().unwrap_or_default().parse()?;

    let (status, body) = send_json(
        app,
        "POST",
        "/api/faculties",
        Some(token),
        Some(json!({
            "institution_id": institution_id,
            "name": format!("Engineering {tag}")
        })),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::CREATED, "faculty: {body}");
    let faculty_id: Uuid = body["id"].as_str().unwrap_or_default().parse()?;

    let (status, body) = send_json(
        app,
        "POST",
        "/api/programs",
        Some(token),
        Some(json!({
            "faculty_id": faculty_id,
            "name": format!("Electrical {tag}"),
            "code": format!("EL-{tag}"),
            "duration_years": 3,
            "level": "Diploma"
        })),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::CREATED, "program: {body}");
    let program_id: Uuid = body["id"].as_str().unwrap_or_default().parse()?;

    Ok((institution_id, faculty_id, program_id))
}

fn short_tag() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[tokio::test]
async fn student_national_id_round_trips_and_duplicates_conflict() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let app = build_app().await?;
    let token = login_token(&app).await?;
    let tag = short_tag();
    let (institution_id, _faculty_id, program_id) = seed_hierarchy(&app, &token, &tag).await?;

    let student_id = format!("STU-{tag}");
    let national_id = format!("NID{tag}");
    let payload = json!({
        "student_id": student_id,
        "national_id": national_id,
        "first_name": "Ama",
        "last_name": "Mensah",
        "gender": "Female",
        "enrollment_year": 2024,
        "institution_id": institution_id,
        "program_id": program_id
    });

    let (status, body) =
        send_json(&app, "POST", "/api/students", Some(&token), Some(payload.clone())).await?;
    assert_eq!(status, StatusCode::CREATED, "create student: {body}");
    let pk = body["id"].as_str().unwrap_or_default().to_string();
    // API responses always carry the decrypted value
    assert_eq!(body["national_id"], national_id.as_str());

    let (status, body) =
        send_json(&app, "GET", &format!("/api/students/{pk}"), Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["national_id"], national_id.as_str());

    // Same business id again is a conflict
    let (status, body) =
        send_json(&app, "POST", "/api/students", Some(&token), Some(payload)).await?;
    assert_eq!(status, StatusCode::CONFLICT, "duplicate student: {body}");
    Ok(())
}

#[tokio::test]
async fn recording_payments_accumulates_total_paid() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let app = build_app().await?;
    let token = login_token(&app).await?;
    let tag = short_tag();
    let (institution_id, _, program_id) = seed_hierarchy(&app, &token, &tag).await?;

    let student_id = format!("PAY-{tag}");
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/students",
        Some(&token),
        Some(json!({
            "student_id": student_id,
            "first_name": "Kojo",
            "last_name": "Asante",
            "gender": "Male",
            "enrollment_year": 2023,
            "institution_id": institution_id,
            "program_id": program_id
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "create student: {body}");

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/payments/record",
        Some(&token),
        Some(json!({"student_id": student_id, "amount": "1500.00", "reference": "SEM1"})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "first payment: {body}");
    assert_eq!(decimal(&body["total_paid"]), rust_decimal::Decimal::new(150000, 2));

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/payments/record",
        Some(&token),
        Some(json!({"student_id": student_id, "amount": "250.50", "reference": "SEM1-TOPUP"})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "second payment: {body}");
    assert_eq!(decimal(&body["total_paid"]), rust_decimal::Decimal::new(175050, 2));

    // Unknown student and non-positive amounts are rejected
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/payments/record",
        Some(&token),
        Some(json!({"student_id": format!("NOPE-{tag}"), "amount": "10.00"})),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/payments/record",
        Some(&token),
        Some(json!({"student_id": student_id, "amount": "0"})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn bulk_upload_reports_created_skipped_and_errors() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let app = build_app().await?;
    let token = login_token(&app).await?;
    let tag = short_tag();
    let (institution_id, _, _) = seed_hierarchy(&app, &token, &tag).await?;

    // With the header on row 1, file row 3 repeats row 2's student id
    // and file row 4 is missing its gender.
    let csv = format!(
        "student_id,first_name,last_name,gender,faculty,program\n\
         BLK-{tag}-1,Yaw,Owusu,Male,Applied Science {tag},Food Tech {tag}\n\
         BLK-{tag}-1,Yaw,Owusu,Male,Applied Science {tag},Food Tech {tag}\n\
         BLK-{tag}-2,Esi,Bonsu,,Applied Science {tag},Food Tech {tag}\n"
    );
    let (content_type, body) = multipart_upload(institution_id, "students.csv", csv.as_bytes());
    let resp = send_raw(
        &app,
        "POST",
        "/api/students/bulk-upload",
        Some(&token),
        Some(&content_type),
        body,
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let outcome: Value = serde_json::from_slice(&bytes)?;

    assert_eq!(outcome["created"], 1, "outcome: {outcome}");
    assert_eq!(outcome["skipped"], 2, "outcome: {outcome}");
    let errors = outcome["errors"].as_array().cloned().unwrap_or_default();
    assert_eq!(errors.len(), 2, "outcome: {outcome}");
    assert_eq!(errors[0]["row"], 3);
    assert!(
        errors[0]["message"].as_str().unwrap_or_default().contains("already exists"),
        "outcome: {outcome}"
    );
    assert_eq!(errors[1]["row"], 4);
    Ok(())
}

#[tokio::test]
async fn report_group_counts_sum_to_total() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let app = build_app().await?;
    let token = login_token(&app).await?;
    let tag = short_tag();
    let (institution_id, _, program_id) = seed_hierarchy(&app, &token, &tag).await?;

    for (n, status) in [("1", "Active"), ("2", "Active"), ("3", "Graduated")] {
        let (code, body) = send_json(
            &app,
            "POST",
            "/api/students",
            Some(&token),
            Some(json!({
                "student_id": format!("RPT-{tag}-{n}"),
                "first_name": "Adwoa",
                "last_name": format!("Boateng{n}"),
                "gender": "Female",
                "enrollment_year": 2022,
                "status": status,
                "institution_id": institution_id,
                "program_id": program_id
            })),
        )
        .await?;
        assert_eq!(code, StatusCode::CREATED, "seed student: {body}");
    }

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/reports/generate",
        Some(&token),
        Some(json!({
            "report_type": "students",
            "filters": {"institution": institution_id},
            "group_by": "status"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "report: {body}");
    assert_eq!(body["is_aggregated"], true);
    assert_eq!(body["total"], 3);

    let summed: u64 = body["data"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .filter_map(|row| row["count"].as_u64())
        .sum();
    assert_eq!(summed, body["total"].as_u64().unwrap_or_default());
    Ok(())
}

#[tokio::test]
async fn report_pdf_format_returns_a_pdf_attachment() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let app = build_app().await?;
    let token = login_token(&app).await?;

    let payload = json!({"report_type": "staff", "format": "pdf"});
    let resp = send_raw(
        &app,
        "POST",
        "/api/reports/generate",
        Some(&token),
        Some("application/json"),
        serde_json::to_vec(&payload)?,
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert_eq!(content_type, "application/pdf");
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    assert!(bytes.starts_with(b"%PDF"), "body should be a pdf document");
    Ok(())
}

#[tokio::test]
async fn report_templates_and_history_round_trip() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let app = build_app().await?;
    let token = login_token(&app).await?;
    let tag = short_tag();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/reports/templates",
        Some(&token),
        Some(json!({
            "name": format!("Quarterly staff {tag}"),
            "category": "staff",
            "default_format": "pdf"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "template: {body}");
    let template_id = body["id"].as_str().unwrap_or_default().to_string();

    let (status, body) =
        send_json(&app, "GET", "/api/reports/templates", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<String> = body
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .filter_map(|t| t["name"].as_str().map(str::to_string))
        .collect();
    assert!(names.contains(&format!("Quarterly staff {tag}")));

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/reports/generate",
        Some(&token),
        Some(json!({"report_type": "staff"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        send_json(&app, "GET", "/api/reports/history", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().cloned().unwrap_or_default();
    assert!(!rows.is_empty(), "history should record generations");
    assert!(rows.iter().any(|r| r["status"] == "completed"));

    // bad category is rejected
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/reports/templates",
        Some(&token),
        Some(json!({"name": "x", "category": "nope"})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/reports/templates/{template_id}"),
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn unknown_report_filters_are_ignored_but_bad_fields_rejected() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let app = build_app().await?;
    let token = login_token(&app).await?;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/reports/generate",
        Some(&token),
        Some(json!({"report_type": "students", "filters": {"no_such_field": "x"}})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/reports/generate",
        Some(&token),
        Some(json!({"report_type": "students", "group_by": "full_name"})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
