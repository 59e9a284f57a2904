//! Table rendering to PDF with builtin fonts, no embedded assets.

use chrono::Utc;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};

use super::engine::ReportPayload;
use crate::errors::ServiceError;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const ROW_HEIGHT: f32 = 7.0;
const BODY_SIZE: f32 = 9.0;

pub fn render(payload: &ReportPayload) -> Result<Vec<u8>, ServiceError> {
    let (doc, page, layer) =
        PdfDocument::new(payload.title.clone(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ServiceError::Render(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ServiceError::Render(e.to_string()))?;

    let column_width = (PAGE_WIDTH - 2.0 * MARGIN) / payload.columns.len().max(1) as f32;
    let mut current = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT - MARGIN;

    current.use_text(payload.title.clone(), 16.0, Mm(MARGIN), Mm(y), &bold);
    y -= ROW_HEIGHT * 2.0;
    draw_header(&current, payload, &bold, column_width, y);
    y -= ROW_HEIGHT;

    for row in &payload.data {
        if y < MARGIN + ROW_HEIGHT * 2.0 {
            let (next_page, next_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
            current = doc.get_page(next_page).get_layer(next_layer);
            y = PAGE_HEIGHT - MARGIN;
            draw_header(&current, payload, &bold, column_width, y);
            y -= ROW_HEIGHT;
        }
        for (i, col) in payload.columns.iter().enumerate() {
            let text = row
                .get(&col.key)
                .map(cell_text)
                .unwrap_or_default();
            let x = MARGIN + i as f32 * column_width;
            current.use_text(truncate(&text, column_width), BODY_SIZE, Mm(x), Mm(y), &regular);
        }
        y -= ROW_HEIGHT;
    }

    let footer = format!(
        "Generated {} | {} record(s)",
        Utc::now().format("%Y-%m-%d %H:%M UTC"),
        payload.total
    );
    current.use_text(footer, 8.0, Mm(MARGIN), Mm(MARGIN / 2.0), &regular);

    save(doc)
}

fn draw_header(
    layer: &printpdf::PdfLayerReference,
    payload: &ReportPayload,
    bold: &IndirectFontRef,
    column_width: f32,
    y: f32,
) {
    for (i, col) in payload.columns.iter().enumerate() {
        let x = MARGIN + i as f32 * column_width;
        layer.use_text(truncate(&col.label, column_width), BODY_SIZE, Mm(x), Mm(y), bold);
    }
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Keep cell text inside its column. Helvetica at 9pt runs roughly
/// 1.8mm per character.
fn truncate(text: &str, column_width: f32) -> String {
    let max_chars = ((column_width / 1.8) as usize).max(4);
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars - 1).collect();
        format!("{kept}~")
    }
}

fn save(doc: PdfDocumentReference) -> Result<Vec<u8>, ServiceError> {
    doc.save_to_bytes().map_err(|e| ServiceError::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::engine::ColumnOut;
    use serde_json::json;

    fn payload() -> ReportPayload {
        let mut row = serde_json::Map::new();
        row.insert("employee_id".to_string(), json!("EMP-001"));
        row.insert("full_name".to_string(), json!("Rudo Chirwa"));
        ReportPayload {
            report_type: "staff".to_string(),
            title: "Staff Report".to_string(),
            columns: vec![
                ColumnOut { key: "employee_id".to_string(), label: "Employee ID".to_string() },
                ColumnOut { key: "full_name".to_string(), label: "Full Name".to_string() },
            ],
            data: vec![row],
            total: 1,
            is_aggregated: false,
            group_by: None,
        }
    }

    #[test]
    fn renders_a_nonempty_pdf() {
        let bytes = render(&payload()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn truncate_marks_overflow() {
        assert_eq!(truncate("short", 50.0), "short");
        let long = "a very long program name that will not fit";
        let cut = truncate(long, 18.0);
        assert!(cut.ends_with('~'));
        assert!(cut.chars().count() < long.chars().count());
    }
}
