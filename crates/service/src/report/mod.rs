//! Report generation: static schemas drive a generic
//! filter -> aggregate -> project pipeline with JSON and PDF output.

pub mod engine;
pub mod history;
pub mod pdf;
pub mod schema;

pub use engine::{
    get_schema, preview_report, run_report, schemas, ReportOutput, ReportPayload, ReportRequest,
};
pub use history::{
    create_template, deactivate_template, list_templates, record_generation, recent_generations,
    TemplateInput,
};
pub use schema::{FieldDef, FieldKind, ReportSchema};
