//! Static report schemas. Each report type declares its fields once;
//! filtering, grouping, and projection are all driven from these tables.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "choices")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Choice(&'static [&'static str]),
    Date,
    Relation,
    Computed,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldDef {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub filterable: bool,
    pub selectable: bool,
    pub groupable: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReportSchema {
    pub report_type: &'static str,
    pub title: &'static str,
    pub fields: &'static [FieldDef],
    pub default_columns: &'static [&'static str],
}

impl ReportSchema {
    pub fn field(&self, key: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.key == key)
    }
}

const STUDENT_FIELDS: &[FieldDef] = &[
    FieldDef {
        key: "student_id",
        label: "Student ID",
        kind: FieldKind::String,
        filterable: true,
        selectable: true,
        groupable: false,
    },
    FieldDef {
        key: "full_name",
        label: "Full Name",
        kind: FieldKind::Computed,
        filterable: false,
        selectable: true,
        groupable: false,
    },
    FieldDef {
        key: "first_name",
        label: "First Name",
        kind: FieldKind::String,
        filterable: true,
        selectable: true,
        groupable: false,
    },
    FieldDef {
        key: "last_name",
        label: "Last Name",
        kind: FieldKind::String,
        filterable: true,
        selectable: true,
        groupable: false,
    },
    FieldDef {
        key: "gender",
        label: "Gender",
        kind: FieldKind::Choice(models::student::GENDERS),
        filterable: true,
        selectable: true,
        groupable: true,
    },
    FieldDef {
        key: "enrollment_year",
        label: "Enrollment Year",
        kind: FieldKind::Number,
        filterable: true,
        selectable: true,
        groupable: true,
    },
    FieldDef {
        key: "status",
        label: "Status",
        kind: FieldKind::Choice(models::student::STATUSES),
        filterable: true,
        selectable: true,
        groupable: true,
    },
    FieldDef {
        key: "program",
        label: "Program",
        kind: FieldKind::Relation,
        filterable: true,
        selectable: true,
        groupable: true,
    },
    FieldDef {
        key: "institution",
        label: "Institution",
        kind: FieldKind::Relation,
        filterable: true,
        selectable: true,
        groupable: true,
    },
    FieldDef {
        key: "graduation_year",
        label: "Graduation Year",
        kind: FieldKind::Number,
        filterable: true,
        selectable: true,
        groupable: true,
    },
    FieldDef {
        key: "final_grade",
        label: "Final Grade",
        kind: FieldKind::Choice(models::student::FINAL_GRADES),
        filterable: true,
        selectable: true,
        groupable: true,
    },
];

const STAFF_FIELDS: &[FieldDef] = &[
    FieldDef {
        key: "employee_id",
        label: "Employee ID",
        kind: FieldKind::String,
        filterable: true,
        selectable: true,
        groupable: false,
    },
    FieldDef {
        key: "full_name",
        label: "Full Name",
        kind: FieldKind::Computed,
        filterable: false,
        selectable: true,
        groupable: false,
    },
    FieldDef {
        key: "email",
        label: "Email",
        kind: FieldKind::String,
        filterable: true,
        selectable: true,
        groupable: false,
    },
    FieldDef {
        key: "position",
        label: "Position",
        kind: FieldKind::Choice(models::staff::POSITIONS),
        filterable: true,
        selectable: true,
        groupable: true,
    },
    FieldDef {
        key: "department",
        label: "Department",
        kind: FieldKind::String,
        filterable: true,
        selectable: true,
        groupable: true,
    },
    FieldDef {
        key: "qualification",
        label: "Qualification",
        kind: FieldKind::Choice(models::staff::QUALIFICATIONS),
        filterable: true,
        selectable: true,
        groupable: true,
    },
    FieldDef {
        key: "is_active",
        label: "Active",
        kind: FieldKind::Boolean,
        filterable: true,
        selectable: true,
        groupable: true,
    },
    FieldDef {
        key: "institution",
        label: "Institution",
        kind: FieldKind::Relation,
        filterable: true,
        selectable: true,
        groupable: true,
    },
    FieldDef {
        key: "faculty",
        label: "Faculty",
        kind: FieldKind::Relation,
        filterable: true,
        selectable: true,
        groupable: true,
    },
    FieldDef {
        key: "date_joined",
        label: "Date Joined",
        kind: FieldKind::Date,
        filterable: true,
        selectable: true,
        groupable: false,
    },
];

pub const STUDENTS: ReportSchema = ReportSchema {
    report_type: "students",
    title: "Student Report",
    fields: STUDENT_FIELDS,
    default_columns: &["student_id", "full_name", "gender", "enrollment_year", "status", "program"],
};

/// Same shape as the student report with a fixed Graduated base filter.
pub const GRADUATES: ReportSchema = ReportSchema {
    report_type: "graduates",
    title: "Graduate Report",
    fields: STUDENT_FIELDS,
    default_columns: &[
        "student_id",
        "full_name",
        "program",
        "graduation_year",
        "final_grade",
        "institution",
    ],
};

pub const STAFF: ReportSchema = ReportSchema {
    report_type: "staff",
    title: "Staff Report",
    fields: STAFF_FIELDS,
    default_columns: &["employee_id", "full_name", "position", "qualification", "institution"],
};

pub const ALL: &[&ReportSchema] = &[&STAFF, &STUDENTS, &GRADUATES];

pub fn lookup(report_type: &str) -> Option<&'static ReportSchema> {
    ALL.iter().copied().find(|s| s.report_type == report_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_every_registered_type() {
        for schema in ALL {
            assert!(lookup(schema.report_type).is_some());
        }
        assert!(lookup("payments").is_none());
    }

    #[test]
    fn default_columns_are_selectable_fields() {
        for schema in ALL {
            for key in schema.default_columns {
                let field = schema.field(key).unwrap_or_else(|| panic!("missing field {key}"));
                assert!(field.selectable, "{key} must be selectable");
            }
        }
    }

    #[test]
    fn computed_fields_are_never_filterable() {
        for schema in ALL {
            for field in schema.fields {
                if field.kind == FieldKind::Computed {
                    assert!(!field.filterable);
                }
            }
        }
    }
}
