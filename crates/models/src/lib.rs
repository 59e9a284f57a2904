pub mod errors;
pub mod db;

pub mod institution;
pub mod faculty;
pub mod program;
pub mod fee_structure;
pub mod student;
pub mod payment;
pub mod staff;
pub mod innovation_hub;
pub mod project;
pub mod research_grant;
pub mod partnership;
pub mod iseop_program;
pub mod iseop_student;
pub mod app_user;
pub mod user_credentials;
pub mod report_template;
pub mod generated_report;

use errors::ModelError;

/// Shared enum-field check: `value` must be one of `allowed`.
pub fn validate_choice(field: &str, value: &str, allowed: &[&str]) -> Result<(), ModelError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ModelError::Validation(format!(
            "invalid {}: '{}' (expected one of {})",
            field,
            value,
            allowed.join(", ")
        )))
    }
}

pub fn validate_required(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{} required", field)));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if !email.contains('@') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

/// Enrollment/establishment years live in a generous but bounded window.
pub fn validate_year(field: &str, year: i32) -> Result<(), ModelError> {
    if !(1900..=2100).contains(&year) {
        return Err(ModelError::Validation(format!("{} out of range: {}", field, year)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_validation() {
        assert!(validate_choice("status", "Active", student::STATUSES).is_ok());
        assert!(validate_choice("status", "Expelled", student::STATUSES).is_err());
    }

    #[test]
    fn year_bounds() {
        assert!(validate_year("enrollment_year", 2024).is_ok());
        assert!(validate_year("enrollment_year", 1492).is_err());
    }

    #[test]
    fn email_needs_at() {
        assert!(validate_email("dean@poly.ac.zw").is_ok());
        assert!(validate_email("dean.poly").is_err());
    }
}
