//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;

pub mod auth;
pub mod bulk;
pub mod report;

pub mod institution_service;
pub mod faculty_service;
pub mod program_service;
pub mod student_service;
pub mod staff_service;
pub mod payment_service;
pub mod innovation_service;
pub mod iseop_service;

#[cfg(test)]
pub mod test_support;
