//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access and push delivery.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod runtime;
pub mod metrics;
pub mod db;
pub mod promotion;
pub mod notification;
pub mod upload;
#[cfg(test)]
pub mod test_support;
