//! Service layer providing business-oriented CRUD operations on top of models.
//! - Separates strategy dispatch from data access.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod db;
pub mod errors;
pub mod file;
pub mod menu_service;
pub mod repository;
pub mod seed;
#[cfg(test)]
pub mod test_support;
