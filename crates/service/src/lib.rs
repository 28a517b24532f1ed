//! Service layer providing the business workflows on top of models.
//! - Separates business logic from data access through repository traits.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Each module ships an in-memory repository used by tests and doc examples.

pub mod errors;
pub mod auth;
pub mod image;
pub mod pet;
