//! Service layer providing business-oriented CRUD operations on top of models.
//! - Every operation takes the database handle explicitly.
//! - Writes run in a transaction that is rolled back on any failure.
//! - Reuses validation and entity definitions in `models` crate.

pub mod errors;
pub mod user_service;
#[cfg(test)]
pub mod test_support;
