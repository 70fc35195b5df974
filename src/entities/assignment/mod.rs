//! Assignment entity module
//!
//! Assignments have no routes of their own; they are created through
//! `POST /auto/{id}/` and surface as relation fields.

pub mod model;

pub use model::{Assignment, NewAssignment};
