//! Core module containing the record model, projection and store contract

pub mod entity;
pub mod error;
pub mod extractors;
pub mod projection;
pub mod query;
pub mod store;
pub mod validation;

pub use entity::{Entity, RecordId, Timestamp, Timestamps};
pub use error::{RecordError, Result};
pub use extractors::{JsonBody, RecordPath};
pub use projection::{ProjectionMode, Related, Relational};
pub use query::ProjectionQuery;
pub use store::RecordStore;
pub use validation::{FieldErrors, FieldReader};
