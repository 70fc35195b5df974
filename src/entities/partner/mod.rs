//! Partner entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::PartnerDescriptor;
pub use handlers::*;
pub use model::{NewPartner, Partner};
