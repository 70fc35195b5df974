//! Auto (vehicle) entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::AutoDescriptor;
pub use handlers::*;
pub use model::{Auto, NewAuto, UsageType};
