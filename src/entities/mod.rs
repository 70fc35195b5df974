//! Entities module - the three record kinds

pub mod assignment;
pub mod auto;
pub mod partner;

// Re-export models for convenience
pub use assignment::Assignment;
pub use auto::{Auto, AutoDescriptor};
pub use partner::{Partner, PartnerDescriptor};
