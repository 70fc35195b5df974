//! Server module for building the HTTP service
//!
//! [`ServerBuilder`] wires the entity routes registered in an
//! [`EntityRegistry`], the login/logout routes, the health routes and the
//! logging layers around one shared [`AppState`].

pub mod builder;
pub mod entity_registry;
pub mod request_log;
pub mod state;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use state::AppState;
