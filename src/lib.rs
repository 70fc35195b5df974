//! # roadrecord
//!
//! Record-keeping backend for vehicles ("autos"), business partners and the
//! assignments between them, served as a token-authenticated JSON API.
//!
//! ## Features
//!
//! - **Soft delete**: deleting stamps `deleted_at`; deleted records vanish
//!   from every read but their rows stay
//! - **Relationship projection**: list and detail reads render the related
//!   records either as ids (`flat`) or as objects one level deep (`?query=nested`)
//! - **Explicit validation**: each record kind validates its own payload and
//!   reports every offending field at once
//! - **Token auth**: `/login/` issues a token, `/logout/` revokes it
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use roadrecord::prelude::*;
//!
//! let sessions = SessionStore::new(None);
//! sessions.add_user("admin", "admin", Argon2Params::default())?;
//!
//! ServerBuilder::new()
//!     .with_store(InMemoryRecordStore::new())
//!     .with_sessions(sessions)
//!     .serve("127.0.0.1:8000")
//!     .await?;
//! ```

pub mod auth;
pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;
pub mod telemetry;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        entity::{Entity, RecordId, Timestamps},
        error::{RecordError, Result},
        projection::{ProjectionMode, Related, Relational},
        store::RecordStore,
        validation::FieldErrors,
    };

    // === Entities ===
    pub use crate::entities::{
        assignment::{Assignment, NewAssignment},
        auto::{Auto, NewAuto, UsageType},
        partner::{NewPartner, Partner},
    };

    // === Auth ===
    pub use crate::auth::{CurrentUser, SessionStore, password::Argon2Params};

    // === Storage ===
    pub use crate::storage::InMemoryRecordStore;

    // === Config ===
    pub use crate::config::{AppConfig, Args};

    // === Server ===
    pub use crate::server::{AppState, EntityDescriptor, EntityRegistry, ServerBuilder};

    pub use async_trait::async_trait;
}
