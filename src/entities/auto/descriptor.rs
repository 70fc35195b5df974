//! Entity descriptor for Auto

use super::handlers::{assign_partner, create_auto, delete_auto, get_auto, list_autos};
use crate::server::{AppState, EntityDescriptor};
use axum::Router;
use axum::routing::get;

/// Descriptor for the Auto entity
pub struct AutoDescriptor;

impl EntityDescriptor for AutoDescriptor {
    fn entity_type(&self) -> &str {
        "auto"
    }

    fn build_routes(&self) -> Router<AppState> {
        Router::new()
            .route(&self.collection_path(), get(list_autos).post(create_auto))
            .route(
                &self.detail_path(),
                get(get_auto).delete(delete_auto).post(assign_partner),
            )
    }
}
