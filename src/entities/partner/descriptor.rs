//! Entity descriptor for Partner

use super::handlers::{create_partner, delete_partner, get_partner, list_partners};
use crate::server::{AppState, EntityDescriptor};
use axum::Router;
use axum::routing::get;

/// Descriptor for the Partner entity
pub struct PartnerDescriptor;

impl EntityDescriptor for PartnerDescriptor {
    fn entity_type(&self) -> &str {
        "partner"
    }

    fn build_routes(&self) -> Router<AppState> {
        Router::new()
            .route(&self.collection_path(), get(list_partners).post(create_partner))
            .route(&self.detail_path(), get(get_partner).delete(delete_partner))
    }
}
