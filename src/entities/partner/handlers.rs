//! Partner HTTP handlers

use super::model::{NewPartner, Partner};
use crate::auth::CurrentUser;
use crate::core::entity::Entity;
use crate::core::error::Result;
use crate::core::extractors::{JsonBody, RecordPath};
use crate::core::projection::{self, ProjectionMode, Related};
use crate::core::query::ProjectionQuery;
use crate::core::store::RecordStore;
use crate::entities::auto::Auto;
use crate::server::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::Value;

type PartnerNode = Related<Partner, Related<Auto, Partner>>;

/// Attach the assigned vehicles, and in nested mode their partners
pub async fn load_relations(
    store: &dyn RecordStore,
    partner: Partner,
    mode: ProjectionMode,
) -> Result<PartnerNode> {
    let autos = store.autos_of(partner.id).await?;

    let mut related = Vec::with_capacity(autos.len());
    for auto in autos {
        let partners = if mode.is_nested() && auto.is_active() {
            store.partners_of(auto.id).await?
        } else {
            Vec::new()
        };
        related.push(Related::new(auto, partners));
    }

    Ok(Related::new(partner, related))
}

pub async fn list_partners(
    _user: CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<ProjectionQuery>,
) -> Result<Json<Value>> {
    let mode = query.mode();

    let mut nodes = Vec::new();
    for partner in state.store.list_partners().await? {
        nodes.push(load_relations(state.store.as_ref(), partner, mode).await?);
    }

    Ok(Json(projection::project_all(&nodes, mode)?))
}

pub async fn get_partner(
    _user: CurrentUser,
    State(state): State<AppState>,
    RecordPath(id): RecordPath,
    Query(query): Query<ProjectionQuery>,
) -> Result<Json<Value>> {
    let mode = query.mode();
    let partner = state.store.get_partner(id).await?;
    let node = load_relations(state.store.as_ref(), partner, mode).await?;

    Ok(Json(projection::project(&node, mode)?))
}

pub async fn create_partner(
    _user: CurrentUser,
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Response> {
    let new = NewPartner::from_json(&body)?;
    let partner = state.store.create_partner(new).await?;

    tracing::info!(id = partner.id, "partner created");
    let node: PartnerNode = Related::alone(partner);
    Ok((
        StatusCode::CREATED,
        Json(projection::project(&node, ProjectionMode::Flat)?),
    )
        .into_response())
}

pub async fn delete_partner(
    _user: CurrentUser,
    State(state): State<AppState>,
    RecordPath(id): RecordPath,
) -> Result<StatusCode> {
    state.store.soft_delete_partner(id).await?;

    tracing::info!(id, "partner deleted");
    Ok(StatusCode::NO_CONTENT)
}
