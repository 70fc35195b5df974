//! Vehicle HTTP handlers

use super::model::{Auto, NewAuto};
use crate::auth::CurrentUser;
use crate::core::entity::Entity;
use crate::core::error::Result;
use crate::core::extractors::{JsonBody, RecordPath, parse_json};
use crate::core::projection::{self, ProjectionMode, Related};
use crate::core::query::ProjectionQuery;
use crate::core::store::RecordStore;
use crate::entities::assignment::NewAssignment;
use crate::entities::partner::Partner;
use crate::server::AppState;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::Value;

type AutoNode = Related<Auto, Related<Partner, Auto>>;

/// Attach the assigned partners; their own vehicles are only loaded when the
/// nested shape will render them.
pub async fn load_relations(
    store: &dyn RecordStore,
    auto: Auto,
    mode: ProjectionMode,
) -> Result<AutoNode> {
    let partners = store.partners_of(auto.id).await?;

    let mut related = Vec::with_capacity(partners.len());
    for partner in partners {
        let autos = if mode.is_nested() && partner.is_active() {
            store.autos_of(partner.id).await?
        } else {
            Vec::new()
        };
        related.push(Related::new(partner, autos));
    }

    Ok(Related::new(auto, related))
}

pub async fn list_autos(
    _user: CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<ProjectionQuery>,
) -> Result<Json<Value>> {
    let mode = query.mode();

    let mut nodes = Vec::new();
    for auto in state.store.list_autos().await? {
        nodes.push(load_relations(state.store.as_ref(), auto, mode).await?);
    }

    Ok(Json(projection::project_all(&nodes, mode)?))
}

pub async fn get_auto(
    _user: CurrentUser,
    State(state): State<AppState>,
    RecordPath(id): RecordPath,
    Query(query): Query<ProjectionQuery>,
) -> Result<Json<Value>> {
    let mode = query.mode();
    let auto = state.store.get_auto(id).await?;
    let node = load_relations(state.store.as_ref(), auto, mode).await?;

    Ok(Json(projection::project(&node, mode)?))
}

pub async fn create_auto(
    _user: CurrentUser,
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Response> {
    let new = NewAuto::from_json(&body)?;
    let auto = state.store.create_auto(new).await?;

    tracing::info!(id = auto.id, "auto created");
    let node: AutoNode = Related::alone(auto);
    Ok((
        StatusCode::CREATED,
        Json(projection::project(&node, ProjectionMode::Flat)?),
    )
        .into_response())
}

pub async fn delete_auto(
    _user: CurrentUser,
    State(state): State<AppState>,
    RecordPath(id): RecordPath,
) -> Result<StatusCode> {
    state.store.soft_delete_auto(id).await?;

    tracing::info!(id, "auto deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Assign a partner to the vehicle named in the path.
///
/// The vehicle is resolved before the body is read, so an unknown vehicle
/// is a 404 whatever the body holds.
pub async fn assign_partner(
    _user: CurrentUser,
    State(state): State<AppState>,
    RecordPath(id): RecordPath,
    body: Bytes,
) -> Result<Response> {
    let auto = state.store.get_auto(id).await?;

    let new = NewAssignment::from_json(&parse_json(&body)?)?;
    let assignment = state.store.create_assignment(auto.id, new.partner).await?;

    tracing::info!(
        id = assignment.id,
        auto = assignment.auto,
        partner = assignment.partner,
        "partner assigned"
    );
    Ok((StatusCode::CREATED, Json(assignment)).into_response())
}
