use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::CallerIdentity;
use super::repository::{PhysicianDirectory, RegulatoryRepository, RepositoryError};
use super::service::{CollaborationService, CollaborationServiceError};

/// Header carrying the authenticated caller forwarded by the gateway.
pub const CALLER_HEADER: &str = "x-caller-id";

#[derive(Debug, Default, Deserialize)]
pub struct CapacityQuery {
    #[serde(default)]
    pub state_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CapacityUpdateRequest {
    #[serde(default)]
    pub increment: Option<i64>,
}

/// Router exposing eligibility and capacity endpoints.
pub fn collaboration_router<R, D>(service: Arc<CollaborationService<R, D>>) -> Router
where
    R: RegulatoryRepository + 'static,
    D: PhysicianDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/licenses/:license_id/fpa-eligibility",
            get(eligibility_handler::<R, D>),
        )
        .route(
            "/api/v1/physicians/:physician_id/capacity",
            get(capacity_handler::<R, D>).post(capacity_update_handler::<R, D>),
        )
        .with_state(service)
}

pub(crate) async fn eligibility_handler<R, D>(
    State(service): State<Arc<CollaborationService<R, D>>>,
    headers: HeaderMap,
    Path(license_id): Path<String>,
) -> Response
where
    R: RegulatoryRepository + 'static,
    D: PhysicianDirectory + 'static,
{
    let caller = caller_from(&headers);
    match service.calculate_fpa_eligibility(caller.as_ref(), &license_id) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn capacity_handler<R, D>(
    State(service): State<Arc<CollaborationService<R, D>>>,
    headers: HeaderMap,
    Path(physician_id): Path<String>,
    Query(query): Query<CapacityQuery>,
) -> Response
where
    R: RegulatoryRepository + 'static,
    D: PhysicianDirectory + 'static,
{
    let caller = caller_from(&headers);
    let state_code = query.state_code.unwrap_or_default();
    match service.check_physician_capacity(caller.as_ref(), &physician_id, &state_code) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn capacity_update_handler<R, D>(
    State(service): State<Arc<CollaborationService<R, D>>>,
    headers: HeaderMap,
    Path(physician_id): Path<String>,
    axum::Json(request): axum::Json<CapacityUpdateRequest>,
) -> Response
where
    R: RegulatoryRepository + 'static,
    D: PhysicianDirectory + 'static,
{
    let caller = caller_from(&headers);
    match service.update_physician_capacity(caller.as_ref(), &physician_id, request.increment) {
        Ok(adjustment) => {
            let payload = json!({
                "physician_id": adjustment.physician_id,
                "new_count": adjustment.new_count,
                "available_spots": adjustment.available_spots,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn caller_from(headers: &HeaderMap) -> Option<CallerIdentity> {
    headers
        .get(CALLER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| CallerIdentity(value.to_string()))
}

pub(crate) fn status_for(err: &CollaborationServiceError) -> StatusCode {
    match err {
        CollaborationServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        CollaborationServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
        CollaborationServiceError::NotFound { .. }
        | CollaborationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CollaborationServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: CollaborationServiceError) -> Response {
    let status = status_for(&err);
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
