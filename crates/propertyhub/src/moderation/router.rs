use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::actions::ModerationAction;
use super::domain::{ListingId, ListingPatch};
use super::repository::{ListingRepository, Notifier, RepositoryError};
use super::service::{ListingQuery, ModerationError, ModerationService};
use super::status::PropertyStatus;
use crate::listings::envelope::invalid_request;
use crate::listings::{ApiResponse, Filters, ALL};

/// Router builder exposing the admin moderation endpoints.
pub fn moderation_router<R, N>(service: Arc<ModerationService<R, N>>) -> Router
where
    R: ListingRepository + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/api/v1/admin/properties", get(list_handler::<R, N>))
        .route(
            "/api/v1/admin/properties/:listing_id",
            axum::routing::patch(edit_handler::<R, N>).delete(delete_handler::<R, N>),
        )
        .route(
            "/api/v1/admin/properties/:listing_id/actions",
            get(actions_handler::<R, N>),
        )
        .route(
            "/api/v1/admin/properties/:listing_id/actions/:action",
            post(action_handler::<R, N>),
        )
        .route(
            "/api/v1/admin/properties/:listing_id/status",
            post(status_handler::<R, N>),
        )
        .route("/api/v1/admin/stats", get(stats_handler::<R, N>))
        .route("/api/v1/filters/options", get(filter_options_handler::<R, N>))
        .with_state(service)
}

/// Query string of the admin listing table.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub purpose: Option<String>,
    pub agent: Option<String>,
    pub date_range: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl From<ListingParams> for ListingQuery {
    fn from(params: ListingParams) -> Self {
        let or_all = |value: Option<String>| value.unwrap_or_else(|| ALL.to_string());
        ListingQuery {
            filters: Filters {
                status: or_all(params.status),
                property_type: or_all(params.property_type),
                purpose: or_all(params.purpose),
                agent: or_all(params.agent),
                date_range: or_all(params.date_range),
            },
            page: params.page.unwrap_or(1),
            page_size: params.page_size,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: String,
}

fn failure_response(error: ModerationError) -> Response {
    let status = match &error {
        ModerationError::NotFound(_) | ModerationError::Repository(RepositoryError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        ModerationError::IllegalTransition { .. }
        | ModerationError::Repository(RepositoryError::Conflict { .. }) => StatusCode::CONFLICT,
        ModerationError::EmptyPatch | ModerationError::Filter(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ModerationError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let body = ApiResponse::<()>::failure(error.to_string(), error.code());
    (status, Json(body)).into_response()
}

fn invalid_input(message: String, code: &str) -> Response {
    let body = ApiResponse::<()>::failure(message, code);
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

pub(crate) async fn list_handler<R, N>(
    State(service): State<Arc<ModerationService<R, N>>>,
    params: Result<Query<ListingParams>, QueryRejection>,
) -> Response
where
    R: ListingRepository + 'static,
    N: Notifier + 'static,
{
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return invalid_request(rejection.status(), rejection.body_text()),
    };
    match service.list(params.into()) {
        Ok(page) => {
            let body = ApiResponse::paged(page.items, page.pagination);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn actions_handler<R, N>(
    State(service): State<Arc<ModerationService<R, N>>>,
    listing_id: Result<Path<String>, PathRejection>,
) -> Response
where
    R: ListingRepository + 'static,
    N: Notifier + 'static,
{
    let Path(listing_id) = match listing_id {
        Ok(listing_id) => listing_id,
        Err(rejection) => return invalid_request(rejection.status(), rejection.body_text()),
    };
    match service.quick_actions(&ListingId(listing_id)) {
        Ok(panel) => (StatusCode::OK, Json(ApiResponse::ok(panel))).into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn action_handler<R, N>(
    State(service): State<Arc<ModerationService<R, N>>>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Response
where
    R: ListingRepository + 'static,
    N: Notifier + 'static,
{
    let Path((listing_id, action)) = match path {
        Ok(path) => path,
        Err(rejection) => return invalid_request(rejection.status(), rejection.body_text()),
    };
    let action = match action.parse::<ModerationAction>() {
        Ok(action) => action,
        Err(err) => return invalid_input(err.to_string(), "invalid_action"),
    };

    match service.apply(&ListingId(listing_id), action) {
        Ok(listing) => (StatusCode::OK, Json(ApiResponse::ok(listing))).into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<ModerationService<R, N>>>,
    listing_id: Result<Path<String>, PathRejection>,
    request: Result<Json<StatusChangeRequest>, JsonRejection>,
) -> Response
where
    R: ListingRepository + 'static,
    N: Notifier + 'static,
{
    let Path(listing_id) = match listing_id {
        Ok(listing_id) => listing_id,
        Err(rejection) => return invalid_request(rejection.status(), rejection.body_text()),
    };
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => return invalid_request(rejection.status(), rejection.body_text()),
    };
    let next = match request.status.parse::<PropertyStatus>() {
        Ok(status) => status,
        Err(err) => return invalid_input(err.to_string(), "invalid_status"),
    };

    match service.change_status(&ListingId(listing_id), next) {
        Ok(listing) => (StatusCode::OK, Json(ApiResponse::ok(listing))).into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn edit_handler<R, N>(
    State(service): State<Arc<ModerationService<R, N>>>,
    listing_id: Result<Path<String>, PathRejection>,
    patch: Result<Json<ListingPatch>, JsonRejection>,
) -> Response
where
    R: ListingRepository + 'static,
    N: Notifier + 'static,
{
    let Path(listing_id) = match listing_id {
        Ok(listing_id) => listing_id,
        Err(rejection) => return invalid_request(rejection.status(), rejection.body_text()),
    };
    let Json(patch) = match patch {
        Ok(patch) => patch,
        Err(rejection) => return invalid_request(rejection.status(), rejection.body_text()),
    };
    match service.edit(&ListingId(listing_id), patch) {
        Ok(listing) => (StatusCode::OK, Json(ApiResponse::ok(listing))).into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn delete_handler<R, N>(
    State(service): State<Arc<ModerationService<R, N>>>,
    listing_id: Result<Path<String>, PathRejection>,
) -> Response
where
    R: ListingRepository + 'static,
    N: Notifier + 'static,
{
    let Path(listing_id) = match listing_id {
        Ok(listing_id) => listing_id,
        Err(rejection) => return invalid_request(rejection.status(), rejection.body_text()),
    };
    let id = ListingId(listing_id);
    match service.delete(&id) {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::ok(id))).into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn stats_handler<R, N>(
    State(service): State<Arc<ModerationService<R, N>>>,
) -> Response
where
    R: ListingRepository + 'static,
    N: Notifier + 'static,
{
    match service.stats() {
        Ok(stats) => {
            let body = ApiResponse::ok(serde_json::json!({
                "stats": stats,
                "cards": stats.cards(),
            }));
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn filter_options_handler<R, N>(
    State(service): State<Arc<ModerationService<R, N>>>,
) -> Response
where
    R: ListingRepository + 'static,
    N: Notifier + 'static,
{
    let body = ApiResponse::ok(service.catalog().clone());
    (StatusCode::OK, Json(body)).into_response()
}
