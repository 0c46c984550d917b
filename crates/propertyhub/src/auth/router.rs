use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::confirmation::{ConfirmationFailure, ConfirmationFailurePage};
use super::login::{AuthSessionFactory, Credentials, LoginFlow, LoginOutcome, Toast, ToastLog};
use crate::listings::envelope::invalid_request;
use crate::listings::ApiResponse;

/// Router builder exposing login and email confirmation endpoints.
pub fn auth_router<F>(sessions: Arc<F>) -> Router
where
    F: AuthSessionFactory + 'static,
{
    Router::new()
        .route("/api/v1/auth/login", post(login_handler::<F>))
        .route("/api/v1/admin/login", post(admin_login_handler::<F>))
        .route("/auth/confirm/failed", get(confirmation_failed_handler))
        .with_state(sessions)
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub outcome: LoginOutcome,
    pub toasts: Vec<Toast>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmationFailedParams {
    pub error: Option<String>,
}

fn login_response(outcome: LoginOutcome, toasts: &ToastLog) -> Response {
    let (status, error, code) = match &outcome {
        LoginOutcome::SignedIn { .. } => (StatusCode::OK, None, None),
        LoginOutcome::Failed(classification) => (
            StatusCode::UNAUTHORIZED,
            Some(classification.notice.message.clone()),
            Some(classification.kind.code().to_string()),
        ),
    };

    let body = ApiResponse {
        success: outcome.is_signed_in(),
        data: Some(LoginResponse {
            outcome,
            toasts: toasts.toasts(),
        }),
        error,
        code,
        pagination: None,
    };
    (status, Json(body)).into_response()
}

pub(crate) async fn login_handler<F>(
    State(sessions): State<Arc<F>>,
    credentials: Result<Json<Credentials>, JsonRejection>,
) -> Response
where
    F: AuthSessionFactory + 'static,
{
    let Json(credentials) = match credentials {
        Ok(credentials) => credentials,
        Err(rejection) => return invalid_request(rejection.status(), rejection.body_text()),
    };
    let toasts = ToastLog::default();
    let flow = LoginFlow::new(sessions.session(), toasts.clone());
    let outcome = flow.login(&credentials).await;
    login_response(outcome, &toasts)
}

pub(crate) async fn admin_login_handler<F>(
    State(sessions): State<Arc<F>>,
    credentials: Result<Json<Credentials>, JsonRejection>,
) -> Response
where
    F: AuthSessionFactory + 'static,
{
    let Json(credentials) = match credentials {
        Ok(credentials) => credentials,
        Err(rejection) => return invalid_request(rejection.status(), rejection.body_text()),
    };
    let toasts = ToastLog::default();
    let flow = LoginFlow::new(sessions.session(), toasts.clone());
    let outcome = flow.admin_login(&credentials).await;
    login_response(outcome, &toasts)
}

pub(crate) async fn confirmation_failed_handler(
    params: Result<Query<ConfirmationFailedParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return invalid_request(rejection.status(), rejection.body_text()),
    };
    let failure = ConfirmationFailure::from_query(params.error.as_deref());
    Json(ApiResponse::ok(ConfirmationFailurePage::from(failure))).into_response()
}
