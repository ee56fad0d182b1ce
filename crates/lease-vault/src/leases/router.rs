use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{LeaseCreationData, LeaseError};
use super::service::LeaseDocumentService;

#[derive(Debug, Deserialize, Serialize)]
pub struct CopyDraftRequest {
    pub template_name: String,
    pub working_name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateLeaseRequest {
    pub working_draft_name: String,
    pub lease_data: LeaseCreationData,
}

/// Router builder exposing the lease document lifecycle over HTTP.
pub fn lease_router(service: Arc<LeaseDocumentService>) -> Router {
    Router::new()
        .route("/api/v1/leases", post(create_lease_handler))
        .route("/api/v1/leases/templates", get(list_templates_handler))
        .route("/api/v1/leases/drafts", post(copy_draft_handler))
        .route("/api/v1/leases/years", get(list_years_handler))
        .route("/api/v1/leases/years/:year", get(list_files_handler))
        .with_state(service)
}

pub(crate) async fn list_templates_handler(
    State(service): State<Arc<LeaseDocumentService>>,
) -> Response {
    match service.list_templates() {
        Ok(templates) => (StatusCode::OK, axum::Json(templates)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn copy_draft_handler(
    State(service): State<Arc<LeaseDocumentService>>,
    axum::Json(request): axum::Json<CopyDraftRequest>,
) -> Response {
    match service.copy_template_to_working(&request.template_name, &request.working_name) {
        Ok(path) => {
            let payload = json!({
                "template_name": request.template_name,
                "working_name": request.working_name,
                "path": path,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_lease_handler(
    State(service): State<Arc<LeaseDocumentService>>,
    axum::Json(request): axum::Json<CreateLeaseRequest>,
) -> Response {
    match service.create_completed_lease(&request.working_draft_name, &request.lease_data) {
        Ok(lease) => (StatusCode::CREATED, axum::Json(lease.info())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_years_handler(
    State(service): State<Arc<LeaseDocumentService>>,
) -> Response {
    match service.list_years() {
        Ok(years) => (StatusCode::OK, axum::Json(years)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_files_handler(
    State(service): State<Arc<LeaseDocumentService>>,
    Path(year): Path<i32>,
) -> Response {
    match service.list_files(year) {
        Ok(files) => (StatusCode::OK, axum::Json(files)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn status_for(error: &LeaseError) -> StatusCode {
    match error {
        LeaseError::TemplateNotFound { .. } | LeaseError::WorkingTemplateNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        LeaseError::InvalidTemplate { .. } | LeaseError::InvalidDocumentName { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LeaseError::FileCreationFailed { .. }
        | LeaseError::FileAccess { .. }
        | LeaseError::DirectoryCreationFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: LeaseError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (status_for(&error), axum::Json(payload)).into_response()
}
