//! Packaging configuration endpoints.

use axum::{
    Json,
    extract::{Path as AxumPath, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::AppState;
use crate::Error;
use crate::envelope::Envelope;
use crate::models::PackagingParams;

/// Query parameters accepted by the save endpoint
#[derive(Debug, Default, Deserialize)]
pub struct SaveQuery {
    /// Reserved for future use; accepted and ignored
    pub others: Option<String>,
}

/// An error rendered as a failure envelope.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_)
            | Error::InvalidArgument(_)
            | Error::Coercion { .. }
            | Error::NotAList(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::warn!(error = %self.0, "Request rejected");
        }

        (status, Json(Envelope::fail_from_error(&self.0))).into_response()
    }
}

/// Save the packaging params of a project
///
/// `POST /packaging/save/:project` with the params as the JSON body. A body
/// that is not a JSON object is answered with a 400 failure envelope.
pub(super) async fn save_project(
    State(state): State<AppState>,
    AxumPath(project): AxumPath<String>,
    Query(query): Query<SaveQuery>,
    body: Result<Json<PackagingParams>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let Json(packaging_params) = body.map_err(|rejection| {
        Error::InvalidInput(format!("packaging params: {}", rejection.body_text()))
    })?;
    if let Some(others) = &query.others {
        tracing::debug!(project = %project, others = %others, "Ignoring 'others' parameter");
    }

    let mut repository = state.repository.lock().await;
    repository.save_project_packaging_params(&project, packaging_params)?;

    Ok(Json(Envelope::success()))
}

/// Get the packaging params of a project
///
/// `GET /packaging/:project`, answered with the params under
/// `data.packagingParams`.
pub(super) async fn get_project(
    State(state): State<AppState>,
    AxumPath(project): AxumPath<String>,
) -> Result<Json<Envelope>, ApiError> {
    let repository = state.repository.lock().await;
    let packaging_params = repository
        .packaging_params(&project)
        .ok_or_else(|| Error::NotFound(format!("project '{}'", project)))?;

    let envelope = Envelope::success().set_value("packagingParams", packaging_params)?;
    Ok(Json(envelope))
}
