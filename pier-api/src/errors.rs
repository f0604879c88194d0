// Copyright 2026 Pier Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! API error responses.
//!
//! Maps store failures to the gateway's JSON response contract:
//! missing inputs are caller errors (400), a failed fetch is 404, and
//! every backend failure is 500. Upload failures carry the raw backend
//! error text; other failures return a bare `{"success":false}` marker.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pier_core::StoreError;
use serde::Serialize;
use tracing::error;

/// A failed gateway operation, convertible to an HTTP response.
#[derive(Debug)]
pub struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// HTTP status for this failure.
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            StoreError::MissingInput(_) => StatusCode::BAD_REQUEST,
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::BackendUnavailable
            | StoreError::WriteFailed(_)
            | StoreError::DeleteFailed
            | StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON failure body.
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let error = match self.0 {
            StoreError::MissingInput(what) => Some(format!("missing {}", what)),
            StoreError::WriteFailed(detail) => Some(detail),
            _ => None,
        };

        (status, Json(ErrorBody { success: false, error })).into_response()
    }
}
