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

//! Object handlers: upload, delete, and streaming download.
//!
//! Upload and download bodies are relayed as streams end-to-end; the
//! gateway never buffers a whole object, so arbitrarily large media files
//! pass through in constant memory. A client disconnect drops the handler
//! future, which aborts the corresponding backend transfer.

use axum::body::Body;
use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderMap};
use axum::response::Response;
use axum::Json;
use futures::{StreamExt, TryStreamExt};
use pier_core::StoreError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ApiError;
use crate::server::AppState;

/// Success acknowledgement for upload and delete.
#[derive(Debug, Serialize)]
pub struct Ack {
    /// Always `true`; failures use the error body instead.
    pub success: bool,
}

/// Query parameters for the delete endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct DeleteQuery {
    /// Key of the object to delete.
    pub key: Option<String>,
}

/// Uploads an object.
///
/// API: PUT /api/upload
///
/// # Headers
///
/// - `x-file-name`: destination key, required
/// - `content-length`: forwarded to the backend when present
///
/// The stored content type is resolved from the key's extension; any type
/// the client declares is ignored.
///
/// # Returns
///
/// - 200 OK `{"success":true}`
/// - 400 if `x-file-name` is absent (no backend call is made)
/// - 500 with the raw backend error text if the write fails
pub async fn upload_file(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<Ack>, ApiError> {
    let file_name = request
        .headers()
        .get("x-file-name")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let content_length = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    info!("UploadFile: key={:?}, length={:?}", file_name, content_length);

    let body = request
        .into_body()
        .into_data_stream()
        .map_err(|e| StoreError::Backend(e.to_string()))
        .boxed();

    state.store.upload(&file_name, content_length, body).await?;
    Ok(Json(Ack { success: true }))
}

/// Deletes an object.
///
/// API: DELETE /api/delete?key={key}
///
/// # Returns
///
/// - 200 OK `{"success":true}`
/// - 400 if `key` is absent
/// - 500 if the backend delete fails
pub async fn delete_file(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<Ack>, ApiError> {
    let key = query.key.unwrap_or_default();
    info!("DeleteFile: key={:?}", key);

    state.store.delete(&key).await?;
    Ok(Json(Ack { success: true }))
}

/// Streams an object to the caller.
///
/// API: GET /api/file/{key}
///
/// The key may contain slashes. An optional `Range` header is forwarded
/// unchanged so media players can seek; the backend's 200/206 status and
/// `Content-Range` come back as-is.
///
/// # Returns
///
/// - backend status with the relayed body stream
/// - 404 on any backend failure
pub async fn stream_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let range = headers.get(header::RANGE).and_then(|value| value.to_str().ok());
    debug!("StreamFile: key={}, range={:?}", key, range);

    let relayed = state.store.fetch(&key, range).await?;

    let mut builder = Response::builder().status(relayed.status);
    for (name, value) in relayed.headers.iter() {
        builder = builder.header(name, value);
    }
    Ok(builder.body(Body::from_stream(relayed.body)).unwrap())
}
