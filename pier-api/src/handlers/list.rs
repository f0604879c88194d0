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

//! Folder listing handler.

use axum::extract::{Query, State};
use axum::Json;
use pier_core::FileEntry;
use serde::Deserialize;
use tracing::debug;

use crate::errors::ApiError;
use crate::server::AppState;

/// Query parameters for the listing endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    /// Folder prefix to list; the bucket root when absent.
    pub prefix: Option<String>,
}

/// Lists one folder level of the bucket.
///
/// API: GET /api/list?prefix={prefix}
///
/// # Returns
///
/// - 200 OK with a JSON array of entries, folders first
/// - 500 if the backend listing call fails
pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<FileEntry>>, ApiError> {
    let prefix = query.prefix.unwrap_or_default();
    debug!("ListFiles: prefix={:?}", prefix);

    let entries = state.store.list(&prefix).await?;
    Ok(Json(entries))
}
