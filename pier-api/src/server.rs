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

//! Axum router setup.
//!
//! All routes live under the `/api` base path and sit behind the auth
//! gate; the only shared state is the immutable [`AppState`].

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, put};
use axum::Router;
use pier_core::BucketStore;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::auth::AuthConfig;
use crate::middleware::{auth_middleware, logging_middleware};

/// Default maximum upload size (5GB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 5 * 1024 * 1024 * 1024;

/// Shared application state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Proxy operations over the configured bucket.
    pub store: Arc<BucketStore>,
    /// Credentials checked by the auth gate.
    pub auth: AuthConfig,
    /// Maximum accepted upload size in bytes.
    pub max_upload_size: usize,
}

impl AppState {
    /// Creates application state with the default upload limit.
    pub fn new(store: Arc<BucketStore>, auth: AuthConfig) -> Self {
        Self::with_max_upload_size(store, auth, DEFAULT_MAX_UPLOAD_SIZE)
    }

    /// Creates application state with a custom upload limit.
    pub fn with_max_upload_size(
        store: Arc<BucketStore>,
        auth: AuthConfig,
        max_upload_size: usize,
    ) -> Self {
        Self { store, auth, max_upload_size }
    }
}

/// Creates the gateway router.
///
/// The auth gate wraps every route; unauthenticated requests are rejected
/// before any handler or backend call runs.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/list", get(handlers::list_files))
        .route("/api/upload", put(handlers::upload_file))
        .route("/api/delete", delete(handlers::delete_file))
        .route("/api/file/*key", get(handlers::stream_file))
        .layer(DefaultBodyLimit::max(state.max_upload_size))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
