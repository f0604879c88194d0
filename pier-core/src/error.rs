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

//! Error types for the backend store and proxy operations.

use thiserror::Error;

/// Errors that can occur while proxying to the backend store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A required request input was absent.
    #[error("missing required input: {0}")]
    MissingInput(&'static str),

    /// The backend returned a non-success status for a listing call.
    #[error("backend listing unavailable")]
    BackendUnavailable,

    /// The backend rejected or failed an upload.
    ///
    /// Carries the raw backend error body so callers can diagnose
    /// misconfigured buckets or ACL policies.
    #[error("upload failed: {0}")]
    WriteFailed(String),

    /// The backend rejected or failed a delete.
    #[error("delete failed")]
    DeleteFailed,

    /// The backend could not serve the object.
    ///
    /// Produced for any non-success fetch response; the gateway does not
    /// distinguish the backend's 403/404/416 nuances.
    #[error("object not found: {key}")]
    NotFound {
        /// Object key that could not be fetched.
        key: String,
    },

    /// Transport-level failure talking to the backend.
    #[error("backend request failed: {0}")]
    Backend(String),
}
