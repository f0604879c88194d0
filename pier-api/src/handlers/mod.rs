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

//! HTTP request handlers for the gateway API.
//!
//! This module provides handlers for:
//! - Folder listing (`GET /api/list`)
//! - Upload (`PUT /api/upload`)
//! - Delete (`DELETE /api/delete`)
//! - Streaming download (`GET /api/file/{key}`)

pub mod list;
pub mod object;

pub use list::{list_files, ListQuery};
pub use object::{delete_file, stream_file, upload_file, Ack, DeleteQuery};
