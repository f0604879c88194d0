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

//! Pier Core - backend store access and response transcoding.
//!
//! This crate provides the domain layer of the Pier gateway:
//! - Object key normalization and URL-safe encoding
//! - Content-type resolution from file extensions
//! - ListObjectsV2 XML transcoding into folder/file entries
//! - A signed backend client (`ObjectStore` trait + AWS SigV4 implementation)
//! - The proxy operations (list, upload, delete, fetch)

pub mod client;
pub mod error;
pub mod keys;
pub mod listing;
pub mod mime;
pub mod store;
pub mod types;

pub use client::{ByteStream, ObjectStore, S3Client, StoreBody, StoreResponse};
pub use error::StoreError;
pub use store::BucketStore;
pub use types::{FileEntry, StoreConfig};
