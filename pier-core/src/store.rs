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

//! Proxy operations against the backend bucket.
//!
//! Implements the four gateway operations:
//! - ListObjects (one ListObjectsV2 call, transcoded to folder/file entries)
//! - Upload (streaming PUT, content type forced from the filename)
//! - Delete (pass-through DELETE)
//! - Fetch (streaming GET with optional byte range)
//!
//! Every operation issues exactly one backend request and maps the result;
//! there are no retries and no pagination follow-ups.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::client::{ObjectStore, StoreBody, StoreResponse};
use crate::error::StoreError;
use crate::types::{FileEntry, StoreConfig};
use crate::{keys, listing, mime};

/// Proxy operations over a single configured bucket.
///
/// Holds the immutable store configuration and the signed backend client;
/// cheap to clone via `Arc` and safe to share across requests.
pub struct BucketStore {
    store: Arc<dyn ObjectStore>,
    config: StoreConfig,
}

impl BucketStore {
    /// Creates the proxy operations over a backend client.
    pub fn new(store: Arc<dyn ObjectStore>, config: StoreConfig) -> Self {
        Self { store, config }
    }

    /// URL of a single object: `endpoint/bucket/encoded-key`.
    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.bucket,
            keys::encode(key)
        )
    }

    /// Lists one level of the bucket under `prefix`.
    ///
    /// Issues a single ListObjectsV2 call with delimiter `/` so nested
    /// subfolders come back grouped as common prefixes instead of
    /// flattened.
    pub async fn list(&self, prefix: &str) -> Result<Vec<FileEntry>, StoreError> {
        let prefix = keys::normalize(prefix);
        debug!("ListObjects: prefix={:?}", prefix);

        // Query keys in canonical (sorted) order; the signature covers the
        // query string exactly as sent.
        let mut query = format!("delimiter={}&list-type=2", keys::encode_component("/"));
        if !prefix.is_empty() {
            query.push_str("&prefix=");
            query.push_str(&keys::encode_component(prefix));
        }
        let url = format!(
            "{}/{}?{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.bucket,
            query
        );

        let response = self.store.send(Method::GET, &url, &[], StoreBody::Empty).await?;
        if !response.status.is_success() {
            error!("ListObjects failed: status={}", response.status);
            return Err(StoreError::BackendUnavailable);
        }

        let xml = response.into_text().await?;
        let entries = listing::transcode(&xml, prefix, self.config.public_domain.as_deref());
        info!("ListObjects: prefix={:?}, entries={}", prefix, entries.len());
        Ok(entries)
    }

    /// Uploads an object, streaming the body through unbuffered.
    ///
    /// The stored content type is resolved from the key's extension and
    /// overrides anything the uploading client declared. The object is
    /// marked publicly readable so a configured public domain can serve it
    /// directly.
    pub async fn upload(
        &self,
        key: &str,
        content_length: Option<u64>,
        body: crate::client::ByteStream,
    ) -> Result<(), StoreError> {
        let key = keys::normalize(key);
        if key.is_empty() {
            return Err(StoreError::MissingInput("file name"));
        }

        let content_type = mime::resolve(key);
        info!("Upload: key={}, content_type={}, length={:?}", key, content_type, content_length);

        let mut headers = vec![
            ("content-type".to_string(), content_type.to_string()),
            ("x-amz-acl".to_string(), "public-read".to_string()),
        ];
        if let Some(length) = content_length {
            headers.push(("content-length".to_string(), length.to_string()));
        }

        let url = self.object_url(key);
        let response =
            self.store.send(Method::PUT, &url, &headers, StoreBody::Streaming(body)).await?;
        if !response.status.is_success() {
            let status = response.status;
            let detail = response.into_text().await.unwrap_or_default();
            error!("Upload failed: key={}, status={}, body={}", key, status, detail);
            return Err(StoreError::WriteFailed(detail));
        }

        info!("Upload complete: key={}", key);
        Ok(())
    }

    /// Deletes an object.
    ///
    /// Backend semantics pass through: deleting a nonexistent key succeeds
    /// if the backend reports success for such deletes. There is no
    /// gateway-level existence check.
    pub async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let key = keys::normalize(key);
        if key.is_empty() {
            return Err(StoreError::MissingInput("key"));
        }

        info!("Delete: key={}", key);
        let url = self.object_url(key);
        let response = self.store.send(Method::DELETE, &url, &[], StoreBody::Empty).await?;
        if !response.status.is_success() {
            error!("Delete failed: key={}, status={}", key, response.status);
            return Err(StoreError::DeleteFailed);
        }
        Ok(())
    }

    /// Fetches an object for streaming, forwarding an optional byte range.
    ///
    /// The backend status is preserved (206 propagates for range requests)
    /// and the response headers are relayed filtered: backend tracing
    /// headers are stripped, the content type is forced from the key's
    /// extension, and inline rendering plus open cross-origin access are
    /// enabled.
    pub async fn fetch(
        &self,
        key: &str,
        range: Option<&str>,
    ) -> Result<StoreResponse, StoreError> {
        let key = keys::normalize(key);
        debug!("Fetch: key={}, range={:?}", key, range);

        let mut headers = Vec::new();
        if let Some(range) = range {
            headers.push(("range".to_string(), range.to_string()));
        }

        let url = self.object_url(key);
        let response = self.store.send(Method::GET, &url, &headers, StoreBody::Empty).await?;
        if !response.status.is_success() {
            error!("Fetch failed: key={}, status={}", key, response.status);
            return Err(StoreError::NotFound { key: key.to_string() });
        }

        Ok(relay_response(key, response))
    }
}

/// Builds the gateway's streaming response from the backend's.
fn relay_response(key: &str, upstream: StoreResponse) -> StoreResponse {
    let mut headers = HeaderMap::new();
    for (name, value) in upstream.headers.iter() {
        if relay_header(name.as_str()) {
            headers.insert(name.clone(), value.clone());
        }
    }

    headers.insert(
        reqwest::header::CONTENT_TYPE,
        HeaderValue::from_static(mime::resolve(key)),
    );
    headers.insert(
        reqwest::header::CONTENT_DISPOSITION,
        HeaderValue::from_static("inline"),
    );
    headers.insert(
        reqwest::header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );

    StoreResponse { status: upstream.status, headers, body: upstream.body }
}

/// Whether a backend response header is relayed to the caller.
///
/// Backend tracing headers (`x-amz-request-id` and friends) and hop-by-hop
/// headers stay behind; the content type is replaced, not relayed.
fn relay_header(name: &str) -> bool {
    !(name.starts_with("x-amz-")
        || name == "content-type"
        || name == "transfer-encoding"
        || name == "connection")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ByteStream;
    use async_trait::async_trait;
    use bytes::Bytes;
    use futures::StreamExt;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    /// One request observed by the scripted store.
    struct SentRequest {
        method: Method,
        url: String,
        headers: Vec<(String, String)>,
        streamed_body: bool,
    }

    /// Scripted `ObjectStore` returning a fixed response.
    struct ScriptedStore {
        status: StatusCode,
        headers: Vec<(&'static str, &'static str)>,
        body: String,
        sent: Mutex<Vec<SentRequest>>,
    }

    impl ScriptedStore {
        fn new(status: StatusCode, body: &str) -> Self {
            Self { status, headers: Vec::new(), body: body.to_string(), sent: Mutex::new(Vec::new()) }
        }

        fn with_headers(mut self, headers: Vec<(&'static str, &'static str)>) -> Self {
            self.headers = headers;
            self
        }

        fn requests(&self) -> usize {
            self.sent.lock().unwrap().len()
        }

        fn request(&self, index: usize) -> (Method, String, Vec<(String, String)>) {
            let sent = self.sent.lock().unwrap();
            (sent[index].method.clone(), sent[index].url.clone(), sent[index].headers.clone())
        }
    }

    #[async_trait]
    impl ObjectStore for ScriptedStore {
        async fn send(
            &self,
            method: Method,
            url: &str,
            headers: &[(String, String)],
            body: StoreBody,
        ) -> Result<StoreResponse, StoreError> {
            self.sent.lock().unwrap().push(SentRequest {
                method,
                url: url.to_string(),
                headers: headers.to_vec(),
                streamed_body: matches!(body, StoreBody::Streaming(_)),
            });

            let mut header_map = HeaderMap::new();
            for (name, value) in &self.headers {
                header_map.insert(*name, HeaderValue::from_static(value));
            }
            let chunk: Result<Bytes, StoreError> = Ok(Bytes::from(self.body.clone()));
            Ok(StoreResponse {
                status: self.status,
                headers: header_map,
                body: futures::stream::iter(vec![chunk]).boxed(),
            })
        }
    }

    fn test_config() -> StoreConfig {
        StoreConfig {
            endpoint: "http://localhost:9000".to_string(),
            bucket: "media".to_string(),
            region: "us-east-1".to_string(),
            access_key_id: "test-key".to_string(),
            secret_access_key: "test-secret".to_string(),
            public_domain: None,
        }
    }

    fn store_over(scripted: Arc<ScriptedStore>) -> BucketStore {
        BucketStore::new(scripted, test_config())
    }

    fn empty_body() -> ByteStream {
        futures::stream::empty().boxed()
    }

    #[tokio::test]
    async fn test_upload_without_key_makes_no_backend_call() {
        let scripted = Arc::new(ScriptedStore::new(StatusCode::OK, ""));
        let store = store_over(scripted.clone());

        let result = store.upload("", None, empty_body()).await;
        assert!(matches!(result, Err(StoreError::MissingInput(_))));
        assert_eq!(scripted.requests(), 0);

        // A bare "/" normalizes to empty as well.
        let result = store.upload("/", None, empty_body()).await;
        assert!(matches!(result, Err(StoreError::MissingInput(_))));
        assert_eq!(scripted.requests(), 0);
    }

    #[tokio::test]
    async fn test_upload_forces_content_type_and_acl() {
        let scripted = Arc::new(ScriptedStore::new(StatusCode::OK, ""));
        let store = store_over(scripted.clone());

        store.upload("clips/intro.MP4", Some(9), empty_body()).await.unwrap();

        let (method, url, headers) = scripted.request(0);
        assert_eq!(method, Method::PUT);
        assert_eq!(url, "http://localhost:9000/media/clips/intro.MP4");
        assert!(headers.contains(&("content-type".to_string(), "video/mp4".to_string())));
        assert!(headers.contains(&("x-amz-acl".to_string(), "public-read".to_string())));
        assert!(headers.contains(&("content-length".to_string(), "9".to_string())));
        assert!(scripted.sent.lock().unwrap()[0].streamed_body);
    }

    #[tokio::test]
    async fn test_upload_failure_carries_backend_text() {
        let scripted = Arc::new(ScriptedStore::new(
            StatusCode::FORBIDDEN,
            "<Error><Code>AccessDenied</Code></Error>",
        ));
        let store = store_over(scripted);

        match store.upload("a.txt", None, empty_body()).await {
            Err(StoreError::WriteFailed(text)) => assert!(text.contains("AccessDenied")),
            other => panic!("expected WriteFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_without_key_makes_no_backend_call() {
        let scripted = Arc::new(ScriptedStore::new(StatusCode::NO_CONTENT, ""));
        let store = store_over(scripted.clone());

        assert!(matches!(store.delete("").await, Err(StoreError::MissingInput(_))));
        assert_eq!(scripted.requests(), 0);
    }

    #[tokio::test]
    async fn test_delete_passes_backend_success_through() {
        // S3 reports 204 for deletes of nonexistent keys too; the gateway
        // adds no existence check of its own.
        let scripted = Arc::new(ScriptedStore::new(StatusCode::NO_CONTENT, ""));
        let store = store_over(scripted.clone());

        store.delete("/gone/already.txt").await.unwrap();
        let (method, url, _) = scripted.request(0);
        assert_eq!(method, Method::DELETE);
        assert_eq!(url, "http://localhost:9000/media/gone/already.txt");
    }

    #[tokio::test]
    async fn test_delete_failure() {
        let scripted = Arc::new(ScriptedStore::new(StatusCode::INTERNAL_SERVER_ERROR, ""));
        let store = store_over(scripted);
        assert!(matches!(store.delete("x").await, Err(StoreError::DeleteFailed)));
    }

    #[tokio::test]
    async fn test_list_builds_canonical_query() {
        let scripted = Arc::new(ScriptedStore::new(StatusCode::OK, "<ListBucketResult></ListBucketResult>"));
        let store = store_over(scripted.clone());

        store.list("my docs/").await.unwrap();

        let (method, url, _) = scripted.request(0);
        assert_eq!(method, Method::GET);
        assert_eq!(
            url,
            "http://localhost:9000/media?delimiter=%2F&list-type=2&prefix=my%20docs%2F"
        );
    }

    #[tokio::test]
    async fn test_list_root_omits_prefix_param() {
        let scripted = Arc::new(ScriptedStore::new(StatusCode::OK, "<ListBucketResult></ListBucketResult>"));
        let store = store_over(scripted.clone());

        let entries = store.list("").await.unwrap();
        assert!(entries.is_empty());

        let (_, url, _) = scripted.request(0);
        assert_eq!(url, "http://localhost:9000/media?delimiter=%2F&list-type=2");
    }

    #[tokio::test]
    async fn test_list_backend_error() {
        let scripted = Arc::new(ScriptedStore::new(StatusCode::SERVICE_UNAVAILABLE, ""));
        let store = store_over(scripted);
        assert!(matches!(store.list("x/").await, Err(StoreError::BackendUnavailable)));
    }

    #[tokio::test]
    async fn test_list_transcodes_entries() {
        let xml = r#"<ListBucketResult>
  <Prefix>images/</Prefix>
  <CommonPrefixes><Prefix>images/raw/</Prefix></CommonPrefixes>
  <Contents><Key>images/</Key><Size>0</Size><LastModified>2024-01-01T00:00:00Z</LastModified></Contents>
  <Contents><Key>images/cat.png</Key><Size>1024</Size><LastModified>2024-01-01T00:00:00Z</LastModified></Contents>
</ListBucketResult>"#;
        let scripted = Arc::new(ScriptedStore::new(StatusCode::OK, xml));
        let store = store_over(scripted);

        let entries = store.list("images/").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_folder);
        assert_eq!(entries[1].key, "images/cat.png");
    }

    #[tokio::test]
    async fn test_fetch_not_found_on_any_backend_failure() {
        for status in [StatusCode::FORBIDDEN, StatusCode::NOT_FOUND, StatusCode::RANGE_NOT_SATISFIABLE] {
            let scripted = Arc::new(ScriptedStore::new(status, ""));
            let store = store_over(scripted);
            assert!(matches!(
                store.fetch("missing.bin", None).await,
                Err(StoreError::NotFound { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_fetch_forwards_range_and_preserves_partial_content() {
        let scripted = Arc::new(
            ScriptedStore::new(StatusCode::PARTIAL_CONTENT, "chunk")
                .with_headers(vec![
                    ("content-range", "bytes 0-4/100"),
                    ("content-length", "5"),
                    ("x-amz-request-id", "ABC123"),
                    ("x-amz-id-2", "opaque"),
                    ("content-type", "application/octet-stream"),
                ]),
        );
        let store = store_over(scripted.clone());

        let response = store.fetch("videos/clip.mp4", Some("bytes=0-4")).await.unwrap();

        let (_, _, sent_headers) = scripted.request(0);
        assert!(sent_headers.contains(&("range".to_string(), "bytes=0-4".to_string())));

        assert_eq!(response.status, StatusCode::PARTIAL_CONTENT);
        assert_eq!(
            response.headers.get("content-range").unwrap(),
            "bytes 0-4/100"
        );
        assert!(response.headers.get("x-amz-request-id").is_none());
        assert!(response.headers.get("x-amz-id-2").is_none());
        // Content type comes from the key, not the backend.
        assert_eq!(response.headers.get("content-type").unwrap(), "video/mp4");
        assert_eq!(response.headers.get("content-disposition").unwrap(), "inline");
        assert_eq!(response.headers.get("access-control-allow-origin").unwrap(), "*");
    }

    #[tokio::test]
    async fn test_fetch_relays_body() {
        let scripted = Arc::new(ScriptedStore::new(StatusCode::OK, "payload"));
        let store = store_over(scripted);

        let response = store.fetch("a.txt", None).await.unwrap();
        assert_eq!(response.into_text().await.unwrap(), "payload");
    }
}
