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

//! Signed backend store client.
//!
//! The [`ObjectStore`] trait is the single seam between the gateway and the
//! backend: (method, URL, headers, body) in, (status, headers, body stream)
//! out. Tests substitute a scripted implementation; production uses
//! [`S3Client`], which signs every request with AWS Signature Version 4.
//!
//! Based on: <https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html>

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use hmac::{Hmac, Mac};
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::StoreError;
use crate::types::StoreConfig;

type HmacSha256 = Hmac<Sha256>;

/// SHA-256 of an empty payload, pre-computed.
const EMPTY_PAYLOAD_HASH: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Payload hash marker for bodies signed without buffering.
const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// A streaming response or request body.
pub type ByteStream = BoxStream<'static, Result<Bytes, StoreError>>;

/// Request body passed to the backend.
pub enum StoreBody {
    /// No body (GET, DELETE, listing).
    Empty,
    /// Fully-buffered body; its SHA-256 is signed.
    Full(Bytes),
    /// Streaming body of unknown content; signed as `UNSIGNED-PAYLOAD` so
    /// large uploads never have to be buffered.
    Streaming(ByteStream),
}

/// Response from the backend store.
pub struct StoreResponse {
    /// HTTP status returned by the backend.
    pub status: StatusCode,
    /// Raw backend response headers.
    pub headers: HeaderMap,
    /// Response body as a stream; never buffered by the client.
    pub body: ByteStream,
}

impl StoreResponse {
    /// Drains the body into a UTF-8 string.
    ///
    /// Used for listing responses and backend error bodies, which are
    /// small; object payloads are relayed as streams instead.
    pub async fn into_text(self) -> Result<String, StoreError> {
        let mut body = self.body;
        let mut buf = Vec::new();
        while let Some(chunk) = body.try_next().await? {
            buf.extend_from_slice(&chunk);
        }
        String::from_utf8(buf).map_err(|e| StoreError::Backend(e.to_string()))
    }
}

/// Capability to execute a request against the backend object store.
///
/// Credential signing is applied transparently by the implementation;
/// callers only describe the request.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Executes one request and returns the backend's response.
    ///
    /// Header names must be lowercase; `x-amz-*` entries participate in
    /// the signature.
    async fn send(
        &self,
        method: Method,
        url: &str,
        headers: &[(String, String)],
        body: StoreBody,
    ) -> Result<StoreResponse, StoreError>;
}

/// AWS Signature V4 client over reqwest.
///
/// Works against AWS S3 and S3-compatible stores (MinIO, R2, B2, Spaces).
pub struct S3Client {
    http: reqwest::Client,
    config: StoreConfig,
}

impl S3Client {
    /// Creates a new client for the configured backend.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        // Connect timeout only: downloads may legitimately stream for a
        // long time, so there is no overall request deadline.
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Signs a request and returns the `Authorization` header value.
    ///
    /// `headers` receives the derived `host`, `x-amz-date`, and
    /// `x-amz-content-sha256` entries; every entry in the map becomes a
    /// signed header. Names must already be lowercase - the BTreeMap keeps
    /// them in the sorted order the canonical request requires.
    fn sign(
        &self,
        method: &str,
        url: &str,
        headers: &mut BTreeMap<String, String>,
        payload_hash: &str,
    ) -> Result<String, StoreError> {
        let now: DateTime<Utc> = Utc::now();
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        headers.insert("x-amz-date".to_string(), amz_date.clone());
        headers.insert("x-amz-content-sha256".to_string(), payload_hash.to_string());

        let parsed = url::Url::parse(url).map_err(|e| StoreError::Backend(e.to_string()))?;
        // The host header must carry a non-default port (e.g. MinIO on
        // localhost:9000) or the backend computes a different signature.
        let host = match parsed.port() {
            Some(port) => format!("{}:{}", parsed.host_str().unwrap_or_default(), port),
            None => parsed.host_str().unwrap_or_default().to_string(),
        };
        headers.insert("host".to_string(), host);

        let signed_headers = headers.keys().cloned().collect::<Vec<_>>().join(";");
        let canonical_headers: String =
            headers.iter().map(|(name, value)| format!("{}:{}\n", name, value.trim())).collect();

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method,
            parsed.path(),
            parsed.query().unwrap_or(""),
            canonical_headers,
            signed_headers,
            payload_hash
        );

        let credential_scope = format!("{}/{}/s3/aws4_request", date_stamp, self.config.region);
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            amz_date,
            credential_scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let k_date = hmac_sha256(
            format!("AWS4{}", self.config.secret_access_key).as_bytes(),
            date_stamp.as_bytes(),
        );
        let k_region = hmac_sha256(&k_date, self.config.region.as_bytes());
        let k_service = hmac_sha256(&k_region, b"s3");
        let k_signing = hmac_sha256(&k_service, b"aws4_request");
        let signature = hex::encode(hmac_sha256(&k_signing, string_to_sign.as_bytes()));

        Ok(format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            self.config.access_key_id, credential_scope, signed_headers, signature
        ))
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn send(
        &self,
        method: Method,
        url: &str,
        headers: &[(String, String)],
        body: StoreBody,
    ) -> Result<StoreResponse, StoreError> {
        let payload_hash = match &body {
            StoreBody::Empty => EMPTY_PAYLOAD_HASH.to_string(),
            StoreBody::Full(bytes) => hex::encode(Sha256::digest(bytes)),
            StoreBody::Streaming(_) => UNSIGNED_PAYLOAD.to_string(),
        };

        let mut signed = BTreeMap::new();
        for (name, value) in headers {
            if name.starts_with("x-amz-") {
                signed.insert(name.clone(), value.clone());
            }
        }
        let authorization = self.sign(method.as_str(), url, &mut signed, &payload_hash)?;

        let mut request =
            self.http.request(method, url).header("authorization", authorization);
        for (name, value) in &signed {
            request = request.header(name.as_str(), value.as_str());
        }
        for (name, value) in headers {
            if !name.starts_with("x-amz-") {
                request = request.header(name.as_str(), value.as_str());
            }
        }
        request = match body {
            StoreBody::Empty => request,
            StoreBody::Full(bytes) => request.body(bytes),
            StoreBody::Streaming(stream) => request.body(reqwest::Body::wrap_stream(stream)),
        };

        let response =
            request.send().await.map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(StoreResponse {
            status: response.status(),
            headers: response.headers().clone(),
            body: response
                .bytes_stream()
                .map_err(|e| StoreError::Backend(e.to_string()))
                .boxed(),
        })
    }
}

/// One round of the SigV4 key-derivation HMAC chain.
fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
