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

//! Authentication middleware.
//!
//! A single shared username/password pair guards every route, checked via
//! HTTP Basic challenge-response. There is no per-resource or per-method
//! distinction; a request either carries the credentials or is rejected
//! before any backend call is made.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::warn;

use crate::server::AppState;

/// Shared credential pair for the auth gate.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Expected username.
    pub username: String,
    /// Expected password.
    pub password: String,
}

/// Authentication middleware verifying HTTP Basic credentials.
///
/// Rejections return 401 with a `WWW-Authenticate` challenge so browsers
/// prompt for credentials.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if verify_basic_auth(request.headers(), &state.auth) {
        return next.run(request).await;
    }

    warn!("Authentication failed: {} {}", request.method(), request.uri().path());
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header(header::WWW_AUTHENTICATE, "Basic realm=\"pier\"")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"success":false,"error":"unauthorized"}"#))
        .unwrap()
}

/// Checks an `Authorization: Basic` header against the configured pair.
fn verify_basic_auth(headers: &HeaderMap, auth: &AuthConfig) -> bool {
    let encoded = match headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Basic "))
    {
        Some(encoded) => encoded,
        None => return false,
    };

    let decoded = match STANDARD.decode(encoded.trim()) {
        Ok(decoded) => decoded,
        Err(_) => return false,
    };
    let decoded = match String::from_utf8(decoded) {
        Ok(decoded) => decoded,
        Err(_) => return false,
    };

    match decoded.split_once(':') {
        Some((username, password)) => {
            username == auth.username && password == auth.password
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn auth() -> AuthConfig {
        AuthConfig { username: "admin".to_string(), password: "hunter2".to_string() }
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_valid_credentials() {
        let encoded = STANDARD.encode("admin:hunter2");
        assert!(verify_basic_auth(&headers_with(&format!("Basic {}", encoded)), &auth()));
    }

    #[test]
    fn test_wrong_password() {
        let encoded = STANDARD.encode("admin:wrong");
        assert!(!verify_basic_auth(&headers_with(&format!("Basic {}", encoded)), &auth()));
    }

    #[test]
    fn test_missing_header() {
        assert!(!verify_basic_auth(&HeaderMap::new(), &auth()));
    }

    #[test]
    fn test_malformed_header() {
        assert!(!verify_basic_auth(&headers_with("Basic not-base64!!"), &auth()));
        assert!(!verify_basic_auth(&headers_with("Bearer token"), &auth()));
        // Decodes but has no colon separator.
        let encoded = STANDARD.encode("admin");
        assert!(!verify_basic_auth(&headers_with(&format!("Basic {}", encoded)), &auth()));
    }

    #[test]
    fn test_password_may_contain_colons() {
        let config = AuthConfig { username: "admin".to_string(), password: "a:b:c".to_string() };
        let encoded = STANDARD.encode("admin:a:b:c");
        assert!(verify_basic_auth(&headers_with(&format!("Basic {}", encoded)), &config));
    }
}
