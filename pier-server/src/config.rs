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

//! Configuration management for the Pier gateway.
//!
//! All settings come from environment variables, read once at startup into
//! an immutable `Config`. Nothing here is consulted again after the server
//! is up.

use pier_core::StoreConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings (bind address, TLS, upload limit).
    pub server: ServerConfig,
    /// Shared credential pair for the auth gate.
    pub auth: AuthSettings,
    /// Backend object store settings.
    pub store: StoreSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    /// Can be set via the PIER_BIND environment variable.
    pub bind: String,
    /// Maximum upload size in bytes.
    /// Can be set via PIER_MAX_UPLOAD_SIZE (e.g., "5GB", "100MB", "1024KB").
    pub max_upload_size: usize,
    /// TLS configuration for HTTPS support.
    pub tls: TlsConfig,
}

/// TLS/HTTPS configuration.
///
/// TLS is disabled by default. To enable TLS, set the `PIER_TLS_CERT` and
/// `PIER_TLS_KEY` environment variables to point to PEM-encoded certificate
/// and private key files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Whether TLS is enabled.
    /// Automatically set to true when both cert_path and key_path are provided.
    pub enabled: bool,
    /// Path to PEM-encoded certificate file.
    pub cert_path: Option<PathBuf>,
    /// Path to PEM-encoded private key file.
    pub key_path: Option<PathBuf>,
}

impl Default for TlsConfig {
    fn default() -> Self {
        let cert_path = std::env::var("PIER_TLS_CERT").ok().map(PathBuf::from);
        let key_path = std::env::var("PIER_TLS_KEY").ok().map(PathBuf::from);

        // Enable TLS only if both cert and key are provided
        let enabled = cert_path.is_some() && key_path.is_some();

        Self { enabled, cert_path, key_path }
    }
}

impl TlsConfig {
    /// Validates TLS configuration.
    ///
    /// Returns an error if TLS is enabled but certificate or key paths are
    /// missing.
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled {
            if self.cert_path.is_none() {
                return Err("TLS enabled but PIER_TLS_CERT is not set".to_string());
            }
            if self.key_path.is_none() {
                return Err("TLS enabled but PIER_TLS_KEY is not set".to_string());
            }
        }
        Ok(())
    }
}

/// Auth gate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Username, from PIER_AUTH_USERNAME.
    pub username: String,
    /// Password, from PIER_AUTH_PASSWORD.
    pub password: String,
}

/// Backend object store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Endpoint URL, from PIER_S3_ENDPOINT.
    pub endpoint: String,
    /// Bucket name, from PIER_S3_BUCKET.
    pub bucket: String,
    /// Region for the signature credential scope, from PIER_S3_REGION.
    pub region: String,
    /// Access key ID, from PIER_S3_ACCESS_KEY_ID.
    pub access_key_id: String,
    /// Secret access key, from PIER_S3_SECRET_ACCESS_KEY.
    pub secret_access_key: String,
    /// Optional public CDN domain for direct object URLs,
    /// from PIER_PUBLIC_DOMAIN.
    pub public_domain: Option<String>,
}

impl StoreSettings {
    /// Builds the immutable store configuration handed to the client.
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig {
            endpoint: self.endpoint.clone(),
            bucket: self.bucket.clone(),
            region: self.region.clone(),
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            public_domain: self.public_domain.clone(),
        }
    }
}

/// Parses a size string like "10GB", "100MB", "1024KB", "5000" into bytes.
///
/// Supported suffixes (case-insensitive):
/// - GB, G: Gigabytes
/// - MB, M: Megabytes
/// - KB, K: Kilobytes
/// - B or no suffix: Bytes
pub fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim().to_uppercase();

    if s.is_empty() {
        return Err("Empty size string".to_string());
    }

    let num_end = s.chars().position(|c| !c.is_ascii_digit() && c != '.').unwrap_or(s.len());

    let (num_str, suffix) = s.split_at(num_end);
    let suffix = suffix.trim();

    let num: f64 = num_str.parse().map_err(|_| format!("Invalid number: {}", num_str))?;

    let multiplier: usize = match suffix {
        "GB" | "G" => 1024 * 1024 * 1024,
        "MB" | "M" => 1024 * 1024,
        "KB" | "K" => 1024,
        "B" | "" => 1,
        _ => return Err(format!("Unknown size suffix: {}", suffix)),
    };

    Ok((num * multiplier as f64) as usize)
}

impl Config {
    /// Loads configuration from the environment.
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self::default())
    }

    /// Validates the configuration.
    ///
    /// Every backend and auth setting is required; TLS is optional but must
    /// be complete when enabled.
    pub fn validate(&self) -> Result<(), String> {
        self.server.tls.validate()?;

        let required = [
            ("PIER_AUTH_USERNAME", &self.auth.username),
            ("PIER_AUTH_PASSWORD", &self.auth.password),
            ("PIER_S3_ENDPOINT", &self.store.endpoint),
            ("PIER_S3_BUCKET", &self.store.bucket),
            ("PIER_S3_ACCESS_KEY_ID", &self.store.access_key_id),
            ("PIER_S3_SECRET_ACCESS_KEY", &self.store.secret_access_key),
        ];
        for (var, value) in required {
            if value.is_empty() {
                return Err(format!("{} is not set", var));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: std::env::var("PIER_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
                max_upload_size: std::env::var("PIER_MAX_UPLOAD_SIZE")
                    .ok()
                    .and_then(|s| parse_size(&s).ok())
                    .unwrap_or(pier_api::DEFAULT_MAX_UPLOAD_SIZE),
                tls: TlsConfig::default(),
            },
            auth: AuthSettings {
                username: std::env::var("PIER_AUTH_USERNAME").unwrap_or_default(),
                password: std::env::var("PIER_AUTH_PASSWORD").unwrap_or_default(),
            },
            store: StoreSettings {
                endpoint: std::env::var("PIER_S3_ENDPOINT").unwrap_or_default(),
                bucket: std::env::var("PIER_S3_BUCKET").unwrap_or_default(),
                region: std::env::var("PIER_S3_REGION")
                    .unwrap_or_else(|_| "us-east-1".to_string()),
                access_key_id: std::env::var("PIER_S3_ACCESS_KEY_ID").unwrap_or_default(),
                secret_access_key: std::env::var("PIER_S3_SECRET_ACCESS_KEY").unwrap_or_default(),
                public_domain: std::env::var("PIER_PUBLIC_DOMAIN").ok(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            server: ServerConfig {
                bind: "127.0.0.1:8080".to_string(),
                max_upload_size: 1024,
                tls: TlsConfig { enabled: false, cert_path: None, key_path: None },
            },
            auth: AuthSettings {
                username: "admin".to_string(),
                password: "hunter2".to_string(),
            },
            store: StoreSettings {
                endpoint: "http://localhost:9000".to_string(),
                bucket: "media".to_string(),
                region: "us-east-1".to_string(),
                access_key_id: "key".to_string(),
                secret_access_key: "secret".to_string(),
                public_domain: None,
            },
        }
    }

    #[test]
    fn test_parse_size_bytes() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_size_suffixes() {
        assert_eq!(parse_size("1KB").unwrap(), 1024);
        assert_eq!(parse_size("10kb").unwrap(), 10 * 1024);
        assert_eq!(parse_size("1MB").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("5gb").unwrap(), 5 * 1024 * 1024 * 1024);
    }

    #[test]
    fn test_parse_size_invalid() {
        assert!(parse_size("").is_err());
        assert!(parse_size("abc").is_err());
        assert!(parse_size("1TB").is_err()); // TB not supported
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_credentials() {
        let mut config = valid_config();
        config.store.secret_access_key = String::new();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("PIER_S3_SECRET_ACCESS_KEY"));
    }

    #[test]
    fn test_validate_rejects_missing_auth() {
        let mut config = valid_config();
        config.auth.password = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tls_validation_missing_key() {
        let tls = TlsConfig {
            enabled: true,
            cert_path: Some(PathBuf::from("/path/to/cert.pem")),
            key_path: None,
        };
        let result = tls.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("PIER_TLS_KEY"));
    }

    #[test]
    fn test_to_store_config() {
        let config = valid_config();
        let store = config.store.to_store_config();
        assert_eq!(store.endpoint, "http://localhost:9000");
        assert_eq!(store.bucket, "media");
        assert!(store.public_domain.is_none());
    }
}
