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

//! Core data types for the gateway.

use serde::Serialize;

/// A single entry in a folder listing.
///
/// Represents either a "folder" (a common-prefix grouping with no backing
/// object) or a concrete object. The key always uses `/` separators and is
/// stored decoded; encoding happens only when a URL is built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Full storage path of the entry, including any query prefix.
    pub key: String,
    /// Whether this entry is a synthesized folder.
    #[serde(rename = "isFolder")]
    pub is_folder: bool,
    /// Last-modified timestamp as reported by the backend; `"-"` for folders.
    pub uploaded: String,
    /// Object size in bytes; folders report 0.
    pub size: u64,
    /// Access URL for files; folders have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl FileEntry {
    /// Creates a synthetic folder entry for a common prefix.
    pub fn folder(key: String) -> Self {
        Self { key, is_folder: true, uploaded: "-".to_string(), size: 0, url: None }
    }

    /// Creates a file entry for a concrete object.
    pub fn file(key: String, size: u64, uploaded: String, url: String) -> Self {
        Self { key, is_folder: false, uploaded, size, url: Some(url) }
    }
}

/// Immutable backend store configuration.
///
/// Built once at startup from the environment and passed explicitly into
/// the client and the proxy operations - there is no ambient global state,
/// which keeps the operations testable against a fake backend.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Backend endpoint URL, e.g. `https://s3.example.com`.
    pub endpoint: String,
    /// Bucket name.
    pub bucket: String,
    /// Region used in the signature credential scope.
    pub region: String,
    /// Access key ID.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Optional public CDN domain serving objects directly, bypassing the
    /// gateway for downloads.
    pub public_domain: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_entry_shape() {
        let entry = FileEntry::folder("images/".to_string());
        assert!(entry.is_folder);
        assert_eq!(entry.size, 0);
        assert_eq!(entry.uploaded, "-");
        assert!(entry.url.is_none());
    }

    #[test]
    fn test_file_entry_serializes_wire_names() {
        let entry = FileEntry::file(
            "images/cat.png".to_string(),
            1024,
            "2024-01-01T00:00:00Z".to_string(),
            "/api/file/images/cat.png".to_string(),
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["isFolder"], false);
        assert_eq!(json["size"], 1024);
        assert_eq!(json["uploaded"], "2024-01-01T00:00:00Z");
        assert_eq!(json["url"], "/api/file/images/cat.png");
    }

    #[test]
    fn test_folder_entry_omits_url() {
        let json = serde_json::to_value(FileEntry::folder("docs/".to_string())).unwrap();
        assert!(json.get("url").is_none());
    }
}
