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

//! ListObjectsV2 response transcoding.
//!
//! Turns the backend's flat XML listing into an ordered sequence of
//! [`FileEntry`] values: common-prefix blocks become folder entries,
//! content blocks become file entries, folders first.
//!
//! The scanner below is a fixed-tag tokenizer, not an XML parser. The
//! list-objects response is attribute-free and non-nested for the tags we
//! read (`CommonPrefixes`, `Contents`, `Prefix`, `Key`, `Size`,
//! `LastModified`), and the tokenizer is only valid for that shape.

use chrono::{SecondsFormat, Utc};

use crate::keys;
use crate::types::FileEntry;

/// Gateway route prefix under which objects are streamed.
///
/// File entries without a configured public domain point here.
pub const STREAM_PREFIX: &str = "/api/file/";

/// Transcodes a raw ListObjectsV2 body into folder and file entries.
///
/// `prefix` is the decoded query prefix; a content block whose key exactly
/// equals it is the zero-byte placeholder object for the queried folder and
/// is suppressed. Malformed size or date fields degrade to defaults rather
/// than failing the listing.
pub fn transcode(xml: &str, prefix: &str, public_domain: Option<&str>) -> Vec<FileEntry> {
    let mut entries = Vec::new();

    for block in blocks(xml, "CommonPrefixes") {
        if let Some(folder) = tag_text(block, "Prefix") {
            entries.push(FileEntry::folder(unescape(folder)));
        }
    }

    for block in blocks(xml, "Contents") {
        let key = match tag_text(block, "Key") {
            Some(key) => unescape(key),
            None => continue,
        };
        if key == prefix {
            continue;
        }

        let size = tag_text(block, "Size").and_then(|s| s.trim().parse().ok()).unwrap_or(0);
        let uploaded = match tag_text(block, "LastModified") {
            Some(ts) => unescape(ts),
            None => Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        };

        let url = access_url(&key, public_domain);
        entries.push(FileEntry::file(key, size, uploaded, url));
    }

    entries
}

/// Builds the access URL for a file entry.
///
/// With a public domain configured the object is served directly from it,
/// raw key appended; otherwise the URL points at the gateway's own
/// streaming route with the key percent-encoded.
fn access_url(key: &str, public_domain: Option<&str>) -> String {
    match public_domain {
        Some(domain) => format!("{}/{}", domain.trim_end_matches('/'), key),
        None => format!("{}{}", STREAM_PREFIX, keys::encode(key)),
    }
}

/// Collects the inner text of every `<tag>...</tag>` occurrence.
///
/// Valid only for flat, attribute-free, non-nested occurrences - exactly
/// what the list-objects API produces for the tags we scan.
fn blocks<'a>(xml: &'a str, tag: &str) -> Vec<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let mut found = Vec::new();
    let mut rest = xml;
    while let Some(start) = rest.find(&open) {
        let after = &rest[start + open.len()..];
        let end = match after.find(&close) {
            Some(end) => end,
            None => break,
        };
        found.push(&after[..end]);
        rest = &after[end + close.len()..];
    }
    found
}

/// First inner text of `<tag>...</tag>` within a block, if present.
fn tag_text<'a>(block: &'a str, tag: &str) -> Option<&'a str> {
    blocks(block, tag).into_iter().next()
}

/// Reverses the XML escaping the backend applies to text content.
fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
