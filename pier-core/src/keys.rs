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

//! Object key normalization and URL-safe encoding.
//!
//! Keys are stored and compared decoded, with `/` separators; encoding is
//! applied only when a key is placed into a URL.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters that should NOT be percent-encoded in a key segment.
/// Per RFC 3986, unreserved characters are: A-Z, a-z, 0-9, -, _, ., ~
/// Everything else (including `+`, `/`, `=`, etc.) is percent-encoded.
const KEY_SEGMENT: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Strips a single leading `/` from a caller-supplied key.
///
/// Object keys never start with a slash; clients occasionally send
/// absolute-looking paths.
pub fn normalize(key: &str) -> &str {
    key.strip_prefix('/').unwrap_or(key)
}

/// Percent-encodes a key for inclusion in a URL path.
///
/// The key is split on `/` and each segment is encoded independently, so
/// the path structure survives encoding. Already-safe keys round-trip
/// unchanged.
pub fn encode(key: &str) -> String {
    key.split('/').map(encode_component).collect::<Vec<_>>().join("/")
}

/// Percent-encodes a single path segment or query value.
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, KEY_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;

    #[test]
    fn test_normalize_strips_single_leading_slash() {
        assert_eq!(normalize("/videos/clip.mp4"), "videos/clip.mp4");
        assert_eq!(normalize("videos/clip.mp4"), "videos/clip.mp4");
        // Only one slash is stripped.
        assert_eq!(normalize("//weird"), "/weird");
    }

    #[test]
    fn test_encode_preserves_slashes() {
        assert_eq!(encode("a/b/c.txt"), "a/b/c.txt");
        assert_eq!(encode("my folder/my file.mp4"), "my%20folder/my%20file.mp4");
    }

    #[test]
    fn test_encode_safe_key_unchanged() {
        assert_eq!(encode("docs/report-2024_final.pdf"), "docs/report-2024_final.pdf");
    }

    #[test]
    fn test_encode_round_trips_segment_by_segment() {
        let original = "spaß/video clip (1)+2.mp4";
        let encoded = encode(normalize(original));

        let decoded: Vec<String> = encoded
            .split('/')
            .map(|seg| percent_decode_str(seg).decode_utf8().unwrap().to_string())
            .collect();
        assert_eq!(decoded.join("/"), original);
    }

    #[test]
    fn test_encode_component_encodes_slash() {
        assert_eq!(encode_component("a/b"), "a%2Fb");
    }
}
