// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2022 MinIO, Inc.
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

//! Various utility and helper functions

use crate::s3::error::ValidationErr;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use sha2::{Digest, Sha256};
use xmltree::Element;

/// Date and time with UTC timezone
pub type UtcTime = DateTime<Utc>;

/// SHA256 hash of an empty payload
pub const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Query parameter names accepted by the request options in addition to the
/// custom `x-` prefixed ones.
pub const SUPPORTED_QUERY_VALUES: [&str; 9] = [
    "attributes",
    "partNumber",
    "versionId",
    "response-cache-control",
    "response-content-disposition",
    "response-content-encoding",
    "response-content-language",
    "response-content-type",
    "response-expires",
];

/// Prefix of custom query parameter names accepted by the request options.
pub const ALLOWED_CUSTOM_QUERY_PREFIX: &str = "x-";

/// Returns true if `key` is one of [`SUPPORTED_QUERY_VALUES`]
pub fn is_standard_query_value(key: &str) -> bool {
    SUPPORTED_QUERY_VALUES.contains(&key)
}

/// Returns true if `key` starts with [`ALLOWED_CUSTOM_QUERY_PREFIX`]
pub fn is_custom_query_value(key: &str) -> bool {
    key.starts_with(ALLOWED_CUSTOM_QUERY_PREFIX)
}

/// Gets hex encoded SHA256 hash of given data
pub fn sha256_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Gets current UTC time
pub fn utc_now() -> UtcTime {
    chrono::offset::Utc::now()
}

/// Gets signer date value of given time
pub fn to_signer_date(time: UtcTime) -> String {
    time.format("%Y%m%d").to_string()
}

/// Gets AMZ date value of given time
pub fn to_amz_date(time: UtcTime) -> String {
    time.format("%Y%m%dT%H%M%SZ").to_string()
}

// Characters to escape in query strings. Based on RFC 3986 and the golang
// net/url implementation used in the MinIO server.
//
// https://tools.ietf.org/html/rfc3986
//
// 1. All non-ascii characters are escaped always.
// 2. All reserved characters are escaped.
// 3. Any other characters are not escaped.
//
// Unreserved characters in addition to alphanumeric characters are: '-', '_',
// '.', '~' (§2.3 Unreserved characters (mark))
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

// Same as QUERY_ESCAPE but keeps the path separator.
const OBJECT_KEY_ESCAPE: &AsciiSet = &QUERY_ESCAPE.remove(b'/');

/// URL-encodes a query parameter key or value
pub fn url_encode(s: &str) -> String {
    utf8_percent_encode(s, QUERY_ESCAPE).collect()
}

/// URL-encodes an object key, preserving '/'
pub fn urlencode_object_key(key: &str) -> String {
    utf8_percent_encode(key, OBJECT_KEY_ESCAPE).collect()
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

/// Returns the canonical format of the MIME header key: the first letter and
/// every letter following a hyphen are upper case, the rest lower case. Keys
/// containing a space or other non-token bytes are returned unchanged.
///
/// ```
/// use minio_prompt::s3::utils::canonical_header_key;
/// assert_eq!(canonical_header_key("content-type"), "Content-Type");
/// assert_eq!(canonical_header_key("X-AMZ-META-foo"), "X-Amz-Meta-Foo");
/// ```
pub fn canonical_header_key(key: &str) -> String {
    if !key.bytes().all(is_token_byte) {
        return key.to_string();
    }

    let mut upper = true;
    key.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

/// Checks if given hostname is valid or not
pub fn match_hostname(value: &str) -> bool {
    lazy_static! {
        static ref HOSTNAME_REGEX: Regex =
            Regex::new(r"^([a-z_\d-]{1,63}\.)*([a-z_\d-]{1,63})$").unwrap();
    }

    if !HOSTNAME_REGEX.is_match(value.to_lowercase().as_str()) {
        return false;
    }

    for token in value.split('.') {
        if token.starts_with('-')
            || token.starts_with('_')
            || token.ends_with('-')
            || token.ends_with('_')
        {
            return false;
        }
    }

    true
}

/// Validates given bucket name
pub fn check_bucket_name(bucket_name: impl AsRef<str>, strict: bool) -> Result<(), ValidationErr> {
    let bucket_name: &str = bucket_name.as_ref().trim();
    let invalid = |reason: &str| ValidationErr::InvalidBucketName {
        name: bucket_name.to_string(),
        reason: reason.to_string(),
    };

    let bucket_name_len = bucket_name.len();
    if bucket_name_len == 0 {
        return Err(invalid("bucket name cannot be empty"));
    }
    if bucket_name_len < 3 {
        return Err(invalid("bucket name cannot be less than 3 characters"));
    }
    if bucket_name_len > 63 {
        return Err(invalid("bucket name cannot be greater than 63 characters"));
    }

    lazy_static! {
        static ref IPV4_REGEX: Regex = Regex::new(
            r"^((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])\.){3}(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])$"
        )
        .unwrap();
        static ref VALID_BUCKET_NAME_REGEX: Regex =
            Regex::new("^[A-Za-z0-9][A-Za-z0-9\\.\\-_:]{1,61}[A-Za-z0-9]$").unwrap();
        static ref VALID_BUCKET_NAME_STRICT_REGEX: Regex =
            Regex::new("^[a-z0-9][a-z0-9\\.\\-]{1,61}[a-z0-9]$").unwrap();
    }

    if IPV4_REGEX.is_match(bucket_name) {
        return Err(invalid("bucket name cannot be an IP address"));
    }

    if bucket_name.contains("..") || bucket_name.contains(".-") || bucket_name.contains("-.") {
        return Err(invalid(
            "bucket name contains invalid successive characters '..', '.-' or '-.'",
        ));
    }

    if strict {
        if !VALID_BUCKET_NAME_STRICT_REGEX.is_match(bucket_name) {
            return Err(invalid("bucket name does not follow S3 standards strictly"));
        }
    } else if !VALID_BUCKET_NAME_REGEX.is_match(bucket_name) {
        return Err(invalid("bucket name does not follow S3 standards"));
    }

    Ok(())
}

/// Validates given object name
pub fn check_object_name(object_name: impl AsRef<str>) -> Result<(), ValidationErr> {
    let name: &str = object_name.as_ref();
    if name.trim().is_empty() {
        return Err(ValidationErr::InvalidObjectName(
            "object name cannot be empty".into(),
        ));
    }
    if name.len() > 1024 {
        return Err(ValidationErr::InvalidObjectName(format!(
            "object name ('{name}') cannot be greater than 1024 bytes"
        )));
    }
    if name.contains("//") {
        return Err(ValidationErr::InvalidObjectName(format!(
            "object name ('{name}') with a \"//\" is not supported"
        )));
    }
    Ok(())
}

/// Gets default text value of given XML element for given tag.
pub fn get_default_text(element: &Element, tag: &str) -> String {
    element.get_child(tag).map_or(String::new(), |v| {
        v.get_text().unwrap_or_default().to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hash() {
        assert_eq!(sha256_hash(b""), EMPTY_SHA256);
        assert_eq!(
            sha256_hash(br#"{"prompt":"Summarize"}"#),
            sha256_hash(br#"{"prompt":"Summarize"}"#)
        );
        assert_ne!(sha256_hash(b"a"), sha256_hash(b"b"));
        assert_eq!(sha256_hash(b"abc").len(), 64);
    }

    #[test]
    fn test_canonical_header_key() {
        assert_eq!(canonical_header_key("content-type"), "Content-Type");
        assert_eq!(canonical_header_key("CONTENT-TYPE"), "Content-Type");
        assert_eq!(canonical_header_key("x-amz-meta-key"), "X-Amz-Meta-Key");
        assert_eq!(canonical_header_key("etag"), "Etag");
        assert_eq!(canonical_header_key(""), "");
        // non-token bytes leave the key untouched
        assert_eq!(canonical_header_key("bad key"), "bad key");
        assert_eq!(canonical_header_key("content:type"), "content:type");
    }

    #[test]
    fn test_query_allow_list() {
        for key in SUPPORTED_QUERY_VALUES {
            assert!(is_standard_query_value(key));
        }
        assert!(!is_standard_query_value("lambdaArn"));
        assert!(!is_standard_query_value("versionid"));
        assert!(is_custom_query_value("x-minio-extract"));
        assert!(!is_custom_query_value("X-Upper"));
        assert!(!is_custom_query_value("prompt"));
    }

    #[test]
    fn test_check_bucket_name() {
        let too_long = "a".repeat(64);
        assert!(check_bucket_name("my-bucket", true).is_ok());
        assert!(check_bucket_name("my.bucket.name", true).is_ok());
        assert!(check_bucket_name("My_Bucket", false).is_ok());

        for name in [
            "",
            "ab",
            "Invalid_Bucket!",
            "192.168.1.1",
            "my..bucket",
            "my-.bucket",
            "-bucket",
            "My_Bucket",
            too_long.as_str(),
        ] {
            let err = check_bucket_name(name, true).unwrap_err();
            assert!(
                matches!(err, ValidationErr::InvalidBucketName { .. }),
                "{name}"
            );
            assert_eq!(err.code(), "InvalidBucketName");
        }
    }

    #[test]
    fn test_check_object_name() {
        assert!(check_object_name("doc.txt").is_ok());
        assert!(check_object_name("dir/sub/doc.txt").is_ok());
        assert!(check_object_name("").is_err());
        assert!(check_object_name("   ").is_err());
        assert!(check_object_name("a//b").is_err());
        assert!(check_object_name("a".repeat(1025)).is_err());
        assert_eq!(
            check_object_name("").unwrap_err().code(),
            "XMinioInvalidObjectName"
        );
    }

    #[test]
    fn test_url_encode() {
        assert_eq!(
            url_encode("arn:minio:s3-object-lambda::_:webhook"),
            "arn%3Aminio%3As3-object-lambda%3A%3A_%3Awebhook"
        );
        assert_eq!(url_encode("a b"), "a%20b");
        assert_eq!(urlencode_object_key("dir/a b.txt"), "dir/a%20b.txt");
    }

    quickcheck! {
        fn prop_canonical_header_key_is_idempotent(key: String) -> bool {
            let once = canonical_header_key(&key);
            canonical_header_key(&once) == once
        }

        fn prop_custom_query_values_are_prefixed(suffix: String) -> bool {
            is_custom_query_value(&format!("x-{suffix}"))
        }

        fn prop_long_bucket_names_rejected(extra: u8) -> bool {
            let name = "a".repeat(64 + extra as usize);
            check_bucket_name(&name, false).is_err()
        }
    }
}
