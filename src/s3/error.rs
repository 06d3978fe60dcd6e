// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2025 MinIO, Inc.
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

//! Error definitions for S3 operations

use crate::s3::utils::get_default_text;
use bytes::{Buf, Bytes};
use http::StatusCode;
use thiserror::Error;
use xmltree::Element;

/// Errors detected locally, before any request leaves the client.
#[derive(Error, Debug)]
pub enum ValidationErr {
    #[error("Invalid bucket name: '{name}' - {reason}")]
    InvalidBucketName { name: String, reason: String },

    #[error("Invalid object name: {0}")]
    InvalidObjectName(String),

    #[error("{0} API is not supported in Amazon AWS S3")]
    UnsupportedAwsApi(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("URL build error: {0}")]
    UrlBuildError(String),

    #[error("Invalid URI: {0}")]
    InvalidUrl(#[from] http::uri::InvalidUri),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("Header value is not visible ASCII: {0}")]
    HeaderToStr(#[from] http::header::ToStrError),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("UTF-8 decoding error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    #[error("XML parse error: {0}")]
    XmlParseError(#[from] xmltree::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl ValidationErr {
    /// HTTP-like status code reported for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Machine readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErr::InvalidBucketName { .. } => "InvalidBucketName",
            ValidationErr::InvalidObjectName(_) => "XMinioInvalidObjectName",
            ValidationErr::UnsupportedAwsApi(_) => "NotImplemented",
            ValidationErr::InvalidBaseUrl(_)
            | ValidationErr::UrlBuildError(_)
            | ValidationErr::InvalidUrl(_) => "InvalidURI",
            ValidationErr::InvalidHeaderValue(_) | ValidationErr::InvalidHeaderName(_) => {
                "InvalidArgument"
            }
            ValidationErr::JsonError(_) => "MalformedJSON",
            ValidationErr::Utf8Error(_)
            | ValidationErr::XmlParseError(_)
            | ValidationErr::HeaderToStr(_) => "InvalidResponse",
            ValidationErr::Reqwest(_) => "ClientError",
        }
    }
}

#[derive(Error, Debug)]
pub enum IoError {
    #[error("IO error occurred: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Network request error: {0}")]
    ReqwestError(#[from] reqwest::Error),
}

#[derive(Clone, Debug, Default)]
/// Error response for S3 operations
pub struct ErrorResponse {
    /// HTTP status code
    pub(crate) status_code: StatusCode,

    pub code: String,
    pub message: String,
    pub resource: String,
    pub request_id: String,
    pub host_id: String,
    pub bucket_name: Option<String>,
    pub object_name: Option<String>,
}

impl ErrorResponse {
    pub fn new(
        status_code: StatusCode,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status_code,
            code: code.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    /// Parses the XML error document returned by the server.
    pub fn parse(status_code: StatusCode, body: Bytes) -> Result<Self, ValidationErr> {
        let root = Element::parse(body.reader())?;

        let bucket_name = get_default_text(&root, "BucketName");
        let object_name = get_default_text(&root, "Key");
        Ok(Self {
            status_code,
            code: get_default_text(&root, "Code"),
            message: get_default_text(&root, "Message"),
            resource: get_default_text(&root, "Resource"),
            request_id: get_default_text(&root, "RequestId"),
            host_id: get_default_text(&root, "HostId"),
            bucket_name: (!bucket_name.is_empty()).then_some(bucket_name),
            object_name: (!object_name.is_empty()).then_some(object_name),
        })
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }
}

#[derive(Error, Debug)]
pub enum S3ServerError {
    #[error("S3 error: code: {}, message: {}, resource: {}, request_id: {}, host_id: {}, bucket_name: {:?}, object_name: {:?}",
        .0.code, .0.message, .0.resource, .0.request_id, .0.host_id, .0.bucket_name, .0.object_name)]
    S3Error(Box<ErrorResponse>),

    #[error(
        "Invalid server response received; {message}; HTTP status code: {http_status_code}; content-type: {content_type}"
    )]
    InvalidServerResponse {
        message: String,
        http_status_code: u16,
        content_type: String,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("S3 server error occurred")]
    S3Server(#[from] S3ServerError),

    #[error("Drive IO error occurred")]
    DriveIo(#[from] IoError),

    #[error("Data validation error occurred")]
    Validation(#[from] ValidationErr),

    #[error("Network error occurred")]
    Network(#[from] NetworkError),

    #[error("Failed to release response body: {0}")]
    BodyRelease(String),
}

impl Error {
    /// HTTP-like status code associated with this error.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Error::Validation(e) => Some(e.status_code()),
            Error::S3Server(S3ServerError::S3Error(er)) => Some(er.status_code()),
            Error::S3Server(S3ServerError::InvalidServerResponse {
                http_status_code, ..
            }) => StatusCode::from_u16(*http_status_code).ok(),
            _ => None,
        }
    }

    /// Machine readable error code, when one is known.
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::Validation(e) => Some(e.code()),
            Error::S3Server(S3ServerError::S3Error(er)) => Some(er.code.as_str()),
            _ => None,
        }
    }

    /// Human readable message including the innermost cause.
    pub fn message(&self) -> String {
        match self {
            Error::S3Server(S3ServerError::S3Error(er)) => er.message.clone(),
            Error::S3Server(e) => e.to_string(),
            Error::Validation(e) => e.to_string(),
            Error::Network(e) => e.to_string(),
            Error::DriveIo(e) => e.to_string(),
            Error::BodyRelease(m) => m.clone(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(NetworkError::ReqwestError(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::DriveIo(IoError::IOError(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_name_error_code() {
        let err: Error = ValidationErr::InvalidBucketName {
            name: "a".into(),
            reason: "too short".into(),
        }
        .into();
        assert_eq!(err.code(), Some("InvalidBucketName"));
        assert_eq!(err.status_code(), Some(StatusCode::BAD_REQUEST));
        assert!(err.message().contains("too short"));
    }

    #[test]
    fn test_object_name_error_code() {
        let err: Error = ValidationErr::InvalidObjectName("empty".into()).into();
        assert_eq!(err.code(), Some("XMinioInvalidObjectName"));
        assert_eq!(err.status_code(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_parse_error_response() {
        let body = Bytes::from_static(
            b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
              <Error><Code>NoSuchKey</Code><Message>The specified key does not exist.</Message>\
              <Key>doc.txt</Key><BucketName>my-bucket</BucketName><Resource>/my-bucket/doc.txt</Resource>\
              <RequestId>17A1B2</RequestId><HostId>dd9025</HostId></Error>",
        );
        let er = ErrorResponse::parse(StatusCode::NOT_FOUND, body).unwrap();
        assert_eq!(er.code, "NoSuchKey");
        assert_eq!(er.bucket_name.as_deref(), Some("my-bucket"));
        assert_eq!(er.object_name.as_deref(), Some("doc.txt"));
        assert_eq!(er.status_code(), StatusCode::NOT_FOUND);

        let err: Error = S3ServerError::S3Error(Box::new(er)).into();
        assert_eq!(err.code(), Some("NoSuchKey"));
        assert_eq!(err.message(), "The specified key does not exist.");
    }
}
