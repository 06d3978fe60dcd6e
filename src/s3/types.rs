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

use crate::s3::client::MinioClient;
use crate::s3::error::Error;
use crate::s3::multimap_ext::Multimap;
use crate::s3::response_body::ResponseBody;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use std::fmt;
use typed_builder::TypedBuilder;

#[derive(Clone, Debug, TypedBuilder)]
/// Generic S3Request
///
/// Describes one request: built by a request builder, handed to the
/// client's [`RequestExecutor`] and dropped once the response is decoded.
pub struct S3Request {
    #[builder(!default)] // force required
    pub(crate) client: MinioClient,

    #[builder(!default)] // force required
    method: Method,

    #[builder(default, setter(into))]
    region: Option<String>,

    #[builder(default, setter(into))]
    pub(crate) bucket: Option<String>,

    #[builder(default, setter(into))]
    pub(crate) object: Option<String>,

    #[builder(default)]
    pub(crate) query_params: Multimap,

    #[builder(default)]
    headers: Multimap,

    /// Hex encoded SHA256 of `body`
    #[builder(default, setter(into))]
    content_sha256: Option<String>,

    #[builder(default, setter(into))]
    body: Option<Bytes>,
}

impl S3Request {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    pub fn object(&self) -> Option<&str> {
        self.object.as_deref()
    }

    pub fn query_params(&self) -> &Multimap {
        &self.query_params
    }

    pub fn headers(&self) -> &Multimap {
        &self.headers
    }

    pub fn content_sha256(&self) -> Option<&str> {
        self.content_sha256.as_deref()
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn content_length(&self) -> u64 {
        self.body.as_ref().map_or(0, |b| b.len() as u64)
    }

    /// Execute the request, returning the response. Only used in [`S3Api::send()`]
    pub async fn execute(&self) -> Result<ExecutedResponse, Error> {
        log::debug!(
            "executing {} on bucket: {:?}, object: {:?}",
            self.method,
            self.bucket,
            self.object
        );
        self.client.executor().execute(self).await
    }
}

/// Response of a successfully executed request.
pub struct ExecutedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Box<dyn ResponseBody>,
}

impl fmt::Debug for ExecutedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutedResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Performs signed requests against the S3 endpoint.
///
/// The client delegates every [`S3Request`] to an executor. The default one,
/// [`HttpExecutor`](crate::s3::client::HttpExecutor), signs with AWS Signature
/// V4 and sends over `reqwest`; another can be installed with
/// [`MinioClientBuilder::executor`](crate::s3::client::MinioClientBuilder::executor).
///
/// Non-2xx responses are reported as `Err`, never as an [`ExecutedResponse`].
#[async_trait]
pub trait RequestExecutor: fmt::Debug + Send + Sync {
    async fn execute(&self, request: &S3Request) -> Result<ExecutedResponse, Error>;
}

/// Trait for converting a request builder into a concrete S3 HTTP request.
///
/// The [`S3Api::send`] method uses this trait to convert request builders
/// into executable requests. Every local check happens here, so a builder
/// that fails to convert never reaches the network.
pub trait ToS3Request: Sized {
    /// Consumes this request builder and returns a [`S3Request`].
    fn to_s3request(self) -> Result<S3Request, Error>;
}

/// Trait for converting executed requests into strongly typed S3 response objects.
#[async_trait]
pub trait FromS3Response: Sized {
    /// Converts the executor outcome into a typed response. Executor errors
    /// are returned unchanged.
    async fn from_s3response(
        s3req: S3Request,
        response: Result<ExecutedResponse, Error>,
    ) -> Result<Self, Error>;
}

/// Trait that defines a common interface for all S3 API request builders.
#[async_trait]
pub trait S3Api: ToS3Request {
    /// The response type associated with this request builder.
    type S3Response: FromS3Response;

    /// Sends the S3 API request and returns the corresponding typed response.
    async fn send(self) -> Result<Self::S3Response, Error> {
        let req: S3Request = self.to_s3request()?;
        let resp: Result<ExecutedResponse, Error> = req.execute().await;
        Self::S3Response::from_s3response(req, resp).await
    }
}
