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

//! Response bodies returned by a [`RequestExecutor`](crate::s3::types::RequestExecutor)
//! and the guard that releases them.

use crate::s3::error::Error;
use async_trait::async_trait;
use bytes::Bytes;

/// Body of an executed request.
///
/// A body is read at most once and must be closed afterwards. Callers never
/// close a body directly; they wrap it in a [`ReleaseGuard`].
#[async_trait]
pub trait ResponseBody: Send {
    /// Reads the remaining body into memory.
    async fn read_all(&mut self) -> Result<Bytes, Error>;

    /// Releases the underlying stream or connection.
    fn close(&mut self) -> Result<(), Error>;
}

/// [`ResponseBody`] backed by a [`reqwest::Response`].
#[derive(Debug)]
pub struct ReqwestBody {
    inner: Option<reqwest::Response>,
}

impl ReqwestBody {
    pub fn new(response: reqwest::Response) -> Self {
        Self {
            inner: Some(response),
        }
    }
}

#[async_trait]
impl ResponseBody for ReqwestBody {
    async fn read_all(&mut self) -> Result<Bytes, Error> {
        match self.inner.take() {
            Some(resp) => Ok(resp.bytes().await?),
            None => Ok(Bytes::new()),
        }
    }

    fn close(&mut self) -> Result<(), Error> {
        // dropping the response hands the connection back to the pool
        self.inner = None;
        Ok(())
    }
}

/// [`ResponseBody`] over bytes already held in memory.
#[derive(Clone, Debug, Default)]
pub struct BytesBody {
    data: Option<Bytes>,
}

impl BytesBody {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: Some(data.into()),
        }
    }
}

#[async_trait]
impl ResponseBody for BytesBody {
    async fn read_all(&mut self) -> Result<Bytes, Error> {
        Ok(self.data.take().unwrap_or_default())
    }

    fn close(&mut self) -> Result<(), Error> {
        self.data = None;
        Ok(())
    }
}

/// Owns a [`ResponseBody`] and closes it when dropped.
///
/// Closing happens on every exit path, including early returns on read
/// errors. A failing close is logged and never replaces the outcome of the
/// read.
pub struct ReleaseGuard {
    body: Option<Box<dyn ResponseBody>>,
    context: String,
}

impl ReleaseGuard {
    /// `context` names the request in the log line emitted on close failure.
    pub fn new(body: Box<dyn ResponseBody>, context: impl Into<String>) -> Self {
        Self {
            body: Some(body),
            context: context.into(),
        }
    }

    pub async fn read_all(&mut self) -> Result<Bytes, Error> {
        match self.body.as_mut() {
            Some(body) => body.read_all().await,
            None => Ok(Bytes::new()),
        }
    }
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        if let Some(mut body) = self.body.take() {
            if let Err(e) = body.close() {
                log::warn!("error closing response body of {}: {e}", self.context);
            }
        }
    }
}

impl std::fmt::Debug for ReleaseGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseGuard")
            .field("context", &self.context)
            .field("open", &self.body.is_some())
            .finish()
    }
}
