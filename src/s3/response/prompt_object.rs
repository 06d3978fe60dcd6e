// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2024 MinIO, Inc.
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

use crate::s3::error::{Error, ValidationErr};
use crate::s3::response_body::ReleaseGuard;
use crate::s3::types::{ExecutedResponse, FromS3Response, S3Request};
use async_trait::async_trait;
use bytes::Bytes;
use http::HeaderMap;

/// Response of [`prompt_object()`](crate::s3::client::MinioClient::prompt_object) API
#[derive(Clone, Debug)]
pub struct PromptObjectResponse {
    headers: HeaderMap,
    region: String,
    bucket: String,
    object: String,
    prompt_response: String,
}

impl PromptObjectResponse {
    /// Text produced by the object lambda, decoded as UTF-8.
    pub fn prompt_response(&self) -> &str {
        &self.prompt_response
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn into_prompt_response(self) -> String {
        self.prompt_response
    }
}

#[async_trait]
impl FromS3Response for PromptObjectResponse {
    async fn from_s3response(
        req: S3Request,
        resp: Result<ExecutedResponse, Error>,
    ) -> Result<Self, Error> {
        let resp: ExecutedResponse = resp?;
        let region: String = req.region().unwrap_or_default().to_string();
        let bucket: String = req.bucket.unwrap_or_default();
        let object: String = req.object.unwrap_or_default();

        let body: Bytes = {
            let mut guard = ReleaseGuard::new(resp.body, format!("{bucket}/{object}"));
            guard.read_all().await?
        };
        let prompt_response =
            String::from_utf8(body.to_vec()).map_err(ValidationErr::from)?;

        Ok(Self {
            headers: resp.headers,
            region,
            bucket,
            object,
            prompt_response,
        })
    }
}
