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

use crate::s3::error::ValidationErr;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::utils::{canonical_header_key, is_custom_query_value, is_standard_query_value};
use std::collections::BTreeMap;

/// Per-call options of the [`PromptObject`](crate::s3::builders::PromptObject) operation.
///
/// Accumulates the arguments sent as the JSON body, extra request headers
/// and query parameters.
///
/// Query parameters are restricted to the names listed in
/// [`SUPPORTED_QUERY_VALUES`](crate::s3::utils::SUPPORTED_QUERY_VALUES) and to
/// names starting with `x-`. Any other key is ignored without an error.
///
/// # Examples
///
/// ```
/// use minio_prompt::s3::builders::PromptObjectOptions;
///
/// let mut opts = PromptObjectOptions::new();
/// opts.set_lambda_arn("arn:minio:s3-object-lambda::_:webhook")
///     .add_argument("temperature", "0.2")
///     .set_header("x-amz-meta-origin", "docs")
///     .add_query_param("x-trace", "1")
///     .add_query_param("unsupported", "dropped");
///
/// assert_eq!(opts.query_values().len(), 1);
/// assert!(opts.headers().contains_key("X-Amz-Meta-Origin"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct PromptObjectOptions {
    lambda_arn: Option<String>,
    kwargs: Option<BTreeMap<String, String>>,
    headers: Option<BTreeMap<String, String>>,
    req_params: Option<Multimap>,
}

impl PromptObjectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ARN of the object lambda function the prompt is routed to.
    pub fn set_lambda_arn(&mut self, lambda_arn: impl Into<String>) -> &mut Self {
        self.lambda_arn = Some(lambda_arn.into());
        self
    }

    pub fn lambda_arn(&self) -> Option<&str> {
        self.lambda_arn.as_deref()
    }

    /// Adds an argument to the JSON body, replacing any previous value of `key`.
    pub fn add_argument(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.kwargs
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Arguments added so far; `None` until the first one is added.
    pub fn arguments(&self) -> Option<&BTreeMap<String, String>> {
        self.kwargs.as_ref()
    }

    /// Sets a request header. The key is stored in canonical form, so
    /// `content-type` and `Content-Type` address the same header.
    pub fn set_header(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(canonical_header_key(key), value.into());
        self
    }

    fn accepts_query_key(key: &str) -> bool {
        is_custom_query_value(key) || is_standard_query_value(key)
    }

    /// Sets a query parameter, replacing its previous values. Unsupported
    /// keys are ignored.
    pub fn set_query_param(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        if Self::accepts_query_key(key) {
            self.req_params
                .get_or_insert_with(Multimap::new)
                .set(key, value);
        }
        self
    }

    /// Adds a value to a query parameter, keeping its previous values.
    /// Unsupported keys are ignored.
    pub fn add_query_param(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        if Self::accepts_query_key(key) {
            self.req_params
                .get_or_insert_with(Multimap::new)
                .add(key, value);
        }
        self
    }

    /// Returns the headers ready to be attached to a request.
    pub fn headers(&self) -> Multimap {
        let mut headers = Multimap::new();
        for (k, v) in self.headers.iter().flatten() {
            headers.add(k.as_str(), v.as_str());
        }
        headers
    }

    /// Returns the query parameters ready to be encoded in the request URL.
    pub fn query_values(&self) -> Multimap {
        self.req_params.clone().unwrap_or_default()
    }

    /// Serializes the arguments into the JSON request body.
    pub(crate) fn to_json_body(&self) -> Result<Vec<u8>, ValidationErr> {
        let empty = BTreeMap::new();
        Ok(serde_json::to_vec(self.kwargs.as_ref().unwrap_or(&empty))?)
    }
}
