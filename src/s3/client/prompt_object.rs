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

use crate::s3::builders::{PromptObject, PromptObjectBldr};
use crate::s3::client::MinioClient;

impl MinioClient {
    /// Creates a [`PromptObject`] request builder. Prompt an object using natural language.
    ///
    /// To execute the request, call [`PromptObject::send()`](crate::s3::types::S3Api::send),
    /// which returns a [`Result`] containing a [`PromptObjectResponse`](crate::s3::response::PromptObjectResponse).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use minio_prompt::s3::MinioClient;
    /// use minio_prompt::s3::builders::PromptObjectOptions;
    /// use minio_prompt::s3::creds::StaticProvider;
    /// use minio_prompt::s3::http::BaseUrl;
    /// use minio_prompt::s3::response::PromptObjectResponse;
    /// use minio_prompt::s3::types::S3Api;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let base_url = "http://localhost:9000/".parse::<BaseUrl>().unwrap();
    ///     let static_provider = StaticProvider::new("minioadmin", "minioadmin", None);
    ///     let client = MinioClient::new(base_url, Some(static_provider), None, None).unwrap();
    ///
    ///     let mut opts = PromptObjectOptions::new();
    ///     opts.set_lambda_arn("arn:minio:s3-object-lambda::_:webhook");
    ///
    ///     let resp: PromptObjectResponse = client
    ///         .prompt_object("bucket-name", "object-name", "What is it about?")
    ///         .options(opts)
    ///         .build().send().await.unwrap();
    ///     println!("the prompt response is: '{}'", resp.prompt_response());
    /// }
    /// ```
    pub fn prompt_object<S1: Into<String>, S2: Into<String>, S3: Into<String>>(
        &self,
        bucket: S1,
        object: S2,
        prompt: S3,
    ) -> PromptObjectBldr {
        PromptObject::builder()
            .client(self.clone())
            .bucket(bucket)
            .object(object)
            .prompt(prompt)
    }
}
