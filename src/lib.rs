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

//! # MinIO object prompt client (`minio-prompt`)
//!
//! Sends natural-language prompts about a stored object to a MinIO server,
//! which routes them to an object lambda function and returns its text reply.
//!
//! The request builder [`s3::builders::PromptObject`] implements the
//! [`s3::types::S3Api`] trait, whose async [`send`](crate::s3::types::S3Api::send)
//! method executes the request and returns a typed response.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use minio_prompt::s3::MinioClient;
//! use minio_prompt::s3::creds::StaticProvider;
//! use minio_prompt::s3::http::BaseUrl;
//! use minio_prompt::s3::response::PromptObjectResponse;
//! use minio_prompt::s3::types::S3Api;
//!
//! #[tokio::main]
//! async fn main() {
//!     let base_url: BaseUrl = "http://localhost:9000".parse().unwrap();
//!     let provider = StaticProvider::new("minioadmin", "minioadmin", None);
//!     let client = MinioClient::new(base_url, Some(provider), None, None).unwrap();
//!
//!     let resp: PromptObjectResponse = client
//!         .prompt_object("my-bucket", "report.pdf", "Summarize")
//!         .build()
//!         .send()
//!         .await
//!         .expect("request failed");
//!
//!     println!("{}", resp.prompt_response());
//! }
//! ```
//!
//! ## Design
//! - [`s3::client::MinioClient::prompt_object`] returns a builder struct
//! - Builders implement [`s3::types::ToS3Request`] for request conversion and [`s3::types::S3Api`] for execution
//! - Responses implement [`s3::types::FromS3Response`] for consistent deserialization
//! - Requests are carried out by a [`s3::types::RequestExecutor`], by default the signing
//!   [`s3::client::HttpExecutor`]

#![allow(clippy::result_large_err)]
#![allow(clippy::too_many_arguments)]
pub mod s3;

#[cfg(test)]
#[macro_use]
extern crate quickcheck;
