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

use crate::s3::builders::PromptObjectOptions;
use crate::s3::client::MinioClient;
use crate::s3::error::{Error, ValidationErr};
use crate::s3::header_constants::{APPLICATION_JSON, CONTENT_TYPE, LAMBDA_ARN, PROMPT};
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::response::PromptObjectResponse;
use crate::s3::types::{S3Api, S3Request, ToS3Request};
use crate::s3::utils::{check_bucket_name, check_object_name, sha256_hash};
use bytes::Bytes;
use http::Method;
use typed_builder::TypedBuilder;

/// Argument builder for the `PromptObject` operation.
///
/// This struct constructs the parameters required for the
/// [`MinioClient::prompt_object`](crate::s3::client::MinioClient::prompt_object) method.
///
/// The request is a `POST` on the object with the `lambdaArn` query parameter
/// and a JSON body holding the option arguments plus the `prompt`. A
/// `prompt` argument already present in the options is replaced by the
/// prompt of this builder.
#[derive(Clone, Debug, TypedBuilder)]
pub struct PromptObject {
    #[builder(!default)] // force required
    client: MinioClient,
    #[builder(default, setter(into))]
    extra_headers: Option<Multimap>,
    #[builder(default, setter(into))]
    extra_query_params: Option<Multimap>,
    #[builder(default, setter(into))]
    region: Option<String>,
    #[builder(setter(into))] // force required + accept Into<String>
    bucket: String,
    #[builder(setter(into))] // force required + accept Into<String>
    object: String,
    #[builder(default, setter(into))]
    version_id: Option<String>,
    #[builder(setter(into))] // force required + accept Into<String>
    prompt: String,
    #[builder(default)]
    options: PromptObjectOptions,
}

impl S3Api for PromptObject {
    type S3Response = PromptObjectResponse;
}

/// Builder type alias for [`PromptObject`].
///
/// Constructed via [`PromptObject::builder()`](PromptObject::builder) and used to build a [`PromptObject`] instance.
pub type PromptObjectBldr = PromptObjectBuilder<(
    (MinioClient,),
    (),
    (),
    (),
    (String,),
    (String,),
    (),
    (String,),
    (),
)>;

impl ToS3Request for PromptObject {
    fn to_s3request(self) -> Result<S3Request, Error> {
        check_bucket_name(&self.bucket, false)?;
        check_object_name(&self.object)?;
        if self.client.is_aws_host() {
            return Err(ValidationErr::UnsupportedAwsApi("PromptObject".into()).into());
        }

        let mut opts: PromptObjectOptions = self.options;
        opts.set_header(CONTENT_TYPE, APPLICATION_JSON);
        opts.add_argument(PROMPT, self.prompt);
        let body: Vec<u8> = opts.to_json_body()?;
        let content_sha256: String = sha256_hash(&body);

        let mut query_params: Multimap = self.extra_query_params.unwrap_or_default();
        query_params.add_multimap(opts.query_values());
        query_params.set_version(self.version_id);
        // routing parameter is not a caller option, so it bypasses the allow-list
        query_params.set(LAMBDA_ARN, opts.lambda_arn().unwrap_or_default());

        let mut headers: Multimap = self.extra_headers.unwrap_or_default();
        for (key, values) in opts.headers() {
            headers.retain(|k, _| !k.eq_ignore_ascii_case(&key));
            headers.insert_many(key, values);
        }

        Ok(S3Request::builder()
            .client(self.client)
            .method(Method::POST)
            .region(self.region)
            .bucket(self.bucket)
            .object(self.object)
            .query_params(query_params)
            .headers(headers)
            .content_sha256(content_sha256)
            .body(Bytes::from(body))
            .build())
    }
}
