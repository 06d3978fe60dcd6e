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

//! S3 client issuing object prompts.
//!
//! # HTTP Version Support
//!
//! When connecting over TLS the client negotiates HTTP/2 via ALPN if the
//! server supports it, otherwise it falls back to HTTP/1.1. HTTP/2 is enabled
//! by the default `http2` feature flag.

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use std::fs::File;
use std::io::prelude::*;
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::s3::creds::Provider;
use crate::s3::error::{Error, ErrorResponse, IoError, S3ServerError, ValidationErr};
use crate::s3::header_constants::*;
use crate::s3::http::BaseUrl;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::response_body::ReqwestBody;
use crate::s3::signer::sign_v4_s3;
use crate::s3::types::{ExecutedResponse, RequestExecutor, S3Request};
use crate::s3::utils::{EMPTY_SHA256, sha256_hash, to_amz_date, utc_now};

mod prompt_object;

/// Region used for signing when neither the request nor the base URL names one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Client Builder manufactures a Client using given parameters.
/// Creates a builder given a base URL for the MinIO service or other AWS S3
/// compatible object storage service.
#[derive(Debug)]
pub struct MinioClientBuilder {
    base_url: BaseUrl,
    /// Set the credential provider. If not, set anonymous access is used.
    provider: Option<Arc<dyn Provider + Send + Sync + 'static>>,
    /// Set file for loading CAs certs to trust. This is in addition to the system trust store. The file must contain PEM encoded certificates.
    ssl_cert_file: Option<PathBuf>,
    /// Set flag to ignore certificate check. This is insecure and should only be used for testing.
    ignore_cert_check: Option<bool>,
    /// Set the app info as an Option of (app_name, app_version) pair. This will show up in the client's user-agent.
    app_info: Option<(String, String)>,
    /// Replaces the HTTP transport.
    executor: Option<Arc<dyn RequestExecutor>>,
}

impl MinioClientBuilder {
    /// Creates a builder given a base URL for the MinIO service or other AWS S3
    /// compatible object storage service.
    pub fn new(base_url: BaseUrl) -> Self {
        Self {
            base_url,
            provider: None,
            ssl_cert_file: None,
            ignore_cert_check: None,
            app_info: None,
            executor: None,
        }
    }

    /// Set the credential provider. If not, set anonymous access is used.
    pub fn provider<P: Provider + Send + Sync + 'static>(mut self, provider: Option<P>) -> Self {
        self.provider = provider.map(|p| Arc::new(p) as Arc<dyn Provider + Send + Sync + 'static>);
        self
    }

    /// Set the app info as an Option of (app_name, app_version) pair. This will
    /// show up in the client's user-agent.
    pub fn app_info(mut self, app_info: Option<(String, String)>) -> Self {
        self.app_info = app_info;
        self
    }

    /// Set file for loading CAs certs to trust. This is in addition to the system
    /// trust store. The file must contain PEM encoded certificates.
    pub fn ssl_cert_file(mut self, ssl_cert_file: Option<&Path>) -> Self {
        self.ssl_cert_file = ssl_cert_file.map(PathBuf::from);
        self
    }

    /// Set flag to ignore certificate check. This is insecure and should only
    /// be used for testing.
    pub fn ignore_cert_check(mut self, ignore_cert_check: Option<bool>) -> Self {
        self.ignore_cert_check = ignore_cert_check;
        self
    }

    /// Sends every request through `executor` instead of the built-in
    /// [`HttpExecutor`]. Provider and TLS settings are ignored in that case.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use minio_prompt::s3::client::{HttpExecutor, MinioClientBuilder};
    /// use minio_prompt::s3::http::BaseUrl;
    /// use std::sync::Arc;
    ///
    /// let base_url: BaseUrl = "http://localhost:9000".parse().unwrap();
    /// let executor = HttpExecutor::new(reqwest::Client::new(), base_url.clone(), None);
    /// let client = MinioClientBuilder::new(base_url)
    ///     .executor(Arc::new(executor))
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn executor(mut self, executor: Arc<dyn RequestExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Build the Client.
    pub fn build(self) -> Result<MinioClient, Error> {
        let executor: Arc<dyn RequestExecutor> = match self.executor {
            Some(v) => v,
            None => {
                let http_client = Self::build_http_client(
                    self.app_info,
                    self.ignore_cert_check,
                    self.ssl_cert_file,
                )?;
                Arc::new(HttpExecutor::new(
                    http_client,
                    self.base_url.clone(),
                    self.provider,
                ))
            }
        };

        Ok(MinioClient {
            shared: Arc::new(SharedClientItems {
                base_url: self.base_url,
                executor,
            }),
        })
    }

    #[allow(unused_mut, unused_variables)]
    fn build_http_client(
        app_info: Option<(String, String)>,
        ignore_cert_check: Option<bool>,
        ssl_cert_file: Option<PathBuf>,
    ) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder().no_gzip();

        #[cfg(feature = "http2")]
        {
            builder = builder.http2_adaptive_window(true);
        }

        let mut user_agent = String::from("MinIO (")
            + std::env::consts::OS
            + "; "
            + std::env::consts::ARCH
            + ") minio-prompt/"
            + env!("CARGO_PKG_VERSION");

        if let Some((app_name, app_version)) = app_info {
            user_agent.push_str(format!(" {app_name}/{app_version}").as_str());
        }
        builder = builder.user_agent(user_agent);

        #[cfg(any(
            feature = "default-tls",
            feature = "native-tls",
            feature = "rustls-tls"
        ))]
        if let Some(v) = ignore_cert_check {
            builder = builder.danger_accept_invalid_certs(v);
        }

        #[cfg(any(
            feature = "default-tls",
            feature = "native-tls",
            feature = "rustls-tls"
        ))]
        if let Some(v) = ssl_cert_file {
            let mut buf = Vec::new();
            let mut file = File::open(v).map_err(IoError::IOError)?;
            file.read_to_end(&mut buf).map_err(IoError::IOError)?;

            let certs = reqwest::Certificate::from_pem_bundle(&buf).map_err(ValidationErr::from)?;
            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        }

        Ok(builder.build().map_err(ValidationErr::from)?)
    }
}

/// Simple Storage Service (aka S3) client issuing object prompts.
///
/// If credential provider is passed, all S3 operation requests are signed using
/// AWS Signature Version 4; else they are performed anonymously.
#[derive(Clone, Debug)]
pub struct MinioClient {
    pub(crate) shared: Arc<SharedClientItems>,
}

impl MinioClient {
    /// Returns a S3 client with given base URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use minio_prompt::s3::client::MinioClient;
    /// use minio_prompt::s3::creds::StaticProvider;
    /// use minio_prompt::s3::http::BaseUrl;
    ///
    /// let base_url: BaseUrl = "play.min.io".parse().unwrap();
    /// let static_provider = StaticProvider::new(
    ///     "Q3AM3UQ867SPQQA43P2F",
    ///     "zuf+tfteSlswRu7BJ86wekitnifILbZam1KYY3TG",
    ///     None,
    /// );
    /// let client = MinioClient::new(base_url, Some(static_provider), None, None).unwrap();
    /// ```
    pub fn new<P: Provider + Send + Sync + 'static>(
        base_url: BaseUrl,
        provider: Option<P>,
        ssl_cert_file: Option<&Path>,
        ignore_cert_check: Option<bool>,
    ) -> Result<Self, Error> {
        MinioClientBuilder::new(base_url)
            .provider(provider)
            .ssl_cert_file(ssl_cert_file)
            .ignore_cert_check(ignore_cert_check)
            .build()
    }

    /// Returns whether this client uses an AWS host.
    pub fn is_aws_host(&self) -> bool {
        self.shared.base_url.is_aws_host()
    }

    /// Returns whether this client is configured to use HTTPS.
    pub fn is_secure(&self) -> bool {
        self.shared.base_url.https
    }

    pub(crate) fn executor(&self) -> &dyn RequestExecutor {
        self.shared.executor.as_ref()
    }
}

#[derive(Debug)]
pub(crate) struct SharedClientItems {
    pub(crate) base_url: BaseUrl,
    executor: Arc<dyn RequestExecutor>,
}

/// Default [`RequestExecutor`]: signs requests with AWS Signature V4 and
/// sends them with `reqwest`.
#[derive(Debug)]
pub struct HttpExecutor {
    http_client: reqwest::Client,
    base_url: BaseUrl,
    provider: Option<Arc<dyn Provider + Send + Sync + 'static>>,
}

impl HttpExecutor {
    pub fn new(
        http_client: reqwest::Client,
        base_url: BaseUrl,
        provider: Option<Arc<dyn Provider + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            http_client,
            base_url,
            provider,
        }
    }

    fn region<'a>(&'a self, request: &'a S3Request) -> &'a str {
        match request.region() {
            Some(v) if !v.is_empty() => v,
            _ if !self.base_url.region.is_empty() => &self.base_url.region,
            _ => DEFAULT_REGION,
        }
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, request: &S3Request) -> Result<ExecutedResponse, Error> {
        let method: &Method = request.method();
        let region: &str = self.region(request);
        let query_params: &Multimap = request.query_params();
        let url = self
            .base_url
            .build_url(query_params, request.bucket(), request.object())?;

        let mut headers: Multimap = request.headers().clone();
        headers.set(HOST, url.host_header_value());

        let body: Bytes = request.body().cloned().unwrap_or_default();
        if matches!(*method, Method::PUT | Method::POST) {
            if !headers.contains_key(CONTENT_TYPE) {
                headers.add(CONTENT_TYPE, "application/octet-stream");
            }
            headers.set(CONTENT_LENGTH, body.len().to_string());
        }

        let sha256: String = match request.content_sha256() {
            Some(v) => v.to_string(),
            None if body.is_empty() => EMPTY_SHA256.into(),
            None => sha256_hash(&body),
        };
        headers.set(X_AMZ_CONTENT_SHA256, sha256.clone());

        let date = utc_now();
        headers.set(X_AMZ_DATE, to_amz_date(date));

        if let Some(p) = &self.provider {
            let creds = p.fetch();
            if !creds.is_anonymous() {
                if let Some(token) = creds.session_token.as_deref() {
                    headers.set(X_AMZ_SECURITY_TOKEN, token);
                }
                sign_v4_s3(
                    method,
                    &url.path,
                    region,
                    &mut headers,
                    query_params,
                    &creds.access_key,
                    &creds.secret_key,
                    &sha256,
                    date,
                );
            }
        }

        let mut req = self
            .http_client
            .request(method.clone(), url.to_string())
            .headers(to_header_map(&headers)?);
        if !body.is_empty() {
            req = req.body(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            log::debug!("{method} {} returned {status}", url.path);
            return Ok(ExecutedResponse {
                status,
                headers: resp.headers().clone(),
                body: Box::new(ReqwestBody::new(resp)),
            });
        }

        let mut resp = resp;
        let resp_headers: HeaderMap = mem::take(resp.headers_mut());
        let resp_body: Bytes = resp.bytes().await?;
        log::debug!("{method} {} failed with {status}", url.path);

        Err(error_from_response(
            status,
            &resp_headers,
            resp_body,
            &url.path,
            request.bucket(),
            request.object(),
        ))
    }
}

/// Converts request headers, rejecting names or values HTTP cannot carry.
fn to_header_map(headers: &Multimap) -> Result<HeaderMap, ValidationErr> {
    let mut map = HeaderMap::new();
    for (key, values) in headers.iter_all() {
        let name = HeaderName::from_bytes(key.as_bytes())?;
        for value in values {
            map.append(&name, HeaderValue::from_str(value)?);
        }
    }
    Ok(map)
}

fn header_text(headers: &HeaderMap, name: &str) -> Result<String, ValidationErr> {
    Ok(match headers.get(name) {
        Some(v) => v.to_str()?.to_string(),
        None => String::new(),
    })
}

/// Turns a non-2xx response into an [`Error`].
///
/// An XML body is decoded as an S3 error document. An empty body gets a code
/// derived from the status; any other body is reported as an invalid server
/// response.
pub(crate) fn error_from_response(
    status: StatusCode,
    headers: &HeaderMap,
    body: Bytes,
    resource: &str,
    bucket_name: Option<&str>,
    object_name: Option<&str>,
) -> Error {
    match build_error_response(status, headers, body, resource, bucket_name, object_name) {
        Ok(er) => Error::S3Server(S3ServerError::S3Error(Box::new(er))),
        Err(e) => e,
    }
}

fn build_error_response(
    status: StatusCode,
    headers: &HeaderMap,
    body: Bytes,
    resource: &str,
    bucket_name: Option<&str>,
    object_name: Option<&str>,
) -> Result<ErrorResponse, Error> {
    let http_status_code = status.as_u16();

    let mut er: ErrorResponse = if !body.is_empty() {
        let content_type = header_text(headers, CONTENT_TYPE)?;
        let lowered = content_type.to_lowercase();
        if !lowered.contains(APPLICATION_XML) && !lowered.contains("text/xml") {
            return Err(S3ServerError::InvalidServerResponse {
                message: format!("expected content-type 'application/xml', but got {content_type}"),
                http_status_code,
                content_type,
            }
            .into());
        }
        ErrorResponse::parse(status, body)?
    } else {
        let (code, mut message): (&str, String) = match http_status_code {
            301 => ("PermanentRedirect", "Moved Permanently".into()),
            307 => ("Redirect", "Temporary redirect".into()),
            400 => ("BadRequest", "Bad request".into()),
            403 => ("AccessDenied", "Access denied".into()),
            404 => match (bucket_name, object_name) {
                (_, Some(_)) => ("NoSuchKey", "Object does not exist".into()),
                (Some(_), None) => ("NoSuchBucket", "Bucket does not exist".into()),
                (None, None) => ("ResourceNotFound", "Request resource not found".into()),
            },
            405 | 501 => (
                "MethodNotAllowed",
                "The specified method is not allowed against this resource".into(),
            ),
            409 => ("ResourceConflict", "Request resource conflicts".into()),
            _ => {
                return Err(S3ServerError::InvalidServerResponse {
                    message: format!("unexpected empty response with status {status}"),
                    http_status_code,
                    content_type: header_text(headers, CONTENT_TYPE)?,
                }
                .into());
            }
        };

        if matches!(http_status_code, 301 | 307 | 400) {
            let region = header_text(headers, X_AMZ_BUCKET_REGION)?;
            if !region.is_empty() {
                message.push_str("; use region ");
                message.push_str(&region);
            }
        }
        ErrorResponse::new(status, code, message)
    };

    if er.resource.is_empty() {
        er.resource = resource.to_string();
    }
    if er.request_id.is_empty() {
        er.request_id = header_text(headers, X_AMZ_REQUEST_ID)?;
    }
    if er.host_id.is_empty() {
        er.host_id = header_text(headers, X_AMZ_ID_2)?;
    }
    if er.bucket_name.is_none() {
        er.bucket_name = bucket_name.map(String::from);
    }
    if er.object_name.is_none() {
        er.object_name = object_name.map(String::from);
    }
    Ok(er)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s3_error(e: Error) -> ErrorResponse {
        match e {
            Error::S3Server(S3ServerError::S3Error(er)) => *er,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_xml_error_body() {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::CONTENT_TYPE, HeaderValue::from_static("application/xml"));
        headers.insert(X_AMZ_REQUEST_ID, HeaderValue::from_static("17A2F"));
        let body = Bytes::from_static(
            b"<Error><Code>NoSuchLambda</Code><Message>unknown ARN</Message></Error>",
        );

        let er = s3_error(error_from_response(
            StatusCode::BAD_REQUEST,
            &headers,
            body,
            "/bucket/doc.txt",
            Some("bucket"),
            Some("doc.txt"),
        ));
        assert_eq!(er.code, "NoSuchLambda");
        assert_eq!(er.message, "unknown ARN");
        assert_eq!(er.request_id, "17A2F");
        assert_eq!(er.resource, "/bucket/doc.txt");
        assert_eq!(er.object_name.as_deref(), Some("doc.txt"));
        assert_eq!(er.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_empty_body_uses_status() {
        let headers = HeaderMap::new();
        let er = s3_error(error_from_response(
            StatusCode::NOT_FOUND,
            &headers,
            Bytes::new(),
            "/bucket/doc.txt",
            Some("bucket"),
            Some("doc.txt"),
        ));
        assert_eq!(er.code, "NoSuchKey");

        let er = s3_error(error_from_response(
            StatusCode::FORBIDDEN,
            &headers,
            Bytes::new(),
            "/bucket/doc.txt",
            Some("bucket"),
            Some("doc.txt"),
        ));
        assert_eq!(er.code, "AccessDenied");
    }

    #[test]
    fn test_redirect_mentions_region() {
        let mut headers = HeaderMap::new();
        headers.insert(X_AMZ_BUCKET_REGION, HeaderValue::from_static("eu-west-1"));
        let er = s3_error(error_from_response(
            StatusCode::MOVED_PERMANENTLY,
            &headers,
            Bytes::new(),
            "/bucket/doc.txt",
            Some("bucket"),
            Some("doc.txt"),
        ));
        assert_eq!(er.code, "PermanentRedirect");
        assert_eq!(er.message, "Moved Permanently; use region eu-west-1");
    }

    #[test]
    fn test_non_xml_body_is_invalid_response() {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let e = error_from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &headers,
            Bytes::from_static(b"boom"),
            "/bucket/doc.txt",
            Some("bucket"),
            Some("doc.txt"),
        );
        assert!(matches!(
            e,
            Error::S3Server(S3ServerError::InvalidServerResponse {
                http_status_code: 500,
                ..
            })
        ));
        assert_eq!(e.status_code(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_empty_body_unknown_status() {
        let e = error_from_response(
            StatusCode::SERVICE_UNAVAILABLE,
            &HeaderMap::new(),
            Bytes::new(),
            "/bucket/doc.txt",
            Some("bucket"),
            Some("doc.txt"),
        );
        assert!(matches!(
            e,
            Error::S3Server(S3ServerError::InvalidServerResponse { .. })
        ));
    }

    #[test]
    fn test_header_map_keeps_every_value() {
        let mut headers = Multimap::new();
        headers.add("Content-Type", "application/json");
        headers.add("X-Amz-Meta-Tag", "a");
        headers.add("X-Amz-Meta-Tag", "b");

        let map = to_header_map(&headers).unwrap();
        assert_eq!(map.get(http::header::CONTENT_TYPE).unwrap(), "application/json");
        let tags: Vec<_> = map.get_all("x-amz-meta-tag").iter().collect();
        assert_eq!(tags, vec!["a", "b"]);
    }

    #[test]
    fn test_header_map_rejects_bad_name_and_value() {
        let mut bad_name = Multimap::new();
        bad_name.add("X Bad Name", "v");
        let err = to_header_map(&bad_name).unwrap_err();
        assert!(matches!(err, ValidationErr::InvalidHeaderName(_)));
        assert_eq!(Error::from(err).code(), Some("InvalidArgument"));

        let mut bad_value = Multimap::new();
        bad_value.add("X-Amz-Meta-Note", "line\nbreak");
        let err = to_header_map(&bad_value).unwrap_err();
        assert!(matches!(err, ValidationErr::InvalidHeaderValue(_)));
        assert_eq!(Error::from(err).code(), Some("InvalidArgument"));
    }

    #[test]
    fn test_builder_with_executor_skips_http_client() {
        let base_url: BaseUrl = "http://localhost:9000".parse().unwrap();
        let executor = HttpExecutor::new(reqwest::Client::new(), base_url.clone(), None);
        let client = MinioClientBuilder::new(base_url)
            .executor(Arc::new(executor))
            .build()
            .unwrap();
        assert!(!client.is_secure());
        assert!(!client.is_aws_host());
    }
}
