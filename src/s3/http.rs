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

//! Endpoint addressing for the S3 service

use crate::s3::error::ValidationErr;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::utils::{match_hostname, urlencode_object_key};
use http::Uri;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug)]
/// Represents HTTP URL
pub struct Url {
    pub https: bool,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub query: Multimap,
}

impl Url {
    pub fn host_header_value(&self) -> String {
        if self.port > 0 {
            return format!("{}:{}", self.host, self.port);
        }
        self.host.clone()
    }
}

impl Default for Url {
    fn default() -> Self {
        Self {
            https: true,
            host: String::default(),
            port: u16::default(),
            path: String::default(),
            query: Multimap::default(),
        }
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.host.is_empty() {
            return Err(fmt::Error);
        }

        f.write_str(if self.https { "https://" } else { "http://" })?;
        f.write_str(&self.host_header_value())?;

        if !self.path.starts_with('/') {
            f.write_str("/")?;
        }
        f.write_str(&self.path)?;

        if !self.query.is_empty() {
            f.write_str("?")?;
            f.write_str(&self.query.to_query_string())?;
        }

        Ok(())
    }
}

/// Checks whether the host belongs to Amazon AWS
pub fn match_aws_endpoint(value: &str) -> bool {
    lazy_static! {
        static ref AWS_ENDPOINT_REGEX: Regex = Regex::new(r".*\.amazonaws\.com(|\.cn)$").unwrap();
    }

    AWS_ENDPOINT_REGEX.is_match(value.to_lowercase().as_str())
}

#[derive(Clone, Debug)]
/// Represents Base URL of S3 endpoint
pub struct BaseUrl {
    pub https: bool,
    host: String,
    port: u16,
    pub region: String,
    aws_host: bool,
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self {
            https: true,
            host: "127.0.0.1".to_string(),
            port: 9000,
            region: String::new(),
            aws_host: false,
        }
    }
}

impl FromStr for BaseUrl {
    type Err = ValidationErr;

    /// Convert a string to a BaseUrl.
    ///
    /// # Examples
    ///
    /// ```
    /// use minio_prompt::s3::http::BaseUrl;
    ///
    /// let base_url: BaseUrl = "play.min.io".parse().unwrap();
    /// assert!(base_url.https);
    /// let base_url: BaseUrl = "http://192.168.124.63:9000".parse().unwrap();
    /// assert_eq!(base_url.host_header_value(), "192.168.124.63:9000");
    /// let base_url: BaseUrl = "[0:0:0:0:0:ffff:c0a8:7c3f]:9000".parse().unwrap();
    /// ```
    fn from_str(s: &str) -> Result<Self, ValidationErr> {
        let url = s.parse::<Uri>()?;

        let https = match url.scheme_str() {
            None | Some("https") => true,
            Some("http") => false,
            Some(_) => {
                return Err(ValidationErr::InvalidBaseUrl(
                    "scheme must be http or https".into(),
                ));
            }
        };

        let host = url
            .host()
            .ok_or_else(|| ValidationErr::InvalidBaseUrl("valid host must be provided".into()))?;
        let host = if host.parse::<std::net::Ipv6Addr>().is_ok() {
            format!("[{host}]")
        } else {
            host.to_string()
        };

        if !host.starts_with('[')
            && host.parse::<std::net::Ipv4Addr>().is_err()
            && !match_hostname(&host)
        {
            return Err(ValidationErr::InvalidBaseUrl(format!(
                "invalid host name {host}"
            )));
        }

        let mut port = url.port_u16().unwrap_or(0);
        if (https && port == 443) || (!https && port == 80) {
            port = 0;
        }

        if url.path() != "/" && !url.path().is_empty() {
            return Err(ValidationErr::InvalidBaseUrl(
                "path must be empty for base URL".into(),
            ));
        }

        if url.query().is_some() {
            return Err(ValidationErr::InvalidBaseUrl(
                "query must be none for base URL".into(),
            ));
        }

        Ok(BaseUrl {
            https,
            aws_host: match_aws_endpoint(&host),
            host,
            port,
            region: String::new(),
        })
    }
}

impl BaseUrl {
    /// Checks base URL is AWS host
    pub fn is_aws_host(&self) -> bool {
        self.aws_host
    }

    pub fn host_header_value(&self) -> String {
        if self.port > 0 {
            return format!("{}:{}", self.host, self.port);
        }
        self.host.clone()
    }

    /// Builds the path-style URL addressing `bucket_name`/`object_name`.
    pub fn build_url(
        &self,
        query: &Multimap,
        bucket_name: Option<&str>,
        object_name: Option<&str>,
    ) -> Result<Url, ValidationErr> {
        let mut path = String::from("/");
        if let Some(bucket) = bucket_name {
            path.push_str(bucket);
            if let Some(object) = object_name {
                path.push('/');
                path.push_str(&urlencode_object_key(object.trim_start_matches('/')));
            }
        } else if object_name.is_some() {
            return Err(ValidationErr::UrlBuildError(
                "object name given without bucket name".into(),
            ));
        }

        Ok(Url {
            https: self.https,
            host: self.host.clone(),
            port: self.port,
            path,
            query: query.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_parse() {
        let base_url: BaseUrl = "http://localhost:9000".parse().unwrap();
        assert!(!base_url.https);
        assert_eq!(base_url.host_header_value(), "localhost:9000");
        assert!(!base_url.is_aws_host());

        let base_url: BaseUrl = "https://play.min.io:443".parse().unwrap();
        assert_eq!(base_url.host_header_value(), "play.min.io");

        let base_url: BaseUrl = "s3.us-east-1.amazonaws.com".parse().unwrap();
        assert!(base_url.is_aws_host());
    }

    #[test]
    fn test_base_url_parse_errors() {
        assert!("ftp://localhost".parse::<BaseUrl>().is_err());
        assert!("http://localhost:9000/path".parse::<BaseUrl>().is_err());
        assert!("http://localhost:9000/?a=b".parse::<BaseUrl>().is_err());
    }

    #[test]
    fn test_build_url() {
        let base_url: BaseUrl = "http://localhost:9000".parse().unwrap();
        let mut query = Multimap::new();
        query.add("lambdaArn", "arn:minio:s3-object-lambda::_:webhook");

        let url = base_url
            .build_url(&query, Some("my-bucket"), Some("dir/doc 1.txt"))
            .unwrap();
        assert_eq!(url.path, "/my-bucket/dir/doc%201.txt");
        assert_eq!(
            url.to_string(),
            "http://localhost:9000/my-bucket/dir/doc%201.txt?lambdaArn=arn%3Aminio%3As3-object-lambda%3A%3A_%3Awebhook"
        );

        assert!(base_url.build_url(&query, None, Some("doc.txt")).is_err());
    }

    #[test]
    fn test_url_display_requires_host() {
        let url = Url::default();
        assert!(fmt::write(&mut String::new(), format_args!("{url}")).is_err());
    }
}
