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

//! Credential providers used to sign prompt requests

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Access key, secret key and an optional session token
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    /// Anonymous credentials carry no access key; requests made with them are not signed.
    pub fn is_anonymous(&self) -> bool {
        self.access_key.is_empty()
    }
}

/// Provider trait to fetch credentials
pub trait Provider: std::fmt::Debug {
    fn fetch(&self) -> Credentials;
}

#[derive(Clone, Debug)]
/// Static credential provider
pub struct StaticProvider {
    creds: Credentials,
}

impl StaticProvider {
    /// Returns a static provider with given access key, secret key and optional session token
    ///
    /// # Examples
    ///
    /// ```
    /// use minio_prompt::s3::creds::StaticProvider;
    /// let provider = StaticProvider::new("minioadmin", "minio123", None);
    /// ```
    pub fn new(access_key: &str, secret_key: &str, session_token: Option<&str>) -> StaticProvider {
        StaticProvider {
            creds: Credentials {
                access_key: access_key.to_string(),
                secret_key: secret_key.to_string(),
                session_token: session_token.map(str::to_string),
            },
        }
    }
}

impl Provider for StaticProvider {
    fn fetch(&self) -> Credentials {
        self.creds.clone()
    }
}

/// Reads credentials from the environment on every fetch.
///
/// `MINIO_ACCESS_KEY` / `MINIO_SECRET_KEY` take precedence over
/// `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`; the session token is read
/// from `AWS_SESSION_TOKEN`. Missing variables yield anonymous credentials.
#[derive(Clone, Debug, Default)]
pub struct EnvProvider;

impl EnvProvider {
    fn first_of(names: &[&str]) -> Option<String> {
        names
            .iter()
            .filter_map(|n| std::env::var(n).ok())
            .find(|v| !v.is_empty())
    }
}

impl Provider for EnvProvider {
    fn fetch(&self) -> Credentials {
        Credentials {
            access_key: Self::first_of(&["MINIO_ACCESS_KEY", "AWS_ACCESS_KEY_ID"])
                .unwrap_or_default(),
            secret_key: Self::first_of(&["MINIO_SECRET_KEY", "AWS_SECRET_ACCESS_KEY"])
                .unwrap_or_default(),
            session_token: Self::first_of(&["AWS_SESSION_TOKEN"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_provider() {
        let p = StaticProvider::new("minioadmin", "minioadmin", Some("token"));
        let creds = p.fetch();
        assert_eq!(creds.access_key, "minioadmin");
        assert_eq!(creds.session_token.as_deref(), Some("token"));
        assert!(!creds.is_anonymous());
    }

    #[test]
    fn test_default_credentials_are_anonymous() {
        assert!(Credentials::default().is_anonymous());
    }
}
