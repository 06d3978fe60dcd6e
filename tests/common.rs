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

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use minio_prompt::s3::MinioClientBuilder;
use minio_prompt::s3::client::MinioClient;
use minio_prompt::s3::error::{Error, ErrorResponse, S3ServerError};
use minio_prompt::s3::http::BaseUrl;
use minio_prompt::s3::multimap_ext::Multimap;
use minio_prompt::s3::response_body::{BytesBody, ResponseBody};
use minio_prompt::s3::types::{ExecutedResponse, RequestExecutor, S3Request};

/// What the executor saw of one request.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub bucket: Option<String>,
    pub object: Option<String>,
    pub query: Multimap,
    pub headers: Multimap,
    pub body: Bytes,
    pub content_sha256: Option<String>,
}

#[allow(dead_code)]
#[derive(Clone, Debug)]
pub enum Reply {
    Body(Bytes),
    FailingClose(Bytes),
    FailingRead,
    Status(StatusCode, &'static str),
}

/// In-memory body that counts closes and can fail reading or closing.
/// Without `inner` every read fails with a connection reset.
pub struct ScriptedBody {
    inner: Option<BytesBody>,
    fail_close: bool,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl ResponseBody for ScriptedBody {
    async fn read_all(&mut self) -> Result<Bytes, Error> {
        match self.inner.as_mut() {
            Some(body) => body.read_all().await,
            None => Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset while reading",
            )
            .into()),
        }
    }

    fn close(&mut self) -> Result<(), Error> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if let Some(body) = self.inner.as_mut() {
            body.close()?;
        }
        if self.fail_close {
            return Err(Error::BodyRelease("connection already closed".into()));
        }
        Ok(())
    }
}

/// Executor recording every request and answering with a fixed reply.
#[derive(Debug)]
pub struct MockExecutor {
    reply: Reply,
    calls: Mutex<Vec<RecordedRequest>>,
    closes: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockExecutor {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
            closes: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn replying(body: &'static str) -> Arc<Self> {
        Self::new(Reply::Body(Bytes::from_static(body.as_bytes())))
    }

    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> RecordedRequest {
        self.calls().pop().expect("no request was executed")
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RequestExecutor for MockExecutor {
    async fn execute(&self, request: &S3Request) -> Result<ExecutedResponse, Error> {
        self.calls.lock().unwrap().push(RecordedRequest {
            method: request.method().clone(),
            bucket: request.bucket().map(String::from),
            object: request.object().map(String::from),
            query: request.query_params().clone(),
            headers: request.headers().clone(),
            body: request.body().cloned().unwrap_or_default(),
            content_sha256: request.content_sha256().map(String::from),
        });

        let (inner, fail_close) = match &self.reply {
            Reply::Body(b) => (Some(BytesBody::new(b.clone())), false),
            Reply::FailingClose(b) => (Some(BytesBody::new(b.clone())), true),
            Reply::FailingRead => (None, false),
            Reply::Status(status, code) => {
                let er = ErrorResponse::new(*status, *code, "rejected by mock");
                return Err(Error::S3Server(S3ServerError::S3Error(Box::new(er))));
            }
        };

        Ok(ExecutedResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Box::new(ScriptedBody {
                inner,
                fail_close,
                closes: self.closes.clone(),
            }),
        })
    }
}

pub fn client_with(executor: Arc<MockExecutor>) -> MinioClient {
    client_on("http://localhost:9000", executor)
}

pub fn client_on(endpoint: &str, executor: Arc<MockExecutor>) -> MinioClient {
    let base_url: BaseUrl = endpoint.parse().unwrap();
    MinioClientBuilder::new(base_url)
        .executor(executor)
        .build()
        .unwrap()
}

/// Logger keeping every formatted record in memory.
pub struct CapturingLogger {
    records: Mutex<Vec<String>>,
}

static LOGGER: CapturingLogger = CapturingLogger {
    records: Mutex::new(Vec::new()),
};
static INIT_LOGGER: Once = Once::new();

impl log::Log for CapturingLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            self.records
                .lock()
                .unwrap()
                .push(format!("{} {}", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}

#[allow(dead_code)]
pub fn captured_logs() -> &'static CapturingLogger {
    INIT_LOGGER.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(log::LevelFilter::Warn);
    });
    &LOGGER
}

#[allow(dead_code)]
impl CapturingLogger {
    pub fn contains(&self, needle: &str) -> bool {
        self.records.lock().unwrap().iter().any(|r| r.contains(needle))
    }
}
