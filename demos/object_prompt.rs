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

use clap::Parser;
use minio_prompt::s3::MinioClientBuilder;
use minio_prompt::s3::builders::PromptObjectOptions;
use minio_prompt::s3::creds::StaticProvider;
use minio_prompt::s3::http::BaseUrl;
use minio_prompt::s3::response::PromptObjectResponse;
use minio_prompt::s3::types::S3Api;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bucket holding the object
    bucket: String,
    /// Object the prompt is about
    object: String,
    /// Natural-language prompt
    #[arg(default_value = "what is it about?")]
    prompt: String,
    /// Object lambda the prompt is routed to
    #[arg(long, default_value = "arn:minio:s3-object-lambda::_:webhook")]
    lambda_arn: String,
    #[arg(long, env = "SERVER_ENDPOINT", default_value = "http://localhost:9000")]
    endpoint: String,
    #[arg(long, env = "ACCESS_KEY", default_value = "minioadmin")]
    access_key: String,
    #[arg(long, env = "SECRET_KEY", default_value = "minioadmin", hide_env_values = true)]
    secret_key: String,
    /// Accept self-signed server certificates
    #[arg(long)]
    ignore_cert_check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init(); // Note: set environment variable RUST_LOG="INFO" to log info and higher
    let args = Args::parse();

    // object prompt is not supported on play.min.io, point this to AIStor
    let base_url = args.endpoint.parse::<BaseUrl>()?;
    log::info!("Trying to connect to MinIO at: `{base_url:?}`");

    let static_provider = StaticProvider::new(&args.access_key, &args.secret_key, None);
    let client = MinioClientBuilder::new(base_url)
        .provider(Some(static_provider))
        .ignore_cert_check(Some(args.ignore_cert_check))
        .app_info(Some(("object-prompt-demo".into(), env!("CARGO_PKG_VERSION").into())))
        .build()?;

    let mut opts = PromptObjectOptions::new();
    opts.set_lambda_arn(args.lambda_arn);

    let resp: PromptObjectResponse = client
        .prompt_object(&args.bucket, &args.object, &args.prompt)
        .options(opts)
        .build()
        .send()
        .await?;

    log::info!("Object prompt result: '{}'", resp.prompt_response());
    println!("{}", resp.prompt_response());

    Ok(())
}
