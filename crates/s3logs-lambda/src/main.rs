// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use aws_config::BehaviorVersion;
use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{service_fn, LambdaEvent};
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use s3logs_cloudwatch::{
    cloudwatch::CloudWatchLogsClient,
    config::Config,
    handler::{Handler, InvocationStatus},
    storage::S3ObjectStore,
};

#[tokio::main]
pub async fn main() -> Result<(), lambda_runtime::Error> {
    let config = match Config::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            init_logging("info");
            error!("Error creating config on s3logs startup: {e}");
            return Err(e.into());
        }
    };
    init_logging(&config.log_level);

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let store = Arc::new(S3ObjectStore::new(aws_sdk_s3::Client::new(&aws_config)));
    let logs = Arc::new(CloudWatchLogsClient::new(
        aws_sdk_cloudwatchlogs::Client::new(&aws_config),
    ));
    let handler = Arc::new(Handler::new(store, logs));

    info!("S3LOGS | Starting in {:?} mode", config.mode);
    lambda_runtime::run(service_fn(move |event: LambdaEvent<S3Event>| {
        let handler = Arc::clone(&handler);
        let config = Arc::clone(&config);
        async move {
            let status = handler.handle(&event.payload, &config).await.map_err(|e| {
                error!("S3LOGS | Invocation {} failed: {e}", event.context.request_id);
                e
            })?;
            Ok::<_, lambda_runtime::Error>(response(&status))
        }
    }))
    .await
}

fn response(status: &InvocationStatus) -> serde_json::Value {
    serde_json::json!({
        "status": status.code(),
        "result": status,
    })
}

fn init_logging(log_level: &str) {
    let env_filter = format!("h2=off,hyper=off,rustls=off,aws_smithy_runtime=off,{log_level}");

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Logging subsystem enabled");
}
