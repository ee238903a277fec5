// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Invocation entry points for S3 `ObjectCreated` events.

use aws_lambda_events::event::s3::S3Event;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::attachments::{AttachmentExtractor, ExtractOutcome};
use crate::batch::BatchPlanner;
use crate::cloudwatch::LogsClient;
use crate::config::{Config, Mode};
use crate::delivery::DeliveryEngine;
use crate::error::{ConfigError, Error};
use crate::record::Normalizer;
use crate::storage::{fetch_object, ObjectStore};

/// Bucket and key of the object that triggered the invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    /// Reads the first record of the event. Each invocation handles a
    /// single source object.
    pub fn from_event(event: &S3Event) -> Result<Self, Error> {
        let record = event
            .records
            .first()
            .ok_or_else(|| Error::InvalidEvent("event has no records".to_string()))?;
        if event.records.len() > 1 {
            debug!(
                "S3LOGS | Event has {} records, only the first is processed",
                event.records.len()
            );
        }

        let bucket = record
            .s3
            .bucket
            .name
            .clone()
            .ok_or_else(|| Error::InvalidEvent("record has no bucket name".to_string()))?;
        let key = record
            .s3
            .object
            .key
            .clone()
            .ok_or_else(|| Error::InvalidEvent("record has no object key".to_string()))?;
        Ok(Self { bucket, key })
    }
}

/// Result of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InvocationStatus {
    Delivered { batches: usize, events: usize },
    Stored { keys: Vec<String> },
    Skipped { reason: String },
}

impl InvocationStatus {
    /// 0 when work was done, 1 when the input was skipped.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            InvocationStatus::Delivered { .. } | InvocationStatus::Stored { .. } => 0,
            InvocationStatus::Skipped { .. } => 1,
        }
    }
}

impl From<ExtractOutcome> for InvocationStatus {
    fn from(outcome: ExtractOutcome) -> Self {
        match outcome {
            ExtractOutcome::Stored { keys } => InvocationStatus::Stored { keys },
            ExtractOutcome::Skipped { reason } => InvocationStatus::Skipped { reason },
        }
    }
}

/// Runs the log and attachment pipelines against injected clients.
#[derive(Clone)]
pub struct Handler {
    store: Arc<dyn ObjectStore>,
    logs: Arc<dyn LogsClient>,
    normalizer: Normalizer,
    planner: BatchPlanner,
}

impl Handler {
    pub fn new(store: Arc<dyn ObjectStore>, logs: Arc<dyn LogsClient>) -> Self {
        Self {
            store,
            logs,
            normalizer: Normalizer::default(),
            planner: BatchPlanner::default(),
        }
    }

    #[must_use]
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Dispatches `event` to the pipeline selected by `config.mode`.
    ///
    /// In logs mode the date and time fields come from `config`, overriding
    /// the handler's own normalizer.
    pub async fn handle(&self, event: &S3Event, config: &Config) -> Result<InvocationStatus, Error> {
        match config.mode {
            Mode::Logs => {
                let normalizer =
                    Normalizer::new(config.date_field.clone(), config.time_field.clone());
                let log_group = config
                    .log_group
                    .as_deref()
                    .ok_or(ConfigError::Missing("S3LOGS_LOG_GROUP"))?;
                let log_stream = config
                    .log_stream
                    .as_deref()
                    .ok_or(ConfigError::Missing("S3LOGS_LOG_STREAM"))?;
                self.deliver_log_file(
                    event,
                    &normalizer,
                    log_group,
                    log_stream,
                    &config.field_names,
                )
                .await
            }
            Mode::Email => {
                let bucket = config
                    .destination_bucket
                    .as_deref()
                    .ok_or(ConfigError::Missing("S3LOGS_DESTINATION_BUCKET"))?;
                self.handle_s3_email(event, bucket, &config.key_prefix)
                    .await
            }
        }
    }

    /// Reads the log file named by `event`, normalizes its lines and
    /// delivers them to `log_group`/`log_stream`.
    pub async fn handle_s3_logs(
        &self,
        event: &S3Event,
        log_group: &str,
        log_stream: &str,
        field_names: &[String],
    ) -> Result<InvocationStatus, Error> {
        self.deliver_log_file(event, &self.normalizer, log_group, log_stream, field_names)
            .await
    }

    async fn deliver_log_file(
        &self,
        event: &S3Event,
        normalizer: &Normalizer,
        log_group: &str,
        log_stream: &str,
        field_names: &[String],
    ) -> Result<InvocationStatus, Error> {
        let location = ObjectLocation::from_event(event)?;
        let data = fetch_object(self.store.as_ref(), &location.bucket, &location.key).await?;

        let records = normalizer.normalize_file(&data, field_names)?;
        let batches = self.planner.plan(records);
        info!(
            "S3LOGS | Planned {} batches from s3://{}/{}",
            batches.len(),
            location.bucket,
            location.key
        );

        let report = DeliveryEngine::new(Arc::clone(&self.logs), log_group, log_stream)
            .deliver(batches)
            .await?;
        Ok(InvocationStatus::Delivered {
            batches: report.batches,
            events: report.events,
        })
    }

    /// Reads the mailed archive named by `event` and stores its parts in
    /// `bucket` under `prefix`.
    pub async fn handle_s3_email(
        &self,
        event: &S3Event,
        bucket: &str,
        prefix: &str,
    ) -> Result<InvocationStatus, Error> {
        let location = ObjectLocation::from_event(event)?;
        let data = fetch_object(self.store.as_ref(), &location.bucket, &location.key).await?;

        let outcome = AttachmentExtractor::new(Arc::clone(&self.store))
            .extract(&data, bucket, prefix)
            .await?;
        Ok(outcome.into())
    }
}
