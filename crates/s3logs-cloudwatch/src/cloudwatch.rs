// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! CloudWatch Logs write interface.
//!
//! [`LogsClient`] is the seam between the delivery engine and the AWS SDK:
//! production code uses [`CloudWatchLogsClient`], tests script responses
//! with a fake.

use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_cloudwatchlogs::types::{InputLogEvent, RejectedLogEventsInfo};
use aws_sdk_cloudwatchlogs::Client;
use std::fmt;

use crate::constants::{DATA_ALREADY_ACCEPTED, INVALID_SEQUENCE_TOKEN};
use crate::record::LogRecord;

/// Code used when the SDK fails without a service error code
/// (timeouts, dispatch failures, request construction).
pub const UNKNOWN_ERROR_CODE: &str = "Unknown";

#[derive(Debug, Clone, Copy)]
pub struct PutLogEventsRequest<'a> {
    pub log_group: &'a str,
    pub log_stream: &'a str,
    pub events: &'a [LogRecord],
    /// Omitted on the first write of a delivery call
    pub sequence_token: Option<&'a str>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutLogEventsOutput {
    pub next_sequence_token: Option<String>,
    /// Present when the service dropped any event of the batch
    pub rejected: Option<RejectedEvents>,
}

/// Indexes of events the service refused to store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RejectedEvents {
    pub too_new_start_index: Option<i32>,
    pub too_old_end_index: Option<i32>,
    pub expired_end_index: Option<i32>,
}

impl fmt::Display for RejectedEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "too_new_start_index={:?} too_old_end_index={:?} expired_end_index={:?}",
            self.too_new_start_index, self.too_old_end_index, self.expired_end_index
        )
    }
}

impl From<&RejectedLogEventsInfo> for RejectedEvents {
    fn from(info: &RejectedLogEventsInfo) -> Self {
        Self {
            too_new_start_index: info.too_new_log_event_start_index(),
            too_old_end_index: info.too_old_log_event_end_index(),
            expired_end_index: info.expired_log_event_end_index(),
        }
    }
}

/// Error returned by the service for a write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ServiceError {
    pub code: String,
    pub message: String,
}

impl ServiceError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Whether the write was refused because of a stale or wrong sequence
    /// token. These errors carry the token the service expects next.
    #[must_use]
    pub fn is_sequence_conflict(&self) -> bool {
        self.code == DATA_ALREADY_ACCEPTED || self.code == INVALID_SEQUENCE_TOKEN
    }

    #[must_use]
    pub fn expected_sequence_token(&self) -> Option<&str> {
        expected_sequence_token(&self.message)
    }
}

/// Extracts the token the service expects from a conflict error message.
///
/// The service does not return the token in a structured field; it is the
/// last whitespace-delimited word of messages such as
/// `The given sequenceToken is invalid. The next expected sequenceToken is: 4960...`.
#[must_use]
pub fn expected_sequence_token(message: &str) -> Option<&str> {
    message.split_whitespace().next_back()
}

#[async_trait]
pub trait LogsClient: Send + Sync {
    async fn put_log_events(
        &self,
        request: PutLogEventsRequest<'_>,
    ) -> Result<PutLogEventsOutput, ServiceError>;
}

/// [`LogsClient`] backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct CloudWatchLogsClient {
    client: Client,
}

impl CloudWatchLogsClient {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LogsClient for CloudWatchLogsClient {
    async fn put_log_events(
        &self,
        request: PutLogEventsRequest<'_>,
    ) -> Result<PutLogEventsOutput, ServiceError> {
        let events = request
            .events
            .iter()
            .map(|record| {
                InputLogEvent::builder()
                    .message(record.message.as_str())
                    .timestamp(record.timestamp)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ServiceError::new(UNKNOWN_ERROR_CODE, e.to_string()))?;

        let response = self
            .client
            .put_log_events()
            .log_group_name(request.log_group)
            .log_stream_name(request.log_stream)
            .set_log_events(Some(events))
            .set_sequence_token(request.sequence_token.map(str::to_string))
            .send()
            .await;

        match response {
            Ok(output) => Ok(PutLogEventsOutput {
                next_sequence_token: output.next_sequence_token().map(str::to_string),
                rejected: output.rejected_log_events_info().map(RejectedEvents::from),
            }),
            Err(err) => {
                let context = DisplayErrorContext(&err).to_string();
                let service_err = err.into_service_error();
                Err(ServiceError::new(
                    service_err.code().unwrap_or(UNKNOWN_ERROR_CODE),
                    service_err
                        .message()
                        .map_or(context, str::to_string),
                ))
            }
        }
    }
}
