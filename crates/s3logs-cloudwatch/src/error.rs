// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::cloudwatch::{RejectedEvents, ServiceError};

/// Errors that abort an invocation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid invocation event: {0}")]
    InvalidEvent(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Attachment(#[from] AttachmentError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A raw row could not be turned into a log record. Always fatal: it means
/// the configured field layout does not match the file.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("line {line}: missing field '{field}'")]
    MissingField { line: usize, field: String },

    #[error("line {line}: cannot parse timestamp '{value}': {source}")]
    InvalidTimestamp {
        line: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("failed to serialize log message: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to get s3://{bucket}/{key}: {message}")]
    Get {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("failed to put s3://{bucket}/{key}: {message}")]
    Put {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("failed to decompress {key}: {source}")]
    Decompress {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal outcomes of a delivery call. Batches before `batch_index` were
/// accepted by the service and are not rolled back.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("batch {batch_index}: PutLogEvents failed: {source}")]
    Service {
        batch_index: usize,
        #[source]
        source: ServiceError,
    },

    #[error("batch {batch_index}: service rejected log events: {info}")]
    Rejected {
        batch_index: usize,
        info: RejectedEvents,
    },

    #[error("batch {batch_index}: giving up after {attempts} attempts: {source}")]
    RetriesExhausted {
        batch_index: usize,
        attempts: usize,
        #[source]
        source: ServiceError,
    },

    #[error("batch {batch_index}: no expected sequence token in conflict error: {source}")]
    MissingSequenceToken {
        batch_index: usize,
        #[source]
        source: ServiceError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("failed to parse email: {0}")]
    Parse(#[from] mailparse::MailParseError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
