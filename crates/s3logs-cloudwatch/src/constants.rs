// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Limits of the CloudWatch Logs `PutLogEvents` API.
//!
//! See <https://docs.aws.amazon.com/AmazonCloudWatchLogs/latest/APIReference/API_PutLogEvents.html>.
//! A single call is rejected when either limit below is exceeded, so the
//! batch planner treats both as hard caps.

/// Maximum size in bytes of a single `PutLogEvents` call, counting each
/// event's message length plus [`LOG_EVENT_OVERHEAD`].
///
/// # Value: 1MB (1,048,576 bytes)
pub const MAX_BATCH_SIZE: usize = 1_048_576;

/// Maximum number of log events in a single `PutLogEvents` call.
pub const MAX_BATCH_COUNT: usize = 10_000;

/// Bytes the service charges per event on top of the message length.
pub const LOG_EVENT_OVERHEAD: usize = 26;

/// Total attempts made for one batch when the service keeps reporting a
/// sequence token conflict.
pub const MAX_DELIVERY_ATTEMPTS: usize = 3;

/// Error code returned when the batch was already accepted under the
/// supplied token.
pub const DATA_ALREADY_ACCEPTED: &str = "DataAlreadyAcceptedException";

/// Error code returned when the supplied token is not the stream's latest.
pub const INVALID_SEQUENCE_TOKEN: &str = "InvalidSequenceTokenException";

/// Suffix of object keys that are gzip-compressed.
pub const GZIP_SUFFIX: &str = ".gz";

/// Suffix of the mailed archive named in the message subject.
pub const MAILED_ARCHIVE_SUFFIX: &str = ".gzm";
