// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Conversion of parsed log rows into CloudWatch log records.
//!
//! Each row's date and time fields are merged into an epoch-millisecond
//! timestamp; every other field is kept, in layout order, in a JSON object
//! that becomes the record message. Records are then sorted by timestamp
//! because CloudWatch expects the events of a stream to arrive in order.
//!
//! Messages are compact JSON (`{"a":"b","c":"d"}`) with non-ASCII text kept
//! as UTF-8, so batch sizes are measured on that encoding.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::constants::LOG_EVENT_OVERHEAD;
use crate::error::NormalizeError;
use crate::tsv::{self, Row};

/// Format of `<date> <time>` once the two fields are joined with a space.
/// Values are UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const DEFAULT_DATE_FIELD: &str = "logdate";
pub const DEFAULT_TIME_FIELD: &str = "logtime";

/// A single CloudWatch log event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub message: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl LogRecord {
    pub fn new(message: impl Into<String>, timestamp: i64) -> Self {
        Self {
            message: message.into(),
            timestamp,
        }
    }

    /// Size the service counts against the per-call limit.
    #[must_use]
    pub fn encoded_size(&self) -> usize {
        self.message.len() + LOG_EVENT_OVERHEAD
    }
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    date_field: String,
    time_field: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FIELD, DEFAULT_TIME_FIELD)
    }
}

impl Normalizer {
    pub fn new(date_field: impl Into<String>, time_field: impl Into<String>) -> Self {
        Self {
            date_field: date_field.into(),
            time_field: time_field.into(),
        }
    }

    /// Turns one row into a record. The row's date and time fields are
    /// consumed; the remaining fields form the message.
    pub fn normalize_row(&self, row: Row) -> Result<LogRecord, NormalizeError> {
        let Row { line, mut fields } = row;

        let date = take_field(&mut fields, &self.date_field, line)?;
        let time = take_field(&mut fields, &self.time_field, line)?;
        let value = format!("{date} {time}");

        let timestamp = NaiveDateTime::parse_from_str(&value, TIMESTAMP_FORMAT)
            .map_err(|source| NormalizeError::InvalidTimestamp {
                line,
                value: value.clone(),
                source,
            })?
            .and_utc()
            .timestamp_millis();

        let message = serde_json::to_string(&fields)?;
        Ok(LogRecord { message, timestamp })
    }

    /// Normalizes every row and returns the records sorted by timestamp.
    /// The sort is stable: records with equal timestamps keep input order.
    ///
    /// The first bad row aborts the whole call.
    pub fn normalize<I>(&self, rows: I) -> Result<Vec<LogRecord>, NormalizeError>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut records = rows
            .into_iter()
            .map(|row| self.normalize_row(row))
            .collect::<Result<Vec<_>, _>>()?;
        records.sort_by_key(|record| record.timestamp);
        Ok(records)
    }

    /// Decodes, parses and normalizes a whole log file.
    pub fn normalize_file(
        &self,
        data: &[u8],
        field_names: &[String],
    ) -> Result<Vec<LogRecord>, NormalizeError> {
        let text = tsv::decode(data);
        self.normalize(tsv::parse_rows(&text, field_names))
    }
}

fn take_field(
    fields: &mut serde_json::Map<String, Value>,
    name: &str,
    line: usize,
) -> Result<String, NormalizeError> {
    match fields.shift_remove(name) {
        Some(Value::String(value)) => Ok(value),
        _ => Err(NormalizeError::MissingField {
            line,
            field: name.to_string(),
        }),
    }
}
