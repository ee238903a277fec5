// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Splitting of log records into `PutLogEvents` sized batches.
//!
//! # Batching Strategy
//!
//! Records are taken in order and appended to the current batch until one
//! of two limits would be crossed:
//! 1. **Size limit**: sum of message bytes plus per-event overhead (1MB)
//! 2. **Count limit**: number of events (10,000)
//!
//! A record that is larger than a whole batch is truncated first, so it
//! always fits into a batch of its own and the planner never fails.

use tracing::warn;

use crate::constants;
use crate::record::LogRecord;

/// Ordered group of records sent in one `PutLogEvents` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    records: Vec<LogRecord>,
    size_bytes: usize,
}

impl Batch {
    #[must_use]
    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<LogRecord> {
        self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Encoded size including per-event overhead.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    fn push(&mut self, record: LogRecord, size: usize) {
        self.size_bytes += size;
        self.records.push(record);
    }
}

#[derive(Debug, Clone)]
pub struct BatchPlanner {
    max_batch_size: usize,
    max_batch_count: usize,
    event_overhead: usize,
}

impl Default for BatchPlanner {
    /// Planner with the CloudWatch Logs API limits.
    fn default() -> Self {
        Self {
            max_batch_size: constants::MAX_BATCH_SIZE,
            max_batch_count: constants::MAX_BATCH_COUNT,
            event_overhead: constants::LOG_EVENT_OVERHEAD,
        }
    }
}

impl BatchPlanner {
    /// Creates a planner with custom limits. Production code should use
    /// [`BatchPlanner::default()`].
    ///
    /// `max_batch_size` must be larger than `event_overhead`.
    #[must_use]
    pub fn new(max_batch_size: usize, max_batch_count: usize, event_overhead: usize) -> Self {
        Self {
            max_batch_size,
            max_batch_count,
            event_overhead,
        }
    }

    /// Partitions `records` into batches, preserving order.
    ///
    /// The last batch is always emitted, so an empty input yields exactly
    /// one empty batch.
    pub fn plan<I>(&self, records: I) -> Vec<Batch>
    where
        I: IntoIterator<Item = LogRecord>,
    {
        let mut batches = Vec::new();
        let mut batch = Batch::default();

        for mut record in records {
            if record.message.len() + self.event_overhead > self.max_batch_size {
                self.truncate(&mut record);
            }
            let size = record.message.len() + self.event_overhead;

            if batch.size_bytes + size > self.max_batch_size
                || batch.len() == self.max_batch_count
            {
                batches.push(std::mem::take(&mut batch));
            }
            batch.push(record, size);
        }
        batches.push(batch);
        batches
    }

    fn truncate(&self, record: &mut LogRecord) {
        let original = record.message.len();
        let mut limit = self.max_batch_size.saturating_sub(self.event_overhead);
        // Cut on a character boundary; at most 3 bytes short of the limit.
        while !record.message.is_char_boundary(limit) {
            limit -= 1;
        }
        record.message.truncate(limit);
        warn!(
            "Log message size {} exceeds max payload size, truncated to {} bytes",
            original, limit
        );
    }
}
