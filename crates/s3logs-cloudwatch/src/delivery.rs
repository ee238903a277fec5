// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Sequential delivery of batches to one CloudWatch log stream.
//!
//! Every write must carry the sequence token returned by the previous
//! write, so batches are sent strictly one after another:
//!
//! ```text
//!   Idle ──► Sending(token) ──ok──► next batch / Done
//!                │  ▲
//!       conflict │  │ expected token from error
//!                ▼  │
//!          TokenConflict(token) ──attempts exhausted──► Failed
//! ```
//!
//! A token conflict is retried immediately with the token the service says
//! it expects, at most [`MAX_DELIVERY_ATTEMPTS`] times per batch. Any other
//! error, or a response reporting rejected events, aborts the call.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::batch::Batch;
use crate::cloudwatch::{LogsClient, PutLogEventsRequest};
use crate::constants::MAX_DELIVERY_ATTEMPTS;
use crate::error::DeliveryError;

/// Ordering position threaded through successive writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryState {
    pub sequence_token: Option<String>,
}

/// Summary of a successful delivery call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub batches: usize,
    pub events: usize,
    /// Token to use for the next write to the stream
    pub sequence_token: Option<String>,
}

#[derive(Clone)]
pub struct DeliveryEngine {
    client: Arc<dyn LogsClient>,
    log_group: String,
    log_stream: String,
    max_attempts: usize,
}

impl DeliveryEngine {
    pub fn new(
        client: Arc<dyn LogsClient>,
        log_group: impl Into<String>,
        log_stream: impl Into<String>,
    ) -> Self {
        Self {
            client,
            log_group: log_group.into(),
            log_stream: log_stream.into(),
            max_attempts: MAX_DELIVERY_ATTEMPTS,
        }
    }

    #[must_use]
    pub fn log_group(&self) -> &str {
        &self.log_group
    }

    #[must_use]
    pub fn log_stream(&self) -> &str {
        &self.log_stream
    }

    /// Sends `batches` in order. Stops at the first fatal error; batches
    /// sent before it stay delivered.
    pub async fn deliver(&self, batches: Vec<Batch>) -> Result<DeliveryReport, DeliveryError> {
        let mut state = DeliveryState::default();
        let mut report = DeliveryReport::default();

        for (batch_index, batch) in batches.iter().enumerate() {
            self.send_batch(batch_index, batch, &mut state).await?;
            report.batches += 1;
            report.events += batch.len();
        }

        info!(
            "DELIVERY | Delivered {} events in {} batches to {}/{}",
            report.events, report.batches, self.log_group, self.log_stream
        );
        report.sequence_token = state.sequence_token;
        Ok(report)
    }

    async fn send_batch(
        &self,
        batch_index: usize,
        batch: &Batch,
        state: &mut DeliveryState,
    ) -> Result<(), DeliveryError> {
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(
                "DELIVERY | Sending batch {} ({} events, {} bytes), attempt {}",
                batch_index,
                batch.len(),
                batch.size_bytes(),
                attempts
            );

            let request = PutLogEventsRequest {
                log_group: &self.log_group,
                log_stream: &self.log_stream,
                events: batch.records(),
                sequence_token: state.sequence_token.as_deref(),
            };

            match self.client.put_log_events(request).await {
                Ok(output) => {
                    if let Some(info) = output.rejected {
                        return Err(DeliveryError::Rejected { batch_index, info });
                    }
                    state.sequence_token = output.next_sequence_token;
                    return Ok(());
                }
                Err(err) if err.is_sequence_conflict() => {
                    let Some(expected) = err.expected_sequence_token().map(str::to_string) else {
                        return Err(DeliveryError::MissingSequenceToken {
                            batch_index,
                            source: err,
                        });
                    };
                    state.sequence_token = Some(expected);

                    if attempts >= self.max_attempts {
                        return Err(DeliveryError::RetriesExhausted {
                            batch_index,
                            attempts,
                            source: err,
                        });
                    }
                    warn!(
                        "DELIVERY | Batch {} hit {}, retrying with expected sequence token",
                        batch_index, err.code
                    );
                }
                Err(err) => {
                    return Err(DeliveryError::Service {
                        batch_index,
                        source: err,
                    });
                }
            }
        }
    }
}
