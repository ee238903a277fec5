// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! In-memory stand-ins for S3 and CloudWatch Logs

use async_trait::async_trait;
use s3logs_cloudwatch::cloudwatch::{
    LogsClient, PutLogEventsOutput, PutLogEventsRequest, ServiceError,
};
use s3logs_cloudwatch::error::StorageError;
use s3logs_cloudwatch::record::LogRecord;
use s3logs_cloudwatch::storage::ObjectStore;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Object store keeping every object in a map
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
}

#[allow(dead_code)]
impl MemoryObjectStore {
    pub fn with_object(bucket: &str, key: &str, body: Vec<u8>) -> Self {
        let store = Self::default();
        store
            .objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body);
        store
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Keys stored in `bucket`, sorted
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        self.object(bucket, key).ok_or_else(|| StorageError::Get {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: "NoSuchKey: The specified key does not exist.".to_string(),
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<(), StorageError> {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }
}

/// A write as received by [`FakeLogsClient`]
#[derive(Debug, Clone)]
pub struct ReceivedWrite {
    pub log_group: String,
    pub log_stream: String,
    pub events: Vec<LogRecord>,
    pub sequence_token: Option<String>,
}

/// Logs client that enforces the sequence token protocol like the service
/// does, with optional scripted failures served before the protocol check.
#[derive(Default)]
pub struct FakeLogsClient {
    expected_token: Mutex<Option<String>>,
    failures: Mutex<VecDeque<ServiceError>>,
    writes: Mutex<Vec<ReceivedWrite>>,
}

#[allow(dead_code)]
impl FakeLogsClient {
    /// Client whose stream already holds data: the first write must carry
    /// `token`.
    pub fn with_expected_token(token: &str) -> Self {
        let client = Self::default();
        *client.expected_token.lock().unwrap() = Some(token.to_string());
        client
    }

    pub fn fail_next(&self, error: ServiceError) {
        self.failures.lock().unwrap().push_back(error);
    }

    pub fn writes(&self) -> Vec<ReceivedWrite> {
        self.writes.lock().unwrap().clone()
    }

    /// Events accepted by the stream, in order
    pub fn accepted_events(&self) -> Vec<LogRecord> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .flat_map(|write| write.events.clone())
            .collect()
    }
}

#[async_trait]
impl LogsClient for FakeLogsClient {
    async fn put_log_events(
        &self,
        request: PutLogEventsRequest<'_>,
    ) -> Result<PutLogEventsOutput, ServiceError> {
        if let Some(error) = self.failures.lock().unwrap().pop_front() {
            return Err(error);
        }

        let mut expected = self.expected_token.lock().unwrap();
        if request.sequence_token != expected.as_deref() {
            return Err(ServiceError::new(
                "InvalidSequenceTokenException",
                format!(
                    "The given sequenceToken is invalid. The next expected sequenceToken is: {}",
                    expected.as_deref().unwrap_or("null")
                ),
            ));
        }

        let mut writes = self.writes.lock().unwrap();
        writes.push(ReceivedWrite {
            log_group: request.log_group.to_string(),
            log_stream: request.log_stream.to_string(),
            events: request.events.to_vec(),
            sequence_token: request.sequence_token.map(str::to_string),
        });
        let next = format!("4959{:04}", writes.len());
        *expected = Some(next.clone());

        Ok(PutLogEventsOutput {
            next_sequence_token: Some(next),
            rejected: None,
        })
    }
}
