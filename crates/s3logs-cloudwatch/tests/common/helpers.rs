// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Fixture builders shared by the integration tests

use aws_lambda_events::event::s3::S3Event;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

pub const SOURCE_BUCKET: &str = "cdn-logs";

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// `ObjectCreated:Put` notification for `key` in [`SOURCE_BUCKET`]
pub fn s3_event(key: &str) -> S3Event {
    serde_json::from_value(serde_json::json!({
        "Records": [{
            "eventVersion": "2.1",
            "eventSource": "aws:s3",
            "awsRegion": "us-east-1",
            "eventTime": "2017-06-01T12:00:00.000Z",
            "eventName": "ObjectCreated:Put",
            "userIdentity": { "principalId": "AWS:EXAMPLE" },
            "requestParameters": { "sourceIPAddress": "127.0.0.1" },
            "responseElements": {},
            "s3": {
                "s3SchemaVersion": "1.0",
                "configurationId": "cdn-logs",
                "bucket": {
                    "name": SOURCE_BUCKET,
                    "ownerIdentity": { "principalId": "EXAMPLE" },
                    "arn": "arn:aws:s3:::cdn-logs"
                },
                "object": { "key": key, "size": 1024, "eTag": "0", "sequencer": "0" }
            }
        }]
    }))
    .unwrap()
}

/// One line in the Akamai extended-plus layout
pub fn akamai_line(date: &str, time: &str, uri: &str) -> String {
    [
        date,
        time,
        "203.0.113.7",
        "GET",
        uri,
        "200",
        "5120",
        "12",
        "-",
        "curl/7.54.0",
        "-",
        "-",
        "23.50.48.10",
        "HIT",
        "www.example.com",
    ]
    .join("\t")
}
