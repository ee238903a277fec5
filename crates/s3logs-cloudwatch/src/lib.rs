// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! Delivery of S3-hosted CDN log files to CloudWatch Logs.
//!
//! ```text
//!   S3 object ──► tsv ──► record::Normalizer ──► batch::BatchPlanner
//!                                                        │
//!                                                        v
//!                                         delivery::DeliveryEngine ──► CloudWatch Logs
//! ```
//!
//! Mailed log archives take a separate path through
//! [`attachments::AttachmentExtractor`], which stores each MIME part back
//! to S3. Both pipelines are driven from [`handler::Handler`].

pub mod attachments;
pub mod batch;
pub mod cloudwatch;
pub mod config;
pub mod constants;
pub mod delivery;
pub mod error;
pub mod formats;
pub mod handler;
pub mod record;
pub mod storage;
pub mod tsv;

pub use error::Error;
