// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Extraction of mailed log archives.
//!
//! Akamai LDS can deliver logs by email: the subject carries the archive
//! name (`<name>.gzm`) and each MIME part holds one gzip file. Every part
//! with a payload is stored as its own object, named `<name><index>.gz`.

use mailparse::{MailHeaderMap, ParsedMail};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::constants::MAILED_ARCHIVE_SUFFIX;
use crate::error::AttachmentError;
use crate::storage::ObjectStore;

const CONTAINER_MAINTYPE: &str = "multipart/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Keys of the stored objects, in part order
    Stored { keys: Vec<String> },
    /// The message is not a mailed archive; nothing was stored
    Skipped { reason: String },
}

#[derive(Clone)]
pub struct AttachmentExtractor {
    store: Arc<dyn ObjectStore>,
}

impl AttachmentExtractor {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Stores every payload-bearing part of `payload` under
    /// `bucket`/`prefix + <derived name>`.
    pub async fn extract(
        &self,
        payload: &[u8],
        bucket: &str,
        prefix: &str,
    ) -> Result<ExtractOutcome, AttachmentError> {
        let mail = mailparse::parse_mail(payload)?;

        let subject = mail.headers.get_first_value("Subject");
        let Some(base_name) = subject
            .as_deref()
            .and_then(|s| s.strip_suffix(MAILED_ARCHIVE_SUFFIX))
        else {
            warn!("ATTACHMENTS | Invalid file, subject is: {subject:?}");
            return Ok(ExtractOutcome::Skipped {
                reason: format!("subject {subject:?} does not name a {MAILED_ARCHIVE_SUFFIX} archive"),
            });
        };

        let mut keys = Vec::new();
        for part in mail.parts().filter(|part| !is_container(part)) {
            let key = format!("{prefix}{}", part_name(base_name, keys.len()));
            let body = part.get_body_raw()?;
            debug!("ATTACHMENTS | Storing {} bytes at s3://{bucket}/{key}", body.len());
            self.store.put_object(bucket, &key, body).await?;
            keys.push(key);
        }

        info!("ATTACHMENTS | Extracted {} parts to s3://{bucket}/{prefix}", keys.len());
        Ok(ExtractOutcome::Stored { keys })
    }
}

/// `multipart/*` parts only group other parts.
fn is_container(part: &ParsedMail<'_>) -> bool {
    part.ctype
        .mimetype
        .to_ascii_lowercase()
        .starts_with(CONTAINER_MAINTYPE)
}

fn part_name(base_name: &str, index: usize) -> String {
    format!("{base_name}{index}.gz")
}
