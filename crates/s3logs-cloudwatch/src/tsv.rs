// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Tab-separated access log reader.
//!
//! CDN log files are plain text, one request per line, fields separated by
//! tabs in a fixed order that is not part of the file. Lines starting with
//! `#` are headers or comments.
//!
//! Values are taken verbatim between tabs: quote characters have no special
//! meaning, since LDS never quotes fields. Only empty lines are skipped; a
//! line holding nothing but whitespace is still a row and fails later when
//! its date and time cannot be read. Values beyond the configured names are
//! dropped rather than collected under an extra key.

use serde_json::{Map, Value};
use std::fmt::Write;

const FIELD_DELIMITER: char = '\t';
const COMMENT_PREFIX: char = '#';

/// One data line of the input, keyed by the configured field names.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based line number in the decoded input
    pub line: usize,
    pub fields: Map<String, Value>,
}

/// Decodes raw bytes as UTF-8, replacing every invalid byte with a `\xNN`
/// escape so that no part of a log line is silently dropped.
pub fn decode(data: &[u8]) -> String {
    let mut text = String::with_capacity(data.len());
    for chunk in data.utf8_chunks() {
        text.push_str(chunk.valid());
        for byte in chunk.invalid() {
            // Writing to a String cannot fail
            let _ = write!(text, "\\x{byte:02x}");
        }
    }
    text
}

/// Splits `text` into rows keyed by `field_names`.
///
/// Comment and empty lines are skipped. A line with fewer values than
/// names gets `null` for the missing ones; surplus values are ignored.
pub fn parse_rows(text: &str, field_names: &[String]) -> Vec<Row> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
        .map(|(index, line)| {
            let mut values = line.split(FIELD_DELIMITER);
            let fields = field_names
                .iter()
                .map(|name| {
                    let value = values
                        .next()
                        .map_or(Value::Null, |v| Value::String(v.to_string()));
                    (name.clone(), value)
                })
                .collect();
            Row {
                line: index + 1,
                fields,
            }
        })
        .collect()
}
