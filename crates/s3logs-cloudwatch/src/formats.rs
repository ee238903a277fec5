// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Known log field layouts.

/// Akamai LDS "extended" layout plus custom field, ghost IP, cache status
/// and host header. `logdate` and `logtime` are merged into the record
/// timestamp and do not appear in the message.
pub const AKAMAI_EXTENDED_PLUS: &[&str] = &[
    "logdate",
    "logtime",
    "client-ip",
    "method",
    "uri",
    "src-status",
    "src-bytes",
    "time-taken",
    "referer",
    "user-agent",
    "cookie",
    "x-custom",
    "ghostip",
    "cache_status",
    "host-header",
];

pub const AKAMAI_EXTENDED_PLUS_NAME: &str = "akamai-extended-plus";

/// Resolves a format setting to a field list: either the name of a known
/// layout or a comma-separated list of field names.
pub fn field_names(format: &str) -> Vec<String> {
    match format.trim() {
        AKAMAI_EXTENDED_PLUS_NAME => AKAMAI_EXTENDED_PLUS
            .iter()
            .map(|name| (*name).to_string())
            .collect(),
        custom => custom
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
    }
}
