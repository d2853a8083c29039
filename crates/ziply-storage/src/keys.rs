//! Storage key construction.
//!
//! Keys have the shape `{unix_millis}-{short_id}-{sanitized_name}` so a blob
//! can always be traced back to the share it was uploaded for.

use chrono::{DateTime, Utc};

const MAX_NAME_LEN: usize = 128;

/// Replace anything outside `[A-Za-z0-9._-]` with `_` and cap the length.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build the storage key for a file uploaded for `short_id`.
pub fn build_storage_key(short_id: &str, file_name: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}-{}-{}",
        now.timestamp_millis(),
        short_id,
        sanitize_file_name(file_name)
    )
}

/// Whether `key` was issued for `short_id`.
pub fn key_belongs_to(key: &str, short_id: &str) -> bool {
    let Some((millis, rest)) = key.split_once('-') else {
        return false;
    };
    !millis.is_empty()
        && millis.bytes().all(|b| b.is_ascii_digit())
        && rest
            .strip_prefix(short_id)
            .is_some_and(|tail| tail.starts_with('-') && tail.len() > 1)
}
