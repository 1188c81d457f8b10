//! 时间格式归一化
//!
//! Vendors report times in several layouts (and sometimes as epoch milliseconds).
//! Everything collected is rendered as `YYYY-MM-DD HH:MM:SS`; a value that cannot be
//! parsed becomes an empty string instead of failing the listing.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Output layout for every time field in the unified model.
pub const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One accepted input layout.
#[derive(Debug, Clone, Copy)]
pub enum TimeFormat {
    /// A `chrono` strftime pattern without offset information.
    Pattern(&'static str),
    /// RFC 3339 with an explicit offset.
    Rfc3339,
}

/// Parse `raw` against `formats` in order; the first layout that matches wins.
///
/// Returns an empty string when no layout matches.
pub fn normalize(raw: &str, formats: &[TimeFormat]) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    for format in formats {
        let formatted = match format {
            TimeFormat::Pattern(pattern) => NaiveDateTime::parse_from_str(raw, pattern)
                .ok()
                .map(|dt| dt.format(OUTPUT_FORMAT).to_string()),
            TimeFormat::Rfc3339 => DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.format(OUTPUT_FORMAT).to_string()),
        };
        if let Some(formatted) = formatted {
            return formatted;
        }
    }

    log::debug!("Unrecognized time value '{raw}'");
    String::new()
}

/// Render an epoch timestamp (seconds or milliseconds, auto-detected) in UTC.
///
/// Non-positive or out-of-range values yield an empty string.
pub fn from_epoch(ts: i64) -> String {
    if ts <= 0 {
        return String::new();
    }
    parse_unix_timestamp(ts)
        .map(|dt| dt.format(OUTPUT_FORMAT).to_string())
        .unwrap_or_default()
}

/// 解析 Unix 时间戳（自动判断秒/毫秒）
fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    // > 10^11 is treated as milliseconds (Aliyun reports milliseconds)
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}
