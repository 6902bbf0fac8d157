use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a note's `created_at` into milliseconds since the Unix epoch.
///
/// Notes store either a pure date ("2026-02-16") or a full ISO datetime
/// ("2026-02-16T01:42:13Z"). Pure dates are UTC midnight, zone-less
/// datetimes are read as UTC. Anything unparseable is the epoch (0).
pub fn parse_timestamp_ms(value: &str) -> i64 {
    let value = value.trim();
    if value.is_empty() {
        return 0;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.timestamp_millis();
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return naive.and_utc().timestamp_millis();
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return midnight.and_utc().timestamp_millis();
        }
    }

    0
}

/// Same as [`parse_timestamp_ms`] for an optional field; absent is the epoch.
pub fn timestamp_or_epoch(value: Option<&str>) -> i64 {
    value.map(parse_timestamp_ms).unwrap_or(0)
}
