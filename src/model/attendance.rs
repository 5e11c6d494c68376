use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Format used when writing timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// One shift. Timestamps stay as raw strings so a single corrupt entry can be
/// skipped instead of failing the whole file.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "7c0d7a36-3f4e-4a55-9d6c-6f0b1e2d3c4b",
    "username": "barista1",
    "check_in": "2026-01-05T09:00:00.000000",
    "check_out": "2026-01-05T17:00:00.000000"
}))]
pub struct AttendanceRecord {
    pub id: String,
    pub username: String,
    pub check_in: String,
    #[serde(default)]
    pub check_out: Option<String>,
}

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Accepts ISO-8601 with `T` or a space, with or without fractional seconds.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    raw.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").ok())
}

impl AttendanceRecord {
    pub fn check_in_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.check_in)
    }

    /// `None` when missing; `Some(None)` when present but unparseable.
    pub fn check_out_at(&self) -> Option<Option<NaiveDateTime>> {
        self.check_out.as_deref().map(parse_timestamp)
    }

    pub fn check_in_date(&self) -> Option<NaiveDate> {
        self.check_in_at().map(|ts| ts.date())
    }
}
