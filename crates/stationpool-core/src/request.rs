use crate::error::{Error, Result};
use chrono::NaiveDateTime;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single passenger request: an origin station, a destination station
/// and a request time. Requests are never carried individually through a
/// model — they are aggregated into demand counts by the index mapping
/// builders (`stationpool-index`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Request {
    pub origin_id: i64,
    pub destination_id: i64,
    pub request_time: NaiveDateTime,
}

impl Request {
    pub fn new(origin_id: i64, destination_id: i64, request_time: NaiveDateTime) -> Self {
        Self {
            origin_id,
            destination_id,
            request_time,
        }
    }

    /// Parses the ISO-8601-ish `YYYY-MM-DD HH:MM:SS` wire format used at
    /// the input-data boundary (spec §6).
    pub fn parse_time(raw: &str) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(raw, TIME_FORMAT).map_err(|_| Error::MalformedRequest {
            reason: format!("unparseable request time {raw:?}, expected {TIME_FORMAT:?}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_format() {
        let t = Request::parse_time("2025-06-01 08:30:00").unwrap();
        assert_eq!(t.to_string(), "2025-06-01 08:30:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Request::parse_time("not-a-time").is_err());
    }
}
