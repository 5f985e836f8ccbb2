use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::{CoreError, Result};

/// Current UTC timestamp.
pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Parse an RFC 3339 timestamp as produced by the hosted backend.
pub fn parse_rfc3339(s: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(s, &Rfc3339)
        .map_err(|e| CoreError::invalid_date_time(format!("Failed to parse '{s}': {e}")))
}

/// Format a timestamp as RFC 3339 for the wire.
pub fn format_rfc3339(dt: OffsetDateTime) -> Result<String> {
    dt.format(&Rfc3339)
        .map_err(|e| CoreError::invalid_date_time(format!("Failed to format timestamp: {e}")))
}
