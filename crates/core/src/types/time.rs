//! Epoch timestamp formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format Unix epoch seconds as `YYYY-MM-DDThh:mm:ssZ`.
///
/// Always UTC; there is no timezone parameter. Out-of-range values collapse
/// to the epoch itself rather than failing.
#[must_use]
pub fn epoch_to_iso8601(epoch_seconds: i64) -> String {
    DateTime::<Utc>::from_timestamp(epoch_seconds, 0)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}
