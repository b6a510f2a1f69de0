//! Timezone to local wall-clock conversion.

use crate::error::CoreError;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Date format, e.g. `07 Mar 2024`.
pub const DATE_FORMAT: &str = "%d %b %Y";
/// 24-hour clock without seconds.
pub const CLOCK_FORMAT: &str = "%H:%M";

/// Display-ready local date and clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTime {
    pub date: String,
    pub clock: String,
}

/// Convert an instant to the local date and clock of an IANA timezone.
pub fn local_time(timezone: &str, now: DateTime<Utc>) -> Result<LocalTime, CoreError> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| CoreError::InvalidTimezone(timezone.to_string()))?;
    let local = now.with_timezone(&tz);
    Ok(LocalTime {
        date: local.format(DATE_FORMAT).to_string(),
        clock: local.format(CLOCK_FORMAT).to_string(),
    })
}
