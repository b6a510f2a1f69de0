//! Reply texts and formatting.

use crate::clock::LocalTime;
use ohmytime_protocol::{BuildInfo, LocationRecord};

const ROBOT: &str = "\u{1F916}";
const DIRECT_HIT: &str = "\u{1F3AF}";
const CALENDAR: &str = "\u{1F4C5}";
const STOPWATCH: &str = "\u{23F1}\u{FE0F}";

/// Reply sent when a query has no hits.
pub const NOTHING_FOUND_TEXT: &str = "\u{1F916} Unfortunately, nothing was found";
/// Generic reply for failed handling.
pub const GENERIC_FAILURE_TEXT: &str = "Oops, something went wrong";

/// Prompt attached to a list of candidate locations.
pub fn pick_location_text() -> String {
    format!("{ROBOT} I got something! Pick a location! {DIRECT_HIT}")
}

/// Markdown welcome reply for the start command.
pub fn welcome_text(build: &BuildInfo) -> String {
    format!(
        "Hi, this is a bot{ROBOT} that shows the local time of the selected location\n\
         Write the name of the location and get result\n\n\
         *source code:* [github]({})",
        build.source_url
    )
}

/// Label shown for a location, `<name>(<region>)`.
pub fn location_label(record: &LocationRecord) -> String {
    format!("{}({})", record.name, record.body)
}

/// Markdown reply with the local date and time of a location.
pub fn time_reply(label: &str, local: &LocalTime) -> String {
    format!(
        "Hey {ROBOT}, local time in your location *{label}*:\n\n\
         {CALENDAR} *Date:* {}\n\n\
         {STOPWATCH} *Time:* {}",
        local.date, local.clock
    )
}
