// src/utils/timing.rs
use chrono::{DateTime, Timelike, Utc};

/// True when `now` lies within `tolerance_minutes` of an
/// `interval_minutes` mark, on either side.
/// Example: interval 30, tolerance 2 accepts 10:29-10:32 but not 10:15.
/// Guards against late or drifting scheduler triggers.
pub fn within_boundary(now: DateTime<Utc>, interval_minutes: u32, tolerance_minutes: u32) -> bool {
    if interval_minutes == 0 {
        return true;
    }
    let minutes_of_day = now.hour() * 60 + now.minute();
    let offset = minutes_of_day % interval_minutes;
    offset <= tolerance_minutes || interval_minutes - offset <= tolerance_minutes
}
