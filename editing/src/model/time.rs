//! Clock time arithmetic shared by the edit algorithms.
//!
//! Every value on the timeline is unsigned. Deltas are never stored as
//! signed numbers; instead a value is moved by the distance between two
//! positions with checked arithmetic, so an edit that would need a negative
//! result is detected before anything is written.

/// Unsigned position or span on the timeline, in clock ticks.
pub type ClockTime = u64;

/// Default number of clock ticks per second (nanoseconds).
pub const DEFAULT_TIMEBASE: u64 = 1_000_000_000;

/// Moves `value` by `to - from`, returning `None` if the result would be
/// negative or overflow.
pub fn shift(value: ClockTime, from: ClockTime, to: ClockTime) -> Option<ClockTime> {
    if to >= from {
        value.checked_add(to - from)
    } else {
        value.checked_sub(from - to)
    }
}

/// End of a span starting at `start`.
pub fn end_of(start: ClockTime, duration: ClockTime) -> Option<ClockTime> {
    start.checked_add(duration)
}

/// Formats a clock value as `h:mm:ss.fraction` for the given timebase.
pub fn format_time(value: ClockTime, timebase: u64) -> String {
    let timebase = timebase.max(1);
    let total_seconds = value / timebase;
    let fraction = value % timebase;
    let width = (timebase - 1).max(1).to_string().len();
    format!(
        "{}:{:02}:{:02}.{:0width$}",
        total_seconds / 3600,
        (total_seconds / 60) % 60,
        total_seconds % 60,
        fraction,
        width = width
    )
}
