//! Shared after-hours window used by the audit risk scorer and the
//! policy engine's temporal flagging.

use time::OffsetDateTime;

/// First hour (inclusive) of the normal-access window.
pub const DAY_WINDOW_START_HOUR: u8 = 6;

/// First hour (inclusive) considered after-hours in the evening.
pub const DAY_WINDOW_END_HOUR: u8 = 22;

/// Returns `true` when the given instant falls outside the 06:00–22:00
/// window. The instant is read as supplied; callers pass local-offset time.
#[must_use]
pub fn is_after_hours(at: OffsetDateTime) -> bool {
    let hour = at.hour();
    hour < DAY_WINDOW_START_HOUR || hour >= DAY_WINDOW_END_HOUR
}
