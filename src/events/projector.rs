//! Projection of the sparse event mapping onto the display window.

use crate::calendar::CalendarClock;
use crate::events::store::EventStore;

/// How far ahead the upcoming scan looks, in days.
pub const LOOKAHEAD_DAYS: u8 = 60;

/// One upcoming event, tagged with how many days away it is. Recomputed
/// every wake cycle, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedEvent {
    pub text: String,
    /// Offset from the clock's current day, 1..=[`LOOKAHEAD_DAYS`].
    pub days_away: u8,
}

/// First event text stored for the clock's current day, if any. Compact
/// layouts only surface one; the full list stays reachable via lookup.
pub fn today<'s>(store: &'s EventStore, clock: &CalendarClock) -> Option<&'s str> {
    store.lookup(&clock.date_key()).first().map(String::as_str)
}

/// Scans offsets 1..=60 past the clock and collects up to `max_count`
/// events in day order, store order within a day.
///
/// When the cap lands mid-day the rest of that day's events are dropped;
/// the returned `days_away` values are always non-decreasing.
pub fn upcoming(store: &EventStore, clock: &CalendarClock, max_count: usize) -> Vec<ProjectedEvent> {
    let mut found = Vec::new();
    let mut cursor = *clock;
    for offset in 1..=LOOKAHEAD_DAYS {
        if found.len() >= max_count {
            break;
        }
        // Same stepping as CalendarClock::advance; the weekday it also
        // moves is irrelevant here.
        cursor.advance();
        for text in store.lookup(&cursor.date_key()) {
            if found.len() >= max_count {
                break;
            }
            found.push(ProjectedEvent {
                text: text.clone(),
                days_away: offset,
            });
        }
    }
    found
}
