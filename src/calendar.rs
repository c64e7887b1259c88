//! Date arithmetic for the calendar face.
//!
//! The device tracks a *relative* day/month/weekday triple, not epoch time:
//! there is no year and no leap handling, February is 28 days unconditionally.
//! The triple lives in RTC memory across deep sleep and in the event document
//! across battery swaps; everything here is pure arithmetic on it.

use serde::{Deserialize, Serialize};

/// Fixed month lengths, January first. No leap years by design.
pub const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Builds the zero-padded `"MM-DD"` key used to index the event document.
///
/// The external document is written by a companion script with exactly this
/// key format, so the padding is load-bearing.
pub fn date_key(month: u8, day: u8) -> String {
    format!("{:02}-{:02}", u16::from(month) + 1, day)
}

/// The day/month/weekday triple the whole device revolves around.
///
/// Invariant: `day` is always within `month`'s fixed length, and `weekday`
/// moves in lockstep (mod 7) with every day step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarClock {
    /// 1-based day of month.
    pub day: u8,
    /// 0-based month index (0 = January).
    pub month: u8,
    /// 0-based weekday index (0 = Monday).
    pub weekday: u8,
}

impl Default for CalendarClock {
    /// First-ever-boot value, used before any state has been persisted.
    fn default() -> Self {
        CalendarClock {
            day: 1,
            month: 0,
            weekday: 3,
        }
    }
}

impl CalendarClock {
    /// Length of the given month per the fixed table.
    pub fn month_length(month: u8) -> u8 {
        DAYS_IN_MONTH[usize::from(month) % 12]
    }

    /// Whether the triple is in range; persisted records from the card are
    /// checked with this before they are trusted.
    pub fn is_valid(&self) -> bool {
        self.month < 12 && self.weekday < 7 && self.day >= 1 && self.day <= Self::month_length(self.month)
    }

    /// Steps one day forward, wrapping month (and silently, the year).
    pub fn advance(&mut self) {
        self.weekday = (self.weekday + 1) % 7;
        self.day += 1;
        if self.day > Self::month_length(self.month) {
            self.day = 1;
            self.month = (self.month + 1) % 12;
        }
    }

    /// Steps one day back. Weekday wraps to 6 explicitly (no negative modulo),
    /// and a month underflow lands on the *previous* month's last day.
    pub fn retreat(&mut self) {
        self.weekday = if self.weekday == 0 { 6 } else { self.weekday - 1 };
        if self.day == 1 {
            self.month = if self.month == 0 { 11 } else { self.month - 1 };
            self.day = Self::month_length(self.month);
        } else {
            self.day -= 1;
        }
    }

    /// `"DD.MM"` for the header, both parts 1-based and zero-padded.
    pub fn date_label(&self) -> String {
        format!("{:02}.{:02}", self.day, u16::from(self.month) + 1)
    }

    /// `"MM-DD"` event lookup key for the current position.
    pub fn date_key(&self) -> String {
        date_key(self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_within_month() {
        let mut clock = CalendarClock {
            day: 14,
            month: 1,
            weekday: 2,
        };
        clock.advance();
        assert_eq!(
            clock,
            CalendarClock {
                day: 15,
                month: 1,
                weekday: 3
            }
        );
    }

    #[test]
    fn test_advance_rolls_over_february_at_28() {
        let mut clock = CalendarClock {
            day: 28,
            month: 1,
            weekday: 0,
        };
        clock.advance();
        assert_eq!(clock.day, 1);
        assert_eq!(clock.month, 2);
        assert_eq!(clock.weekday, 1);
    }

    #[test]
    fn test_advance_wraps_december_into_january() {
        let mut clock = CalendarClock {
            day: 31,
            month: 11,
            weekday: 6,
        };
        clock.advance();
        assert_eq!(clock.day, 1);
        assert_eq!(clock.month, 0);
        assert_eq!(clock.weekday, 0);
    }

    #[test]
    fn test_retreat_lands_on_previous_month_length() {
        let mut clock = CalendarClock {
            day: 1,
            month: 2,
            weekday: 0,
        };
        clock.retreat();
        // February is fixed at 28.
        assert_eq!(clock.day, 28);
        assert_eq!(clock.month, 1);
        assert_eq!(clock.weekday, 6);
    }

    #[test]
    fn test_retreat_wraps_january_into_december() {
        let mut clock = CalendarClock {
            day: 1,
            month: 0,
            weekday: 3,
        };
        clock.retreat();
        assert_eq!(clock.day, 31);
        assert_eq!(clock.month, 11);
        assert_eq!(clock.weekday, 2);
    }

    #[test]
    fn test_advance_then_retreat_is_identity_everywhere() {
        // Inverse law over every valid (day, month), including month seams.
        for month in 0..12u8 {
            for day in 1..=CalendarClock::month_length(month) {
                let start = CalendarClock {
                    day,
                    month,
                    weekday: day % 7,
                };
                let mut clock = start;
                clock.advance();
                clock.retreat();
                assert_eq!(clock, start, "advance/retreat at {:?}", start);

                let mut clock = start;
                clock.retreat();
                clock.advance();
                assert_eq!(clock, start, "retreat/advance at {:?}", start);
            }
        }
    }

    #[test]
    fn test_weekday_tracks_day_count_mod_7() {
        let mut clock = CalendarClock::default();
        let initial = clock.weekday;
        for n in 1..=400u32 {
            clock.advance();
            assert_eq!(u32::from(clock.weekday), (u32::from(initial) + n) % 7);
            assert!(clock.is_valid());
        }
    }

    #[test]
    fn test_twelve_month_rollovers_respect_month_lengths() {
        let mut clock = CalendarClock {
            day: 1,
            month: 0,
            weekday: 0,
        };
        let total: u32 = DAYS_IN_MONTH.iter().map(|&d| u32::from(d)).sum();
        for _ in 0..total {
            clock.advance();
        }
        // A full synthetic year (365 days) returns to Jan 1.
        assert_eq!(clock.day, 1);
        assert_eq!(clock.month, 0);
        assert_eq!(u32::from(clock.weekday), total % 7);
    }

    #[test]
    fn test_key_and_label_are_zero_padded() {
        let clock = CalendarClock {
            day: 5,
            month: 2,
            weekday: 0,
        };
        assert_eq!(clock.date_key(), "03-05");
        assert_eq!(clock.date_label(), "05.03");
        assert_eq!(date_key(11, 24), "12-24");
    }
}
