//! Display strings as a swappable data table.
//!
//! All user-visible words live here rather than inline in the layout code,
//! so a different language is a new table, not a logic change. ASCII only:
//! the font tiers on the panel carry no Polish diacritics.

use crate::events::projector::ProjectedEvent;

/// Word table consumed by the render planner.
#[derive(Debug, Clone, Copy)]
pub struct Locale {
    /// Weekday names, Monday first, indexed by `CalendarClock::weekday`.
    pub weekdays: [&'static str; 7],
    /// Header of the event-list layout.
    pub list_header: &'static str,
    /// Prefix for today's event line in the event-list layout.
    pub today_label: &'static str,
    /// Full line shown when today has no events.
    pub no_events_today: &'static str,
    /// Prefix for an event exactly one day away.
    pub tomorrow_label: &'static str,
    /// Words around the day count in the calendar footer ("Za 5 dni ...").
    pub in_label: &'static str,
    pub days_label: &'static str,
    /// Word after the `+N` day count in the event-list layout.
    pub days_list_label: &'static str,
}

pub const POLISH: Locale = Locale {
    weekdays: [
        "Poniedzialek",
        "Wtorek",
        "Sroda",
        "Czwartek",
        "Piatek",
        "Sobota",
        "Niedziela",
    ],
    list_header: "Nadchodzace",
    today_label: "DZIS:",
    no_events_today: "Dzis: Brak wydarzen",
    tomorrow_label: "Jutro:",
    in_label: "Za",
    days_label: "dni",
    days_list_label: "dni:",
};

impl Locale {
    pub fn weekday_name(&self, weekday: u8) -> &'static str {
        self.weekdays[usize::from(weekday) % 7]
    }

    /// Today line for the event-list layout: `"DZIS: <text>"` or the
    /// no-events message.
    pub fn today_line(&self, event: Option<&str>) -> String {
        match event {
            Some(text) => format!("{} {}", self.today_label, text),
            None => self.no_events_today.to_string(),
        }
    }

    /// Calendar footer line: `"Jutro: <text>"` or `"Za <n> dni <text>"`.
    pub fn footer_line(&self, event: &ProjectedEvent) -> String {
        if event.days_away == 1 {
            format!("{} {}", self.tomorrow_label, event.text)
        } else {
            format!(
                "{} {} {} {}",
                self.in_label, event.days_away, self.days_label, event.text
            )
        }
    }

    /// Event-list line: `"Jutro: <text>"` or `"+<n> dni: <text>"`.
    pub fn list_line(&self, event: &ProjectedEvent) -> String {
        if event.days_away == 1 {
            format!("{} {}", self.tomorrow_label, event.text)
        } else {
            format!("+{} {} {}", event.days_away, self.days_list_label, event.text)
        }
    }
}
