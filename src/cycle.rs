//! One wake-to-sleep cycle, as a pure function.
//!
//! The device restarts its instruction pointer every wake, so there is no
//! loop anywhere: the shell loads state and the event document, classifies
//! the wake cause, and hands everything to [`run_cycle`]. All hardware
//! interaction (storage power gating, panel refresh, wake arming) stays in
//! the shell; this module is what the tests drive.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarClock;
use crate::events::projector;
use crate::events::store::EventStore;
use crate::locale::Locale;
use crate::render::{RenderPlan, RenderPlanner, SurfaceSpec, TextMetrics};
use crate::wake::WakeCommand;

/// Which of the two layouts the panel shows. Survives deep sleep (RTC
/// memory) and battery swaps (persisted in the event document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Calendar,
    EventList,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Calendar => DisplayMode::EventList,
            DisplayMode::EventList => DisplayMode::Calendar,
        }
    }

    /// How many upcoming events the layout has room for.
    pub fn upcoming_cap(self) -> usize {
        match self {
            DisplayMode::Calendar => 3,
            DisplayMode::EventList => 6,
        }
    }
}

/// Everything the device remembers between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceState {
    pub clock: CalendarClock,
    pub mode: DisplayMode,
}

/// Result of one cycle: the state to retain in RTC memory, the frame to
/// paint, and whether the state must be written back to the card.
#[derive(Debug)]
pub struct CycleOutcome {
    pub state: DeviceState,
    pub plan: RenderPlan,
    pub persist: bool,
}

/// Runs the state transition and layout for one wake.
///
/// Ordering contract: the wake-cause mutation is applied first, and the
/// card's persisted record overrides `state` only on a cold boot. RTC
/// memory is authoritative across deep-sleep wakes, so a touch mutation
/// can never be clobbered by the reload.
pub fn run_cycle<M: TextMetrics>(
    state: DeviceState,
    command: WakeCommand,
    store: &EventStore,
    surface: SurfaceSpec,
    metrics: &M,
    locale: &Locale,
) -> CycleOutcome {
    let mut state = state;
    let mut persist = false;

    match command {
        WakeCommand::ColdBoot => {
            // Power was lost; RTC memory holds defaults. The card record,
            // when present, is the real state.
            if let Some(saved) = store.persisted_state() {
                state = saved;
            }
        }
        WakeCommand::AdvanceDay => {
            state.clock.advance();
            persist = true;
        }
        WakeCommand::RetreatDay => {
            state.clock.retreat();
            persist = true;
        }
        WakeCommand::ToggleMode => {
            state.mode = state.mode.toggled();
            persist = true;
        }
    }

    debug!(
        "cycle: {} ({:?}), persist={persist}",
        state.clock.date_label(),
        state.mode
    );

    let today = projector::today(store, &state.clock);
    let upcoming = projector::upcoming(store, &state.clock, state.mode.upcoming_cap());
    let plan = RenderPlanner::new(surface, metrics, locale).plan(&state, today, &upcoming);

    CycleOutcome {
        state,
        plan,
        persist,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::store::MemoryStorage;
    use crate::locale::POLISH;
    use crate::render::{FontTier, TextBounds};

    struct FlatMetrics;

    impl TextMetrics for FlatMetrics {
        fn measure(&self, text: &str, _tier: FontTier) -> TextBounds {
            TextBounds {
                offset_x: 0,
                width: text.chars().count() as u32 * 8,
            }
        }
    }

    fn loaded_store(json: &str) -> EventStore {
        EventStore::load(&mut MemoryStorage::new(json))
    }

    fn run(state: DeviceState, command: WakeCommand, store: &EventStore) -> CycleOutcome {
        run_cycle(
            state,
            command,
            store,
            SurfaceSpec::EPD_4IN2,
            &FlatMetrics,
            &POLISH,
        )
    }

    #[test]
    fn test_cold_boot_adopts_card_state_and_never_persists() {
        let store = loaded_store(
            r#"{"current_date": {"day": 9, "month": 7, "weekday": 4, "mode": "event_list"}}"#,
        );
        let outcome = run(DeviceState::default(), WakeCommand::ColdBoot, &store);
        assert!(!outcome.persist);
        assert_eq!(outcome.state.clock.day, 9);
        assert_eq!(outcome.state.clock.month, 7);
        assert_eq!(outcome.state.mode, DisplayMode::EventList);
        // The rendered header comes from the card record, not the default.
        assert!(outcome.plan.lines.iter().any(|l| l.text == "Nadchodzace"));
    }

    #[test]
    fn test_cold_boot_without_record_keeps_rtc_state() {
        let store = loaded_store(r#"{"01-01": ["Nowy Rok"]}"#);
        let state = DeviceState::default();
        let outcome = run(state, WakeCommand::ColdBoot, &store);
        assert!(!outcome.persist);
        assert_eq!(outcome.state, state);
    }

    #[test]
    fn test_timer_advance_mutates_and_persists() {
        let store = loaded_store("{}");
        let state = DeviceState {
            clock: CalendarClock {
                day: 28,
                month: 1,
                weekday: 6,
            },
            mode: DisplayMode::Calendar,
        };
        let outcome = run(state, WakeCommand::AdvanceDay, &store);
        assert!(outcome.persist);
        assert_eq!(outcome.state.clock.day, 1);
        assert_eq!(outcome.state.clock.month, 2);
    }

    #[test]
    fn test_touch_mutation_wins_over_card_record() {
        // The card says day 9, but this is a touch wake: RTC state (day 14)
        // mutates and the record is not reloaded.
        let store = loaded_store(r#"{"current_date": {"day": 9, "month": 7, "weekday": 4}}"#);
        let state = DeviceState {
            clock: CalendarClock {
                day: 14,
                month: 1,
                weekday: 2,
            },
            mode: DisplayMode::Calendar,
        };
        let outcome = run(state, WakeCommand::RetreatDay, &store);
        assert!(outcome.persist);
        assert_eq!(outcome.state.clock.day, 13);
        assert_eq!(outcome.state.clock.month, 1);
    }

    #[test]
    fn test_toggle_flips_mode_and_persists() {
        let store = loaded_store("{}");
        let outcome = run(DeviceState::default(), WakeCommand::ToggleMode, &store);
        assert!(outcome.persist);
        assert_eq!(outcome.state.mode, DisplayMode::EventList);

        let again = run(outcome.state, WakeCommand::ToggleMode, &store);
        assert_eq!(again.state.mode, DisplayMode::Calendar);
    }

    #[test]
    fn test_upcoming_cap_follows_mode() {
        // Ten events tomorrow: calendar shows 3 footer lines, list shows 6.
        let store = loaded_store(
            r#"{"02-15": ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]}"#,
        );
        let state = DeviceState {
            clock: CalendarClock {
                day: 14,
                month: 1,
                weekday: 2,
            },
            mode: DisplayMode::Calendar,
        };
        let outcome = run(state, WakeCommand::ColdBoot, &store);
        let footer = outcome.plan.lines.iter().filter(|l| l.y >= 252).count();
        assert_eq!(footer, 3);

        let list_state = DeviceState {
            mode: DisplayMode::EventList,
            ..state
        };
        let outcome = run(list_state, WakeCommand::ColdBoot, &store);
        let body = outcome.plan.lines.iter().filter(|l| l.y >= 110).count();
        assert_eq!(body, 6);
    }
}
