//! End-to-end wake cycles against fake storage and fake text metrics:
//! the same load → classify → mutate → persist → plan sequence the
//! hardware shell runs, minus the hardware.

use ekalendarz::events::store::MemoryStorage;
use ekalendarz::locale::POLISH;
use ekalendarz::render::{FontTier, TextBounds, TextMetrics};
use ekalendarz::wake::{classify, TouchChannel, TouchChannels, WakeCause};
use ekalendarz::{run_cycle, CycleOutcome, DeviceState, DisplayMode, EventStore, SurfaceSpec};

struct FakeMetrics;

impl TextMetrics for FakeMetrics {
    fn measure(&self, text: &str, tier: FontTier) -> TextBounds {
        let advance = match tier {
            FontTier::Date => 36,
            FontTier::Title => 22,
            FontTier::Large => 16,
            FontTier::Medium => 11,
            FontTier::Small => 7,
        };
        TextBounds {
            offset_x: 1,
            width: text.chars().count() as u32 * advance,
        }
    }
}

struct Pads(Vec<TouchChannel>);

impl TouchChannels for Pads {
    fn is_touched(&mut self, channel: TouchChannel) -> bool {
        self.0.contains(&channel)
    }
}

/// One full cycle: load, classify, run, persist when asked.
fn cycle(
    storage: &mut MemoryStorage,
    rtc_state: DeviceState,
    cause: WakeCause,
    touched: Vec<TouchChannel>,
) -> CycleOutcome {
    let mut store = EventStore::load(storage);
    let command = classify(cause, &mut Pads(touched));
    let outcome = run_cycle(
        rtc_state,
        command,
        &store,
        SurfaceSpec::EPD_4IN2,
        &FakeMetrics,
        &POLISH,
    );
    if outcome.persist {
        store
            .persist_state(storage, &outcome.state)
            .expect("memory storage never fails");
    }
    outcome
}

#[test]
fn timer_wake_advances_persists_and_survives_power_loss() {
    let mut storage = MemoryStorage::new(
        r#"{
            "03-01": ["Pierwszy marca"],
            "current_date": {"day": 28, "month": 1, "weekday": 6}
        }"#,
    );

    // Cold boot adopts the card state.
    let boot = cycle(
        &mut storage,
        DeviceState::default(),
        WakeCause::PowerOn,
        vec![],
    );
    assert!(!boot.persist);
    assert_eq!(boot.state.clock.day, 28);
    assert_eq!(boot.state.clock.month, 1);

    // The nightly timer rolls Feb 28 into Mar 1 and persists.
    let morning = cycle(&mut storage, boot.state, WakeCause::Timer, vec![]);
    assert!(morning.persist);
    assert_eq!(morning.state.clock.day, 1);
    assert_eq!(morning.state.clock.month, 2);
    assert!(morning
        .plan
        .lines
        .iter()
        .any(|line| line.text == "Pierwszy marca"));

    // Battery swap: a fresh cold boot reads back exactly what was saved.
    let after_swap = cycle(
        &mut storage,
        DeviceState::default(),
        WakeCause::PowerOn,
        vec![],
    );
    assert_eq!(after_swap.state, morning.state);
}

#[test]
fn mode_toggle_round_trips_through_the_card() {
    let mut storage = MemoryStorage::new(r#"{}"#);

    let toggled = cycle(
        &mut storage,
        DeviceState::default(),
        WakeCause::Touch,
        vec![TouchChannel::Mode],
    );
    assert!(toggled.persist);
    assert_eq!(toggled.state.mode, DisplayMode::EventList);

    // Power loss after the toggle: the mode comes back from the card.
    let rebooted = cycle(
        &mut storage,
        DeviceState::default(),
        WakeCause::PowerOn,
        vec![],
    );
    assert_eq!(rebooted.state.mode, DisplayMode::EventList);
    assert!(rebooted
        .plan
        .lines
        .iter()
        .any(|line| line.text == "Nadchodzace"));
}

#[test]
fn touch_priority_resolves_mode_over_advance() {
    let mut storage = MemoryStorage::new(r#"{}"#);
    let state = DeviceState::default();

    let outcome = cycle(
        &mut storage,
        state,
        WakeCause::Touch,
        vec![TouchChannel::Advance, TouchChannel::Mode],
    );
    // Mode wins the tie-break: the date did not move.
    assert_eq!(outcome.state.clock, state.clock);
    assert_eq!(outcome.state.mode, DisplayMode::EventList);
}

#[test]
fn manual_retreat_then_advance_is_a_no_op_on_the_card() {
    let mut storage = MemoryStorage::new(
        r#"{"current_date": {"day": 1, "month": 2, "weekday": 0}}"#,
    );

    let boot = cycle(
        &mut storage,
        DeviceState::default(),
        WakeCause::PowerOn,
        vec![],
    );
    let back = cycle(
        &mut storage,
        boot.state,
        WakeCause::Touch,
        vec![TouchChannel::Retreat],
    );
    assert_eq!(back.state.clock.day, 28);
    assert_eq!(back.state.clock.month, 1);

    let forward = cycle(
        &mut storage,
        back.state,
        WakeCause::Touch,
        vec![TouchChannel::Advance],
    );
    assert_eq!(forward.state, boot.state);
}

#[test]
fn dead_card_still_renders_a_blank_calendar() {
    let mut storage = MemoryStorage::empty();
    let outcome = cycle(
        &mut storage,
        DeviceState::default(),
        WakeCause::PowerOn,
        vec![],
    );
    assert!(!outcome.persist);
    // Defaults render: weekday header and the date line are present.
    assert!(outcome.plan.lines.iter().any(|l| l.text == "Czwartek"));
    assert!(outcome.plan.lines.iter().any(|l| l.text == "01.01"));
}
