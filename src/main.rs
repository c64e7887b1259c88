//! Binary entry point.
//!
//! On the device this runs exactly one wake cycle and ends in deep sleep;
//! "the loop" is the hardware restarting us. On a host build the same core
//! runs once against an in-memory event document and prints the resulting
//! render plan, which is handy when tweaking layouts.

#[cfg(target_os = "espidf")]
mod hw;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    hw::run_one_cycle()
    // Unreachable: run_one_cycle ends in esp_deep_sleep_start.
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use ekalendarz::events::store::MemoryStorage;
    use ekalendarz::locale::POLISH;
    use ekalendarz::render::{FontTier, TextBounds, TextMetrics};
    use ekalendarz::{run_cycle, DeviceState, EventStore, SurfaceSpec, WakeCommand};

    /// Rough per-tier advances standing in for the panel's font metrics.
    struct HostMetrics;

    impl TextMetrics for HostMetrics {
        fn measure(&self, text: &str, tier: FontTier) -> TextBounds {
            let advance = match tier {
                FontTier::Date => 36,
                FontTier::Title => 22,
                FontTier::Large => 16,
                FontTier::Medium => 11,
                FontTier::Small => 7,
            };
            TextBounds {
                offset_x: 0,
                width: text.chars().count() as u32 * advance,
            }
        }
    }

    let mut storage = MemoryStorage::new(
        r#"{
            "02-15": ["Urodziny Ani"],
            "02-20": ["Dentysta", "Koncert"],
            "current_date": {"day": 14, "month": 1, "weekday": 2}
        }"#,
    );
    let store = EventStore::load(&mut storage);
    let outcome = run_cycle(
        DeviceState::default(),
        WakeCommand::ColdBoot,
        &store,
        SurfaceSpec::EPD_4IN2,
        &HostMetrics,
        &POLISH,
    );

    println!(
        "state: {} ({:?}), persist: {}",
        outcome.state.clock.date_label(),
        outcome.state.mode,
        outcome.persist
    );
    for rule in &outcome.plan.rules {
        println!("rule  {:?} -> {:?}", rule.from, rule.to);
    }
    for line in &outcome.plan.lines {
        println!("text  ({:3}, {:3}) {:?} {:?}", line.x, line.y, line.tier, line.text);
    }
    Ok(())
}
