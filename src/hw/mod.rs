//! ESP32-S3 hardware shell: one wake cycle from resume to deep sleep.
//!
//! Everything stateful or slow lives here — SD power gating, the FAT mount,
//! the panel refresh, touch pads and wake arming — so the core stays pure.
//! The SD card is powered only for the load/persist window; the clock and
//! mode ride across deep sleep in RTC slow memory.

mod sdcard;
mod surface;
mod touch;

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use anyhow::{anyhow, Result};
use epd_waveshare::epd4in2::{Display4in2, Epd4in2};
use epd_waveshare::prelude::*;
use esp_idf_svc::hal::delay::Delay;
use esp_idf_svc::hal::gpio::PinDriver;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::prelude::*;
use esp_idf_svc::hal::reset::WakeupReason;
use esp_idf_svc::hal::spi;
use esp_idf_svc::sys;
use log::{info, warn};

use ekalendarz::calendar::CalendarClock;
use ekalendarz::cycle::{run_cycle, DeviceState, DisplayMode};
use ekalendarz::events::store::EventStore;
use ekalendarz::locale::POLISH;
use ekalendarz::render::SurfaceSpec;
use ekalendarz::wake::{self, WakeCause};

/// Unattended roll-forward period: one day.
const SLEEP_SECONDS: u64 = 24 * 60 * 60;

// Clock and mode retained in RTC slow memory across deep sleep. The
// initializers are only ever seen on a power-on reset, where the card's
// persisted record takes over anyway.
#[link_section = ".rtc.data"]
static RTC_DAY: AtomicU8 = AtomicU8::new(1);
#[link_section = ".rtc.data"]
static RTC_MONTH: AtomicU8 = AtomicU8::new(0);
#[link_section = ".rtc.data"]
static RTC_WEEKDAY: AtomicU8 = AtomicU8::new(3);
#[link_section = ".rtc.data"]
static RTC_EVENT_LIST: AtomicBool = AtomicBool::new(false);

fn load_rtc_state() -> DeviceState {
    let clock = CalendarClock {
        day: RTC_DAY.load(Ordering::Relaxed),
        month: RTC_MONTH.load(Ordering::Relaxed),
        weekday: RTC_WEEKDAY.load(Ordering::Relaxed),
    };
    if !clock.is_valid() {
        warn!("RTC memory held garbage, falling back to defaults");
        return DeviceState::default();
    }
    let mode = if RTC_EVENT_LIST.load(Ordering::Relaxed) {
        DisplayMode::EventList
    } else {
        DisplayMode::Calendar
    };
    DeviceState { clock, mode }
}

fn store_rtc_state(state: &DeviceState) {
    RTC_DAY.store(state.clock.day, Ordering::Relaxed);
    RTC_MONTH.store(state.clock.month, Ordering::Relaxed);
    RTC_WEEKDAY.store(state.clock.weekday, Ordering::Relaxed);
    RTC_EVENT_LIST.store(state.mode == DisplayMode::EventList, Ordering::Relaxed);
}

fn wake_cause() -> WakeCause {
    match WakeupReason::get() {
        WakeupReason::Timer => WakeCause::Timer,
        WakeupReason::Touchpad => WakeCause::Touch,
        _ => WakeCause::PowerOn,
    }
}

/// The whole life of the device between two deep sleeps. Ends in
/// `esp_deep_sleep_start` and does not return.
pub fn run_one_cycle() -> Result<()> {
    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;
    let mut delay = Delay::default();

    // Touch first: the pad readings that explain a touch wake are checked
    // before anything slow happens.
    let mut pads = touch::TouchPads::init()?;
    let command = wake::classify(wake_cause(), &mut pads);

    // SD power window opens.
    let mut sd_power = PinDriver::output(pins.gpio41)?;
    sd_power.set_high()?;
    delay.delay_ms(20);

    // One SPI bus shared by the SD card and the panel, separate CS lines.
    let spi = spi::SpiDriver::new(
        peripherals.spi2,
        pins.gpio12, // SCK
        pins.gpio11, // MOSI
        Some(pins.gpio13), // MISO
        &spi::SpiDriverConfig::new(),
    )?;

    let mounted = match sdcard::mount(&spi, pins.gpio21) {
        Ok(mounted) => Some(mounted),
        Err(err) => {
            // A missing or dead card means a blank calendar, not a halt.
            warn!("SD mount failed: {err}");
            None
        }
    };

    let mut event_file = sdcard::EventFile::default();
    let mut store = EventStore::load(&mut event_file);

    let fonts = surface::FontTable::new();
    let outcome = run_cycle(
        load_rtc_state(),
        command,
        &store,
        SurfaceSpec::EPD_4IN2,
        &fonts,
        &POLISH,
    );

    if outcome.persist {
        if let Err(err) = store.persist_state(&mut event_file, &outcome.state) {
            warn!("state not persisted, card will lag behind RTC: {err}");
        }
    }
    store_rtc_state(&outcome.state);

    // SD power window closes before the slow panel refresh starts.
    drop(mounted);
    sd_power.set_low()?;

    let mut epd_spi = spi::SpiDeviceDriver::new(
        &spi,
        Some(pins.gpio10),
        &spi::SpiConfig::new().baudrate(10.MHz().into()),
    )?;
    let busy = PinDriver::input(pins.gpio46)?;
    let dc = PinDriver::output(pins.gpio9)?;
    let rst = PinDriver::output(pins.gpio8)?;
    let mut epd = Epd4in2::new(&mut epd_spi, busy, dc, rst, &mut delay, None)
        .map_err(|err| anyhow!("panel init failed: {err:?}"))?;

    let mut display = Display4in2::default();
    surface::paint(&mut display, &outcome.plan, &fonts)?;
    epd.update_frame(&mut epd_spi, display.buffer(), &mut delay)
        .map_err(|err| anyhow!("frame upload failed: {err:?}"))?;
    epd.display_frame(&mut epd_spi, &mut delay)
        .map_err(|err| anyhow!("frame refresh failed: {err:?}"))?;
    epd.sleep(&mut epd_spi, &mut delay)
        .map_err(|err| anyhow!("panel sleep failed: {err:?}"))?;

    info!(
        "showing {}, arming wake sources and entering deep sleep",
        outcome.state.clock.date_label()
    );
    pads.arm_wakeup()?;
    unsafe {
        sys::esp!(sys::esp_sleep_enable_timer_wakeup(SLEEP_SECONDS * 1_000_000))?;
        sys::esp_deep_sleep_start();
    }
}
