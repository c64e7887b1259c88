//! Core logic of a battery-powered e-ink wall calendar.
//!
//! The device shows the current date, weekday and upcoming events from an
//! SD card, then deep-sleeps until a 24 h timer or one of three touch pads
//! wakes it. Execution restarts from the top every wake, so everything here
//! is written as one pure load → classify → mutate → layout pass; the
//! hardware shell in the binary supplies storage, touch readings, the panel
//! and the sleep arming.

pub mod calendar;
pub mod cycle;
pub mod events;
pub mod locale;
pub mod render;
pub mod wake;

pub use calendar::CalendarClock;
pub use cycle::{run_cycle, CycleOutcome, DeviceState, DisplayMode};
pub use events::{EventStore, ProjectedEvent};
pub use render::{RenderPlan, SurfaceSpec};
pub use wake::{WakeCause, WakeCommand};
