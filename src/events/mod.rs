//! Event storage and projection.
//!
//! The sparse `"MM-DD"` → event-texts mapping lives in one JSON document on
//! the SD card, loaded once per wake cycle and rewritten wholesale on state
//! changes. Projection derives what the render layer actually shows: today's
//! event and the bounded upcoming-events window.

pub mod projector;
pub mod store;

pub use projector::{upcoming, ProjectedEvent, LOOKAHEAD_DAYS};
pub use store::{EventStorage, EventStore, MemoryStorage, StorageError};
