//! The on-card event document and its load/persist round trip.
//!
//! One JSON object holds everything: `"MM-DD"` keys mapping to arrays of
//! event texts, plus the reserved `current_date` record carrying the clock
//! triple and display mode. The document is shared with whatever writes the
//! events externally, so persisting rewrites the whole file (remove, then
//! recreate) instead of patching it in place.
//!
//! Nothing in here is fatal: a missing card, a missing file or a corrupt
//! document all degrade to an empty store and the cycle still renders.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::CalendarClock;
use crate::cycle::{DeviceState, DisplayMode};

/// Storage failure taxonomy. Callers only ever log these; every path
/// degrades to "no events today".
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage medium unavailable")]
    Unavailable,
    #[error("event file missing")]
    FileMissing,
    #[error("malformed event document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Byte-oriented access to the single event file. Injected so the medium
/// (SD card on device, memory buffer in tests) is swappable.
pub trait EventStorage {
    /// Reads the whole event file.
    fn read(&mut self) -> Result<Vec<u8>, StorageError>;

    /// Replaces the event file wholesale with `contents`.
    fn replace(&mut self, contents: &[u8]) -> Result<(), StorageError>;
}

/// The persisted `current_date` record. `mode` is optional in the document
/// so files written before mode toggling existed still load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct StateRecord {
    day: u8,
    month: u8,
    weekday: u8,
    #[serde(default)]
    mode: DisplayMode,
}

impl StateRecord {
    fn from_state(state: &DeviceState) -> Self {
        StateRecord {
            day: state.clock.day,
            month: state.clock.month,
            weekday: state.clock.weekday,
            mode: state.mode,
        }
    }

    /// Rejects out-of-range triples; the card is writable by anything.
    fn to_state(self) -> Option<DeviceState> {
        let clock = CalendarClock {
            day: self.day,
            month: self.month,
            weekday: self.weekday,
        };
        clock.is_valid().then_some(DeviceState {
            clock,
            mode: self.mode,
        })
    }
}

/// Serde shape of the whole document. Every key that is not the reserved
/// state record is a date key with its event texts in display order.
#[derive(Debug, Default, Serialize, Deserialize)]
struct EventDocument {
    #[serde(rename = "current_date", default, skip_serializing_if = "Option::is_none")]
    state: Option<StateRecord>,
    #[serde(flatten)]
    events: BTreeMap<String, Vec<String>>,
}

/// In-memory copy of the event document for one wake cycle.
#[derive(Debug, Default)]
pub struct EventStore {
    doc: EventDocument,
}

impl EventStore {
    /// Loads the document from `storage`. Never fails: on any storage or
    /// parse problem the store comes up empty and the failure is only logged.
    pub fn load<S: EventStorage>(storage: &mut S) -> Self {
        match Self::try_load(storage) {
            Ok(doc) => EventStore { doc },
            Err(err) => {
                warn!("event document unavailable, rendering blank: {err}");
                EventStore::default()
            }
        }
    }

    fn try_load<S: EventStorage>(storage: &mut S) -> Result<EventDocument, StorageError> {
        let bytes = storage.read()?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// All event texts stored under `key` (`"MM-DD"`), in display order.
    /// An absent key is an empty day, not an error.
    pub fn lookup(&self, key: &str) -> &[String] {
        self.doc.events.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The state record persisted in the document, if present and sane.
    /// This is the authoritative source on cold boot.
    pub fn persisted_state(&self) -> Option<DeviceState> {
        let record = self.doc.state?;
        let state = record.to_state();
        if state.is_none() {
            warn!(
                "ignoring out-of-range persisted state {:02}-{:02} weekday {}",
                record.month, record.day, record.weekday
            );
        }
        state
    }

    /// Writes `state` into the reserved record and rewrites the whole file.
    /// Call only when state actually changed; every write costs card wear
    /// and battery.
    pub fn persist_state<S: EventStorage>(
        &mut self,
        storage: &mut S,
        state: &DeviceState,
    ) -> Result<(), StorageError> {
        self.doc.state = Some(StateRecord::from_state(state));
        let bytes = serde_json::to_vec(&self.doc)?;
        storage.replace(&bytes)
    }
}

/// `Vec`-backed storage for tests and the host simulator. `None` contents
/// model a missing file.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    contents: Option<Vec<u8>>,
}

impl MemoryStorage {
    pub fn new(contents: impl Into<Vec<u8>>) -> Self {
        MemoryStorage {
            contents: Some(contents.into()),
        }
    }

    pub fn empty() -> Self {
        MemoryStorage::default()
    }

    pub fn contents(&self) -> Option<&[u8]> {
        self.contents.as_deref()
    }
}

impl EventStorage for MemoryStorage {
    fn read(&mut self) -> Result<Vec<u8>, StorageError> {
        self.contents.clone().ok_or(StorageError::FileMissing)
    }

    fn replace(&mut self, contents: &[u8]) -> Result<(), StorageError> {
        self.contents = Some(contents.to_vec());
        Ok(())
    }
}
