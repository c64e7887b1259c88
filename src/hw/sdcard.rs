//! SD-over-SPI mount and the byte-level view of the event file.
//!
//! The FAT volume is mounted for one cycle only; the card loses power
//! before the device sleeps. File access goes through `std::fs` on the
//! mounted VFS path, mapped onto the storage error taxonomy the core
//! degrades on.

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::Result;
use esp_idf_svc::fs::fatfs::Fatfs;
use esp_idf_svc::hal::gpio::{AnyIOPin, Gpio21};
use esp_idf_svc::hal::spi::SpiDriver;
use esp_idf_svc::io::vfs::MountedFatfs;
use esp_idf_svc::sd::{spi::SdSpiHostDriver, SdCardConfiguration, SdCardDriver};

const MOUNT_PATH: &str = "/sdcard";
const EVENT_FILE: &str = "/sdcard/events.json";
const MAX_OPEN_FILES: usize = 4;

use ekalendarz::events::store::{EventStorage, StorageError};

/// Mounts the card on the shared SPI bus. The returned handle unmounts on
/// drop, which happens before SD power is cut.
pub fn mount<'d>(
    spi: &'d SpiDriver<'d>,
    cs: Gpio21,
) -> Result<MountedFatfs<Fatfs<SdCardDriver<SdSpiHostDriver<'d, &'d SpiDriver<'d>>>>>> {
    let host = SdSpiHostDriver::new(
        spi,
        Some(cs),
        AnyIOPin::none(),
        AnyIOPin::none(),
        AnyIOPin::none(),
        None,
    )?;
    let card = SdCardDriver::new_spi(host, &SdCardConfiguration::new())?;
    let mounted = MountedFatfs::mount(Fatfs::new_sdcard(0, card)?, MOUNT_PATH, MAX_OPEN_FILES)?;
    Ok(mounted)
}

/// `EventStorage` over the event file on the mounted volume.
#[derive(Debug)]
pub struct EventFile {
    path: PathBuf,
}

impl Default for EventFile {
    fn default() -> Self {
        EventFile {
            path: PathBuf::from(EVENT_FILE),
        }
    }
}

impl EventStorage for EventFile {
    fn read(&mut self) -> Result<Vec<u8>, StorageError> {
        std::fs::read(&self.path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => StorageError::FileMissing,
            _ => StorageError::Unavailable,
        })
    }

    fn replace(&mut self, contents: &[u8]) -> Result<(), StorageError> {
        // Remove-then-recreate: the external writer expects a plain fresh
        // file, and FAT has no atomic rename worth leaning on here.
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(_) => return Err(StorageError::Unavailable),
        }
        std::fs::write(&self.path, contents).map_err(|_| StorageError::Unavailable)
    }
}
