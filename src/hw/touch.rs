//! Capacitive touch pads: per-cycle readings and deep-sleep wake arming.
//!
//! Three pads on GPIO 4/5/6 (touch sensor channels 4/5/6 on the S3). A pad
//! counts as touched while its raw reading sits below the shared threshold;
//! the same threshold arms the pads as wake sources before sleep.

use anyhow::Result;
use esp_idf_svc::hal::delay::Delay;
use esp_idf_svc::sys::{
    esp, esp_sleep_enable_touchpad_wakeup, touch_fsm_mode_t_TOUCH_FSM_MODE_TIMER,
    touch_pad_config, touch_pad_fsm_start, touch_pad_init, touch_pad_read_raw_data,
    touch_pad_set_fsm_mode, touch_pad_sleep_channel_enable, touch_pad_sleep_set_threshold,
    touch_pad_t, touch_pad_t_TOUCH_PAD_NUM4, touch_pad_t_TOUCH_PAD_NUM5,
    touch_pad_t_TOUCH_PAD_NUM6,
};
use log::debug;

use ekalendarz::wake::{TouchChannel, TouchChannels, CHANNEL_PRIORITY};

/// Shared touched/untouched boundary for readings and wake arming.
const TOUCH_THRESHOLD: u32 = 30_000;

/// Raw readings drift right after FSM start; give them a moment.
const SETTLE_MS: u32 = 50;

fn pad_of(channel: TouchChannel) -> touch_pad_t {
    match channel {
        TouchChannel::Mode => touch_pad_t_TOUCH_PAD_NUM4,
        TouchChannel::Advance => touch_pad_t_TOUCH_PAD_NUM5,
        TouchChannel::Retreat => touch_pad_t_TOUCH_PAD_NUM6,
    }
}

/// Handle over the initialized touch sensor block.
pub struct TouchPads {
    threshold: u32,
}

impl TouchPads {
    /// Brings the touch FSM up and configures all three channels.
    pub fn init() -> Result<Self> {
        unsafe {
            esp!(touch_pad_init())?;
            for channel in CHANNEL_PRIORITY {
                esp!(touch_pad_config(pad_of(channel)))?;
            }
            esp!(touch_pad_set_fsm_mode(touch_fsm_mode_t_TOUCH_FSM_MODE_TIMER))?;
            esp!(touch_pad_fsm_start())?;
        }
        Delay::default().delay_ms(SETTLE_MS);
        Ok(TouchPads {
            threshold: TOUCH_THRESHOLD,
        })
    }

    /// Registers every channel as a deep-sleep wake source with the same
    /// threshold classification uses.
    pub fn arm_wakeup(&mut self) -> Result<()> {
        unsafe {
            for channel in CHANNEL_PRIORITY {
                let pad = pad_of(channel);
                esp!(touch_pad_sleep_channel_enable(pad, true))?;
                esp!(touch_pad_sleep_set_threshold(pad, self.threshold))?;
            }
            esp!(esp_sleep_enable_touchpad_wakeup())?;
        }
        Ok(())
    }
}

impl TouchChannels for TouchPads {
    fn is_touched(&mut self, channel: TouchChannel) -> bool {
        let mut raw: u32 = 0;
        let read = unsafe { esp!(touch_pad_read_raw_data(pad_of(channel), &mut raw)) };
        if read.is_err() {
            return false;
        }
        debug!("touch {channel:?}: raw {raw} (threshold {})", self.threshold);
        raw < self.threshold
    }
}
