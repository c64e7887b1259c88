//! Wake-cause classification.
//!
//! Every cycle starts with exactly one hardware wake cause. This module
//! reduces it to the single state-transition command applied that cycle:
//! the unattended 24 h timer rolls the date forward, the three touch
//! channels map to mode toggle / manual advance / manual retreat, and
//! anything else (reset button, battery insert) mutates nothing.

use log::info;

/// Hardware-reported reason execution resumed. Read once per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeCause {
    /// Power-on, reset, brownout — anything that is not timer or touch.
    PowerOn,
    Timer,
    Touch,
}

/// The one state transition a wake cycle performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeCommand {
    /// No mutation; loaded (or default) state is used as-is.
    ColdBoot,
    AdvanceDay,
    RetreatDay,
    ToggleMode,
}

/// Capacitive touch channels, listed in tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchChannel {
    Mode,
    Advance,
    Retreat,
}

/// Fixed priority: when several pads read as touched on the same wake, the
/// first in this order wins.
pub const CHANNEL_PRIORITY: [TouchChannel; 3] =
    [TouchChannel::Mode, TouchChannel::Advance, TouchChannel::Retreat];

impl TouchChannel {
    fn command(self) -> WakeCommand {
        match self {
            TouchChannel::Mode => WakeCommand::ToggleMode,
            TouchChannel::Advance => WakeCommand::AdvanceDay,
            TouchChannel::Retreat => WakeCommand::RetreatDay,
        }
    }
}

/// Per-channel touched/not-touched readings, behind a trait so the pads can
/// be faked in tests. The hardware side applies the same threshold here as
/// when arming the pads for wakeup.
pub trait TouchChannels {
    fn is_touched(&mut self, channel: TouchChannel) -> bool;
}

/// Maps the wake cause to the cycle's command.
///
/// On a touch wake the channels are polled in [`CHANNEL_PRIORITY`] order and
/// the first touched one decides; a touch wake where no channel still reads
/// as touched degrades to a no-op redraw.
pub fn classify<T: TouchChannels>(cause: WakeCause, touch: &mut T) -> WakeCommand {
    let command = match cause {
        WakeCause::Timer => WakeCommand::AdvanceDay,
        WakeCause::PowerOn => WakeCommand::ColdBoot,
        WakeCause::Touch => CHANNEL_PRIORITY
            .into_iter()
            .find(|channel| touch.is_touched(*channel))
            .map(TouchChannel::command)
            .unwrap_or(WakeCommand::ColdBoot),
    };
    info!("wake cause {cause:?} -> {command:?}");
    command
}
