//! Countdown tick signals
//!
//! In automatic mode the open question runs a countdown driven by an
//! external one-second clock. The controller never owns that clock: after
//! each transition it re-derives whether a countdown is armed and, when the
//! armed countdown changed, asks the caller to schedule an [`AlarmMessage`]
//! one [`TICK_INTERVAL`] later.
//!
//! An alarm carries the countdown it was scheduled for. When it fires, it is
//! applied only if that countdown is still the armed one; anything else is a
//! stale signal from a closed question, a passed question or a mode switch.

use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Interval between two countdown ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// A scheduled countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlarmMessage {
    /// How many questions had been opened when the countdown was armed
    pub round: u64,
    /// The open question's number
    pub question: usize,
    /// Whether the question was in its pass phase
    pub passing: bool,
    /// Seconds left on the countdown when the tick was scheduled
    pub remaining: u32,
}
