use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The phase the driver is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Phase {
    /// Waiting for `start()`; no timer is armed.
    Idle,

    /// Progress climbs toward the leak threshold on the fill timer.
    Filling,

    /// Transient phase while the leak visuals are being switched on.
    Leaking,

    /// Progress falls on the drain timer.
    Draining,

    /// Leak visuals are cleared and the repair timer is counting down.
    Resetting,
}

/// Which flavor of the animation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Deserialize, Serialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Variant {
    /// Loop forever: fill, leak, drain, repair, fill again
    #[default]
    Pipe,

    /// Stop after each repair and wait for an explicit restart
    Gated,

    /// Loop forever, shaking the bar while leaking and slowing the drain below half
    Shake,
}

impl Variant {
    /// Whether the animation kicks itself off and refills after each repair.
    #[must_use]
    pub const fn auto_restarts(self) -> bool {
        matches!(self, Self::Pipe | Self::Shake)
    }

    /// Whether the drain slows down in the lower half of the bar.
    #[must_use]
    pub const fn slows_drain(self) -> bool {
        matches!(self, Self::Shake)
    }

    /// Whether the bar carries the `shaking` class while leaking.
    #[must_use]
    pub const fn shakes(self) -> bool {
        matches!(self, Self::Shake)
    }
}
