//! The simulated progress driver
//!
//! Nothing real is being measured here. The driver owns a synthetic progress value
//! and walks it through a loop of phases:
//!
//! ```text
//!   Idle --start()--> Filling --threshold--> Leaking --> Draining --floor--> Resetting
//!                        ^                                                     |
//!                        +---------------- repair delay (auto variants) -------+
//! ```
//!
//! The gated variant returns to `Idle` after the repair delay instead of refilling.
//!
//! # Implementation Model
//!
//! [`SimulatedProgressDriver`] is an explicit state machine. The phases that wait on
//! time each own exactly one [`TimerKind`], held in an [`ActiveTimer`] slot that
//! cancels the previous timer whenever a new one is armed. The async
//! [`SimulatedProgressDriver::run`] loop multiplexes that timer with a [`Command`]
//! channel used for start/shutdown requests.
//!
//! Everything visual goes through the [`Surface`] trait. Particles (bubbles and drips)
//! are detached tokio tasks that add themselves to the surface and remove themselves
//! once their lifetime is over, independent of the main timer.

mod particles;
mod phase;
mod progress_driver;
mod runner;
mod settings;
mod status;
mod surface;
mod timer;

pub use particles::{Particle, ParticleId, ParticleKind};
pub use phase::{Phase, Variant};
pub use progress_driver::SimulatedProgressDriver;
pub use runner::{Command, RunSummary};
pub use settings::{DrainSettings, FillSettings, LeakSettings, ParticleSettings, Settings};
pub use status::{IDLE_MESSAGE, LEAK_MESSAGE, REPAIR_MESSAGE, STATUS_MESSAGES, status_index, status_message};
pub use surface::{Container, Control, Element, StateClass, Surface};
pub use timer::{ActiveTimer, TimerKind};

/// Log target shared by everything in the driver.
const LOG_TARGET: &str = "    driver";
