use super::LOG_TARGET;
use super::particles::{self, Particle, ParticleId};
use super::phase::{Phase, Variant};
use super::settings::Settings;
use super::status::{IDLE_MESSAGE, LEAK_MESSAGE, REPAIR_MESSAGE, status_message};
use super::surface::{Container, Control, Element, StateClass, Surface};
use super::timer::{ActiveTimer, TimerKind};
use core::fmt::{Debug, Formatter};
use core::time::Duration;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::sync::Arc;

/// Ceiling at which a leak is forced no matter where the threshold sits.
const FULL: f64 = 100.0;

/// Synthetic progress that fills, leaks, drains, and repairs on a loop.
pub struct SimulatedProgressDriver<S> {
    pub(super) surface: Arc<S>,
    pub(super) settings: Settings,
    pub(super) variant: Variant,
    pub(super) timer: ActiveTimer,
    pub(super) phase: Phase,
    pub(super) cycle_limit: Option<u64>,
    pub(super) cycles_completed: u64,
    pub(super) fill_ticks: u64,
    pub(super) drain_ticks: u64,
    rng: Pcg64,
    progress: f64,
    is_leaking: bool,
    is_running: bool,
    leak_threshold: f64,
    next_particle: u64,
}

impl<S: Surface + 'static> SimulatedProgressDriver<S> {
    /// Create an idle driver. Pass a seed to make the animation reproducible.
    #[must_use]
    pub fn new(surface: Arc<S>, settings: Settings, variant: Variant, seed: Option<u64>) -> Self {
        let rng = Pcg64::seed_from_u64(seed.unwrap_or_else(rand::random));
        let leak_threshold = settings.leak.initial_threshold;

        Self {
            surface,
            settings,
            variant,
            timer: ActiveTimer::new(),
            phase: Phase::Idle,
            cycle_limit: None,
            cycles_completed: 0,
            fill_ticks: 0,
            drain_ticks: 0,
            rng,
            progress: 0.0,
            is_leaking: false,
            is_running: false,
            leak_threshold,
            next_particle: 0,
        }
    }

    /// Stop running after this many completed leak cycles. Zero means never stop.
    #[must_use]
    pub const fn with_cycle_limit(mut self, cycles: u64) -> Self {
        self.cycle_limit = if cycles == 0 { None } else { Some(cycles) };
        self
    }

    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn is_leaking(&self) -> bool {
        self.is_leaking
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.is_running
    }

    #[must_use]
    pub const fn leak_threshold(&self) -> f64 {
        self.leak_threshold
    }

    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    #[must_use]
    pub const fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    /// The timer currently armed, if any.
    #[must_use]
    pub fn active_timer(&self) -> Option<TimerKind> {
        self.timer.kind()
    }

    /// Begin a fresh fill from zero.
    ///
    /// Returns `false` and does nothing if the driver is already running.
    pub fn start(&mut self) -> bool {
        if self.is_running {
            log::debug!(target: LOG_TARGET, "Start ignored, already {}", self.phase);
            return false;
        }

        self.is_running = true;
        self.progress = 0.0;
        self.is_leaking = false;
        self.clear_leak_visuals();

        self.surface.remove_class(Element::System, StateClass::SystemIdle);
        self.surface.set_control_visible(Control::Start, false);
        self.surface.set_control_visible(Control::Restart, false);
        self.surface.set_leak_position(self.leak_threshold);
        self.render_fill();
        self.surface.set_status(status_message(self.progress));

        log::info!(target: LOG_TARGET, "Starting {} animation, leak at {:.1}%", self.variant, self.leak_threshold);
        self.begin_filling();
        true
    }

    /// Put the driver in its resting state, showing the start control for the gated variant.
    pub(super) fn idle(&mut self, control: Control) {
        let _ = self.timer.cancel();
        self.phase = Phase::Idle;
        self.is_running = false;
        self.surface.add_class(Element::System, StateClass::SystemIdle);
        self.surface.set_status(IDLE_MESSAGE);
        self.surface.set_control_visible(control, true);
    }

    fn begin_filling(&mut self) {
        let fill = &self.settings.fill;
        let period = if fill.period_min < fill.period_max {
            self.rng.random_range(fill.period_min..fill.period_max)
        } else {
            fill.period_min
        };

        self.phase = Phase::Filling;
        self.surface.add_class(Element::InputLiquid, StateClass::Flowing);
        self.timer.arm(TimerKind::Fill, period);
    }

    /// One step of the fill loop. Returns `true` once the leak should spring.
    pub fn fill_tick(&mut self) -> bool {
        let fill = &self.settings.fill;
        let mut increment = self.rng.random::<f64>() * fill.increment_max;
        if self.rng.random_bool(fill.stutter_chance) {
            increment += fill.stutter_amount;
        }
        let bubble_chance = fill.bubble_chance;

        self.progress += increment;
        self.fill_ticks += 1;

        self.render_fill();
        self.surface.set_status(status_message(self.progress));

        if self.rng.random_bool(bubble_chance) {
            self.release_bubble(Container::Input);
        }

        log::trace!(target: LOG_TARGET, "Fill tick: {:.2}%", self.progress);
        self.progress >= self.leak_threshold || self.progress >= FULL
    }

    /// Spring the leak: switch the visuals over and start draining.
    pub fn trigger_leak(&mut self) {
        let _ = self.timer.cancel();
        self.phase = Phase::Leaking;
        self.is_leaking = true;

        log::debug!(target: LOG_TARGET, "Leak sprung at {:.2}% (threshold {:.2}%)", self.progress, self.leak_threshold);

        self.surface.set_status(LEAK_MESSAGE);
        self.surface.set_leak_visible(true);
        self.surface.add_class(Element::LeakIndicator, StateClass::HoleConnecting);
        self.surface.add_class(Element::LeakIndicator, StateClass::LeakingHole);
        self.surface.remove_class(Element::InputLiquid, StateClass::Flowing);
        self.surface.add_class(Element::OutputLiquid, StateClass::Flowing);
        if self.variant.shakes() {
            self.surface.add_class(Element::ProgressBar, StateClass::Shaking);
        }

        let leak = &self.settings.leak;
        let burst = self.rng.random_range(leak.drip_burst_min..=leak.drip_burst_max);
        let stagger = leak.drip_stagger;
        for i in 0..burst {
            self.release_drip(stagger * i);
        }

        self.phase = Phase::Draining;
        self.timer.arm(TimerKind::Drain, self.settings.drain.period);
    }

    /// One step of the drain loop. Returns `true` once the bar has drained to the floor.
    ///
    /// The status text is left alone while draining.
    pub fn drain_tick(&mut self) -> bool {
        let drain = &self.settings.drain;
        let mut decrement = self.rng.random_range(drain.decrement_min..=drain.decrement_max);
        if self.variant.slows_drain() && self.progress < drain.slow_below {
            decrement *= drain.slow_factor;
        }
        let (bubble_chance, drip_chance, floor) = (drain.bubble_chance, drain.drip_chance, drain.floor);

        self.progress -= decrement;
        self.drain_ticks += 1;

        self.render_fill();
        self.surface.set_liquid_level(Container::Output, self.progress);

        if self.rng.random_bool(bubble_chance) {
            self.release_bubble(Container::Output);
        }

        if self.rng.random_bool(drip_chance) {
            self.release_drip(Duration::ZERO);
        }

        log::trace!(target: LOG_TARGET, "Drain tick: {:.2}%", self.progress);
        self.progress <= floor
    }

    /// Clear the leak and wait out the repair delay.
    pub fn reset_system(&mut self) {
        let _ = self.timer.cancel();
        self.phase = Phase::Resetting;
        self.clear_leak_visuals();
        self.surface.set_status(REPAIR_MESSAGE);
        self.timer.arm(TimerKind::Repair, self.settings.leak.repair_delay);
    }

    /// The repair delay is over: pick a new leak spot, then refill or go idle.
    pub fn finish_reset(&mut self) {
        let _ = self.timer.cancel();
        self.is_leaking = false;
        self.cycles_completed += 1;

        let leak = &self.settings.leak;
        self.leak_threshold = if leak.threshold_min < leak.threshold_max {
            self.rng.random_range(leak.threshold_min..leak.threshold_max)
        } else {
            leak.threshold_min
        };
        self.surface.set_leak_position(self.leak_threshold);

        log::info!(
            target: LOG_TARGET,
            "Leak cycle {} patched, next leak at {:.1}%",
            self.cycles_completed,
            self.leak_threshold
        );

        if self.cycle_limit_reached() {
            // Nothing comes next, so don't offer a restart or arm another fill
            self.phase = Phase::Idle;
            self.is_running = false;
        } else if self.variant.auto_restarts() {
            self.begin_filling();
        } else {
            self.idle(Control::Restart);
        }
    }

    /// Whether the configured number of leak cycles has been completed.
    pub(super) fn cycle_limit_reached(&self) -> bool {
        self.cycle_limit.is_some_and(|limit| self.cycles_completed >= limit)
    }

    /// Dispatch a timer tick to the current phase.
    pub(super) fn on_timer(&mut self, kind: TimerKind) {
        match (self.phase, kind) {
            (Phase::Filling, TimerKind::Fill) => {
                if self.fill_tick() {
                    self.trigger_leak();
                }
            }
            (Phase::Draining, TimerKind::Drain) => {
                if self.drain_tick() {
                    self.reset_system();
                }
            }
            (Phase::Resetting, TimerKind::Repair) => self.finish_reset(),
            (phase, kind) => {
                log::warn!(target: LOG_TARGET, "Ignoring stray {kind} tick while {phase}");
            }
        }
    }

    fn render_fill(&self) {
        self.surface.set_progress(self.progress);
        self.surface.set_liquid_level(Container::Input, self.progress);
    }

    fn clear_leak_visuals(&self) {
        self.surface.set_leak_visible(false);
        self.surface.remove_class(Element::LeakIndicator, StateClass::LeakingHole);
        self.surface.remove_class(Element::LeakIndicator, StateClass::HoleConnecting);
        self.surface.remove_class(Element::OutputLiquid, StateClass::Flowing);
        self.surface.remove_class(Element::ProgressBar, StateClass::Shaking);
        self.surface.set_liquid_level(Container::Output, 0.0);
    }

    fn next_particle_id(&mut self) -> ParticleId {
        self.next_particle += 1;
        ParticleId(self.next_particle)
    }

    fn release_bubble(&mut self, container: Container) {
        let id = self.next_particle_id();
        let bubble = Particle::bubble(id, container, self.settings.particles.bubble_lifetime, &mut self.rng);
        particles::release(&self.surface, bubble, Duration::ZERO);
    }

    fn release_drip(&mut self, delay: Duration) {
        let id = self.next_particle_id();
        let drip = Particle::drip(id, self.settings.particles.drip_lifetime, &mut self.rng);
        particles::release(&self.surface, drip, delay);
    }
}

impl<S> SimulatedProgressDriver<S> {
    /// Force the progress value, for driving the state machine into a known spot.
    #[cfg(test)]
    pub(crate) const fn set_progress_for_test(&mut self, progress: f64) {
        self.progress = progress;
    }

    #[cfg(test)]
    pub(crate) const fn set_threshold_for_test(&mut self, threshold: f64) {
        self.leak_threshold = threshold;
    }
}

impl<S> Debug for SimulatedProgressDriver<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimulatedProgressDriver")
            .field("variant", &self.variant)
            .field("phase", &self.phase)
            .field("progress", &self.progress)
            .field("is_leaking", &self.is_leaking)
            .field("is_running", &self.is_running)
            .field("leak_threshold", &self.leak_threshold)
            .field("timer", &self.timer)
            .field("cycles_completed", &self.cycles_completed)
            .field("surface", &"<surface>")
            .finish_non_exhaustive()
    }
}
