use crate::driver::{Container, Control, Element, Particle, ParticleId, StateClass, Surface};
use core::fmt::{Debug, Formatter};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use std::collections::HashSet;
use std::io::{IsTerminal, stderr};
use std::sync::Mutex;

/// Redraw rate for the bar (20 Hz); fill ticks arrive faster than this.
const REFRESH_HZ: u8 = 20;

const TEMPLATE: &str = "{prefix:>10.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}% {msg}";
const TEMPLATE_NO_COLOR: &str = "{prefix:>10} [{bar:40}] {pos:>3}% {msg}";
const SHAKING_TEMPLATE: &str = "{prefix:>10.bold.red} [{bar:40.red/blue}] {pos:>3}% {msg}";

const FLOWING_CHARS: &str = "=> ";
const SHAKING_CHARS: &str = "~< ";

/// Width of the little output tank drawn while the leak is pooling.
const TANK_WIDTH: usize = 5;

#[derive(Debug, Default)]
struct SurfaceState {
    status: String,
    leak_position: f64,
    leak_visible: bool,
    output_level: f64,
    classes: HashSet<(Element, StateClass)>,
    particles: Vec<Particle>,
}

impl SurfaceState {
    fn has(&self, element: Element, class: StateClass) -> bool {
        self.classes.contains(&(element, class))
    }

    fn phase_label(&self) -> &'static str {
        if self.has(Element::System, StateClass::SystemIdle) {
            "Idle"
        } else if self.has(Element::LeakIndicator, StateClass::LeakingHole) {
            "Leaking"
        } else if self.has(Element::InputLiquid, StateClass::Flowing) {
            "Flowing"
        } else {
            "Repairing"
        }
    }
}

/// Draws the animation as an `indicatif` bar on stderr.
pub struct TerminalSurface {
    bar: ProgressBar,
    state: Mutex<SurfaceState>,
    use_colors: bool,
}

impl TerminalSurface {
    /// Create a surface drawing to stderr, or drawing nowhere when stderr is not a terminal.
    #[must_use]
    pub fn new(use_colors: bool) -> Self {
        let target = if stderr().is_terminal() {
            ProgressDrawTarget::stderr_with_hz(REFRESH_HZ)
        } else {
            ProgressDrawTarget::hidden()
        };

        Self::with_target(target, use_colors)
    }

    fn with_target(target: ProgressDrawTarget, use_colors: bool) -> Self {
        let bar = ProgressBar::with_draw_target(Some(100), target);
        let surface = Self {
            bar,
            state: Mutex::new(SurfaceState::default()),
            use_colors,
        };
        surface.set_style(false);
        surface
    }

    /// Clear the bar off the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn set_style(&self, shaking: bool) {
        let (template, chars) = match (self.use_colors, shaking) {
            (true, true) => (SHAKING_TEMPLATE, SHAKING_CHARS),
            (true, false) => (TEMPLATE, FLOWING_CHARS),
            (false, true) => (TEMPLATE_NO_COLOR, SHAKING_CHARS),
            (false, false) => (TEMPLATE_NO_COLOR, FLOWING_CHARS),
        };

        self.bar.set_style(
            ProgressStyle::default_bar()
                .template(template)
                .expect("could not create progress bar style")
                .progress_chars(chars),
        );
    }

    /// Apply a change to the state and refresh prefix and message from it.
    fn update(&self, change: impl FnOnce(&mut SurfaceState)) {
        let mut state = self.state.lock().expect("lock poisoned");
        change(&mut state);
        self.bar.set_prefix(state.phase_label());
        self.bar.set_message(compose_message(&state, self.use_colors));
    }
}

/// Status text followed by the leak marker, the output tank, and any live particles.
fn compose_message(state: &SurfaceState, use_colors: bool) -> String {
    let mut message = state.status.clone();

    if state.leak_visible {
        let marker = format!("(leak @ {:.0}%)", state.leak_position);
        message.push_str("  ");
        if use_colors {
            message.push_str(&marker.red().to_string());
        } else {
            message.push_str(&marker);
        }
    }

    if state.has(Element::OutputLiquid, StateClass::Flowing) {
        message.push_str("  ");
        message.push_str(&tank(state.output_level));
    }

    if !state.particles.is_empty() {
        let glyphs: String = state.particles.iter().map(particle_glyph).collect();
        message.push_str("  ");
        if use_colors {
            message.push_str(&glyphs.blue().to_string());
        } else {
            message.push_str(&glyphs);
        }
    }

    message
}

fn particle_glyph(particle: &Particle) -> char {
    match (particle.class(), particle.container) {
        (Some(StateClass::Dripping), _) => '\'',
        (_, Container::Input) => 'o',
        (_, Container::Output) => '°',
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss, reason = "level is clamped to a few cells first")]
fn tank(level: f64) -> String {
    let cells = ((level.clamp(0.0, 100.0) / 100.0) * TANK_WIDTH as f64).round() as usize;
    format!("[{:<width$}]", "~".repeat(cells), width = TANK_WIDTH)
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "value is rounded and clamped to 0..=100 first")]
fn percent(progress: f64) -> u64 {
    if progress.is_nan() {
        0
    } else {
        progress.round().clamp(0.0, 100.0) as u64
    }
}

impl Surface for TerminalSurface {
    fn set_progress(&self, progress: f64) {
        self.bar.set_position(percent(progress));
    }

    fn set_status(&self, message: &str) {
        self.update(|state| message.clone_into(&mut state.status));
    }

    fn set_liquid_level(&self, container: Container, level: f64) {
        // The input container is the bar itself
        if container == Container::Output {
            self.update(|state| state.output_level = level);
        }
    }

    fn set_leak_position(&self, position: f64) {
        self.update(|state| state.leak_position = position);
    }

    fn set_leak_visible(&self, visible: bool) {
        self.update(|state| state.leak_visible = visible);
    }

    fn add_class(&self, element: Element, class: StateClass) {
        if (element, class) == (Element::ProgressBar, StateClass::Shaking) {
            self.set_style(true);
        }
        self.update(|state| {
            let _ = state.classes.insert((element, class));
        });
    }

    fn remove_class(&self, element: Element, class: StateClass) {
        if (element, class) == (Element::ProgressBar, StateClass::Shaking) {
            self.set_style(false);
        }
        self.update(|state| {
            let _ = state.classes.remove(&(element, class));
        });
    }

    fn set_control_visible(&self, control: Control, visible: bool) {
        if visible {
            let verb = match control {
                Control::Start => "start",
                Control::Restart => "restart",
            };
            self.bar.suspend(|| eprintln!("Press Enter to {verb}, or type q and Enter to quit"));
        }
    }

    fn add_particle(&self, particle: &Particle) {
        self.update(|state| state.particles.push(particle.clone()));
    }

    fn remove_particle(&self, id: ParticleId) -> bool {
        let mut removed = false;
        self.update(|state| {
            let before = state.particles.len();
            state.particles.retain(|p| p.id != id);
            removed = state.particles.len() != before;
        });
        removed
    }
}

impl Debug for TerminalSurface {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TerminalSurface")
            .field("bar", &self.bar)
            .field("state", &self.state)
            .field("use_colors", &self.use_colors)
            .finish()
    }
}
