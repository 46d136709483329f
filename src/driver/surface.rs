use super::particles::{Particle, ParticleId};
use strum::{Display, EnumIter, IntoStaticStr};

/// The visual pieces the driver talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Element {
    /// The bar itself
    ProgressBar,

    /// Liquid in the container feeding the pipe
    InputLiquid,

    /// Liquid collecting under the leak
    OutputLiquid,

    /// The hole, positioned at the leak threshold
    LeakIndicator,

    /// The whole widget
    System,
}

/// State classes toggled on elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum StateClass {
    Flowing,
    LeakingHole,
    HoleConnecting,
    Dripping,
    SystemIdle,
    Shaking,
}

/// The two liquid containers at either end of the pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Container {
    Input,
    Output,
}

/// User-facing controls offered by the gated variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Control {
    Start,
    Restart,
}

/// Where the driver sends everything visual.
///
/// Methods take `&self` since particle tasks hold their own reference to the surface
/// and call into it from outside the driver.
pub trait Surface: Send + Sync {
    /// Update the fill bar and the percentage label.
    fn set_progress(&self, progress: f64);

    /// Replace the status text.
    fn set_status(&self, message: &str);

    /// Set how full a container looks, as a percentage.
    fn set_liquid_level(&self, container: Container, level: f64);

    /// Move the leak indicator to a position along the bar, as a percentage.
    fn set_leak_position(&self, position: f64);

    /// Show or hide the leak indicator.
    fn set_leak_visible(&self, visible: bool);

    fn add_class(&self, element: Element, class: StateClass);

    fn remove_class(&self, element: Element, class: StateClass);

    fn set_control_visible(&self, control: Control, visible: bool);

    fn add_particle(&self, particle: &Particle);

    /// Remove a particle, returning `false` if it was already gone.
    fn remove_particle(&self, id: ParticleId) -> bool;
}

/// Everything a [`RecordingSurface`] saw, in order.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Progress(f64),
    Status(String),
    LiquidLevel(Container, f64),
    LeakPosition(f64),
    LeakVisible(bool),
    AddClass(Element, StateClass),
    RemoveClass(Element, StateClass),
    ControlVisible(Control, bool),
    AddParticle(Particle),
    RemoveParticle(ParticleId, bool),
}

/// Test surface that records every call and tracks the resulting state.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    events: std::sync::Mutex<Vec<SurfaceEvent>>,
    classes: std::sync::Mutex<std::collections::HashSet<(Element, StateClass)>>,
    particles: std::sync::Mutex<Vec<Particle>>,
}

#[cfg(test)]
impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear_events(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn has_class(&self, element: Element, class: StateClass) -> bool {
        self.classes.lock().unwrap().contains(&(element, class))
    }

    pub fn live_particles(&self) -> Vec<Particle> {
        self.particles.lock().unwrap().clone()
    }

    pub fn last_status(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|event| match event {
            SurfaceEvent::Status(status) => Some(status),
            _ => None,
        })
    }

    fn record(&self, event: SurfaceEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
impl Surface for RecordingSurface {
    fn set_progress(&self, progress: f64) {
        self.record(SurfaceEvent::Progress(progress));
    }

    fn set_status(&self, message: &str) {
        self.record(SurfaceEvent::Status(message.to_string()));
    }

    fn set_liquid_level(&self, container: Container, level: f64) {
        self.record(SurfaceEvent::LiquidLevel(container, level));
    }

    fn set_leak_position(&self, position: f64) {
        self.record(SurfaceEvent::LeakPosition(position));
    }

    fn set_leak_visible(&self, visible: bool) {
        self.record(SurfaceEvent::LeakVisible(visible));
    }

    fn add_class(&self, element: Element, class: StateClass) {
        let _ = self.classes.lock().unwrap().insert((element, class));
        self.record(SurfaceEvent::AddClass(element, class));
    }

    fn remove_class(&self, element: Element, class: StateClass) {
        let _ = self.classes.lock().unwrap().remove(&(element, class));
        self.record(SurfaceEvent::RemoveClass(element, class));
    }

    fn set_control_visible(&self, control: Control, visible: bool) {
        self.record(SurfaceEvent::ControlVisible(control, visible));
    }

    fn add_particle(&self, particle: &Particle) {
        self.particles.lock().unwrap().push(particle.clone());
        self.record(SurfaceEvent::AddParticle(particle.clone()));
    }

    fn remove_particle(&self, id: ParticleId) -> bool {
        let removed = {
            let mut particles = self.particles.lock().unwrap();
            let before = particles.len();
            particles.retain(|p| p.id != id);
            particles.len() != before
        };
        self.record(SurfaceEvent::RemoveParticle(id, removed));
        removed
    }
}
