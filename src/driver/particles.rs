use super::LOG_TARGET;
use super::surface::{Container, StateClass, Surface};
use core::fmt::{Display, Formatter};
use core::time::Duration;
use rand::Rng;
use std::sync::Arc;
use strum::Display as StrumDisplay;

/// Identifies a live particle on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u64);

impl Display for ParticleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
pub enum ParticleKind {
    /// Rises inside a container
    Bubble,

    /// Falls out of the leak
    Drip,
}

/// A short-lived decorative element.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: ParticleId,
    pub kind: ParticleKind,
    pub container: Container,

    /// Diameter in pixels
    pub size: f64,

    /// Horizontal offset inside the container, in pixels
    pub offset: f64,

    pub lifetime: Duration,
}

impl Particle {
    /// A bubble with a random size and placement.
    pub fn bubble(id: ParticleId, container: Container, lifetime: Duration, rng: &mut impl Rng) -> Self {
        Self {
            id,
            kind: ParticleKind::Bubble,
            container,
            size: rng.random_range(2.0..5.0),
            offset: rng.random_range(5.0..20.0),
            lifetime,
        }
    }

    /// A drip falling from the leak into the output container.
    pub fn drip(id: ParticleId, lifetime: Duration, rng: &mut impl Rng) -> Self {
        Self {
            id,
            kind: ParticleKind::Drip,
            container: Container::Output,
            size: rng.random_range(4.0..7.0),
            offset: rng.random_range(8.0..17.0),
            lifetime,
        }
    }

    /// The state class the particle is drawn with, if any.
    #[must_use]
    pub const fn class(&self) -> Option<StateClass> {
        match self.kind {
            ParticleKind::Bubble => None,
            ParticleKind::Drip => Some(StateClass::Dripping),
        }
    }
}

/// Put a particle on the surface after `delay`, then take it off again once its lifetime is over.
///
/// The task is detached: nothing waits on it and nothing cancels it.
pub fn release<S>(surface: &Arc<S>, particle: Particle, delay: Duration)
where
    S: Surface + 'static,
{
    let surface = Arc::clone(surface);
    let _ = tokio::spawn(async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        surface.add_particle(&particle);
        tokio::time::sleep(particle.lifetime).await;

        if !surface.remove_particle(particle.id) {
            log::trace!(target: LOG_TARGET, "{} {} was already gone", particle.kind, particle.id);
        }
    });
}
