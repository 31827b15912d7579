//! Damped springs between two particles.

use crate::forces::viscoelastic_force;
use crate::particle::{Particle, ParticleId};
use glam::DVec3;
use std::fmt;

/// Stable handle to a spring. Ids are never reused, so a handle to a removed
/// spring simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpringId(pub u64);

impl fmt::Display for SpringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Partially specified spring.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpringBuilder {
    pub particle_i: Option<ParticleId>,
    pub particle_j: Option<ParticleId>,
    pub ks: Option<f64>,
    pub kd: Option<f64>,
    pub rest_length: Option<f64>,
}

impl SpringBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn between(mut self, particle_i: ParticleId, particle_j: ParticleId) -> Self {
        self.particle_i = Some(particle_i);
        self.particle_j = Some(particle_j);
        self
    }

    pub fn ks(mut self, ks: f64) -> Self {
        self.ks = Some(ks);
        self
    }

    pub fn kd(mut self, kd: f64) -> Self {
        self.kd = Some(kd);
        self
    }

    pub fn rest_length(mut self, rest_length: f64) -> Self {
        self.rest_length = Some(rest_length);
        self
    }

    pub fn merge(&mut self, update: &SpringBuilder) {
        self.particle_i = update.particle_i.or(self.particle_i);
        self.particle_j = update.particle_j.or(self.particle_j);
        self.ks = update.ks.or(self.ks);
        self.kd = update.kd.or(self.kd);
        self.rest_length = update.rest_length.or(self.rest_length);
    }

    pub fn is_complete(&self) -> bool {
        self.finalize().is_some()
    }

    pub fn finalize(&self) -> Option<Spring> {
        Some(Spring {
            particle_i: self.particle_i?,
            particle_j: self.particle_j?,
            ks: self.ks?,
            kd: self.kd?,
            rest_length: self.rest_length?,
        })
    }

    /// Endpoints that are already set.
    pub(crate) fn endpoints(&self) -> impl Iterator<Item = ParticleId> {
        self.particle_i.into_iter().chain(self.particle_j)
    }
}

/// A fully specified spring. The endpoints are handles into the owning
/// simulation's particle arena; the spring does not own them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub particle_i: ParticleId,
    pub particle_j: ParticleId,
    pub ks: f64,
    pub kd: f64,
    pub rest_length: f64,
}

impl Spring {
    pub fn new(particle_i: ParticleId, particle_j: ParticleId, ks: f64, kd: f64, rest_length: f64) -> Self {
        Self {
            particle_i,
            particle_j,
            ks,
            kd,
            rest_length,
        }
    }

    pub fn set(&mut self, update: &SpringBuilder) {
        if let Some(particle_i) = update.particle_i {
            self.particle_i = particle_i;
        }
        if let Some(particle_j) = update.particle_j {
            self.particle_j = particle_j;
        }
        if let Some(ks) = update.ks {
            self.ks = ks;
        }
        if let Some(kd) = update.kd {
            self.kd = kd;
        }
        if let Some(rest_length) = update.rest_length {
            self.rest_length = rest_length;
        }
    }

    /// Force on `particle_i`; `particle_j` receives its negation.
    pub fn force(&self, particle_i: &Particle, particle_j: &Particle) -> DVec3 {
        viscoelastic_force(particle_i, particle_j, self.ks, self.kd, self.rest_length)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum SpringSlot {
    Pending(SpringBuilder),
    Ready(Spring),
}

impl SpringSlot {
    pub(crate) fn new(builder: SpringBuilder) -> Self {
        match builder.finalize() {
            Some(spring) => SpringSlot::Ready(spring),
            None => SpringSlot::Pending(builder),
        }
    }

    pub(crate) fn set(&mut self, update: &SpringBuilder) {
        match self {
            SpringSlot::Ready(spring) => spring.set(update),
            SpringSlot::Pending(builder) => {
                builder.merge(update);
                if let Some(spring) = builder.finalize() {
                    *self = SpringSlot::Ready(spring);
                }
            }
        }
    }

    pub(crate) fn ready(&self) -> Option<&Spring> {
        match self {
            SpringSlot::Ready(spring) => Some(spring),
            SpringSlot::Pending(_) => None,
        }
    }
}
