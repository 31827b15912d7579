//! Point masses.
//!
//! A particle can be described a few fields at a time (the command language
//! does exactly that), so construction goes through [`ParticleBuilder`]. Only
//! a complete builder turns into a [`Particle`], which always carries every
//! field the integrators need.

use crate::integrator::{IntegrationMethod, Kinematics};
use glam::DVec3;
use std::fmt;

/// Stable handle to a particle inside a [`Simulation`](crate::engine::Simulation).
///
/// Particles are never removed, so a handle stays valid for the lifetime of
/// the simulation that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub usize);

impl ParticleId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Partially specified particle. Unset fields stay `None`; setting a field
/// twice keeps the latest value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParticleBuilder {
    pub mass: Option<f64>,
    pub pos: Option<DVec3>,
    pub vel: Option<DVec3>,
    pub acc: Option<DVec3>,
    pub ext_force: Option<DVec3>,
}

impl ParticleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn pos(mut self, pos: DVec3) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn vel(mut self, vel: DVec3) -> Self {
        self.vel = Some(vel);
        self
    }

    pub fn acc(mut self, acc: DVec3) -> Self {
        self.acc = Some(acc);
        self
    }

    pub fn ext_force(mut self, ext_force: DVec3) -> Self {
        self.ext_force = Some(ext_force);
        self
    }

    /// Copy every field that is set in `update` over this builder.
    pub fn merge(&mut self, update: &ParticleBuilder) {
        self.mass = update.mass.or(self.mass);
        self.pos = update.pos.or(self.pos);
        self.vel = update.vel.or(self.vel);
        self.acc = update.acc.or(self.acc);
        self.ext_force = update.ext_force.or(self.ext_force);
    }

    pub fn is_complete(&self) -> bool {
        self.finalize().is_some()
    }

    /// The finished particle, or `None` while any field is missing.
    pub fn finalize(&self) -> Option<Particle> {
        let pos = self.pos?;
        Some(Particle {
            mass: self.mass?,
            pos,
            prev_pos: pos,
            vel: self.vel?,
            acc: self.acc?,
            ext_force: self.ext_force?,
        })
    }
}

/// A fully initialized point mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub mass: f64,
    pub pos: DVec3,
    /// Position one sub-step ago.
    pub prev_pos: DVec3,
    pub vel: DVec3,
    /// Acceleration from the previous step.
    pub acc: DVec3,
    /// Force accumulated during the current step.
    pub ext_force: DVec3,
}

impl Particle {
    /// A particle at `pos` with zero acceleration and no accumulated force.
    pub fn new(mass: f64, pos: DVec3, vel: DVec3) -> Self {
        Self {
            mass,
            pos,
            prev_pos: pos,
            vel,
            acc: DVec3::ZERO,
            ext_force: DVec3::ZERO,
        }
    }

    /// Overwrite the fields set in `update`. Setting the position also
    /// resets `prev_pos`.
    pub fn set(&mut self, update: &ParticleBuilder) {
        if let Some(mass) = update.mass {
            self.mass = mass;
        }
        if let Some(pos) = update.pos {
            self.set_position(pos);
        }
        if let Some(vel) = update.vel {
            self.vel = vel;
        }
        if let Some(acc) = update.acc {
            self.acc = acc;
        }
        if let Some(ext_force) = update.ext_force {
            self.ext_force = ext_force;
        }
    }

    /// Teleport the particle, bypassing integration. Used to pin anchors.
    pub fn set_position(&mut self, pos: DVec3) {
        self.pos = pos;
        self.prev_pos = pos;
    }

    pub fn kinematics(&self) -> Kinematics {
        Kinematics {
            pos: self.pos,
            prev_pos: self.prev_pos,
            vel: self.vel,
            acc: self.acc,
        }
    }

    /// Integrate one sub-step using the force already accumulated in
    /// `ext_force`. The force itself is left in place.
    pub fn update(&mut self, dt: f64, method: IntegrationMethod) {
        let step = method.integrate(&self.kinematics(), self.ext_force, self.mass, dt);
        self.prev_pos = self.pos;
        self.pos = step.pos;
        self.vel = step.vel;
        self.acc = step.acc;
    }
}

/// A particle slot: still being described, or ready to simulate.
#[derive(Debug, Clone)]
pub(crate) enum ParticleSlot {
    Pending(ParticleBuilder),
    Ready(Particle),
}

impl ParticleSlot {
    pub(crate) fn new(builder: ParticleBuilder) -> Self {
        match builder.finalize() {
            Some(particle) => ParticleSlot::Ready(particle),
            None => ParticleSlot::Pending(builder),
        }
    }

    pub(crate) fn set(&mut self, update: &ParticleBuilder) {
        match self {
            ParticleSlot::Ready(particle) => particle.set(update),
            ParticleSlot::Pending(builder) => {
                builder.merge(update);
                if let Some(particle) = builder.finalize() {
                    *self = ParticleSlot::Ready(particle);
                }
            }
        }
    }

    pub(crate) fn ready(&self) -> Option<&Particle> {
        match self {
            ParticleSlot::Ready(particle) => Some(particle),
            ParticleSlot::Pending(_) => None,
        }
    }

    pub(crate) fn ready_mut(&mut self) -> Option<&mut Particle> {
        match self {
            ParticleSlot::Ready(particle) => Some(particle),
            ParticleSlot::Pending(_) => None,
        }
    }
}
