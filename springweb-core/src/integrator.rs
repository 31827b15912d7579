//! Numerical integration schemes.
//!
//! Every scheme is a pure function from the current kinematic state plus the
//! force accumulated this step to the next state. In all of them the new
//! acceleration is `ext_force / mass`; they differ in which acceleration and
//! velocity feed the position and velocity updates.

use glam::DVec3;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kinematic state of a particle going into an integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub pos: DVec3,
    /// Position one sub-step ago (only Verlet reads it).
    pub prev_pos: DVec3,
    pub vel: DVec3,
    /// Acceleration computed on the previous step.
    pub acc: DVec3,
}

/// Result of one integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub pos: DVec3,
    pub vel: DVec3,
    pub acc: DVec3,
}

/// The integration scheme used by a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntegrationMethod {
    /// Explicit Euler. Unstable for stiff spring systems; kept for comparison.
    Euler,
    /// Semi-implicit Euler.
    Symplectic,
    /// Störmer-Verlet. The default for web meshes.
    #[default]
    Verlet,
    VelocityVerlet,
}

impl IntegrationMethod {
    pub const ALL: [IntegrationMethod; 4] = [
        IntegrationMethod::Euler,
        IntegrationMethod::Symplectic,
        IntegrationMethod::Verlet,
        IntegrationMethod::VelocityVerlet,
    ];

    /// Name used by the command language.
    pub fn name(self) -> &'static str {
        match self {
            IntegrationMethod::Euler => "euler",
            IntegrationMethod::Symplectic => "symplectic",
            IntegrationMethod::Verlet => "verlet",
            IntegrationMethod::VelocityVerlet => "velocity_verlet",
        }
    }

    /// Advance `state` by `dt` under `ext_force`.
    pub fn integrate(self, state: &Kinematics, ext_force: DVec3, mass: f64, dt: f64) -> Step {
        match self {
            IntegrationMethod::Euler => euler(state, ext_force, mass, dt),
            IntegrationMethod::Symplectic => symplectic(state, ext_force, mass, dt),
            IntegrationMethod::Verlet => verlet(state, ext_force, mass, dt),
            IntegrationMethod::VelocityVerlet => velocity_verlet(state, ext_force, mass, dt),
        }
    }
}

impl fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown integration method '{0}' (expected euler, symplectic, verlet or velocity_verlet)")]
pub struct UnknownMethod(pub String);

impl FromStr for IntegrationMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntegrationMethod::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// Forward Euler: velocity from the previous step's acceleration, position
/// from the previous velocity.
pub fn euler(state: &Kinematics, ext_force: DVec3, mass: f64, dt: f64) -> Step {
    let acc = ext_force / mass;
    let vel = state.vel + state.acc * dt;
    let pos = state.pos + state.vel * dt;
    Step { pos, vel, acc }
}

/// Semi-implicit Euler: both updates use the freshly computed values.
pub fn symplectic(state: &Kinematics, ext_force: DVec3, mass: f64, dt: f64) -> Step {
    let acc = ext_force / mass;
    let vel = state.vel + acc * dt;
    let pos = state.pos + vel * dt;
    Step { pos, vel, acc }
}

/// Position Verlet. Velocity is only derived from the position difference
/// so the damping and ground terms have something to read next step.
pub fn verlet(state: &Kinematics, ext_force: DVec3, mass: f64, dt: f64) -> Step {
    let acc = ext_force / mass;
    let pos = 2.0 * state.pos - state.prev_pos + acc * (dt * dt);
    let vel = (pos - state.pos) / dt;
    Step { pos, vel, acc }
}

/// Velocity Verlet: position from the previous acceleration, velocity from
/// the average of the previous and new accelerations.
pub fn velocity_verlet(state: &Kinematics, ext_force: DVec3, mass: f64, dt: f64) -> Step {
    let acc = ext_force / mass;
    let pos = state.pos + state.vel * dt + state.acc * (dt * dt);
    let vel = state.vel + (state.acc + acc) * (dt / 2.0);
    Step { pos, vel, acc }
}
