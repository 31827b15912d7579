//! Parsed form of the scene command language.

use crate::integrator::IntegrationMethod;
use crate::mesh::WebConfig;
use glam::DVec3;

/// One scene command. Indices refer to insertion order in the simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `create particles N`
    CreateParticles(usize),
    /// `particle I m x y z vx vy vz`
    Particle {
        index: usize,
        mass: f64,
        pos: DVec3,
        vel: DVec3,
    },
    /// `all_velocities vx vy vz`
    AllVelocities(DVec3),
    /// `create springs N`
    CreateSprings(usize),
    /// `link S I J ks kd rest`
    Link {
        spring: usize,
        particle_i: usize,
        particle_j: usize,
        ks: f64,
        kd: f64,
        rest_length: f64,
    },
    /// `integration METHOD dt`
    Integration {
        method: IntegrationMethod,
        timestep: f64,
    },
    /// `gravity g`, pointing down the Y axis
    Gravity(f64),
    /// `ground ks kd`
    Ground { ks: f64, kd: f64 },
    /// `web cx cy cz rings sides radius ks kd modifier`
    Web(WebConfig),
    /// `anchor I`
    Anchor(usize),
    /// `sticky`
    Sticky,
    /// `break`
    Break,
    /// `projectile m x y z vx vy vz`
    Projectile { mass: f64, pos: DVec3, vel: DVec3 },
}
