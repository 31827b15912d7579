//! Test helper utilities for springweb tests

use crate::engine::Simulation;
use crate::particle::{Particle, ParticleId};
use crate::runtime::SimulationResult;
use crate::scene::{load_scene, Scene};
use glam::DVec3;
use std::fs;
use std::path::Path;

/// Check if two floating point values are approximately equal within tolerance
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Check if two vectors are approximately equal within tolerance
pub fn approx_eq_vec(a: DVec3, b: DVec3, tol: f64) -> bool {
    a.distance(b) <= tol
}

/// Load a scene from a file path
pub fn load_scene_file(path: impl AsRef<Path>) -> Result<Scene, Box<dyn std::error::Error>> {
    let src = fs::read_to_string(path)?;
    Ok(load_scene(&src)?)
}

/// Run a scene from a file path
pub fn run_scene_file(
    path: impl AsRef<Path>,
    frames: u64,
    frame_dt: f64,
) -> Result<SimulationResult, Box<dyn std::error::Error>> {
    let src = fs::read_to_string(path)?;
    Ok(crate::run_scene(&src, frames, frame_dt)?)
}

/// A simulation holding one particle at rest at `pos`
pub fn single_particle(mass: f64, pos: DVec3) -> (Simulation, ParticleId) {
    let mut sim = Simulation::new();
    let id = sim.push_particle(Particle::new(mass, pos, DVec3::ZERO));
    (sim, id)
}

/// Largest particle speed in the simulation
pub fn max_speed(sim: &Simulation) -> f64 {
    sim.particles().map(|(_, p)| p.vel.length()).fold(0.0, f64::max)
}

/// Compare two simulation results with tolerance
pub fn results_approx_equal(a: &SimulationResult, b: &SimulationResult, tol: f64) -> bool {
    if a.particles.len() != b.particles.len() || a.spring_count != b.spring_count {
        return false;
    }

    a.particles.iter().zip(b.particles.iter()).all(|(pa, pb)| {
        pa.id == pb.id && approx_eq_vec(pa.pos, pb.pos, tol) && approx_eq_vec(pa.vel, pb.vel, tol)
    })
}
