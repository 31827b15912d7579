//! Projectiles that glue themselves to whatever they touch.

use crate::engine::Simulation;
use crate::particle::{Particle, ParticleId};
use crate::spring::{Spring, SpringId};
use crate::topology::TopologyModule;
use std::collections::HashSet;

/// Distance under which a projectile sticks to a particle.
pub const STICK_DISTANCE: f64 = 0.2;
pub const STICK_KS: f64 = 10_000.0;
pub const STICK_KD: f64 = 1.0;

/// Binds registered projectiles to nearby particles with stiff, short springs.
///
/// A particle is bonded at most once: the first projectile found within
/// [`STICK_DISTANCE`] (in particle insertion order) wins and the particle is
/// never considered again.
#[derive(Debug, Clone, Default)]
pub struct StickyModule {
    projectiles: Vec<ParticleId>,
    stuck: HashSet<ParticleId>,
    springs: Vec<SpringId>,
}

impl StickyModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `particle` to the simulation and register it as a projectile.
    pub fn add_projectile(&mut self, sim: &mut Simulation, particle: Particle) -> ParticleId {
        let id = sim.push_particle(particle);
        self.register_projectile(id);
        id
    }

    /// Register a particle that is already part of the simulation.
    pub fn register_projectile(&mut self, id: ParticleId) {
        if !self.projectiles.contains(&id) {
            self.projectiles.push(id);
        }
    }

    pub fn projectiles(&self) -> &[ParticleId] {
        &self.projectiles
    }

    pub fn is_stuck(&self, id: ParticleId) -> bool {
        self.stuck.contains(&id)
    }

    /// Springs created by this module so far.
    pub fn springs(&self) -> &[SpringId] {
        &self.springs
    }

    fn find_bonds(&mut self, sim: &Simulation) -> Vec<Spring> {
        let mut bonds = Vec::new();
        for (id, particle) in sim.particles() {
            if self.projectiles.contains(&id) {
                continue;
            }
            for &proj_id in &self.projectiles {
                if self.stuck.contains(&id) {
                    break;
                }
                let Some(projectile) = sim.particle(proj_id) else {
                    continue;
                };
                if projectile.pos.distance(particle.pos) < STICK_DISTANCE {
                    bonds.push(Spring::new(id, proj_id, STICK_KS, STICK_KD, STICK_DISTANCE));
                    self.stuck.insert(id);
                }
            }
        }
        bonds
    }
}

impl TopologyModule for StickyModule {
    fn name(&self) -> &'static str {
        "sticky"
    }

    fn modify_sim(&mut self, sim: &mut Simulation) -> usize {
        let bonds = self.find_bonds(sim);
        let mut formed = 0;
        for bond in bonds {
            match sim.push_spring(bond) {
                Ok(id) => {
                    ftlog::info!(
                        "particle {} stuck to projectile {}",
                        bond.particle_i,
                        bond.particle_j
                    );
                    self.springs.push(id);
                    formed += 1;
                }
                Err(e) => ftlog::warn!("could not create sticky spring: {}", e),
            }
        }
        formed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn at(x: f64) -> Particle {
        Particle::new(1.0, DVec3::new(x, 1.0, 0.0), DVec3::ZERO)
    }

    #[test]
    fn add_projectile_registers_and_inserts() {
        let mut sim = Simulation::new();
        let mut sticky = StickyModule::new();
        let id = sticky.add_projectile(&mut sim, at(0.0));
        assert_eq!(sim.particle_count(), 1);
        assert_eq!(sticky.projectiles(), &[id]);
    }

    #[test]
    fn sticks_only_within_threshold() {
        let mut sim = Simulation::new();
        let near = sim.push_particle(at(0.15));
        let far = sim.push_particle(at(0.25));
        let mut sticky = StickyModule::new();
        let proj = sticky.add_projectile(&mut sim, at(0.0));

        assert_eq!(sticky.modify_sim(&mut sim), 1);
        assert!(sticky.is_stuck(near));
        assert!(!sticky.is_stuck(far));

        let (_, spring) = sim.springs().next().unwrap();
        assert_eq!((spring.particle_i, spring.particle_j), (near, proj));
        assert_eq!(spring.ks, STICK_KS);
        assert_eq!(spring.rest_length, STICK_DISTANCE);
    }

    #[test]
    fn projectiles_never_stick_to_each_other() {
        let mut sim = Simulation::new();
        let mut sticky = StickyModule::new();
        sticky.add_projectile(&mut sim, at(0.0));
        sticky.add_projectile(&mut sim, at(0.05));
        assert_eq!(sticky.modify_sim(&mut sim), 0);
        assert_eq!(sim.spring_count(), 0);
    }

    #[test]
    fn first_projectile_in_order_wins() {
        let mut sim = Simulation::new();
        let target = sim.push_particle(at(0.0));
        let mut sticky = StickyModule::new();
        let first = sticky.add_projectile(&mut sim, at(0.15));
        sticky.add_projectile(&mut sim, at(0.01));

        assert_eq!(sticky.modify_sim(&mut sim), 1);
        let (_, spring) = sim.springs().next().unwrap();
        assert_eq!((spring.particle_i, spring.particle_j), (target, first));
    }
}
