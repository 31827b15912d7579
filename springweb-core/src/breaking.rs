//! Springs that snap when overstretched.

use crate::engine::Simulation;
use crate::error::SimError;
use crate::particle::Particle;
use crate::spring::{Spring, SpringId};
use crate::topology::TopologyModule;
use glam::DVec3;
use std::collections::HashSet;

/// A spring snaps once its length exceeds this multiple of its rest length.
pub const BREAK_RATIO: f64 = 2.0;
pub const STRAND_KS: f64 = 1000.0;
pub const STRAND_KD: f64 = 1.0;
pub const STRAND_PARTICLE_MASS: f64 = 1.0;

/// Replaces overstretched springs with two dangling strands.
///
/// Each endpoint keeps a strand of half the original rest length ending in a
/// fresh particle placed at the old midpoint. Strands are remembered and are
/// never broken themselves.
#[derive(Debug, Clone, Default)]
pub struct BreakModule {
    strands: HashSet<SpringId>,
}

struct Snap {
    spring: SpringId,
    original: Spring,
    midpoint: DVec3,
}

impl BreakModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_strand(&self, id: SpringId) -> bool {
        self.strands.contains(&id)
    }

    pub fn strand_count(&self) -> usize {
        self.strands.len()
    }

    fn find_snaps(&self, sim: &Simulation) -> Vec<Snap> {
        sim.springs()
            .filter(|(id, _)| !self.strands.contains(id))
            .filter_map(|(id, spring)| {
                let pi = sim.particle(spring.particle_i)?;
                let pj = sim.particle(spring.particle_j)?;
                let length = pi.pos.distance(pj.pos);
                (length > BREAK_RATIO * spring.rest_length).then(|| Snap {
                    spring: id,
                    original: *spring,
                    midpoint: (pi.pos + pj.pos) * 0.5,
                })
            })
            .collect()
    }

    fn snap(&mut self, sim: &mut Simulation, snap: &Snap) -> Result<(), SimError> {
        let original = &snap.original;
        let half = original.rest_length / 2.0;

        let p1 = sim.push_particle(Particle::new(STRAND_PARTICLE_MASS, snap.midpoint, DVec3::ZERO));
        let p2 = sim.push_particle(Particle::new(STRAND_PARTICLE_MASS, snap.midpoint, DVec3::ZERO));
        let s1 = sim.push_spring(Spring::new(original.particle_i, p1, STRAND_KS, STRAND_KD, half))?;
        let s2 = sim.push_spring(Spring::new(original.particle_j, p2, STRAND_KS, STRAND_KD, half))?;
        self.strands.insert(s1);
        self.strands.insert(s2);
        Ok(())
    }
}

impl TopologyModule for BreakModule {
    fn name(&self) -> &'static str {
        "break"
    }

    fn modify_sim(&mut self, sim: &mut Simulation) -> usize {
        let snaps = self.find_snaps(sim);
        let mut broken = Vec::with_capacity(snaps.len());
        for snap in &snaps {
            match self.snap(sim, snap) {
                Ok(()) => {
                    ftlog::info!(
                        "spring {} between {} and {} snapped",
                        snap.spring,
                        snap.original.particle_i,
                        snap.original.particle_j
                    );
                    broken.push(snap.spring);
                }
                Err(e) => ftlog::warn!("could not snap spring {}: {}", snap.spring, e),
            }
        }
        sim.remove_springs(&broken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stretched(ratio: f64) -> (Simulation, SpringId) {
        let mut sim = Simulation::new();
        let a = sim.push_particle(Particle::new(1.0, DVec3::new(0.0, 1.0, 0.0), DVec3::ZERO));
        let b = sim.push_particle(Particle::new(1.0, DVec3::new(ratio, 1.0, 0.0), DVec3::ZERO));
        let id = sim.push_spring(Spring::new(a, b, 5000.0, 100.0, 1.0)).unwrap();
        (sim, id)
    }

    #[test]
    fn spring_within_ratio_survives() {
        let (mut sim, id) = stretched(1.99);
        let mut breaker = BreakModule::new();
        assert_eq!(breaker.modify_sim(&mut sim), 0);
        assert!(sim.contains_spring(id));
    }

    #[test]
    fn strands_ignore_original_coefficients() {
        let (mut sim, _) = stretched(3.0);
        let mut breaker = BreakModule::new();
        assert_eq!(breaker.modify_sim(&mut sim), 1);
        for (id, spring) in sim.springs() {
            assert!(breaker.is_strand(id));
            assert_eq!((spring.ks, spring.kd), (STRAND_KS, STRAND_KD));
            assert_eq!(spring.rest_length, 0.5);
        }
    }

    #[test]
    fn new_particles_sit_at_midpoint_at_rest() {
        let (mut sim, _) = stretched(3.0);
        BreakModule::new().modify_sim(&mut sim);
        for index in 2..4 {
            let p = sim.particle(crate::particle::ParticleId(index)).unwrap();
            assert_eq!(p.pos, DVec3::new(1.5, 1.0, 0.0));
            assert_eq!(p.vel, DVec3::ZERO);
            assert_eq!(p.mass, STRAND_PARTICLE_MASS);
        }
    }
}
