//! Static checks on a built scene
//!
//! This module inspects a simulation before it is stepped so that problems
//! can be reported all at once instead of aborting the first frame.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::engine::Simulation;
use crate::scene::Scene;

/// Analyze a simulation and return diagnostics
pub fn analyze_simulation(sim: &Simulation) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    // Check 1: every particle is complete and physically plausible
    for id in sim.particle_ids() {
        let Some(particle) = sim.particle(id) else {
            diagnostics.push(Diagnostic::error(
                format!("particle {} is missing mass, position or velocity", id),
                None,
            ));
            continue;
        };
        if !(particle.mass > 0.0) {
            diagnostics.push(Diagnostic::warning(
                format!("particle {} has non-positive mass {}", id, particle.mass),
                None,
            ));
        }
        if particle.pos.y < 0.0 {
            diagnostics.push(Diagnostic::warning(
                format!("particle {} starts below the ground plane", id),
                None,
            ));
        }
    }

    // Check 2: springs are complete and connect existing, distinct points
    for id in sim.spring_ids() {
        let Some(spring) = sim.spring(id) else {
            diagnostics.push(Diagnostic::error(format!("spring {} is not linked", id), None));
            continue;
        };
        for endpoint in [spring.particle_i, spring.particle_j] {
            if endpoint.index() >= sim.particle_count() {
                diagnostics.push(Diagnostic::error(
                    format!("spring {} references unknown particle {}", id, endpoint),
                    None,
                ));
            }
        }
        if !(spring.rest_length > 0.0) {
            diagnostics.push(Diagnostic::warning(
                format!("spring {} has non-positive rest length {}", id, spring.rest_length),
                None,
            ));
        }
        if let (Some(pi), Some(pj)) = (sim.particle(spring.particle_i), sim.particle(spring.particle_j)) {
            if pi.pos == pj.pos {
                diagnostics.push(Diagnostic::warning(
                    format!(
                        "spring {} connects coincident particles {} and {}; it exerts no force until they separate",
                        id, spring.particle_i, spring.particle_j
                    ),
                    None,
                ));
            }
        }
    }

    // Check 3: stepping parameters
    if !(sim.timestep > 0.0 && sim.timestep.is_finite()) {
        diagnostics.push(Diagnostic::error(
            format!("timestep must be positive, got {}", sim.timestep),
            None,
        ));
    }

    diagnostics
}

/// Analyze a whole scene: the simulation plus its anchors and projectiles
pub fn analyze_scene(scene: &Scene) -> Diagnostics {
    let mut diagnostics = analyze_simulation(&scene.sim);

    for (id, _) in &scene.anchors {
        if id.index() >= scene.sim.particle_count() {
            diagnostics.push(Diagnostic::error(format!("anchor on unknown particle {}", id), None));
        }
    }

    if let Some(sticky) = &scene.sticky {
        if sticky.projectiles().is_empty() {
            diagnostics.push(Diagnostic::warning(
                "sticky module enabled without any projectile",
                None,
            ));
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{Particle, ParticleBuilder};
    use crate::spring::Spring;
    use glam::DVec3;

    #[test]
    fn complete_scene_is_clean() {
        let mut sim = Simulation::new();
        let a = sim.push_particle(Particle::new(1.0, DVec3::new(0.0, 1.0, 0.0), DVec3::ZERO));
        let b = sim.push_particle(Particle::new(1.0, DVec3::new(1.0, 1.0, 0.0), DVec3::ZERO));
        sim.push_spring(Spring::new(a, b, 10.0, 1.0, 1.0)).unwrap();
        assert!(analyze_simulation(&sim).is_empty());
    }

    #[test]
    fn reports_incomplete_entities() {
        let mut sim = Simulation::new();
        sim.add_particle(ParticleBuilder::new().mass(1.0));
        sim.create_springs(2);
        let diagnostics = analyze_simulation(&sim);
        assert_eq!(diagnostics.errors().count(), 3);
    }

    #[test]
    fn warns_about_degenerate_geometry() {
        let mut sim = Simulation::new();
        let a = sim.push_particle(Particle::new(1.0, DVec3::new(0.0, -1.0, 0.0), DVec3::ZERO));
        let b = sim.push_particle(Particle::new(1.0, DVec3::new(0.0, -1.0, 0.0), DVec3::ZERO));
        sim.push_spring(Spring::new(a, b, 10.0, 1.0, 0.0)).unwrap();
        let diagnostics = analyze_simulation(&sim);
        assert!(!diagnostics.has_errors());
        // Two below ground, zero rest length, coincident endpoints.
        assert_eq!(diagnostics.warnings().count(), 4);
    }
}
