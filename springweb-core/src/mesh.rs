//! Procedural web meshes: a center particle, radial strands and rings.

use crate::engine::Simulation;
use crate::error::SimError;
use crate::particle::{Particle, ParticleId};
use crate::spring::{Spring, SpringId};
use glam::DVec3;
use std::f64::consts::TAU;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("a web needs at least one ring, got {0}")]
    TooFewRings(usize),
    #[error("a web needs at least three sides, got {0}")]
    TooFewSides(usize),
    #[error("web radius must be positive, got {0}")]
    InvalidRadius(f64),
    #[error(transparent)]
    Sim(#[from] SimError),
}

/// Shape and material of a generated web.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebConfig {
    pub center: DVec3,
    pub rings: usize,
    pub sides: usize,
    pub radius: f64,
    pub ks: f64,
    pub kd: f64,
    /// Each spring's rest length is its initial length times this factor,
    /// so values below one pre-tension the web.
    pub rest_length_modifier: f64,
    pub particle_mass: f64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            center: DVec3::ZERO,
            rings: 12,
            sides: 13,
            radius: 6.0,
            ks: 5000.0,
            kd: 100.0,
            rest_length_modifier: 0.9,
            particle_mass: 1.0,
        }
    }
}

/// Handles to the pieces of a web added to a simulation.
#[derive(Debug, Clone)]
pub struct WebMesh {
    pub config: WebConfig,
    pub center: ParticleId,
    /// All particles of the web, center first.
    pub particles: Vec<ParticleId>,
    pub springs: Vec<SpringId>,
    /// Outermost ring in side order. These are normally pinned.
    pub exterior: Vec<ParticleId>,
}

impl WebMesh {
    /// Build a web into `sim`.
    ///
    /// Sides are laid out in the XZ plane around `center`. The particle of
    /// side `s`, ring `r` (1-based) is the `1 + s * rings + (r - 1)`-th one
    /// added.
    pub fn generate(sim: &mut Simulation, config: WebConfig) -> Result<Self, MeshError> {
        if config.rings < 1 {
            return Err(MeshError::TooFewRings(config.rings));
        }
        if config.sides < 3 {
            return Err(MeshError::TooFewSides(config.sides));
        }
        if !(config.radius > 0.0) {
            return Err(MeshError::InvalidRadius(config.radius));
        }

        let mut mesh = WebMesh {
            config,
            center: ParticleId(0),
            particles: Vec::with_capacity(1 + config.rings * config.sides),
            springs: Vec::new(),
            exterior: Vec::with_capacity(config.sides),
        };
        mesh.place_particles(sim);
        mesh.connect(sim)?;

        ftlog::info!(
            "generated web with {} particles and {} springs ({} rings, {} sides)",
            mesh.particles.len(),
            mesh.springs.len(),
            config.rings,
            config.sides
        );
        Ok(mesh)
    }

    fn place_particles(&mut self, sim: &mut Simulation) {
        let cfg = self.config;
        let segment = cfg.radius / cfg.rings as f64;

        self.center = sim.push_particle(Particle::new(cfg.particle_mass, cfg.center, DVec3::ZERO));
        self.particles.push(self.center);

        for side in 0..cfg.sides {
            let angle = side as f64 * TAU / cfg.sides as f64;
            let dir = DVec3::new(angle.cos(), 0.0, angle.sin());
            for ring in 1..=cfg.rings {
                let pos = cfg.center + dir * (segment * ring as f64);
                let id = sim.push_particle(Particle::new(cfg.particle_mass, pos, DVec3::ZERO));
                self.particles.push(id);
                if ring == cfg.rings {
                    self.exterior.push(id);
                }
            }
        }
    }

    /// Particle at (`side`, `ring`), ring 0 being the center.
    pub fn particle_at(&self, side: usize, ring: usize) -> Option<ParticleId> {
        let cfg = &self.config;
        if ring == 0 {
            return Some(self.center);
        }
        if side >= cfg.sides || ring > cfg.rings {
            return None;
        }
        self.particles.get(1 + side * cfg.rings + (ring - 1)).copied()
    }

    fn link(&mut self, sim: &mut Simulation, a: ParticleId, b: ParticleId) -> Result<(), MeshError> {
        let (Some(pa), Some(pb)) = (sim.particle(a), sim.particle(b)) else {
            return Err(SimError::IncompleteParticle { id: a }.into());
        };
        let rest = pa.pos.distance(pb.pos) * self.config.rest_length_modifier;
        let id = sim.push_spring(Spring::new(a, b, self.config.ks, self.config.kd, rest))?;
        self.springs.push(id);
        Ok(())
    }

    fn connect(&mut self, sim: &mut Simulation) -> Result<(), MeshError> {
        let cfg = self.config;

        // Radial strands, center outwards.
        for side in 0..cfg.sides {
            for ring in 0..cfg.rings {
                if let (Some(a), Some(b)) = (self.particle_at(side, ring), self.particle_at(side, ring + 1)) {
                    self.link(sim, a, b)?;
                }
            }
        }

        // Rings, wrapping from the last side to the first. The outermost
        // ring is left unconnected since it is pinned.
        for ring in 1..cfg.rings {
            for side in 0..cfg.sides {
                let next = (side + 1) % cfg.sides;
                if let (Some(a), Some(b)) = (self.particle_at(side, ring), self.particle_at(next, ring)) {
                    self.link(sim, a, b)?;
                }
            }
        }
        Ok(())
    }

    /// Exterior particles paired with their current positions, ready to be
    /// used as anchors.
    pub fn exterior_anchors(&self, sim: &Simulation) -> Vec<(ParticleId, DVec3)> {
        self.exterior
            .iter()
            .filter_map(|&id| sim.particle(id).map(|p| (id, p.pos)))
            .collect()
    }
}
