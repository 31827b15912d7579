//! Scenes: a simulation plus the pins and topology modules that drive it.
//!
//! Scenes are usually described in the line-oriented command language and
//! applied one line at a time. A bad line stops the load and leaves the
//! effects of every earlier line in place.

use crate::ast::Command;
use crate::breaking::BreakModule;
use crate::engine::Simulation;
use crate::error::SimError;
use crate::mesh::{MeshError, WebMesh};
use crate::diagnostics::{format_parse_error, format_runtime_error};
use crate::parser::{parse_command, scene_lines, ParseError};
use crate::particle::{Particle, ParticleBuilder, ParticleId};
use crate::spring::SpringBuilder;
use crate::sticky::StickyModule;
use glam::DVec3;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// A scene line that could not be parsed or applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid input for line {line}: {text}\nerror is: {source}")]
    Parse {
        line: usize,
        text: String,
        source: ParseError,
    },
    #[error("invalid input for line {line}: {text}\nerror is: {source}")]
    Apply {
        line: usize,
        text: String,
        source: SceneError,
    },
}

impl ConfigError {
    /// 1-based number of the failing line.
    pub fn line(&self) -> usize {
        match self {
            ConfigError::Parse { line, .. } | ConfigError::Apply { line, .. } => *line,
        }
    }

    /// Human-readable report pointing at the failing line of `source`.
    pub fn render(&self, source: &str) -> String {
        match self {
            ConfigError::Parse { source: error, .. } => format_parse_error(error, source),
            ConfigError::Apply { line, text, source: error } => format!(
                "{}\n  at line {}: {}",
                format_runtime_error(error),
                line,
                text
            ),
        }
    }
}

/// Everything a driving loop needs to advance one simulation.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub sim: Simulation,
    /// Particles pinned to a fixed position before every sub-step.
    pub anchors: Vec<(ParticleId, DVec3)>,
    pub sticky: Option<StickyModule>,
    pub breaker: Option<BreakModule>,
    pub webs: Vec<WebMesh>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_simulation(sim: Simulation) -> Self {
        Self {
            sim,
            ..Self::default()
        }
    }

    /// Pin a particle where it currently is.
    pub fn anchor(&mut self, id: ParticleId) -> Result<(), SimError> {
        let pos = match self.sim.particle(id) {
            Some(particle) => particle.pos,
            None if id.index() < self.sim.particle_count() => {
                return Err(SimError::IncompleteParticle { id })
            }
            None => {
                return Err(SimError::UnknownParticle {
                    id,
                    count: self.sim.particle_count(),
                })
            }
        };
        self.anchor_at(id, pos);
        Ok(())
    }

    /// Pin a particle at `pos`, replacing any earlier pin for it.
    pub fn anchor_at(&mut self, id: ParticleId, pos: DVec3) {
        match self.anchors.iter_mut().find(|(anchored, _)| *anchored == id) {
            Some(entry) => entry.1 = pos,
            None => self.anchors.push((id, pos)),
        }
    }

    /// Move every anchored particle back to its pin. Velocity is left alone.
    pub fn apply_anchors(&mut self) -> Result<(), SimError> {
        for &(id, pos) in &self.anchors {
            self.sim.set_position(id, pos)?;
        }
        Ok(())
    }

    pub fn enable_sticky(&mut self) -> &mut StickyModule {
        self.sticky.get_or_insert_with(StickyModule::new)
    }

    pub fn enable_break(&mut self) -> &mut BreakModule {
        self.breaker.get_or_insert_with(BreakModule::new)
    }

    /// Add a web mesh and pin its exterior ring.
    pub fn add_web(&mut self, mesh: WebMesh) {
        for (id, pos) in mesh.exterior_anchors(&self.sim) {
            self.anchor_at(id, pos);
        }
        self.webs.push(mesh);
    }

    pub fn apply_command(&mut self, command: &Command) -> Result<(), SceneError> {
        match command {
            Command::CreateParticles(n) => {
                self.sim.create_particles(*n);
            }
            Command::Particle {
                index,
                mass,
                pos,
                vel,
            } => {
                let id = ParticleId(*index);
                let mut update = ParticleBuilder::new().mass(*mass).pos(*pos).vel(*vel);
                if !self.sim.is_particle_complete(id) {
                    update = update.acc(DVec3::ZERO).ext_force(DVec3::ZERO);
                }
                self.sim.set_particle(id, &update)?;
            }
            Command::AllVelocities(vel) => {
                let update = ParticleBuilder::new().vel(*vel);
                let ids: Vec<_> = self.sim.particle_ids().collect();
                for id in ids {
                    self.sim.set_particle(id, &update)?;
                }
            }
            Command::CreateSprings(n) => {
                self.sim.create_springs(*n);
            }
            Command::Link {
                spring,
                particle_i,
                particle_j,
                ks,
                kd,
                rest_length,
            } => {
                let id = self.sim.spring_id_at(*spring).ok_or(SimError::UnknownSpringIndex {
                    index: *spring,
                    count: self.sim.spring_count(),
                })?;
                let update = SpringBuilder::new()
                    .between(ParticleId(*particle_i), ParticleId(*particle_j))
                    .ks(*ks)
                    .kd(*kd)
                    .rest_length(*rest_length);
                self.sim.set_spring(id, &update)?;
            }
            Command::Integration { method, timestep } => {
                self.sim.integration_method = *method;
                self.sim.timestep = *timestep;
            }
            Command::Gravity(g) => {
                self.sim.g_acc = DVec3::new(0.0, -g, 0.0);
            }
            Command::Ground { ks, kd } => {
                self.sim.ground_ks = *ks;
                self.sim.ground_kd = *kd;
            }
            Command::Web(config) => {
                let mesh = WebMesh::generate(&mut self.sim, *config)?;
                self.add_web(mesh);
            }
            Command::Anchor(index) => self.anchor(ParticleId(*index))?,
            Command::Sticky => {
                self.enable_sticky();
            }
            Command::Break => {
                self.enable_break();
            }
            Command::Projectile { mass, pos, vel } => {
                let sticky = self.sticky.get_or_insert_with(StickyModule::new);
                sticky.add_projectile(&mut self.sim, Particle::new(*mass, *pos, *vel));
            }
        }
        Ok(())
    }
}

/// Apply a scene source line by line. Returns how many commands were applied.
pub fn apply_scene(source: &str, scene: &mut Scene) -> Result<usize, ConfigError> {
    let mut applied = 0;
    for line in scene_lines(source) {
        let command = parse_command(line.text, Some(line.span)).map_err(|source| ConfigError::Parse {
            line: line.number,
            text: line.text.to_string(),
            source,
        })?;
        let Some(command) = command else {
            continue;
        };
        scene.apply_command(&command).map_err(|source| ConfigError::Apply {
            line: line.number,
            text: line.text.to_string(),
            source,
        })?;
        applied += 1;
    }
    Ok(applied)
}

/// Build a fresh scene from source.
pub fn load_scene(source: &str) -> Result<Scene, ConfigError> {
    let mut scene = Scene::new();
    let applied = apply_scene(source, &mut scene)?;
    ftlog::info!(
        "loaded scene: {} commands, {} particles, {} springs",
        applied,
        scene.sim.particle_count(),
        scene.sim.spring_count()
    );
    Ok(scene)
}
