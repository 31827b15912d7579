use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::forces::ground_force;
use crate::integrator::IntegrationMethod;
use crate::particle::{Particle, ParticleBuilder, ParticleId, ParticleSlot};
use crate::spring::{Spring, SpringBuilder, SpringId, SpringSlot};
use glam::DVec3;

#[derive(Debug, Clone)]
struct SpringEntry {
    id: SpringId,
    slot: SpringSlot,
}

/// A mass-spring system under gravity and ground contact.
///
/// Particles live in an append-only arena indexed by [`ParticleId`]. Springs
/// keep insertion order and carry a [`SpringId`] that survives the removal of
/// other springs.
#[derive(Debug, Clone)]
pub struct Simulation {
    particles: Vec<ParticleSlot>,
    springs: Vec<SpringEntry>,
    next_spring_id: u64,
    pub g_acc: DVec3,
    pub ground_ks: f64,
    pub ground_kd: f64,
    pub integration_method: IntegrationMethod,
    pub timestep: f64,
}

impl Simulation {
    pub fn new() -> Self {
        Self::with_config(&SimulationConfig::default())
    }

    pub fn with_config(config: &SimulationConfig) -> Self {
        Self {
            particles: Vec::new(),
            springs: Vec::new(),
            next_spring_id: 0,
            g_acc: config.g_acc,
            ground_ks: config.ground_ks,
            ground_kd: config.ground_kd,
            integration_method: config.integration_method,
            timestep: config.timestep,
        }
    }

    // ------------------------------------------------------------------
    // Particles
    // ------------------------------------------------------------------

    /// Number of particles, complete or not.
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Append a particle, possibly still incomplete.
    pub fn add_particle(&mut self, builder: ParticleBuilder) -> ParticleId {
        let id = ParticleId(self.particles.len());
        self.particles.push(ParticleSlot::new(builder));
        id
    }

    pub fn push_particle(&mut self, particle: Particle) -> ParticleId {
        let id = ParticleId(self.particles.len());
        self.particles.push(ParticleSlot::Ready(particle));
        id
    }

    /// Append `n` blank particles to be described later.
    pub fn create_particles(&mut self, n: usize) -> Vec<ParticleId> {
        (0..n).map(|_| self.add_particle(ParticleBuilder::new())).collect()
    }

    pub fn set_particle(&mut self, id: ParticleId, update: &ParticleBuilder) -> Result<(), SimError> {
        self.slot_mut(id)?.set(update);
        Ok(())
    }

    /// Move a particle without integrating it (anchoring).
    pub fn set_position(&mut self, id: ParticleId, pos: DVec3) -> Result<(), SimError> {
        self.set_particle(id, &ParticleBuilder::new().pos(pos))
    }

    /// The particle, if it exists and is complete.
    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id.index()).and_then(ParticleSlot::ready)
    }

    pub fn particle_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.particles.get_mut(id.index()).and_then(ParticleSlot::ready_mut)
    }

    pub fn is_particle_complete(&self, id: ParticleId) -> bool {
        self.particle(id).is_some()
    }

    pub fn particle_ids(&self) -> impl Iterator<Item = ParticleId> {
        (0..self.particles.len()).map(ParticleId)
    }

    /// Complete particles in insertion order.
    pub fn particles(&self) -> impl Iterator<Item = (ParticleId, &Particle)> + '_ {
        self.particles
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.ready().map(|p| (ParticleId(index), p)))
    }

    pub fn particles_mut(&mut self) -> impl Iterator<Item = (ParticleId, &mut Particle)> + '_ {
        self.particles
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.ready_mut().map(|p| (ParticleId(index), p)))
    }

    fn slot_mut(&mut self, id: ParticleId) -> Result<&mut ParticleSlot, SimError> {
        let count = self.particles.len();
        self.particles
            .get_mut(id.index())
            .ok_or(SimError::UnknownParticle { id, count })
    }

    fn check_particle(&self, id: ParticleId) -> Result<(), SimError> {
        if id.index() < self.particles.len() {
            Ok(())
        } else {
            Err(SimError::UnknownParticle {
                id,
                count: self.particles.len(),
            })
        }
    }

    // ------------------------------------------------------------------
    // Springs
    // ------------------------------------------------------------------

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    /// Append a spring, possibly still incomplete. Endpoints that are given
    /// must already exist.
    pub fn add_spring(&mut self, builder: SpringBuilder) -> Result<SpringId, SimError> {
        for endpoint in builder.endpoints() {
            self.check_particle(endpoint)?;
        }
        let id = SpringId(self.next_spring_id);
        self.next_spring_id += 1;
        self.springs.push(SpringEntry {
            id,
            slot: SpringSlot::new(builder),
        });
        Ok(id)
    }

    pub fn push_spring(&mut self, spring: Spring) -> Result<SpringId, SimError> {
        self.add_spring(
            SpringBuilder::new()
                .between(spring.particle_i, spring.particle_j)
                .ks(spring.ks)
                .kd(spring.kd)
                .rest_length(spring.rest_length),
        )
    }

    pub fn create_springs(&mut self, n: usize) -> Vec<SpringId> {
        let mut ids = Vec::with_capacity(n);
        for _ in 0..n {
            let id = SpringId(self.next_spring_id);
            self.next_spring_id += 1;
            self.springs.push(SpringEntry {
                id,
                slot: SpringSlot::Pending(SpringBuilder::new()),
            });
            ids.push(id);
        }
        ids
    }

    pub fn set_spring(&mut self, id: SpringId, update: &SpringBuilder) -> Result<(), SimError> {
        for endpoint in update.endpoints() {
            self.check_particle(endpoint)?;
        }
        let entry = self
            .springs
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(SimError::UnknownSpring { id })?;
        entry.slot.set(update);
        Ok(())
    }

    /// Id of the spring currently at `index` in insertion order.
    pub fn spring_id_at(&self, index: usize) -> Option<SpringId> {
        self.springs.get(index).map(|entry| entry.id)
    }

    pub fn spring(&self, id: SpringId) -> Option<&Spring> {
        self.springs
            .iter()
            .find(|entry| entry.id == id)
            .and_then(|entry| entry.slot.ready())
    }

    pub fn contains_spring(&self, id: SpringId) -> bool {
        self.springs.iter().any(|entry| entry.id == id)
    }

    pub fn spring_ids(&self) -> impl Iterator<Item = SpringId> + '_ {
        self.springs.iter().map(|entry| entry.id)
    }

    /// Complete springs in insertion order.
    pub fn springs(&self) -> impl Iterator<Item = (SpringId, &Spring)> + '_ {
        self.springs
            .iter()
            .filter_map(|entry| entry.slot.ready().map(|s| (entry.id, s)))
    }

    /// Current length of a complete spring whose endpoints are complete.
    pub fn spring_length(&self, id: SpringId) -> Option<f64> {
        let spring = self.spring(id)?;
        let pi = self.particle(spring.particle_i)?;
        let pj = self.particle(spring.particle_j)?;
        Some(pi.pos.distance(pj.pos))
    }

    /// Remove every listed spring, keeping the order of the rest. Returns how
    /// many were actually removed.
    pub fn remove_springs(&mut self, ids: &[SpringId]) -> usize {
        let before = self.springs.len();
        self.springs.retain(|entry| !ids.contains(&entry.id));
        before - self.springs.len()
    }

    // ------------------------------------------------------------------
    // Stepping
    // ------------------------------------------------------------------

    /// First incomplete entity, if any. Springs are checked after particles
    /// so a missing endpoint is reported as the particle itself.
    pub fn validate(&self) -> Result<(), SimError> {
        for (index, slot) in self.particles.iter().enumerate() {
            if slot.ready().is_none() {
                return Err(SimError::IncompleteParticle { id: ParticleId(index) });
            }
        }
        for entry in &self.springs {
            let spring = entry
                .slot
                .ready()
                .ok_or(SimError::IncompleteSpring { id: entry.id })?;
            self.check_particle(spring.particle_i)?;
            self.check_particle(spring.particle_j)?;
        }
        Ok(())
    }

    /// Advance one fixed sub-step of length `dt`.
    ///
    /// Forces are rebuilt from scratch (gravity and ground), springs add
    /// theirs, then every particle is integrated. Nothing is touched if a
    /// particle or spring is incomplete.
    pub fn update(&mut self, dt: f64) -> Result<(), SimError> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(SimError::InvalidTimestep(dt));
        }
        self.validate()?;

        let g_acc = self.g_acc;
        let (ground_ks, ground_kd) = (self.ground_ks, self.ground_kd);
        for (_, p) in self.particles_mut() {
            p.ext_force = g_acc * p.mass + ground_force(p.pos, p.vel, ground_ks, ground_kd);
        }

        for entry in &self.springs {
            let Some(spring) = entry.slot.ready() else {
                continue;
            };
            let i = spring.particle_i.index();
            let j = spring.particle_j.index();
            let (Some(pi), Some(pj)) = (self.particles[i].ready(), self.particles[j].ready()) else {
                continue;
            };
            let force = spring.force(pi, pj);
            if let Some(pi) = self.particles[i].ready_mut() {
                pi.ext_force += force;
            }
            if let Some(pj) = self.particles[j].ready_mut() {
                pj.ext_force -= force;
            }
        }

        let method = self.integration_method;
        for (_, p) in self.particles_mut() {
            p.update(dt, method);
        }
        Ok(())
    }

    /// Advance one sub-step of the configured `timestep`.
    pub fn step(&mut self) -> Result<(), SimError> {
        self.update(self.timestep)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
