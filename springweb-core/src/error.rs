//! Error types for the simulation engine.

use crate::particle::ParticleId;
use crate::spring::SpringId;
use thiserror::Error;

/// Errors raised while building or stepping a [`Simulation`](crate::engine::Simulation).
///
/// Any of these returned from `Simulation::update` means the step was
/// aborted before a single particle was integrated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A particle is still missing one of mass, position, velocity,
    /// acceleration or external force.
    #[error("particle {id} initialization not complete")]
    IncompleteParticle { id: ParticleId },

    /// A spring is still missing an endpoint, a coefficient or its rest length.
    #[error("spring {id} initialization not complete")]
    IncompleteSpring { id: SpringId },

    #[error("particle index {id} out of bounds (count: {count})")]
    UnknownParticle { id: ParticleId, count: usize },

    #[error("no spring with id {id}")]
    UnknownSpring { id: SpringId },

    #[error("spring index {index} out of bounds (count: {count})")]
    UnknownSpringIndex { index: usize, count: usize },

    #[error("timestep must be positive and finite, got {0}")]
    InvalidTimestep(f64),
}
