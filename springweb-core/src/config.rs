//! Global simulation parameters.

use crate::integrator::IntegrationMethod;
use glam::DVec3;

/// Sub-step size used when none is configured.
pub const DEFAULT_TIMESTEP: f64 = 0.001;

/// Parameters shared by every particle of a simulation.
///
/// # Builder Pattern
/// ```
/// use springweb_core::config::SimulationConfig;
/// use springweb_core::IntegrationMethod;
/// use glam::DVec3;
///
/// let config = SimulationConfig::new()
///     .with_gravity(DVec3::new(0.0, -9.81, 0.0))
///     .with_ground(500.0, 0.1)
///     .with_integration(IntegrationMethod::Verlet, 0.001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Gravitational acceleration; each particle receives `mass * g_acc`.
    pub g_acc: DVec3,
    pub ground_ks: f64,
    pub ground_kd: f64,
    pub integration_method: IntegrationMethod,
    /// Fixed sub-step used by the frame driver.
    pub timestep: f64,
}

impl SimulationConfig {
    /// No gravity, an inert ground, Verlet at 1 ms.
    pub fn new() -> Self {
        Self {
            g_acc: DVec3::ZERO,
            ground_ks: 0.0,
            ground_kd: 0.0,
            integration_method: IntegrationMethod::default(),
            timestep: DEFAULT_TIMESTEP,
        }
    }

    pub fn with_gravity(mut self, g_acc: DVec3) -> Self {
        self.g_acc = g_acc;
        self
    }

    pub fn with_ground(mut self, ks: f64, kd: f64) -> Self {
        self.ground_ks = ks;
        self.ground_kd = kd;
        self
    }

    pub fn with_integration(mut self, method: IntegrationMethod, timestep: f64) -> Self {
        self.integration_method = method;
        self.timestep = timestep;
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
