//! Mass-spring simulation engine for web-like meshes.
//!
//! Particles joined by damped springs are stepped under gravity and a
//! penalty-based ground plane with one of four integrators. Between frames,
//! topology modules let projectiles stick to the mesh and overstretched
//! springs snap.

pub mod analyzer;
pub mod ast;
pub mod breaking;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod mesh;
pub mod parser;
pub mod particle;
pub mod runtime;
pub mod scene;
pub mod spring;
pub mod sticky;
pub mod topology;

pub use analyzer::{analyze_scene, analyze_simulation};
pub use breaking::BreakModule;
pub use config::SimulationConfig;
pub use diagnostics::{
    format_parse_error, format_runtime_error, Diagnostic, DiagnosticSeverity, Diagnostics, Span,
};
pub use engine::Simulation;
pub use error::SimError;
pub use integrator::IntegrationMethod;
pub use mesh::{MeshError, WebConfig, WebMesh};
pub use parser::{parse_command, scene_lines, ParseError, SourceLine};
pub use particle::{Particle, ParticleBuilder, ParticleId};
pub use runtime::{
    build_simulation_context_from_source, get_particle_states, run_scene, DriverConfig,
    FrameDriver, FrameStats, ParticleState, RuntimeError, SimulationContext, SimulationResult,
};
pub use scene::{apply_scene, load_scene, ConfigError, Scene, SceneError};
pub use spring::{Spring, SpringBuilder, SpringId};
pub use sticky::StickyModule;
pub use topology::TopologyModule;

// Test helpers module (public for integration tests)
// Always compiled - integration tests are separate crates and need access
pub mod tests;
