use crate::analyzer::analyze_scene;
use crate::diagnostics::{format_runtime_error, Diagnostics};
use crate::engine::Simulation;
use crate::error::SimError;
use crate::particle::ParticleId;
use crate::scene::{load_scene, ConfigError, Scene};
use crate::topology::TopologyModule;
use glam::DVec3;
use thiserror::Error;

/// Longest frame the driver will try to catch up on.
pub const DEFAULT_MAX_FRAME_TIME: f64 = 1.0 / 30.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sim(#[from] SimError),
}

impl RuntimeError {
    /// Human-readable report, pointing at the scene line when there is one.
    pub fn render(&self, source: &str) -> String {
        match self {
            RuntimeError::Config(e) => e.render(source),
            RuntimeError::Sim(e) => format_runtime_error(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverConfig {
    /// Frame times are clamped to this so a stall does not trigger an
    /// unbounded burst of sub-steps.
    pub max_frame_time: f64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_frame_time: DEFAULT_MAX_FRAME_TIME,
        }
    }
}

/// What happened during one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub sub_steps: usize,
    pub springs_stuck: usize,
    pub springs_broken: usize,
}

/// Sub-steps a scene at its fixed timestep to keep up with wall-clock frames.
#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    pub config: DriverConfig,
    /// Frame time not yet covered by a whole sub-step.
    carry: f64,
    frames: u64,
    sim_time: f64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DriverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Simulated seconds so far.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Advance `scene` by one rendered frame of `frame_dt` seconds.
    ///
    /// Anchors are re-applied before every sub-step. The topology modules
    /// run once, after the last sub-step. A failing sub-step aborts the
    /// frame and leaves the scene as it was after the last good sub-step.
    pub fn advance(&mut self, scene: &mut Scene, frame_dt: f64) -> Result<FrameStats, SimError> {
        let timestep = scene.sim.timestep;
        if !(timestep > 0.0 && timestep.is_finite()) {
            return Err(SimError::InvalidTimestep(timestep));
        }

        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, self.config.max_frame_time)
        } else {
            0.0
        };

        let mut stats = FrameStats::default();
        let mut budget = self.carry + frame_dt;
        // Tolerate rounding so an exact multiple of the timestep is not
        // short by one sub-step.
        let threshold = timestep * (1.0 - 1e-9);
        while budget >= threshold {
            scene.apply_anchors()?;
            if let Err(e) = scene.sim.update(timestep) {
                ftlog::error!("frame {} aborted after {} sub-steps: {}", self.frames, stats.sub_steps, e);
                self.carry = 0.0;
                return Err(e);
            }
            budget -= timestep;
            stats.sub_steps += 1;
            self.sim_time += timestep;
        }
        self.carry = budget.max(0.0);

        if let Some(sticky) = scene.sticky.as_mut() {
            stats.springs_stuck = run_module(sticky, &mut scene.sim);
        }
        if let Some(breaker) = scene.breaker.as_mut() {
            stats.springs_broken = run_module(breaker, &mut scene.sim);
        }

        self.frames += 1;
        ftlog::debug!(
            "frame {}: {} sub-steps, {} stuck, {} broken",
            self.frames,
            stats.sub_steps,
            stats.springs_stuck,
            stats.springs_broken
        );
        Ok(stats)
    }
}

fn run_module<M: TopologyModule>(module: &mut M, sim: &mut Simulation) -> usize {
    let events = module.modify_sim(sim);
    if events > 0 {
        ftlog::debug!("{} module produced {} event(s)", module.name(), events);
    }
    events
}

/// Snapshot of one particle for display or reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleState {
    pub id: ParticleId,
    pub pos: DVec3,
    pub vel: DVec3,
    pub mass: f64,
}

/// Final result of running a scene
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub frames: u64,
    pub sub_steps: usize,
    pub springs_stuck: usize,
    pub springs_broken: usize,
    pub spring_count: usize,
    pub particles: Vec<ParticleState>,
}

/// Current state of every complete particle, in insertion order.
pub fn get_particle_states(sim: &Simulation) -> Vec<ParticleState> {
    sim.particles()
        .map(|(id, p)| ParticleState {
            id,
            pos: p.pos,
            vel: p.vel,
            mass: p.mass,
        })
        .collect()
}

/// Load a scene and advance it `frames` frames of `frame_dt` seconds each.
pub fn run_scene(source: &str, frames: u64, frame_dt: f64) -> Result<SimulationResult, RuntimeError> {
    let mut scene = load_scene(source)?;
    let mut driver = FrameDriver::new();
    let mut total = FrameStats::default();

    for _ in 0..frames {
        let stats = driver.advance(&mut scene, frame_dt)?;
        total.sub_steps += stats.sub_steps;
        total.springs_stuck += stats.springs_stuck;
        total.springs_broken += stats.springs_broken;
    }

    Ok(SimulationResult {
        frames: driver.frames(),
        sub_steps: total.sub_steps,
        springs_stuck: total.springs_stuck,
        springs_broken: total.springs_broken,
        spring_count: scene.sim.spring_count(),
        particles: get_particle_states(&scene.sim),
    })
}

/// A loaded scene with its driver, for interactive front ends.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub scene: Scene,
    pub driver: FrameDriver,
    pub last_stats: FrameStats,
}

impl SimulationContext {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            driver: FrameDriver::new(),
            last_stats: FrameStats::default(),
        }
    }

    pub fn advance_frame(&mut self, frame_dt: f64) -> Result<FrameStats, SimError> {
        let stats = self.driver.advance(&mut self.scene, frame_dt)?;
        self.last_stats = stats;
        Ok(stats)
    }
}

/// Load a scene for interactive use, together with analyzer findings.
pub fn build_simulation_context_from_source(
    source: &str,
) -> Result<(SimulationContext, Diagnostics), RuntimeError> {
    let scene = load_scene(source)?;
    let diagnostics = analyze_scene(&scene);
    Ok((SimulationContext::new(scene), diagnostics))
}
