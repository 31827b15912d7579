//! Passes that rewire a simulation between frames.

use crate::engine::Simulation;

/// A mutator that inspects a simulation once per rendered frame and adds or
/// removes particles and springs.
///
/// Implementations gather every change during a read-only scan and apply
/// them afterwards, so removal never disturbs the scan.
pub trait TopologyModule {
    fn name(&self) -> &'static str;

    /// Apply one pass. Returns the number of topology events: sticky springs
    /// created, or original springs broken (each break adds two strands but
    /// counts once).
    fn modify_sim(&mut self, sim: &mut Simulation) -> usize;
}
