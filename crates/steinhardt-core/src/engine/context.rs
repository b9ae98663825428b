use crate::core::harmonics::spherical::SphericalHarmonicEvaluator;
use crate::core::neighbors::finder::NeighborList;

/// Borrowed inputs shared by the per-snapshot tasks.
#[derive(Clone, Copy)]
pub struct ComputeContext<'a> {
    pub neighbors: &'a NeighborList,
    pub evaluator: &'a SphericalHarmonicEvaluator,
}

impl<'a> ComputeContext<'a> {
    pub fn new(neighbors: &'a NeighborList, evaluator: &'a SphericalHarmonicEvaluator) -> Self {
        Self {
            neighbors,
            evaluator,
        }
    }

    pub fn num_particles(&self) -> usize {
        self.neighbors.num_particles()
    }

    pub fn degree(&self) -> u32 {
        self.evaluator.degree()
    }
}
