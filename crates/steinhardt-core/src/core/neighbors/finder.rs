use super::cell_list::CellList;
use crate::core::models::bond::Bond;
use crate::core::models::simulation_box::PeriodicGeometry;
use nalgebra::Point3;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Per-particle directed bond lists, indexed by source particle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NeighborList {
    bonds: Vec<Vec<Bond>>,
}

impl NeighborList {
    pub fn num_particles(&self) -> usize {
        self.bonds.len()
    }

    /// Bonds leaving `particle`, ordered by ascending neighbor index.
    pub fn bonds_of(&self, particle: usize) -> &[Bond] {
        &self.bonds[particle]
    }

    pub fn neighbor_count(&self, particle: usize) -> usize {
        self.bonds[particle].len()
    }

    pub fn neighbor_counts(&self) -> Vec<usize> {
        self.bonds.iter().map(Vec::len).collect()
    }

    pub fn total_bonds(&self) -> usize {
        self.bonds.iter().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Bond]> {
        self.bonds.iter().map(Vec::as_slice)
    }
}

/// Fixed-radius neighbor query under periodic boundary conditions.
///
/// A bond `i -> j` is recorded when `min_radius < |d_ij| <= cutoff`, where
/// `d_ij` is the minimum-image displacement. Every particle's list is built
/// independently, so `j -> i` is present only because the distance test holds
/// for it too.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborFinder {
    cutoff: f64,
    min_radius: f64,
}

impl NeighborFinder {
    pub fn new(cutoff: f64) -> Self {
        Self {
            cutoff,
            min_radius: 0.0,
        }
    }

    pub fn with_min_radius(mut self, min_radius: f64) -> Self {
        self.min_radius = min_radius;
        self
    }

    #[instrument(skip_all, name = "neighbor_search")]
    pub fn find<G: PeriodicGeometry + Sync>(
        &self,
        positions: &[Point3<f64>],
        geometry: &G,
    ) -> NeighborList {
        let list = match CellList::build(geometry, positions, self.cutoff) {
            Some(cells) => {
                debug!(cells = ?cells.num_cells(), "Searching neighbors with a cell list.");
                self.search(positions, geometry, |i| {
                    let mut candidates = cells.candidates(i);
                    candidates.sort_unstable();
                    candidates
                })
            }
            None => {
                debug!("Box too small for a cell list; scanning all pairs.");
                self.search(positions, geometry, |_| (0..positions.len()).collect())
            }
        };

        debug!(
            particles = list.num_particles(),
            bonds = list.total_bonds(),
            "Neighbor search complete."
        );
        list
    }

    fn search<G, F>(&self, positions: &[Point3<f64>], geometry: &G, candidates: F) -> NeighborList
    where
        G: PeriodicGeometry + Sync,
        F: Fn(usize) -> Vec<usize> + Sync,
    {
        #[cfg(not(feature = "parallel"))]
        let iterator = 0..positions.len();

        #[cfg(feature = "parallel")]
        let iterator = (0..positions.len()).into_par_iter();

        let bonds = iterator
            .map(|i| {
                let origin = &positions[i];
                candidates(i)
                    .into_iter()
                    .filter(|&j| j != i)
                    .filter_map(|j| {
                        let bond = Bond::new(i, j, geometry.minimum_image(origin, &positions[j]));
                        self.accepts(bond.distance).then_some(bond)
                    })
                    .collect::<Vec<Bond>>()
            })
            .collect();

        NeighborList { bonds }
    }

    #[inline]
    fn accepts(&self, distance: f64) -> bool {
        distance > self.min_radius && distance <= self.cutoff
    }
}
