use crate::core::models::simulation_box::PeriodicGeometry;
use itertools::iproduct;
use nalgebra::Point3;
use std::cmp::max;
use tracing::trace;

// Fewer cells per axis than this would let the 27-cell stencil visit the same
// periodic image of a cell twice.
const MIN_CELLS_PER_AXIS: usize = 3;
const CELLS_PER_PARTICLE_AXIS: usize = 2;

/// Periodic binning of particles into cells whose perpendicular width is at
/// least the search cutoff, so every neighbor within the cutoff lies in the
/// 27 (9 in 2D) cells around a particle's own cell.
#[derive(Debug, Clone)]
pub(crate) struct CellList {
    num_cells: [usize; 3],
    /// `cell_starts[c]..cell_starts[c + 1]` indexes `members` for linear cell `c`.
    cell_starts: Vec<usize>,
    members: Vec<usize>,
    particle_cells: Vec<[usize; 3]>,
    is_2d: bool,
}

impl CellList {
    /// Returns `None` when the box is too small along some axis to hold the
    /// minimum number of cells; callers then fall back to an all-pairs scan.
    pub fn build<G: PeriodicGeometry>(
        geometry: &G,
        positions: &[Point3<f64>],
        cutoff: f64,
    ) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }
        let is_2d = geometry.is_2d();
        let widths = geometry.perpendicular_widths();

        let max_per_axis = if is_2d {
            (positions.len() as f64).sqrt().ceil() as usize
        } else {
            (positions.len() as f64).cbrt().ceil() as usize
        };
        let max_per_axis = max(max_per_axis * CELLS_PER_PARTICLE_AXIS, MIN_CELLS_PER_AXIS);

        let cells_along = |width: f64| -> Option<usize> {
            let n = (width / cutoff).floor();
            if !n.is_finite() || n < MIN_CELLS_PER_AXIS as f64 {
                return None;
            }
            Some((n as usize).min(max_per_axis))
        };

        let nx = cells_along(widths.x)?;
        let ny = cells_along(widths.y)?;
        let nz = if is_2d { 1 } else { cells_along(widths.z)? };
        let num_cells = [nx, ny, nz];
        let total_cells = nx * ny * nz;

        let particle_cells: Vec<[usize; 3]> = positions
            .iter()
            .map(|p| {
                let mut s = geometry.to_fractional(p);
                s.x -= s.x.floor();
                s.y -= s.y.floor();
                s.z -= s.z.floor();
                [
                    bin(s.x, nx),
                    bin(s.y, ny),
                    if is_2d { 0 } else { bin(s.z, nz) },
                ]
            })
            .collect();

        let mut counts = vec![0usize; total_cells];
        for cell in &particle_cells {
            counts[linear_index(cell, &num_cells)] += 1;
        }

        let mut cell_starts = vec![0usize; total_cells + 1];
        let mut accum = 0;
        for (c, count) in counts.iter().enumerate() {
            cell_starts[c] = accum;
            accum += count;
        }
        cell_starts[total_cells] = accum;

        let mut fill = cell_starts.clone();
        let mut members = vec![0usize; positions.len()];
        for (particle, cell) in particle_cells.iter().enumerate() {
            let c = linear_index(cell, &num_cells);
            members[fill[c]] = particle;
            fill[c] += 1;
        }

        trace!(nx, ny, nz, particles = positions.len(), "Built cell list.");

        Some(Self {
            num_cells,
            cell_starts,
            members,
            particle_cells,
            is_2d,
        })
    }

    pub fn num_cells(&self) -> [usize; 3] {
        self.num_cells
    }

    /// All particles in the stencil of cells surrounding `particle`'s cell,
    /// the particle itself included, in no particular order.
    pub fn candidates(&self, particle: usize) -> Vec<usize> {
        let [cx, cy, cz] = self.particle_cells[particle];
        let dz_range = if self.is_2d { 0..=0 } else { -1..=1 };

        let mut out = Vec::new();
        for (dx, dy, dz) in iproduct!(-1i64..=1, -1i64..=1, dz_range) {
            let cell = [
                shift(cx, dx, self.num_cells[0]),
                shift(cy, dy, self.num_cells[1]),
                shift(cz, dz, self.num_cells[2]),
            ];
            let c = linear_index(&cell, &self.num_cells);
            out.extend_from_slice(&self.members[self.cell_starts[c]..self.cell_starts[c + 1]]);
        }
        out
    }
}

#[inline]
fn bin(fraction: f64, n: usize) -> usize {
    ((fraction * n as f64) as usize).min(n - 1)
}

#[inline]
fn shift(index: usize, delta: i64, n: usize) -> usize {
    (index as i64 + delta).rem_euclid(n as i64) as usize
}

#[inline]
fn linear_index(cell: &[usize; 3], num_cells: &[usize; 3]) -> usize {
    cell[0] + num_cells[0] * (cell[1] + num_cells[1] * cell[2])
}
