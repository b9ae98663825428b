use crate::engine::context::ComputeContext;
use crate::engine::state::QlmField;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// First-shell neighborhood average `(q(i) + Σ_j q(j)) / (k_i + 1)`.
///
/// Always reads the raw field, so the result does not depend on particle order.
#[instrument(skip_all, name = "neighborhood_averaging_task")]
pub fn run(context: &ComputeContext, raw: &QlmField) -> QlmField {
    let mut averaged = raw.clone();
    let width = averaged.width();

    #[cfg(not(feature = "parallel"))]
    let iterator = averaged.as_mut_slice().chunks_mut(width);

    #[cfg(feature = "parallel")]
    let iterator = averaged.as_mut_slice().par_chunks_mut(width);

    iterator.enumerate().for_each(|(i, row)| {
        let bonds = context.neighbors.bonds_of(i);
        if bonds.is_empty() {
            return;
        }
        for bond in bonds {
            for (acc, q) in row.iter_mut().zip(raw.particle(bond.neighbor)) {
                *acc += q;
            }
        }
        let inv = 1.0 / (bonds.len() + 1) as f64;
        row.iter_mut().for_each(|q| *q *= inv);
    });

    debug!(
        particles = averaged.num_particles(),
        "Averaged q_lm over first neighbor shells."
    );
    averaged
}
