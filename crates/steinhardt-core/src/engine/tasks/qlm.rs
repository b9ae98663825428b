use crate::engine::context::ComputeContext;
use crate::engine::state::QlmField;
use num_complex::Complex64;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Bond-averaged spherical harmonics `q_lm(i) = (1/k_i) Σ_j Y_lm(r̂_ij)`.
///
/// Particles without bonds keep an all-zero row.
#[instrument(skip_all, name = "qlm_accumulation_task")]
pub fn run(context: &ComputeContext) -> QlmField {
    let mut field = QlmField::zeros(context.num_particles(), context.degree());
    let width = field.width();

    #[cfg(not(feature = "parallel"))]
    let iterator = field.as_mut_slice().chunks_mut(width);

    #[cfg(feature = "parallel")]
    let iterator = field.as_mut_slice().par_chunks_mut(width);

    iterator.enumerate().for_each(|(i, row)| {
        let bonds = context.neighbors.bonds_of(i);
        if bonds.is_empty() {
            return;
        }
        let mut ylm = vec![Complex64::new(0.0, 0.0); width];
        for bond in bonds {
            context.evaluator.evaluate_into(&bond.displacement, &mut ylm);
            for (acc, y) in row.iter_mut().zip(&ylm) {
                *acc += y;
            }
        }
        let inv = 1.0 / bonds.len() as f64;
        row.iter_mut().for_each(|q| *q *= inv);
    });

    debug!(
        particles = field.num_particles(),
        width, "Accumulated per-particle q_lm."
    );
    field
}
