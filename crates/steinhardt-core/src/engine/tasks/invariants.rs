use crate::core::harmonics::wigner::Wigner3jTable;
use crate::engine::config::Normalization;
use crate::engine::state::{OrderValue, OrderValues, QlmField};
use num_complex::Complex64;
use std::f64::consts::PI;
use std::sync::Arc;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Rotational invariant evaluated on a single `q_lm` vector.
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantKernel {
    Ql { l: u32 },
    Wl { table: Arc<Wigner3jTable> },
}

impl InvariantKernel {
    pub fn ql(l: u32) -> Self {
        InvariantKernel::Ql { l }
    }

    pub fn wl(l: u32) -> Self {
        InvariantKernel::Wl {
            table: Wigner3jTable::for_degree(l),
        }
    }

    pub fn evaluate(&self, q: &[Complex64], normalization: Normalization) -> OrderValue {
        match self {
            InvariantKernel::Ql { l } => OrderValue::Real(ql(*l, q)),
            InvariantKernel::Wl { table } => {
                let w = wl(table, q);
                match normalization {
                    Normalization::Magnitude => {
                        let norm = squared_norm(q);
                        if norm > 0.0 {
                            OrderValue::Complex(w / norm.powf(1.5))
                        } else {
                            OrderValue::Complex(Complex64::new(0.0, 0.0))
                        }
                    }
                    Normalization::None | Normalization::SystemAverage => OrderValue::Complex(w),
                }
            }
        }
    }

    fn collect(&self, values: Vec<OrderValue>) -> OrderValues {
        match self {
            InvariantKernel::Ql { .. } => {
                OrderValues::Real(values.iter().map(OrderValue::re).collect())
            }
            InvariantKernel::Wl { .. } => {
                OrderValues::Complex(values.iter().map(OrderValue::to_complex).collect())
            }
        }
    }
}

/// `Σ_m |q_lm|²`.
pub fn squared_norm(q: &[Complex64]) -> f64 {
    q.iter().map(Complex64::norm_sqr).sum()
}

/// `Q_l = sqrt(4π/(2l+1) · Σ_m |q_lm|²)`.
pub fn ql(l: u32, q: &[Complex64]) -> f64 {
    (4.0 * PI / (2 * l + 1) as f64 * squared_norm(q)).sqrt()
}

/// `W_l = Σ_{m1+m2+m3=0} (l l l; m1 m2 m3) q_lm1 q_lm2 q_lm3`.
pub fn wl(table: &Wigner3jTable, q: &[Complex64]) -> Complex64 {
    let l = table.degree() as i64;
    let at = |m: i64| q[(m + l) as usize];
    table
        .iter()
        .filter(|&(_, _, _, c)| c != 0.0)
        .map(|(m1, m2, m3, c)| at(m1) * at(m2) * at(m3) * c)
        .sum()
}

/// Evaluates the invariant for every particle of `field`.
///
/// Under [`Normalization::SystemAverage`] each particle reports the invariant of
/// the system-mean `q_lm`.
#[instrument(skip_all, name = "invariant_task")]
pub fn run(
    field: &QlmField,
    kernel: &InvariantKernel,
    normalization: Normalization,
) -> OrderValues {
    let values = match normalization {
        Normalization::SystemAverage => {
            let value = kernel.evaluate(&field.mean(), normalization);
            debug!(value = ?value, "Broadcasting invariant of the system-averaged q_lm.");
            vec![value; field.num_particles()]
        }
        Normalization::None | Normalization::Magnitude => {
            per_particle(field, |q| kernel.evaluate(q, normalization))
        }
    };
    kernel.collect(values)
}

fn per_particle<T, F>(field: &QlmField, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&[Complex64]) -> T + Sync + Send,
{
    #[cfg(not(feature = "parallel"))]
    let iterator = field.as_slice().chunks(field.width());

    #[cfg(feature = "parallel")]
    let iterator = field.as_slice().par_chunks(field.width());

    iterator.map(f).collect()
}
