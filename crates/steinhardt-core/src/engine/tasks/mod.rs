//! Computational stages of a single order-parameter evaluation.
//!
//! Each stage reads the neighbor list and per-particle state prepared by the
//! previous one: bond-averaged `q_lm` accumulation, optional neighborhood
//! averaging, and the final reduction to rotational invariants.

pub mod averaging;
pub mod invariants;
pub mod qlm;
