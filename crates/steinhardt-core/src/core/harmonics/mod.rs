//! # Angular Harmonics Module
//!
//! The angular building blocks of the bond-orientational order parameters.
//!
//! - [`spherical`] - Complex spherical harmonics `Y_l^m` of a bond direction
//! - [`wigner`] - Wigner 3-j symbols and the process-wide per-degree table cache used
//!   to contract three `q_lm` vectors into the rotational invariant `W_l`
//!
//! Both are pure functions of their inputs and safe to share across threads.

pub mod spherical;
pub mod wigner;
