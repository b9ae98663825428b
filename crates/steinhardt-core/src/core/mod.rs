//! # Core Module
//!
//! Stateless data structures and numerical kernels for bond-orientational order analysis.
//!
//! ## Architecture
//!
//! - **Models** ([`models`]) - Periodic simulation box and directed bonds
//! - **Neighbor Search** ([`neighbors`]) - Fixed-radius queries with minimum-image displacements
//! - **Angular Harmonics** ([`harmonics`]) - Spherical harmonics and Wigner 3-j coefficients
//!
//! Nothing in this layer holds state between calls; the [`crate::engine`] layer composes
//! these pieces into the Steinhardt computation.

pub mod harmonics;
pub mod models;
pub mod neighbors;
