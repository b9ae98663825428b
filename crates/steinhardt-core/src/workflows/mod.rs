//! # Workflows Module
//!
//! High-level entry points that tie the [`crate::core`] primitives and the
//! [`crate::engine`] stages into a complete computation.
//!
//! - **Steinhardt Order Parameters** ([`steinhardt`]) - Validates a particle snapshot,
//!   finds periodic neighbors, and reduces bond-averaged spherical harmonics to
//!   `Q_l` or `W_l`, optionally neighborhood-averaged and normalized.

pub mod steinhardt;
