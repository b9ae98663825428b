//! # Neighbor Search Module
//!
//! Fixed-radius neighbor queries under periodic boundary conditions.
//!
//! [`finder::NeighborFinder`] produces one directed bond list per particle. Large boxes are
//! searched through a periodic cell list; boxes too small to hold three cells along
//! every axis fall back to an all-pairs scan. Both paths yield identical lists.

mod cell_list;
pub mod finder;
