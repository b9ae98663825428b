//! # Core Models Module
//!
//! Plain data types shared by the neighbor search and the order-parameter engine.
//!
//! ## Key Components
//!
//! - [`simulation_box`] - Periodic (optionally triclinic or 2D) simulation cell and the
//!   [`PeriodicGeometry`](simulation_box::PeriodicGeometry) contract it fulfils
//! - [`bond`] - Directed bond between two particles with its minimum-image displacement
//!
//! ## Usage
//!
//! ```ignore
//! use steinhardt::core::models::simulation_box::{PeriodicGeometry, SimulationBox};
//! use nalgebra::Point3;
//!
//! let sim_box = SimulationBox::cube(10.0)?;
//! let d = sim_box.minimum_image(&Point3::new(-4.5, 0.0, 0.0), &Point3::new(4.5, 0.0, 0.0));
//! assert!((d.x + 1.0).abs() < 1e-12);
//! ```

pub mod bond;
pub mod simulation_box;
