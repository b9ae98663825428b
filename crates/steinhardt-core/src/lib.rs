//! # Steinhardt Order Parameter Library
//!
//! Bond-orientational order parameters `Q_l` and `W_l` for particle snapshots in
//! periodic simulation boxes.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless models (`SimulationBox`, `Bond`),
//!   the periodic neighbor search, and the special functions (spherical
//!   harmonics, Wigner 3-j symbols).
//!
//! - **[`engine`]: The Logic Core.** Configuration, per-particle `q_lm` state,
//!   progress reporting, and the computational stages that accumulate, average,
//!   and reduce `q_lm` vectors.
//!
//! - **[`workflows`]: The Public API.** The [`Steinhardt`] compute object, which
//!   validates input, runs the stages in order, and returns an
//!   [`OrderParameterResult`].
//!
//! ```no_run
//! use nalgebra::Point3;
//! use steinhardt::{SimulationBox, Steinhardt};
//!
//! let positions = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
//! let sim_box = SimulationBox::cube(10.0)?;
//! let result = Steinhardt::with_degree(6, 1.5)?.compute(&positions, &sim_box)?;
//! println!("mean Q6 = {}", result.mean().re);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod engine;
pub mod workflows;

pub use crate::core::models::simulation_box::{PeriodicGeometry, SimulationBox};
pub use crate::engine::config::{SteinhardtConfig, SteinhardtConfigBuilder};
pub use crate::engine::error::EngineError;
pub use crate::workflows::steinhardt::{OrderParameterResult, Steinhardt};
