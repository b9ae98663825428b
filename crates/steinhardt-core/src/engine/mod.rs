//! # Engine Module
//!
//! Runs one order-parameter evaluation over a particle snapshot: configuration,
//! per-particle state, and the computational stages that turn a neighbor list
//! into `Q_l` or `W_l` values.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Degree, cutoff, and the averaging and normalization flags
//! - **State** ([`state`]) - Per-particle `q_lm` storage and order-parameter outputs
//! - **Progress Monitoring** ([`progress`]) - Phase events forwarded to an optional callback
//! - **Error Handling** ([`error`]) - Configuration and input validation failures
//!
//! The stages themselves live in crate-private tasks and are driven by
//! [`crate::workflows`].

pub mod config;
pub(crate) mod context;
pub mod error;
pub mod progress;
pub mod state;
pub(crate) mod tasks;
