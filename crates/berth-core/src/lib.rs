//! Berth Core
//!
//! Shared primitives for the Berth docking framework: geometry, fast collections,
//! logging setup and profiling scopes.

pub mod alloc;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
