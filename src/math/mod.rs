//! Math utilities for navigation and telemetry.
//!
//! - [`coordinates`] holds the world↔tile mapping used by movement
//!   resolution, the minimap raycaster, and scene placement.
//! - [`vec`] holds the small vector type used for bearing-angle telemetry.

pub mod coordinates;
pub mod vec;
