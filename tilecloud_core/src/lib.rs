//! Geometry and data model for tilecloud.
//!
//! This crate contains everything that does not need network or raster I/O:
//! tile coordinate math in the Web Mercator pyramid, geographic rectangles,
//! haversine distances, point clouds with a PCD writer, and the YAML metadata
//! records written next to every generated map image.

pub mod distance;
mod types;

pub use types::*;
