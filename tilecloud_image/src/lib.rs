//! Raster handling for tilecloud.
//!
//! Built on the `image` crate: a canvas for stitching 256×256 map tiles, PNG
//! encode/decode helpers, and the sampler that turns a raster into a colored
//! ground-texture point cloud.

mod canvas;
pub mod png;
mod sampler;

pub use canvas::TileCanvas;
pub use sampler::{SampleParams, sample_image};
