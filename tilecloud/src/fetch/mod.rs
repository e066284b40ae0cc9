pub mod static_map;
pub mod tile_source;

pub use static_map::{Framing, MapType, StaticMapSource};
pub use tile_source::{FetchPolicy, FetchedMap, TileSource};
