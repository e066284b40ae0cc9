mod geo_rect;
mod map_metadata;
mod point_cloud;
mod tile_coord;

pub use geo_rect::GeoRect;
pub use map_metadata::{CornerRecord, Corners, StaticMapMetadata, TileMapMetadata};
pub use point_cloud::{CloudPoint, PointCloud};
pub use tile_coord::{TILE_SIZE, TileCoord};
