//! Tile coordinates in a Web Mercator (slippy map) tile pyramid.
//!
//! A tile is a fixed 256×256 pixel raster square addressed by `(zoom, x, y)`.
//! This module converts between geographic coordinates and tile indices and
//! back; the two conversions are exact inverses up to tile-grid quantization.

use anyhow::{Result, ensure};
use std::{
	f64::consts::PI,
	fmt::{self, Debug},
};

/// Edge length of a map tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// A tile coordinate in a Web Mercator tile pyramid, with zoom level and x/y
/// indices.
#[derive(Eq, PartialEq, Clone, Copy, Hash)]
pub struct TileCoord {
	/// The zoom level of the tile.
	pub level: u8,
	/// The x index of the tile.
	pub x: u32,
	/// The y index of the tile.
	pub y: u32,
}

impl TileCoord {
	/// Create a new `TileCoord` at the given zoom `level` and tile indices.
	///
	/// # Errors
	/// Returns an error if `level` > 31 or an index is outside `[0, 2^level)`.
	pub fn new(level: u8, x: u32, y: u32) -> Result<TileCoord> {
		ensure!(level <= 31, "level ({level}) must be <= 31");
		let max = 2u32.pow(u32::from(level));
		ensure!(x < max, "x ({x}) out of bounds for level {level}");
		ensure!(y < max, "y ({y}) out of bounds for level {level}");
		Ok(TileCoord { level, x, y })
	}

	/// Create a `TileCoord` from geographic coordinates at a given zoom level.
	///
	/// Uses the slippy-map formula: `x = (lon + 180) / 360 · 2^z` and
	/// `y = (1 − asinh(tan(lat)) / π) / 2 · 2^z`, truncated to tile indices.
	/// Latitudes beyond the Mercator singularity (|lat| > ~85.05°) clamp to
	/// the edge tile row instead of being undefined.
	///
	/// # Arguments
	///
	/// * `lat` - Latitude in degrees, range `[-90, 90]`
	/// * `lon` - Longitude in degrees, range `[-180, 180]`
	/// * `level` - Zoom level, range `[0, 31]`
	///
	/// # Examples
	///
	/// ```
	/// use tilecloud_core::TileCoord;
	///
	/// // central Tokyo at zoom 16
	/// let coord = TileCoord::from_geo(35.6895, 139.6917, 16).unwrap();
	/// assert_eq!((coord.x, coord.y), (58198, 25804));
	/// ```
	pub fn from_geo(lat: f64, lon: f64, level: u8) -> Result<TileCoord> {
		ensure!(level <= 31, "level ({level}) must be <= 31");
		ensure!((-90.0..=90.0).contains(&lat), "lat ({lat}) must be in [-90, 90]");
		ensure!((-180.0..=180.0).contains(&lon), "lon ({lon}) must be in [-180, 180]");

		let n = 2.0f64.powi(i32::from(level));
		let x = (lon + 180.0) / 360.0 * n;
		let y = (1.0 - lat.to_radians().tan().asinh() / PI) / 2.0 * n;

		TileCoord::new(
			level,
			u32::try_from(x.clamp(0.0, n - 1.0).floor() as i64)?,
			u32::try_from(y.clamp(0.0, n - 1.0).floor() as i64)?,
		)
	}

	/// Geographic coordinates `(lat, lon)` of this tile's north-west corner,
	/// in degrees.
	///
	/// # Examples
	///
	/// ```
	/// use tilecloud_core::TileCoord;
	///
	/// let (lat, lon) = TileCoord::new(1, 1, 1).unwrap().as_geo();
	/// assert_eq!((lat, lon), (0.0, 0.0));
	/// ```
	#[must_use]
	pub fn as_geo(&self) -> (f64, f64) {
		TileCoord::grid_to_geo(self.level, u64::from(self.x), u64::from(self.y))
	}

	/// Geographic coordinates `(lat, lon)` of a tile-grid line intersection.
	///
	/// Unlike [`as_geo`](Self::as_geo) this takes raw grid indices and allows
	/// `2^level` (the far edge of the grid), which is needed to compute the
	/// south-east corners of a stitched map (`end_tile + 1`).
	#[must_use]
	pub fn grid_to_geo(level: u8, x: u64, y: u64) -> (f64, f64) {
		let n = 2.0f64.powi(i32::from(level));
		let lon = (x as f64) / n * 360.0 - 180.0;
		let lat = (PI * (1.0 - 2.0 * (y as f64) / n)).sinh().atan().to_degrees();
		(lat, lon)
	}

	/// Pixel offset of this tile's north-west corner in the global pixel grid
	/// of its zoom level.
	#[must_use]
	pub fn pixel_offset(&self) -> (u64, u64) {
		(
			u64::from(self.x) * u64::from(TILE_SIZE),
			u64::from(self.y) * u64::from(TILE_SIZE),
		)
	}

	/// The maximum valid x or y index at this tile's zoom level (`2^level - 1`).
	#[must_use]
	pub fn max_value(&self) -> u32 {
		((1u64 << self.level) - 1) as u32
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_fmt(format_args!("TileCoord({}, [{}, {}])", &self.level, &self.x, &self.y))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn new_and_getters() {
		let coord = TileCoord::new(5, 3, 4).unwrap();
		assert_eq!(coord.level, 5);
		assert_eq!(coord.x, 3);
		assert_eq!(coord.y, 4);
	}

	#[test]
	fn new_rejects_out_of_bounds() {
		assert!(TileCoord::new(32, 0, 0).is_err());
		assert!(TileCoord::new(5, 32, 0).is_err());
		assert!(TileCoord::new(5, 0, 32).is_err());
		assert!(TileCoord::new(5, 31, 31).is_ok());
	}

	#[test]
	fn tokyo_at_zoom_16() {
		// pinned regression value for the tile containing central Tokyo
		let coord = TileCoord::from_geo(35.6895, 139.6917, 16).unwrap();
		assert_eq!(coord, TileCoord::new(16, 58198, 25804).unwrap());
	}

	#[test]
	fn from_geo_rejects_invalid_input() {
		assert!(TileCoord::from_geo(91.0, 0.0, 10).is_err());
		assert!(TileCoord::from_geo(-91.0, 0.0, 10).is_err());
		assert!(TileCoord::from_geo(0.0, 181.0, 10).is_err());
		assert!(TileCoord::from_geo(0.0, -181.0, 10).is_err());
		assert!(TileCoord::from_geo(0.0, 0.0, 32).is_err());
	}

	#[test]
	fn poles_clamp_to_edge_rows() {
		let north = TileCoord::from_geo(90.0, 0.0, 4).unwrap();
		assert_eq!(north.y, 0);
		let south = TileCoord::from_geo(-90.0, 0.0, 4).unwrap();
		assert_eq!(south.y, 15);
	}

	#[test]
	fn as_geo_corners() {
		assert_eq!(TileCoord::new(0, 0, 0).unwrap().as_geo(), (85.0511287798066, -180.0));
		assert_eq!(TileCoord::new(1, 1, 1).unwrap().as_geo(), (0.0, 0.0));
	}

	#[rstest]
	#[case(35.6895, 139.6917, 16)]
	#[case(52.520008, 13.404954, 10)]
	#[case(-33.8688, 151.2093, 12)]
	#[case(0.0, 0.0, 0)]
	#[case(84.9, -179.9, 7)]
	fn round_trip_within_one_tile(#[case] lat: f64, #[case] lon: f64, #[case] level: u8) {
		let coord = TileCoord::from_geo(lat, lon, level).unwrap();
		let (lat2, lon2) = coord.as_geo();

		// the north-west corner must be at most one tile width away
		let n = 2.0f64.powi(i32::from(level));
		let lon_tile_width = 360.0 / n;
		assert!((lon - lon2).abs() <= lon_tile_width, "lon {lon} vs {lon2}");

		// the latitude span of the tile is bounded by the span at its own row
		let (lat_next, _) = TileCoord::new(level, coord.x, (coord.y + 1).min(coord.max_value()))
			.unwrap()
			.as_geo();
		let lat_tile_height = (lat2 - lat_next).abs().max(lon_tile_width);
		assert!((lat - lat2).abs() <= lat_tile_height, "lat {lat} vs {lat2}");
	}

	#[test]
	fn grid_to_geo_accepts_the_far_edge() {
		let (lat, lon) = TileCoord::grid_to_geo(0, 1, 1);
		assert!((lat + 85.0511287798066).abs() < 1e-10);
		assert_eq!(lon, 180.0);
		assert_eq!(TileCoord::grid_to_geo(2, 2, 2), (0.0, 0.0));
	}

	#[test]
	fn pixel_offset_scales_by_tile_size() {
		let coord = TileCoord::new(16, 58198, 25804).unwrap();
		assert_eq!(coord.pixel_offset(), (58198 * 256, 25804 * 256));
	}

	#[test]
	fn debug_format() {
		let coord = TileCoord::new(4, 7, 8).unwrap();
		assert_eq!(format!("{coord:?}"), "TileCoord(4, [7, 8])");
	}
}
