//! YAML metadata records written next to every generated map image.
//!
//! The records are write-once: they are built from the fetch parameters,
//! serialized with serde_yaml_ng and never touched again. Key names follow
//! the files the simulation tooling already consumes (`width_km`,
//! `corners.top_left`, `top_left.latitude`, ...).

use crate::{GeoRect, TileCoord, distance::haversine_km};
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::{fs, path::Path};

/// A `(latitude, longitude)` pair serialized with explicit field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CornerRecord {
	pub latitude: f64,
	pub longitude: f64,
}

impl From<(f64, f64)> for CornerRecord {
	fn from((latitude, longitude): (f64, f64)) -> Self {
		CornerRecord { latitude, longitude }
	}
}

/// The four snapped corner coordinates of a stitched map image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Corners {
	pub top_left: CornerRecord,
	pub top_right: CornerRecord,
	pub bottom_left: CornerRecord,
	pub bottom_right: CornerRecord,
}

/// Metadata for a map stitched from individual tiles.
///
/// The stitched image always covers whole tiles, so its corners are the tile
/// grid lines enclosing the requested rectangle, not the rectangle itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileMapMetadata {
	pub latitude_start: f64,
	pub longitude_start: f64,
	pub latitude_end: f64,
	pub longitude_end: f64,
	pub zoom: u8,
	pub corners: Corners,
	pub width_km: f64,
	pub height_km: f64,
	pub image_file: String,
}

impl TileMapMetadata {
	/// Build the metadata for a stitch covering the inclusive tile rectangle
	/// `[start, end]`.
	///
	/// The south and east corner coordinates come from `end + 1` grid lines;
	/// width/height are haversine distances between adjacent corners.
	///
	/// # Errors
	/// Returns an error if the tile coordinates are on different zoom levels
	/// or not ordered.
	pub fn new(rect: &GeoRect, start: TileCoord, end: TileCoord, image_file: &str) -> Result<TileMapMetadata> {
		ensure!(
			start.level == end.level,
			"tile range spans zoom levels {} and {}",
			start.level,
			end.level
		);
		ensure!(
			start.x <= end.x && start.y <= end.y,
			"tile range {start:?} -> {end:?} is not ordered"
		);

		let level = start.level;
		let (x0, y0) = (u64::from(start.x), u64::from(start.y));
		let (x1, y1) = (u64::from(end.x) + 1, u64::from(end.y) + 1);

		let top_left = TileCoord::grid_to_geo(level, x0, y0);
		let top_right = TileCoord::grid_to_geo(level, x1, y0);
		let bottom_left = TileCoord::grid_to_geo(level, x0, y1);
		let bottom_right = TileCoord::grid_to_geo(level, x1, y1);

		Ok(TileMapMetadata {
			latitude_start: rect.lat_start,
			longitude_start: rect.lon_start,
			latitude_end: rect.lat_end,
			longitude_end: rect.lon_end,
			zoom: level,
			corners: Corners {
				top_left: top_left.into(),
				top_right: top_right.into(),
				bottom_left: bottom_left.into(),
				bottom_right: bottom_right.into(),
			},
			width_km: haversine_km(top_left.0, top_left.1, top_right.0, top_right.1),
			height_km: haversine_km(top_left.0, top_left.1, bottom_left.0, bottom_left.1),
			image_file: image_file.to_string(),
		})
	}

	/// Serialize to a YAML string.
	pub fn to_yaml(&self) -> Result<String> {
		Ok(serde_yaml_ng::to_string(self)?)
	}

	/// Write the YAML record to `path`.
	pub fn write(&self, path: &Path) -> Result<()> {
		fs::write(path, self.to_yaml()?).with_context(|| format!("writing map metadata to {path:?}"))
	}
}

/// Metadata for a single raster fetched from the static-map service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticMapMetadata {
	pub image_file: String,
	pub width_meter: f64,
	pub height_meter: f64,
	pub top_left: CornerRecord,
	pub bottom_right: CornerRecord,
}

impl StaticMapMetadata {
	/// Build the record for a static-map raster of `rect`, sized via
	/// haversine along the rectangle edges.
	#[must_use]
	pub fn new(rect: &GeoRect, image_file: &str) -> StaticMapMetadata {
		StaticMapMetadata {
			image_file: image_file.to_string(),
			width_meter: rect.width_m(),
			height_meter: rect.height_m(),
			top_left: (rect.lat_start, rect.lon_start).into(),
			bottom_right: (rect.lat_end, rect.lon_end).into(),
		}
	}

	/// Serialize to a YAML string.
	pub fn to_yaml(&self) -> Result<String> {
		Ok(serde_yaml_ng::to_string(self)?)
	}

	/// Write the YAML record to `path`.
	pub fn write(&self, path: &Path) -> Result<()> {
		fs::write(path, self.to_yaml()?).with_context(|| format!("writing map metadata to {path:?}"))
	}
}
