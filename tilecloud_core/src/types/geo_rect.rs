//! Geographic rectangles given by two corner coordinates.

use crate::distance::{haversine_km, haversine_m};
use anyhow::{Result, ensure};
use std::fmt::Debug;

/// A rectangular map area defined by a start and an end corner, both in
/// degrees.
///
/// Which corner is which (top-left vs bottom-right) is up to the caller and
/// deliberately not constrained; only the coordinate ranges are validated.
/// Consumers that need an oriented rectangle normalize with min/max
/// themselves.
///
/// # Examples
///
/// ```
/// use tilecloud_core::GeoRect;
///
/// let rect = GeoRect::new(35.6895, 139.6917, 35.6814, 139.7068).unwrap();
/// assert!(rect.width_m() > 1000.0 && rect.width_m() < 2000.0);
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct GeoRect {
	pub lat_start: f64,
	pub lon_start: f64,
	pub lat_end: f64,
	pub lon_end: f64,
}

impl GeoRect {
	/// Create a new `GeoRect` from two corner coordinates in degrees.
	///
	/// # Errors
	/// Returns an error if a latitude is outside `[-90, 90]` or a longitude
	/// outside `[-180, 180]`.
	pub fn new(lat_start: f64, lon_start: f64, lat_end: f64, lon_end: f64) -> Result<GeoRect> {
		for (name, lat) in [("lat_start", lat_start), ("lat_end", lat_end)] {
			ensure!((-90.0..=90.0).contains(&lat), "{name} ({lat}) must be in [-90, 90]");
		}
		for (name, lon) in [("lon_start", lon_start), ("lon_end", lon_end)] {
			ensure!((-180.0..=180.0).contains(&lon), "{name} ({lon}) must be in [-180, 180]");
		}
		Ok(GeoRect {
			lat_start,
			lon_start,
			lat_end,
			lon_end,
		})
	}

	/// The midpoint of the rectangle as `(lat, lon)`.
	#[must_use]
	pub fn center(&self) -> (f64, f64) {
		(
			(self.lat_start + self.lat_end) / 2.0,
			(self.lon_start + self.lon_end) / 2.0,
		)
	}

	/// East-west extent in meters, measured along the starting latitude.
	#[must_use]
	pub fn width_m(&self) -> f64 {
		haversine_m(self.lat_start, self.lon_start, self.lat_start, self.lon_end)
	}

	/// North-south extent in meters, measured along the starting longitude.
	#[must_use]
	pub fn height_m(&self) -> f64 {
		haversine_m(self.lat_start, self.lon_start, self.lat_end, self.lon_start)
	}

	/// East-west extent in kilometers.
	#[must_use]
	pub fn width_km(&self) -> f64 {
		haversine_km(self.lat_start, self.lon_start, self.lat_start, self.lon_end)
	}

	/// North-south extent in kilometers.
	#[must_use]
	pub fn height_km(&self) -> f64 {
		haversine_km(self.lat_start, self.lon_start, self.lat_end, self.lon_start)
	}

	/// Pixel size `(width, height)` matching the rectangle's aspect ratio,
	/// with the longer side capped at `max_size`.
	///
	/// Used for the static-map request, where the remote service limits the
	/// raster to 640 px per side.
	///
	/// # Errors
	/// Returns an error if the rectangle has zero extent in either direction.
	pub fn image_size(&self, max_size: u32) -> Result<(u32, u32)> {
		let width = self.width_m();
		let height = self.height_m();
		ensure!(width > 0.0, "rectangle has zero east-west extent");
		ensure!(height > 0.0, "rectangle has zero north-south extent");

		let aspect_ratio = width / height;
		Ok(if aspect_ratio >= 1.0 {
			(max_size, (f64::from(max_size) / aspect_ratio) as u32)
		} else {
			((f64::from(max_size) * aspect_ratio) as u32, max_size)
		})
	}
}

impl Debug for GeoRect {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"GeoRect({}, {} -> {}, {})",
			self.lat_start, self.lon_start, self.lat_end, self.lon_end
		)
	}
}

impl TryFrom<[f64; 4]> for GeoRect {
	type Error = anyhow::Error;

	/// Converts `[lat_start, lon_start, lat_end, lon_end]` into a `GeoRect`.
	fn try_from(input: [f64; 4]) -> Result<Self> {
		GeoRect::new(input[0], input[1], input[2], input[3])
	}
}
