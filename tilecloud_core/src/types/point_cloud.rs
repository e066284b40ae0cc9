//! Colored 3-D point clouds and the PCD file writer.

use anyhow::{Context, Result, ensure};
use std::{
	fs::File,
	io::{BufWriter, Write},
	path::Path,
};

/// A single point with position in meters and an RGB color, channels
/// normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudPoint {
	pub x: f64,
	pub y: f64,
	pub z: f64,
	pub r: f64,
	pub g: f64,
	pub b: f64,
}

impl CloudPoint {
	/// Pack the color into a single `0x00RRGGBB` value, the encoding PCD uses
	/// for its `rgb` field.
	#[must_use]
	pub fn packed_rgb(&self) -> u32 {
		let to_byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
		(to_byte(self.r) << 16) | (to_byte(self.g) << 8) | to_byte(self.b)
	}
}

/// An unordered set of colored 3-D points representing a sampled surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
	pub points: Vec<CloudPoint>,
}

impl PointCloud {
	#[must_use]
	pub fn new() -> PointCloud {
		PointCloud::default()
	}

	pub fn push(&mut self, point: CloudPoint) {
		self.points.push(point);
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.points.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.points.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &CloudPoint> {
		self.points.iter()
	}

	/// Write the cloud in ASCII PCD v0.7 format with fields `x y z rgb`.
	///
	/// The color is stored as an unsigned 32-bit `0x00RRGGBB` value, which
	/// keeps the ASCII output lossless and deterministic.
	///
	/// # Errors
	/// Returns an error if the cloud is empty or the writer fails.
	pub fn write_pcd<W: Write>(&self, writer: &mut W) -> Result<()> {
		ensure!(!self.is_empty(), "refusing to write an empty point cloud");

		let n = self.len();
		writeln!(writer, "# .PCD v0.7 - Point Cloud Data file format")?;
		writeln!(writer, "VERSION 0.7")?;
		writeln!(writer, "FIELDS x y z rgb")?;
		writeln!(writer, "SIZE 4 4 4 4")?;
		writeln!(writer, "TYPE F F F U")?;
		writeln!(writer, "COUNT 1 1 1 1")?;
		writeln!(writer, "WIDTH {n}")?;
		writeln!(writer, "HEIGHT 1")?;
		writeln!(writer, "VIEWPOINT 0 0 0 1 0 0 0")?;
		writeln!(writer, "POINTS {n}")?;
		writeln!(writer, "DATA ascii")?;

		for p in &self.points {
			writeln!(writer, "{} {} {} {}", p.x, p.y, p.z, p.packed_rgb())?;
		}

		Ok(())
	}

	/// Write the cloud to a PCD file at `path`.
	pub fn write_pcd_file(&self, path: &Path) -> Result<()> {
		let file = File::create(path).with_context(|| format!("creating point cloud file {path:?}"))?;
		let mut writer = BufWriter::new(file);
		self.write_pcd(&mut writer)?;
		writer.flush()?;
		Ok(())
	}
}
