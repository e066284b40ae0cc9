//! Composite canvas for stitching map tiles.

use anyhow::{Result, ensure};
use image::{DynamicImage, RgbImage, imageops};
use tilecloud_core::{TILE_SIZE, TileCoord};

/// A composite RGB raster covering an inclusive rectangle of map tiles.
///
/// The canvas is `(Δx+1)·256 × (Δy+1)·256` pixels and starts out black;
/// fetched tiles are pasted at their grid position. Regions whose tile could
/// not be fetched simply stay black.
///
/// # Examples
///
/// ```
/// use tilecloud_core::TileCoord;
/// use tilecloud_image::TileCanvas;
///
/// let start = TileCoord::new(16, 58198, 25804).unwrap();
/// let end = TileCoord::new(16, 58200, 25806).unwrap();
/// let canvas = TileCanvas::new(start, end).unwrap();
/// assert_eq!((canvas.width(), canvas.height()), (768, 768));
/// ```
pub struct TileCanvas {
	image: RgbImage,
	start: TileCoord,
	end: TileCoord,
}

impl TileCanvas {
	/// Create a black canvas covering the inclusive tile rectangle
	/// `[start, end]`.
	///
	/// # Errors
	/// Returns an error if the coordinates are on different zoom levels or
	/// not ordered.
	pub fn new(start: TileCoord, end: TileCoord) -> Result<TileCanvas> {
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

		let width = (end.x - start.x + 1) * TILE_SIZE;
		let height = (end.y - start.y + 1) * TILE_SIZE;

		Ok(TileCanvas {
			image: RgbImage::new(width, height),
			start,
			end,
		})
	}

	/// Paste a 256×256 tile at its grid position.
	///
	/// # Errors
	/// Returns an error if `coord` lies outside the canvas range or the tile
	/// has the wrong dimensions.
	pub fn paste(&mut self, coord: TileCoord, tile: &DynamicImage) -> Result<()> {
		ensure!(
			coord.level == self.start.level,
			"tile {coord:?} has the wrong zoom level for this canvas"
		);
		ensure!(
			coord.x >= self.start.x && coord.x <= self.end.x && coord.y >= self.start.y && coord.y <= self.end.y,
			"tile {coord:?} is outside the canvas range {:?} -> {:?}",
			self.start,
			self.end
		);
		ensure!(
			tile.width() == TILE_SIZE && tile.height() == TILE_SIZE,
			"tile {coord:?} is {}x{}, expected {TILE_SIZE}x{TILE_SIZE}",
			tile.width(),
			tile.height()
		);

		let x = i64::from((coord.x - self.start.x) * TILE_SIZE);
		let y = i64::from((coord.y - self.start.y) * TILE_SIZE);
		imageops::replace(&mut self.image, &tile.to_rgb8(), x, y);

		Ok(())
	}

	/// Canvas width in pixels.
	#[must_use]
	pub fn width(&self) -> u32 {
		self.image.width()
	}

	/// Canvas height in pixels.
	#[must_use]
	pub fn height(&self) -> u32 {
		self.image.height()
	}

	/// First tile (north-west) of the canvas.
	#[must_use]
	pub fn start(&self) -> TileCoord {
		self.start
	}

	/// Last tile (south-east) of the canvas.
	#[must_use]
	pub fn end(&self) -> TileCoord {
		self.end
	}

	/// Consume the canvas and return the stitched raster.
	#[must_use]
	pub fn into_image(self) -> DynamicImage {
		DynamicImage::ImageRgb8(self.image)
	}
}
