//! Raster to point cloud sampling.
//!
//! Walks the image on a regular grid whose spacing is derived from a
//! real-world sample interval, and emits one colored point per grid cell.
//! Nearest-pixel sampling only, no interpolation.

use anyhow::{Result, ensure};
use image::DynamicImage;
use tilecloud_core::{CloudPoint, PointCloud};

/// Parameters for sampling a raster into a point cloud.
///
/// `x_meter`/`y_meter` give the real-world extent the raster represents,
/// `interval` the desired spacing between samples. All three are in meters
/// and must be positive. The defaults match the command-line defaults: a
/// 100 m × 100 m area sampled every meter at height zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleParams {
	/// Real-world width of the raster in meters.
	pub x_meter: f64,
	/// Real-world height of the raster in meters.
	pub y_meter: f64,
	/// Flat height assigned to every point, in meters.
	pub z_meter: f64,
	/// Desired spacing between samples, in meters.
	pub interval: f64,
	/// Offset added to every x coordinate, in meters.
	pub offset_x: f64,
	/// Offset added to every y coordinate, in meters.
	pub offset_y: f64,
}

impl Default for SampleParams {
	fn default() -> Self {
		SampleParams {
			x_meter: 100.0,
			y_meter: 100.0,
			z_meter: 0.0,
			interval: 1.0,
			offset_x: 0.0,
			offset_y: 0.0,
		}
	}
}

/// Sample `image` on a regular grid and return one colored point per cell.
///
/// The grid steps in pixel space are `interval · width / x_meter` and
/// `interval · height / y_meter`; each sample reads the pixel at the
/// truncated grid position. The vertical axis is flipped: image row 0 is the
/// north edge, but point-cloud y grows northward. Colors are the RGB
/// channels normalized to `[0, 1]`; an alpha channel is ignored.
///
/// # Errors
/// Returns an error for an empty image or non-positive `interval`,
/// `x_meter` or `y_meter` (which would otherwise loop forever).
///
/// # Examples
///
/// ```
/// use image::DynamicImage;
/// use tilecloud_image::{SampleParams, sample_image};
///
/// let image = DynamicImage::new_rgb8(100, 100);
/// let params = SampleParams { interval: 50.0, ..SampleParams::default() };
/// let cloud = sample_image(&image, &params).unwrap();
/// assert_eq!(cloud.len(), 4);
/// ```
pub fn sample_image(image: &DynamicImage, params: &SampleParams) -> Result<PointCloud> {
	let width = image.width();
	let height = image.height();
	ensure!(width > 0 && height > 0, "cannot sample an empty image");
	ensure!(params.interval > 0.0, "sample interval ({}) must be positive", params.interval);
	ensure!(params.x_meter > 0.0, "x_meter ({}) must be positive", params.x_meter);
	ensure!(params.y_meter > 0.0, "y_meter ({}) must be positive", params.y_meter);

	let width_f = f64::from(width);
	let height_f = f64::from(height);
	let step_x = params.interval * width_f / params.x_meter;
	let step_y = params.interval * height_f / params.y_meter;

	let rgb = image.to_rgb8();
	let mut cloud = PointCloud::new();

	let mut y = 0.0;
	while y < height_f {
		let mut x = 0.0;
		while x < width_f {
			let pixel = rgb.get_pixel(x as u32, y as u32);

			cloud.push(CloudPoint {
				x: x / width_f * params.x_meter + params.offset_x,
				y: (height_f - y) / height_f * params.y_meter + params.offset_y,
				z: params.z_meter,
				r: f64::from(pixel[0]) / 255.0,
				g: f64::from(pixel[1]) / 255.0,
				b: f64::from(pixel[2]) / 255.0,
			});

			x += step_x;
		}
		y += step_y;
	}

	log::debug!(
		"sampled {} points from a {width}x{height} raster (interval {} m)",
		cloud.len(),
		params.interval
	);

	Ok(cloud)
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{ImageBuffer, Rgb, Rgba};

	fn solid_rgb(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
		DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb(color)))
	}

	#[test]
	fn red_image_interval_50_gives_four_red_points() {
		let image = solid_rgb(100, 100, [255, 0, 0]);
		let params = SampleParams {
			interval: 50.0,
			..SampleParams::default()
		};

		let cloud = sample_image(&image, &params).unwrap();
		assert_eq!(cloud.len(), 4);
		for p in cloud.iter() {
			assert_eq!((p.r, p.g, p.b), (1.0, 0.0, 0.0));
			assert_eq!(p.z, 0.0);
		}
	}

	#[test]
	fn halving_the_interval_quadruples_the_point_count() {
		let image = solid_rgb(100, 100, [10, 20, 30]);
		let coarse = sample_image(
			&image,
			&SampleParams {
				interval: 20.0,
				..SampleParams::default()
			},
		)
		.unwrap();
		let fine = sample_image(
			&image,
			&SampleParams {
				interval: 10.0,
				..SampleParams::default()
			},
		)
		.unwrap();

		assert_eq!(coarse.len(), 25);
		assert_eq!(fine.len(), 100);
	}

	#[test]
	fn vertical_axis_is_flipped() {
		// top row red, bottom row blue
		let image = DynamicImage::ImageRgb8(ImageBuffer::from_fn(2, 2, |_, y| {
			if y == 0 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
		}));
		let params = SampleParams {
			x_meter: 2.0,
			y_meter: 2.0,
			interval: 1.0,
			..SampleParams::default()
		};

		let cloud = sample_image(&image, &params).unwrap();
		assert_eq!(cloud.len(), 4);

		// the red (top/north) pixels must end up with the larger y
		for p in cloud.iter() {
			if p.r == 1.0 {
				assert_eq!(p.y, 2.0);
			} else {
				assert_eq!(p.y, 1.0);
			}
		}
	}

	#[test]
	fn offsets_shift_every_point() {
		let image = solid_rgb(10, 10, [0, 255, 0]);
		let params = SampleParams {
			x_meter: 10.0,
			y_meter: 10.0,
			interval: 5.0,
			offset_x: 100.0,
			offset_y: -50.0,
			..SampleParams::default()
		};

		let cloud = sample_image(&image, &params).unwrap();
		for p in cloud.iter() {
			assert!(p.x >= 100.0 && p.x < 110.0);
			assert!(p.y > -50.0 && p.y <= -40.0);
		}
	}

	#[test]
	fn z_meter_sets_a_flat_height() {
		let image = solid_rgb(4, 4, [1, 2, 3]);
		let params = SampleParams {
			x_meter: 4.0,
			y_meter: 4.0,
			interval: 2.0,
			z_meter: 12.5,
			..SampleParams::default()
		};
		for p in sample_image(&image, &params).unwrap().iter() {
			assert_eq!(p.z, 12.5);
		}
	}

	#[test]
	fn alpha_channel_is_ignored() {
		let image = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(10, 10, Rgba([255, 128, 0, 7])));
		let params = SampleParams {
			x_meter: 10.0,
			y_meter: 10.0,
			interval: 10.0,
			..SampleParams::default()
		};

		let cloud = sample_image(&image, &params).unwrap();
		assert_eq!(cloud.len(), 1);
		let p = cloud.points[0];
		assert_eq!(p.r, 1.0);
		assert_eq!(p.g, 128.0 / 255.0);
		assert_eq!(p.b, 0.0);
	}

	#[test]
	fn invalid_parameters_fail_fast() {
		let image = solid_rgb(10, 10, [0, 0, 0]);
		let bad = |params: SampleParams| sample_image(&image, &params).is_err();

		assert!(bad(SampleParams {
			interval: 0.0,
			..SampleParams::default()
		}));
		assert!(bad(SampleParams {
			interval: -1.0,
			..SampleParams::default()
		}));
		assert!(bad(SampleParams {
			x_meter: 0.0,
			..SampleParams::default()
		}));
		assert!(bad(SampleParams {
			y_meter: -5.0,
			..SampleParams::default()
		}));
	}

	#[test]
	fn empty_image_fails_fast() {
		let image = DynamicImage::new_rgb8(0, 0);
		assert!(sample_image(&image, &SampleParams::default()).is_err());
	}
}
