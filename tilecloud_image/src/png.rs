//! PNG encoding and decoding helpers.

use anyhow::{Context, Result, anyhow, bail};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, codecs::png::PngEncoder, load_from_memory_with_format};
use std::path::Path;

fn extended_color_type(image: &DynamicImage) -> Result<ExtendedColorType> {
	Ok(match image {
		DynamicImage::ImageLuma8(_) => ExtendedColorType::L8,
		DynamicImage::ImageLumaA8(_) => ExtendedColorType::La8,
		DynamicImage::ImageRgb8(_) => ExtendedColorType::Rgb8,
		DynamicImage::ImageRgba8(_) => ExtendedColorType::Rgba8,
		_ => bail!("png encoding only supports 8-bit Grey, GreyA, RGB or RGBA images"),
	})
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
	let mut buffer: Vec<u8> = Vec::new();
	PngEncoder::new(&mut buffer).write_image(
		image.as_bytes(),
		image.width(),
		image.height(),
		extended_color_type(image)?,
	)?;
	Ok(buffer)
}

/// Decode PNG bytes into an image.
pub fn decode_png(bytes: &[u8]) -> Result<DynamicImage> {
	load_from_memory_with_format(bytes, ImageFormat::Png).map_err(|e| anyhow!("failed to decode PNG image: {e}"))
}

/// Load a PNG file from `path`.
pub fn read_png(path: &Path) -> Result<DynamicImage> {
	let bytes = std::fs::read(path).with_context(|| format!("reading image {path:?}"))?;
	decode_png(&bytes)
}

/// Write `image` as a PNG file at `path`.
pub fn write_png(path: &Path, image: &DynamicImage) -> Result<()> {
	let bytes = encode_png(image)?;
	std::fs::write(path, bytes).with_context(|| format!("writing image {path:?}"))
}
