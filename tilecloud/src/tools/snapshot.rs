use crate::fetch::{Framing, MapType, StaticMapSource};
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tilecloud_core::{GeoRect, StaticMapMetadata};
use tilecloud_image::{SampleParams, png, sample_image};

/// Environment variable consulted when `--api-key` is not given.
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// latitude of the top-left corner
	#[arg(allow_hyphen_values = true)]
	lat_start: f64,

	/// longitude of the top-left corner
	#[arg(allow_hyphen_values = true)]
	lon_start: f64,

	/// latitude of the bottom-right corner
	#[arg(allow_hyphen_values = true)]
	lat_end: f64,

	/// longitude of the bottom-right corner
	#[arg(allow_hyphen_values = true)]
	lon_end: f64,

	/// static-map API key (default: $GOOGLE_MAPS_API_KEY)
	#[arg(long, value_name = "KEY")]
	api_key: Option<String>,

	/// map rendering style
	#[arg(long, value_enum, default_value_t = MapType::Roadmap)]
	maptype: MapType,

	/// zoom level (center framing only)
	#[arg(long, value_name = "int", default_value_t = 16)]
	zoom: u8,

	/// how to frame the bounding box in the request
	#[arg(long, value_enum, default_value_t = Framing::Center)]
	framing: Framing,

	/// output image file
	#[arg(long, value_name = "FILE", default_value = "map_image.png")]
	image: PathBuf,

	/// output metadata file
	#[arg(long, value_name = "FILE", default_value = "map_info.yaml")]
	metadata: PathBuf,

	/// also sample the raster into this point cloud file
	#[arg(long, value_name = "FILE")]
	cloud: Option<PathBuf>,

	/// sample interval in meters (only used with --cloud)
	#[arg(long, value_name = "float", default_value_t = 1.0)]
	interval: f64,
}

fn resolve_api_key(argument: Option<&String>) -> Result<String> {
	if let Some(key) = argument {
		return Ok(key.clone());
	}
	match std::env::var(API_KEY_ENV) {
		Ok(key) if !key.is_empty() => Ok(key),
		_ => bail!("no API key: pass --api-key or set ${API_KEY_ENV}"),
	}
}

fn file_name(path: &Path) -> String {
	path
		.file_name()
		.map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string())
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let rect = GeoRect::new(
		arguments.lat_start,
		arguments.lon_start,
		arguments.lat_end,
		arguments.lon_end,
	)?;
	let api_key = resolve_api_key(arguments.api_key.as_ref())?;

	let source = StaticMapSource::new(&api_key)?;
	let image = source
		.fetch_map(&rect, arguments.maptype, arguments.framing, arguments.zoom)
		.await?;
	png::write_png(&arguments.image, &image)?;

	let metadata = StaticMapMetadata::new(&rect, &file_name(&arguments.image));
	metadata.write(&arguments.metadata)?;
	eprintln!(
		"wrote {:?} ({:.1} x {:.1} m)",
		arguments.image, metadata.width_meter, metadata.height_meter
	);

	if let Some(cloud_path) = &arguments.cloud {
		let params = SampleParams {
			x_meter: metadata.width_meter,
			y_meter: metadata.height_meter,
			interval: arguments.interval,
			..SampleParams::default()
		};
		let cloud = sample_image(&image, &params).context("sampling the fetched raster")?;
		cloud.write_pcd_file(cloud_path)?;
		eprintln!("wrote {:?} ({} points)", cloud_path, cloud.len());
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tests::run_command;

	#[test]
	fn resolve_api_key_prefers_the_argument() {
		let key = resolve_api_key(Some(&"abc".to_string())).unwrap();
		assert_eq!(key, "abc");
	}

	#[test]
	fn file_name_strips_directories() {
		assert_eq!(file_name(Path::new("result/map_image.png")), "map_image.png");
		assert_eq!(file_name(Path::new("map_image.png")), "map_image.png");
	}

	#[test]
	fn rejects_out_of_range_coordinates() {
		let err = run_command(vec![
			"tilecloud", "snapshot", "35.69", "181.0", "35.68", "139.70", "--api-key", "k",
		])
		.unwrap_err()
		.to_string();
		assert!(err.contains("must be in [-180, 180]"));
	}

	#[test]
	fn degenerate_box_fails_before_the_request() {
		// zero north-south extent cannot be framed
		let err = run_command(vec![
			"tilecloud", "snapshot", "35.69", "139.69", "35.69", "139.70", "--api-key", "k",
		])
		.unwrap_err()
		.to_string();
		assert!(err.contains("zero north-south extent"));
	}
}
