use crate::fetch::{FetchPolicy, TileSource, tile_source::GSI_TILE_URL};
use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use tilecloud_core::{GeoRect, TileMapMetadata};
use tilecloud_image::png;

const IMAGE_FILE: &str = "map_image.png";
const METADATA_FILE: &str = "map_dimensions.yaml";
const TILE_CACHE_DIR: &str = "img_tiles";

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// latitude of the first corner
	#[arg(allow_hyphen_values = true)]
	lat_start: f64,

	/// longitude of the first corner
	#[arg(allow_hyphen_values = true)]
	lon_start: f64,

	/// latitude of the opposite corner
	#[arg(allow_hyphen_values = true)]
	lat_end: f64,

	/// longitude of the opposite corner
	#[arg(allow_hyphen_values = true)]
	lon_end: f64,

	/// zoom level
	#[arg(long, value_name = "int", default_value_t = 15)]
	zoom: u8,

	/// directory for the stitched image, metadata and tile cache
	#[arg(long, value_name = "DIR", default_value = "result")]
	output_dir: PathBuf,

	/// tile server URL template with {z}, {x} and {y} placeholders
	#[arg(long, value_name = "URL", default_value = GSI_TILE_URL)]
	tile_url: String,

	/// how to handle tiles that fail to download
	#[arg(long, value_enum, default_value_t = FetchPolicy::BestEffort)]
	policy: FetchPolicy,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let rect = GeoRect::new(
		arguments.lat_start,
		arguments.lon_start,
		arguments.lat_end,
		arguments.lon_end,
	)?;

	fs::create_dir_all(&arguments.output_dir)
		.with_context(|| format!("creating output directory {:?}", arguments.output_dir))?;
	let cache_dir = arguments.output_dir.join(TILE_CACHE_DIR);

	let source = TileSource::new(&arguments.tile_url, Some(cache_dir))?;
	let map = source.fetch_map(&rect, arguments.zoom, arguments.policy).await?;

	let image_path = arguments.output_dir.join(IMAGE_FILE);
	png::write_png(&image_path, &map.image)?;

	let metadata = TileMapMetadata::new(&rect, map.start, map.end, IMAGE_FILE)?;
	metadata.write(&arguments.output_dir.join(METADATA_FILE))?;

	eprintln!(
		"wrote {:?} ({}x{} px, {:.3} x {:.3} km)",
		image_path,
		map.image.width(),
		map.image.height(),
		metadata.width_km,
		metadata.height_km
	);

	Ok(())
}
