use anyhow::Result;
use std::path::PathBuf;
use tilecloud_image::{SampleParams, png, sample_image};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// input PNG image
	#[arg()]
	input_file: PathBuf,

	/// output PCD point cloud file
	#[arg()]
	output_file: PathBuf,

	/// width of the mapped area in meters
	#[arg(long, value_name = "float", default_value_t = 100.0)]
	x_meter: f64,

	/// height of the mapped area in meters
	#[arg(long, value_name = "float", default_value_t = 100.0)]
	y_meter: f64,

	/// base height of the point cloud in meters
	#[arg(long, value_name = "float", default_value_t = 0.0, allow_hyphen_values = true)]
	z_meter: f64,

	/// interval between points in meters
	#[arg(long, value_name = "float", default_value_t = 1.0)]
	interval: f64,

	/// offset added to every x coordinate in meters
	#[arg(long, value_name = "float", default_value_t = 0.0, allow_hyphen_values = true)]
	offset_x: f64,

	/// offset added to every y coordinate in meters
	#[arg(long, value_name = "float", default_value_t = 0.0, allow_hyphen_values = true)]
	offset_y: f64,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let image = png::read_png(&arguments.input_file)?;

	let params = SampleParams {
		x_meter: arguments.x_meter,
		y_meter: arguments.y_meter,
		z_meter: arguments.z_meter,
		interval: arguments.interval,
		offset_x: arguments.offset_x,
		offset_y: arguments.offset_y,
	};

	let cloud = sample_image(&image, &params)?;
	cloud.write_pcd_file(&arguments.output_file)?;

	eprintln!("wrote {:?} ({} points)", arguments.output_file, cloud.len());
	Ok(())
}
