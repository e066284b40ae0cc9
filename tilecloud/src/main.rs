mod fetch;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Stitch map tiles for a bounding box into a single image
	Fetch(tools::fetch::Subcommand),

	/// Fetch a single raster for a bounding box from a static-map service
	Snapshot(tools::snapshot::Subcommand),

	/// Convert a map image into a colored point cloud
	Cloud(tools::cloud::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Fetch(arguments) => tools::fetch::run(arguments),
		Commands::Snapshot(arguments) => tools::snapshot::run(arguments),
		Commands::Cloud(arguments) => tools::cloud::run(arguments),
	}
}

#[cfg(test)]
mod tests {
	use crate::{Cli, run};
	use anyhow::Result;
	use clap::Parser;

	pub fn run_command(arg_vec: Vec<&str>) -> Result<String> {
		let cli = Cli::try_parse_from(arg_vec)?;
		let msg = format!("{:?}", cli);
		run(cli)?;
		Ok(msg)
	}

	#[test]
	fn help() {
		let err = run_command(vec!["tilecloud"]).unwrap_err().to_string();
		assert!(err.contains("Usage: tilecloud [OPTIONS] <COMMAND>"));
	}

	#[test]
	fn version() {
		let err = run_command(vec!["tilecloud", "-V"]).unwrap_err().to_string();
		assert!(err.starts_with("tilecloud "));
	}

	#[test]
	fn fetch_subcommand() {
		let output = run_command(vec!["tilecloud", "fetch"]).unwrap_err().to_string();
		assert!(output.starts_with("Stitch map tiles for a bounding box into a single image"));
	}

	#[test]
	fn snapshot_subcommand() {
		let output = run_command(vec!["tilecloud", "snapshot"]).unwrap_err().to_string();
		assert!(output.starts_with("Fetch a single raster for a bounding box from a static-map service"));
	}

	#[test]
	fn cloud_subcommand() {
		let output = run_command(vec!["tilecloud", "cloud"]).unwrap_err().to_string();
		assert!(output.starts_with("Convert a map image into a colored point cloud"));
	}
}
