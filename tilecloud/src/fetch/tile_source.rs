//! Downloading and stitching map tiles from an XYZ tile server.

use anyhow::{Context, Result, bail, ensure};
use image::DynamicImage;
use reqwest::Client;
use std::{
	fs,
	path::{Path, PathBuf},
	time::Duration,
};
use tilecloud_core::{GeoRect, TileCoord};
use tilecloud_image::{TileCanvas, png};

/// Default tile server: the Japan GSI standard map.
pub const GSI_TILE_URL: &str = "https://cyberjapandata.gsi.go.jp/xyz/std/{z}/{x}/{y}.png";

/// What to do when a single tile cannot be downloaded.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FetchPolicy {
	/// Leave the tile's canvas region blank and keep going.
	#[default]
	BestEffort,
	/// Abort the whole fetch on the first missing tile.
	FailFast,
}

/// A stitched map raster together with the tile range it covers.
pub struct FetchedMap {
	pub image: DynamicImage,
	pub start: TileCoord,
	pub end: TileCoord,
}

/// A remote XYZ tile server with an optional local tile cache.
pub struct TileSource {
	client: Client,
	url_template: String,
	cache_dir: Option<PathBuf>,
}

impl TileSource {
	/// Create a tile source from a URL template containing `{z}`, `{x}` and
	/// `{y}` placeholders. Downloaded tiles are cached in `cache_dir` as
	/// `{zoom}_{x}_{y}.png` if given.
	///
	/// # Errors
	/// Returns an error if the template is missing a placeholder.
	pub fn new(url_template: &str, cache_dir: Option<PathBuf>) -> Result<TileSource> {
		for placeholder in ["{z}", "{x}", "{y}"] {
			ensure!(
				url_template.contains(placeholder),
				"tile URL template {url_template:?} is missing the {placeholder} placeholder"
			);
		}

		let client = Client::builder().tcp_keepalive(Duration::from_secs(600)).build()?;

		Ok(TileSource {
			client,
			url_template: url_template.to_string(),
			cache_dir,
		})
	}

	/// The request URL for a tile.
	fn tile_url(&self, coord: TileCoord) -> String {
		self
			.url_template
			.replace("{z}", &coord.level.to_string())
			.replace("{x}", &coord.x.to_string())
			.replace("{y}", &coord.y.to_string())
	}

	/// The cache file path for a tile, if caching is enabled.
	fn cache_path(&self, coord: TileCoord) -> Option<PathBuf> {
		self
			.cache_dir
			.as_ref()
			.map(|dir| dir.join(format!("{}_{}_{}.png", coord.level, coord.x, coord.y)))
	}

	/// Fetch a single tile.
	///
	/// A cached tile is read back without touching the network. A non-success
	/// HTTP status means "no tile" and returns `Ok(None)`; transport and
	/// decode failures are errors.
	pub async fn fetch_tile(&self, coord: TileCoord) -> Result<Option<DynamicImage>> {
		if let Some(path) = self.cache_path(coord)
			&& path.is_file()
		{
			log::debug!("tile {coord:?} served from cache");
			return Ok(Some(png::read_png(&path)?));
		}

		let url = self.tile_url(coord);
		let response = self
			.client
			.get(url.as_str())
			.send()
			.await
			.with_context(|| format!("requesting tile {url}"))?;

		if !response.status().is_success() {
			log::warn!("no tile at {url} (HTTP {})", response.status());
			return Ok(None);
		}

		let bytes = response.bytes().await?;
		let tile = png::decode_png(&bytes).with_context(|| format!("decoding tile {url}"))?;

		if let Some(path) = self.cache_path(coord) {
			store_in_cache(&path, &bytes)?;
		}

		Ok(Some(tile))
	}

	/// Fetch and stitch all tiles covering `rect` at `zoom`.
	///
	/// The corners are normalized with min/max, so the rectangle may be given
	/// in either orientation. Tiles are fetched sequentially in row-major
	/// order; missing tiles are handled according to `policy`.
	pub async fn fetch_map(&self, rect: &GeoRect, zoom: u8, policy: FetchPolicy) -> Result<FetchedMap> {
		let a = TileCoord::from_geo(rect.lat_start, rect.lon_start, zoom)?;
		let b = TileCoord::from_geo(rect.lat_end, rect.lon_end, zoom)?;
		let start = TileCoord::new(zoom, a.x.min(b.x), a.y.min(b.y))?;
		let end = TileCoord::new(zoom, a.x.max(b.x), a.y.max(b.y))?;

		let mut canvas = TileCanvas::new(start, end)?;
		log::info!(
			"fetching {} tiles at zoom {zoom} into a {}x{} canvas",
			u64::from(end.x - start.x + 1) * u64::from(end.y - start.y + 1),
			canvas.width(),
			canvas.height()
		);

		for x in start.x..=end.x {
			for y in start.y..=end.y {
				let coord = TileCoord::new(zoom, x, y)?;
				match self.fetch_tile(coord).await? {
					Some(tile) => canvas.paste(coord, &tile)?,
					None => match policy {
						FetchPolicy::BestEffort => log::warn!("leaving {coord:?} blank"),
						FetchPolicy::FailFast => bail!("missing tile {coord:?} (policy: fail-fast)"),
					},
				}
			}
		}

		Ok(FetchedMap {
			image: canvas.into_image(),
			start,
			end,
		})
	}
}

fn store_in_cache(path: &Path, bytes: &[u8]) -> Result<()> {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)?;
	}
	fs::write(path, bytes).with_context(|| format!("caching tile at {path:?}"))
}
