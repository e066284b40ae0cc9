//! Client for a static-map web service (Google Maps Static API).
//!
//! Unlike the tile path this requests one raster for the whole bounding box;
//! a failed request is fatal for the operation and the error carries the
//! response body, which is where the service puts its diagnostics.

use anyhow::{Context, Result, bail};
use image::DynamicImage;
use reqwest::Client;
use std::{fmt, time::Duration};
use tilecloud_core::GeoRect;
use tilecloud_image::png;

/// Google Maps Static API endpoint.
pub const STATIC_MAP_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Maximum raster dimension the service accepts, in pixels per side.
pub const MAX_IMAGE_SIZE: u32 = 640;

/// Map rendering style requested from the service.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MapType {
	#[default]
	Roadmap,
	Satellite,
}

impl fmt::Display for MapType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			MapType::Roadmap => "roadmap",
			MapType::Satellite => "satellite",
		})
	}
}

/// How the requested bounding box is communicated to the service.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Framing {
	/// Center point plus zoom level; raster size follows the box's aspect
	/// ratio, capped at [`MAX_IMAGE_SIZE`].
	#[default]
	Center,
	/// Draw a polyline between the two corners and let the service frame it;
	/// always uses the maximum square raster.
	Path,
}

/// A static-map service client holding the API credential.
pub struct StaticMapSource {
	client: Client,
	endpoint: String,
	api_key: String,
}

impl StaticMapSource {
	pub fn new(api_key: &str) -> Result<StaticMapSource> {
		StaticMapSource::with_endpoint(STATIC_MAP_ENDPOINT, api_key)
	}

	pub fn with_endpoint(endpoint: &str, api_key: &str) -> Result<StaticMapSource> {
		let client = Client::builder().tcp_keepalive(Duration::from_secs(600)).build()?;
		Ok(StaticMapSource {
			client,
			endpoint: endpoint.to_string(),
			api_key: api_key.to_string(),
		})
	}

	/// The query parameters for a request, without the credential.
	fn build_query(rect: &GeoRect, maptype: MapType, framing: Framing, zoom: u8) -> Result<Vec<(String, String)>> {
		let mut query = Vec::new();

		match framing {
			Framing::Center => {
				let (width, height) = rect.image_size(MAX_IMAGE_SIZE)?;
				let (lat, lon) = rect.center();
				query.push(("size".to_string(), format!("{width}x{height}")));
				query.push(("maptype".to_string(), maptype.to_string()));
				query.push(("center".to_string(), format!("{lat},{lon}")));
				query.push(("zoom".to_string(), zoom.to_string()));
			}
			Framing::Path => {
				query.push(("size".to_string(), format!("{MAX_IMAGE_SIZE}x{MAX_IMAGE_SIZE}")));
				query.push(("maptype".to_string(), maptype.to_string()));
				query.push((
					"path".to_string(),
					format!(
						"color:0x0000ff|weight:5|{},{}|{},{}",
						rect.lat_start, rect.lon_start, rect.lat_end, rect.lon_end
					),
				));
			}
		}

		Ok(query)
	}

	/// Request one raster covering `rect`.
	///
	/// # Errors
	/// Any non-success response is fatal; the error message carries the
	/// response body.
	pub async fn fetch_map(&self, rect: &GeoRect, maptype: MapType, framing: Framing, zoom: u8) -> Result<DynamicImage> {
		let mut query = StaticMapSource::build_query(rect, maptype, framing, zoom)?;
		query.push(("key".to_string(), self.api_key.clone()));

		let response = self
			.client
			.get(self.endpoint.as_str())
			.query(&query)
			.send()
			.await
			.with_context(|| format!("requesting static map from {}", self.endpoint))?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			bail!("failed to retrieve map image (HTTP {status}): {body}");
		}

		let bytes = response.bytes().await?;
		png::decode_png(&bytes).context("decoding static map response")
	}
}
