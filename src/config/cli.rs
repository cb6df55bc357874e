use crate::config::{DEFAULT_BASENAME, DEFAULT_FEED_URL};
use crate::core::render::{DEFAULT_ATTRIBUTION, DEFAULT_TILE_URL};
use crate::domain::model::{LatLng, MapView, OutputFormat, TileLayer};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_basename, validate_non_empty_string, validate_output_formats, validate_path,
    validate_range, validate_tile_template, validate_url, Validate,
};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "quake-map")]
#[command(about = "Render the USGS earthquake feed as a world map")]
pub struct CliConfig {
    /// geoJSON feed to render
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    pub feed_url: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Comma separated: html, svg, geojson, csv
    #[arg(long, value_delimiter = ',', default_value = "html")]
    pub formats: Vec<OutputFormat>,

    #[arg(long, default_value = DEFAULT_BASENAME)]
    pub basename: String,

    /// Bundle all outputs into <basename>.zip
    #[arg(long)]
    pub archive: bool,

    #[arg(long, default_value_t = 20.0, allow_hyphen_values = true)]
    pub center_lat: f64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub center_lng: f64,

    #[arg(long, default_value_t = 2)]
    pub zoom: u8,

    #[arg(long, default_value = DEFAULT_TILE_URL)]
    pub tile_url: String,

    #[arg(long, default_value = DEFAULT_ATTRIBUTION)]
    pub attribution: String,

    /// Give up on the feed request after this many seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Load settings from a TOML file instead of the flags above
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl ConfigProvider for CliConfig {
    fn feed_url(&self) -> &str {
        &self.feed_url
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.formats
    }

    fn basename(&self) -> &str {
        &self.basename
    }

    fn archive(&self) -> bool {
        self.archive
    }

    fn map_view(&self) -> MapView {
        MapView {
            center: LatLng {
                lat: self.center_lat,
                lng: self.center_lng,
            },
            zoom: self.zoom,
        }
    }

    fn tile_layer(&self) -> TileLayer {
        TileLayer {
            url_template: self.tile_url.clone(),
            attribution: self.attribution.clone(),
        }
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("--feed-url", &self.feed_url)?;
        validate_path("--output-path", &self.output_path)?;
        validate_output_formats("--formats", &self.formats)?;
        validate_basename("--basename", &self.basename)?;
        validate_range("--center-lat", self.center_lat, -90.0, 90.0)?;
        validate_range("--center-lng", self.center_lng, -180.0, 180.0)?;
        validate_range("--zoom", self.zoom, 0, 19)?;
        validate_tile_template("--tile-url", &self.tile_url)?;
        validate_non_empty_string("--attribution", &self.attribution)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_range("--timeout-seconds", timeout, 1, 3600)?;
        }
        Ok(())
    }
}
