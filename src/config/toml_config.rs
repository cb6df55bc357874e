use crate::config::{DEFAULT_BASENAME, DEFAULT_FEED_URL};
use crate::core::render::{
    DEFAULT_ATTRIBUTION, DEFAULT_CENTER, DEFAULT_TILE_URL, DEFAULT_ZOOM,
};
use crate::domain::model::{LatLng, MapView, OutputFormat, TileLayer};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{QuakeError, Result};
use crate::utils::validation::{
    validate_basename, validate_non_empty_string, validate_output_formats, validate_path,
    validate_range, validate_tile_template, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub map: MapConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_FEED_URL.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    /// `[lat, lng]`
    pub center: Option<[f64; 2]>,
    pub zoom: Option<u8>,
    pub tile_url: Option<String>,
    pub attribution: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<OutputFormat>,
    pub basename: Option<String>,
    pub archive: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    /// `compact` (default) or `json`
    pub log_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| QuakeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FEED_URL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| QuakeError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .is_some_and(|format| format.eq_ignore_ascii_case("json"))
    }
}

impl ConfigProvider for TomlConfig {
    fn feed_url(&self) -> &str {
        &self.source.endpoint
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.load.output_formats
    }

    fn basename(&self) -> &str {
        self.load.basename.as_deref().unwrap_or(DEFAULT_BASENAME)
    }

    fn archive(&self) -> bool {
        self.load.archive.unwrap_or(false)
    }

    fn map_view(&self) -> MapView {
        MapView {
            center: self
                .map
                .center
                .map(|[lat, lng]| LatLng { lat, lng })
                .unwrap_or(DEFAULT_CENTER),
            zoom: self.map.zoom.unwrap_or(DEFAULT_ZOOM),
        }
    }

    fn tile_layer(&self) -> TileLayer {
        TileLayer {
            url_template: self
                .map
                .tile_url
                .clone()
                .unwrap_or_else(|| DEFAULT_TILE_URL.to_string()),
            attribution: self
                .map
                .attribution
                .clone()
                .unwrap_or_else(|| DEFAULT_ATTRIBUTION.to_string()),
        }
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("source.endpoint", &self.source.endpoint)?;
        if let Some(timeout) = self.source.timeout_seconds {
            validate_range("source.timeout_seconds", timeout, 1, 3600)?;
        }

        let view = self.map_view();
        validate_range("map.center[0]", view.center.lat, -90.0, 90.0)?;
        validate_range("map.center[1]", view.center.lng, -180.0, 180.0)?;
        validate_range("map.zoom", view.zoom, 0, 19)?;
        let tiles = self.tile_layer();
        validate_tile_template("map.tile_url", &tiles.url_template)?;
        validate_non_empty_string("map.attribution", &tiles.attribution)?;

        validate_path("load.output_path", &self.load.output_path)?;
        validate_output_formats("load.output_formats", &self.load.output_formats)?;
        validate_basename("load.basename", self.basename())?;

        if let Some(format) = self.monitoring.as_ref().and_then(|m| m.log_format.as_deref()) {
            if !["compact", "json"].contains(&format.to_ascii_lowercase().as_str()) {
                return Err(QuakeError::InvalidConfigValueError {
                    field: "monitoring.log_format".to_string(),
                    value: format.to_string(),
                    reason: "Valid formats: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }
}
