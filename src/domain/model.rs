use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A numeric feed field as it arrived on the wire.
///
/// The feed is loosely typed: `mag` can be a number, `null`, or missing
/// entirely, and coordinate arrays are not guaranteed to hold numbers.
/// Absence is modelled with `Option<Reading>`; a present-but-not-numeric
/// value is kept as `Other` so rules can fall back and popups can still
/// show what the feed said.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Number(f64),
    Other(serde_json::Value),
}

impl Reading {
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value.as_f64() {
            Some(n) => Reading::Number(n),
            None => Reading::Other(value.clone()),
        }
    }

    /// The reading as a JSON value, numbers staying numbers.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Reading::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Reading::Other(v) => v.clone(),
        }
    }

    /// The value, if it is a finite real number.
    pub fn finite(&self) -> Option<f64> {
        match self {
            Reading::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        Reading::Number(value)
    }
}

impl From<serde_json::Value> for Reading {
    fn from(value: serde_json::Value) -> Self {
        Reading::from_json(&value)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Number(n) => write!(f, "{}", n),
            Reading::Other(serde_json::Value::String(s)) => f.write_str(s),
            Reading::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Coordinates as ingested: `(longitude, latitude, depth_km)`, each possibly invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub longitude: Reading,
    pub latitude: Reading,
    pub depth: Reading,
}

/// A validated position; every component is finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub longitude: f64,
    pub latitude: f64,
    pub depth_km: f64,
}

/// One earthquake event from the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub magnitude: Option<Reading>,
    pub place: String,
    pub coordinates: Coordinates,
    /// Raw `properties` object, kept for diagnostics.
    pub properties: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedMetadata {
    pub title: Option<String>,
    pub generated: Option<DateTime<Utc>>,
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub metadata: FeedMetadata,
    pub features: Vec<Feature>,
    /// Records that could not be ingested as features at all.
    pub malformed: usize,
}

/// A `#RRGGBB` colour code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor(&'static str);

impl HexColor {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for HexColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

/// One entry of the depth-to-colour lookup table.
///
/// `ceiling == None` marks the catch-all band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthBand {
    pub floor: f64,
    pub ceiling: Option<f64>,
    pub color: HexColor,
}

impl DepthBand {
    pub fn matches(&self, depth: f64, closed_floor: bool) -> bool {
        let above = if closed_floor {
            depth >= self.floor
        } else {
            depth > self.floor
        };
        above && self.ceiling.is_some_and(|ceiling| depth <= ceiling)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerVisual {
    pub radius: f64,
    #[serde(rename = "fillColor")]
    pub fill_color: HexColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

/// Outline and fill settings shared by every marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub color: HexColor,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: HexColor::new("#000"),
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleMarker {
    pub center: LatLng,
    pub visual: MarkerVisual,
    pub style: MarkerStyle,
}

/// Popup content for one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub place: String,
    pub magnitude: Reading,
    pub depth_km: f64,
}

impl Popup {
    pub fn to_html(&self) -> String {
        format!(
            "<b>{}</b><br>Magnitude: {}<br>Depth: {} km",
            escape_html(&self.place),
            escape_html(&self.magnitude.to_string()),
            self.depth_km
        )
    }
}

impl fmt::Display for Popup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, magnitude {}, depth {} km",
            self.place, self.magnitude, self.depth_km
        )
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl LegendPosition {
    pub fn as_leaflet(&self) -> &'static str {
        match self {
            LegendPosition::TopLeft => "topleft",
            LegendPosition::TopRight => "topright",
            LegendPosition::BottomLeft => "bottomleft",
            LegendPosition::BottomRight => "bottomright",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub lower: f64,
    pub upper: Option<f64>,
    pub color: HexColor,
}

impl LegendEntry {
    /// `-10–10 km` for bounded bands, `90+ km` for the open one.
    pub fn label(&self) -> String {
        match self.upper {
            Some(upper) => format!("{}\u{2013}{} km", self.lower, upper),
            None => format!("{}+ km", self.lower),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub position: LegendPosition,
    pub entries: Vec<LegendEntry>,
}

/// Output file kinds produced from a rendered scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OutputFormat {
    Html,
    Svg,
    Geojson,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Svg => "svg",
            OutputFormat::Geojson => "geojson",
            OutputFormat::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "svg" => Ok(OutputFormat::Svg),
            "geojson" | "json" => Ok(OutputFormat::Geojson),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!(
                "unsupported output format '{}' (expected html, svg, geojson or csv)",
                other
            )),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Why a feature was left off the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MagnitudeUndefined,
    InvalidCoordinates,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MagnitudeUndefined => f.write_str("magnitude undefined"),
            Rejection::InvalidCoordinates => f.write_str("invalid coordinates"),
        }
    }
}

/// Counts from one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderSummary {
    pub seen: usize,
    pub drawn: usize,
    pub magnitude_undefined: usize,
    pub invalid_coordinates: usize,
    pub malformed: usize,
}

impl RenderSummary {
    pub fn record_rejection(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::MagnitudeUndefined => self.magnitude_undefined += 1,
            Rejection::InvalidCoordinates => self.invalid_coordinates += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.magnitude_undefined + self.invalid_coordinates + self.malformed
    }
}

/// What the load phase left behind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub written: Vec<String>,
    pub summary: RenderSummary,
}
