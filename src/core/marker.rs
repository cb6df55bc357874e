//! Magnitude-to-radius and depth-to-colour rules for earthquake markers.

use crate::domain::model::{DepthBand, HexColor, MarkerVisual, Reading};

/// Radius used when the magnitude is not a finite number.
pub const DEFAULT_RADIUS: f64 = 5.0;

/// Pixels of radius per unit of magnitude.
pub const RADIUS_PER_MAGNITUDE: f64 = 4.0;

/// Colour used when the depth is not a finite number.
pub const FALLBACK_COLOR: HexColor = HexColor::new("#808080");

/// Depth bands in match order. The first band has a closed floor, the
/// others an open one; the last entry catches every depth the others miss,
/// shallow (< -10) as well as deep (> 90).
pub const DEPTH_BANDS: [DepthBand; 6] = [
    DepthBand {
        floor: -10.0,
        ceiling: Some(10.0),
        color: HexColor::new("#00FF00"),
    },
    DepthBand {
        floor: 10.0,
        ceiling: Some(30.0),
        color: HexColor::new("#40FF00"),
    },
    DepthBand {
        floor: 30.0,
        ceiling: Some(50.0),
        color: HexColor::new("#80FF00"),
    },
    DepthBand {
        floor: 50.0,
        ceiling: Some(70.0),
        color: HexColor::new("#BFFF00"),
    },
    DepthBand {
        floor: 70.0,
        ceiling: Some(90.0),
        color: HexColor::new("#FFBF00"),
    },
    DepthBand {
        floor: 90.0,
        ceiling: None,
        color: HexColor::new("#FF0000"),
    },
];

/// Marker radius for a magnitude: `magnitude * 4`, unclamped.
pub fn marker_radius(magnitude: impl Into<Reading>) -> f64 {
    let magnitude = magnitude.into();
    match magnitude.finite() {
        Some(m) => m * RADIUS_PER_MAGNITUDE,
        None => {
            tracing::warn!(magnitude = %magnitude, "Invalid magnitude, using default radius");
            DEFAULT_RADIUS
        }
    }
}

/// Fill colour for a depth in kilometres.
pub fn marker_color(depth: impl Into<Reading>) -> HexColor {
    let depth = depth.into();
    let Some(d) = depth.finite() else {
        tracing::warn!(depth = %depth, "Invalid depth, using fallback color");
        return FALLBACK_COLOR;
    };

    let (catch_all, bounded) = match DEPTH_BANDS.split_last() {
        Some(split) => split,
        None => return FALLBACK_COLOR,
    };

    bounded
        .iter()
        .enumerate()
        .find(|(i, band)| band.matches(d, *i == 0))
        .map(|(_, band)| band.color)
        .unwrap_or(catch_all.color)
}

pub fn marker_visual(magnitude: impl Into<Reading>, depth: impl Into<Reading>) -> MarkerVisual {
    MarkerVisual {
        radius: marker_radius(magnitude),
        fill_color: marker_color(depth),
    }
}
