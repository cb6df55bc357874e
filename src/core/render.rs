use crate::core::marker::{marker_visual, DEPTH_BANDS};
use crate::core::validator::{report_rejection, validate, Renderable};
use crate::domain::model::{
    CircleMarker, Feature, LatLng, Legend, LegendEntry, LegendPosition, MapView, MarkerStyle,
    Popup, RenderSummary, TileLayer,
};
use crate::domain::ports::{LegendSurface, MapSurface};

pub const DEFAULT_CENTER: LatLng = LatLng { lat: 20.0, lng: 0.0 };
pub const DEFAULT_ZOOM: u8 = 2;
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// The surface a render pass draws onto, threaded explicitly through
/// marker and legend drawing.
pub struct RenderContext<S> {
    surface: S,
}

impl<S> RenderContext<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

/// Drives one pass over a feature collection.
#[derive(Debug, Clone)]
pub struct RenderOrchestrator {
    view: MapView,
    tiles: TileLayer,
    style: MarkerStyle,
    legend_position: LegendPosition,
}

impl Default for RenderOrchestrator {
    fn default() -> Self {
        Self::new(
            MapView {
                center: DEFAULT_CENTER,
                zoom: DEFAULT_ZOOM,
            },
            TileLayer {
                url_template: DEFAULT_TILE_URL.to_string(),
                attribution: DEFAULT_ATTRIBUTION.to_string(),
            },
        )
    }
}

impl RenderOrchestrator {
    pub fn new(view: MapView, tiles: TileLayer) -> Self {
        Self {
            view,
            tiles,
            style: MarkerStyle::default(),
            legend_position: LegendPosition::BottomRight,
        }
    }

    /// Set up the view, draw every valid feature in feed order, then add
    /// the legend once.
    pub fn render<S>(&self, ctx: &mut RenderContext<S>, features: &[Feature]) -> RenderSummary
    where
        S: MapSurface + LegendSurface,
    {
        ctx.surface.set_view(self.view);
        ctx.surface.add_tile_layer(&self.tiles);

        let mut summary = RenderSummary {
            seen: features.len(),
            ..RenderSummary::default()
        };

        for (index, feature) in features.iter().enumerate() {
            match validate(feature) {
                Ok(renderable) => {
                    draw_marker(ctx, &renderable, self.style);
                    summary.drawn += 1;
                }
                Err(rejection) => {
                    report_rejection(index, feature, rejection);
                    summary.record_rejection(rejection);
                }
            }
        }

        draw_legend(ctx, self.legend_position);

        tracing::debug!(
            "Rendered {} of {} features ({} without magnitude, {} with invalid coordinates)",
            summary.drawn,
            summary.seen,
            summary.magnitude_undefined,
            summary.invalid_coordinates
        );
        summary
    }
}

pub fn draw_marker<S: MapSurface>(
    ctx: &mut RenderContext<S>,
    renderable: &Renderable<'_>,
    style: MarkerStyle,
) {
    let position = renderable.position;
    let marker = CircleMarker {
        center: LatLng {
            lat: position.latitude,
            lng: position.longitude,
        },
        visual: marker_visual(renderable.magnitude.clone(), position.depth_km),
        style,
    };

    let id = ctx.surface.add_circle_marker(&marker);
    ctx.surface.bind_popup(
        id,
        &Popup {
            place: renderable.feature.place.clone(),
            magnitude: renderable.magnitude.clone(),
            depth_km: position.depth_km,
        },
    );
}

/// Legend built from the static band table, not from the features drawn.
pub fn depth_legend(position: LegendPosition) -> Legend {
    Legend {
        position,
        entries: DEPTH_BANDS
            .iter()
            .map(|band| LegendEntry {
                lower: band.floor,
                upper: band.ceiling,
                color: band.color,
            })
            .collect(),
    }
}

pub fn draw_legend<S: LegendSurface>(ctx: &mut RenderContext<S>, position: LegendPosition) {
    ctx.surface.add_legend(&depth_legend(position));
}
