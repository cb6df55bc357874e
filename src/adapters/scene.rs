use crate::domain::model::{CircleMarker, FeedMetadata, Legend, MapView, Popup, TileLayer};
use crate::domain::ports::{LegendSurface, MapSurface, MarkerId};

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub marker: CircleMarker,
    pub popup: Option<Popup>,
}

/// In-memory map: records what the render pass asked for so the
/// exporters can write it out in any format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapScene {
    pub metadata: FeedMetadata,
    pub view: Option<MapView>,
    pub tile_layers: Vec<TileLayer>,
    pub markers: Vec<PlacedMarker>,
    pub legends: Vec<Legend>,
}

impl MapScene {
    pub fn new(metadata: FeedMetadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    pub fn title(&self) -> &str {
        self.metadata.title.as_deref().unwrap_or("Earthquakes")
    }
}

impl MapSurface for MapScene {
    fn set_view(&mut self, view: MapView) {
        self.view = Some(view);
    }

    fn add_tile_layer(&mut self, layer: &TileLayer) {
        self.tile_layers.push(layer.clone());
    }

    fn add_circle_marker(&mut self, marker: &CircleMarker) -> MarkerId {
        self.markers.push(PlacedMarker {
            marker: marker.clone(),
            popup: None,
        });
        MarkerId(self.markers.len() - 1)
    }

    fn bind_popup(&mut self, marker: MarkerId, popup: &Popup) {
        match self.markers.get_mut(marker.0) {
            Some(placed) => placed.popup = Some(popup.clone()),
            None => tracing::warn!("Popup bound to unknown marker {:?}", marker),
        }
    }
}

impl LegendSurface for MapScene {
    fn add_legend(&mut self, legend: &Legend) {
        self.legends.push(legend.clone());
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::sample_scene;
    use super::*;

    #[test]
    fn test_scene_records_render_pass() {
        let scene = sample_scene();

        assert_eq!(scene.title(), "Sample quakes");
        assert!(scene.view.is_some());
        assert_eq!(scene.tile_layers.len(), 1);
        assert_eq!(scene.markers.len(), 2);
        assert_eq!(scene.legends.len(), 1);
        assert!(scene.markers.iter().all(|m| m.popup.is_some()));
    }

    #[test]
    fn test_popup_for_unknown_marker_is_ignored() {
        let mut scene = MapScene::default();
        scene.bind_popup(
            MarkerId(7),
            &Popup {
                place: "nowhere".to_string(),
                magnitude: 1.0.into(),
                depth_km: 1.0,
            },
        );
        assert!(scene.markers.is_empty());
        assert_eq!(scene.title(), "Earthquakes");
    }
}
