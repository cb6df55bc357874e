use crate::adapters::scene::MapScene;
use crate::utils::error::{QuakeError, Result};
use serde_json::{json, Value};

/// The drawn markers as a geoJSON FeatureCollection with their styling in
/// `properties`. Rejected feed records do not appear.
pub fn to_geojson(scene: &MapScene) -> Value {
    let features: Vec<Value> = scene
        .markers
        .iter()
        .map(|placed| {
            let marker = &placed.marker;
            let popup = placed.popup.as_ref();
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [
                        marker.center.lng,
                        marker.center.lat,
                        popup.map(|p| p.depth_km)
                    ]
                },
                "properties": {
                    "place": popup.map(|p| p.place.clone()),
                    "mag": popup.map(|p| p.magnitude.to_json()),
                    "radius": marker.visual.radius,
                    "fillColor": marker.visual.fill_color,
                    "color": marker.style.color,
                    "weight": marker.style.weight,
                    "opacity": marker.style.opacity,
                    "fillOpacity": marker.style.fill_opacity,
                    "popup": popup.map(|p| p.to_html())
                }
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "metadata": {
            "title": scene.title(),
            "generated": scene.metadata.generated.map(|t| t.to_rfc3339()),
            "count": features.len()
        },
        "features": features
    })
}

pub fn render_geojson(scene: &MapScene) -> Result<String> {
    serde_json::to_string_pretty(&to_geojson(scene)).map_err(|e| QuakeError::ExportError {
        format: "geojson".to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::scene::fixtures::sample_scene;

    #[test]
    fn test_geojson_carries_marker_styling() {
        let value = to_geojson(&sample_scene());

        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["metadata"]["count"], 2);
        let first = &value["features"][0];
        assert_eq!(first["geometry"]["coordinates"], json!([10.0, 20.0, 15.0]));
        assert_eq!(first["properties"]["radius"], 20.8);
        assert_eq!(first["properties"]["fillColor"], "#40FF00");
        assert_eq!(first["properties"]["fillOpacity"], 0.8);
        assert_eq!(first["properties"]["mag"], 5.2);

        let second = &value["features"][1];
        assert_eq!(second["properties"]["fillColor"], "#FF0000");
    }

    #[test]
    fn test_geojson_reingests_with_same_markers() {
        use crate::core::marker::marker_radius;
        use crate::core::validator::ingest_feed;
        use crate::domain::model::Reading;

        let text = render_geojson(&sample_scene()).unwrap();
        let collection = ingest_feed(&text).unwrap();

        assert_eq!(collection.features.len(), 2);
        let magnitude = collection.features[0].magnitude.clone().unwrap();
        assert_eq!(magnitude, Reading::Number(5.2));
        assert_eq!(marker_radius(magnitude), 20.8);
        assert_eq!(collection.features[1].coordinates.depth, Reading::Number(120.0));
    }

    #[test]
    fn test_render_geojson_is_parseable() {
        let text = render_geojson(&sample_scene()).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["features"].as_array().map(Vec::len), Some(2));
    }
}
