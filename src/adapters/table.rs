use crate::adapters::scene::MapScene;
use crate::utils::error::{QuakeError, Result};

const HEADER: [&str; 7] = [
    "place",
    "magnitude",
    "latitude",
    "longitude",
    "depth_km",
    "radius",
    "fill_color",
];

/// One CSV row per drawn marker, in draw order.
pub fn render_csv(scene: &MapScene) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for placed in &scene.markers {
        let marker = &placed.marker;
        let (place, magnitude, depth) = match &placed.popup {
            Some(popup) => (
                popup.place.clone(),
                popup.magnitude.to_string(),
                popup.depth_km.to_string(),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        writer.write_record([
            place,
            magnitude,
            marker.center.lat.to_string(),
            marker.center.lng.to_string(),
            depth,
            marker.visual.radius.to_string(),
            marker.visual.fill_color.to_string(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| QuakeError::ExportError {
        format: "csv".to_string(),
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| QuakeError::ExportError {
        format: "csv".to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::scene::fixtures::sample_scene;

    #[test]
    fn test_csv_rows_follow_markers() {
        let text = render_csv(&sample_scene()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "place,magnitude,latitude,longitude,depth_km,radius,fill_color"
        );
        assert_eq!(lines[1], r#""Offshore ""Bay""",5.2,20,10,15,20.8,#40FF00"#);
        assert_eq!(lines[2], "Ridge,1.5,61.2,-150.5,120,6,#FF0000");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_for_empty_scene_has_header_only() {
        let text = render_csv(&MapScene::default()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
