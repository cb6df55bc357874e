//! Self-contained Leaflet page for a rendered scene.

use crate::adapters::scene::MapScene;
use crate::core::render::{DEFAULT_ATTRIBUTION, DEFAULT_CENTER, DEFAULT_TILE_URL, DEFAULT_ZOOM};
use crate::domain::model::{escape_html, LegendPosition, MapView, TileLayer};
use crate::utils::error::{QuakeError, Result};
use serde::Serialize;

const LEAFLET_VERSION: &str = "1.9.4";

#[derive(Serialize)]
struct PageMarker<'a> {
    lat: f64,
    lng: f64,
    radius: f64,
    #[serde(rename = "fillColor")]
    fill_color: &'a str,
    popup: Option<String>,
}

#[derive(Serialize)]
struct PageLegendEntry<'a> {
    color: &'a str,
    label: String,
}

#[derive(Serialize)]
struct PageData<'a> {
    view: MapView,
    tiles: &'a [TileLayer],
    style: Option<crate::domain::model::MarkerStyle>,
    markers: Vec<PageMarker<'a>>,
    legend_position: &'a str,
    legend: Vec<PageLegendEntry<'a>>,
}

fn page_data(scene: &MapScene) -> PageData<'_> {
    let legend = scene.legends.first();
    PageData {
        view: scene.view.unwrap_or(MapView {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }),
        tiles: &scene.tile_layers,
        style: scene.markers.first().map(|m| m.marker.style),
        markers: scene
            .markers
            .iter()
            .map(|placed| PageMarker {
                lat: placed.marker.center.lat,
                lng: placed.marker.center.lng,
                radius: placed.marker.visual.radius,
                fill_color: placed.marker.visual.fill_color.as_str(),
                popup: placed.popup.as_ref().map(|p| p.to_html()),
            })
            .collect(),
        legend_position: legend
            .map(|l| l.position)
            .unwrap_or(LegendPosition::BottomRight)
            .as_leaflet(),
        legend: legend
            .map(|l| {
                l.entries
                    .iter()
                    .map(|e| PageLegendEntry {
                        color: e.color.as_str(),
                        label: e.label(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

pub fn render_html(scene: &MapScene) -> Result<String> {
    let data = serde_json::to_string(&page_data(scene)).map_err(|e| QuakeError::ExportError {
        format: "html".to_string(),
        message: e.to_string(),
    })?;
    // keep the embedded JSON from closing the <script> element
    let data = data.replace("</", "<\\/");

    let title = escape_html(scene.title());
    let generated = scene
        .metadata
        .generated
        .map(|t| format!("<p class=\"generated\">Feed generated {}</p>", t.format("%Y-%m-%d %H:%M:%S UTC")))
        .unwrap_or_default();
    let fallback_tiles = serde_json::to_string(&[TileLayer {
        url_template: DEFAULT_TILE_URL.to_string(),
        attribution: DEFAULT_ATTRIBUTION.to_string(),
    }])
    .map_err(|e| QuakeError::ExportError {
        format: "html".to_string(),
        message: e.to_string(),
    })?
    .replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <link rel="stylesheet" href="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.css">
  <script src="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.js"></script>
  <style>
    html, body, #map {{ height: 100%; margin: 0; }}
    .legend {{ background: #fff; padding: 6px 8px; line-height: 18px; color: #555; border-radius: 4px; }}
    .legend i {{ width: 18px; height: 18px; float: left; margin-right: 8px; opacity: 0.8; }}
    .generated {{ position: absolute; bottom: 0; left: 0; z-index: 1000; margin: 4px; font: 11px sans-serif; color: #333; }}
  </style>
</head>
<body>
  <div id="map"></div>
  {generated}
  <script>
    const data = {data};
    const tiles = data.tiles.length ? data.tiles : {fallback_tiles};
    const map = L.map('map').setView([data.view.center.lat, data.view.center.lng], data.view.zoom);
    tiles.forEach(t => L.tileLayer(t.url_template, {{ attribution: t.attribution }}).addTo(map));
    data.markers.forEach(m => {{
      const circle = L.circleMarker([m.lat, m.lng], Object.assign({{}}, data.style, {{
        radius: m.radius,
        fillColor: m.fillColor
      }}));
      if (m.popup) {{ circle.bindPopup(m.popup); }}
      circle.addTo(map);
    }});
    if (data.legend.length) {{
      const legend = L.control({{ position: data.legend_position }});
      legend.onAdd = function () {{
        const div = L.DomUtil.create('div', 'legend');
        data.legend.forEach(e => {{
          const row = document.createElement('div');
          const swatch = document.createElement('i');
          swatch.style.background = e.color;
          row.appendChild(swatch);
          row.appendChild(document.createTextNode(e.label));
          div.appendChild(row);
        }});
        return div;
      }};
      legend.addTo(map);
    }}
  </script>
</body>
</html>
"#
    ))
}
