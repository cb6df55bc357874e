//! Static world map in plate carrée projection.

use crate::adapters::scene::MapScene;
use crate::domain::model::{escape_html, LegendPosition};

const W: f64 = 1200.0;
const H: f64 = 600.0;

#[inline]
fn project(lng: f64, lat: f64) -> (f64, f64) {
    ((lng + 180.0) / 360.0 * W, (90.0 - lat) / 180.0 * H)
}

pub fn render_svg(scene: &MapScene) -> String {
    let mut s = String::with_capacity(64 * 1024 + scene.markers.len() * 160);
    let title = escape_html(scene.title());

    s.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{W}" height="{H}" viewBox="0 0 {W} {H}">
  <title>{title}</title>
"#
    ));
    if let Some(generated) = scene.metadata.generated {
        s.push_str(&format!(
            "  <desc>Feed generated {}</desc>\n",
            generated.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    s.push_str(&format!("  <rect width='{W}' height='{H}' fill='#dbe7ef'/>\n"));

    // graticule
    s.push_str("  <g stroke='#b8c7d3' stroke-width='0.5'>\n");
    for lng in (-180..=180).step_by(30) {
        let (x, _) = project(lng as f64, 0.0);
        s.push_str(&format!("    <line x1='{x:.1}' y1='0' x2='{x:.1}' y2='{H}'/>\n"));
    }
    for lat in (-90..=90).step_by(30) {
        let (_, y) = project(0.0, lat as f64);
        s.push_str(&format!("    <line x1='0' y1='{y:.1}' x2='{W}' y2='{y:.1}'/>\n"));
    }
    s.push_str("  </g>\n");

    s.push_str("  <g>\n");
    for placed in &scene.markers {
        let marker = &placed.marker;
        // SVG has no meaning for r <= 0
        if marker.visual.radius <= 0.0 {
            tracing::debug!(
                "SVG: skipping marker at ({}, {}) with radius {}",
                marker.center.lat,
                marker.center.lng,
                marker.visual.radius
            );
            continue;
        }
        let (x, y) = project(marker.center.lng, marker.center.lat);
        let style = marker.style;
        s.push_str(&format!(
            "    <circle cx='{x:.1}' cy='{y:.1}' r='{:.1}' fill='{}' fill-opacity='{}' stroke='{}' stroke-width='{}' stroke-opacity='{}'>",
            marker.visual.radius,
            marker.visual.fill_color,
            style.fill_opacity,
            style.color,
            style.weight,
            style.opacity
        ));
        if let Some(popup) = &placed.popup {
            s.push_str(&format!("<title>{}</title>", escape_html(&popup.to_string())));
        }
        s.push_str("</circle>\n");
    }
    s.push_str("  </g>\n");

    for legend in &scene.legends {
        let rows = legend.entries.len() as f64;
        let box_w = 110.0;
        let box_h = rows * 18.0 + 12.0;
        let (lx, ly) = match legend.position {
            LegendPosition::TopLeft => (10.0, 10.0),
            LegendPosition::TopRight => (W - box_w - 10.0, 10.0),
            LegendPosition::BottomLeft => (10.0, H - box_h - 10.0),
            LegendPosition::BottomRight => (W - box_w - 10.0, H - box_h - 10.0),
        };
        s.push_str("  <g font-family='sans-serif' font-size='11' fill='#333'>\n");
        s.push_str(&format!(
            "    <rect x='{lx:.1}' y='{ly:.1}' width='{box_w}' height='{box_h:.1}' fill='#ffffff' fill-opacity='0.9' rx='4'/>\n"
        ));
        let mut row_y = ly + 8.0;
        for entry in &legend.entries {
            s.push_str(&format!(
                "    <rect x='{:.1}' y='{row_y:.1}' width='14' height='14' fill='{}' fill-opacity='0.8'/>\n",
                lx + 8.0,
                entry.color
            ));
            s.push_str(&format!(
                "    <text x='{:.1}' y='{:.1}'>{}</text>\n",
                lx + 28.0,
                row_y + 11.0,
                escape_html(&entry.label())
            ));
            row_y += 18.0;
        }
        s.push_str("  </g>\n");
    }

    s.push_str("</svg>\n");
    s
}
