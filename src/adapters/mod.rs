// Adapters layer: feed client, local storage, the recording map scene and
// the file exporters that serialize it.

pub mod geojson;
pub mod html;
pub mod http;
pub mod scene;
pub mod storage;
pub mod svg;
pub mod table;

use crate::domain::model::OutputFormat;
use crate::utils::error::Result;
use scene::MapScene;

/// Serialize a scene in one output format.
pub fn export(scene: &MapScene, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Html => html::render_html(scene),
        OutputFormat::Svg => Ok(svg::render_svg(scene)),
        OutputFormat::Geojson => geojson::render_geojson(scene),
        OutputFormat::Csv => table::render_csv(scene),
    }
}
