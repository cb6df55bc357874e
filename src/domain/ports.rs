use crate::domain::model::{
    CircleMarker, FeatureCollection, Legend, LoadReport, MapView, OutputFormat, Popup, TileLayer,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn feed_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[OutputFormat];
    fn basename(&self) -> &str;
    fn archive(&self) -> bool;
    fn map_view(&self) -> MapView;
    fn tile_layer(&self) -> TileLayer;
    fn request_timeout(&self) -> Option<Duration>;
}

/// Handle for a marker previously added to a [`MapSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub usize);

/// The map widget the render pass draws onto.
pub trait MapSurface {
    fn set_view(&mut self, view: MapView);
    fn add_tile_layer(&mut self, layer: &TileLayer);
    fn add_circle_marker(&mut self, marker: &CircleMarker) -> MarkerId;
    fn bind_popup(&mut self, marker: MarkerId, popup: &Popup);
}

/// Receives the fixed-position legend overlay.
pub trait LegendSurface {
    fn add_legend(&mut self, legend: &Legend);
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Output: Send;

    async fn extract(&self) -> Result<FeatureCollection>;
    async fn transform(&self, data: FeatureCollection) -> Result<Self::Output>;
    async fn load(&self, result: Self::Output) -> Result<LoadReport>;
}
