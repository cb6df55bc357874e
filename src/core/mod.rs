pub mod etl;
pub mod marker;
pub mod pipeline;
pub mod render;
pub mod validator;

pub use crate::domain::model::{Feature, FeatureCollection, LoadReport, RenderSummary};
pub use crate::domain::ports::{ConfigProvider, LegendSurface, MapSurface, Pipeline, Storage};
pub use crate::utils::error::Result;
