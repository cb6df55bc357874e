pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{scene::MapScene, storage::LocalStorage};
pub use core::{etl::EtlEngine, pipeline::QuakePipeline, render::RenderOrchestrator};
pub use utils::error::{QuakeError, Result};
