use crate::adapters::export;
use crate::adapters::http::FeedClient;
use crate::adapters::scene::MapScene;
use crate::core::render::{RenderContext, RenderOrchestrator};
use crate::domain::model::{FeatureCollection, LoadReport, OutputFormat, RenderSummary};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub scene: MapScene,
    pub summary: RenderSummary,
}

/// Feed → map scene → output files.
pub struct QuakePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: FeedClient,
    orchestrator: RenderOrchestrator,
}

impl<S: Storage, C: ConfigProvider> QuakePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = FeedClient::new(config.request_timeout())?;
        let orchestrator = RenderOrchestrator::new(config.map_view(), config.tile_layer());
        Ok(Self {
            storage,
            config,
            client,
            orchestrator,
        })
    }

    fn formats(&self) -> Vec<OutputFormat> {
        let mut formats: Vec<OutputFormat> = Vec::new();
        for format in self.config.output_formats() {
            if !formats.contains(format) {
                formats.push(*format);
            }
        }
        formats
    }

    fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.config.basename(), extension)
    }

    fn output_location(&self, file_name: &str) -> String {
        format!(
            "{}/{}",
            self.config.output_path().trim_end_matches(['/', '\\']),
            file_name
        )
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for QuakePipeline<S, C> {
    type Output = TransformResult;

    async fn extract(&self) -> Result<FeatureCollection> {
        self.client.fetch(self.config.feed_url()).await
    }

    async fn transform(&self, data: FeatureCollection) -> Result<TransformResult> {
        let mut ctx = RenderContext::new(MapScene::new(data.metadata.clone()));
        let mut summary = self.orchestrator.render(&mut ctx, &data.features);
        summary.malformed = data.malformed;

        Ok(TransformResult {
            scene: ctx.into_surface(),
            summary,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<LoadReport> {
        let mut documents = Vec::new();
        for format in self.formats() {
            let content = export(&result.scene, format)?;
            tracing::debug!("Exported {} ({} bytes)", format, content.len());
            documents.push((self.file_name(format.extension()), content));
        }

        let mut written = Vec::new();
        if self.config.archive() {
            let archive_name = self.file_name("zip");
            tracing::debug!("Creating ZIP file with {} files", documents.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, content) in &documents {
                    zip.start_file(name.as_str(), SimpleFileOptions::default())?;
                    zip.write_all(content.as_bytes())?;
                }
                zip.finish()?.into_inner()
            };

            self.storage.write_file(&archive_name, &zip_data).await?;
            written.push(self.output_location(&archive_name));
        } else {
            for (name, content) in &documents {
                self.storage.write_file(name, content.as_bytes()).await?;
                written.push(self.output_location(name));
            }
        }

        Ok(LoadReport {
            written,
            summary: result.summary,
        })
    }
}
