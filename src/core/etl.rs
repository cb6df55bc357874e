use crate::domain::model::LoadReport;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Fetch, render and write. Any error aborts the run before output is written.
    pub async fn run(&self) -> Result<LoadReport> {
        tracing::info!("🌍 Starting earthquake map run");
        self.monitor.log_stats("Start");

        tracing::info!("Fetching feed...");
        let collection = self.pipeline.extract().await?;
        tracing::info!(
            "Fetched {} features{}",
            collection.features.len(),
            collection
                .metadata
                .count
                .map(|count| format!(" (feed advertises {})", count))
                .unwrap_or_default()
        );
        self.monitor.log_stats("Extract");

        tracing::info!("Rendering markers...");
        let rendered = self.pipeline.transform(collection).await?;
        self.monitor.log_stats("Transform");

        tracing::info!("Writing outputs...");
        let report = self.pipeline.load(rendered).await?;
        self.monitor.log_stats("Load");

        let summary = report.summary;
        tracing::info!(
            "Drew {} of {} features, skipped {} ({} without magnitude, {} with invalid coordinates, {} malformed)",
            summary.drawn,
            summary.seen + summary.malformed,
            summary.skipped(),
            summary.magnitude_undefined,
            summary.invalid_coordinates,
            summary.malformed
        );
        for path in &report.written {
            tracing::info!("📁 Output saved to: {}", path);
        }
        self.monitor.log_final_stats();

        Ok(report)
    }
}
