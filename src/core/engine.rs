use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct AuditEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> AuditEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting audit...");
        self.monitor.log_stats("startup");

        tracing::info!("Extracting repositories...");
        let batch = self.pipeline.extract().await?;
        tracing::info!(
            "Scanned {} repositories ({} failed)",
            batch.scans.len(),
            batch.failed.len()
        );
        self.monitor.log_stats("extract");

        tracing::info!("Resolving dependency licenses...");
        let outcome = self.pipeline.transform(batch).await?;
        tracing::info!("Resolved licenses for {} repositories", outcome.reports.len());
        self.monitor.log_stats("transform");

        tracing::info!("Writing reports...");
        let output_path = self.pipeline.load(outcome).await?;
        tracing::info!("Reports written to: {}", output_path);
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
