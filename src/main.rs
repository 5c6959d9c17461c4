use anyhow::Context;
use eye_tracker_bridge::domain::settings::{Settings, SettingsService};
use eye_tracker_bridge::infrastructure::logging::init_logger;
use eye_tracker_bridge::infrastructure::sink::{ImagerySink, JsonLinesSink, LogSink};
use eye_tracker_bridge::infrastructure::tracker::mock::{MockConnector, MockTracker};
use eye_tracker_bridge::infrastructure::tracker::synthetic::SyntheticDevice;
use eye_tracker_bridge::infrastructure::tracker::{AdapterConfig, TelemetryAdapter};
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing::info;

fn build_sink(settings: &Settings) -> anyhow::Result<Arc<dyn ImagerySink>> {
    match &settings.record_output {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open record output {}", path))?;
            info!("Writing telemetry records to {}", path);
            Ok(Arc::new(JsonLinesSink::new(file)))
        }
        None => Ok(Arc::new(LogSink)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings_service = SettingsService::new()?;
    let settings = settings_service.get().clone();
    let _log_guard = init_logger(&settings.log_settings)?;
    info!(
        "Starting Eye Tracker Bridge (settings: {})",
        settings_service.path().display()
    );

    let sink = build_sink(&settings)?;

    // No vendor binding is linked in; the synthetic device stands in for the glasses
    let tracker = MockTracker::new();
    let device = SyntheticDevice::spawn(tracker.clone(), settings.simulation.clone());
    let connector = Arc::new(MockConnector::new(tracker));

    let mut adapter =
        TelemetryAdapter::new(connector, sink, AdapterConfig::from_settings(&settings))?;
    adapter.start()?;

    info!("Streaming from {}. Press Ctrl+C to stop.", settings.device_name);
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    info!("Interrupt received, shutting down");
    adapter.shutdown()?;
    device.await?;

    Ok(())
}
