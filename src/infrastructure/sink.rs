//! Imagery Sink
//!
//! Outbound side of the adapter: every normalized record is handed to one
//! [`ImagerySink`] call.

use crate::domain::models::TelemetryRecord;
use std::io::Write;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Downstream consumer of normalized records.
///
/// Called on the vendor runtime's thread, so implementations must not block
/// for long and must not panic.
pub trait ImagerySink: Send + Sync {
    fn update_information(&self, record: &TelemetryRecord);
}

/// Forwards records to an async consumer
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<TelemetryRecord>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::UnboundedSender<TelemetryRecord>) -> Self {
        Self { sender }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TelemetryRecord>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl ImagerySink for ChannelSink {
    fn update_information(&self, record: &TelemetryRecord) {
        // Receiver gone means nobody is watching; drop the record
        let _ = self.sender.send(*record);
    }
}

/// Writes one JSON object per record
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_record(&self, record: &TelemetryRecord) -> anyhow::Result<()> {
        let line = serde_json::to_string(record)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow::anyhow!("Lock error"))?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> ImagerySink for JsonLinesSink<W> {
    fn update_information(&self, record: &TelemetryRecord) {
        if let Err(e) = self.write_record(record) {
            warn!("Failed to write telemetry record: {}", e);
        }
    }
}

/// Logs each record at debug level
#[derive(Default)]
pub struct LogSink;

impl ImagerySink for LogSink {
    fn update_information(&self, record: &TelemetryRecord) {
        match serde_json::to_string(record) {
            Ok(json) => debug!(target: "imagery", "{}", json),
            Err(e) => warn!("Failed to serialize telemetry record: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Gaze;

    #[test]
    fn test_json_lines_sink() {
        let sink = JsonLinesSink::new(Vec::new());
        let mut record = TelemetryRecord::default();
        sink.update_information(&record);
        record.gaze = Gaze {
            x: 0.5,
            y: -0.25,
            z: 1.0,
            vergence: 2.0,
        };
        sink.update_information(&record);

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["gaze"]["y"], -0.25);
        assert_eq!(second["IMU"]["x"], 0.0);
    }

    #[test]
    fn test_json_lines_file_is_readable_per_record() {
        let path = std::env::temp_dir().join(format!(
            "eye_tracker_bridge_records_{}.jsonl",
            std::process::id()
        ));
        let file = std::fs::File::create(&path).unwrap();
        let sink = JsonLinesSink::new(file);

        sink.update_information(&TelemetryRecord::default());
        // Still held by the sink
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);

        drop(sink);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_channel_sink_forwards() {
        let (sink, mut rx) = ChannelSink::channel();
        let record = TelemetryRecord::default();
        sink.update_information(&record);

        assert_eq!(rx.try_recv().unwrap(), record);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_without_receiver() {
        let (sink, rx) = ChannelSink::channel();
        drop(rx);
        sink.update_information(&TelemetryRecord::default());
    }
}
