use std::sync::Mutex;
use tracing::{error, info};

/// Diagnostics emitted while a log file moves through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisEvent {
    Started { path: String },
    FileMissing { path: String },
    ParseFailed { path: String, error: String },
    Parsed { path: String, records: usize },
    AnalysisComplete { anomalies: usize, hours: usize },
}

/// Sink for pipeline diagnostics, injected into [`crate::pipeline::LogAnalyzer`].
pub trait AnalysisObserver: Send + Sync {
    fn on_event(&self, event: &AnalysisEvent);
}

/// Forwards events to `tracing`; the subscriber decides where they end up.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl AnalysisObserver for TracingObserver {
    fn on_event(&self, event: &AnalysisEvent) {
        match event {
            AnalysisEvent::Started { path } => info!(path = %path, "Starting log analysis"),
            AnalysisEvent::FileMissing { path } => error!(path = %path, "Log file not found"),
            AnalysisEvent::ParseFailed { path, error } => {
                error!(path = %path, error = %error, "Error parsing log file")
            }
            AnalysisEvent::Parsed { path, records } => {
                info!(path = %path, records, "Logs successfully parsed")
            }
            AnalysisEvent::AnalysisComplete { anomalies, hours } => {
                info!(anomalies, hours, "Data analysis complete")
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct NullObserver;

impl AnalysisObserver for NullObserver {
    fn on_event(&self, _event: &AnalysisEvent) {}
}

/// Keeps every event in memory; meant for tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<AnalysisEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self { Self::default() }

    pub fn events(&self) -> Vec<AnalysisEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl AnalysisObserver for RecordingObserver {
    fn on_event(&self, event: &AnalysisEvent) {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).push(event.clone());
    }
}

impl<T: AnalysisObserver + ?Sized> AnalysisObserver for std::sync::Arc<T> {
    fn on_event(&self, event: &AnalysisEvent) {
        (**self).on_event(event)
    }
}
