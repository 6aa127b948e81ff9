use crate::aggregate::{self, HourlyCounts, StatusCount};
use crate::anomaly::{self, AnomalySet, HourlyStats};
use crate::error::AnalyzerError;
use crate::observer::{AnalysisEvent, AnalysisObserver};
use crate::parser::{self, LogRecord, ParseOpts};
use serde::Serialize;
use std::path::Path;

/// Everything the presenter needs to draw the hourly and status-code charts.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub source: Option<String>,
    pub total_records: usize,
    pub hourly_counts: HourlyCounts,
    pub hourly_stats: Option<HourlyStats>,
    pub anomalies: AnomalySet,
    pub status_codes: Vec<StatusCount>,
}

pub struct LogAnalyzer {
    opts: ParseOpts,
    observer: Box<dyn AnalysisObserver>,
}

impl LogAnalyzer {
    pub fn new(opts: ParseOpts, observer: Box<dyn AnalysisObserver>) -> Self {
        Self { opts, observer }
    }

    /// Parse `path`, reporting failures to the observer. `None` means the pipeline should stop.
    pub fn parse(&self, path: &Path) -> Option<Vec<LogRecord>> {
        let shown = path.display().to_string();
        match parser::parse_file(path, &self.opts) {
            Ok(records) => {
                let event = AnalysisEvent::Parsed { path: shown, records: records.len() };
                self.observer.on_event(&event);
                Some(records)
            }
            Err(AnalyzerError::FileNotFound { .. }) => {
                self.observer.on_event(&AnalysisEvent::FileMissing { path: shown });
                None
            }
            Err(e) => {
                let error = e.to_string();
                self.observer.on_event(&AnalysisEvent::ParseFailed { path: shown, error });
                None
            }
        }
    }

    pub fn analyze(&self, records: &[LogRecord]) -> AnalysisReport {
        let hourly_counts = aggregate::hourly_counts(records);
        let (hourly_stats, anomalies) = anomaly::compute_hourly_anomalies(&hourly_counts);
        let status_codes = aggregate::rank_status_codes(&aggregate::status_code_counts(records));
        self.observer.on_event(&AnalysisEvent::AnalysisComplete {
            anomalies: anomalies.len(),
            hours: hourly_counts.len(),
        });
        AnalysisReport {
            source: None,
            total_records: records.len(),
            hourly_counts,
            hourly_stats,
            anomalies,
            status_codes,
        }
    }

    /// Parse then analyse; stops after a parse failure without attempting analysis.
    pub fn run(&self, path: &Path) -> Option<AnalysisReport> {
        self.observer.on_event(&AnalysisEvent::Started { path: path.display().to_string() });
        let records = self.parse(path)?;
        let mut report = self.analyze(&records);
        report.source = Some(path.display().to_string());
        Some(report)
    }
}
