use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("log file not found: {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("error reading log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad timestamp {value:?} on line {line_number}: {source}")]
    Timestamp {
        line_number: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("render error: {0}")]
    Render(#[from] serde_json::Error),
}
