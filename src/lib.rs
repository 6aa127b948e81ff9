pub mod error;
pub mod parser;
pub mod aggregate;
pub mod anomaly;
pub mod observer;
pub mod pipeline;
pub mod render;

pub use error::AnalyzerError;
pub use pipeline::{AnalysisReport, LogAnalyzer};
