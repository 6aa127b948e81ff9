use crate::error::AnalyzerError;
use crate::pipeline::AnalysisReport;
use std::fmt::Write;

pub const BAR_WIDTH: usize = 40;

const MEAN_MARK: char = ':';
const THRESHOLD_MARK: char = '!';

pub fn render_json(report: &AnalysisReport) -> Result<String, AnalyzerError> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = render_hourly_chart(report);
    out.push('\n');
    out.push_str(&render_status_chart(report));
    out
}

fn column(value: f64, scale: f64) -> usize {
    if scale <= 0.0 { return 0; }
    ((value / scale) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize
}

/// Hourly volume with mean (`:`) and threshold (`!`) reference columns.
/// Anomalous hours are flagged.
pub fn render_hourly_chart(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Hourly Request Counts and Detected Anomalies");
    if report.hourly_counts.is_empty() {
        let _ = writeln!(out, "(no requests)");
        return out;
    }

    let stats = report.hourly_stats.as_ref();
    let mean = stats.map(|s| s.mean);
    let threshold = stats.and_then(|s| s.threshold);
    match (mean, threshold) {
        (Some(m), Some(t)) => {
            let n = report.anomalies.len();
            let _ = writeln!(out, "mean {m:.2}  threshold {t:.2}  anomalies {n}");
        }
        (Some(m), None) => {
            let _ = writeln!(out, "mean {m:.2}  threshold n/a (single hour)");
        }
        _ => {}
    }

    let max_count = report.hourly_counts.values().copied().max().unwrap_or(0) as f64;
    let scale = max_count.max(threshold.unwrap_or(0.0));
    let mean_col = mean.map(|m| column(m, scale).min(BAR_WIDTH - 1));
    let threshold_col = threshold.map(|t| column(t, scale).min(BAR_WIDTH - 1));

    for (&hour, &count) in &report.hourly_counts {
        let filled = column(count as f64, scale);
        let bar: String = (0..BAR_WIDTH)
            .map(|i| {
                if Some(i) == threshold_col {
                    THRESHOLD_MARK
                } else if Some(i) == mean_col {
                    MEAN_MARK
                } else if i < filled {
                    '#'
                } else {
                    ' '
                }
            })
            .collect();
        let flag = if report.anomalies.contains_key(&hour) { "  ANOMALY" } else { "" };
        let _ = writeln!(out, "{hour:02}:00 |{bar}| {count}{flag}");
    }
    out
}

pub fn render_status_chart(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "HTTP Status Code Distribution");
    if report.status_codes.is_empty() {
        let _ = writeln!(out, "(no requests)");
        return out;
    }
    let max_count = report.status_codes.iter().map(|s| s.count).max().unwrap_or(0) as f64;
    for s in &report.status_codes {
        let filled = column(s.count as f64, max_count);
        let bar = "#".repeat(filled);
        let _ = writeln!(out, "{:<5} |{bar:<w$}| {}", s.status_code, s.count, w = BAR_WIDTH);
    }
    out
}
