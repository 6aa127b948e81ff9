use crate::aggregate::HourlyCounts;
use serde::Serialize;
use std::collections::BTreeMap;

pub type AnomalySet = BTreeMap<u32, usize>;

/// Number of standard deviations above the mean an hour must exceed.
pub const SIGMA_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyStats {
    pub hours: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two hours of data.
    pub std_dev: Option<f64>,
    pub threshold: Option<f64>,
}

impl HourlyStats {
    pub fn compute(counts: &HourlyCounts) -> Option<Self> {
        if counts.is_empty() { return None; }
        let xs: Vec<f64> = counts.values().map(|&c| c as f64).collect();
        let mean = mean_of(&xs)?;
        let std_dev = sample_std_dev(&xs);
        let threshold = std_dev.map(|sd| mean + SIGMA_MULTIPLIER * sd);
        Some(Self { hours: xs.len(), mean, std_dev, threshold })
    }
}

fn mean_of(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() { return None; }
    Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Standard deviation with Bessel's correction (divides by n - 1).
pub fn sample_std_dev(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 { return None; }
    let m = mean_of(xs)?;
    let var = xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (xs.len() - 1) as f64;
    Some(var.sqrt())
}

pub fn compute_hourly_anomalies(counts: &HourlyCounts) -> (Option<HourlyStats>, AnomalySet) {
    let stats = HourlyStats::compute(counts);
    let anomalies = match stats.as_ref().and_then(|s| s.threshold) {
        Some(threshold) => counts
            .iter()
            .filter(|&(_, &c)| (c as f64) > threshold)
            .map(|(&h, &c)| (h, c))
            .collect(),
        None => AnomalySet::new(),
    };
    (stats, anomalies)
}

/// Hours whose count strictly exceeds `mean + 2 * sample_std_dev`. Empty for zero or one hour.
pub fn detect_hourly_anomalies(counts: &HourlyCounts) -> AnomalySet {
    compute_hourly_anomalies(counts).1
}
