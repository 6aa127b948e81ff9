use crate::parser::LogRecord;
use chrono::Timelike;
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;

pub type HourlyCounts = BTreeMap<u32, usize>; // hour of day -> requests
pub type StatusCodeCounts = BTreeMap<u16, usize>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status_code: u16,
    pub count: usize,
}

/// Requests per hour of day, using the hour as written in each timestamp (no zone normalisation).
pub fn hourly_counts(records: &[LogRecord]) -> HourlyCounts {
    records.iter().fold(BTreeMap::new(), |mut acc, r| {
        *acc.entry(r.timestamp.hour()).or_insert(0) += 1;
        acc
    })
}

pub fn status_code_counts(records: &[LogRecord]) -> StatusCodeCounts {
    records.iter().fold(BTreeMap::new(), |mut acc, r| {
        *acc.entry(r.status_code).or_insert(0) += 1;
        acc
    })
}

/// Most frequent first; ties broken by ascending code.
pub fn rank_status_codes(counts: &StatusCodeCounts) -> Vec<StatusCount> {
    counts
        .iter()
        .map(|(&status_code, &count)| StatusCount { status_code, count })
        .sorted_by(|a, b| b.count.cmp(&a.count).then_with(|| a.status_code.cmp(&b.status_code)))
        .collect()
}
