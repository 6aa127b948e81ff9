use apachescope::aggregate::HourlyCounts;
use apachescope::anomaly::{compute_hourly_anomalies, detect_hourly_anomalies, sample_std_dev, HourlyStats};

fn counts(pairs: &[(u32, usize)]) -> HourlyCounts {
    pairs.iter().copied().collect()
}

#[test]
fn flags_dominant_spike_hour_only() {
    let mut c: HourlyCounts = (0..24).map(|h| (h, 10)).collect();
    c.insert(14, 100);
    let anomalies = detect_hourly_anomalies(&c);
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies.get(&14), Some(&100));
}

#[test]
fn four_hour_spike_cannot_clear_two_sigma() {
    // With n=4 the largest attainable sample z-score is 1.5, so nothing is flagged.
    let c = counts(&[(0, 10), (1, 10), (2, 10), (3, 100)]);
    let (stats, anomalies) = compute_hourly_anomalies(&c);
    let stats = stats.expect("stats for non-empty counts");
    assert!((stats.mean - 32.5).abs() < 1e-9);
    assert!((stats.std_dev.unwrap() - 45.0).abs() < 1e-9);
    assert!((stats.threshold.unwrap() - 122.5).abs() < 1e-9);
    assert!(anomalies.is_empty());
}

#[test]
fn single_hour_has_no_anomalies() {
    let c = counts(&[(5, 42)]);
    let (stats, anomalies) = compute_hourly_anomalies(&c);
    assert!(anomalies.is_empty());
    let stats = stats.unwrap();
    assert_eq!(stats.hours, 1);
    assert_eq!(stats.mean, 42.0);
    assert!(stats.std_dev.is_none());
    assert!(stats.threshold.is_none());
}

#[test]
fn empty_counts_are_degenerate_not_a_crash() {
    let c = HourlyCounts::new();
    assert!(HourlyStats::compute(&c).is_none());
    assert!(detect_hourly_anomalies(&c).is_empty());
}

#[test]
fn flat_distribution_has_no_anomalies() {
    let c: HourlyCounts = (0..12).map(|h| (h, 7)).collect();
    let (stats, anomalies) = compute_hourly_anomalies(&c);
    let stats = stats.unwrap();
    assert_eq!(stats.std_dev, Some(0.0));
    assert_eq!(stats.threshold, Some(7.0));
    assert!(anomalies.is_empty());
}

#[test]
fn sample_std_dev_uses_n_minus_one() {
    let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    let sd = sample_std_dev(&xs).unwrap();
    assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    assert!(sample_std_dev(&[3.0]).is_none());
    assert!(sample_std_dev(&[]).is_none());
}
