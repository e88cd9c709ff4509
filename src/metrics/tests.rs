use std::collections::BTreeMap;
use std::time::Duration;

use super::*;

fn sample(latency_ms: u64, outcome: SampleOutcome) -> RequestSample {
    RequestSample {
        latency_ms,
        outcome,
    }
}

#[test]
fn collector_counts_errors_by_code() -> Result<(), String> {
    let mut collector = EntryCollector::new("http://a/");
    collector.record(sample(10, SampleOutcome::Status(200)));
    collector.record(sample(30, SampleOutcome::Status(503)));
    collector.record(sample(20, SampleOutcome::Timeout));
    collector.record(sample(40, SampleOutcome::Status(503)));

    let metrics = collector.finish(Duration::from_secs(2));
    if metrics.total_requests != 4 || metrics.total_errors != 3 {
        return Err(format!(
            "unexpected totals {}/{}",
            metrics.total_requests, metrics.total_errors
        ));
    }
    let mut expected = BTreeMap::new();
    expected.insert("503".to_owned(), 2);
    expected.insert("timeout".to_owned(), 1);
    if metrics.error_codes != expected {
        return Err(format!("unexpected error codes {:?}", metrics.error_codes));
    }
    if metrics.min_latency_ms != 10 || metrics.max_latency_ms != 40 {
        return Err(format!(
            "unexpected min/max {}/{}",
            metrics.min_latency_ms, metrics.max_latency_ms
        ));
    }
    if metrics.mean_latency_ms_x100 != 2_500 {
        return Err(format!("unexpected mean {}", metrics.mean_latency_ms_x100));
    }
    if metrics.rps_x100 != 200 || metrics.total_time_ms != 2_000 {
        return Err(format!(
            "unexpected rps/time {}/{}",
            metrics.rps_x100, metrics.total_time_ms
        ));
    }
    if metrics.status_code != Some(503) || metrics.request_elapsed != 40 {
        return Err(format!(
            "unexpected last status {:?}/{}",
            metrics.status_code, metrics.request_elapsed
        ));
    }
    Ok(())
}

#[test]
fn collector_reports_percentile_labels() -> Result<(), String> {
    let mut collector = EntryCollector::new("http://a/");
    for latency in 1..=100 {
        collector.record(sample(latency, SampleOutcome::Status(200)));
    }
    let metrics = collector.finish(Duration::from_secs(1));
    let labels: Vec<&str> = metrics.percentiles.keys().map(String::as_str).collect();
    if labels != ["50", "90", "95", "99"] {
        return Err(format!("unexpected labels {:?}", labels));
    }
    let p50 = metrics.percentiles.get("50").copied().unwrap_or_default();
    if !(49..=51).contains(&p50) {
        return Err(format!("unexpected p50 {}", p50));
    }
    Ok(())
}

#[test]
fn unanswered_requests_are_detected() -> Result<(), String> {
    let mut collector = EntryCollector::new("http://a/");
    if collector.all_unanswered() {
        return Err("empty collector must not count as unanswered".to_owned());
    }
    collector.record(sample(5, SampleOutcome::Transport));
    if !collector.all_unanswered() {
        return Err("expected transport-only collector to be unanswered".to_owned());
    }
    collector.record(sample(5, SampleOutcome::Status(500)));
    if collector.all_unanswered() {
        return Err("a response was received".to_owned());
    }
    Ok(())
}

#[test]
fn failure_record_keeps_partial_fields() -> Result<(), String> {
    let partial = PartialMetrics {
        total_requests: Some(3),
        total_errors: Some(3),
        status_code: None,
        ..PartialMetrics::default()
    };
    let metrics = EntryMetrics::from_failure("http://a/", partial, "boom".to_owned());
    if metrics.url != "http://a/" || metrics.total_requests != 3 || metrics.total_errors != 3 {
        return Err(format!("unexpected metrics {:?}", metrics));
    }
    if !metrics.is_error() || metrics.error.as_deref() != Some("boom") {
        return Err("expected error message to be kept".to_owned());
    }
    if metrics.max_latency_ms != 0 || !metrics.percentiles.is_empty() {
        return Err("missing fields must default".to_owned());
    }
    Ok(())
}

#[test]
fn pass_title_follows_user_count() -> Result<(), String> {
    let single = PassReport::new(0, 1);
    let many = PassReport::new(1, 4);
    if single.title != "Load report for 1 simultaneous user" {
        return Err(format!("unexpected title {}", single.title));
    }
    if many.title != "Load report for 4 simultaneous users" {
        return Err(format!("unexpected title {}", many.title));
    }
    if single.last || !single.entries.is_empty() {
        return Err("new pass must start empty and not last".to_owned());
    }
    Ok(())
}

#[test]
fn fractional_values_keep_two_decimals() -> Result<(), String> {
    let mut collector = EntryCollector::new("http://a/");
    for latency in [10, 10, 11] {
        collector.record(sample(latency, SampleOutcome::Status(200)));
    }
    let metrics = collector.finish(Duration::from_millis(1_500));
    if metrics.mean_latency_ms_x100 != 1_033 {
        return Err(format!("unexpected mean {}", metrics.mean_latency_ms_x100));
    }
    if metrics.rps_x100 != 200 || metrics.total_time_ms != 1_500 {
        return Err(format!(
            "unexpected rps/time {}/{}",
            metrics.rps_x100, metrics.total_time_ms
        ));
    }
    Ok(())
}

#[test]
fn empty_collector_reports_zero_rates() -> Result<(), String> {
    let metrics = EntryCollector::new("http://a/").finish(Duration::ZERO);
    if metrics.rps_x100 != 0 || metrics.mean_latency_ms_x100 != 0 || metrics.total_time_ms != 0 {
        return Err(format!("unexpected metrics {:?}", metrics));
    }
    Ok(())
}
